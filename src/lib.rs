//! # rust-duel
//!
//! A deterministic two-player card-combat engine.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: The only randomness is the seeded deck shuffle.
//!    The same seed and action sequence always produce the same game.
//!
//! 2. **Session-Owned State**: `GameSession` exclusively owns both players
//!    and all zones. Every mutation goes through a session method that
//!    validates first and commits atomically.
//!
//! 3. **Errors Over Panics**: Illegal actions return `ActionError` and
//!    leave state untouched; the engine never panics on bad input.
//!
//! ## Modules
//!
//! - `cards`: Abilities, the Creature/Spell union, and the template catalog
//! - `player`: Health, mana economy, and the four card zones
//! - `session`: Turn state machine, action dispatch, combat resolution,
//!   log, terminal detection
//! - `events`: Per-action event reports
//! - `snapshot`: Full-fidelity save and restore
//! - `error`: The action error taxonomy
//! - `rng`: Seeded, snapshot-friendly randomness

pub mod cards;
pub(crate) mod combat;
pub mod error;
pub mod events;
pub mod player;
pub mod rng;
pub mod session;
pub mod snapshot;

// Re-export commonly used types
pub use crate::cards::{
    Ability, AbilityKind, AbilityTrigger, Card, CardCatalog, CardId, CreatureCard, Faction,
    IdAllocator, Rarity, SpellCard, SpellEffect, SpellEffectKind, TargetKind,
};

pub use crate::error::ActionError;

pub use crate::events::{ActionReport, GameEvent};

pub use crate::player::{
    DrawOutcome, Player, MAX_BOARD_SIZE, MAX_HAND_SIZE, MAX_MANA, STARTING_HEALTH,
};

pub use crate::rng::{GameRng, GameRngState};

pub use crate::session::{GameSession, GameStatus, PlayerSlot, MAX_LOG_ENTRIES};

pub use crate::snapshot::{GameSnapshot, SnapshotError, SNAPSHOT_VERSION};
