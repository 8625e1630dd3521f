//! Card model: abilities, the Creature/Spell union, and the catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Session-unique instance identifier
//! - `Card`: Closed tagged union of `CreatureCard` and `SpellCard`
//! - `Ability`: (kind, trigger, magnitude, active) data owned by creatures
//! - `CardCatalog`: Immutable templates the engine clones instances from

pub mod ability;
pub mod card;
pub mod catalog;

pub use ability::{Ability, AbilityKind, AbilityTrigger};
pub use card::{
    Card, CardId, CreatureCard, Faction, IdAllocator, Rarity, SpellCard, SpellEffect,
    SpellEffectKind, TargetKind,
};
pub use catalog::CardCatalog;
