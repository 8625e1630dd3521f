//! Outbound domain events.
//!
//! Instead of a subscriber registry, every successful action returns an
//! `ActionReport` carrying the events it produced. Callers (UI, loggers)
//! consume the list however they like; a successful report *is* the
//! state-changed signal. There is no hidden fan-out and nothing to
//! unsubscribe.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::session::{GameStatus, PlayerSlot};

/// Something observable that happened during an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new turn began for `player`.
    TurnStarted { turn: u32, player: PlayerSlot },
    /// A card moved from deck to hand.
    CardDrawn { player: PlayerSlot },
    /// A card was discarded off the deck because the hand was full.
    CardBurned { player: PlayerSlot, name: String },
    /// An empty-deck draw dealt escalating damage.
    FatigueDamage { player: PlayerSlot, amount: i32 },
    /// A card left the hand and its cost was paid.
    CardPlayed { player: PlayerSlot, card: CardId, name: String },
    /// A creature entered the board.
    CreatureSummoned { player: PlayerSlot, card: CardId, name: String },
    /// An attack resolved. `defender` is None for a hero attack.
    Attacked {
        attacker: CardId,
        defender: Option<CardId>,
    },
    /// A hero took damage.
    HeroDamaged { player: PlayerSlot, amount: i32 },
    /// A hero was healed.
    HeroHealed { player: PlayerSlot, amount: i32 },
    /// A creature died and moved to its owner's graveyard.
    CreatureDied { player: PlayerSlot, card: CardId, name: String },
    /// A creature returned to play through Reborn.
    CreatureReborn { player: PlayerSlot, card: CardId, name: String },
    /// The session reached a terminal status. Fired exactly once.
    GameEnded { status: GameStatus },
}

/// Structured result of a successful action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    /// Human-readable outcome line, also appended to the session log.
    pub message: String,
    /// Everything that happened, in order.
    pub events: Vec<GameEvent>,
}

impl ActionReport {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// True if the session ended during this action.
    #[must_use]
    pub fn game_ended(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::GameEnded { .. }))
    }
}
