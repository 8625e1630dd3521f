//! Action failure taxonomy.
//!
//! Every failure the engine can report to a caller is a recoverable,
//! caller-visible value. Action entry points return
//! `Result<ActionReport, ActionError>`; nothing here is a process fault.
//!
//! Two deliberate non-errors:
//! - Drawing into a full hand *burns* the card (reported via counters).
//! - Overspending mana clamps to zero.

use serde::{Deserialize, Serialize};

/// Why an action was rejected.
///
/// Variants fall into two families:
/// - **State errors**: the session cannot accept any action right now
///   (`GameNotActive`, `ActionInProgress`).
/// - **Invalid actions**: the session is fine, this particular action is
///   not legal.
///
/// A rejected action leaves all mutable state (mana, zones, health)
/// exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ActionError {
    /// The game has already ended (or is paused as Saved).
    #[error("game is not active")]
    GameNotActive,

    /// Another action is still being processed. Overlapping calls fail
    /// fast rather than queue.
    #[error("another action is already in progress")]
    ActionInProgress,

    #[error("not enough mana: need {need}, have {have}")]
    InsufficientMana { need: u32, have: u32 },

    #[error("card not found in hand")]
    CardNotInHand,

    /// Board already holds the maximum number of creatures.
    #[error("no room on the board")]
    BoardFull,

    /// The attacker is not on the active player's board.
    #[error("creature is not on your board")]
    NotYourCreature,

    /// Exhausted, summoned this turn without Charge, or has no attack.
    #[error("this creature cannot attack")]
    CannotAttack,

    #[error("creature is frozen")]
    Frozen,

    /// A Taunt creature must be attacked first. Lists the legal targets.
    #[error("you must attack a Taunt creature: {names}")]
    MustAttackTaunt { names: String },

    /// The named defender is not on the opponent's board.
    #[error("target is not on the opponent's board")]
    TargetNotFound,

    /// The spell requires a target and none was supplied.
    #[error("spell requires a target")]
    SpellNeedsTarget,

    /// Boundary guard for malformed content: a card id the session has
    /// never seen. Surfaced as a failed action instead of crashing.
    #[error("unknown card")]
    UnknownCard,
}

impl ActionError {
    /// True for failures of the session itself rather than of the
    /// particular action (busy / already over).
    #[must_use]
    pub fn is_state_error(&self) -> bool {
        matches!(self, ActionError::GameNotActive | ActionError::ActionInProgress)
    }
}
