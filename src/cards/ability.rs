//! Creature abilities.
//!
//! Abilities are plain data owned by the creature instance. The combat
//! resolver interprets the kinds it knows (Taunt, Charge, DivineShield,
//! Poison, Lifesteal, Reborn, SpellDamage, Deathrattle); the remaining
//! kinds are carried as inert data for content and UI layers.
//!
//! Cloning a creature deep-copies its ability list, so board copies are
//! independent instances.

use serde::{Deserialize, Serialize};

/// The closed set of ability kinds.
///
/// Matching on this enum is exhaustive, so every combat-relevant
/// interaction is checked at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Opponents must attack this creature first.
    Taunt,
    /// May attack the turn it is summoned.
    Charge,
    /// Absorbs the next instance of damage, then is consumed.
    DivineShield,
    /// May attack twice per turn.
    Windfury,
    /// Any damage it deals kills the target outright, bypassing Divine
    /// Shield.
    Poison,
    /// Heals the controller for the damage this creature deals.
    Lifesteal,
    /// Returns to play once at 1 health after dying.
    Reborn,
    /// May attack other creatures the turn it is summoned.
    Rush,
    /// Cannot be targeted until it acts.
    Stealth,
    /// Increases the controller's spell damage.
    SpellDamage,
    /// Effect when the card is played.
    Battlecry,
    /// Effect when the creature dies.
    Deathrattle,
    /// Freezes its target.
    Freeze,
    /// Cannot take damage.
    Immune,
}

impl AbilityKind {
    /// Default rules text for this kind.
    #[must_use]
    pub fn default_description(self, magnitude: i32) -> String {
        match self {
            AbilityKind::Taunt => "Enemies must attack this creature first".to_string(),
            AbilityKind::Charge => "Can attack the same turn it is played".to_string(),
            AbilityKind::DivineShield => "Ignores the first damage it takes".to_string(),
            AbilityKind::Windfury => "Can attack twice each turn".to_string(),
            AbilityKind::Poison => "Destroys any creature it damages".to_string(),
            AbilityKind::Lifesteal => "Damage dealt also heals your hero".to_string(),
            AbilityKind::Reborn => "Returns to life once with 1 health".to_string(),
            AbilityKind::Rush => "Can attack creatures the same turn it is played".to_string(),
            AbilityKind::Stealth => "Cannot be targeted until it attacks".to_string(),
            AbilityKind::SpellDamage => format!("Your spells deal {magnitude} more damage"),
            AbilityKind::Battlecry => "Battlecry".to_string(),
            AbilityKind::Deathrattle => "Deathrattle".to_string(),
            AbilityKind::Freeze => "Freezes its target".to_string(),
            AbilityKind::Immune => "Cannot take damage".to_string(),
        }
    }
}

impl std::fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// When an ability activates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityTrigger {
    OnPlay,
    OnAttack,
    OnDamage,
    OnHeal,
    OnDeath,
    OnTurnStart,
    OnTurnEnd,
    /// Always-on effects (Taunt, Charge, ...).
    Permanent,
}

/// A single ability on a creature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub kind: AbilityKind,
    pub trigger: AbilityTrigger,
    /// Numeric payload (e.g. the SpellDamage bonus). Zero when unused.
    pub magnitude: i32,
    /// Inactive abilities have no effect but remain on the card.
    pub active: bool,
    pub description: String,
}

impl Ability {
    /// Create an ability with the default description for its kind.
    #[must_use]
    pub fn new(kind: AbilityKind, trigger: AbilityTrigger) -> Self {
        Self::with_magnitude(kind, trigger, 0)
    }

    /// Create an ability carrying a numeric payload.
    #[must_use]
    pub fn with_magnitude(kind: AbilityKind, trigger: AbilityTrigger, magnitude: i32) -> Self {
        Self {
            kind,
            trigger,
            magnitude,
            active: true,
            description: kind.default_description(magnitude),
        }
    }
}
