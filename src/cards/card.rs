//! Card model: the closed Creature/Spell union.
//!
//! Cards are pure data plus small derived predicates. The engine never
//! inspects runtime types; everything dispatches through the `Card` enum.
//!
//! ## Identity
//!
//! Every card instance carries a `CardId` unique within its session.
//! Summoning clones a hand card onto the board with a *fresh* id from the
//! session allocator, so the board copy and the graveyard original are
//! independent instances.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ability::{Ability, AbilityKind};

/// Card instance identifier, unique within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Allocator for session-unique card ids.
///
/// Serialized with the session so restored games keep allocating past the
/// highest id already in play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocate the next id.
    pub fn alloc(&mut self) -> CardId {
        let id = CardId(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Card rarity (cosmetic).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
}

/// Faction tag. Cosmetic: does not affect rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Humans,
    Beasts,
    Mythical,
    Elements,
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A creature card: stats, abilities, and transient combat flags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatureCard {
    pub id: CardId,
    pub name: String,
    pub mana_cost: u32,
    pub rarity: Rarity,
    pub faction: Faction,
    pub description: String,
    /// Opaque image reference for the presentation layer.
    pub image: String,

    pub attack: i32,
    pub health: i32,
    pub max_health: i32,

    /// Owned ability list; deep-copied on clone.
    pub abilities: SmallVec<[Ability; 4]>,

    // Transient combat flags.
    pub can_attack: bool,
    pub exhausted: bool,
    pub frozen: bool,
}

impl CreatureCard {
    /// Create a creature with base stats and no abilities.
    #[must_use]
    pub fn new(
        id: CardId,
        name: impl Into<String>,
        mana_cost: u32,
        attack: i32,
        health: i32,
        faction: Faction,
        rarity: Rarity,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            mana_cost,
            rarity,
            faction,
            description: String::new(),
            image: String::new(),
            attack,
            health,
            max_health: health,
            abilities: SmallVec::new(),
            can_attack: false,
            exhausted: false,
            frozen: false,
        }
    }

    /// Builder-style ability attachment.
    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    /// Builder-style description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check for an active ability of the given kind.
    #[must_use]
    pub fn has_ability(&self, kind: AbilityKind) -> bool {
        self.abilities.iter().any(|a| a.kind == kind && a.active)
    }

    #[must_use]
    pub fn is_taunt(&self) -> bool {
        self.has_ability(AbilityKind::Taunt)
    }

    #[must_use]
    pub fn has_charge(&self) -> bool {
        self.has_ability(AbilityKind::Charge)
    }

    #[must_use]
    pub fn has_divine_shield(&self) -> bool {
        self.has_ability(AbilityKind::DivineShield)
    }

    /// Sum of active SpellDamage magnitudes on this creature.
    #[must_use]
    pub fn spell_damage(&self) -> i32 {
        self.abilities
            .iter()
            .filter(|a| a.kind == AbilityKind::SpellDamage && a.active)
            .map(|a| a.magnitude)
            .sum()
    }

    pub fn add_ability(&mut self, ability: Ability) {
        self.abilities.push(ability);
    }

    /// Remove every ability of the given kind.
    pub fn remove_ability(&mut self, kind: AbilityKind) {
        self.abilities.retain(|a| a.kind != kind);
    }

    /// Dead creatures are removed from the board at the next cleanup pass.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Apply damage.
    ///
    /// An active Divine Shield absorbs the hit and is consumed, unless
    /// `pierce_shield` is set (Poison's instant kill). Returns true if the
    /// shield absorbed the damage.
    pub fn take_damage(&mut self, damage: i32, pierce_shield: bool) -> bool {
        if self.has_divine_shield() && !pierce_shield {
            self.remove_ability(AbilityKind::DivineShield);
            return true;
        }
        self.health -= damage;
        false
    }

    /// Heal, clamped to max health.
    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Start-of-turn reset: un-exhaust, thaw, and grant attack permission
    /// unless the creature spends the turn thawing.
    pub fn reset_for_new_turn(&mut self) {
        self.can_attack = !self.frozen;
        self.exhausted = false;
        self.frozen = false;
    }

    /// Mark as having attacked this turn.
    pub fn exhaust(&mut self) {
        self.can_attack = false;
        self.exhausted = true;
    }

    /// Deep copy with a fresh identity.
    ///
    /// Abilities and combat flags are copied; the clone is a fully
    /// independent instance.
    #[must_use]
    pub fn clone_with_id(&self, id: CardId) -> Self {
        let mut clone = self.clone();
        clone.id = id;
        clone
    }
}

impl std::fmt::Display for CreatureCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}/{})", self.name, self.attack, self.health)
    }
}

/// What a spell does when it resolves.
///
/// Only `Damage` and `Heal` are resolved by the core combat path; the
/// remaining kinds are carried for content layers and resolve as a logged
/// no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellEffectKind {
    Damage,
    Heal,
    Buff,
    Summon,
    Draw,
    Freeze,
    Silence,
    ReturnToHand,
    Destroy,
}

/// Spell payload: effect kind plus magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellEffect {
    pub kind: SpellEffectKind,
    pub magnitude: i32,
}

/// Target constraint declared by a spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    AnyCreature,
    FriendlyCreature,
    EnemyCreature,
    NoTarget,
}

/// A spell card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpellCard {
    pub id: CardId,
    pub name: String,
    pub mana_cost: u32,
    pub rarity: Rarity,
    pub faction: Faction,
    pub description: String,
    pub image: String,

    pub effect: SpellEffect,
    pub target: TargetKind,
}

impl SpellCard {
    #[must_use]
    pub fn new(
        id: CardId,
        name: impl Into<String>,
        mana_cost: u32,
        effect: SpellEffect,
        faction: Faction,
        target: TargetKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            mana_cost,
            rarity: Rarity::Common,
            faction,
            description: String::new(),
            image: String::new(),
            effect,
            target,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Deep copy with a fresh identity.
    #[must_use]
    pub fn clone_with_id(&self, id: CardId) -> Self {
        let mut clone = self.clone();
        clone.id = id;
        clone
    }
}

/// The closed card union.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Card {
    Creature(CreatureCard),
    Spell(SpellCard),
}

impl Card {
    #[must_use]
    pub fn id(&self) -> CardId {
        match self {
            Card::Creature(c) => c.id,
            Card::Spell(s) => s.id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Card::Creature(c) => &c.name,
            Card::Spell(s) => &s.name,
        }
    }

    #[must_use]
    pub fn mana_cost(&self) -> u32 {
        match self {
            Card::Creature(c) => c.mana_cost,
            Card::Spell(s) => s.mana_cost,
        }
    }

    #[must_use]
    pub fn faction(&self) -> Faction {
        match self {
            Card::Creature(c) => c.faction,
            Card::Spell(s) => s.faction,
        }
    }

    #[must_use]
    pub fn rarity(&self) -> Rarity {
        match self {
            Card::Creature(c) => c.rarity,
            Card::Spell(s) => s.rarity,
        }
    }

    #[must_use]
    pub fn is_creature(&self) -> bool {
        matches!(self, Card::Creature(_))
    }

    /// Deep copy with a fresh identity.
    #[must_use]
    pub fn clone_with_id(&self, id: CardId) -> Self {
        match self {
            Card::Creature(c) => Card::Creature(c.clone_with_id(id)),
            Card::Spell(s) => Card::Spell(s.clone_with_id(id)),
        }
    }
}
