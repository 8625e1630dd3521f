//! The static card catalog.
//!
//! The catalog holds immutable card templates. The engine treats them as
//! opaque data to clone from: instantiating a template stamps a fresh
//! session id onto a deep copy. Templates themselves carry a placeholder
//! id and never enter play directly.

use rustc_hash::FxHashMap;

use super::ability::{Ability, AbilityKind, AbilityTrigger};
use super::card::{
    Card, CardId, CreatureCard, Faction, IdAllocator, Rarity, SpellCard, SpellEffect,
    SpellEffectKind, TargetKind,
};
use crate::error::ActionError;
use crate::rng::GameRng;

/// Copies of each faction template in a starter deck.
const STARTER_DECK_COPIES: usize = 2;

/// Immutable card template store with name lookup.
#[derive(Clone, Debug)]
pub struct CardCatalog {
    templates: Vec<Card>,
    by_name: FxHashMap<String, usize>,
}

impl CardCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// The standard card set.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for card in standard_set() {
            catalog.register(card);
        }
        catalog
    }

    /// Register a template. Later registrations shadow earlier ones with
    /// the same name.
    pub fn register(&mut self, card: Card) {
        self.by_name.insert(card.name().to_string(), self.templates.len());
        self.templates.push(card);
    }

    /// Look up a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Card> {
        self.by_name.get(name).map(|&i| &self.templates[i])
    }

    /// All templates.
    pub fn templates(&self) -> impl Iterator<Item = &Card> {
        self.templates.iter()
    }

    /// Clone a template into a playable instance with a fresh id.
    ///
    /// A name the catalog has never seen is a content defect; it is
    /// surfaced as a failed action rather than a panic.
    pub fn instantiate(&self, name: &str, ids: &mut IdAllocator) -> Result<Card, ActionError> {
        self.get(name)
            .map(|card| card.clone_with_id(ids.alloc()))
            .ok_or(ActionError::UnknownCard)
    }

    /// Build a shuffled starter deck for a faction.
    ///
    /// Takes every template of the faction (plus the neutral spells that
    /// belong to it), clones `STARTER_DECK_COPIES` of each with fresh
    /// ids, and shuffles the result. Front of the vec is the next draw.
    #[must_use]
    pub fn starter_deck(
        &self,
        faction: Faction,
        ids: &mut IdAllocator,
        rng: &mut GameRng,
    ) -> Vec<Card> {
        let mut deck = Vec::new();
        for template in self.templates.iter().filter(|c| c.faction() == faction) {
            for _ in 0..STARTER_DECK_COPIES {
                deck.push(template.clone_with_id(ids.alloc()));
            }
        }
        rng.shuffle(&mut deck);
        deck
    }
}

impl Default for CardCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn creature(
    name: &str,
    cost: u32,
    attack: i32,
    health: i32,
    faction: Faction,
    rarity: Rarity,
) -> CreatureCard {
    // Template id 0 is a placeholder; instantiate() stamps the real one.
    CreatureCard::new(CardId::new(0), name, cost, attack, health, faction, rarity)
}

fn spell(
    name: &str,
    cost: u32,
    kind: SpellEffectKind,
    magnitude: i32,
    faction: Faction,
    target: TargetKind,
) -> SpellCard {
    SpellCard::new(
        CardId::new(0),
        name,
        cost,
        SpellEffect { kind, magnitude },
        faction,
        target,
    )
}

fn ability(kind: AbilityKind) -> Ability {
    let trigger = match kind {
        AbilityKind::DivineShield => AbilityTrigger::OnDamage,
        AbilityKind::Lifesteal | AbilityKind::Poison => AbilityTrigger::OnAttack,
        AbilityKind::Reborn | AbilityKind::Deathrattle => AbilityTrigger::OnDeath,
        _ => AbilityTrigger::Permanent,
    };
    Ability::new(kind, trigger)
}

/// The built-in card set, a few templates per faction.
fn standard_set() -> Vec<Card> {
    vec![
        // === Humans ===
        Card::Creature(creature("Young Dragon", 4, 3, 5, Faction::Humans, Rarity::Common)),
        Card::Creature(creature("Berserker", 3, 4, 2, Faction::Humans, Rarity::Common)),
        Card::Creature(creature("Field Medic", 2, 1, 3, Faction::Humans, Rarity::Common)),
        Card::Creature(
            creature("Mountain Warden", 2, 2, 3, Faction::Humans, Rarity::Common)
                .with_ability(ability(AbilityKind::Taunt)),
        ),
        Card::Creature(
            creature("Flameshield Bearer", 1, 1, 2, Faction::Humans, Rarity::Common)
                .with_ability(ability(AbilityKind::DivineShield)),
        ),
        Card::Creature(
            creature("Captain Argus", 4, 4, 5, Faction::Humans, Rarity::Rare)
                .with_ability(ability(AbilityKind::Taunt)),
        ),
        Card::Creature(
            creature("Dawn Marksman", 3, 3, 2, Faction::Humans, Rarity::Rare)
                .with_ability(ability(AbilityKind::Charge)),
        ),
        Card::Creature(
            creature("Phoenix Lord", 6, 5, 6, Faction::Humans, Rarity::Epic)
                .with_ability(ability(AbilityKind::Reborn)),
        ),
        Card::Spell(
            spell("Fireball", 4, SpellEffectKind::Damage, 6, Faction::Humans, TargetKind::AnyCreature)
                .with_description("Deal 6 damage to a creature"),
        ),
        Card::Spell(
            spell("Healing Light", 2, SpellEffectKind::Heal, 8, Faction::Humans, TargetKind::FriendlyCreature)
                .with_description("Restore 8 health to a creature"),
        ),

        // === Beasts ===
        Card::Creature(creature("Thunder Boar", 3, 4, 3, Faction::Beasts, Rarity::Common)),
        Card::Creature(
            creature("Moon Lynx", 2, 3, 2, Faction::Beasts, Rarity::Common)
                .with_ability(ability(AbilityKind::Charge)),
        ),
        Card::Creature(creature("Shadow Wolf Pup", 1, 2, 1, Faction::Beasts, Rarity::Common)),
        Card::Creature(
            creature("Old Bear Lord", 5, 4, 7, Faction::Beasts, Rarity::Rare)
                .with_ability(ability(AbilityKind::Taunt)),
        ),
        Card::Creature(
            creature("Carrion Raven", 4, 3, 3, Faction::Beasts, Rarity::Rare)
                .with_ability(ability(AbilityKind::Poison)),
        ),
        Card::Creature(
            creature("Thunderwing", 7, 6, 8, Faction::Beasts, Rarity::Epic)
                .with_ability(ability(AbilityKind::Windfury)),
        ),
        Card::Spell(
            spell("Savage Bite", 3, SpellEffectKind::Damage, 4, Faction::Beasts, TargetKind::AnyCreature)
                .with_description("Deal 4 damage to a creature"),
        ),

        // === Mythical ===
        Card::Creature(creature("Fire Salamander", 1, 2, 1, Faction::Mythical, Rarity::Common)),
        Card::Creature(
            creature("Forest Sprite", 2, 1, 2, Faction::Mythical, Rarity::Common).with_ability(
                Ability::with_magnitude(AbilityKind::SpellDamage, AbilityTrigger::Permanent, 1),
            ),
        ),
        Card::Creature(
            creature("Snow Siren", 2, 1, 3, Faction::Mythical, Rarity::Common)
                .with_ability(ability(AbilityKind::Freeze)),
        ),
        Card::Creature(
            creature("Steppe Griffin", 4, 4, 3, Faction::Mythical, Rarity::Rare)
                .with_ability(ability(AbilityKind::Charge)),
        ),
        Card::Creature(
            creature("Moon Unicorn", 5, 3, 5, Faction::Mythical, Rarity::Rare)
                .with_ability(ability(AbilityKind::Lifesteal)),
        ),
        Card::Creature(
            creature("Phoenix of Embers", 8, 7, 7, Faction::Mythical, Rarity::Epic)
                .with_ability(ability(AbilityKind::Reborn)),
        ),
        Card::Spell(
            spell("Arcane Surge", 3, SpellEffectKind::Damage, 3, Faction::Mythical, TargetKind::AnyCreature)
                .with_description("Deal 3 damage to a creature"),
        ),

        // === Elements ===
        Card::Creature(creature("Spark Whisper", 1, 2, 1, Faction::Elements, Rarity::Common)),
        Card::Creature(creature("Sand Hopper", 2, 3, 2, Faction::Elements, Rarity::Common)),
        Card::Creature(
            creature("Stone Bastion", 3, 1, 6, Faction::Elements, Rarity::Common)
                .with_ability(ability(AbilityKind::Taunt)),
        ),
        Card::Creature(
            creature("Frost Warden", 4, 3, 5, Faction::Elements, Rarity::Rare)
                .with_ability(ability(AbilityKind::Freeze)),
        ),
        Card::Creature(
            creature("Fire Vortex", 5, 4, 4, Faction::Elements, Rarity::Rare)
                .with_ability(ability(AbilityKind::DivineShield)),
        ),
        Card::Creature(
            creature("Tidal Colossus", 9, 8, 10, Faction::Elements, Rarity::Epic)
                .with_ability(ability(AbilityKind::Taunt)),
        ),
        Card::Spell(
            spell("Stone Skin", 1, SpellEffectKind::Buff, 2, Faction::Elements, TargetKind::FriendlyCreature)
                .with_description("Toughen a friendly creature"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_lookup() {
        let catalog = CardCatalog::standard();

        let fireball = catalog.get("Fireball").unwrap();
        assert_eq!(fireball.mana_cost(), 4);
        assert!(!fireball.is_creature());

        assert!(catalog.get("Nonexistent Card").is_none());
    }

    #[test]
    fn test_instantiate_gets_fresh_ids() {
        let catalog = CardCatalog::standard();
        let mut ids = IdAllocator::new();

        let a = catalog.instantiate("Young Dragon", &mut ids).unwrap();
        let b = catalog.instantiate("Young Dragon", &mut ids).unwrap();

        assert_ne!(a.id(), b.id());
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn test_instantiate_unknown_name_is_an_error() {
        let catalog = CardCatalog::standard();
        let mut ids = IdAllocator::new();

        let err = catalog.instantiate("Nonexistent Card", &mut ids).unwrap_err();
        assert_eq!(err, ActionError::UnknownCard);
    }

    #[test]
    fn test_starter_deck_is_faction_pure() {
        let catalog = CardCatalog::standard();
        let mut ids = IdAllocator::new();
        let mut rng = GameRng::new(42);

        let deck = catalog.starter_deck(Faction::Beasts, &mut ids, &mut rng);

        assert!(!deck.is_empty());
        assert!(deck.iter().all(|c| c.faction() == Faction::Beasts));

        // Every instance is unique.
        let mut seen: Vec<_> = deck.iter().map(Card::id).collect();
        seen.sort_by_key(|id| id.0);
        seen.dedup();
        assert_eq!(seen.len(), deck.len());
    }

    #[test]
    fn test_starter_deck_shuffle_is_seeded() {
        let catalog = CardCatalog::standard();

        let mut ids1 = IdAllocator::new();
        let mut rng1 = GameRng::new(7);
        let deck1 = catalog.starter_deck(Faction::Humans, &mut ids1, &mut rng1);

        let mut ids2 = IdAllocator::new();
        let mut rng2 = GameRng::new(7);
        let deck2 = catalog.starter_deck(Faction::Humans, &mut ids2, &mut rng2);

        let names1: Vec<_> = deck1.iter().map(Card::name).collect();
        let names2: Vec<_> = deck2.iter().map(Card::name).collect();
        assert_eq!(names1, names2);
    }
}
