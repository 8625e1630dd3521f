//! Player resources and zones.
//!
//! A `Player` owns its health, mana economy, and four card zones:
//! deck (ordered, front = next draw), hand (capacity 10), board
//! (capacity 7, creatures only), and graveyard (unbounded discard bin for
//! dead creatures and spent cards alike).
//!
//! Capacity policy is permissive: drawing into a full hand *burns* the
//! card instead of failing, and overspending mana clamps to zero instead
//! of erroring. Both are reported through counters, not errors.

use serde::{Deserialize, Serialize};

use crate::cards::{
    Card, CardId, CreatureCard, Faction, IdAllocator, SpellEffectKind, TargetKind,
};
use crate::error::ActionError;
use crate::events::{ActionReport, GameEvent};
use crate::session::PlayerSlot;

/// Maximum creatures on one player's board.
pub const MAX_BOARD_SIZE: usize = 7;
/// Maximum cards in hand; further draws burn.
pub const MAX_HAND_SIZE: usize = 10;
/// Starting and maximum hero health.
pub const STARTING_HEALTH: i32 = 30;
/// Hard cap on mana crystals.
pub const MAX_MANA: u32 = 10;

/// Counters returned from a draw call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOutcome {
    /// Cards that reached the hand.
    pub drawn: u32,
    /// Cards discarded off the deck because the hand was full.
    pub burned: u32,
    /// Total fatigue damage taken during this call.
    pub fatigue_damage: i32,
    /// Names of burned cards, in burn order.
    pub burned_names: Vec<String>,
}

/// One player's complete in-game state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Cosmetic tag; does not affect rules.
    pub faction: Faction,

    health: i32,
    max_health: i32,
    mana: u32,
    max_mana: u32,
    /// Permanent resource capacity, grown by one at each own turn start.
    mana_crystals: u32,

    pub deck: Vec<Card>,
    pub hand: Vec<Card>,
    pub board: Vec<CreatureCard>,
    pub graveyard: Vec<Card>,

    /// Escalating empty-deck draw counter.
    fatigue: u32,
    pub hero_power_used: bool,
}

impl Player {
    /// Create a player with full health, no mana, and empty zones.
    #[must_use]
    pub fn new(name: impl Into<String>, faction: Faction) -> Self {
        Self {
            name: name.into(),
            faction,
            health: STARTING_HEALTH,
            max_health: STARTING_HEALTH,
            mana: 0,
            max_mana: 0,
            mana_crystals: 0,
            deck: Vec::new(),
            hand: Vec::new(),
            board: Vec::new(),
            graveyard: Vec::new(),
            fatigue: 0,
            hero_power_used: false,
        }
    }

    /// Install a pre-built (already shuffled) deck.
    pub fn set_deck(&mut self, deck: Vec<Card>) {
        self.deck = deck;
    }

    // === Resources ===

    #[must_use]
    pub fn health(&self) -> i32 {
        self.health
    }

    #[must_use]
    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    #[must_use]
    pub fn mana(&self) -> u32 {
        self.mana
    }

    #[must_use]
    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    #[must_use]
    pub fn mana_crystals(&self) -> u32 {
        self.mana_crystals
    }

    #[must_use]
    pub fn fatigue(&self) -> u32 {
        self.fatigue
    }

    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    /// Apply damage to the hero, clamped at zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount.max(0)).max(0);
    }

    /// Heal the hero, clamped to max health.
    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount.max(0)).min(self.max_health);
    }

    /// Spend mana. Overspending silently drains to zero and is not
    /// treated as an error.
    pub fn spend_mana(&mut self, amount: u32) {
        self.mana = self.mana.saturating_sub(amount);
    }

    /// Start-of-turn mana refresh: grow the crystal count by one up to the
    /// cap, then fill both max and current mana to it.
    pub fn reset_mana(&mut self) {
        if self.mana_crystals < MAX_MANA {
            self.mana_crystals += 1;
        }
        self.max_mana = self.mana_crystals;
        self.mana = self.max_mana;
    }

    // === Draw / fatigue ===

    /// Draw `count` cards.
    ///
    /// Per draw: an empty deck triggers fatigue (counter increments, then
    /// that much damage is taken); a full hand burns the top deck card;
    /// otherwise the top card moves to hand.
    pub fn draw(&mut self, count: u32) -> DrawOutcome {
        let mut outcome = DrawOutcome::default();

        for _ in 0..count {
            if self.deck.is_empty() {
                self.fatigue += 1;
                let damage = self.fatigue as i32;
                self.take_damage(damage);
                outcome.fatigue_damage += damage;
                continue;
            }

            if self.hand.len() >= MAX_HAND_SIZE {
                let burned = self.deck.remove(0);
                outcome.burned += 1;
                outcome.burned_names.push(burned.name().to_string());
                continue;
            }

            let card = self.deck.remove(0);
            self.hand.push(card);
            outcome.drawn += 1;
        }

        outcome
    }

    // === Board queries ===

    #[must_use]
    pub fn has_taunt_creatures(&self) -> bool {
        self.board.iter().any(CreatureCard::is_taunt)
    }

    /// Creatures the opponent is forced to target.
    pub fn taunt_creatures(&self) -> impl Iterator<Item = &CreatureCard> {
        self.board.iter().filter(|c| c.is_taunt())
    }

    /// Creatures able to attack right now.
    pub fn attack_ready_creatures(&self) -> impl Iterator<Item = &CreatureCard> {
        self.board
            .iter()
            .filter(|c| c.can_attack && !c.exhausted && !c.frozen)
    }

    #[must_use]
    pub fn find_board(&self, card: CardId) -> Option<&CreatureCard> {
        self.board.iter().find(|c| c.id == card)
    }

    pub fn find_board_mut(&mut self, card: CardId) -> Option<&mut CreatureCard> {
        self.board.iter_mut().find(|c| c.id == card)
    }

    /// Additive bonus applied to damage spells, derived from active
    /// SpellDamage abilities on the board.
    #[must_use]
    pub fn spell_damage_bonus(&self) -> i32 {
        self.board.iter().map(CreatureCard::spell_damage).sum()
    }

    /// Start-of-turn housekeeping: clear the hero-power flag and reset
    /// every board creature's combat flags.
    pub fn start_turn_reset(&mut self) {
        self.hero_power_used = false;
        for creature in &mut self.board {
            creature.reset_for_new_turn();
        }
    }

    // === Playing cards ===

    /// Whether `card` could legally be played right now.
    #[must_use]
    pub fn can_play(&self, card: &Card) -> bool {
        if self.mana < card.mana_cost() {
            return false;
        }
        if card.is_creature() && self.board.len() >= MAX_BOARD_SIZE {
            return false;
        }
        self.hand.iter().any(|c| c.id() == card.id())
    }

    /// Play a card from hand.
    ///
    /// Fully transactional: every validation runs before any mutation, so
    /// a failure leaves mana, hand, and board untouched.
    ///
    /// Creatures are summoned as a fresh-id board copy (Charge grants
    /// immediate attack; otherwise the copy enters exhausted) while the
    /// hand instance moves to the graveyard. Damage/Heal spells resolve
    /// immediately against `target`; other spell kinds resolve as a logged
    /// no-op. Dead creatures are *not* removed here; the session runs the
    /// cleanup pass after every action.
    pub fn play(
        &mut self,
        my_slot: PlayerSlot,
        card_id: CardId,
        target: Option<CardId>,
        opponent: &mut Player,
        ids: &mut IdAllocator,
    ) -> Result<ActionReport, ActionError> {
        let hand_pos = self
            .hand
            .iter()
            .position(|c| c.id() == card_id)
            .ok_or(ActionError::CardNotInHand)?;

        let cost = self.hand[hand_pos].mana_cost();
        if self.mana < cost {
            return Err(ActionError::InsufficientMana {
                need: cost,
                have: self.mana,
            });
        }

        match &self.hand[hand_pos] {
            Card::Creature(_) => {
                if self.board.len() >= MAX_BOARD_SIZE {
                    return Err(ActionError::BoardFull);
                }
            }
            Card::Spell(spell) => {
                // Validate targeting before anything is spent. Damage and
                // Heal always resolve against a creature.
                let needs_target = matches!(
                    spell.effect.kind,
                    SpellEffectKind::Damage | SpellEffectKind::Heal
                );
                if needs_target {
                    let target_id = target.ok_or(ActionError::SpellNeedsTarget)?;
                    self.resolve_spell_target(spell.target, target_id, opponent)?;
                }
            }
        }

        // Validation done; commit.
        self.spend_mana(cost);
        let card = self.hand.remove(hand_pos);
        let mut report = ActionReport::new(String::new());
        report.push(GameEvent::CardPlayed {
            player: my_slot,
            card: card_id,
            name: card.name().to_string(),
        });

        match card {
            Card::Creature(ref creature) => {
                let mut summoned = creature.clone_with_id(ids.alloc());
                if summoned.has_charge() {
                    summoned.can_attack = true;
                    summoned.exhausted = false;
                } else {
                    summoned.can_attack = false;
                    summoned.exhausted = true;
                }

                report.message = format!("{} summons {}", self.name, summoned.name);
                report.push(GameEvent::CreatureSummoned {
                    player: my_slot,
                    card: summoned.id,
                    name: summoned.name.clone(),
                });

                self.board.push(summoned);
                self.graveyard.push(card);
            }
            Card::Spell(ref spell) => {
                report.message = match spell.effect.kind {
                    SpellEffectKind::Damage => {
                        let target_id = target.ok_or(ActionError::SpellNeedsTarget)?;
                        let bonus = self.spell_damage_bonus();
                        let total = spell.effect.magnitude + bonus;
                        let victim = self
                            .find_board_mut(target_id)
                            .or_else(|| opponent.find_board_mut(target_id))
                            .ok_or(ActionError::TargetNotFound)?;
                        let victim_name = victim.name.clone();
                        victim.take_damage(total, false);
                        format!("{} deals {total} damage to {victim_name}", spell.name)
                    }
                    SpellEffectKind::Heal => {
                        let target_id = target.ok_or(ActionError::SpellNeedsTarget)?;
                        let amount = spell.effect.magnitude;
                        let patient = self
                            .find_board_mut(target_id)
                            .or_else(|| opponent.find_board_mut(target_id))
                            .ok_or(ActionError::TargetNotFound)?;
                        let patient_name = patient.name.clone();
                        patient.heal(amount);
                        format!("{} heals {patient_name} for {amount}", spell.name)
                    }
                    // Not resolved by the minimal combat path.
                    _ => format!("{} is cast", spell.name),
                };
                self.graveyard.push(card);
            }
        }

        Ok(report)
    }

    /// Check that a spell target exists on a board the constraint allows.
    fn resolve_spell_target(
        &self,
        constraint: TargetKind,
        target: CardId,
        opponent: &Player,
    ) -> Result<(), ActionError> {
        let on_own = self.find_board(target).is_some();
        let on_enemy = opponent.find_board(target).is_some();
        let legal = match constraint {
            TargetKind::AnyCreature | TargetKind::NoTarget => on_own || on_enemy,
            TargetKind::FriendlyCreature => on_own,
            TargetKind::EnemyCreature => on_enemy,
        };
        if legal {
            Ok(())
        } else {
            Err(ActionError::TargetNotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{
        Ability, AbilityKind, AbilityTrigger, Rarity, SpellCard, SpellEffect,
    };

    fn creature_card(id: u32, name: &str, cost: u32, attack: i32, health: i32) -> Card {
        Card::Creature(CreatureCard::new(
            CardId::new(id),
            name,
            cost,
            attack,
            health,
            Faction::Humans,
            Rarity::Common,
        ))
    }

    fn damage_spell(id: u32, cost: u32, magnitude: i32) -> Card {
        Card::Spell(SpellCard::new(
            CardId::new(id),
            "Zap",
            cost,
            SpellEffect {
                kind: SpellEffectKind::Damage,
                magnitude,
            },
            Faction::Humans,
            TargetKind::AnyCreature,
        ))
    }

    fn ready_player() -> Player {
        let mut player = Player::new("Alice", Faction::Humans);
        // Ten turns of crystals.
        for _ in 0..10 {
            player.reset_mana();
        }
        player
    }

    #[test]
    fn test_draw_moves_top_card_to_hand() {
        let mut player = Player::new("Alice", Faction::Humans);
        player.set_deck(vec![creature_card(1, "C", 1, 1, 1)]);

        let outcome = player.draw(1);

        assert_eq!(outcome.drawn, 1);
        assert_eq!(outcome.burned, 0);
        assert_eq!(outcome.fatigue_damage, 0);
        assert_eq!(player.hand.len(), 1);
        assert!(player.deck.is_empty());
    }

    #[test]
    fn test_fatigue_escalates() {
        let mut player = Player::new("Alice", Faction::Humans);
        let start = player.health();

        let first = player.draw(1);
        assert_eq!(first.fatigue_damage, 1);
        assert_eq!(player.health(), start - 1);

        let second = player.draw(1);
        assert_eq!(second.fatigue_damage, 2);
        assert_eq!(player.health(), start - 3);
    }

    #[test]
    fn test_full_hand_burns_top_card() {
        let mut player = Player::new("Alice", Faction::Humans);
        for i in 0..MAX_HAND_SIZE as u32 {
            player.hand.push(creature_card(i, "Filler", 1, 1, 1));
        }
        player.set_deck(vec![
            creature_card(100, "A", 1, 1, 1),
            creature_card(101, "B", 1, 1, 1),
        ]);

        let outcome = player.draw(1);

        assert_eq!(outcome.burned, 1);
        assert_eq!(outcome.burned_names, vec!["A".to_string()]);
        assert_eq!(outcome.drawn, 0);
        assert_eq!(player.hand.len(), MAX_HAND_SIZE);
        assert_eq!(player.deck.len(), 1);
        assert_eq!(player.deck[0].name(), "B");
    }

    #[test]
    fn test_spend_mana_clamps_to_zero() {
        let mut player = Player::new("Alice", Faction::Humans);
        for _ in 0..5 {
            player.reset_mana();
        }
        assert_eq!(player.mana(), 5);

        player.spend_mana(3);
        assert_eq!(player.mana(), 2);

        player.spend_mana(5);
        assert_eq!(player.mana(), 0);
    }

    #[test]
    fn test_reset_mana_caps_at_ten() {
        let mut player = Player::new("Alice", Faction::Humans);
        for _ in 0..15 {
            player.reset_mana();
        }
        assert_eq!(player.mana_crystals(), MAX_MANA);
        assert_eq!(player.max_mana(), MAX_MANA);
        assert_eq!(player.mana(), MAX_MANA);
    }

    #[test]
    fn test_damage_and_heal_clamp() {
        let mut player = Player::new("Alice", Faction::Humans);
        player.take_damage(100);
        assert_eq!(player.health(), 0);
        assert!(player.is_defeated());

        player.heal(100);
        assert_eq!(player.health(), player.max_health());
    }

    #[test]
    fn test_play_summons_with_exhaustion() {
        let mut player = ready_player();
        let mut opponent = Player::new("Bob", Faction::Beasts);
        let mut ids = IdAllocator::new();
        player.hand.push(creature_card(1, "Grunt", 3, 2, 2));

        let report = player
            .play(PlayerSlot::One, CardId::new(1), None, &mut opponent, &mut ids)
            .unwrap();

        assert_eq!(player.board.len(), 1);
        assert!(player.board[0].exhausted);
        assert!(!player.board[0].can_attack);
        // Fresh id on the board copy; original went to the graveyard.
        assert_ne!(player.board[0].id, CardId::new(1));
        assert_eq!(player.graveyard.len(), 1);
        assert_eq!(player.mana(), 7);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::CreatureSummoned { .. })));
    }

    #[test]
    fn test_play_charge_attacks_immediately() {
        let mut player = ready_player();
        let mut opponent = Player::new("Bob", Faction::Beasts);
        let mut ids = IdAllocator::new();

        let charger = CreatureCard::new(
            CardId::new(1),
            "Rider",
            3,
            3,
            2,
            Faction::Humans,
            Rarity::Common,
        )
        .with_ability(Ability::new(AbilityKind::Charge, AbilityTrigger::Permanent));
        player.hand.push(Card::Creature(charger));

        player
            .play(PlayerSlot::One, CardId::new(1), None, &mut opponent, &mut ids)
            .unwrap();

        assert!(player.board[0].can_attack);
        assert!(!player.board[0].exhausted);
    }

    #[test]
    fn test_play_insufficient_mana_is_transactional() {
        let mut player = Player::new("Alice", Faction::Humans);
        player.reset_mana(); // 1 mana
        let mut opponent = Player::new("Bob", Faction::Beasts);
        let mut ids = IdAllocator::new();
        player.hand.push(creature_card(1, "Giant", 8, 8, 8));

        let err = player
            .play(PlayerSlot::One, CardId::new(1), None, &mut opponent, &mut ids)
            .unwrap_err();

        assert_eq!(err, ActionError::InsufficientMana { need: 8, have: 1 });
        assert_eq!(player.hand.len(), 1);
        assert_eq!(player.mana(), 1);
        assert!(player.board.is_empty());
    }

    #[test]
    fn test_play_card_not_in_hand() {
        let mut player = ready_player();
        let mut opponent = Player::new("Bob", Faction::Beasts);
        let mut ids = IdAllocator::new();

        let err = player
            .play(PlayerSlot::One, CardId::new(42), None, &mut opponent, &mut ids)
            .unwrap_err();
        assert_eq!(err, ActionError::CardNotInHand);
    }

    #[test]
    fn test_play_board_full() {
        let mut player = ready_player();
        let mut opponent = Player::new("Bob", Faction::Beasts);
        let mut ids = IdAllocator::new();

        for i in 0..MAX_BOARD_SIZE as u32 {
            player.board.push(CreatureCard::new(
                CardId::new(100 + i),
                "Filler",
                1,
                1,
                1,
                Faction::Humans,
                Rarity::Common,
            ));
        }
        player.hand.push(creature_card(1, "One Too Many", 1, 1, 1));

        let err = player
            .play(PlayerSlot::One, CardId::new(1), None, &mut opponent, &mut ids)
            .unwrap_err();
        assert_eq!(err, ActionError::BoardFull);
        assert_eq!(player.board.len(), MAX_BOARD_SIZE);
    }

    #[test]
    fn test_damage_spell_applies_bonus() {
        let mut player = ready_player();
        let mut opponent = Player::new("Bob", Faction::Beasts);
        let mut ids = IdAllocator::new();

        // +1 spell damage on the board.
        player.board.push(
            CreatureCard::new(
                CardId::new(50),
                "Sprite",
                2,
                1,
                2,
                Faction::Mythical,
                Rarity::Common,
            )
            .with_ability(Ability::with_magnitude(
                AbilityKind::SpellDamage,
                AbilityTrigger::Permanent,
                1,
            )),
        );

        opponent.board.push(CreatureCard::new(
            CardId::new(60),
            "Target",
            5,
            5,
            10,
            Faction::Beasts,
            Rarity::Common,
        ));

        player.hand.push(damage_spell(1, 2, 3));
        player
            .play(
                PlayerSlot::One,
                CardId::new(1),
                Some(CardId::new(60)),
                &mut opponent,
                &mut ids,
            )
            .unwrap();

        // 3 base + 1 bonus.
        assert_eq!(opponent.board[0].health, 6);
        // Spell went to the caster's graveyard.
        assert_eq!(player.graveyard.len(), 1);
    }

    #[test]
    fn test_damage_spell_without_target_fails_clean() {
        let mut player = ready_player();
        let mut opponent = Player::new("Bob", Faction::Beasts);
        let mut ids = IdAllocator::new();
        player.hand.push(damage_spell(1, 2, 3));

        let err = player
            .play(PlayerSlot::One, CardId::new(1), None, &mut opponent, &mut ids)
            .unwrap_err();

        assert_eq!(err, ActionError::SpellNeedsTarget);
        assert_eq!(player.hand.len(), 1);
        assert_eq!(player.mana(), 10);
    }

    #[test]
    fn test_heal_spell_clamps_to_max_health() {
        let mut player = ready_player();
        let mut opponent = Player::new("Bob", Faction::Beasts);
        let mut ids = IdAllocator::new();

        let mut wounded = CreatureCard::new(
            CardId::new(50),
            "Veteran",
            3,
            3,
            6,
            Faction::Humans,
            Rarity::Common,
        );
        wounded.take_damage(2, false);
        player.board.push(wounded);

        player.hand.push(Card::Spell(SpellCard::new(
            CardId::new(1),
            "Mend",
            2,
            SpellEffect {
                kind: SpellEffectKind::Heal,
                magnitude: 9,
            },
            Faction::Humans,
            TargetKind::FriendlyCreature,
        )));

        player
            .play(
                PlayerSlot::One,
                CardId::new(1),
                Some(CardId::new(50)),
                &mut opponent,
                &mut ids,
            )
            .unwrap();

        assert_eq!(player.board[0].health, 6);
    }

    #[test]
    fn test_can_play_checks_all_conditions() {
        let mut player = Player::new("Alice", Faction::Humans);
        player.reset_mana();
        player.reset_mana();
        player.reset_mana(); // 3 mana

        let affordable = creature_card(1, "Cheap", 2, 1, 1);
        let expensive = creature_card(2, "Pricey", 9, 9, 9);
        player.hand.push(affordable.clone());
        player.hand.push(expensive.clone());

        assert!(player.can_play(&affordable));
        assert!(!player.can_play(&expensive));

        let not_in_hand = creature_card(3, "Ghost", 1, 1, 1);
        assert!(!player.can_play(&not_in_hand));
    }
}
