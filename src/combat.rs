//! The combat resolver.
//!
//! Resolves one validated attack: creature vs creature or creature vs
//! hero. Session-level validation (game status, controller, exhaustion,
//! freeze, Taunt) happens before this module is reached; the resolver
//! enforces only the target rule it owns (the defender must be on the
//! opponent's board) and then applies damage.
//!
//! ## Ability interactions
//!
//! - **Poison**: with attack > 0, damage equal to the defender's current
//!   health, piercing Divine Shield. Always lethal; the victim's
//!   counter-attack still lands.
//! - **Divine Shield**: absorbs one normal hit, then is consumed.
//!   Absorption is not death and fires no death processing.
//! - **Lifesteal**: on a hero attack, heals the attacker's controller by
//!   the attack value before the damage lands.
//! - **Reborn**: handled in the cleanup pass, see below.

use crate::cards::{AbilityKind, Card, CardId, IdAllocator};
use crate::error::ActionError;
use crate::events::{ActionReport, GameEvent};
use crate::player::{Player, MAX_BOARD_SIZE};
use crate::session::PlayerSlot;

/// Resolve one attack for the current player.
///
/// `defender` of `None` means the opposing hero. The attacker is marked
/// exhausted regardless of outcome; after a creature exchange, the cleanup
/// pass removes the dead and fires their death processing.
pub(crate) fn resolve_attack(
    current: &mut Player,
    opponent: &mut Player,
    current_slot: PlayerSlot,
    attacker_id: CardId,
    defender_id: Option<CardId>,
    ids: &mut IdAllocator,
) -> Result<ActionReport, ActionError> {
    match defender_id {
        None => attack_hero(current, opponent, current_slot, attacker_id),
        Some(defender) => {
            attack_creature(current, opponent, current_slot, attacker_id, defender, ids)
        }
    }
}

/// Creature attacks the opposing hero.
fn attack_hero(
    current: &mut Player,
    opponent: &mut Player,
    current_slot: PlayerSlot,
    attacker_id: CardId,
) -> Result<ActionReport, ActionError> {
    let attacker = current
        .find_board(attacker_id)
        .ok_or(ActionError::NotYourCreature)?;
    let damage = attacker.attack;
    let lifesteal = attacker.has_ability(AbilityKind::Lifesteal);
    let attacker_name = attacker.name.clone();

    let mut report = ActionReport::new(format!(
        "{attacker_name} attacks {} for {damage} damage",
        opponent.name
    ));
    report.push(GameEvent::Attacked {
        attacker: attacker_id,
        defender: None,
    });

    // Both reads use the pre-mutation attack value, so heal-then-damage
    // order does not change the totals.
    if lifesteal {
        current.heal(damage);
        report.push(GameEvent::HeroHealed {
            player: current_slot,
            amount: damage,
        });
    }

    opponent.take_damage(damage);
    report.push(GameEvent::HeroDamaged {
        player: current_slot.opponent(),
        amount: damage,
    });

    if let Some(attacker) = current.find_board_mut(attacker_id) {
        attacker.exhaust();
    }

    Ok(report)
}

/// Creature attacks a creature, with a symmetric counter-attack.
fn attack_creature(
    current: &mut Player,
    opponent: &mut Player,
    current_slot: PlayerSlot,
    attacker_id: CardId,
    defender_id: CardId,
    ids: &mut IdAllocator,
) -> Result<ActionReport, ActionError> {
    let attacker = current
        .find_board(attacker_id)
        .ok_or(ActionError::NotYourCreature)?;
    let attacker_damage = attacker.attack;
    let attacker_poison = attacker.has_ability(AbilityKind::Poison);
    let attacker_name = attacker.name.clone();

    let defender = opponent
        .find_board_mut(defender_id)
        .ok_or(ActionError::TargetNotFound)?;
    let defender_damage = defender.attack;
    let defender_poison = defender.has_ability(AbilityKind::Poison);
    let defender_name = defender.name.clone();

    let mut report = ActionReport::new(format!("{attacker_name} attacks {defender_name}"));
    report.push(GameEvent::Attacked {
        attacker: attacker_id,
        defender: Some(defender_id),
    });

    // Poison kills outright: damage equal to the defender's own current
    // health, piercing Divine Shield.
    let poison_kill = attacker_poison && attacker_damage > 0;
    if poison_kill {
        let lethal = defender.health;
        defender.take_damage(lethal, true);
        report.message = format!("{attacker_name} poisons {defender_name}");
    } else {
        defender.take_damage(attacker_damage, false);
    }

    // The counter lands if the defender survived the hit, or if Poison
    // felled it (the hit and the counter are simultaneous). Only a
    // normal lethal hit silences the counter.
    let defender_alive = opponent
        .find_board(defender_id)
        .map(|d| !d.is_dead())
        .unwrap_or(false);
    if (defender_alive || poison_kill) && defender_damage > 0 {
        // Attacker still on board; nothing has removed it yet.
        if let Some(attacker) = current.find_board_mut(attacker_id) {
            if defender_poison {
                let lethal = attacker.health;
                attacker.take_damage(lethal, true);
            } else {
                attacker.take_damage(defender_damage, false);
            }
        }
    }

    if let Some(attacker) = current.find_board_mut(attacker_id) {
        attacker.exhaust();
    }

    let deaths = cleanup_deaths(current, opponent, current_slot, ids);
    for event in deaths {
        report.push(event);
    }

    Ok(report)
}

/// Remove every creature with health <= 0 from both boards into its
/// owner's graveyard and fire death processing.
///
/// The current player's board is swept first, then the opponent's.
pub(crate) fn cleanup_deaths(
    current: &mut Player,
    opponent: &mut Player,
    current_slot: PlayerSlot,
    ids: &mut IdAllocator,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let mut reborn_queue = Vec::new();

    sweep_board(current, current_slot, &mut events, &mut reborn_queue, ids);
    sweep_board(
        opponent,
        current_slot.opponent(),
        &mut events,
        &mut reborn_queue,
        ids,
    );

    // Reborn clones enter the current player's board.
    for clone in reborn_queue {
        if current.board.len() >= MAX_BOARD_SIZE {
            // No room; the rebirth fizzles.
            continue;
        }
        events.push(GameEvent::CreatureReborn {
            player: current_slot,
            card: clone.id,
            name: clone.name.clone(),
        });
        current.board.push(clone);
    }

    events
}

/// Move one board's dead creatures to the graveyard, queueing Reborn
/// clones for re-summoning.
fn sweep_board(
    player: &mut Player,
    slot: PlayerSlot,
    events: &mut Vec<GameEvent>,
    reborn_queue: &mut Vec<crate::cards::CreatureCard>,
    ids: &mut IdAllocator,
) {
    let mut index = 0;
    while index < player.board.len() {
        if !player.board[index].is_dead() {
            index += 1;
            continue;
        }

        let dead = player.board.remove(index);
        events.push(GameEvent::CreatureDied {
            player: slot,
            card: dead.id,
            name: dead.name.clone(),
        });

        if dead.has_ability(AbilityKind::Reborn) {
            // Clone at 1 health, exhausted, and without Reborn so a
            // second death stays dead.
            let mut clone = dead.clone_with_id(ids.alloc());
            clone.health = 1;
            clone.exhausted = true;
            clone.can_attack = false;
            clone.remove_ability(AbilityKind::Reborn);
            reborn_queue.push(clone);
        }

        player.graveyard.push(Card::Creature(dead));
    }
}
