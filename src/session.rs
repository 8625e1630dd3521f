//! Game session and turn state machine.
//!
//! `GameSession` is the top-level orchestrator: it exclusively owns both
//! players, sequences turns, validates and dispatches actions, keeps the
//! bounded session log, and detects terminal states. All mutation goes
//! through its methods; external collaborators only read snapshots
//! between actions.
//!
//! ## State machine
//!
//! `Active -> {Player1Wins, Player2Wins, Draw}` (terminal, one-shot) or
//! `Active -> Saved -> (restore) -> Active`. A session starts Active on
//! turn 1 with player one active.

use serde::{Deserialize, Serialize};

use crate::cards::{CardCatalog, CardId, Faction, IdAllocator};
use crate::combat;
use crate::error::ActionError;
use crate::events::{ActionReport, GameEvent};
use crate::player::{DrawOutcome, Player};
use crate::rng::GameRng;

/// Most recent log entries kept; older ones are evicted.
pub const MAX_LOG_ENTRIES: usize = 100;

/// Which seat a player occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    /// The other seat.
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }

    #[must_use]
    fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }
}

impl std::fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerSlot::One => write!(f, "Player 1"),
            PlayerSlot::Two => write!(f, "Player 2"),
        }
    }
}

/// Session status. Win/draw states are terminal and one-shot; `Saved` is
/// a pause state a snapshot restore leaves again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Active,
    Player1Wins,
    Player2Wins,
    Draw,
    Saved,
}

impl GameStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GameStatus::Player1Wins | GameStatus::Player2Wins | GameStatus::Draw
        )
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Active => write!(f, "active"),
            GameStatus::Player1Wins => write!(f, "player 1 wins"),
            GameStatus::Player2Wins => write!(f, "player 2 wins"),
            GameStatus::Draw => write!(f, "draw"),
            GameStatus::Saved => write!(f, "saved"),
        }
    }
}

/// A two-player match.
pub struct GameSession {
    /// Opaque session identity (the construction seed).
    pub(crate) id: u64,
    pub(crate) players: [Player; 2],
    pub(crate) active: PlayerSlot,
    pub(crate) turn_number: u32,
    pub(crate) status: GameStatus,
    /// Logical creation stamp: the tick of the construction log entry.
    pub(crate) created_at: u64,
    /// Bumped on every log/action; doubles as the log sequence stamp.
    pub(crate) last_updated: u64,
    pub(crate) log: im::Vector<String>,
    pub(crate) ids: IdAllocator,
    pub(crate) rng: GameRng,
    /// Single-action-at-a-time guard; overlapping calls fail fast.
    pub(crate) in_flight: bool,
}

impl GameSession {
    /// Create a session from two pre-constructed players (decks already
    /// shuffled). Deals the opening hands: 3 cards to the starting
    /// player, 4 to the opponent.
    #[must_use]
    pub fn from_players(player1: Player, player2: Player, seed: u64) -> Self {
        let mut session = Self {
            id: seed,
            players: [player1, player2],
            active: PlayerSlot::One,
            turn_number: 1,
            status: GameStatus::Active,
            created_at: 0,
            last_updated: 0,
            log: im::Vector::new(),
            ids: IdAllocator::new(),
            rng: GameRng::new(seed),
            in_flight: false,
        };

        session.log(format!(
            "Game start: {} vs {}",
            session.players[0].name, session.players[1].name
        ));
        session.created_at = session.last_updated;
        session.players[0].draw(3);
        session.players[1].draw(4);
        let second = session.players[1].name.clone();
        session.log(format!("{second} draws an extra card"));

        session
    }

    /// Convenience constructor: build both players with shuffled starter
    /// decks from the catalog, then deal.
    #[must_use]
    pub fn start(
        name1: impl Into<String>,
        faction1: Faction,
        name2: impl Into<String>,
        faction2: Faction,
        catalog: &CardCatalog,
        seed: u64,
    ) -> Self {
        let mut ids = IdAllocator::new();
        let mut rng = GameRng::new(seed);

        let mut player1 = Player::new(name1, faction1);
        player1.set_deck(catalog.starter_deck(faction1, &mut ids, &mut rng));
        let mut player2 = Player::new(name2, faction2);
        player2.set_deck(catalog.starter_deck(faction2, &mut ids, &mut rng));

        let mut session = Self::from_players(player1, player2, seed);
        // Continue allocating past the deck ids, on the same stream.
        session.ids = ids;
        session.rng = rng;
        session
    }

    // === Accessors ===

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub fn active_slot(&self) -> PlayerSlot {
        self.active
    }

    #[must_use]
    pub fn player(&self, slot: PlayerSlot) -> &Player {
        &self.players[slot.index()]
    }

    #[must_use]
    pub fn active_player(&self) -> &Player {
        self.player(self.active)
    }

    #[must_use]
    pub fn opponent_player(&self) -> &Player {
        self.player(self.active.opponent())
    }

    /// The session log, newest entry last.
    #[must_use]
    pub fn log_entries(&self) -> &im::Vector<String> {
        &self.log
    }

    /// One-line summary of the match state.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} ({} HP) vs {} ({} HP) - Turn {}",
            self.players[0].name,
            self.players[0].health(),
            self.players[1].name,
            self.players[1].health(),
            self.turn_number
        )
    }

    /// Append a log entry, evicting the oldest past the cap.
    pub fn log(&mut self, message: impl Into<String>) {
        self.last_updated += 1;
        self.log.push_back(format!("[{}] {}", self.last_updated, message.into()));
        while self.log.len() > MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
    }

    /// Split mutable access into (active, opponent).
    fn split_active_mut(&mut self) -> (&mut Player, &mut Player) {
        let [one, two] = &mut self.players;
        match self.active {
            PlayerSlot::One => (one, two),
            PlayerSlot::Two => (two, one),
        }
    }

    // === Turn sequencing ===

    /// Begin the active player's turn: grow and refill mana, draw one
    /// card, clear the hero-power flag, and reset board creatures.
    pub fn start_turn(&mut self) -> Result<ActionReport, ActionError> {
        if self.status != GameStatus::Active {
            return Err(ActionError::GameNotActive);
        }

        let active_slot = self.active;
        let mut report = ActionReport::new(String::new());
        report.push(GameEvent::TurnStarted {
            turn: self.turn_number,
            player: active_slot,
        });

        {
            let (active, _) = self.split_active_mut();
            active.reset_mana();
            let outcome = active.draw(1);
            active.start_turn_reset();
            push_draw_events(&mut report, active_slot, &outcome);
        }

        let active = self.active_player();
        report.message = format!(
            "{} begins turn {} (mana {}/{})",
            active.name,
            self.turn_number,
            active.mana(),
            active.max_mana()
        );

        self.log(format!("=== Turn {} ===", self.turn_number));
        let line = report.message.clone();
        self.log(line);
        self.log_report_events(&report);

        // Fatigue draws can be lethal.
        if let Some(event) = self.check_game_over() {
            report.push(event);
        }

        Ok(report)
    }

    /// End the active player's turn and start the opponent's.
    pub fn end_turn(&mut self) -> Result<ActionReport, ActionError> {
        if self.in_flight {
            return Err(ActionError::ActionInProgress);
        }
        if self.status != GameStatus::Active {
            return Err(ActionError::GameNotActive);
        }

        self.in_flight = true;
        let name = self.active_player().name.clone();
        self.log(format!("{name} ends the turn"));

        {
            let (active, _) = self.split_active_mut();
            active.hero_power_used = false;
        }

        self.active = self.active.opponent();
        self.turn_number += 1;
        self.in_flight = false;

        let mut report = self.start_turn()?;
        if !report.game_ended() {
            if let Some(event) = self.check_game_over() {
                report.push(event);
            }
        }
        Ok(report)
    }

    // === Actions ===

    /// Play a card from the active player's hand.
    pub fn play_card(
        &mut self,
        card: CardId,
        target: Option<CardId>,
    ) -> Result<ActionReport, ActionError> {
        if self.in_flight {
            return Err(ActionError::ActionInProgress);
        }
        if self.status != GameStatus::Active {
            return Err(ActionError::GameNotActive);
        }

        self.in_flight = true;
        let result = self.play_card_inner(card, target);
        self.in_flight = false;

        match &result {
            Ok(report) => {
                let line = report.message.clone();
                self.log(line);
                self.log_report_events(report);
            }
            Err(err) => self.log(format!("Error: {err}")),
        }
        result
    }

    fn play_card_inner(
        &mut self,
        card: CardId,
        target: Option<CardId>,
    ) -> Result<ActionReport, ActionError> {
        let active_slot = self.active;
        let mut report = {
            let ids = &mut self.ids;
            let [one, two] = &mut self.players;
            let (active, opponent) = match active_slot {
                PlayerSlot::One => (one, two),
                PlayerSlot::Two => (two, one),
            };
            let mut report = active.play(active_slot, card, target, opponent, ids)?;

            // Spells can kill; sweep both boards.
            let deaths = combat::cleanup_deaths(active, opponent, active_slot, ids);
            for event in deaths {
                report.push(event);
            }
            report
        };

        if let Some(event) = self.check_game_over() {
            report.push(event);
        }
        Ok(report)
    }

    /// Attack with a creature of the active player. `defender` of `None`
    /// targets the opposing hero.
    pub fn attack(
        &mut self,
        attacker: CardId,
        defender: Option<CardId>,
    ) -> Result<ActionReport, ActionError> {
        if self.in_flight {
            return Err(ActionError::ActionInProgress);
        }
        if self.status != GameStatus::Active {
            return Err(ActionError::GameNotActive);
        }

        // Validate before taking the guard; all checks are read-only.
        self.validate_attack(attacker, defender)?;

        self.in_flight = true;
        let result = {
            let ids = &mut self.ids;
            let [one, two] = &mut self.players;
            let (active, opponent) = match self.active {
                PlayerSlot::One => (one, two),
                PlayerSlot::Two => (two, one),
            };
            combat::resolve_attack(active, opponent, self.active, attacker, defender, ids)
        };
        self.in_flight = false;

        match result {
            Ok(mut report) => {
                let line = report.message.clone();
                self.log(line);
                self.log_report_events(&report);
                if let Some(event) = self.check_game_over() {
                    report.push(event);
                }
                Ok(report)
            }
            Err(err) => {
                self.log(format!("Error: {err}"));
                Err(err)
            }
        }
    }

    /// Attack validation, in order: controller, attack permission,
    /// freeze, Taunt.
    fn validate_attack(
        &self,
        attacker: CardId,
        defender: Option<CardId>,
    ) -> Result<(), ActionError> {
        let active = self.active_player();
        let opponent = self.opponent_player();

        let creature = active
            .find_board(attacker)
            .ok_or(ActionError::NotYourCreature)?;

        if !creature.can_attack || creature.exhausted {
            return Err(ActionError::CannotAttack);
        }
        if creature.frozen {
            return Err(ActionError::Frozen);
        }

        if opponent.has_taunt_creatures() {
            let defender_is_taunt = defender
                .and_then(|id| opponent.find_board(id))
                .map(|c| c.is_taunt())
                .unwrap_or(false);
            if !defender_is_taunt {
                let names: Vec<_> = opponent
                    .taunt_creatures()
                    .map(|c| c.name.clone())
                    .collect();
                return Err(ActionError::MustAttackTaunt {
                    names: names.join(", "),
                });
            }
        }

        Ok(())
    }

    // === Terminal detection ===

    /// Re-evaluate terminal conditions. The transition is one-shot: if
    /// the status already matches, nothing is logged or fired again.
    fn check_game_over(&mut self) -> Option<GameEvent> {
        let p1_dead = self.players[0].is_defeated();
        let p2_dead = self.players[1].is_defeated();

        let (desired, banner) = if p1_dead && p2_dead {
            (GameStatus::Draw, "=== DRAW ===".to_string())
        } else if p1_dead {
            (
                GameStatus::Player2Wins,
                format!("=== {} WINS ===", self.players[1].name.to_uppercase()),
            )
        } else if p2_dead {
            (
                GameStatus::Player1Wins,
                format!("=== {} WINS ===", self.players[0].name.to_uppercase()),
            )
        } else {
            return None;
        };

        if self.status == desired {
            return None;
        }

        self.status = desired;
        self.log(banner);

        Some(GameEvent::GameEnded { status: desired })
    }

    /// Log the human-readable lines for notable events in a report.
    fn log_report_events(&mut self, report: &ActionReport) {
        let mut lines = Vec::new();
        for event in &report.events {
            match event {
                GameEvent::CreatureDied { name, .. } => lines.push(format!("{name} dies")),
                GameEvent::CreatureReborn { name, .. } => {
                    lines.push(format!("{name} is reborn with 1 health"));
                }
                GameEvent::CardBurned { player, name } => {
                    let who = &self.player(*player).name;
                    lines.push(format!("{who} burns {name} (hand is full)"));
                }
                GameEvent::FatigueDamage { player, amount } => {
                    let who = &self.player(*player).name;
                    lines.push(format!("{who} takes {amount} fatigue damage"));
                }
                _ => {}
            }
        }
        for line in lines {
            self.log(line);
        }
    }
}

fn push_draw_events(report: &mut ActionReport, slot: PlayerSlot, outcome: &DrawOutcome) {
    for _ in 0..outcome.drawn {
        report.push(GameEvent::CardDrawn { player: slot });
    }
    for name in &outcome.burned_names {
        report.push(GameEvent::CardBurned {
            player: slot,
            name: name.clone(),
        });
    }
    if outcome.fatigue_damage > 0 {
        report.push(GameEvent::FatigueDamage {
            player: slot,
            amount: outcome.fatigue_damage,
        });
    }
}
