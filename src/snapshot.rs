//! Session snapshots.
//!
//! A `GameSnapshot` is a complete, self-contained copy of a session:
//! both players with all four zones, turn and status, the log, the id
//! allocator, and the RNG stream position. Restoring one yields a
//! session that behaves bit-for-bit like the original would have.
//!
//! Capturing pauses a live session (`Active -> Saved`); restoring lifts
//! the pause (`Saved -> Active`). Terminal sessions snapshot as-is and
//! restore as-is.

use serde::{Deserialize, Serialize};

use crate::cards::IdAllocator;
use crate::player::Player;
use crate::rng::{GameRng, GameRngState};
use crate::session::{GameSession, GameStatus, PlayerSlot};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Snapshot encode/decode failures.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Encode(#[source] bincode::Error),
    #[error("snapshot decoding failed: {0}")]
    Decode(#[source] bincode::Error),
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
}

/// A complete serialized session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub version: u32,
    pub id: u64,
    pub players: [Player; 2],
    pub active: PlayerSlot,
    pub turn_number: u32,
    /// Status at capture time, before the live session was paused.
    pub status: GameStatus,
    pub created_at: u64,
    pub last_updated: u64,
    pub log: im::Vector<String>,
    pub ids: IdAllocator,
    pub rng: GameRngState,
}

impl GameSnapshot {
    /// Capture a session. An `Active` session is paused (`Saved`) so no
    /// further actions mutate it past the captured point; terminal
    /// sessions are left alone.
    #[must_use]
    pub fn capture(session: &mut GameSession) -> Self {
        let snapshot = Self {
            version: SNAPSHOT_VERSION,
            id: session.id,
            players: session.players.clone(),
            active: session.active,
            turn_number: session.turn_number,
            status: session.status,
            created_at: session.created_at,
            last_updated: session.last_updated,
            log: session.log.clone(),
            ids: session.ids.clone(),
            rng: session.rng.state(),
        };

        if session.status == GameStatus::Active {
            session.status = GameStatus::Saved;
        }

        snapshot
    }

    /// Rebuild a live session. A snapshot taken mid-game comes back
    /// `Active`; a snapshot of a finished game stays terminal.
    #[must_use]
    pub fn restore(&self) -> GameSession {
        let status = match self.status {
            GameStatus::Saved => GameStatus::Active,
            other => other,
        };

        GameSession {
            id: self.id,
            players: self.players.clone(),
            active: self.active,
            turn_number: self.turn_number,
            status,
            created_at: self.created_at,
            last_updated: self.last_updated,
            log: self.log.clone(),
            ids: self.ids.clone(),
            rng: GameRng::from_state(&self.rng),
            in_flight: false,
        }
    }

    /// Encode to a compact binary blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(SnapshotError::Encode)
    }

    /// Decode from a binary blob, rejecting unknown format versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes).map_err(SnapshotError::Decode)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardCatalog, Faction};
    use crate::error::ActionError;

    fn running_session() -> GameSession {
        let catalog = CardCatalog::standard();
        let mut session = GameSession::start(
            "Alice",
            Faction::Humans,
            "Bob",
            Faction::Beasts,
            &catalog,
            99,
        );
        session.start_turn().unwrap();
        session.end_turn().unwrap();
        session
    }

    #[test]
    fn test_capture_pauses_live_session() {
        let mut session = running_session();
        let snapshot = GameSnapshot::capture(&mut session);

        assert_eq!(snapshot.status, GameStatus::Active);
        assert_eq!(session.status(), GameStatus::Saved);

        // Paused sessions reject actions.
        let err = session.end_turn().unwrap_err();
        assert_eq!(err, ActionError::GameNotActive);
    }

    #[test]
    fn test_restore_resumes_active() {
        let mut session = running_session();
        let snapshot = GameSnapshot::capture(&mut session);

        let restored = snapshot.restore();
        assert_eq!(restored.status(), GameStatus::Active);
    }

    #[test]
    fn test_restore_is_faithful() {
        let mut session = running_session();
        let snapshot = GameSnapshot::capture(&mut session);
        let restored = snapshot.restore();

        assert_eq!(restored.id(), session.id());
        assert_eq!(restored.turn_number(), session.turn_number());
        assert_eq!(restored.active_slot(), session.active_slot());
        assert_eq!(restored.log_entries(), session.log_entries());
        assert_eq!(restored.created_at, session.created_at);
        assert_eq!(restored.last_updated, session.last_updated);

        for slot in [PlayerSlot::One, PlayerSlot::Two] {
            let a = restored.player(slot);
            let b = session.player(slot);
            assert_eq!(a.health(), b.health());
            assert_eq!(a.mana(), b.mana());
            assert_eq!(a.mana_crystals(), b.mana_crystals());
            assert_eq!(a.fatigue(), b.fatigue());
            let hand_a: Vec<_> = a.hand.iter().map(Card::id).collect();
            let hand_b: Vec<_> = b.hand.iter().map(Card::id).collect();
            assert_eq!(hand_a, hand_b);
            let deck_a: Vec<_> = a.deck.iter().map(Card::id).collect();
            let deck_b: Vec<_> = b.deck.iter().map(Card::id).collect();
            assert_eq!(deck_a, deck_b);
        }
    }

    #[test]
    fn test_restored_session_plays_identically() {
        let mut session = running_session();
        let snapshot = GameSnapshot::capture(&mut session);

        let mut a = snapshot.restore();
        let mut b = snapshot.restore();
        let report_a = a.end_turn().unwrap();
        let report_b = b.end_turn().unwrap();

        assert_eq!(report_a, report_b);
        assert_eq!(a.log_entries(), b.log_entries());
        assert_eq!(a.active_player().hand.len(), b.active_player().hand.len());
    }

    #[test]
    fn test_terminal_snapshot_stays_terminal() {
        let mut session = running_session();
        session.players[0].take_damage(100);
        session.end_turn().ok();
        assert_eq!(session.status(), GameStatus::Player2Wins);

        let snapshot = GameSnapshot::capture(&mut session);
        // Terminal status is not overwritten by the pause.
        assert_eq!(session.status(), GameStatus::Player2Wins);

        let restored = snapshot.restore();
        assert_eq!(restored.status(), GameStatus::Player2Wins);
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut session = running_session();
        let snapshot = GameSnapshot::capture(&mut session);

        let bytes = snapshot.to_bytes().unwrap();
        let back = GameSnapshot::from_bytes(&bytes).unwrap();

        assert_eq!(back.turn_number, snapshot.turn_number);
        assert_eq!(back.log, snapshot.log);
        assert_eq!(back.rng, snapshot.rng);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut session = running_session();
        let mut snapshot = GameSnapshot::capture(&mut session);
        snapshot.version = 99;

        let bytes = snapshot.to_bytes().unwrap();
        let err = GameSnapshot::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, SnapshotError::UnsupportedVersion(99)));
    }

    #[test]
    fn test_json_round_trip() {
        let mut session = running_session();
        let snapshot = GameSnapshot::capture(&mut session);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.turn_number, snapshot.turn_number);
        assert_eq!(back.status, snapshot.status);
    }
}
