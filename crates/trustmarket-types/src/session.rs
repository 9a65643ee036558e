//! Session (room) model.
//!
//! A session is one independent game instance: its own players, phase,
//! round counter, and timer. It is created in WAITING with the host seeded
//! as the first player and becomes terminal at FINISHED, after which no
//! further mutation is accepted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GamePhase, Player, PlayerId, PlayerView, Question, QuestionView, SessionId};

/// One live game session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub host_id: PlayerId,
    pub phase: GamePhase,
    /// Seconds left in the current phase; strictly decreases to zero
    /// before a transition fires.
    pub time_remaining: u32,
    pub round: u32,
    pub total_rounds: u32,
    pub question: Option<Question>,
    /// Player ids are unique within the session by construction.
    pub players: HashMap<PlayerId, Player>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session in WAITING with the host pre-seeded as a player.
    #[must_use]
    pub fn new(
        id: SessionId,
        host_id: PlayerId,
        starting_cash: rust_decimal::Decimal,
        total_rounds: u32,
    ) -> Self {
        let host = Player::new(host_id.clone(), host_id.as_str(), starting_cash);
        let mut players = HashMap::new();
        players.insert(host_id.clone(), host);
        Self {
            id,
            host_id,
            phase: GamePhase::Waiting,
            time_remaining: 0,
            round: 1,
            total_rounds,
            question: None,
            players,
            created_at: Utc::now(),
        }
    }

    pub fn add_player(&mut self, player: Player) {
        self.players.insert(player.id.clone(), player);
    }

    pub fn remove_player(&mut self, player_id: &PlayerId) {
        self.players.remove(player_id);
    }

    #[must_use]
    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.get(player_id)
    }

    pub fn player_mut(&mut self, player_id: &PlayerId) -> Option<&mut Player> {
        self.players.get_mut(player_id)
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Whether every player in the room has confirmed ready.
    /// An empty room is never ready.
    #[must_use]
    pub fn all_ready(&self) -> bool {
        !self.players.is_empty() && self.players.values().all(|p| p.ready)
    }

    /// Players sorted by id — the deterministic iteration order used by
    /// settlement and snapshots.
    #[must_use]
    pub fn players_ordered(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.values().collect();
        players.sort_by(|a, b| a.id.cmp(&b.id));
        players
    }

    /// Ids of all current Traders, in id order.
    #[must_use]
    pub fn trader_ids(&self) -> Vec<PlayerId> {
        self.players_ordered()
            .into_iter()
            .filter(|p| p.is_trader())
            .map(|p| p.id.clone())
            .collect()
    }

    /// Clear per-round player fields and the current question.
    pub fn reset_round(&mut self) {
        for player in self.players.values_mut() {
            player.reset_round();
        }
        self.question = None;
    }

    /// The public projection broadcast on the room topic: no hidden roles,
    /// question stripped of its answer key.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            host_id: self.host_id.clone(),
            phase: self.phase,
            time_remaining: self.time_remaining,
            round: self.round,
            total_rounds: self.total_rounds,
            question: self.question.as_ref().map(Question::view),
            players: self.players_ordered().into_iter().map(Into::into).collect(),
            created_at: self.created_at,
        }
    }
}

/// The public room view delivered to every subscriber once per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub host_id: PlayerId,
    pub phase: GamePhase,
    pub time_remaining: u32,
    pub round: u32,
    pub total_rounds: u32,
    pub question: Option<QuestionView>,
    pub players: Vec<PlayerView>,
    pub created_at: DateTime<Utc>,
}
