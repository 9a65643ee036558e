//! Broadcast payloads.
//!
//! One tagged variant per topic, so every subscriber statically knows the
//! shape of what arrives on its channel. Topic strings mirror the game's
//! original destinations: a per-room public family plus a per-player
//! private queue for hidden-role reveal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{HiddenRole, LedgerEntry, PlayerId, PublicRole, SessionId, SessionSnapshot};

/// A public roster entry: id and display name only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraderEntry {
    pub id: PlayerId,
    pub display_name: String,
}

/// Everything the engine ever publishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// The per-tick room state.
    RoomSnapshot(SessionSnapshot),
    /// Public list of this round's Traders (ids and names; never hidden roles).
    TraderRoster { traders: Vec<TraderEntry> },
    /// An investor committed to a trader; pushed immediately, not on the tick.
    TrustUpdate {
        investor: PlayerId,
        trader: PlayerId,
    },
    /// The round's settlement ledger plus the revealed answer.
    RoundResults {
        results: Vec<LedgerEntry>,
        correct_answer: Option<String>,
    },
    /// A player-visible notice (market crash etc.).
    RoomError { message: String },
    /// Private-only: the recipient's hidden role for this round.
    HiddenRoleReveal { role: HiddenRole },
    /// Private-only: confirmation of the recipient's accepted role and
    /// stake (the amount after any clamp to available cash).
    StakeAccepted { role: PublicRole, amount: Decimal },
}

impl GameEvent {
    /// The public topic this event belongs on for the given session.
    #[must_use]
    pub fn topic(&self, session: &SessionId) -> String {
        match self {
            Self::RoomSnapshot(_) => topics::room(session),
            Self::TraderRoster { .. } => topics::traders(session),
            Self::TrustUpdate { .. } => topics::trust_update(session),
            Self::RoundResults { .. } => topics::results(session),
            Self::RoomError { .. } => topics::error(session),
            // Private-only events have no dedicated public topic.
            Self::HiddenRoleReveal { .. } | Self::StakeAccepted { .. } => topics::room(session),
        }
    }
}

/// Topic-string builders for the messaging boundary.
pub mod topics {
    use crate::{PlayerId, SessionId};

    #[must_use]
    pub fn room(session: &SessionId) -> String {
        format!("game/{session}")
    }

    #[must_use]
    pub fn traders(session: &SessionId) -> String {
        format!("game/{session}/traders")
    }

    #[must_use]
    pub fn trust_update(session: &SessionId) -> String {
        format!("game/{session}/trust-update")
    }

    #[must_use]
    pub fn results(session: &SessionId) -> String {
        format!("game/{session}/results")
    }

    #[must_use]
    pub fn error(session: &SessionId) -> String {
        format!("game/{session}/error")
    }

    /// The per-player private queue (hidden-role reveal, confirmations).
    #[must_use]
    pub fn private(player: &PlayerId) -> String {
        format!("player/{player}/private")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_are_stable() {
        let sid = SessionId::new("room-9");
        assert_eq!(topics::room(&sid), "game/room-9");
        assert_eq!(topics::traders(&sid), "game/room-9/traders");
        assert_eq!(topics::trust_update(&sid), "game/room-9/trust-update");
        assert_eq!(topics::results(&sid), "game/room-9/results");
        assert_eq!(topics::error(&sid), "game/room-9/error");
        assert_eq!(
            topics::private(&PlayerId::new("p1")),
            "player/p1/private"
        );
    }

    #[test]
    fn events_are_tagged() {
        let ev = GameEvent::TrustUpdate {
            investor: PlayerId::new("i1"),
            trader: PlayerId::new("t1"),
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"type\":\"trust_update\""));
        assert_eq!(ev.topic(&SessionId::new("r")), "game/r/trust-update");
    }

    #[test]
    fn hidden_role_reveal_roundtrip() {
        let ev = GameEvent::HiddenRoleReveal {
            role: HiddenRole::Oracle,
        };
        let json = serde_json::to_string(&ev).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            back,
            GameEvent::HiddenRoleReveal {
                role: HiddenRole::Oracle
            }
        ));
    }
}
