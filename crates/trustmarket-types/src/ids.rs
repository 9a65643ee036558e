//! Identifiers used throughout TrustMarket.
//!
//! Session and player ids arrive from the transport layer as opaque strings
//! (socket session ids, room codes), so they are string-backed newtypes.
//! Server-minted ids use UUIDv7 for time-ordered lexicographic sorting.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// Identifier for one live game session (a "room").
///
/// Process-unique by assumption; usually a short room code chosen by the
/// client, or a generated UUIDv7 when the creator leaves it blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh server-side session id (UUIDv7).
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PlayerId
// ---------------------------------------------------------------------------

/// Identifier for a player within a session.
///
/// Owned by the transport (e.g. the socket session id); unique within a
/// session by the registry's insertion rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// QuestionId
// ---------------------------------------------------------------------------

/// Unique identifier for a quiz question. Uses UUIDv7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct QuestionId(pub Uuid);

impl QuestionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_random_uniqueness() {
        let a = SessionId::random();
        let b = SessionId::random();
        assert_ne!(a, b);
    }

    #[test]
    fn session_id_from_str() {
        let id = SessionId::from("room-42");
        assert_eq!(id.as_str(), "room-42");
        assert_eq!(format!("{id}"), "room-42");
    }

    #[test]
    fn player_id_display() {
        let id = PlayerId::new("alice");
        assert_eq!(format!("{id}"), "alice");
    }

    #[test]
    fn question_id_uniqueness() {
        let a = QuestionId::new();
        let b = QuestionId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn question_id_ordering() {
        let a = QuestionId::new();
        let b = QuestionId::new();
        assert!(a < b);
    }

    #[test]
    fn serde_roundtrips() {
        let sid = SessionId::new("room-1");
        let json = serde_json::to_string(&sid).unwrap();
        let back: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(sid, back);

        let qid = QuestionId::new();
        let json = serde_json::to_string(&qid).unwrap();
        let back: QuestionId = serde_json::from_str(&json).unwrap();
        assert_eq!(qid, back);
    }
}
