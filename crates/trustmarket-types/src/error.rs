//! Error types for the TrustMarket game server.
//!
//! All errors use the `TM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Session errors
//! - 2xx: Player errors
//! - 3xx: Command errors
//! - 4xx: Question provider errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{GamePhase, PlayerId, SessionId};

/// Central error enum for all TrustMarket operations.
#[derive(Debug, Error)]
pub enum TrustmarketError {
    // =================================================================
    // Session Errors (1xx)
    // =================================================================
    /// No live session with this id.
    #[error("TM_ERR_100: Session not found: {0}")]
    SessionNotFound(SessionId),

    /// A host-gated action was requested by a non-host player.
    #[error("TM_ERR_101: Only the host may perform this action (requester: {requester})")]
    NotHost { requester: PlayerId },

    /// The session is terminal and accepts no further mutation.
    #[error("TM_ERR_102: Session is finished: {0}")]
    SessionFinished(SessionId),

    // =================================================================
    // Player Errors (2xx)
    // =================================================================
    /// The player is not a member of the session.
    #[error("TM_ERR_200: Player {player} not found in session {session}")]
    PlayerNotFound {
        session: SessionId,
        player: PlayerId,
    },

    // =================================================================
    // Command Errors (3xx)
    // =================================================================
    /// The role string didn't parse into a known public role.
    #[error("TM_ERR_300: Invalid role: {given}")]
    InvalidRole { given: String },

    /// The command is not valid in the session's current phase.
    #[error("TM_ERR_301: Command not allowed during {actual} (allowed: {allowed})")]
    WrongPhase { allowed: String, actual: GamePhase },

    /// The player's public role doesn't permit this command.
    #[error("TM_ERR_302: Action requires the {required} role")]
    RoleRequired { required: String },

    /// The investment target is missing or not a Trader.
    #[error("TM_ERR_303: Invalid investment target: {target}")]
    InvalidTarget { target: PlayerId },

    // =================================================================
    // Question Provider Errors (4xx)
    // =================================================================
    /// The external question provider failed or returned garbage.
    #[error("TM_ERR_400: Question provider failed: {reason}")]
    QuestionProvider { reason: String },

    /// The provider call exceeded its deadline.
    #[error("TM_ERR_401: Question provider timed out")]
    QuestionTimeout,

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("TM_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("TM_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TrustmarketError>;

impl From<serde_json::Error> for TrustmarketError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
