//! Round phase model.
//!
//! A round cycles through five timed phases:
//! **BLIND_BET → ROLE_ASSIGN → MARKET_CHAT → CLOSING → CALCULATION**
//!
//! WAITING precedes the first round (only the host can leave it) and
//! FINISHED is terminal. Transitions follow this fixed order; the only
//! irregular edge is the market-crash restart, which re-enters BLIND_BET at
//! the same round number.

use serde::{Deserialize, Serialize};

use crate::constants;

/// The named, fixed-duration periods of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Lobby: players join; the host starts the game.
    Waiting,
    /// Players commit a public role and a stake.
    BlindBet,
    /// Hidden roles are dealt and privately revealed.
    RoleAssign,
    /// The question is live; investors pick their Trader.
    MarketChat,
    /// Last call for answers and investments.
    Closing,
    /// Settlement runs; results are broadcast.
    Calculation,
    /// Terminal: the timer is cancelled and no further mutation is accepted.
    Finished,
}

impl GamePhase {
    /// Fixed duration of this phase in seconds, or `None` for the untimed
    /// WAITING and FINISHED states.
    #[must_use]
    pub fn duration_secs(self) -> Option<u32> {
        match self {
            Self::BlindBet => Some(constants::BLIND_BET_SECS),
            Self::RoleAssign => Some(constants::ROLE_ASSIGN_SECS),
            Self::MarketChat => Some(constants::MARKET_CHAT_SECS),
            Self::Closing => Some(constants::CLOSING_SECS),
            Self::Calculation => Some(constants::CALCULATION_SECS),
            Self::Waiting | Self::Finished => None,
        }
    }

    /// Whether the session accepts no further mutation in this phase.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Finished
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "WAITING"),
            Self::BlindBet => write!(f, "BLIND_BET"),
            Self::RoleAssign => write!(f, "ROLE_ASSIGN"),
            Self::MarketChat => write!(f, "MARKET_CHAT"),
            Self::Closing => write!(f, "CLOSING"),
            Self::Calculation => write!(f, "CALCULATION"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}
