//! Player roles.
//!
//! The public role is chosen by the player each round during BLIND_BET.
//! The hidden role is assigned by the orchestrator among the Traders and is
//! only ever delivered on the holder's private channel.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TrustmarketError;

/// The role a player publicly commits to for the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublicRole {
    /// Answers the round's question; may carry a hidden role.
    Trader,
    /// Stakes cash on a chosen Trader's outcome instead of answering.
    Investor,
}

impl std::fmt::Display for PublicRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trader => write!(f, "TRADER"),
            Self::Investor => write!(f, "INVESTOR"),
        }
    }
}

impl FromStr for PublicRole {
    type Err = TrustmarketError;

    /// Case-insensitive parse; anything else is a typed `InvalidRole`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRADER" => Ok(Self::Trader),
            "INVESTOR" => Ok(Self::Investor),
            _ => Err(TrustmarketError::InvalidRole {
                given: s.to_string(),
            }),
        }
    }
}

/// The secret per-round alignment assigned among Traders.
///
/// At most one Oracle and at most one Scammer exist per round; every other
/// Trader is Normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HiddenRole {
    /// Wins by answering correctly; investors siphon most of the profit.
    Oracle,
    /// Wins by answering incorrectly and taking investor stakes.
    Scammer,
    /// No special rule; pays a commission on investor winnings.
    Normal,
}

impl std::fmt::Display for HiddenRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Oracle => write!(f, "ORACLE"),
            Self::Scammer => write!(f, "SCAMMER"),
            Self::Normal => write!(f, "NORMAL"),
        }
    }
}
