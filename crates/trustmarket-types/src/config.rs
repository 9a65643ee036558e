//! Configuration for the game engine.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants;

/// Tunables shared by every session an engine creates.
///
/// Phase durations are fixed by [`crate::GamePhase::duration_secs`]; this
/// struct carries the economy and provider knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Cash each player (host included) is seeded with.
    pub starting_cash: Decimal,
    /// Rounds per game before FINISHED.
    pub total_rounds: u32,
    /// Topic passed to the question provider.
    pub question_topic: String,
    /// Hard deadline for one provider call; on expiry the fallback
    /// question substitutes.
    pub question_timeout: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_cash: Decimal::new(constants::STARTING_CASH, 0),
            total_rounds: constants::DEFAULT_TOTAL_ROUNDS,
            question_topic: constants::DEFAULT_QUESTION_TOPIC.to_string(),
            question_timeout: Duration::from_secs(constants::QUESTION_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.starting_cash, Decimal::new(2000, 0));
        assert_eq!(cfg.total_rounds, 10);
        assert_eq!(cfg.question_timeout.as_secs(), 10);
        assert!(!cfg.question_topic.is_empty());
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = GameConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.starting_cash, back.starting_cash);
        assert_eq!(cfg.total_rounds, back.total_rounds);
    }
}
