//! The settlement ledger: the ordered list of cash deltas a round produces.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// Why a ledger entry exists. A closed set so subscribers can render and
/// test against it without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementReason {
    /// Flat penalty applied to everyone when no Traders entered the round.
    MarketCrash,
    /// Oracle or Normal Trader answered correctly and wins their stake.
    AnswerCorrect,
    /// Oracle or Normal Trader answered incorrectly and loses their stake.
    AnswerWrong,
    /// Scammer answered correctly (violating their role) and forfeits the stake.
    ScammerExposed,
    /// Scammer answered incorrectly (their win condition); stake untouched.
    ScammerEscaped,
    /// Scammer claims the stakes of everyone who invested in them.
    ScamProceeds,
    /// Investor's stake taken by the Scammer they backed.
    InvestmentScammed,
    /// Investor paid out on a winning Trader.
    InvestmentPaid,
    /// Investor's stake lost on a Trader who wasn't eligible.
    InvestmentLost,
    /// Normal Trader's withheld commission on investor winnings.
    CommissionEarned,
    /// Oracle's own stake share redistributed to their investors.
    OracleShareForfeited,
}

impl std::fmt::Display for SettlementReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MarketCrash => "MARKET_CRASH",
            Self::AnswerCorrect => "ANSWER_CORRECT",
            Self::AnswerWrong => "ANSWER_WRONG",
            Self::ScammerExposed => "SCAMMER_EXPOSED",
            Self::ScammerEscaped => "SCAMMER_ESCAPED",
            Self::ScamProceeds => "SCAM_PROCEEDS",
            Self::InvestmentScammed => "INVESTMENT_SCAMMED",
            Self::InvestmentPaid => "INVESTMENT_PAID",
            Self::InvestmentLost => "INVESTMENT_LOST",
            Self::CommissionEarned => "COMMISSION_EARNED",
            Self::OracleShareForfeited => "ORACLE_SHARE_FORFEITED",
        };
        write!(f, "{s}")
    }
}

/// One cash movement in the round's settlement.
///
/// Invariants: `cash_after >= 0`, `delta == cash_after - cash_before`.
/// A player may appear in multiple entries within a round; entries for the
/// same player chain (`cash_before` of the later equals `cash_after` of the
/// earlier).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub player_id: PlayerId,
    pub display_name: String,
    pub cash_before: Decimal,
    pub cash_after: Decimal,
    pub delta: Decimal,
    pub reason: SettlementReason,
}

impl LedgerEntry {
    /// Build an entry from a before-balance and a signed delta, flooring the
    /// result at zero. The recorded delta is the actual movement after the
    /// floor, so `delta == cash_after - cash_before` always holds.
    #[must_use]
    pub fn applied(
        player_id: PlayerId,
        display_name: impl Into<String>,
        cash_before: Decimal,
        delta: Decimal,
        reason: SettlementReason,
    ) -> Self {
        let cash_after = (cash_before + delta).max(Decimal::ZERO);
        Self {
            player_id,
            display_name: display_name.into(),
            cash_before,
            cash_after,
            delta: cash_after - cash_before,
            reason,
        }
    }
}
