//! End-of-round settlement.
//!
//! Two passes over an id-ordered player list:
//!
//! 1. **Traders**: each wins or loses their own stake against the question,
//!    under role-dependent rules (a Scammer's win condition is answering
//!    wrong), and is marked eligible or not for investor payouts.
//! 2. **Investors, grouped by targeted Trader**: payouts depend on the
//!    target's hidden role and eligibility. A Normal Trader withholds a 20%
//!    commission; an Oracle forfeits 70% of their own stake to their
//!    backers in equal shares; an eligible Scammer takes every backer's
//!    stake; an ineligible Trader of any role costs backers their stake.
//!
//! Investors who target nobody, or whose target is not a Trader, are
//! omitted from the ledger entirely.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{info, warn};
use trustmarket_types::{
    HiddenRole, LedgerEntry, Player, PlayerId, Session, SettlementReason, constants,
};

fn pct(p: u32) -> Decimal {
    Decimal::new(i64::from(p), 2)
}

fn push<'a>(
    ledger: &mut Vec<LedgerEntry>,
    balances: &mut HashMap<&'a PlayerId, Decimal>,
    player: &'a Player,
    delta: Decimal,
    reason: SettlementReason,
) {
    let before = balances[&player.id];
    let entry = LedgerEntry::applied(
        player.id.clone(),
        player.display_name.clone(),
        before,
        delta,
        reason,
    );
    balances.insert(&player.id, entry.cash_after);
    ledger.push(entry);
}

/// Whether this answer wins against the key. Missing is always wrong.
fn is_correct(answer: Option<&str>, correct: &str) -> bool {
    answer.is_some_and(|a| a.trim().eq_ignore_ascii_case(correct.trim()))
}

/// Settle a finished round. Pure: the session is only read.
///
/// Returns an empty ledger when the round has no question (nothing to
/// grade against), matching the no-op a missing question implies upstream.
#[must_use]
pub fn settle_round(session: &Session) -> Vec<LedgerEntry> {
    let mut ledger = Vec::new();

    let Some(question) = &session.question else {
        warn!(session = %session.id, "settlement requested without a question, skipping");
        return ledger;
    };
    let correct = question.correct_answer.as_str();

    let ordered = session.players_ordered();
    let traders: Vec<&Player> = ordered.iter().copied().filter(|p| p.is_trader()).collect();
    let investors: Vec<&Player> = ordered.iter().copied().filter(|p| p.is_investor()).collect();

    info!(
        session = %session.id,
        traders = traders.len(),
        investors = investors.len(),
        "settling round"
    );

    // Running balances so chained entries stay consistent.
    let mut balances: HashMap<&PlayerId, Decimal> =
        ordered.iter().map(|p| (&p.id, p.cash)).collect();
    let mut eligible: HashMap<&PlayerId, bool> = HashMap::new();

    // Pass 1: Traders against the question.
    for trader in &traders {
        let stake = trader.stake;
        let won = is_correct(trader.selected_answer.as_deref(), correct);
        let role = trader.hidden_role.unwrap_or(HiddenRole::Normal);

        match (role, won) {
            (HiddenRole::Scammer, true) => {
                push(
                    &mut ledger,
                    &mut balances,
                    trader,
                    -stake,
                    SettlementReason::ScammerExposed,
                );
                eligible.insert(&trader.id, false);
            }
            (HiddenRole::Scammer, false) => {
                push(
                    &mut ledger,
                    &mut balances,
                    trader,
                    Decimal::ZERO,
                    SettlementReason::ScammerEscaped,
                );
                eligible.insert(&trader.id, true);
            }
            (_, true) => {
                push(
                    &mut ledger,
                    &mut balances,
                    trader,
                    stake,
                    SettlementReason::AnswerCorrect,
                );
                eligible.insert(&trader.id, true);
            }
            (_, false) => {
                push(
                    &mut ledger,
                    &mut balances,
                    trader,
                    -stake,
                    SettlementReason::AnswerWrong,
                );
                eligible.insert(&trader.id, false);
            }
        }
    }

    // Pass 2: Investors grouped by targeted Trader.
    for trader in &traders {
        let backers: Vec<&Player> = investors
            .iter()
            .copied()
            .filter(|inv| inv.invest_target.as_ref() == Some(&trader.id))
            .collect();
        if backers.is_empty() {
            continue;
        }

        let role = trader.hidden_role.unwrap_or(HiddenRole::Normal);
        let trader_eligible = eligible.get(&trader.id).copied().unwrap_or(false);

        if !trader_eligible {
            // Any ineligible Trader costs backers their stake; no trader entry.
            for inv in &backers {
                push(
                    &mut ledger,
                    &mut balances,
                    inv,
                    -inv.stake,
                    SettlementReason::InvestmentLost,
                );
            }
            continue;
        }

        match role {
            HiddenRole::Scammer => {
                // The scam lands: backers' stakes move to the Scammer.
                let mut taken = Decimal::ZERO;
                for inv in &backers {
                    let before = balances[&inv.id];
                    push(
                        &mut ledger,
                        &mut balances,
                        inv,
                        -inv.stake,
                        SettlementReason::InvestmentScammed,
                    );
                    taken += before - balances[&inv.id];
                }
                push(
                    &mut ledger,
                    &mut balances,
                    trader,
                    taken,
                    SettlementReason::ScamProceeds,
                );
            }
            HiddenRole::Normal => {
                let commission_rate = pct(constants::NORMAL_COMMISSION_PCT);
                let mut commission = Decimal::ZERO;
                for inv in &backers {
                    let cut = inv.stake * commission_rate;
                    push(
                        &mut ledger,
                        &mut balances,
                        inv,
                        inv.stake - cut,
                        SettlementReason::InvestmentPaid,
                    );
                    commission += cut;
                }
                push(
                    &mut ledger,
                    &mut balances,
                    trader,
                    commission,
                    SettlementReason::CommissionEarned,
                );
            }
            HiddenRole::Oracle => {
                // Backers split 70% of the Oracle's own stake on top of
                // winning their stake back; the Oracle forfeits that pool.
                let pool = trader.stake * pct(constants::ORACLE_SHARE_PCT);
                let share = pool / Decimal::from(backers.len());
                for inv in &backers {
                    push(
                        &mut ledger,
                        &mut balances,
                        inv,
                        inv.stake + share,
                        SettlementReason::InvestmentPaid,
                    );
                }
                push(
                    &mut ledger,
                    &mut balances,
                    trader,
                    -pool,
                    SettlementReason::OracleShareForfeited,
                );
            }
        }
    }

    info!(session = %session.id, entries = ledger.len(), "round settled");
    ledger
}
