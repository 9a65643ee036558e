//! Market-crash penalty.
//!
//! Fires when a round reaches the end of BLIND_BET with more than one
//! player in the room and none of them entering as a Trader: every player
//! is docked a flat percentage of their cash and the round restarts.

use rust_decimal::Decimal;
use tracing::warn;
use trustmarket_types::{LedgerEntry, Session, SettlementReason, constants};

/// Apply the flat crash penalty to every player, in id order.
#[must_use]
pub fn market_crash(session: &Session) -> Vec<LedgerEntry> {
    warn!(
        session = %session.id,
        round = session.round,
        players = session.player_count(),
        "market crash, no traders entered the round"
    );

    let rate = Decimal::new(i64::from(constants::MARKET_CRASH_PENALTY_PCT), 2);
    session
        .players_ordered()
        .into_iter()
        .map(|p| {
            LedgerEntry::applied(
                p.id.clone(),
                p.display_name.clone(),
                p.cash,
                -(p.cash * rate),
                SettlementReason::MarketCrash,
            )
        })
        .collect()
}
