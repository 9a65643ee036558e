//! Applying a ledger back onto a session.

use tracing::debug;
use trustmarket_types::{LedgerEntry, Session};

/// Write each entry's final balance onto the session's players.
///
/// Entries for the same player chain, so the last entry per player wins.
/// Entries for players who left the room since the ledger was computed are
/// skipped.
pub fn apply_ledger(session: &mut Session, ledger: &[LedgerEntry]) {
    for entry in ledger {
        if let Some(player) = session.player_mut(&entry.player_id) {
            player.cash = entry.cash_after;
        } else {
            debug!(
                session = %session.id,
                player = %entry.player_id,
                "ledger entry for a player no longer in the room"
            );
        }
    }
}
