//! Hidden-role assignment.
//!
//! Runs once per round at the end of BLIND_BET, over whoever committed as
//! a Trader: at most one Oracle and at most one Scammer per round, everyone
//! else Normal. Generic over the RNG so tests can seed it.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;
use trustmarket_types::{HiddenRole, PlayerId, Session};

/// Deal hidden roles to the session's Traders.
///
/// Returns the dealt `(player, role)` pairs so the caller can deliver each
/// reveal on its holder's private queue.
pub fn assign_hidden_roles<R: Rng>(
    session: &mut Session,
    rng: &mut R,
) -> Vec<(PlayerId, HiddenRole)> {
    let mut trader_ids = session.trader_ids();

    let dealt: Vec<(PlayerId, HiddenRole)> = match trader_ids.len() {
        0 => Vec::new(),
        // A lone trader still gets a secret agenda, either way.
        1 => {
            let role = if rng.gen_bool(0.5) {
                HiddenRole::Oracle
            } else {
                HiddenRole::Scammer
            };
            vec![(trader_ids.remove(0), role)]
        }
        _ => {
            trader_ids.shuffle(rng);
            trader_ids
                .into_iter()
                .enumerate()
                .map(|(i, id)| {
                    let role = match i {
                        0 => HiddenRole::Oracle,
                        1 => HiddenRole::Scammer,
                        _ => HiddenRole::Normal,
                    };
                    (id, role)
                })
                .collect()
        }
    };

    for (id, role) in &dealt {
        if let Some(player) = session.player_mut(id) {
            player.hidden_role = Some(*role);
        }
    }

    info!(session = %session.id, traders = dealt.len(), "hidden roles dealt");
    dealt
}
