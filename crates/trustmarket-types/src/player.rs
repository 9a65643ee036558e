//! Player model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{HiddenRole, PlayerId, PublicRole};

/// One player's state within a session.
///
/// The hidden role is `#[serde(skip)]` so no serialized form of a player —
/// snapshots included — can ever leak it; reveal happens only on the
/// holder's private channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Non-negative at all observable points.
    pub cash: Decimal,
    pub public_role: Option<PublicRole>,
    #[serde(skip)]
    pub hidden_role: Option<HiddenRole>,
    /// Amount committed for the current round; the settlement base unit.
    pub stake: Decimal,
    pub selected_answer: Option<String>,
    /// Distinct from `selected_answer`: an Investor's chosen Trader.
    pub invest_target: Option<PlayerId>,
    pub ready: bool,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, display_name: impl Into<String>, cash: Decimal) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            avatar_url: None,
            cash,
            public_role: None,
            hidden_role: None,
            stake: Decimal::ZERO,
            selected_answer: None,
            invest_target: None,
            ready: false,
        }
    }

    /// Clear every per-round field. Cash carries across rounds.
    pub fn reset_round(&mut self) {
        self.public_role = None;
        self.hidden_role = None;
        self.stake = Decimal::ZERO;
        self.selected_answer = None;
        self.invest_target = None;
        self.ready = false;
    }

    #[must_use]
    pub fn is_trader(&self) -> bool {
        self.public_role == Some(PublicRole::Trader)
    }

    #[must_use]
    pub fn is_investor(&self) -> bool {
        self.public_role == Some(PublicRole::Investor)
    }
}

/// The per-player slice of a public snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub cash: Decimal,
    pub public_role: Option<PublicRole>,
    pub stake: Decimal,
    pub ready: bool,
}

impl From<&Player> for PlayerView {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id.clone(),
            display_name: p.display_name.clone(),
            avatar_url: p.avatar_url.clone(),
            cash: p.cash,
            public_role: p.public_role,
            stake: p.stake,
            ready: p.ready,
        }
    }
}
