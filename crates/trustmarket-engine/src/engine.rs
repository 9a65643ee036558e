//! The session orchestrator: the command surface a transport calls into.
//!
//! Host-gated operations (`start`, `stop`) and lookups reject with typed
//! errors. In-round commands on an unknown session are logged no-ops: the
//! room may have been recreated or torn down under a slow client, and
//! that's not worth a round trip of error handling.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use tracing::{info, warn};
use trustmarket_quiz::QuestionProvider;
use trustmarket_types::{
    GameConfig, GameEvent, GamePhase, Player, PlayerId, PublicRole, Result, Session, SessionId,
    SessionSnapshot, TrustmarketError,
};

use crate::bus::GameBus;
use crate::driver::{self, DriverCtx, TimerSlot};
use crate::registry::{SessionHandle, SessionRegistry};

/// The orchestrator. One instance serves every session; per-session state
/// lives behind the registry's handles.
pub struct GameEngine<B, P> {
    config: GameConfig,
    registry: SessionRegistry,
    timers: Arc<DashMap<SessionId, TimerSlot>>,
    next_generation: AtomicU64,
    bus: Arc<B>,
    provider: Arc<P>,
}

impl<B: GameBus, P: QuestionProvider + 'static> GameEngine<B, P> {
    #[must_use]
    pub fn new(config: GameConfig, bus: Arc<B>, provider: Arc<P>) -> Self {
        Self {
            config,
            registry: SessionRegistry::new(),
            timers: Arc::new(DashMap::new()),
            next_generation: AtomicU64::new(0),
            bus,
            provider,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Create a session, seeding the host as its first player.
    ///
    /// Recreating an existing id replaces it: the old timer is aborted and
    /// the old session marked FINISHED so stale handles go inert.
    pub async fn create_session(
        &self,
        id: Option<SessionId>,
        host: PlayerId,
    ) -> Result<SessionId> {
        let id = id.unwrap_or_else(SessionId::random);
        let session = Session::new(
            id.clone(),
            host.clone(),
            self.config.starting_cash,
            self.config.total_rounds,
        );
        let (handle, replaced) = self.registry.insert(session);

        if let Some(old) = replaced {
            warn!(session = %id, "recreating existing session, tearing down the old one");
            if let Some((_, slot)) = self.timers.remove(&id) {
                slot.handle.abort();
            }
            old.lock().await.phase = GamePhase::Finished;
        }

        let session = handle.lock().await;
        self.bus
            .publish(&id, &GameEvent::RoomSnapshot(session.snapshot()));
        info!(session = %id, host = %host, "session created");
        Ok(id)
    }

    /// Add a player to the lobby. Re-joining with the same id is a no-op.
    pub async fn join(
        &self,
        session_id: &SessionId,
        player_id: PlayerId,
        display_name: &str,
        avatar_url: Option<String>,
    ) -> Result<()> {
        let handle = self.registry.get(session_id)?;
        let mut session = handle.lock().await;
        if session.phase.is_terminal() {
            return Err(TrustmarketError::SessionFinished(session_id.clone()));
        }

        if session.player(&player_id).is_some() {
            info!(session = %session_id, player = %player_id, "player already in room");
        } else {
            let mut player = Player::new(player_id.clone(), display_name, self.config.starting_cash);
            player.avatar_url = avatar_url;
            session.add_player(player);
            info!(
                session = %session_id,
                player = %player_id,
                players = session.player_count(),
                "player joined"
            );
        }

        self.bus
            .publish(session_id, &GameEvent::RoomSnapshot(session.snapshot()));
        Ok(())
    }

    /// Drop a player from the room. Unknown session or player: logged no-op.
    pub async fn remove_player(&self, session_id: &SessionId, player_id: &PlayerId) -> Result<()> {
        let Some(handle) = self.lookup(session_id) else {
            return Ok(());
        };
        let mut session = handle.lock().await;
        if session.phase.is_terminal() {
            info!(session = %session_id, player = %player_id, "remove ignored, session finished");
            return Ok(());
        }
        session.remove_player(player_id);
        info!(session = %session_id, player = %player_id, "player removed");
        self.bus
            .publish(session_id, &GameEvent::RoomSnapshot(session.snapshot()));
        Ok(())
    }

    /// Start the game: host only, resets to round 1 and spawns the phase
    /// timer. A second start while the timer runs is ignored with a warning.
    pub async fn start(&self, session_id: &SessionId, requester: &PlayerId) -> Result<()> {
        let handle = self.registry.get(session_id)?;
        let mut session = handle.lock().await;
        if session.phase.is_terminal() {
            return Err(TrustmarketError::SessionFinished(session_id.clone()));
        }
        if session.host_id != *requester {
            return Err(TrustmarketError::NotHost {
                requester: requester.clone(),
            });
        }

        // Guard and register in one step: the slot stays held from the
        // running-check until the new handle lands in it (no await in
        // between), so two concurrent starts cannot both pass the guard
        // and spawn duplicate timers for one session.
        let slot = self.timers.entry(session_id.clone());
        if let Entry::Occupied(existing) = &slot {
            if !existing.get().handle.is_finished() {
                warn!(session = %session_id, "start ignored, timer already running");
                return Ok(());
            }
        }

        session.round = 1;
        session.reset_round();
        session.phase = GamePhase::BlindBet;
        session.time_remaining = GamePhase::BlindBet.duration_secs().unwrap_or(0);
        info!(session = %session_id, rounds = session.total_rounds, "game started");
        self.bus
            .publish(session_id, &GameEvent::RoomSnapshot(session.snapshot()));

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let ctx = DriverCtx {
            session: Arc::clone(&handle),
            bus: Arc::clone(&self.bus),
            provider: Arc::clone(&self.provider),
            config: self.config.clone(),
            generation,
            timers: Arc::clone(&self.timers),
        };
        slot.insert(TimerSlot {
            generation,
            handle: tokio::spawn(driver::run(ctx)),
        });
        Ok(())
    }

    /// Commit a public role and stake for the round. BLIND_BET only; the
    /// amount is clamped into `[0, cash]`.
    pub async fn place_stake(
        &self,
        session_id: &SessionId,
        player_id: &PlayerId,
        role: &str,
        amount: Decimal,
    ) -> Result<()> {
        let Some(handle) = self.lookup(session_id) else {
            return Ok(());
        };
        let mut session = handle.lock().await;
        if session.phase != GamePhase::BlindBet {
            return Err(TrustmarketError::WrongPhase {
                allowed: GamePhase::BlindBet.to_string(),
                actual: session.phase,
            });
        }
        let role: PublicRole = role.parse()?;

        let player = session.player_mut(player_id).ok_or_else(|| {
            TrustmarketError::PlayerNotFound {
                session: session_id.clone(),
                player: player_id.clone(),
            }
        })?;

        let mut amount = amount;
        if amount < Decimal::ZERO {
            warn!(session = %session_id, player = %player_id, %amount, "negative stake clamped to zero");
            amount = Decimal::ZERO;
        }
        if amount > player.cash {
            warn!(
                session = %session_id,
                player = %player_id,
                %amount,
                cash = %player.cash,
                "stake clamped to available cash"
            );
            amount = player.cash;
        }

        player.public_role = Some(role);
        player.stake = amount;
        player.ready = true;
        info!(session = %session_id, player = %player_id, %role, stake = %amount, "stake placed");

        self.bus
            .publish_to_player(player_id, &GameEvent::StakeAccepted { role, amount });
        self.bus
            .publish(session_id, &GameEvent::RoomSnapshot(session.snapshot()));
        Ok(())
    }

    /// Point an Investor's stake at a Trader. MARKET_CHAT or CLOSING; the
    /// trust update is pushed immediately rather than on the next tick.
    pub async fn choose_investment(
        &self,
        session_id: &SessionId,
        investor: &PlayerId,
        target: &PlayerId,
    ) -> Result<()> {
        let Some(handle) = self.lookup(session_id) else {
            return Ok(());
        };
        let mut session = handle.lock().await;
        Self::require_open_market(&session)?;

        let is_investor = session.player(investor).is_some_and(Player::is_investor);
        if !is_investor {
            return Err(TrustmarketError::RoleRequired {
                required: PublicRole::Investor.to_string(),
            });
        }
        let target_is_trader = session.player(target).is_some_and(Player::is_trader);
        if !target_is_trader {
            return Err(TrustmarketError::InvalidTarget {
                target: target.clone(),
            });
        }

        if let Some(player) = session.player_mut(investor) {
            player.invest_target = Some(target.clone());
        }
        info!(session = %session_id, investor = %investor, trader = %target, "investment chosen");

        self.bus.publish(
            session_id,
            &GameEvent::TrustUpdate {
                investor: investor.clone(),
                trader: target.clone(),
            },
        );
        Ok(())
    }

    /// Record a Trader's answer. MARKET_CHAT or CLOSING; stored uppercased
    /// and never broadcast.
    pub async fn submit_answer(
        &self,
        session_id: &SessionId,
        player_id: &PlayerId,
        answer: &str,
    ) -> Result<()> {
        let Some(handle) = self.lookup(session_id) else {
            return Ok(());
        };
        let mut session = handle.lock().await;
        Self::require_open_market(&session)?;

        let is_trader = session.player(player_id).is_some_and(Player::is_trader);
        if !is_trader {
            return Err(TrustmarketError::RoleRequired {
                required: PublicRole::Trader.to_string(),
            });
        }

        if let Some(player) = session.player_mut(player_id) {
            player.selected_answer = Some(answer.trim().to_ascii_uppercase());
        }
        info!(session = %session_id, player = %player_id, "answer recorded");
        Ok(())
    }

    /// The current public view of a session.
    pub async fn snapshot(&self, session_id: &SessionId) -> Result<SessionSnapshot> {
        let handle = self.registry.get(session_id)?;
        let session = handle.lock().await;
        Ok(session.snapshot())
    }

    /// Host-gated shutdown: aborts the timer and marks the session FINISHED.
    pub async fn stop(&self, session_id: &SessionId, requester: &PlayerId) -> Result<()> {
        let handle = self.registry.get(session_id)?;
        let mut session = handle.lock().await;
        if session.host_id != *requester {
            return Err(TrustmarketError::NotHost {
                requester: requester.clone(),
            });
        }

        if let Some((_, slot)) = self.timers.remove(session_id) {
            slot.handle.abort();
        }
        session.phase = GamePhase::Finished;
        session.time_remaining = 0;
        info!(session = %session_id, "session stopped");
        self.bus
            .publish(session_id, &GameEvent::RoomSnapshot(session.snapshot()));
        Ok(())
    }

    fn require_open_market(session: &Session) -> Result<()> {
        match session.phase {
            GamePhase::MarketChat | GamePhase::Closing => Ok(()),
            actual => Err(TrustmarketError::WrongPhase {
                allowed: format!("{}|{}", GamePhase::MarketChat, GamePhase::Closing),
                actual,
            }),
        }
    }

    fn lookup(&self, session_id: &SessionId) -> Option<SessionHandle> {
        match self.registry.get(session_id) {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(session = %session_id, %err, "command for unknown session ignored");
                None
            }
        }
    }
}
