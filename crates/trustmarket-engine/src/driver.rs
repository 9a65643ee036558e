//! The per-session phase timer.
//!
//! One spawned task per live session ticks every second. Each tick takes
//! the session lock, decrements the countdown, publishes a snapshot, and —
//! on expiry — fires the phase's exit action inside the same critical
//! section. The exit action installs the next phase's full duration before
//! the lock drops, so a late or duplicate tick can never re-fire it.
//!
//! Slow work (question fetch, settlement) runs in separate spawned tasks
//! that post results back by re-locking the session.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{info, warn};
use trustmarket_quiz::QuestionProvider;
use trustmarket_settlement::{apply_ledger, market_crash, settle_round};
use trustmarket_types::{
    GameConfig, GameEvent, GamePhase, Question, Session, SessionId, TraderEntry, constants,
};

use crate::bus::GameBus;
use crate::registry::SessionHandle;
use crate::roles::assign_hidden_roles;

/// One registered timer: the task handle plus the generation it was
/// spawned under, so cleanup can tell a driver's own slot from a
/// successor's after the session was recreated.
pub(crate) struct TimerSlot {
    pub generation: u64,
    pub handle: JoinHandle<()>,
}

/// Everything one session's timer task needs.
pub(crate) struct DriverCtx<B, P> {
    pub session: SessionHandle,
    pub bus: Arc<B>,
    pub provider: Arc<P>,
    pub config: GameConfig,
    pub generation: u64,
    pub timers: Arc<DashMap<SessionId, TimerSlot>>,
}

/// Run the timer until the session reaches FINISHED.
pub(crate) async fn run<B: GameBus, P: QuestionProvider + 'static>(ctx: DriverCtx<B, P>) {
    let session_id = ctx.session.lock().await.id.clone();
    let mut rng = StdRng::from_entropy();
    let mut interval = time::interval(Duration::from_secs(constants::TICK_INTERVAL_SECS));

    info!(session = %session_id, "phase timer started");
    loop {
        interval.tick().await;
        if tick(&ctx, &mut rng).await {
            break;
        }
    }
    // Only drop our own registration; a recreated session may already
    // have a successor timer in the slot.
    ctx.timers
        .remove_if(&session_id, |_, slot| slot.generation == ctx.generation);
    info!(session = %session_id, "phase timer stopped");
}

/// One tick. Returns `true` when the timer should stop.
async fn tick<B: GameBus, P: QuestionProvider + 'static>(
    ctx: &DriverCtx<B, P>,
    rng: &mut StdRng,
) -> bool {
    let mut session = ctx.session.lock().await;
    if session.phase.is_terminal() {
        return true;
    }

    session.time_remaining = session.time_remaining.saturating_sub(1);
    ctx.bus.publish(
        &session.id,
        &GameEvent::RoomSnapshot(session.snapshot()),
    );
    if session.time_remaining > 0 {
        return false;
    }

    let expired = session.phase;
    match expired {
        GamePhase::BlindBet => {
            if session.trader_ids().is_empty() && session.player_count() > 1 {
                crash_and_restart(ctx, &mut session);
            } else {
                reveal_roles(ctx, &mut session, rng);
                enter(ctx, &mut session, GamePhase::RoleAssign);
            }
        }
        GamePhase::RoleAssign => {
            enter(ctx, &mut session, GamePhase::MarketChat);
            spawn_question_fetch(ctx);
        }
        GamePhase::MarketChat => {
            enter(ctx, &mut session, GamePhase::Closing);
        }
        GamePhase::Closing => {
            enter(ctx, &mut session, GamePhase::Calculation);
            spawn_settlement(ctx);
        }
        GamePhase::Calculation => {
            if session.round >= session.total_rounds {
                session.phase = GamePhase::Finished;
                session.time_remaining = 0;
                info!(session = %session.id, rounds = session.round, "game over");
                ctx.bus.publish(
                    &session.id,
                    &GameEvent::RoomSnapshot(session.snapshot()),
                );
                return true;
            }
            session.round += 1;
            session.reset_round();
            info!(session = %session.id, round = session.round, "next round");
            enter(ctx, &mut session, GamePhase::BlindBet);
        }
        GamePhase::Waiting | GamePhase::Finished => return true,
    }
    false
}

/// Install the next phase and its full countdown, then announce it.
fn enter<B: GameBus, P>(
    ctx: &DriverCtx<B, P>,
    session: &mut Session,
    phase: GamePhase,
) {
    session.phase = phase;
    session.time_remaining = phase.duration_secs().unwrap_or(0);
    info!(session = %session.id, %phase, round = session.round, "phase entered");
    ctx.bus.publish(
        &session.id,
        &GameEvent::RoomSnapshot(session.snapshot()),
    );
}

/// No Traders and more than one player: flat penalty, same round restarts.
fn crash_and_restart<B: GameBus, P>(
    ctx: &DriverCtx<B, P>,
    session: &mut Session,
) {
    let ledger = market_crash(session);
    apply_ledger(session, &ledger);
    ctx.bus.publish(
        &session.id,
        &GameEvent::RoomError {
            message: "Market crash: no traders entered the round. Everyone loses 10% of their cash."
                .to_string(),
        },
    );
    ctx.bus.publish(
        &session.id,
        &GameEvent::RoundResults {
            results: ledger,
            correct_answer: None,
        },
    );
    session.reset_round();
    enter(ctx, session, GamePhase::BlindBet);
}

/// Deal hidden roles, deliver each privately, and publish the public roster.
fn reveal_roles<B: GameBus, P>(
    ctx: &DriverCtx<B, P>,
    session: &mut Session,
    rng: &mut StdRng,
) {
    let dealt = assign_hidden_roles(session, rng);
    for (player_id, role) in &dealt {
        ctx.bus
            .publish_to_player(player_id, &GameEvent::HiddenRoleReveal { role: *role });
    }

    let traders: Vec<TraderEntry> = session
        .players_ordered()
        .into_iter()
        .filter(|p| p.is_trader())
        .map(|p| TraderEntry {
            id: p.id.clone(),
            display_name: p.display_name.clone(),
        })
        .collect();
    ctx.bus
        .publish(&session.id, &GameEvent::TraderRoster { traders });
}

/// Fetch the round's question off-tick and attach it once it arrives.
///
/// Any failure substitutes the fallback question; a round never stalls on
/// the provider. The result is dropped if the market already closed or a
/// question is somehow present.
fn spawn_question_fetch<B: GameBus, P: QuestionProvider + 'static>(ctx: &DriverCtx<B, P>) {
    let handle = Arc::clone(&ctx.session);
    let bus = Arc::clone(&ctx.bus);
    let provider = Arc::clone(&ctx.provider);
    let topic = ctx.config.question_topic.clone();
    let deadline = ctx.config.question_timeout;

    tokio::spawn(async move {
        let question = match time::timeout(deadline, provider.fetch_question(&topic)).await {
            Ok(Ok(q)) => q,
            Ok(Err(err)) => {
                warn!(%err, "question provider failed, using fallback");
                Question::fallback()
            }
            Err(_) => {
                warn!("question provider timed out, using fallback");
                Question::fallback()
            }
        };

        let mut session = handle.lock().await;
        let market_open = matches!(
            session.phase,
            GamePhase::MarketChat | GamePhase::Closing
        );
        if market_open && session.question.is_none() {
            session.question = Some(question);
            bus.publish(
                &session.id,
                &GameEvent::RoomSnapshot(session.snapshot()),
            );
        }
    });
}

/// Settle the round off-tick and post the ledger back under the lock.
fn spawn_settlement<B: GameBus, P>(ctx: &DriverCtx<B, P>) {
    let handle = Arc::clone(&ctx.session);
    let bus = Arc::clone(&ctx.bus);

    tokio::spawn(async move {
        let frozen = handle.lock().await.clone();
        let ledger = settle_round(&frozen);
        let correct_answer = frozen.question.map(|q| q.correct_answer);

        let mut session = handle.lock().await;
        apply_ledger(&mut session, &ledger);
        bus.publish(
            &session.id,
            &GameEvent::RoundResults {
                results: ledger,
                correct_answer,
            },
        );
    });
}
