//! Full game-flow tests under paused virtual time.
//!
//! The driver ticks once per second; with `start_paused` the runtime
//! auto-advances the clock, so a whole game plays out instantly. The first
//! tick fires immediately on spawn, so a 20-second phase expires about 19
//! virtual seconds after `start`. Sleeps below land mid-phase to stay clear
//! of the boundaries.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::sleep;
use trustmarket_engine::{BroadcastBus, GameEngine};
use trustmarket_quiz::StaticProvider;
use trustmarket_types::{
    GameConfig, GameEvent, GamePhase, HiddenRole, PlayerId, SessionId, TrustmarketError,
    event::topics,
};

fn engine_with(config: GameConfig) -> (GameEngine<BroadcastBus, StaticProvider>, Arc<BroadcastBus>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let bus = Arc::new(BroadcastBus::new());
    let engine = GameEngine::new(config, Arc::clone(&bus), Arc::new(StaticProvider));
    (engine, bus)
}

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

async fn secs(n: u64) {
    sleep(Duration::from_secs(n)).await;
}

#[tokio::test(start_paused = true)]
async fn phases_advance_in_order() {
    let (engine, _bus) = engine_with(GameConfig::default());
    let host = PlayerId::new("host");
    let sid = engine
        .create_session(Some(SessionId::new("r1")), host.clone())
        .await
        .unwrap();
    engine.start(&sid, &host).await.unwrap();
    assert_eq!(engine.snapshot(&sid).await.unwrap().phase, GamePhase::BlindBet);

    secs(21).await;
    assert_eq!(engine.snapshot(&sid).await.unwrap().phase, GamePhase::RoleAssign);

    secs(9).await; // t=30
    let snap = engine.snapshot(&sid).await.unwrap();
    assert_eq!(snap.phase, GamePhase::MarketChat);
    assert!(snap.question.is_some(), "question attached on market open");

    secs(42).await; // t=72
    assert_eq!(engine.snapshot(&sid).await.unwrap().phase, GamePhase::Closing);

    secs(10).await; // t=82
    assert_eq!(
        engine.snapshot(&sid).await.unwrap().phase,
        GamePhase::Calculation
    );

    secs(15).await; // t=97, round 2
    let snap = engine.snapshot(&sid).await.unwrap();
    assert_eq!(snap.phase, GamePhase::BlindBet);
    assert_eq!(snap.round, 2);
}

#[tokio::test(start_paused = true)]
async fn market_crash_restarts_the_same_round() {
    let (engine, bus) = engine_with(GameConfig::default());
    let host = PlayerId::new("host");
    let sid = engine
        .create_session(Some(SessionId::new("r1")), host.clone())
        .await
        .unwrap();
    engine.join(&sid, PlayerId::new("p2"), "Bea", None).await.unwrap();
    let mut errors = bus.subscribe(&topics::error(&sid));

    engine.start(&sid, &host).await.unwrap();
    // Nobody stakes: two players, zero traders.
    secs(21).await;
    let snap = engine.snapshot(&sid).await.unwrap();
    assert_eq!(snap.phase, GamePhase::BlindBet, "same phase restarted");
    assert_eq!(snap.round, 1, "round does not advance on a crash");
    for p in &snap.players {
        assert_eq!(p.cash, dec(1800));
    }
    assert!(matches!(
        errors.recv().await.unwrap(),
        GameEvent::RoomError { .. }
    ));

    // And again: the penalty compounds.
    secs(20).await; // t=41
    let snap = engine.snapshot(&sid).await.unwrap();
    assert_eq!(snap.round, 1);
    for p in &snap.players {
        assert_eq!(p.cash, dec(1620));
    }
}

#[tokio::test(start_paused = true)]
async fn game_finishes_after_total_rounds() {
    let (engine, _bus) = engine_with(GameConfig {
        total_rounds: 2,
        ..GameConfig::default()
    });
    let host = PlayerId::new("host");
    let sid = engine
        .create_session(Some(SessionId::new("r1")), host.clone())
        .await
        .unwrap();
    engine.start(&sid, &host).await.unwrap();

    secs(200).await;
    let snap = engine.snapshot(&sid).await.unwrap();
    assert_eq!(snap.phase, GamePhase::Finished);
    assert_eq!(snap.round, 2);

    let err = engine.start(&sid, &host).await.unwrap_err();
    assert!(matches!(err, TrustmarketError::SessionFinished(_)));
}

#[tokio::test(start_paused = true)]
async fn settlement_results_are_broadcast() {
    let (engine, bus) = engine_with(GameConfig::default());
    let host = PlayerId::new("host");
    let p2 = PlayerId::new("p2");
    let sid = engine
        .create_session(Some(SessionId::new("r1")), host.clone())
        .await
        .unwrap();
    engine.join(&sid, p2.clone(), "Bea", None).await.unwrap();
    let mut results = bus.subscribe(&topics::results(&sid));

    engine.start(&sid, &host).await.unwrap();
    engine.place_stake(&sid, &host, "TRADER", dec(100)).await.unwrap();
    engine.place_stake(&sid, &p2, "TRADER", dec(100)).await.unwrap();

    secs(30).await;
    engine.submit_answer(&sid, &host, "a").await.unwrap();
    engine.submit_answer(&sid, &p2, "A").await.unwrap();

    secs(55).await; // t=85, settlement ran at t=79
    let GameEvent::RoundResults {
        results: ledger,
        correct_answer,
    } = results.recv().await.unwrap()
    else {
        panic!("expected round results");
    };
    assert_eq!(correct_answer.as_deref(), Some("A"));
    assert_eq!(ledger.len(), 2);
    // One of the two is the Oracle (+100), the other the exposed Scammer
    // (-100); the draw is random but the deltas always cancel.
    let total: Decimal = ledger.iter().map(|e| e.delta).sum();
    assert_eq!(total, Decimal::ZERO);
}

#[tokio::test(start_paused = true)]
async fn trust_updates_push_immediately() {
    let (engine, bus) = engine_with(GameConfig::default());
    let host = PlayerId::new("host");
    let p2 = PlayerId::new("p2");
    let sid = engine
        .create_session(Some(SessionId::new("r1")), host.clone())
        .await
        .unwrap();
    engine.join(&sid, p2.clone(), "Bea", None).await.unwrap();
    let mut trust = bus.subscribe(&topics::trust_update(&sid));

    engine.start(&sid, &host).await.unwrap();
    engine.place_stake(&sid, &host, "TRADER", dec(100)).await.unwrap();
    engine.place_stake(&sid, &p2, "INVESTOR", dec(50)).await.unwrap();

    // Too early: the market isn't open yet.
    let err = engine.choose_investment(&sid, &p2, &host).await.unwrap_err();
    assert!(matches!(err, TrustmarketError::WrongPhase { .. }));

    secs(30).await;
    engine.choose_investment(&sid, &p2, &host).await.unwrap();
    let GameEvent::TrustUpdate { investor, trader } = trust.recv().await.unwrap() else {
        panic!("expected trust update");
    };
    assert_eq!(investor, p2);
    assert_eq!(trader, host);

    // Investing in a non-trader is rejected.
    let err = engine.choose_investment(&sid, &p2, &p2).await.unwrap_err();
    assert!(matches!(err, TrustmarketError::InvalidTarget { .. }));
}

#[tokio::test(start_paused = true)]
async fn hidden_roles_are_delivered_privately() {
    let (engine, bus) = engine_with(GameConfig::default());
    let host = PlayerId::new("host");
    let sid = engine
        .create_session(Some(SessionId::new("r1")), host.clone())
        .await
        .unwrap();
    let mut private = bus.subscribe_private(&host);

    engine.start(&sid, &host).await.unwrap();
    engine.place_stake(&sid, &host, "TRADER", dec(100)).await.unwrap();

    let GameEvent::StakeAccepted { role, amount } = private.recv().await.unwrap() else {
        panic!("expected stake confirmation");
    };
    assert_eq!(role.to_string(), "TRADER");
    assert_eq!(amount, dec(100));

    secs(21).await;
    let GameEvent::HiddenRoleReveal { role } = private.recv().await.unwrap() else {
        panic!("expected hidden role reveal");
    };
    // A lone trader always carries a secret agenda.
    assert_ne!(role, HiddenRole::Normal);
}

#[tokio::test(start_paused = true)]
async fn recreate_replaces_the_session_and_kills_its_timer() {
    let (engine, _bus) = engine_with(GameConfig::default());
    let host = PlayerId::new("host");
    let sid = engine
        .create_session(Some(SessionId::new("r1")), host.clone())
        .await
        .unwrap();
    engine.start(&sid, &host).await.unwrap();
    secs(5).await;

    let host2 = PlayerId::new("host2");
    engine
        .create_session(Some(SessionId::new("r1")), host2.clone())
        .await
        .unwrap();
    assert_eq!(engine.registry().len(), 1);

    // The old timer is gone: the fresh lobby stays in WAITING.
    secs(30).await;
    let snap = engine.snapshot(&sid).await.unwrap();
    assert_eq!(snap.phase, GamePhase::Waiting);
    assert_eq!(snap.host_id, host2);
    assert_eq!(snap.players.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn simultaneous_starts_drive_one_timer() {
    let (engine, _bus) = engine_with(GameConfig::default());
    let host = PlayerId::new("host");
    let sid = engine
        .create_session(Some(SessionId::new("r1")), host.clone())
        .await
        .unwrap();

    let (a, b) = tokio::join!(engine.start(&sid, &host), engine.start(&sid, &host));
    a.unwrap();
    b.unwrap();

    // A duplicate driver would decrement the countdown twice per second
    // and blow through BLIND_BET in 10 seconds; with exactly one timer
    // the first phase has expired exactly once by t=21.
    secs(21).await;
    let snap = engine.snapshot(&sid).await.unwrap();
    assert_eq!(snap.phase, GamePhase::RoleAssign);
    assert_eq!(snap.round, 1);
}

#[tokio::test(start_paused = true)]
async fn restart_after_finish_keeps_the_new_timer_stoppable() {
    let (engine, _bus) = engine_with(GameConfig {
        total_rounds: 1,
        ..GameConfig::default()
    });
    let host = PlayerId::new("host");
    let sid = engine
        .create_session(Some(SessionId::new("r1")), host.clone())
        .await
        .unwrap();
    engine.start(&sid, &host).await.unwrap();
    secs(100).await;
    assert_eq!(engine.snapshot(&sid).await.unwrap().phase, GamePhase::Finished);

    // Recreate under the same id: the old driver's cleanup must not have
    // taken the new session's timer registration with it.
    engine
        .create_session(Some(SessionId::new("r1")), host.clone())
        .await
        .unwrap();
    engine.start(&sid, &host).await.unwrap();
    secs(5).await;
    assert_eq!(engine.snapshot(&sid).await.unwrap().phase, GamePhase::BlindBet);

    engine.stop(&sid, &host).await.unwrap();
    assert_eq!(engine.snapshot(&sid).await.unwrap().phase, GamePhase::Finished);
    secs(60).await;
    assert_eq!(engine.snapshot(&sid).await.unwrap().phase, GamePhase::Finished);
}

#[tokio::test(start_paused = true)]
async fn finished_sessions_ignore_player_removal() {
    let (engine, _bus) = engine_with(GameConfig::default());
    let host = PlayerId::new("host");
    let p2 = PlayerId::new("p2");
    let sid = engine
        .create_session(Some(SessionId::new("r1")), host.clone())
        .await
        .unwrap();
    engine.join(&sid, p2.clone(), "Bea", None).await.unwrap();
    engine.stop(&sid, &host).await.unwrap();

    engine.remove_player(&sid, &p2).await.unwrap();
    let snap = engine.snapshot(&sid).await.unwrap();
    assert_eq!(snap.phase, GamePhase::Finished);
    assert_eq!(snap.players.len(), 2, "terminal sessions accept no mutation");
}

#[tokio::test(start_paused = true)]
async fn stop_is_terminal() {
    let (engine, _bus) = engine_with(GameConfig::default());
    let host = PlayerId::new("host");
    let sid = engine
        .create_session(Some(SessionId::new("r1")), host.clone())
        .await
        .unwrap();
    engine.start(&sid, &host).await.unwrap();
    secs(5).await;

    let err = engine.stop(&sid, &PlayerId::new("p2")).await.unwrap_err();
    assert!(matches!(err, TrustmarketError::NotHost { .. }));

    engine.stop(&sid, &host).await.unwrap();
    assert_eq!(engine.snapshot(&sid).await.unwrap().phase, GamePhase::Finished);

    // No timer left to move it anywhere.
    secs(60).await;
    assert_eq!(engine.snapshot(&sid).await.unwrap().phase, GamePhase::Finished);

    let err = engine
        .join(&sid, PlayerId::new("late"), "Late", None)
        .await
        .unwrap_err();
    assert!(matches!(err, TrustmarketError::SessionFinished(_)));
}
