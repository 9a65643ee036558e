//! End-to-end settlement of a realistic six-player round, plus the
//! crash path, applied back onto the session the way the orchestrator does.

use rust_decimal::Decimal;
use trustmarket_settlement::{apply_ledger, market_crash, settle_round};
use trustmarket_types::{
    HiddenRole, Player, PlayerId, PublicRole, Question, Session, SessionId, SettlementReason,
};

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

fn session() -> Session {
    let mut s = Session::new(SessionId::new("room"), PlayerId::new("host"), dec(2000), 10);
    s.remove_player(&PlayerId::new("host"));
    s.question = Some(Question::fallback()); // answer key "A"
    s
}

fn trader(id: &str, role: HiddenRole, stake: i64, answer: &str) -> Player {
    let mut p = Player::new(PlayerId::new(id), id, dec(2000));
    p.public_role = Some(PublicRole::Trader);
    p.hidden_role = Some(role);
    p.stake = dec(stake);
    p.selected_answer = Some(answer.to_string());
    p
}

fn investor(id: &str, stake: i64, target: &str) -> Player {
    let mut p = Player::new(PlayerId::new(id), id, dec(2000));
    p.public_role = Some(PublicRole::Investor);
    p.stake = dec(stake);
    p.invest_target = Some(PlayerId::new(target));
    p
}

fn cash(s: &Session, id: &str) -> Decimal {
    s.player(&PlayerId::new(id)).unwrap().cash
}

#[test]
fn six_player_round_settles_and_applies() {
    let mut s = session();
    // An Oracle who wins, a Scammer who escapes, a Normal who loses.
    s.add_player(trader("t-oracle", HiddenRole::Oracle, 100, "A"));
    s.add_player(trader("t-scam", HiddenRole::Scammer, 100, "C"));
    s.add_player(trader("t-norm", HiddenRole::Normal, 100, "B"));
    s.add_player(investor("i-1", 50, "t-oracle"));
    s.add_player(investor("i-2", 80, "t-scam"));
    s.add_player(investor("i-3", 60, "t-norm"));

    let ledger = settle_round(&s);
    apply_ledger(&mut s, &ledger);

    // Oracle: +100 stake, then forfeits 70 to the single backer.
    assert_eq!(cash(&s, "t-oracle"), dec(2000 + 100 - 70));
    // Backer of the Oracle: stake back plus the full 70 share.
    assert_eq!(cash(&s, "i-1"), dec(2000 + 50 + 70));
    // Scammer escaped: own stake untouched, takes the backer's 80.
    assert_eq!(cash(&s, "t-scam"), dec(2000 + 80));
    assert_eq!(cash(&s, "i-2"), dec(2000 - 80));
    // Normal answered wrong: both lose their stake.
    assert_eq!(cash(&s, "t-norm"), dec(2000 - 100));
    assert_eq!(cash(&s, "i-3"), dec(2000 - 60));

    // Wire form carries SCREAMING_SNAKE reasons.
    let json = serde_json::to_string(&ledger).unwrap();
    assert!(json.contains("\"ORACLE_SHARE_FORFEITED\""));
    assert!(json.contains("\"SCAM_PROCEEDS\""));
}

#[test]
fn crash_then_next_round_settles_on_reduced_cash() {
    let mut s = session();
    s.add_player(investor("i-1", 50, "nobody"));
    s.add_player(investor("i-2", 50, "nobody"));

    let crash = market_crash(&s);
    apply_ledger(&mut s, &crash);
    assert_eq!(cash(&s, "i-1"), dec(1800));
    assert_eq!(cash(&s, "i-2"), dec(1800));

    // Round restarts; the next settlement starts from the reduced balance.
    s.reset_round();
    s.question = Some(Question::fallback());
    let p = s.player_mut(&PlayerId::new("i-1")).unwrap();
    p.public_role = Some(PublicRole::Trader);
    p.hidden_role = Some(HiddenRole::Normal);
    p.stake = dec(100);
    p.selected_answer = Some("A".to_string());

    let ledger = settle_round(&s);
    apply_ledger(&mut s, &ledger);
    assert_eq!(cash(&s, "i-1"), dec(1900));
}

#[test]
fn ledger_entries_chain_per_player() {
    let mut s = session();
    s.add_player(trader("t-1", HiddenRole::Normal, 100, "A"));
    s.add_player(investor("i-1", 50, "t-1"));

    let ledger = settle_round(&s);
    let trader_entries: Vec<_> = ledger
        .iter()
        .filter(|e| e.player_id.as_str() == "t-1")
        .collect();
    assert_eq!(trader_entries.len(), 2);
    assert_eq!(trader_entries[0].cash_after, trader_entries[1].cash_before);
    assert_eq!(trader_entries[0].reason, SettlementReason::AnswerCorrect);
    assert_eq!(trader_entries[1].reason, SettlementReason::CommissionEarned);
}
