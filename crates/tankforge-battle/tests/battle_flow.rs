//! Integration tests for the battle system under a paused clock.

use std::time::Duration;

use tankforge_battle::{
    BattleConfig, BattleCoordinator, BattleError, Combatant, EndReason, Move,
};
use tankforge_protocol::{PlayerId, Response, ResponseKind, Tank};
use tokio::sync::mpsc;

type Inbox = mpsc::UnboundedReceiver<Response>;

fn config() -> BattleConfig {
    BattleConfig {
        deck_size: 5,
        card_timeout: Duration::from_secs(10),
        start_delay: Duration::ZERO,
        round_delay: Duration::ZERO,
    }
}

fn combatant(id: &str) -> (Combatant, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Combatant::new(PlayerId::from(id), tx), rx)
}

fn tank(owner: &str, health: i32, attack: i32) -> Tank {
    Tank::new("Test", owner, health, attack)
}

async fn expect(rx: &mut Inbox, kind: ResponseKind) -> Response {
    let frame = rx.recv().await.expect("channel closed");
    assert_eq!(frame.kind, kind, "unexpected frame: {frame:?}");
    frame
}

/// Drains everything left in the channel after the battle task dropped it.
async fn drain(rx: &mut Inbox) -> Vec<Response> {
    let mut frames = Vec::new();
    while let Some(frame) = rx.recv().await {
        frames.push(frame);
    }
    frames
}

#[tokio::test(start_paused = true)]
async fn test_full_round_applies_damage_from_first_side() {
    let coordinator = BattleCoordinator::new(config()).unwrap();
    let (a, mut rx_a) = combatant("1");
    let (b, mut rx_b) = combatant("2");
    let handle = coordinator.start(a, b).await.unwrap();

    let started = expect(&mut rx_a, ResponseKind::BattleStarted).await;
    assert_eq!(started.message, "2");
    let request = expect(&mut rx_a, ResponseKind::CardRequested).await;
    assert_eq!(request.message, "0");
    handle
        .submit(&PlayerId::from("1"), Move::new(tank("1", 100, 28), Some(0)))
        .unwrap();

    expect(&mut rx_b, ResponseKind::BattleStarted).await;
    let request = expect(&mut rx_b, ResponseKind::CardRequested).await;
    assert_eq!(request.message, "0");
    handle
        .submit(&PlayerId::from("2"), Move::new(tank("2", 50, 10), Some(0)))
        .unwrap();

    for rx in [&mut rx_a, &mut rx_b] {
        let turn = expect(rx, ResponseKind::TurnResolved).await;
        assert_eq!(turn.cards.len(), 2);
        assert_eq!(turn.cards[0].health, 100);
        assert_eq!(turn.cards[1].health, 22);
        assert!(turn.message.contains("Player 1"));
    }

    handle.cancel();
    let outcome = handle.finished().await.unwrap();
    assert_eq!(outcome.reason, EndReason::ForcedTermination);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_awards_win_to_opponent() {
    let coordinator = BattleCoordinator::new(config()).unwrap();
    let (a, mut rx_a) = combatant("1");
    let (b, mut rx_b) = combatant("2");
    let handle = coordinator.start(a, b).await.unwrap();

    expect(&mut rx_a, ResponseKind::BattleStarted).await;
    expect(&mut rx_a, ResponseKind::CardRequested).await;
    handle
        .submit(&PlayerId::from("1"), Move::new(tank("1", 100, 28), Some(0)))
        .unwrap();

    // Player 2 never answers; the paused clock skips ahead to the timeout.
    let outcome = handle.finished().await.unwrap();
    assert_eq!(outcome.reason, EndReason::Timeout);
    assert_eq!(outcome.winner, Some(PlayerId::from("1")));
    assert_eq!(outcome.loser, Some(PlayerId::from("2")));

    let over_a = drain(&mut rx_a).await;
    assert_eq!(over_a.last().unwrap().kind, ResponseKind::BattleOver);
    let over_b = drain(&mut rx_b).await;
    let last = over_b.last().unwrap();
    assert_eq!(last.kind, ResponseKind::BattleOver);
    assert!(last.message.contains("timeout"));

    assert!(coordinator.directory().is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_side_loses_with_no_cards_remaining() {
    let coordinator = BattleCoordinator::new(BattleConfig {
        deck_size: 1,
        ..config()
    })
    .unwrap();
    let (a, mut rx_a) = combatant("1");
    let (b, mut rx_b) = combatant("2");
    let handle = coordinator.start(a, b).await.unwrap();

    expect(&mut rx_a, ResponseKind::BattleStarted).await;
    expect(&mut rx_a, ResponseKind::CardRequested).await;
    handle
        .submit(&PlayerId::from("1"), Move::new(tank("1", 100, 100), Some(0)))
        .unwrap();
    expect(&mut rx_b, ResponseKind::BattleStarted).await;
    expect(&mut rx_b, ResponseKind::CardRequested).await;
    handle
        .submit(&PlayerId::from("2"), Move::new(tank("2", 50, 10), Some(0)))
        .unwrap();

    let outcome = handle.finished().await.unwrap();
    assert_eq!(outcome.reason, EndReason::NoCardsRemaining);
    assert_eq!(outcome.winner, Some(PlayerId::from("1")));

    let frames = drain(&mut rx_b).await;
    let kinds: Vec<ResponseKind> = frames.iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![ResponseKind::TurnResolved, ResponseKind::BattleOver]);
    assert!(frames[1].message.contains("no cards remaining"));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_finalizes_exactly_once() {
    let coordinator = BattleCoordinator::new(config()).unwrap();
    let (a, mut rx_a) = combatant("1");
    let (b, mut rx_b) = combatant("2");
    let handle = coordinator.start(a, b).await.unwrap();

    expect(&mut rx_a, ResponseKind::BattleStarted).await;
    expect(&mut rx_a, ResponseKind::CardRequested).await;

    handle.cancel();
    handle.cancel();
    let outcome = handle.finished().await.unwrap();
    assert_eq!(outcome.winner, None);
    assert!(handle.is_finished());

    let over = |frames: &[Response]| {
        frames
            .iter()
            .filter(|f| f.kind == ResponseKind::BattleOver)
            .count()
    };
    assert_eq!(over(&drain(&mut rx_a).await), 1);
    assert_eq!(over(&drain(&mut rx_b).await), 1);
    assert!(coordinator.directory().is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_outside_teardown_mid_wait_clears_directory_and_ends_once() {
    let coordinator = BattleCoordinator::new(config()).unwrap();
    let (a, mut rx_a) = combatant("1");
    let (b, mut rx_b) = combatant("2");
    let handle = coordinator.start(a, b).await.unwrap();

    expect(&mut rx_a, ResponseKind::BattleStarted).await;
    expect(&mut rx_a, ResponseKind::CardRequested).await;

    // A dropped connection cancels the battle and clears its entries
    // before the battle task gets to run its own teardown.
    let found = coordinator
        .directory()
        .get(&PlayerId::from("1"))
        .await
        .unwrap();
    found.cancel();
    assert_eq!(coordinator.directory().remove_pair(&found).await, 2);
    assert!(coordinator.directory().is_empty().await);

    let outcome = handle.finished().await.unwrap();
    assert_eq!(outcome.reason, EndReason::ForcedTermination);
    assert!(coordinator.directory().is_empty().await);

    let over = |frames: &[Response]| {
        frames
            .iter()
            .filter(|f| f.kind == ResponseKind::BattleOver)
            .count()
    };
    assert_eq!(over(&drain(&mut rx_a).await), 1);
    assert_eq!(over(&drain(&mut rx_b).await), 1);
}

#[tokio::test(start_paused = true)]
async fn test_late_teardown_keeps_newer_battle_entries() {
    let coordinator = BattleCoordinator::new(config()).unwrap();
    let (a, _rx_a) = combatant("1");
    let (b, _rx_b) = combatant("2");
    let old = coordinator.start(a.clone(), b.clone()).await.unwrap();

    coordinator.directory().remove_pair(&old).await;
    let newer = coordinator.start(a, b).await.unwrap();

    old.cancel();
    old.finished().await;

    let entry = coordinator.directory().get(&PlayerId::from("2")).await.unwrap();
    assert_eq!(entry.id(), newer.id());
    assert_eq!(coordinator.directory().len().await, 2);
    assert_eq!(coordinator.directory().remove_pair(&old).await, 0);

    newer.cancel();
    newer.finished().await;
}

#[tokio::test(start_paused = true)]
async fn test_second_pending_card_cancels_battle() {
    let coordinator = BattleCoordinator::new(config()).unwrap();
    let (a, _rx_a) = combatant("1");
    let (b, _rx_b) = combatant("2");
    let handle = coordinator.start(a, b).await.unwrap();
    let player = PlayerId::from("2");

    // The battle task has not run yet, so player 2's slot stays full.
    handle
        .submit(&player, Move::new(tank("2", 50, 10), Some(0)))
        .unwrap();
    let err = handle
        .submit(&player, Move::new(tank("2", 50, 10), Some(1)))
        .unwrap_err();
    assert!(matches!(err, BattleError::SlotOccupied { .. }));

    let outcome = handle.finished().await.unwrap();
    assert_eq!(outcome.reason, EndReason::ForcedTermination);
}

#[tokio::test(start_paused = true)]
async fn test_submit_after_finish_is_rejected() {
    let coordinator = BattleCoordinator::new(config()).unwrap();
    let (a, _rx_a) = combatant("1");
    let (b, _rx_b) = combatant("2");
    let handle = coordinator.start(a, b).await.unwrap();

    handle.cancel();
    handle.finished().await;

    let err = handle
        .submit(&PlayerId::from("1"), Move::new(tank("1", 1, 1), Some(0)))
        .unwrap_err();
    assert!(matches!(err, BattleError::Finishing(_)));
}

#[tokio::test(start_paused = true)]
async fn test_submit_from_outsider_is_rejected() {
    let coordinator = BattleCoordinator::new(config()).unwrap();
    let (a, _rx_a) = combatant("1");
    let (b, _rx_b) = combatant("2");
    let handle = coordinator.start(a, b).await.unwrap();

    let err = handle
        .submit(&PlayerId::from("9"), Move::new(tank("9", 1, 1), None))
        .unwrap_err();
    assert!(matches!(err, BattleError::NotAParticipant(_)));
    assert!(!handle.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn test_player_cannot_join_two_battles() {
    let coordinator = BattleCoordinator::new(config()).unwrap();
    let (a, _rx_a) = combatant("1");
    let (b, _rx_b) = combatant("2");
    let (c, _rx_c) = combatant("3");
    let first = coordinator.start(a.clone(), b).await.unwrap();

    let err = coordinator.start(c, a).await.unwrap_err();
    assert!(matches!(err, BattleError::AlreadyInBattle(_)));

    // The rejected battle left no trace of player 3.
    assert!(!coordinator.directory().contains(&PlayerId::from("3")).await);
    assert_eq!(coordinator.directory().len().await, 2);
    let entry = coordinator.directory().get(&PlayerId::from("1")).await.unwrap();
    assert_eq!(entry.id(), first.id());
}

#[tokio::test(start_paused = true)]
async fn test_self_battle_is_rejected() {
    let coordinator = BattleCoordinator::new(config()).unwrap();
    let (a, _rx_a) = combatant("1");
    let err = coordinator.start(a.clone(), a).await.unwrap_err();
    assert!(matches!(err, BattleError::SelfBattle));
}

#[tokio::test(start_paused = true)]
async fn test_out_of_range_index_fields_placeholder() {
    let coordinator = BattleCoordinator::new(config()).unwrap();
    let (a, mut rx_a) = combatant("1");
    let (b, mut rx_b) = combatant("2");
    let handle = coordinator.start(a, b).await.unwrap();

    expect(&mut rx_a, ResponseKind::BattleStarted).await;
    expect(&mut rx_a, ResponseKind::CardRequested).await;
    handle
        .submit(&PlayerId::from("1"), Move::new(tank("1", 999, 999), Some(42)))
        .unwrap();
    expect(&mut rx_b, ResponseKind::BattleStarted).await;
    expect(&mut rx_b, ResponseKind::CardRequested).await;
    handle
        .submit(&PlayerId::from("2"), Move::new(tank("2", 50, 10), Some(0)))
        .unwrap();

    let turn = expect(&mut rx_a, ResponseKind::TurnResolved).await;
    assert_eq!(turn.cards[0], Tank::placeholder(&PlayerId::from("1")));
    assert_eq!(turn.cards[1].health, 50);

    handle.cancel();
    handle.finished().await;
}

#[tokio::test(start_paused = true)]
async fn test_start_delay_is_cut_short_by_cancel() {
    let coordinator = BattleCoordinator::new(BattleConfig {
        start_delay: Duration::from_secs(3600),
        ..config()
    })
    .unwrap();
    let (a, mut rx_a) = combatant("1");
    let (b, _rx_b) = combatant("2");
    let handle = coordinator.start(a, b).await.unwrap();

    expect(&mut rx_a, ResponseKind::BattleStarted).await;
    handle.cancel();
    let outcome = handle.finished().await.unwrap();
    assert_eq!(outcome.reason, EndReason::ForcedTermination);

    let rest = drain(&mut rx_a).await;
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].kind, ResponseKind::BattleOver);
}

#[test]
fn test_coordinator_rejects_invalid_config() {
    let result = BattleCoordinator::new(BattleConfig {
        deck_size: 0,
        ..config()
    });
    assert!(matches!(result, Err(BattleError::InvalidConfig(_))));
}
