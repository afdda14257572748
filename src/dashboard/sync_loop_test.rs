use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use super::*;
use crate::dashboard::test_helpers::{dashboard, game, seed_game, settle};
use crate::net::transport::Method;
use crate::net::transport::test_helpers::{MockTransport, Reply};

const PERIOD: Duration = Duration::from_secs(5);

fn players_calls(mock: &MockTransport, game_id: &str) -> usize {
    mock.count(Method::Get, &format!("/games/{game_id}/players"))
}

#[tokio::test(start_paused = true)]
async fn select_fetches_immediately() {
    let mock = Arc::new(MockTransport::new());
    seed_game(&mock, "g1", "p1", 13);
    let dash = dashboard(&mock);

    dash.select(game("g1"));
    settle().await;

    assert_eq!(players_calls(&mock, "g1"), 1);
    assert_eq!(mock.count(Method::Get, "/players/p1/hand"), 1);
    assert_eq!(mock.count(Method::Get, "/games/g1/remaining-by-suit"), 1);
    assert_eq!(mock.count(Method::Get, "/games/g1/remaining-by-suit-rank"), 1);

    let view = dash.view();
    let session = view.session.unwrap();
    assert!(session.synced);
    assert_eq!(session.snapshot.players.len(), 1);
    assert_eq!(session.snapshot.total_remaining(), 52);
}

#[tokio::test(start_paused = true)]
async fn loop_repeats_every_interval() {
    let mock = Arc::new(MockTransport::new());
    seed_game(&mock, "g1", "p1", 13);
    let dash = dashboard(&mock);

    dash.select(game("g1"));
    settle().await;
    assert_eq!(players_calls(&mock, "g1"), 1);

    tokio::time::sleep(PERIOD).await;
    assert_eq!(players_calls(&mock, "g1"), 2);

    tokio::time::sleep(PERIOD).await;
    assert_eq!(players_calls(&mock, "g1"), 3);
}

#[tokio::test(start_paused = true)]
async fn slow_cycle_does_not_hold_back_later_ticks() {
    let mock = Arc::new(MockTransport::new());
    seed_game(&mock, "g1", "p1", 13);
    let gate = mock.gate(Method::Get, "/games/g1/players");
    let dash = dashboard(&mock);

    dash.select(game("g1"));
    settle().await;
    assert_eq!(players_calls(&mock, "g1"), 1);

    tokio::time::sleep(PERIOD).await;
    tokio::time::sleep(PERIOD).await;
    assert_eq!(players_calls(&mock, "g1"), 3);
    assert!(!dash.view().session.unwrap().synced);

    gate.add_permits(3);
    settle().await;

    let session = dash.view().session.unwrap();
    assert!(session.synced);
    assert!(session.connection_healthy);
    assert_eq!(mock.count(Method::Get, "/players/p1/hand"), 3);
}

#[tokio::test(start_paused = true)]
async fn late_result_for_previous_selection_is_discarded() {
    let mock = Arc::new(MockTransport::new());
    seed_game(&mock, "a", "pa", 13);
    seed_game(&mock, "b", "pb", 2);
    let gate = mock.gate(Method::Get, "/games/a/players");
    let dash = dashboard(&mock);

    dash.select(game("a"));
    settle().await;
    assert_eq!(players_calls(&mock, "a"), 1);

    dash.select(game("b"));
    settle().await;

    gate.add_permits(1);
    settle().await;

    let session = dash.view().session.unwrap();
    assert_eq!(session.game_id(), "b");
    assert_eq!(session.snapshot.players[0].player_id, "pb");
    assert_eq!(session.snapshot.total_remaining(), 8);
}

#[tokio::test(start_paused = true)]
async fn late_failure_for_previous_selection_leaves_health_alone() {
    let mock = Arc::new(MockTransport::new());
    seed_game(&mock, "b", "pb", 2);
    mock.on(Method::Get, "/games/a/players", Reply::Status(500));
    let gate = mock.gate(Method::Get, "/games/a/players");
    let dash = dashboard(&mock);

    dash.select(game("a"));
    settle().await;
    dash.select(game("b"));
    settle().await;

    gate.add_permits(1);
    settle().await;

    let view = dash.view();
    assert!(view.connection_healthy());
    assert!(view.session.unwrap().synced);
}

#[tokio::test(start_paused = true)]
async fn hand_failure_keeps_snapshot_and_marks_unhealthy() {
    let mock = Arc::new(MockTransport::new());
    seed_game(&mock, "g1", "p1", 13);
    let dash = dashboard(&mock);

    dash.select(game("g1"));
    settle().await;
    let before = dash.view().session.unwrap().snapshot;

    mock.on(Method::Get, "/players/p1/hand", Reply::Status(500));
    mock.on_json(Method::Get, "/games/g1/remaining-by-suit", json!([{ "suit": "HEARTS", "remaining": 1 }]));
    assert_eq!(dash.refresh().await, Some(CycleOutcome::Failed));

    let view = dash.view();
    assert!(!view.connection_healthy());
    assert_eq!(view.session.unwrap().snapshot, before);
}

#[tokio::test(start_paused = true)]
async fn successful_cycle_restores_health() {
    let mock = Arc::new(MockTransport::new());
    mock.on(Method::Get, "/games/g1/players", Reply::Status(503));
    let dash = dashboard(&mock);

    dash.select(game("g1"));
    settle().await;
    assert!(!dash.view().connection_healthy());
    assert!(!dash.view().session.unwrap().synced);

    seed_game(&mock, "g1", "p1", 13);
    assert_eq!(dash.refresh().await, Some(CycleOutcome::Committed));
    assert!(dash.view().connection_healthy());
}

#[tokio::test(start_paused = true)]
async fn deselect_stops_the_loop() {
    let mock = Arc::new(MockTransport::new());
    seed_game(&mock, "g1", "p1", 13);
    let dash = dashboard(&mock);

    dash.select(game("g1"));
    settle().await;
    dash.deselect();

    tokio::time::sleep(PERIOD * 3).await;
    assert_eq!(players_calls(&mock, "g1"), 1);
    assert!(dash.view().session.is_none());
}

#[tokio::test(start_paused = true)]
async fn rapid_reselect_leaves_a_single_timer() {
    let mock = Arc::new(MockTransport::new());
    seed_game(&mock, "g1", "p1", 13);
    let dash = dashboard(&mock);

    dash.select(game("g1"));
    dash.select(game("g1"));
    dash.select(game("g1"));
    settle().await;
    assert_eq!(players_calls(&mock, "g1"), 1);

    tokio::time::sleep(PERIOD).await;
    assert_eq!(players_calls(&mock, "g1"), 2);
}

#[tokio::test(start_paused = true)]
async fn manual_refresh_does_not_add_a_timer() {
    let mock = Arc::new(MockTransport::new());
    seed_game(&mock, "g1", "p1", 13);
    let dash = dashboard(&mock);

    dash.select(game("g1"));
    settle().await;
    assert_eq!(dash.refresh().await, Some(CycleOutcome::Committed));
    assert_eq!(players_calls(&mock, "g1"), 2);

    tokio::time::sleep(PERIOD).await;
    assert_eq!(players_calls(&mock, "g1"), 3);
    tokio::time::sleep(PERIOD).await;
    assert_eq!(players_calls(&mock, "g1"), 4);
}

#[tokio::test(start_paused = true)]
async fn refresh_without_selection_is_none() {
    let mock = Arc::new(MockTransport::new());
    let dash = dashboard(&mock);
    assert_eq!(dash.refresh().await, None);
    assert!(mock.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cycle_for_unknown_epoch_is_discarded() {
    let mock = Arc::new(MockTransport::new());
    let dash = dashboard(&mock);
    assert_eq!(dash.run_cycle(42).await, CycleOutcome::Discarded);
    assert!(mock.calls().is_empty());
}
