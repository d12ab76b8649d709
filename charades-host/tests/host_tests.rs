
use charades_host::{HostCommand, HostError};
use charades_types::{SessionError, SessionEvent, SessionPhase};
use std::time::Duration;
use test_helpers::*;

#[tokio::test(start_paused = true)]
async fn test_round_countdown_is_delivered_through_host() {
    let mut host = spawn_team_host(5, 3).await;

    let snapshot = host.handle.restart_round().await.unwrap();
    assert_eq!(snapshot.phase, SessionPhase::RoundActive);
    assert!(snapshot.countdown_active);

    tokio::time::sleep(Duration::from_millis(4500)).await;

    let events = host.drain_events();
    assert!(matches!(events[0], SessionEvent::WordChanged { .. }));
    assert_eq!(ticks(&events), vec![3, 2, 1, 0]);
    assert_eq!(events.last(), Some(&SessionEvent::TimeExpired));

    let snapshot = host.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, SessionPhase::RoundEnded);
    assert!(!snapshot.countdown_active);
    assert_eq!(snapshot.current_round, 1);
}

#[tokio::test(start_paused = true)]
async fn test_pass_turn_restarts_countdown() {
    let mut host = spawn_team_host(5, 10).await;
    host.handle.restart_round().await.unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;

    let snapshot = host.handle.pass_turn().await.unwrap();
    assert_eq!(snapshot.active_team().unwrap().name, "B");

    tokio::time::sleep(Duration::from_millis(500)).await;
    let events = host.drain_events();

    // Old countdown reached 8, the new one starts over at 10
    assert_eq!(ticks(&events), vec![10, 9, 8, 10]);
    assert!(!events.contains(&SessionEvent::TimeExpired));
}

#[tokio::test(start_paused = true)]
async fn test_pass_turn_without_category() {
    let mut host = spawn_test_host(5, 10);
    host.handle.create_teams("A", "B").await.unwrap();
    host.handle.pass_turn().await.unwrap();
    let snapshot = host.handle.pass_turn().await.unwrap();

    assert_eq!(snapshot.active_team().unwrap().name, "A");
    assert_eq!(snapshot.current_round, 2);
    assert_eq!(snapshot.current_word, None);

    let events = host.drain_events();
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, SessionEvent::WordChanged { .. }))
    );
}

#[tokio::test(start_paused = true)]
async fn test_session_errors_reach_the_caller() {
    let host = spawn_test_host(5, 60);

    let result = host.handle.select_category("Sports").await;
    assert!(matches!(
        result,
        Err(HostError::Session(SessionError::NotFound { .. }))
    ));

    let result = host.handle.restart_round().await;
    assert!(matches!(
        result,
        Err(HostError::Session(SessionError::InvalidState { .. }))
    ));

    let result = host.handle.register_player("   ").await;
    assert!(matches!(
        result,
        Err(HostError::Session(SessionError::InvalidInput { .. }))
    ));

    // The host keeps running after rejected commands
    assert!(host.handle.snapshot().await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_solo_play_through_host() {
    let mut host = spawn_test_host(5, 60);
    host.handle.register_player("Alice").await.unwrap();
    host.handle.select_category("Colors").await.unwrap();
    host.handle.correct_guess().await.unwrap();
    let snapshot = host.handle.correct_guess().await.unwrap();

    assert_eq!(snapshot.players[0].points, 2);
    assert!(snapshot.current_word.is_some());

    let events = host.drain_events();
    assert!(events.contains(&SessionEvent::ScoreChanged { score: 2 }));
}

#[tokio::test(start_paused = true)]
async fn test_session_end_reported_once() {
    let mut host = spawn_team_host(1, 30).await;
    host.handle.correct_guess().await.unwrap();
    host.handle.pass_turn().await.unwrap();
    let snapshot = host.handle.pass_turn().await.unwrap();

    assert_eq!(snapshot.phase, SessionPhase::SessionEnded);
    assert!(!snapshot.countdown_active);

    let result = host.handle.pass_turn().await;
    assert!(matches!(
        result,
        Err(HostError::Session(SessionError::InvalidState { .. }))
    ));

    let events = host.drain_events();
    let ended: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            SessionEvent::SessionEnded { winner } => winner.as_ref(),
            _ => None,
        })
        .collect();
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].name, "A");

    let snapshot = host.handle.send(HostCommand::Reset).await.unwrap();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert_eq!(snapshot.current_round, 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_countdown_and_closes_host() {
    let mut host = spawn_team_host(5, 30).await;
    host.handle.restart_round().await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let snapshot = host.handle.shutdown().await.unwrap();
    assert!(!snapshot.countdown_active);

    host.task.await.unwrap();
    assert!(matches!(host.handle.snapshot().await, Err(HostError::Closed)));

    // Observer was dropped on teardown, so the stream ends after what was queued
    tokio::time::sleep(Duration::from_secs(60)).await;
    let mut remaining = Vec::new();
    while let Some(event) = host.events.recv().await {
        remaining.push(event);
    }
    assert_eq!(ticks(&remaining), vec![30, 29]);
    assert!(!remaining.contains(&SessionEvent::TimeExpired));
}

#[tokio::test(start_paused = true)]
async fn test_dropping_all_handles_stops_host() {
    let host = spawn_test_host(5, 60);
    let TestHost { handle, task, .. } = host;

    drop(handle);
    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("host did not stop")
        .unwrap();
}
