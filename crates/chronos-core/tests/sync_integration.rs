//! Cloud mirror client against a mock HTTP server.

use chrono::{Local, TimeZone};

use chronos_core::{Config, FocusSession, SyncClient, SyncError, SyncPayload, Task};

fn sample_payload() -> SyncPayload {
    let now = Local.with_ymd_and_hms(2024, 3, 6, 9, 30, 0).unwrap();
    SyncPayload {
        tasks: vec![Task::new("write report", now.date_naive(), Some(1))],
        focus_history: vec![FocusSession::completed_at(25, 4, now)],
        app_state: Config::default(),
    }
}

#[tokio::test]
async fn push_upserts_the_user_record() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/user-sync/alice")
        .match_header("content-type", "application/json")
        .with_status(200)
        .create_async()
        .await;

    let client = SyncClient::new(server.url(), "alice");
    client.push(&sample_payload()).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn pull_round_trips_the_payload() {
    let mut server = mockito::Server::new_async().await;
    let payload = sample_payload();
    let body = serde_json::json!({ "payload": &payload }).to_string();
    server
        .mock("GET", "/user-sync/alice")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = SyncClient::new(server.url(), "alice");
    let pulled = client.pull().await.unwrap().expect("payload expected");
    assert_eq!(pulled.tasks.len(), 1);
    assert_eq!(pulled.focus_history, payload.focus_history);
    assert_eq!(pulled.app_state.timer.pomodoro_minutes, 35);
}

#[tokio::test]
async fn pull_maps_missing_record_to_none() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/user-sync/alice")
        .with_status(404)
        .create_async()
        .await;

    let client = SyncClient::new(server.url(), "alice");
    assert!(client.pull().await.unwrap().is_none());
}

#[tokio::test]
async fn server_errors_surface_but_push_best_effort_swallows() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PUT", "/user-sync/alice")
        .with_status(500)
        .expect(2)
        .create_async()
        .await;

    let client = SyncClient::new(server.url(), "alice");
    match client.push(&sample_payload()).await {
        Err(SyncError::Status(500)) => {}
        other => panic!("expected Status(500), got {other:?}"),
    }
    // Does not panic or error; the failure is only logged.
    client.push_best_effort(&sample_payload()).await;
}
