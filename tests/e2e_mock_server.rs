//! E2E tests using the mock Cloud Controller.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use std::sync::Arc;
use std::time::Duration;

use capi::mock_server::{Fixtures, MockServer, MockState};
use capi::{CapiClient, CapiError, Context, TaskListQuery, TaskRequest, TaskState};

fn client(server: &MockServer) -> CapiClient {
    CapiClient::new(
        server.url(),
        "app-1",
        "space-1",
        Arc::new(reqwest::Client::new()),
    )
    .with_poll_interval(Duration::from_millis(5))
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    let result = reqwest::Client::new()
        .get(format!("{}/health", url))
        .send()
        .await;

    assert!(result.is_err());
}

// =============================================================================
// Lookup Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_name_to_package_workflow() {
    let server = MockServer::start().await;
    let client = client(&server);
    let ctx = Context::background();

    // Step 1: Resolve the app by name
    let app = client.app_guid(&ctx, "my-app").await.unwrap();
    assert_eq!(app, "app-1");

    // Step 2: Its current droplet
    let droplet = client.droplet_guid(&ctx, &app).await.unwrap();
    assert_eq!(droplet, "droplet-1");

    // Step 3: The package behind it, reached through an https link
    let package = client.package_guid(&ctx, &app).await.unwrap();
    assert_eq!(package.guid, "package-1");
    assert_eq!(
        package.download_href,
        format!("{}/v3/packages/package-1/download", server.url())
    );

    server.shutdown().await;
}

#[tokio::test]
async fn test_unknown_name_in_other_space() {
    let server = MockServer::start().await;
    let client = CapiClient::new(
        server.url(),
        "app-1",
        "space-2",
        Arc::new(reqwest::Client::new()),
    );

    let err = client
        .app_guid(&Context::background(), "my-app")
        .await
        .unwrap_err();
    assert!(matches!(err, CapiError::EmptyResults { .. }));

    server.shutdown().await;
}

#[tokio::test]
async fn test_unstaged_app_has_no_droplet() {
    let server = MockServer::start().await;

    let err = client(&server)
        .droplet_guid(&Context::background(), "app-2")
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(404));

    server.shutdown().await;
}

#[tokio::test]
async fn test_environment_and_stats() {
    let server = MockServer::start().await;
    let client = client(&server);
    let ctx = Context::background();

    let vars = client.environment_variables(&ctx, "").await.unwrap();
    assert_eq!(vars["RAILS_ENV"], "production");

    let stats = client.process_stats(&ctx, "proc-web").await.unwrap();
    assert_eq!(stats.len(), 2);
    assert!(stats.iter().all(|s| s.state == "RUNNING"));

    server.shutdown().await;
}

// =============================================================================
// Task Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_run_wait_then_list() {
    let server = MockServer::start().await;
    let client = client(&server);
    let ctx = Context::background();

    // Step 1: Run a named task and wait for it
    let request = TaskRequest::new("rake db:migrate").name("migrate-2");
    let task = client.run_task_and_wait(&ctx, &request).await.unwrap();
    assert_eq!(task.state, TaskState::Succeeded);
    assert_eq!(task.droplet_guid, "droplet-1");

    // Step 2: The server saw the scripted number of status reads
    {
        let state = server.state();
        let state = state.read().await;
        assert_eq!(state.tasks[&task.guid].reads, 2);
    }

    // Step 3: It shows up in the app's task list with the seeded ones
    let tasks = client
        .list_tasks(&ctx, "", &TaskListQuery::default())
        .await
        .unwrap();
    assert_eq!(tasks.len(), 3);
    assert!(tasks.iter().any(|t| t.guid == task.guid));

    // Step 4: Filtered by state
    let failed = TaskListQuery {
        states: vec!["FAILED".to_string()],
        ..Default::default()
    };
    let tasks = client.list_tasks(&ctx, "", &failed).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "backfill");

    server.shutdown().await;
}

#[tokio::test]
async fn test_run_without_wait_then_get() {
    let server = MockServer::start().await;
    let client = client(&server);
    let ctx = Context::background();

    let task = client
        .run_task(&ctx, &TaskRequest::new("echo hi"))
        .await
        .unwrap();
    assert_eq!(task.state, TaskState::Running);

    let fetched = client.task(&ctx, &task.guid).await.unwrap();
    assert_eq!(fetched.guid, task.guid);
    assert_eq!(fetched.links["self"].method, "GET");

    server.shutdown().await;
}

#[tokio::test]
async fn test_failing_task_script() {
    let state = MockState::new()
        .with_app(Fixtures::app("app-1", "my-app", "space-1", "droplet-1"))
        .with_task_script(3, TaskState::Failed);
    let server = MockServer::with_state(state).await;

    let err = client(&server)
        .create_task(&Context::background(), "exit 1")
        .await
        .unwrap_err();
    assert!(matches!(err, CapiError::TaskFailed { .. }));

    let state = server.state();
    assert_eq!(state.read().await.tasks["task-1"].reads, 3);

    server.shutdown().await;
}

#[tokio::test]
async fn test_empty_command_is_rejected() {
    let server = MockServer::start().await;

    let err = client(&server)
        .run_task(&Context::background(), &TaskRequest::new(""))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(422));

    server.shutdown().await;
}
