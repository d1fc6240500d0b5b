//! Mock Cloud Controller server.
//!
//! Provides an axum-based HTTP server that simulates the Cloud Controller API.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock Cloud Controller for testing.
///
/// The server runs in the background and can be used to test the client
/// against a stateful API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server. Aborts the server task.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for app in scenario.apps {
            state = state.with_app(app);
        }

        for droplet in scenario.droplets {
            state = state.with_droplet(droplet);
        }

        for (app_guid, processes) in scenario.processes {
            state = state.with_processes(&app_guid, processes);
        }

        for (process_guid, stats) in scenario.stats {
            state = state.with_stats(&process_guid, stats);
        }

        for (app_guid, task) in scenario.tasks {
            state = state.with_task(&app_guid, task);
        }

        state
    }

    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // App routes
            .route("/v2/apps", get(handlers::list_v2_apps))
            .route(
                "/v3/apps/:guid/environment_variables",
                get(handlers::environment_variables),
            )
            .route(
                "/v3/apps/:guid/droplets/current",
                get(handlers::current_droplet),
            )
            .route("/v3/packages/:guid", get(handlers::get_package))
            // Process routes
            .route("/v3/apps/:guid/processes", get(handlers::list_processes))
            .route("/v3/processes/:guid/stats", get(handlers::process_stats))
            // Task routes
            .route(
                "/v3/apps/:guid/tasks",
                get(handlers::list_tasks).post(handlers::create_task),
            )
            .route("/v3/tasks/:guid", get(handlers::get_task))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
