//! Mock Cloud Controller for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Cloud
//! Controller API for integration and end-to-end testing. Unlike wiremock
//! which mocks at the HTTP level per-test, this server maintains state across
//! requests: tasks created through it progress from `RUNNING` to a scripted
//! outcome as they are polled, and lists are paginated with `https` links.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use capi::mock_server::MockServer;
//! use capi::{CapiClient, Context};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = CapiClient::new(server.url(), "app-1", "space-1", Arc::new(reqwest::Client::new()));
//!
//!     // Server comes with default fixtures
//!     let guid = client.app_guid(&Context::background(), "my-app").await.unwrap();
//!     assert_eq!(guid, "app-1");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{MockApp, MockDroplet, MockState, MockTask, TaskScript};
