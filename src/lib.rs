//! Cloud Controller (CAPI) client library.
//!
//! A Rust client for the subset of the Cloud Controller API an app needs to
//! inspect itself and run tasks: processes and their stats, guid lookups for
//! apps, droplets and packages, task creation and polling, and environment
//! variables.
//!
//! # Quick Start
//!
//! ```no_run
//! use capi::{CapiClient, Context, TaskListQuery, TaskRequest};
//!
//! #[tokio::main]
//! async fn main() -> capi::Result<()> {
//!     // Create client from environment variables
//!     let client = CapiClient::from_env()?;
//!     let ctx = Context::background();
//!
//!     // Every process of the default app, across all pages
//!     let processes = client.processes(&ctx, client.default_app_guid()).await?;
//!     println!("Found {} processes", processes.len());
//!
//!     // Run a task and wait for it to finish
//!     let task = client
//!         .run_task_and_wait(&ctx, &TaskRequest::new("rake db:migrate").name("migrate"))
//!         .await?;
//!     println!("Task {} ended {}", task.guid, task.state);
//!
//!     // Tasks that failed
//!     let failed = TaskListQuery {
//!         states: vec!["FAILED".to_string()],
//!         ..Default::default()
//!     };
//!     let tasks = client.list_tasks(&ctx, "", &failed).await?;
//!     println!("{} failed tasks", tasks.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`CapiClient`] builds endpoint URLs and runs every request through an
//!   injected [`Transport`], bound to a caller-supplied [`Context`].
//! - [`Pages`] follows `pagination.next.href` cursors for list endpoints.
//! - [`TaskPoller`] submits tasks and re-checks their `self` link at a fixed
//!   interval while they are `RUNNING`.
//! - [`normalize_scheme`] rewrites every `https` link to `http`, so the
//!   client can sit behind a forwarding proxy that re-secures traffic.
//!
//! Resource types implement [`Get`] and [`List`] where their endpoints allow.
//!
//! # Configuration
//!
//! [`CapiClient::from_env`] reads:
//!
//! - `CAPI_ADDR` (required) - Base address of the API
//! - `CAPI_APP_GUID` (optional) - Default app for task and lookup operations
//! - `CAPI_SPACE_GUID` (optional) - Space used to resolve app names
//! - `CAPI_POLL_INTERVAL_MS` (optional) - Task polling interval (default 1000)

pub mod cli;
mod client;
mod context;
mod error;
mod link;
mod models;
pub mod output;
mod pagination;
mod poller;
mod request;
mod traits;
mod transport;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{CapiClient, DEFAULT_POLL_INTERVAL};
pub use context::Context;
pub use error::{BoxError, CapiError, Result};
pub use link::{normalize_links, normalize_scheme, Link, Links, DEFAULT_METHOD};
pub use pagination::{Page, Pages};
pub use poller::{TaskPoller, TaskState};
pub use request::RequestBuilder;
pub use transport::{default_transport, Transport};

// Re-export traits
pub use traits::{Get, List, Resource};

// Re-export models
pub use models::{
    // Process types
    HealthCheck,
    HealthCheckData,
    Process,
    ProcessStats,
    Usage,
    // Task types
    AppTasks,
    Task,
    TaskListQuery,
    TaskRequest,
    // Droplet types
    PackageLocation,
};

pub use output::PrettyPrint;
