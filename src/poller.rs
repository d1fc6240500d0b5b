//! Task submission and status polling.
//!
//! Creating a task answers `202 Accepted` with the task's current state and a
//! `self` link. While the state is `RUNNING` the poller sleeps a fixed
//! interval and re-fetches the self link. `FAILED` ends the wait with
//! [`CapiError::TaskFailed`]; any other state ends it successfully.

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::CapiClient;
use crate::context::Context;
use crate::error::{CapiError, Result};
use crate::models::Task;
use crate::traits::Resource;

/// Lifecycle state of a task.
///
/// Unrecognised values are kept verbatim in [`TaskState::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Canceling,
    Other(String),
    /// No state reported.
    #[default]
    Unknown,
}

impl TaskState {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Canceling => "CANCELING",
            Self::Other(s) => s,
            Self::Unknown => "",
        }
    }

    /// Whether the poller stops at this state.
    ///
    /// Only `RUNNING` keeps the poller waiting. `PENDING` and `CANCELING`
    /// end the wait as a success, the same as `SUCCEEDED`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl From<String> for TaskState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PENDING" => Self::Pending,
            "RUNNING" => Self::Running,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "CANCELING" => Self::Canceling,
            "" => Self::Unknown,
            _ => Self::Other(s),
        }
    }
}

impl From<TaskState> for String {
    fn from(state: TaskState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives a task from submission to a terminal state.
#[derive(Debug, Clone, Copy)]
pub struct TaskPoller<'c> {
    client: &'c CapiClient,
    interval: Duration,
}

impl<'c> TaskPoller<'c> {
    /// A poller using the client's configured interval.
    pub fn new(client: &'c CapiClient) -> Self {
        Self {
            client,
            interval: client.poll_interval(),
        }
    }

    /// Override the re-check interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// POST `body` to `url`, require `202 Accepted` and decode the task.
    pub async fn submit<B>(&self, ctx: &Context, url: Url, body: &B) -> Result<Task>
    where
        B: Serialize + Sync + ?Sized,
    {
        let mut task: Task = self
            .client
            .post_json(ctx, url, body, StatusCode::ACCEPTED)
            .await?;
        task.normalize_links();
        Ok(task)
    }

    /// Re-fetch `task` through its self link until it leaves `RUNNING`.
    ///
    /// Every wait and every request observes `ctx`; cancellation during the
    /// sleep returns immediately. A malformed status body ends the wait with
    /// the decode error.
    #[tracing::instrument(skip(self, ctx, task), fields(guid = %task.guid))]
    pub async fn wait(&self, ctx: &Context, mut task: Task) -> Result<Task> {
        let mut checks = 0u32;

        loop {
            match task.state {
                TaskState::Running => {
                    ctx.sleep(self.interval).await?;

                    let href = task.self_link().unwrap_or_default();
                    let url = Url::parse(href)?;
                    checks += 1;
                    tracing::debug!(checks, %url, "task running, re-checking");

                    task = self.client.get_json(ctx, url).await?;
                    task.normalize_links();
                }
                TaskState::Failed => {
                    return Err(CapiError::TaskFailed {
                        guid: task.guid.clone(),
                    });
                }
                _ => return Ok(task),
            }
        }
    }

    /// Submit and wait.
    pub async fn run<B>(&self, ctx: &Context, url: Url, body: &B) -> Result<Task>
    where
        B: Serialize + Sync + ?Sized,
    {
        let task = self.submit(ctx, url, body).await?;
        self.wait(ctx, task).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trips_wire_strings() {
        for wire in ["PENDING", "RUNNING", "SUCCEEDED", "FAILED", "CANCELING"] {
            let state = TaskState::from(wire.to_string());
            assert!(!matches!(state, TaskState::Other(_)));
            assert_eq!(state.as_str(), wire);
        }
    }

    #[test]
    fn test_unknown_states_are_kept() {
        let state: TaskState = serde_json::from_str(r#""EXPLODED""#).unwrap();
        assert_eq!(state, TaskState::Other("EXPLODED".to_string()));
        assert_eq!(serde_json::to_string(&state).unwrap(), r#""EXPLODED""#);
    }

    #[test]
    fn test_only_running_keeps_polling() {
        assert!(!TaskState::Running.is_terminal());
        assert!(TaskState::Pending.is_terminal());
        assert!(TaskState::Canceling.is_terminal());
        assert!(TaskState::Succeeded.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(TaskState::Unknown.is_terminal());
    }
}
