//! Task model and operations.
//!
//! Tasks are one-off commands run against an app's droplet. Creation is
//! asynchronous: the API accepts the task and the caller polls it to a
//! terminal state through [`TaskPoller`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::CapiClient;
use crate::context::Context;
use crate::error::Result;
use crate::link::{normalize_links, null_as_empty, Links};
use crate::poller::{TaskPoller, TaskState};
use crate::traits::{Get, List, Resource};

/// An asynchronous unit of work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    #[serde(default)]
    pub guid: String,

    /// Per-app sequence number.
    #[serde(default)]
    pub sequence_id: u64,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub command: String,

    #[serde(default)]
    pub disk_in_mb: u64,

    #[serde(default)]
    pub memory_in_mb: u64,

    /// Lifecycle state.
    #[serde(default)]
    pub state: TaskState,

    /// Droplet the task runs against.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub droplet_guid: String,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Relations (`self`, `app`, `droplet`, `cancel`).
    #[serde(default)]
    pub links: Links,
}

impl Task {
    /// The `self` link, if present.
    pub fn self_link(&self) -> Option<&str> {
        self.links.get("self").map(|l| l.href.as_str())
    }

    /// Whether the task has finished running.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

impl Resource for Task {
    fn normalize_links(&mut self) {
        normalize_links(&mut self.links);
    }
}

/// Parameters for running a task.
///
/// An empty `app_guid` runs against the client's default app; empty `name`
/// and `droplet_guid` are left out of the request so the API picks them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRequest {
    pub command: String,
    pub name: String,
    pub droplet_guid: String,
    pub app_guid: String,
}

impl TaskRequest {
    /// A request that only sets the command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn droplet(mut self, droplet_guid: impl Into<String>) -> Self {
        self.droplet_guid = droplet_guid.into();
        self
    }

    #[must_use]
    pub fn app(mut self, app_guid: impl Into<String>) -> Self {
        self.app_guid = app_guid.into();
        self
    }

    fn body(&self) -> CreateTaskBody<'_> {
        CreateTaskBody {
            command: &self.command,
            name: Some(self.name.as_str()).filter(|s| !s.is_empty()),
            droplet_guid: Some(self.droplet_guid.as_str()).filter(|s| !s.is_empty()),
        }
    }
}

/// Wire body of `POST /v3/apps/{app}/tasks`.
#[derive(Debug, Serialize)]
struct CreateTaskBody<'a> {
    command: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    droplet_guid: Option<&'a str>,
}

/// Filters for listing an app's tasks.
///
/// Multi-value filters are sent as one comma-joined parameter
/// (`states=RUNNING,FAILED`), the way the v3 API expects them, never as a
/// repeated key (`states=RUNNING&states=FAILED`).
///
/// `extra` pairs are appended verbatim after the typed filters, so any query
/// the API accepts can be expressed, including repeated keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    pub names: Vec<String>,
    pub states: Vec<String>,
    pub guids: Vec<String>,
    pub sequence_ids: Vec<u64>,
    pub order_by: Option<String>,
    pub per_page: Option<u32>,
    pub extra: Vec<(String, String)>,
}

impl TaskListQuery {
    /// Query pairs in the order they are appended to the URL.
    ///
    /// Each non-empty list filter yields exactly one pair whose value is the
    /// comma-joined list. `extra` pairs follow unchanged.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        let mut push_list = |key: &str, values: Vec<String>| {
            if !values.is_empty() {
                pairs.push((key.to_string(), values.join(",")));
            }
        };
        push_list("names", self.names.clone());
        push_list("states", self.states.clone());
        push_list("guids", self.guids.clone());
        push_list(
            "sequence_ids",
            self.sequence_ids.iter().map(u64::to_string).collect(),
        );

        if let Some(order_by) = &self.order_by {
            pairs.push(("order_by".to_string(), order_by.clone()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page".to_string(), per_page.to_string()));
        }
        pairs.extend(self.extra.iter().cloned());

        pairs
    }

    /// Returns true if no filter is set.
    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }
}

/// Scope of a task listing: an app plus optional filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppTasks {
    pub app_guid: String,
    pub query: TaskListQuery,
}

#[async_trait]
impl Get for Task {
    type Id = String;

    #[tracing::instrument(skip(client, ctx))]
    async fn get(client: &CapiClient, ctx: &Context, guid: String) -> Result<Self> {
        let url = client.endpoint(&format!("/v3/tasks/{}", urlencoding::encode(&guid)))?;
        let mut task: Task = client.get_json(ctx, url).await?;
        task.normalize_links();
        Ok(task)
    }
}

#[async_trait]
impl List for Task {
    type Scope = AppTasks;

    fn first_page(client: &CapiClient, scope: &AppTasks) -> Result<Url> {
        let mut url = client.endpoint(&format!(
            "/v3/apps/{}/tasks",
            urlencoding::encode(&scope.app_guid)
        ))?;

        let pairs = scope.query.pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

impl CapiClient {
    fn tasks_url(&self, app_guid: &str) -> Result<Url> {
        self.endpoint(&format!(
            "/v3/apps/{}/tasks",
            urlencoding::encode(self.app_or_default(app_guid))
        ))
    }

    /// Create a task on the default app and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns [`CapiError::TaskFailed`](crate::CapiError::TaskFailed) if the
    /// task ends `FAILED`, or the first request/decode error.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn create_task(&self, ctx: &Context, command: &str) -> Result<Task> {
        let url = self.tasks_url("")?;
        let request = TaskRequest::new(command);
        TaskPoller::new(self).run(ctx, url, &request.body()).await
    }

    /// Submit a task and return it as accepted, without waiting.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn run_task(&self, ctx: &Context, request: &TaskRequest) -> Result<Task> {
        let url = self.tasks_url(&request.app_guid)?;
        TaskPoller::new(self).submit(ctx, url, &request.body()).await
    }

    /// Submit a task and wait for it to reach a terminal state.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn run_task_and_wait(&self, ctx: &Context, request: &TaskRequest) -> Result<Task> {
        let url = self.tasks_url(&request.app_guid)?;
        TaskPoller::new(self).run(ctx, url, &request.body()).await
    }

    /// Fetch a task by guid.
    pub async fn task(&self, ctx: &Context, guid: &str) -> Result<Task> {
        Task::get(self, ctx, guid.to_string()).await
    }

    /// List an app's tasks matching `query`, following pagination.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn list_tasks(
        &self,
        ctx: &Context,
        app_guid: &str,
        query: &TaskListQuery,
    ) -> Result<Vec<Task>> {
        let scope = AppTasks {
            app_guid: self.app_or_default(app_guid).to_string(),
            query: query.clone(),
        };
        Task::list_all(self, ctx, &scope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_create_body_omits_empty_fields() {
        let body = serde_json::to_value(TaskRequest::new("some-command").body()).unwrap();
        assert_eq!(body, serde_json::json!({"command": "some-command"}));

        let body = serde_json::to_value(
            TaskRequest::new("some-command")
                .name("migrate")
                .droplet("droplet-1")
                .body(),
        )
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "command": "some-command",
                "name": "migrate",
                "droplet_guid": "droplet-1"
            })
        );
    }

    #[test]
    fn test_query_pairs_join_lists() {
        let query = TaskListQuery {
            names: vec!["x".to_string()],
            states: vec!["RUNNING".to_string(), "FAILED".to_string()],
            per_page: Some(50),
            extra: vec![("label_selector".to_string(), "env=prod".to_string())],
            ..Default::default()
        };
        assert_eq!(
            query.pairs(),
            vec![
                ("names".to_string(), "x".to_string()),
                ("states".to_string(), "RUNNING,FAILED".to_string()),
                ("per_page".to_string(), "50".to_string()),
                ("label_selector".to_string(), "env=prod".to_string()),
            ]
        );
        assert!(TaskListQuery::default().is_empty());
    }

    #[test]
    fn test_first_page_carries_query() {
        let client = CapiClient::new(
            "https://some-addr.com",
            "app",
            "space",
            Arc::new(reqwest::Client::new()),
        );
        let scope = AppTasks {
            app_guid: "some-guid".to_string(),
            query: TaskListQuery {
                names: vec!["x".to_string()],
                ..Default::default()
            },
        };
        let url = Task::first_page(&client, &scope).unwrap();
        assert_eq!(url.as_str(), "http://some-addr.com/v3/apps/some-guid/tasks?names=x");

        let unfiltered = Task::first_page(
            &client,
            &AppTasks {
                app_guid: "some-guid".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(unfiltered.as_str(), "http://some-addr.com/v3/apps/some-guid/tasks");
    }

    #[test]
    fn test_task_link_methods_default_to_get() {
        let mut task: Task = serde_json::from_value(serde_json::json!({
            "guid": "t-1",
            "state": "RUNNING",
            "links": {
                "self": {"href": "https://h/v3/tasks/t-1"},
                "cancel": {"href": "https://h/v3/tasks/t-1/actions/cancel", "method": "POST"}
            }
        }))
        .unwrap();
        task.normalize_links();

        assert_eq!(task.state, TaskState::Running);
        assert_eq!(task.self_link(), Some("http://h/v3/tasks/t-1"));
        assert_eq!(task.links["self"].method, "GET");
        assert_eq!(task.links["cancel"].method, "POST");
        assert_eq!(task.links["cancel"].href, "http://h/v3/tasks/t-1/actions/cancel");
    }

    #[test]
    fn test_null_strings_decode_as_empty() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "guid": "t-1",
            "name": null,
            "command": null,
            "droplet_guid": null,
            "state": "RUNNING"
        }))
        .unwrap();

        assert_eq!(task.name, "");
        assert_eq!(task.command, "");
        assert_eq!(task.droplet_guid, "");
        assert_eq!(task.state, TaskState::Running);
    }

    #[test]
    fn test_list_filters_are_not_repeated_keys() {
        let client = CapiClient::new(
            "https://some-addr.com",
            "app",
            "space",
            Arc::new(reqwest::Client::new()),
        );
        let scope = AppTasks {
            app_guid: "some-guid".to_string(),
            query: TaskListQuery {
                states: vec!["RUNNING".to_string(), "FAILED".to_string()],
                extra: vec![
                    ("label_selector".to_string(), "env=prod".to_string()),
                    ("label_selector".to_string(), "tier=web".to_string()),
                ],
                ..Default::default()
            },
        };
        let url = Task::first_page(&client, &scope).unwrap();

        let states: Vec<_> = url.query_pairs().filter(|(k, _)| k == "states").collect();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].1, "RUNNING,FAILED");

        let labels: Vec<_> = url
            .query_pairs()
            .filter(|(k, _)| k == "label_selector")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(labels, vec!["env=prod", "tier=web"]);
    }
}
