//! Process and process statistics models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::CapiClient;
use crate::context::Context;
use crate::error::Result;
use crate::link::{normalize_links, Links};
use crate::traits::{List, Resource};

/// A process definition belonging to an app (`web`, `worker`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Process {
    /// Unique process identifier.
    #[serde(default)]
    pub guid: String,

    /// Process type (e.g., "web").
    #[serde(rename = "type", default)]
    pub process_type: String,

    /// Start command.
    #[serde(default)]
    pub command: Option<String>,

    /// Desired instance count.
    #[serde(default)]
    pub instances: u32,

    /// Memory quota per instance.
    #[serde(default)]
    pub memory_in_mb: u64,

    /// Disk quota per instance.
    #[serde(default)]
    pub disk_in_mb: u64,

    /// Health check configuration.
    #[serde(default)]
    pub health_check: HealthCheck,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Relations (`self`, `scale`, `app`, `space`, `stats`).
    #[serde(default)]
    pub links: Links,
}

/// Health check configuration of a process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Check type: `port`, `process` or `http`.
    #[serde(rename = "type", default)]
    pub check_type: String,

    #[serde(default)]
    pub data: HealthCheckData,
}

/// Parameters of a health check. Unset values are `null` on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckData {
    #[serde(default)]
    pub timeout: Option<u32>,

    #[serde(default)]
    pub invocation_timeout: Option<u32>,

    /// HTTP endpoint for `http` checks.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Resource for Process {
    fn normalize_links(&mut self) {
        normalize_links(&mut self.links);
    }
}

#[async_trait::async_trait]
impl List for Process {
    /// App guid.
    type Scope = str;

    fn first_page(client: &CapiClient, app_guid: &str) -> Result<Url> {
        client.endpoint(&format!(
            "/v3/apps/{}/processes",
            urlencoding::encode(app_guid)
        ))
    }
}

/// Point-in-time statistics of one process instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessStats {
    /// Process type this instance belongs to.
    #[serde(rename = "type", default)]
    pub process_type: String,

    /// Instance index.
    #[serde(default)]
    pub index: u32,

    /// Instance state (`RUNNING`, `CRASHED`, `STARTING`, `DOWN`).
    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub usage: Usage,

    #[serde(default)]
    pub host: Option<String>,

    /// Seconds since the instance started.
    #[serde(default)]
    pub uptime: u64,

    #[serde(default)]
    pub mem_quota: Option<u64>,

    #[serde(default)]
    pub disk_quota: Option<u64>,

    #[serde(default)]
    pub fds_quota: Option<u64>,
}

/// Resource usage sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,

    /// CPU share, 0.0 - 1.0 per core.
    #[serde(default)]
    pub cpu: f64,

    /// Memory in bytes.
    #[serde(default)]
    pub mem: f64,

    /// Disk in bytes.
    #[serde(default)]
    pub disk: u64,
}

impl ProcessStats {
    /// Memory usage as a fraction of the quota, if a quota is set.
    pub fn mem_utilization(&self) -> Option<f64> {
        self.mem_quota
            .filter(|q| *q > 0)
            .map(|q| self.usage.mem / q as f64)
    }
}

impl Resource for ProcessStats {}

#[async_trait::async_trait]
impl List for ProcessStats {
    /// Process guid.
    type Scope = str;

    fn first_page(client: &CapiClient, process_guid: &str) -> Result<Url> {
        client.endpoint(&format!(
            "/v3/processes/{}/stats",
            urlencoding::encode(process_guid)
        ))
    }
}

impl CapiClient {
    /// List every process of an app, following pagination.
    ///
    /// An empty `app_guid` uses the client's default app.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn processes(&self, ctx: &Context, app_guid: &str) -> Result<Vec<Process>> {
        Process::list_all(self, ctx, self.app_or_default(app_guid)).await
    }

    /// List statistics for every instance of a process, following pagination.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn process_stats(
        &self,
        ctx: &Context,
        process_guid: &str,
    ) -> Result<Vec<ProcessStats>> {
        ProcessStats::list_all(self, ctx, process_guid).await
    }
}
