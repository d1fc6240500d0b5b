//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use std::collections::HashMap;

use crate::{HealthCheck, Process, ProcessStats, Task, TaskState, Usage};

use super::state::{MockApp, MockDroplet};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // App Fixtures
    // =========================================================================

    /// Create a staged app with environment variables.
    pub fn app(guid: &str, name: &str, space_guid: &str, droplet_guid: &str) -> MockApp {
        MockApp {
            guid: guid.to_string(),
            name: name.to_string(),
            space_guid: space_guid.to_string(),
            droplet_guid: Some(droplet_guid.to_string()),
            environment: HashMap::from([
                ("RAILS_ENV".to_string(), "production".to_string()),
                ("WORKERS".to_string(), "4".to_string()),
            ]),
        }
    }

    /// Create an app that has never been staged.
    pub fn unstaged_app(guid: &str, name: &str, space_guid: &str) -> MockApp {
        MockApp {
            guid: guid.to_string(),
            name: name.to_string(),
            space_guid: space_guid.to_string(),
            ..Default::default()
        }
    }

    /// Create a droplet staged from `package_guid`.
    pub fn droplet(guid: &str, package_guid: &str) -> MockDroplet {
        MockDroplet {
            guid: guid.to_string(),
            package_guid: Some(package_guid.to_string()),
        }
    }

    // =========================================================================
    // Process Fixtures
    // =========================================================================

    /// Create a process with a port health check.
    pub fn process(guid: &str, process_type: &str, instances: u32) -> Process {
        Process {
            guid: guid.to_string(),
            process_type: process_type.to_string(),
            command: Some(format!("bin/{process_type}")),
            instances,
            memory_in_mb: 256,
            disk_in_mb: 1024,
            health_check: HealthCheck {
                check_type: "port".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Create stats for one running instance.
    pub fn instance_stats(process_type: &str, index: u32) -> ProcessStats {
        ProcessStats {
            process_type: process_type.to_string(),
            index,
            state: "RUNNING".to_string(),
            usage: Usage {
                cpu: 0.05,
                mem: 64.0 * 1024.0 * 1024.0,
                disk: 128 * 1024 * 1024,
                ..Default::default()
            },
            host: Some(format!("10.0.0.{}", index + 10)),
            uptime: 3600,
            mem_quota: Some(256 * 1024 * 1024),
            disk_quota: Some(1024 * 1024 * 1024),
            fds_quota: Some(16384),
        }
    }

    // =========================================================================
    // Task Fixtures
    // =========================================================================

    /// Create a finished task.
    pub fn finished_task(guid: &str, sequence_id: u64, name: &str, state: TaskState) -> Task {
        Task {
            guid: guid.to_string(),
            sequence_id,
            name: name.to_string(),
            command: format!("bin/{name}"),
            disk_in_mb: 1024,
            memory_in_mb: 256,
            state,
            droplet_guid: "droplet-1".to_string(),
            ..Default::default()
        }
    }

    // =========================================================================
    // Scenario Fixtures
    // =========================================================================

    /// Create a default scenario with interconnected test data.
    ///
    /// - `app-1` ("my-app" in `space-1`) staged as `droplet-1` from `package-1`
    /// - three processes on `app-1`, so lists span two pages at the default size
    /// - two instances of `proc-web`
    /// - one succeeded and one failed task on `app-1`
    /// - `app-2` ("unstaged" in `space-1`) with no droplet
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario {
            apps: vec![
                Self::app("app-1", "my-app", "space-1", "droplet-1"),
                Self::unstaged_app("app-2", "unstaged", "space-1"),
            ],
            droplets: vec![Self::droplet("droplet-1", "package-1")],
            processes: vec![(
                "app-1".to_string(),
                vec![
                    Self::process("proc-web", "web", 2),
                    Self::process("proc-worker", "worker", 1),
                    Self::process("proc-clock", "clock", 1),
                ],
            )],
            stats: vec![(
                "proc-web".to_string(),
                vec![
                    Self::instance_stats("web", 0),
                    Self::instance_stats("web", 1),
                ],
            )],
            tasks: vec![
                (
                    "app-1".to_string(),
                    Self::finished_task("task-seed-1", 100, "migrate", TaskState::Succeeded),
                ),
                (
                    "app-1".to_string(),
                    Self::finished_task("task-seed-2", 101, "backfill", TaskState::Failed),
                ),
            ],
        }
    }
}

/// A complete test scenario with related data.
pub struct DefaultScenario {
    pub apps: Vec<MockApp>,
    pub droplets: Vec<MockDroplet>,
    pub processes: Vec<(String, Vec<Process>)>,
    pub stats: Vec<(String, Vec<ProcessStats>)>,
    pub tasks: Vec<(String, Task)>,
}
