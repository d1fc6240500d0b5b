//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Cloud Controller.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Process, ProcessStats, Task, TaskState};

/// Default page size when a request does not ask for one.
pub const DEFAULT_PER_PAGE: usize = 2;

/// An app known to the mock server.
#[derive(Debug, Clone, Default)]
pub struct MockApp {
    pub guid: String,
    pub name: String,
    pub space_guid: String,
    /// Guid of the current droplet, if the app is staged.
    pub droplet_guid: Option<String>,
    pub environment: HashMap<String, String>,
}

/// A droplet and the package it was staged from.
#[derive(Debug, Clone, Default)]
pub struct MockDroplet {
    pub guid: String,
    pub package_guid: Option<String>,
}

/// How newly created tasks progress.
///
/// A new task reports `RUNNING` for `running_checks` status reads, then
/// settles on `outcome`.
#[derive(Debug, Clone)]
pub struct TaskScript {
    pub running_checks: u32,
    pub outcome: TaskState,
}

impl Default for TaskScript {
    fn default() -> Self {
        Self {
            running_checks: 2,
            outcome: TaskState::Succeeded,
        }
    }
}

/// A task tracked by the mock server.
#[derive(Debug, Clone)]
pub struct MockTask {
    pub app_guid: String,
    pub task: Task,
    /// Status reads left before the task settles.
    pub remaining_checks: u32,
    pub outcome: TaskState,
    /// Number of `GET /v3/tasks/{guid}` requests served.
    pub reads: u32,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug)]
pub struct MockState {
    pub apps: HashMap<String, MockApp>,

    /// Processes indexed by app guid, in listing order.
    pub processes: HashMap<String, Vec<Process>>,

    /// Instance stats indexed by process guid.
    pub stats: HashMap<String, Vec<ProcessStats>>,

    pub droplets: HashMap<String, MockDroplet>,

    /// Package guids that exist.
    pub packages: Vec<String>,

    /// Tasks indexed by guid.
    pub tasks: HashMap<String, MockTask>,

    /// Script applied to tasks created through the API.
    pub task_script: TaskScript,

    pub per_page: usize,

    /// Counter for generated task guids and sequence ids.
    pub next_task: u64,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            apps: HashMap::new(),
            processes: HashMap::new(),
            stats: HashMap::new(),
            droplets: HashMap::new(),
            packages: Vec::new(),
            tasks: HashMap::new(),
            task_script: TaskScript::default(),
            per_page: DEFAULT_PER_PAGE,
            next_task: 1,
        }
    }
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add an app.
    pub fn with_app(mut self, app: MockApp) -> Self {
        self.apps.insert(app.guid.clone(), app);
        self
    }

    /// Add processes for an app.
    pub fn with_processes(mut self, app_guid: &str, processes: Vec<Process>) -> Self {
        self.processes.insert(app_guid.to_string(), processes);
        self
    }

    /// Add instance stats for a process.
    pub fn with_stats(mut self, process_guid: &str, stats: Vec<ProcessStats>) -> Self {
        self.stats.insert(process_guid.to_string(), stats);
        self
    }

    /// Add a droplet, registering its package.
    pub fn with_droplet(mut self, droplet: MockDroplet) -> Self {
        if let Some(ref package) = droplet.package_guid {
            self.packages.push(package.clone());
        }
        self.droplets.insert(droplet.guid.clone(), droplet);
        self
    }

    /// Add an existing task for an app.
    pub fn with_task(mut self, app_guid: &str, task: Task) -> Self {
        let outcome = task.state.clone();
        self.tasks.insert(
            task.guid.clone(),
            MockTask {
                app_guid: app_guid.to_string(),
                task,
                remaining_checks: 0,
                outcome,
                reads: 0,
            },
        );
        self
    }

    /// Set how newly created tasks progress.
    pub fn with_task_script(mut self, running_checks: u32, outcome: TaskState) -> Self {
        self.task_script = TaskScript {
            running_checks,
            outcome,
        };
        self
    }

    /// Set the default page size.
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Find an app by name within a space.
    pub fn find_app(&self, name: &str, space_guid: &str) -> Option<&MockApp> {
        self.apps
            .values()
            .find(|a| a.name == name && a.space_guid == space_guid)
    }

    /// Create a task following the current script.
    pub fn create_task(
        &mut self,
        app_guid: &str,
        command: &str,
        name: Option<&str>,
        droplet_guid: Option<&str>,
    ) -> &MockTask {
        let sequence = self.next_task;
        self.next_task += 1;

        let guid = format!("task-{sequence}");
        let script = self.task_script.clone();
        let state = if script.running_checks == 0 {
            script.outcome.clone()
        } else {
            TaskState::Running
        };

        let droplet = droplet_guid
            .map(str::to_string)
            .or_else(|| self.apps.get(app_guid).and_then(|a| a.droplet_guid.clone()))
            .unwrap_or_default();

        let task = Task {
            guid: guid.clone(),
            sequence_id: sequence,
            name: name.map(str::to_string).unwrap_or_else(|| guid.clone()),
            command: command.to_string(),
            disk_in_mb: 1024,
            memory_in_mb: 256,
            state,
            droplet_guid: droplet,
            ..Default::default()
        };

        self.tasks.insert(
            guid.clone(),
            MockTask {
                app_guid: app_guid.to_string(),
                task,
                remaining_checks: script.running_checks,
                outcome: script.outcome,
                reads: 0,
            },
        );
        &self.tasks[&guid]
    }

    /// Serve one status read of a task, advancing its script.
    pub fn read_task(&mut self, guid: &str) -> Option<&MockTask> {
        let entry = self.tasks.get_mut(guid)?;
        entry.reads += 1;

        if entry.task.state == TaskState::Running {
            entry.remaining_checks = entry.remaining_checks.saturating_sub(1);
            if entry.remaining_checks == 0 {
                entry.task.state = entry.outcome.clone();
            }
        }
        Some(&*entry)
    }

    /// Tasks of an app matching optional name and state filters, by sequence id.
    pub fn list_tasks(
        &self,
        app_guid: &str,
        names: &[String],
        states: &[String],
    ) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .values()
            .filter(|t| t.app_guid == app_guid)
            .map(|t| &t.task)
            .filter(|t| names.is_empty() || names.contains(&t.name))
            .filter(|t| states.is_empty() || states.iter().any(|s| s == t.state.as_str()))
            .collect();
        tasks.sort_by_key(|t| t.sequence_id);
        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_task_runs_then_settles() {
        let mut state = MockState::new().with_task_script(2, TaskState::Failed);
        let guid = state.create_task("app-1", "echo hi", None, None).task.guid.clone();

        assert_eq!(state.tasks[&guid].task.state, TaskState::Running);
        assert_eq!(state.read_task(&guid).unwrap().task.state, TaskState::Running);
        assert_eq!(state.read_task(&guid).unwrap().task.state, TaskState::Failed);
        assert_eq!(state.read_task(&guid).unwrap().reads, 3);
    }

    #[test]
    fn test_zero_checks_settles_immediately() {
        let mut state = MockState::new().with_task_script(0, TaskState::Succeeded);
        let task = &state.create_task("app-1", "echo hi", Some("greet"), None).task;

        assert_eq!(task.state, TaskState::Succeeded);
        assert_eq!(task.name, "greet");
    }

    #[test]
    fn test_list_tasks_filters() {
        let mut state = MockState::new().with_task_script(0, TaskState::Succeeded);
        state.create_task("app-1", "a", Some("x"), None);
        state.create_task("app-1", "b", Some("y"), None);
        state.create_task("app-2", "c", Some("x"), None);

        assert_eq!(state.list_tasks("app-1", &[], &[]).len(), 2);
        assert_eq!(state.list_tasks("app-1", &["x".to_string()], &[]).len(), 1);
        assert!(state
            .list_tasks("app-1", &[], &["FAILED".to_string()])
            .is_empty());
    }
}
