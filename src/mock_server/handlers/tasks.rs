//! Task endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::{base_url, error, not_found, paginated, PageQuery, SharedState};
use crate::{Link, Task};

/// Body of a task creation request.
#[derive(Debug, Deserialize)]
pub struct CreateTaskParams {
    #[serde(default)]
    pub command: String,
    pub name: Option<String>,
    pub droplet_guid: Option<String>,
}

/// Query parameters for listing tasks.
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    /// Comma-separated names.
    pub names: Option<String>,
    /// Comma-separated states.
    pub states: Option<String>,
}

fn split(list: &Option<String>) -> Vec<String> {
    list.as_deref()
        .unwrap_or_default()
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn with_links(mut task: Task, base: &str, app_guid: &str) -> Task {
    let own = format!("{base}/v3/tasks/{}", task.guid);
    task.links.insert(
        "self".to_string(),
        Link {
            href: own.clone(),
            method: String::new(),
        },
    );
    task.links.insert(
        "app".to_string(),
        Link {
            href: format!("{base}/v3/apps/{app_guid}"),
            method: String::new(),
        },
    );
    task.links.insert(
        "cancel".to_string(),
        Link {
            href: format!("{own}/actions/cancel"),
            method: "POST".to_string(),
        },
    );
    if !task.droplet_guid.is_empty() {
        task.links.insert(
            "droplet".to_string(),
            Link {
                href: format!("{base}/v3/droplets/{}", task.droplet_guid),
                method: String::new(),
            },
        );
    }
    task
}

/// POST /v3/apps/{guid}/tasks
pub async fn create_task(
    State(state): State<SharedState>,
    Path(app_guid): Path<String>,
    headers: HeaderMap,
    Json(params): Json<CreateTaskParams>,
) -> Response {
    let mut state = state.write().await;
    if !state.apps.contains_key(&app_guid) {
        return not_found("App");
    }
    if params.command.is_empty() {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            10008,
            "CF-UnprocessableEntity",
            "Command must be between 1 and 4096 characters".to_string(),
        );
    }

    let created = state.create_task(
        &app_guid,
        &params.command,
        params.name.as_deref(),
        params.droplet_guid.as_deref(),
    );
    let task = with_links(created.task.clone(), &base_url(&headers), &app_guid);
    (StatusCode::ACCEPTED, Json(task)).into_response()
}

/// GET /v3/tasks/{guid}
///
/// Each read advances the task's script.
pub async fn get_task(
    State(state): State<SharedState>,
    Path(task_guid): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;

    match state.read_task(&task_guid) {
        Some(entry) => {
            let task = with_links(entry.task.clone(), &base_url(&headers), &entry.app_guid);
            (StatusCode::OK, Json(task)).into_response()
        }
        None => not_found("Task"),
    }
}

/// GET /v3/apps/{guid}/tasks
pub async fn list_tasks(
    State(state): State<SharedState>,
    Path(app_guid): Path<String>,
    Query(query): Query<ListTasksQuery>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if !state.apps.contains_key(&app_guid) {
        return not_found("App");
    }

    let base = base_url(&headers);
    let tasks: Vec<Task> = state
        .list_tasks(&app_guid, &split(&query.names), &split(&query.states))
        .into_iter()
        .cloned()
        .map(|t| with_links(t, &base, &app_guid))
        .collect();

    let page = PageQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let filters = [
        ("names", query.names.clone().unwrap_or_default()),
        ("states", query.states.clone().unwrap_or_default()),
    ];
    let path = format!("/v3/apps/{app_guid}/tasks");
    let body = paginated(&base, &path, &tasks, &page, state.per_page, &filters);
    (StatusCode::OK, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_skips_empty_entries() {
        assert_eq!(
            split(&Some("a,,b".to_string())),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(split(&None).is_empty());
    }
}
