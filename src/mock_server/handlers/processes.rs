//! Process endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{base_url, not_found, paginated, PageQuery, SharedState};
use crate::{Link, Process};

fn with_links(mut process: Process, base: &str, app_guid: &str) -> Process {
    let own = format!("{base}/v3/processes/{}", process.guid);
    process.links.insert(
        "self".to_string(),
        Link {
            href: own.clone(),
            method: String::new(),
        },
    );
    process.links.insert(
        "scale".to_string(),
        Link {
            href: format!("{own}/actions/scale"),
            method: "POST".to_string(),
        },
    );
    process.links.insert(
        "stats".to_string(),
        Link {
            href: format!("{own}/stats"),
            method: String::new(),
        },
    );
    process.links.insert(
        "app".to_string(),
        Link {
            href: format!("{base}/v3/apps/{app_guid}"),
            method: String::new(),
        },
    );
    process
}

/// GET /v3/apps/{guid}/processes
pub async fn list_processes(
    State(state): State<SharedState>,
    Path(app_guid): Path<String>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if !state.apps.contains_key(&app_guid) && !state.processes.contains_key(&app_guid) {
        return not_found("App");
    }

    let base = base_url(&headers);
    let processes: Vec<Process> = state
        .processes
        .get(&app_guid)
        .into_iter()
        .flatten()
        .cloned()
        .map(|p| with_links(p, &base, &app_guid))
        .collect();

    let path = format!("/v3/apps/{app_guid}/processes");
    let body = paginated(&base, &path, &processes, &query, state.per_page, &[]);
    (StatusCode::OK, Json(body)).into_response()
}

/// GET /v3/processes/{guid}/stats
///
/// Stats are returned in a single page without a pagination object.
pub async fn process_stats(
    State(state): State<SharedState>,
    Path(process_guid): Path<String>,
) -> Response {
    let state = state.read().await;

    match state.stats.get(&process_guid) {
        Some(stats) => (
            StatusCode::OK,
            Json(serde_json::json!({ "resources": stats })),
        )
            .into_response(),
        None => not_found("Process"),
    }
}
