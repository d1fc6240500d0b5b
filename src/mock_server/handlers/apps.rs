//! App, droplet and package endpoint handlers.

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{base_url, href, not_found, SharedState};

/// GET /v2/apps
///
/// Supports the `q=name:{name}` and `q=space_guid:{guid}` filters. Filters
/// are repeated keys, so the raw query is parsed by hand.
pub async fn list_v2_apps(
    State(state): State<SharedState>,
    RawQuery(query): RawQuery,
) -> Response {
    let mut name = None;
    let mut space = None;
    for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        if key != "q" {
            continue;
        }
        if let Some(v) = value.strip_prefix("name:") {
            name = Some(v.to_string());
        } else if let Some(v) = value.strip_prefix("space_guid:") {
            space = Some(v.to_string());
        }
    }

    let state = state.read().await;
    let resources: Vec<serde_json::Value> = state
        .apps
        .values()
        .filter(|a| name.as_deref().map_or(true, |n| a.name == n))
        .filter(|a| space.as_deref().map_or(true, |s| a.space_guid == s))
        .map(|a| {
            serde_json::json!({
                "metadata": { "guid": a.guid, "url": format!("/v2/apps/{}", a.guid) },
                "entity": { "name": a.name, "space_guid": a.space_guid },
            })
        })
        .collect();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "total_results": resources.len(),
            "total_pages": 1,
            "next_url": null,
            "resources": resources,
        })),
    )
        .into_response()
}

/// GET /v3/apps/{guid}/environment_variables
pub async fn environment_variables(
    State(state): State<SharedState>,
    Path(app_guid): Path<String>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    let Some(app) = state.apps.get(&app_guid) else {
        return not_found("App");
    };

    let base = base_url(&headers);
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "var": app.environment,
            "links": {
                "self": href(format!("{base}/v3/apps/{app_guid}/environment_variables")),
                "app": href(format!("{base}/v3/apps/{app_guid}")),
            },
        })),
    )
        .into_response()
}

/// GET /v3/apps/{guid}/droplets/current
pub async fn current_droplet(
    State(state): State<SharedState>,
    Path(app_guid): Path<String>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    let Some(app) = state.apps.get(&app_guid) else {
        return not_found("App");
    };
    let Some(droplet) = app
        .droplet_guid
        .as_ref()
        .and_then(|guid| state.droplets.get(guid))
    else {
        return not_found("Droplet");
    };

    let base = base_url(&headers);
    let mut links = serde_json::json!({
        "self": href(format!("{base}/v3/droplets/{}", droplet.guid)),
        "app": href(format!("{base}/v3/apps/{app_guid}")),
    });
    if let Some(ref package) = droplet.package_guid {
        links["package"] = href(format!("{base}/v3/packages/{package}"));
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "guid": droplet.guid,
            "state": "STAGED",
            "links": links,
        })),
    )
        .into_response()
}

/// GET /v3/packages/{guid}
pub async fn get_package(
    State(state): State<SharedState>,
    Path(package_guid): Path<String>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if !state.packages.contains(&package_guid) {
        return not_found("Package");
    }

    let base = base_url(&headers);
    let own = format!("{base}/v3/packages/{package_guid}");
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "guid": package_guid,
            "type": "bits",
            "state": "READY",
            "links": {
                "self": href(own.clone()),
                "upload": { "href": format!("{own}/upload"), "method": "POST" },
                "download": { "href": format!("{own}/download"), "method": "GET" },
            },
        })),
    )
        .into_response()
}
