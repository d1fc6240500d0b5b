//! HTTP request handlers for the mock server.
//!
//! Links are advertised with an `https` scheme built from the request's
//! `Host` header, the way a controller behind a TLS terminator reports them.
//! The client rewrites them to `http` before following them.

pub mod apps;
pub mod processes;
pub mod tasks;

pub use apps::*;
pub use processes::*;
pub use tasks::*;

use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

/// State handle shared by every handler.
pub type SharedState = Arc<RwLock<MockState>>;

/// Paging parameters accepted by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Advertised base URL for links in a response.
pub(crate) fn base_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    format!("https://{host}")
}

/// A link object with no method, which clients read as GET.
pub(crate) fn href(url: String) -> serde_json::Value {
    serde_json::json!({ "href": url })
}

/// Slice `items` into one page of a v3 list envelope.
///
/// `filters` are carried over into the `next` link.
pub(crate) fn paginated<T: Serialize>(
    base: &str,
    path: &str,
    items: &[T],
    query: &PageQuery,
    default_per_page: usize,
    filters: &[(&str, String)],
) -> serde_json::Value {
    let per_page = query.per_page.unwrap_or(default_per_page).max(1);
    let page = query.page.unwrap_or(1).max(1);
    let total_pages = items.len().div_ceil(per_page).max(1);

    let start = ((page - 1) * per_page).min(items.len());
    let end = (start + per_page).min(items.len());

    let next = if page < total_pages {
        let mut next = format!("{base}{path}?page={}&per_page={per_page}", page + 1);
        for (key, value) in filters.iter().filter(|(_, v)| !v.is_empty()) {
            next.push_str(&format!("&{key}={}", urlencoding::encode(value)));
        }
        href(next)
    } else {
        serde_json::Value::Null
    };

    serde_json::json!({
        "pagination": {
            "total_results": items.len(),
            "total_pages": total_pages,
            "first": href(format!("{base}{path}?page=1&per_page={per_page}")),
            "next": next,
        },
        "resources": &items[start..end],
    })
}

/// A v3 error response.
pub(crate) fn error(status: StatusCode, code: u32, title: &str, detail: String) -> Response {
    (
        status,
        Json(serde_json::json!({
            "errors": [{ "code": code, "title": title, "detail": detail }]
        })),
    )
        .into_response()
}

pub(crate) fn not_found(what: &str) -> Response {
    error(
        StatusCode::NOT_FOUND,
        10010,
        "CF-ResourceNotFound",
        format!("{what} not found"),
    )
}
