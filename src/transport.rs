//! The request executor the client is built on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Request, Response};

use crate::error::{BoxError, CapiError, Result};

const USER_AGENT: &str = concat!("capi/", env!("CARGO_PKG_VERSION"));

/// Executes a fully formed request and returns the raw response.
///
/// The client never performs I/O beyond calling this trait, so callers can
/// supply their own executor (a proxy-aware client, a recording spy, ...).
/// Implementations should not retry; the client does not either.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use capi::{BoxError, Transport};
///
/// struct Logged(reqwest::Client);
///
/// #[async_trait]
/// impl Transport for Logged {
///     async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, BoxError> {
///         println!("{} {}", request.method(), request.url());
///         Ok(self.0.execute(request).await?)
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `request`.
    async fn execute(&self, request: Request) -> core::result::Result<Response, BoxError>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn execute(&self, request: Request) -> core::result::Result<Response, BoxError> {
        Ok(reqwest::Client::execute(self, request).await?)
    }
}

/// Build the default reqwest transport.
///
/// reqwest picks up `HTTP_PROXY`/`http_proxy` from the environment, which is
/// what the client relies on once links are rewritten to `http`.
pub fn default_transport() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .brotli(true)
        .gzip(true)
        .deflate(true)
        .timeout(Duration::from_secs(300))
        .build()
        .map_err(CapiError::HttpError)
}
