//! Cloud Controller API client.
//!
//! Low-level client that builds endpoint URLs, executes requests through the
//! injected [`Transport`] and gates response status codes. Higher-level
//! operations are implemented on the model types and via the `Get`/`List`
//! traits.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::context::Context;
use crate::error::{CapiError, Result};
use crate::link::normalize_scheme;
use crate::pagination::Pages;
use crate::request::RequestBuilder;
use crate::transport::{default_transport, Transport};
use crate::traits::Resource;

/// Default interval between task status re-checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Cloud Controller API client.
///
/// Holds the base address (always rewritten to `http` so a forwarding proxy
/// can re-secure the traffic), the default app and space guids, and a shared
/// transport. The client keeps no per-call state, so one instance can serve
/// concurrent callers; clones share the same transport.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use capi::{CapiClient, Context};
///
/// # async fn example() -> capi::Result<()> {
/// let transport = Arc::new(reqwest::Client::new());
/// let client = CapiClient::new("https://api.example.com", "app-guid", "space-guid", transport);
/// assert_eq!(client.addr(), "http://api.example.com");
///
/// let processes = client.processes(&Context::background(), "app-guid").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CapiClient {
    transport: Arc<dyn Transport>,
    addr: Arc<str>,
    app_guid: String,
    space_guid: String,
    poll_interval: Duration,
}

impl std::fmt::Debug for CapiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapiClient")
            .field("addr", &&*self.addr)
            .field("app_guid", &self.app_guid)
            .field("space_guid", &self.space_guid)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl CapiClient {
    /// Create a client from environment variables.
    ///
    /// Uses `CAPI_ADDR` for the base address and optionally `CAPI_APP_GUID`,
    /// `CAPI_SPACE_GUID` and `CAPI_POLL_INTERVAL_MS`. Requests go through a
    /// default reqwest transport, which honours `HTTP_PROXY`.
    ///
    /// # Errors
    ///
    /// Returns an error if `CAPI_ADDR` is not set, `CAPI_POLL_INTERVAL_MS` is
    /// not a number, or the HTTP client cannot be built.
    pub fn from_env() -> Result<Self> {
        let addr = env::var("CAPI_ADDR").map_err(|_| {
            CapiError::ConfigMissing("CAPI_ADDR environment variable not set".to_string())
        })?;
        let app_guid = env::var("CAPI_APP_GUID").unwrap_or_default();
        let space_guid = env::var("CAPI_SPACE_GUID").unwrap_or_default();

        let mut client = Self::new(&addr, &app_guid, &space_guid, Arc::new(default_transport()?));

        if let Ok(ms) = env::var("CAPI_POLL_INTERVAL_MS") {
            let ms: u64 = ms.parse().map_err(|_| {
                CapiError::ConfigMissing(format!("CAPI_POLL_INTERVAL_MS is not a number: {ms}"))
            })?;
            client = client.with_poll_interval(Duration::from_millis(ms));
        }

        Ok(client)
    }

    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `addr` - Base address of the API (e.g., `https://api.example.com`)
    /// * `app_guid` - App used when an operation is not given one
    /// * `space_guid` - Space used to scope app name lookups
    /// * `transport` - Request executor, possibly shared with other clients
    ///
    /// The address is not parsed here; a malformed address surfaces as
    /// [`CapiError::UrlError`] from the first operation.
    pub fn new(
        addr: &str,
        app_guid: &str,
        space_guid: &str,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let addr = normalize_scheme(addr.trim_end_matches('/'));

        Self {
            transport,
            addr: addr.into(),
            app_guid: app_guid.to_string(),
            space_guid: space_guid.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the fixed interval between task status re-checks.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The normalized base address.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// The app used when an operation is given an empty app guid.
    pub fn default_app_guid(&self) -> &str {
        &self.app_guid
    }

    /// The space guid used for app name lookups.
    pub fn space_guid(&self) -> &str {
        &self.space_guid
    }

    /// The task polling interval.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Resolve an empty app guid to the client's default.
    pub(crate) fn app_or_default<'a>(&'a self, app_guid: &'a str) -> &'a str {
        if app_guid.is_empty() {
            &self.app_guid
        } else {
            app_guid
        }
    }

    /// Build an absolute URL for `path` on the base address.
    ///
    /// The path replaces whatever path the base address carries.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = Url::parse(&self.addr)?;
        url.set_path(path);
        Ok(url)
    }

    /// Start a lazy page sequence at `first`.
    pub fn paginate<T: Resource>(&self, ctx: &Context, first: Url) -> Pages<'_, T> {
        Pages::new(self, ctx.clone(), first)
    }

    /// GET `url`, require 200 and decode the body.
    pub async fn get_json<T: DeserializeOwned>(&self, ctx: &Context, url: Url) -> Result<T> {
        let request = RequestBuilder::get(url).build();
        let body = self.send(ctx, request, StatusCode::OK).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GET `url` for a lookup, require 200 and decode the body.
    ///
    /// The API answers some not-found lookups with a 200 and no body; an
    /// empty or whitespace-only body is [`CapiError::EmptyResults`] naming
    /// `resource`, not a decode error.
    pub(crate) async fn get_lookup<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        url: Url,
        resource: &'static str,
    ) -> Result<T> {
        let request = RequestBuilder::get(url).build();
        let body = self.send(ctx, request, StatusCode::OK).await?;
        if body.trim().is_empty() {
            return Err(CapiError::EmptyResults { resource });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// POST `body` as JSON to `url`, require `expected` and decode the reply.
    pub async fn post_json<B, T>(
        &self,
        ctx: &Context,
        url: Url,
        body: &B,
        expected: StatusCode,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = RequestBuilder::post(url).json(body)?.build();
        let body = self.send(ctx, request, expected).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Execute `request` and return its body if the status is `expected`.
    ///
    /// The body is always read to the end, on the error path too, so the
    /// connection can be reused. A mismatched status becomes
    /// [`CapiError::ApiError`] carrying the body text.
    #[tracing::instrument(
        skip(self, ctx, request),
        fields(method = %request.method(), url = %request.url())
    )]
    pub async fn send(
        &self,
        ctx: &Context,
        request: Request,
        expected: StatusCode,
    ) -> Result<String> {
        ctx.run(async {
            let response = self
                .transport
                .execute(request)
                .await
                .map_err(CapiError::Transport)?;

            let status = response.status();
            let body = response.text().await.map_err(CapiError::HttpError)?;
            tracing::trace!(status = status.as_u16(), len = body.len(), "response received");

            if status != expected {
                return Err(CapiError::ApiError {
                    status_code: status.as_u16(),
                    body,
                });
            }

            Ok(body)
        })
        .await
    }
}
