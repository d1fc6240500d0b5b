//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use capi::{BoxError, CapiClient, Transport};
use reqwest::{Method, Request, Response};

/// Records every request before handing it to a real client.
#[derive(Default)]
pub struct RecordingTransport {
    inner: reqwest::Client,
    requests: Mutex<Vec<(Method, String)>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Method and URL of every request seen so far.
    pub fn requests(&self) -> Vec<(Method, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: Request) -> Result<Response, BoxError> {
        self.requests
            .lock()
            .unwrap()
            .push((request.method().clone(), request.url().to_string()));
        Ok(self.inner.execute(request).await?)
    }
}

/// Fails every request without touching the network.
#[derive(Default)]
pub struct FailingTransport {
    calls: Mutex<usize>,
}

impl FailingTransport {
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Transport for FailingTransport {
    async fn execute(&self, _request: Request) -> Result<Response, BoxError> {
        *self.calls.lock().unwrap() += 1;
        Err("some-error".into())
    }
}

/// A client for `addr` with default app `app-1` in `space-1`.
pub fn client(addr: &str, transport: Arc<dyn Transport>) -> CapiClient {
    CapiClient::new(addr, "app-1", "space-1", transport)
        .with_poll_interval(Duration::from_millis(10))
}

/// `addr` as the controller would advertise it, with an `https` scheme.
pub fn advertised(addr: &str) -> String {
    addr.replacen("http://", "https://", 1)
}
