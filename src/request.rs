//! Outbound request construction.

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Request};
use serde::Serialize;
use url::Url;

use crate::error::Result;

const APPLICATION_JSON: &str = "application/json";

/// Assembles a [`Request`] from a method, an absolute URL, headers and an
/// optional JSON body.
///
/// Every request asks for JSON; requests with a body declare it as JSON.
#[derive(Debug)]
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    /// Start a request.
    pub fn new(method: Method, url: Url) -> Self {
        let mut request = Request::new(method, url);
        request
            .headers_mut()
            .insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        Self { request }
    }

    /// Start a GET request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Start a POST request.
    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let bytes = serde_json::to_vec(body)?;
        self.request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        *self.request.body_mut() = Some(bytes.into());
        Ok(self)
    }

    /// Set an additional header.
    pub fn header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.request.headers_mut().insert(name, value);
        self
    }

    /// Finish the request.
    pub fn build(self) -> Request {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_has_accept_and_no_body() {
        let url = Url::parse("http://some-addr.com/v3/tasks/t-1").unwrap();
        let request = RequestBuilder::get(url).build();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().as_str(), "http://some-addr.com/v3/tasks/t-1");
        assert_eq!(request.headers()[ACCEPT], APPLICATION_JSON);
        assert!(request.body().is_none());
        assert!(request.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let url = Url::parse("http://some-addr.com/v3/apps/a/tasks").unwrap();
        let request = RequestBuilder::post(url)
            .json(&serde_json::json!({"command": "some-command"}))
            .unwrap()
            .build();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.headers()[CONTENT_TYPE], APPLICATION_JSON);
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, br#"{"command":"some-command"}"#);
    }
}
