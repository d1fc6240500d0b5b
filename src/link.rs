//! Relation links and scheme normalization.
//!
//! The controller only advertises `https` endpoints, while this client is
//! meant to sit behind a forwarding proxy (`HTTP_PROXY`) that re-secures the
//! traffic. Every link read from a response is therefore rewritten to `http`
//! before it is followed or handed back to the caller.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const SECURE_SCHEME: &str = "https://";
const INSECURE_SCHEME: &str = "http://";

/// Method reported for links that do not carry one.
pub const DEFAULT_METHOD: &str = "GET";

/// Rewrite a leading `https://` scheme to `http://`.
///
/// Only the scheme component is touched; `https` appearing later in the
/// string (in a path or query) is left alone. Anything that does not start
/// with the secure scheme is returned unchanged.
///
/// ```
/// assert_eq!(capi::normalize_scheme("https://api.example.com/v3"), "http://api.example.com/v3");
/// assert_eq!(capi::normalize_scheme("http://h/https://x"), "http://h/https://x");
/// ```
pub fn normalize_scheme(href: &str) -> String {
    match href.get(..SECURE_SCHEME.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(SECURE_SCHEME) => {
            format!("{INSECURE_SCHEME}{}", &href[SECURE_SCHEME.len()..])
        }
        _ => href.to_string(),
    }
}

/// A navigable relation to another resource or action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target URL.
    #[serde(default)]
    pub href: String,

    /// HTTP method for the relation. Empty on the wire means GET.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub method: String,
}

impl Link {
    /// Create a GET link to `href`.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            method: DEFAULT_METHOD.to_string(),
        }
    }

    /// Normalize the scheme and default the method.
    pub fn normalize(&mut self) {
        self.href = normalize_scheme(&self.href);
        if self.method.is_empty() {
            self.method = DEFAULT_METHOD.to_string();
        }
    }

    /// Returns true if the link has no target.
    pub fn is_empty(&self) -> bool {
        self.href.is_empty()
    }
}

/// Relation map keyed by relation name (`self`, `app`, `droplet`, ...).
pub type Links = HashMap<String, Link>;

/// Normalize every entry of a relation map in place.
pub fn normalize_links(links: &mut Links) {
    for link in links.values_mut() {
        link.normalize();
    }
}

/// A bare `{ "href": ... }` object, used by envelopes that only need the URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Href {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub href: String,
}

/// Deserialize an optional string, mapping JSON `null` to an empty string.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_scheme_is_rewritten() {
        assert_eq!(
            normalize_scheme("https://some-addr.com/v3/apps?page=2"),
            "http://some-addr.com/v3/apps?page=2"
        );
    }

    #[test]
    fn test_only_scheme_component_is_rewritten() {
        assert_eq!(
            normalize_scheme("https://host/redirect?to=https://other"),
            "http://host/redirect?to=https://other"
        );
        assert_eq!(
            normalize_scheme("http://host/https/path"),
            "http://host/https/path"
        );
    }

    #[test]
    fn test_other_values_unchanged() {
        assert_eq!(normalize_scheme(""), "");
        assert_eq!(normalize_scheme("http://host"), "http://host");
        assert_eq!(normalize_scheme("ftp://host"), "ftp://host");
        assert_eq!(normalize_scheme("https:"), "https:");
    }

    #[test]
    fn test_scheme_match_is_case_insensitive() {
        assert_eq!(normalize_scheme("HTTPS://host/x"), "http://host/x");
    }

    #[test]
    fn test_link_method_defaults_to_get() {
        let mut link: Link = serde_json::from_str(r#"{"href":"https://h/x"}"#).unwrap();
        link.normalize();
        assert_eq!(link.method, "GET");
        assert_eq!(link.href, "http://h/x");

        let mut link: Link =
            serde_json::from_str(r#"{"href":"https://h/x","method":"POST"}"#).unwrap();
        link.normalize();
        assert_eq!(link.method, "POST");
    }

    #[test]
    fn test_null_href_decodes_as_empty() {
        let href: Href = serde_json::from_str(r#"{"href":null}"#).unwrap();
        assert!(href.href.is_empty());
    }
}
