//! Marker trait for decoded API resources.

use serde::de::DeserializeOwned;

/// A resource decoded from a response body.
///
/// Every resource returned to a caller passes through
/// [`normalize_links`](Self::normalize_links) first, whether it came from a
/// single fetch or from a page of a list.
pub trait Resource: DeserializeOwned + Send {
    /// Rewrite relation links so they can be followed through the proxy.
    ///
    /// Resources without links keep the default no-op.
    fn normalize_links(&mut self) {}
}
