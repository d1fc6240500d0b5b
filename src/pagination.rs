//! Cursor-following pagination for list endpoints.
//!
//! List endpoints answer with an envelope holding a `pagination.next.href`
//! cursor and a `resources` array. [`Pages`] follows the cursor one request
//! at a time until the server stops handing one out.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::CapiClient;
use crate::context::Context;
use crate::error::Result;
use crate::link::{normalize_scheme, Href};
use crate::traits::Resource;

/// Wire envelope of a list response.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default = "Vec::new")]
    pub resources: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Pagination {
    #[serde(default)]
    pub next: Option<Href>,
}

impl<T> Envelope<T> {
    /// The normalized next-page cursor, or `None` on the last page.
    fn next_href(&self) -> Option<String> {
        self.pagination
            .as_ref()
            .and_then(|p| p.next.as_ref())
            .map(|next| normalize_scheme(&next.href))
            .filter(|href| !href.is_empty())
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page, in response order.
    pub items: Vec<T>,
    /// The normalized cursor for the following page, if any.
    pub next: Option<Url>,
}

impl<T> Page<T> {
    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next: self.next,
        }
    }

    /// Whether the server advertised another page.
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A lazily fetched, finite sequence of pages.
///
/// Each call to [`next_page`](Self::next_page) performs one GET. Query
/// parameters only ever appear on the first URL; later requests use the
/// server's cursor verbatim (after scheme normalization). The sequence ends
/// after the last page or after the first error, and cannot be restarted.
///
/// # Example
///
/// ```ignore
/// let url = client.endpoint("/v3/apps/app-guid/processes")?;
/// let mut pages = client.paginate::<Process>(&ctx, url);
/// while let Some(page) = pages.next_page().await {
///     for process in page? {
///         println!("{}", process.guid);
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Pages<'c, T> {
    client: &'c CapiClient,
    ctx: Context,
    next: Option<Url>,
    fetched: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<'c, T: Resource> Pages<'c, T> {
    pub(crate) fn new(client: &'c CapiClient, ctx: Context, first: Url) -> Self {
        Self {
            client,
            ctx,
            next: Some(first),
            fetched: 0,
            _marker: PhantomData,
        }
    }

    /// Number of pages fetched so far.
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    /// Fetch the next page, or `None` once the sequence is exhausted.
    pub async fn next_page(&mut self) -> Option<Result<Page<T>>> {
        let url = self.next.take()?;
        Some(self.fetch(url).await)
    }

    async fn fetch(&mut self, url: Url) -> Result<Page<T>> {
        let envelope: Envelope<T> = self.client.get_json(&self.ctx, url).await?;
        self.fetched += 1;

        let next = match envelope.next_href() {
            Some(href) => Some(Url::parse(&href)?),
            None => None,
        };

        let mut items = envelope.resources;
        for item in &mut items {
            item.normalize_links();
        }

        tracing::debug!(
            page = self.fetched,
            items = items.len(),
            has_more = next.is_some(),
            "fetched page"
        );

        self.next = next.clone();
        Ok(Page { items, next })
    }

    /// Follow the cursor to the end and return every item in page order.
    ///
    /// If any page fails, the items gathered so far are discarded and the
    /// error is returned.
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut all_items = Vec::new();

        while let Some(page) = self.next_page().await {
            all_items.extend(page?.items);
        }

        Ok(all_items)
    }
}
