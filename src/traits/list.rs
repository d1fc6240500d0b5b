//! List trait for fetching paginated collections.

use async_trait::async_trait;
use url::Url;

use crate::client::CapiClient;
use crate::context::Context;
use crate::error::Result;
use crate::pagination::Pages;
use crate::traits::Resource;

/// List resources from a paginated endpoint.
///
/// Implementors only say where the first page lives; following the cursor is
/// shared.
///
/// # Example
///
/// ```ignore
/// use capi::{CapiClient, Context, List, Process};
///
/// let client = CapiClient::from_env()?;
/// let ctx = Context::background();
///
/// // Everything, following every next link
/// let all = Process::list_all(&client, &ctx, "app-guid").await?;
///
/// // Or page by page
/// let mut pages = Process::pages(&client, &ctx, "app-guid")?;
/// while let Some(page) = pages.next_page().await {
///     println!("{} processes", page?.len());
/// }
/// ```
#[async_trait]
pub trait List: Resource {
    /// What the listing is scoped to (an app guid, a filter, ...).
    type Scope: ?Sized + Sync;

    /// URL of the first page, including any query parameters.
    fn first_page(client: &CapiClient, scope: &Self::Scope) -> Result<Url>;

    /// Lazy page sequence for `scope`.
    fn pages<'c>(
        client: &'c CapiClient,
        ctx: &Context,
        scope: &Self::Scope,
    ) -> Result<Pages<'c, Self>> {
        Ok(client.paginate(ctx, Self::first_page(client, scope)?))
    }

    /// Fetch every page and return the items in page order.
    ///
    /// # Errors
    ///
    /// Returns the first error any page produces; items from earlier pages
    /// are discarded.
    async fn list_all(client: &CapiClient, ctx: &Context, scope: &Self::Scope) -> Result<Vec<Self>> {
        Self::pages(client, ctx, scope)?.collect_all().await
    }
}
