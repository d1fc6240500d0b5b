//! Get trait for fetching single resources.

use async_trait::async_trait;

use crate::client::CapiClient;
use crate::context::Context;
use crate::error::Result;

/// Fetch a single resource by identifier.
///
/// # Example
///
/// ```ignore
/// use capi::{CapiClient, Context, Get, Task};
///
/// let client = CapiClient::from_env()?;
/// let task = Task::get(&client, &Context::background(), "task-guid".to_string()).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The identifier type for this resource.
    type Id;

    /// Fetch the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not 200, or the
    /// body cannot be decoded.
    async fn get(client: &CapiClient, ctx: &Context, id: Self::Id) -> Result<Self>;
}
