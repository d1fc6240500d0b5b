//! App lookups: guid resolution by name and environment variables.

use std::collections::HashMap;

use serde::Deserialize;

use crate::client::CapiClient;
use crate::context::Context;
use crate::error::{CapiError, Result};

/// `GET /v2/apps` response, reduced to the guids.
#[derive(Debug, Deserialize)]
struct V2AppList {
    #[serde(default)]
    resources: Vec<V2App>,
}

#[derive(Debug, Deserialize)]
struct V2App {
    #[serde(default)]
    metadata: V2Metadata,
}

#[derive(Debug, Default, Deserialize)]
struct V2Metadata {
    #[serde(default)]
    guid: String,
}

/// `GET /v3/apps/{guid}/environment_variables` response.
#[derive(Debug, Deserialize)]
struct EnvironmentVariables {
    #[serde(default)]
    var: Option<HashMap<String, String>>,
}

impl CapiClient {
    /// Resolve an app name in the client's space to its guid.
    ///
    /// Only the first match is used.
    ///
    /// # Errors
    ///
    /// Returns [`CapiError::EmptyResults`] if no app matches or the body is
    /// empty.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn app_guid(&self, ctx: &Context, app_name: &str) -> Result<String> {
        let mut url = self.endpoint("/v2/apps")?;
        url.query_pairs_mut()
            .append_pair("q", &format!("name:{app_name}"))
            .append_pair("q", &format!("space_guid:{}", self.space_guid()));

        let apps: V2AppList = self.get_lookup(ctx, url, "app").await?;

        apps.resources
            .into_iter()
            .next()
            .map(|app| app.metadata.guid)
            .filter(|guid| !guid.is_empty())
            .ok_or(CapiError::EmptyResults { resource: "app" })
    }

    /// Fetch an app's environment variables.
    ///
    /// An empty `app_guid` uses the client's default app.
    ///
    /// # Errors
    ///
    /// Returns [`CapiError::EmptyResults`] if the body is empty or has no
    /// `var` object. An empty `var` object is a valid, empty result.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn environment_variables(
        &self,
        ctx: &Context,
        app_guid: &str,
    ) -> Result<HashMap<String, String>> {
        let url = self.endpoint(&format!(
            "/v3/apps/{}/environment_variables",
            urlencoding::encode(self.app_or_default(app_guid))
        ))?;

        let env: EnvironmentVariables = self
            .get_lookup(ctx, url, "environment variables")
            .await?;
        env.var.ok_or(CapiError::EmptyResults {
            resource: "environment variables",
        })
    }
}
