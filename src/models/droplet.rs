//! Droplet and package lookups for an app's current droplet.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::CapiClient;
use crate::context::Context;
use crate::error::{CapiError, Result};
use crate::link::{normalize_scheme, Href};

/// The package a droplet was staged from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageLocation {
    /// Package guid.
    pub guid: String,
    /// Normalized download link for the package bits.
    pub download_href: String,
}

/// `GET /v3/apps/{guid}/droplets/current`, reduced to what the lookups read.
#[derive(Debug, Deserialize)]
struct CurrentDroplet {
    #[serde(default)]
    guid: String,
    #[serde(default)]
    links: DropletLinks,
}

#[derive(Debug, Default, Deserialize)]
struct DropletLinks {
    #[serde(default)]
    package: Option<Href>,
}

/// `GET /v3/packages/{guid}`, reduced to the guid and download link.
#[derive(Debug, Deserialize)]
struct PackageResource {
    #[serde(default)]
    guid: String,
    #[serde(default)]
    links: PackageLinks,
}

#[derive(Debug, Default, Deserialize)]
struct PackageLinks {
    #[serde(default)]
    download: Option<Href>,
}

impl CapiClient {
    async fn current_droplet(&self, ctx: &Context, app_guid: &str) -> Result<CurrentDroplet> {
        let url = self.endpoint(&format!(
            "/v3/apps/{}/droplets/current",
            urlencoding::encode(self.app_or_default(app_guid))
        ))?;
        self.get_lookup(ctx, url, "droplet").await
    }

    /// Resolve the guid of an app's current droplet.
    ///
    /// # Errors
    ///
    /// Returns [`CapiError::EmptyResults`] if the body is empty or carries no
    /// guid.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn droplet_guid(&self, ctx: &Context, app_guid: &str) -> Result<String> {
        let droplet = self.current_droplet(ctx, app_guid).await?;

        if droplet.guid.is_empty() {
            return Err(CapiError::EmptyResults { resource: "droplet" });
        }
        Ok(droplet.guid)
    }

    /// Resolve the package behind an app's current droplet.
    ///
    /// Follows the droplet's `package` link and returns the package guid with
    /// its download link. Both links are normalized.
    ///
    /// # Errors
    ///
    /// Returns [`CapiError::EmptyResults`] if either body is empty, the droplet
    /// has no package link, or the package lacks a guid or download link.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn package_guid(&self, ctx: &Context, app_guid: &str) -> Result<PackageLocation> {
        let droplet = self.current_droplet(ctx, app_guid).await?;

        let package_href = droplet
            .links
            .package
            .map(|link| link.href)
            .filter(|href| !href.is_empty())
            .ok_or(CapiError::EmptyResults {
                resource: "package link",
            })?;
        let url = Url::parse(&normalize_scheme(&package_href))?;

        let package: PackageResource = self.get_lookup(ctx, url, "package").await?;
        let download_href = package
            .links
            .download
            .map(|link| link.href)
            .unwrap_or_default();

        if package.guid.is_empty() || download_href.is_empty() {
            return Err(CapiError::EmptyResults { resource: "package" });
        }

        Ok(PackageLocation {
            guid: package.guid,
            download_href: normalize_scheme(&download_href),
        })
    }
}
