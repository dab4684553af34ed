//! Loading the region GeoJSON asset from disk or over HTTP.

use std::path::PathBuf;

use reqwest::Client;
use tracing::{debug, info};

use crate::error::AssetError;
use crate::models::RegionFeatureCollection;

/// Where the region asset lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionSource {
    File(PathBuf),
    Url(String),
}

impl From<&str> for RegionSource {
    /// `http://` and `https://` prefixes select a URL, anything else a path
    fn from(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            RegionSource::Url(s.to_string())
        } else {
            RegionSource::File(PathBuf::from(s))
        }
    }
}

impl std::fmt::Display for RegionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionSource::File(path) => write!(f, "{}", path.display()),
            RegionSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Load and parse the region asset
pub async fn load_region(source: &RegionSource) -> Result<RegionFeatureCollection, AssetError> {
    info!("Loading region asset from {}", source);

    let text = match source {
        RegionSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| AssetError::Io {
                    path: path.clone(),
                    source: e,
                })?
        }
        RegionSource::Url(url) => fetch_text(&Client::new(), url).await?,
    };

    let region = RegionFeatureCollection::from_json(&text).map_err(|e| AssetError::Json {
        origin: source.to_string(),
        source: e,
    })?;

    debug!(
        "Region asset has {} features, primary geometry {:?}",
        region.features.len(),
        region.primary_geometry().map(|g| g.type_name())
    );

    Ok(region)
}

async fn fetch_text(client: &Client, url: &str) -> Result<String, AssetError> {
    let http_err = |e| AssetError::Http {
        url: url.to_string(),
        source: e,
    };

    let response = client.get(url).send().await.map_err(http_err)?;

    if !response.status().is_success() {
        return Err(AssetError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    response.text().await.map_err(http_err)
}
