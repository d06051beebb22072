//! geoBoundaries fetcher: metadata lookup, GeoJSON download, cache fill.

use std::path::PathBuf;
use std::time::Duration;

use geojson::FeatureCollection;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::boundaries::{metadata, BoundaryCache, FetchError};
use crate::models::BoundaryRequest;

/// Default API base; releases hang off `/{release}/{iso3}/ADM{level}`.
pub const DEFAULT_BASE_URL: &str = "https://www.geoboundaries.org/api/current";

/// Metadata responses are small; downloads can be tens of megabytes.
const METADATA_TIMEOUT: Duration = Duration::from_secs(10);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches administrative boundaries, serving from the file cache when the
/// requested key has been downloaded before.
#[derive(Debug)]
pub struct BoundaryFetcher {
    client: Client,
    base_url: String,
    cache: BoundaryCache,
}

impl BoundaryFetcher {
    /// Build a fetcher against `base_url` with its cache at `cache_dir`.
    pub fn new(base_url: &str, cache_dir: impl Into<PathBuf>) -> Result<Self, FetchError> {
        Url::parse(base_url).map_err(|source| FetchError::BadBaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        let client = Client::builder()
            .user_agent("demarc/0.1 (boundary fetcher)")
            .build()
            .map_err(|source| FetchError::Request {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: BoundaryCache::open(cache_dir)?,
        })
    }

    /// Fetcher against the public geoBoundaries API.
    pub fn with_default_base(cache_dir: impl Into<PathBuf>) -> Result<Self, FetchError> {
        Self::new(DEFAULT_BASE_URL, cache_dir)
    }

    pub fn cache(&self) -> &BoundaryCache {
        &self.cache
    }

    /// Fetch boundaries for `request`, logging any failure and collapsing it
    /// to an absence value. Never panics and never propagates an error.
    pub async fn fetch(&self, request: &BoundaryRequest) -> Option<FeatureCollection> {
        match self.try_fetch(request).await {
            Ok(collection) => collection,
            Err(e) => {
                warn!("Failed to fetch boundaries for {}: {:#}", request, e);
                None
            }
        }
    }

    /// Fetch boundaries for `request`, keeping the failure classification.
    ///
    /// `Ok(None)` means the API published no dataset for this key (no
    /// download link in the metadata). A corrupt cache entry is removed and
    /// reported as `FetchError::CorruptCache` without re-fetching; the next
    /// call for the same key goes to the network.
    pub async fn try_fetch(
        &self,
        request: &BoundaryRequest,
    ) -> Result<Option<FeatureCollection>, FetchError> {
        if let Some(cached) = self.cache.load(request)? {
            return Ok(Some(cached));
        }

        let metadata_url = format!("{}/{}", self.base_url, request.api_path());
        info!("Fetching metadata from API: {}", metadata_url);
        let metadata: Value = self.get_json(&metadata_url, METADATA_TIMEOUT).await?;

        let download_url = match metadata::find_download_url(&metadata, request)? {
            Some(url) => url,
            None => {
                info!(
                    "No GeoJSON download URL found in metadata for {}",
                    request
                );
                return Ok(None);
            }
        };

        info!("Downloading GeoJSON from: {}", download_url);
        let collection: FeatureCollection =
            self.get_json(&download_url, DOWNLOAD_TIMEOUT).await?;
        debug!(
            "Downloaded {} features for {}",
            collection.features.len(),
            request
        );

        self.cache.store(request, &collection)?;
        Ok(Some(collection))
    }

    /// GET `url` and decode the body as JSON, classifying transport,
    /// status, and decode failures separately.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|source| FetchError::MalformedResponse {
            url: url.to_string(),
            source,
        })
    }
}
