//! Boundary retrieval: geoBoundaries API client with a local file cache.

pub mod cache;
pub mod fetcher;
pub mod metadata;

use std::path::PathBuf;

use thiserror::Error;

pub use cache::BoundaryCache;
pub use fetcher::BoundaryFetcher;

/// Classified failure of one boundary fetch.
///
/// A request for a level the country has not published is not a failure;
/// that case surfaces as `Ok(None)` from the fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Cache file did not parse as GeoJSON. The file has already been
    /// removed; a repeat call goes to the network.
    #[error("cache file {path} contained invalid GeoJSON (removed)")]
    CorruptCache {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the cache directory failed.
    #[error("cache I/O failed at {path}")]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Base URL did not parse.
    #[error("invalid API base URL {url:?}")]
    BadBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Server answered outside the 2xx range.
    #[error("GET {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Connection failure or timeout.
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body was not the JSON we expected.
    #[error("response from {url} was not valid JSON")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Metadata response was neither a list nor an object.
    #[error("metadata for {request} is neither a list nor an object")]
    MetadataShape { request: String },
}
