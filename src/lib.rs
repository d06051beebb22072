//! Demarc - boundary data retrieval and charting for conflict/connectivity analysis
//!
//! This library provides shared types and modules for the fetch and chart binaries.

pub mod boundaries;
pub mod charts;
pub mod countries;
pub mod models;

pub use boundaries::{BoundaryCache, BoundaryFetcher, FetchError};
pub use models::{BoundaryRequest, ReleaseType};
