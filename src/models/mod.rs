//! Shared request types.

pub mod request;

pub use request::{BoundaryRequest, ReleaseType};
