//! Download-link extraction from geoBoundaries metadata responses.
//!
//! The API answers either a single metadata object or a list of them. Each
//! object may carry the GeoJSON download link under `geojson` or, in older
//! releases, `gjDownloadURL`.

use serde_json::Value;
use tracing::{error, info, warn};

use crate::boundaries::FetchError;
use crate::models::BoundaryRequest;

/// Primary download-link field per current API documentation.
const LINK_FIELD: &str = "geojson";
/// Field name used by older metadata records.
const LEGACY_LINK_FIELD: &str = "gjDownloadURL";

/// Find the GeoJSON download link in a metadata response.
///
/// Returns `Ok(None)` when no entry carries a link under either field name;
/// that legitimately means no data is published for the requested level.
/// A response that is neither a list nor an object is an error.
pub fn find_download_url(
    metadata: &Value,
    request: &BoundaryRequest,
) -> Result<Option<String>, FetchError> {
    match metadata {
        Value::Array(entries) => {
            for entry in entries {
                let obj = match entry {
                    Value::Object(obj) => obj,
                    other => {
                        warn!(
                            "Skipping non-object metadata entry for {}: {}",
                            request, other
                        );
                        continue;
                    }
                };
                if let Some(url) = link_from_object(obj, request) {
                    return Ok(Some(url));
                }
            }
            Ok(None)
        }
        Value::Object(obj) => Ok(link_from_object(obj, request)),
        other => {
            error!(
                "Metadata for {} is neither a list nor an object: {}",
                request, other
            );
            Err(FetchError::MetadataShape {
                request: request.to_string(),
            })
        }
    }
}

fn link_from_object(
    obj: &serde_json::Map<String, Value>,
    request: &BoundaryRequest,
) -> Option<String> {
    if let Some(Value::String(url)) = obj.get(LINK_FIELD) {
        return Some(url.clone());
    }
    if let Some(Value::String(url)) = obj.get(LEGACY_LINK_FIELD) {
        info!(
            "Using legacy '{}' field from metadata for {}",
            LEGACY_LINK_FIELD, request
        );
        return Some(url.clone());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReleaseType;
    use serde_json::json;

    fn request() -> BoundaryRequest {
        BoundaryRequest::new("BOL", 0, ReleaseType::GbOpen)
    }

    #[test]
    fn test_object_with_primary_field() {
        let meta = json!({"geojson": "https://example.org/bol.geojson"});
        let url = find_download_url(&meta, &request()).unwrap();
        assert_eq!(url.as_deref(), Some("https://example.org/bol.geojson"));
    }

    #[test]
    fn test_object_with_legacy_field_only() {
        let meta = json!({"gjDownloadURL": "https://example.org/legacy.geojson"});
        let url = find_download_url(&meta, &request()).unwrap();
        assert_eq!(url.as_deref(), Some("https://example.org/legacy.geojson"));
    }

    #[test]
    fn test_primary_field_preferred_over_legacy() {
        let meta = json!({
            "gjDownloadURL": "https://example.org/legacy.geojson",
            "geojson": "https://example.org/primary.geojson"
        });
        let url = find_download_url(&meta, &request()).unwrap();
        assert_eq!(url.as_deref(), Some("https://example.org/primary.geojson"));
    }

    #[test]
    fn test_list_scans_past_non_object_entries() {
        let meta = json!([
            42,
            {"boundaryISO": "BOL"},
            {"geojson": "https://example.org/bol.geojson"}
        ]);
        let url = find_download_url(&meta, &request()).unwrap();
        assert_eq!(url.as_deref(), Some("https://example.org/bol.geojson"));
    }

    #[test]
    fn test_empty_list_has_no_link() {
        let meta = json!([]);
        assert!(find_download_url(&meta, &request()).unwrap().is_none());
    }

    #[test]
    fn test_object_without_link_fields() {
        let meta = json!({"boundaryISO": "BOL", "boundaryType": "ADM0"});
        assert!(find_download_url(&meta, &request()).unwrap().is_none());
    }

    #[test]
    fn test_non_string_link_value_ignored() {
        let meta = json!({"geojson": 7});
        assert!(find_download_url(&meta, &request()).unwrap().is_none());
    }

    #[test]
    fn test_scalar_metadata_is_an_error() {
        let meta = json!("nope");
        let err = find_download_url(&meta, &request()).unwrap_err();
        assert!(matches!(err, FetchError::MetadataShape { .. }));
    }
}
