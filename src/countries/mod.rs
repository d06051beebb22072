//! Country-name resolution against the ISO 3166 dataset.
//!
//! Used at the call site to turn a human country list into fetcher keys; the
//! fetcher itself only ever sees ISO3 codes.

use tracing::debug;

/// Resolve a free-text country name to its ISO 3166-1 alpha-3 code.
///
/// Matching is case-insensitive: an exact name match wins, then substring
/// containment (so "Bolivia" finds "Bolivia (Plurinational State of)"), and
/// an input that already is an alpha-3 or alpha-2 code passes through.
/// Returns `None` when nothing in the dataset matches.
pub fn resolve_iso3(name: &str) -> Option<&'static str> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    for country in rust_iso3166::ALL.iter() {
        if country.name.to_lowercase() == needle {
            return Some(country.alpha3);
        }
    }

    // Code passthrough before fuzzy matching so "IRN" never lands on a
    // name that happens to contain those letters.
    if name.len() == 3 {
        if let Some(country) = rust_iso3166::from_alpha3(&name.to_uppercase()) {
            return Some(country.alpha3);
        }
    }
    if name.len() == 2 {
        if let Some(country) = rust_iso3166::from_alpha2(&name.to_uppercase()) {
            return Some(country.alpha3);
        }
    }

    for country in rust_iso3166::ALL.iter() {
        if country.name.to_lowercase().contains(&needle) {
            debug!(
                "Resolved '{}' to {} via substring match on '{}'",
                name, country.alpha3, country.name
            );
            return Some(country.alpha3);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_name() {
        assert_eq!(resolve_iso3("Afghanistan"), Some("AFG"));
        assert_eq!(resolve_iso3("pakistan"), Some("PAK"));
    }

    #[test]
    fn test_substring_of_official_name() {
        // ISO name is "Bolivia (Plurinational State of)"
        assert_eq!(resolve_iso3("Bolivia"), Some("BOL"));
        // ISO name is "Syrian Arab Republic"
        assert_eq!(resolve_iso3("Syria"), Some("SYR"));
    }

    #[test]
    fn test_code_passthrough() {
        assert_eq!(resolve_iso3("BOL"), Some("BOL"));
        assert_eq!(resolve_iso3("bo"), Some("BOL"));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(resolve_iso3("Atlantis"), None);
        assert_eq!(resolve_iso3(""), None);
        assert_eq!(resolve_iso3("   "), None);
    }
}
