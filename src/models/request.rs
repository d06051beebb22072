//! Boundary request key types.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// geoBoundaries release channel.
///
/// The channel is part of the API path and of the cache file name, so the
/// serialized form must match the API's spelling exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum ReleaseType {
    /// Open-license release (CC BY 4.0 equivalent)
    #[serde(rename = "gbOpen")]
    #[value(name = "gbOpen")]
    GbOpen,
    /// UN OCHA humanitarian release
    #[serde(rename = "gbHumanitarian")]
    #[value(name = "gbHumanitarian")]
    GbHumanitarian,
    /// UN SALB authoritative release
    #[serde(rename = "gbAuthoritative")]
    #[value(name = "gbAuthoritative")]
    GbAuthoritative,
}

impl ReleaseType {
    /// The API's spelling of this channel
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::GbOpen => "gbOpen",
            ReleaseType::GbHumanitarian => "gbHumanitarian",
            ReleaseType::GbAuthoritative => "gbAuthoritative",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gbOpen" => Ok(ReleaseType::GbOpen),
            "gbHumanitarian" => Ok(ReleaseType::GbHumanitarian),
            "gbAuthoritative" => Ok(ReleaseType::GbAuthoritative),
            other => Err(format!("unknown release type: {}", other)),
        }
    }
}

/// Key identifying one boundary dataset: country, admin depth, release channel.
///
/// Uniquely determines both the API metadata endpoint and the cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundaryRequest {
    /// ISO 3166-1 alpha-3 country code, uppercase
    pub iso3: String,
    /// Administrative level (0 = country outline, 1 = first subdivision, ...)
    pub level: u8,
    /// Release channel
    pub release: ReleaseType,
}

impl BoundaryRequest {
    pub fn new(iso3: impl Into<String>, level: u8, release: ReleaseType) -> Self {
        Self {
            iso3: iso3.into().to_uppercase(),
            level,
            release,
        }
    }

    /// Cache file name for this request, e.g. `BOL_ADM0_gbOpen.geojson`.
    pub fn cache_file_name(&self) -> String {
        format!("{}_ADM{}_{}.geojson", self.iso3, self.level, self.release)
    }

    /// API path segment relative to the base URL, e.g. `gbOpen/BOL/ADM0`.
    pub fn api_path(&self) -> String {
        format!("{}/{}/ADM{}", self.release, self.iso3, self.level)
    }
}

impl fmt::Display for BoundaryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ADM{} ({})", self.iso3, self.level, self.release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_file_name() {
        let req = BoundaryRequest::new("BOL", 0, ReleaseType::GbOpen);
        assert_eq!(req.cache_file_name(), "BOL_ADM0_gbOpen.geojson");
    }

    #[test]
    fn test_iso3_uppercased() {
        let req = BoundaryRequest::new("bol", 1, ReleaseType::GbHumanitarian);
        assert_eq!(req.iso3, "BOL");
        assert_eq!(req.cache_file_name(), "BOL_ADM1_gbHumanitarian.geojson");
    }

    #[test]
    fn test_api_path() {
        let req = BoundaryRequest::new("SYR", 2, ReleaseType::GbOpen);
        assert_eq!(req.api_path(), "gbOpen/SYR/ADM2");
    }

    #[test]
    fn test_release_type_round_trip() {
        for release in [
            ReleaseType::GbOpen,
            ReleaseType::GbHumanitarian,
            ReleaseType::GbAuthoritative,
        ] {
            assert_eq!(release.as_str().parse::<ReleaseType>(), Ok(release));
        }
        assert!("gbopen".parse::<ReleaseType>().is_err());
    }
}
