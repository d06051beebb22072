use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use demarc::ReleaseType;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub global: GlobalConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub output_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    /// Country names or ISO codes
    pub countries: Vec<String>,
    /// ADM levels to request for each country
    pub levels: Vec<u8>,
    #[serde(default = "default_release")]
    pub release: ReleaseType,
}

fn default_base_url() -> String {
    demarc::boundaries::fetcher::DEFAULT_BASE_URL.to_string()
}

fn default_release() -> ReleaseType {
    ReleaseType::GbOpen
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str(
            r#"
            [global]
            output_dir = "data/boundaries"

            [fetch]
            countries = ["Bolivia", "Yemen"]
            levels = [0, 1]
            "#,
        )
        .unwrap();
        assert_eq!(config.fetch.countries.len(), 2);
        assert_eq!(config.fetch.levels, vec![0, 1]);
        assert_eq!(config.fetch.release, ReleaseType::GbOpen);
        assert!(config.global.base_url.contains("geoboundaries.org"));
    }

    #[test]
    fn test_parse_release_override() {
        let config: Config = toml::from_str(
            r#"
            [global]
            base_url = "http://localhost:8080/api"
            output_dir = "tmp"

            [fetch]
            countries = ["SYR"]
            levels = [0]
            release = "gbHumanitarian"
            "#,
        )
        .unwrap();
        assert_eq!(config.fetch.release, ReleaseType::GbHumanitarian);
    }
}
