//! Boundary fetch pipeline.
//!
//! Resolves country names to ISO3 codes, then fetches and caches the
//! requested ADM levels from the geoBoundaries API.

mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use demarc::boundaries::fetcher::DEFAULT_BASE_URL;
use demarc::countries::resolve_iso3;
use demarc::{BoundaryFetcher, BoundaryRequest, ReleaseType};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "fetch")]
#[command(about = "Fetch administrative boundaries from the geoBoundaries API")]
struct Args {
    /// Country names or ISO codes (overridden by --config)
    countries: Vec<String>,

    /// TOML run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// ADM levels to fetch
    #[arg(short, long, value_delimiter = ',', default_values_t = [0u8, 1u8])]
    levels: Vec<u8>,

    /// Release channel
    #[arg(short, long, default_value = "gbOpen")]
    release: ReleaseType,

    /// Cache/output directory for GeoJSON files
    #[arg(short, long, default_value = "data/boundaries")]
    output_dir: PathBuf,

    /// API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

/// Run parameters after merging CLI arguments with an optional config file.
struct Run {
    countries: Vec<String>,
    levels: Vec<u8>,
    release: ReleaseType,
    output_dir: PathBuf,
    base_url: String,
}

impl Run {
    fn from_args(args: Args) -> Result<Self> {
        match &args.config {
            Some(path) => {
                let config = Config::load_from_file(path)?;
                Ok(Self {
                    countries: config.fetch.countries,
                    levels: config.fetch.levels,
                    release: config.fetch.release,
                    output_dir: config.global.output_dir,
                    base_url: config.global.base_url,
                })
            }
            None => Ok(Self {
                countries: args.countries,
                levels: args.levels,
                release: args.release,
                output_dir: args.output_dir,
                base_url: args.base_url,
            }),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let run = Run::from_args(args)?;

    if run.countries.is_empty() {
        anyhow::bail!("No countries given (pass names as arguments or use --config)");
    }

    info!("Demarc Boundary Fetch");
    info!("Output directory: {}", run.output_dir.display());

    // Resolve country names to ISO codes
    let mut iso_codes = Vec::new();
    for name in &run.countries {
        match resolve_iso3(name) {
            Some(code) => {
                info!("'{}' -> '{}'", name, code);
                iso_codes.push(code);
            }
            None => warn!("Could not find ISO code for '{}', skipping", name),
        }
    }
    if iso_codes.is_empty() {
        anyhow::bail!("None of the given countries resolved to an ISO code");
    }

    let fetcher = BoundaryFetcher::new(&run.base_url, &run.output_dir)?;

    let total = (iso_codes.len() * run.levels.len()) as u64;
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut fetched = 0usize;
    let mut missing = 0usize;
    for &level in &run.levels {
        info!("Processing ADM level: ADM{}", level);
        for code in &iso_codes {
            let request = BoundaryRequest::new(*code, level, run.release);
            pb.set_message(request.to_string());

            match fetcher.fetch(&request).await {
                Some(collection) => {
                    info!(
                        "{}: FeatureCollection with {} features",
                        request,
                        collection.features.len()
                    );
                    fetched += 1;
                }
                None => {
                    info!("{}: no data available", request);
                    missing += 1;
                }
            }
            pb.inc(1);
        }
    }
    pb.finish_and_clear();

    info!(
        "Done: {} datasets fetched, {} unavailable, cache at {}",
        fetched,
        missing,
        fetcher.cache().dir().display()
    );
    Ok(())
}
