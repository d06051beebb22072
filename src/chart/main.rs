//! Chart rendering CLI over a metrics CSV.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use demarc::charts::bars::parse_hex_color;
use demarc::charts::{
    render_country_series, render_metric_bars, BarChartConfig, MetricStyle, SeriesChartConfig,
    Table,
};

/// matplotlib's default category palette, cycled across metrics.
const PALETTE: [&str; 6] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
];

#[derive(Parser, Debug)]
#[command(name = "chart")]
#[command(about = "Render conflict/connectivity charts from a CSV")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Side-by-side bar panels comparing metrics across countries
    Bars {
        /// Input CSV with a 'country' column and metric columns
        csv: PathBuf,

        /// Output SVG file
        #[arg(short, long, default_value = "metrics.svg")]
        out: PathBuf,

        /// Metric columns, as 'column' or 'column=Display Title'
        #[arg(short, long, required = true, value_delimiter = ',')]
        metrics: Vec<String>,

        /// Numeric column to sort countries by, ascending
        #[arg(short, long)]
        sort_by: Option<String>,

        /// Overall figure title
        #[arg(short, long, default_value = "Comparison of Metrics by Country")]
        title: String,

        /// Source annotation under the title
        #[arg(long)]
        source: Option<String>,
    },
    /// Per-country dual-axis time series (conflict vs download speed)
    Series {
        /// Input CSV with date, country, and metric columns
        csv: PathBuf,

        /// Output directory, one SVG per country
        #[arg(short, long, default_value = "series")]
        out_dir: PathBuf,

        /// Left-axis metric column
        #[arg(long, default_value = "conflict_intensity_index")]
        primary: String,

        /// Right-axis metric column
        #[arg(long, default_value = "download_speed")]
        secondary: String,
    },
}

/// Split 'column=Display Title' metric arguments into config pieces.
fn bar_config(
    metrics: &[String],
    sort_by: Option<String>,
    title: String,
    source: Option<String>,
) -> BarChartConfig {
    let mut config = BarChartConfig {
        sort_by,
        title,
        source,
        ..Default::default()
    };
    let mut styles = HashMap::new();
    for (i, entry) in metrics.iter().enumerate() {
        let (column, display) = match entry.split_once('=') {
            Some((column, display)) => (column.trim().to_string(), display.trim().to_string()),
            None => (entry.trim().to_string(), entry.trim().to_string()),
        };
        let color = parse_hex_color(PALETTE[i % PALETTE.len()])
            .unwrap_or(plotters::style::RGBColor(0x1f, 0x77, 0xb4));
        styles.insert(
            column.clone(),
            MetricStyle {
                title: display,
                color,
            },
        );
        config.metrics.push(column);
    }
    config.styles = styles;
    config
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    match args.command {
        Command::Bars {
            csv,
            out,
            metrics,
            sort_by,
            title,
            source,
        } => {
            let table = Table::from_csv_path(&csv)
                .with_context(|| format!("Failed to load {}", csv.display()))?;
            info!("Loaded {} rows from {}", table.len(), csv.display());
            let config = bar_config(&metrics, sort_by, title, source);
            render_metric_bars(&table, &config, &out)?;
        }
        Command::Series {
            csv,
            out_dir,
            primary,
            secondary,
        } => {
            let table = Table::from_csv_path(&csv)
                .with_context(|| format!("Failed to load {}", csv.display()))?;
            info!("Loaded {} rows from {}", table.len(), csv.display());
            let config = SeriesChartConfig {
                primary_metric: primary,
                secondary_metric: secondary,
                ..Default::default()
            };
            let written = render_country_series(&table, &config, &out_dir)?;
            info!("Rendered {} country figures", written.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_config_metric_specs() {
        let config = bar_config(
            &["nrFatalities=Fatalities".to_string(), "nrEvents".to_string()],
            Some("nrFatalities".to_string()),
            "t".to_string(),
            None,
        );
        assert_eq!(config.metrics, vec!["nrFatalities", "nrEvents"]);
        assert_eq!(config.styles["nrFatalities"].title, "Fatalities");
        assert_eq!(config.styles["nrEvents"].title, "nrEvents");
        assert_eq!(config.sort_by.as_deref(), Some("nrFatalities"));
    }
}
