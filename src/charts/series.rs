//! Per-country dual-axis time series: conflict metrics against download speed.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use plotters::prelude::*;
use tracing::{info, warn};

use crate::charts::table::Table;

const PRIMARY_COLOR: RGBColor = RGBColor(0xd6, 0x27, 0x28);
const SECONDARY_COLOR: RGBColor = RGBColor(0x1f, 0x77, 0xb4);

/// Column mapping and sizing for the time-series figures.
#[derive(Debug, Clone)]
pub struct SeriesChartConfig {
    pub date_column: String,
    pub country_column: String,
    /// Metric drawn on the left axis.
    pub primary_metric: String,
    /// Metric drawn on the right axis.
    pub secondary_metric: String,
    pub size: (u32, u32),
}

impl Default for SeriesChartConfig {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            country_column: "country".to_string(),
            primary_metric: "conflict_intensity_index".to_string(),
            secondary_metric: "download_speed".to_string(),
            size: (800, 400),
        }
    }
}

fn file_stem_for(country: &str) -> String {
    country
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// One (date, value) series for a single country, sorted by date.
fn country_series(
    table: &Table,
    rows: &[usize],
    dates: &[NaiveDate],
    metric: &str,
) -> Option<Vec<(NaiveDate, f64)>> {
    let values = table.numeric_column(metric)?;
    let mut series: Vec<(NaiveDate, f64)> =
        rows.iter().map(|&i| (dates[i], values[i])).collect();
    series.sort_by_key(|(d, _)| *d);
    Some(series)
}

/// Render one dual-axis figure per country into `out_dir`.
///
/// The original notebook stacked these as tabs; here each country gets its
/// own SVG file. Countries with no rows are skipped. A missing secondary
/// metric degrades to a single-axis figure with a warning.
pub fn render_country_series(
    table: &Table,
    config: &SeriesChartConfig,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let dates = table
        .date_column(&config.date_column)
        .with_context(|| format!("No usable '{}' date column", config.date_column))?;
    if !table.has_column(&config.country_column) {
        bail!("Input table has no '{}' column", config.country_column);
    }
    if !table.has_column(&config.primary_metric) {
        bail!("Input table has no '{}' column", config.primary_metric);
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut written = Vec::new();
    for country in table.distinct(&config.country_column) {
        let rows = table.rows_where(&config.country_column, &country);
        if rows.is_empty() {
            continue;
        }

        let Some(primary) = country_series(table, &rows, &dates, &config.primary_metric) else {
            bail!("Column '{}' is not numeric", config.primary_metric);
        };
        let secondary = country_series(table, &rows, &dates, &config.secondary_metric);
        if secondary.is_none() {
            warn!(
                "No usable '{}' column; rendering {} without the right axis",
                config.secondary_metric, country
            );
        }

        let out = out_dir.join(format!("{}.svg", file_stem_for(&country)));
        render_one(&country, &primary, secondary.as_deref(), config, &out)?;
        written.push(out);
    }

    if written.is_empty() {
        warn!("No countries found in the input table, nothing rendered");
    }
    Ok(written)
}

fn render_one(
    country: &str,
    primary: &[(NaiveDate, f64)],
    secondary: Option<&[(NaiveDate, f64)]>,
    config: &SeriesChartConfig,
    out: &Path,
) -> Result<()> {
    let start = primary.first().map(|(d, _)| *d).unwrap_or_default();
    let end = primary
        .last()
        .map(|(d, _)| *d)
        .unwrap_or_default()
        .max(start.succ_opt().unwrap_or(start));

    let primary_max = primary.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max).max(1.0);
    let secondary_max = secondary
        .map(|s| s.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max))
        .unwrap_or(0.0)
        .max(1.0);

    let root = SVGBackend::new(out, config.size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Conflict Metrics vs Download Speed - {}", country),
            ("sans-serif", 18),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .right_y_label_area_size(60)
        .build_cartesian_2d(start..end, 0.0..primary_max * 1.1)?
        .set_secondary_coord(start..end, 0.0..secondary_max * 1.1);

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Conflict Intensity Index")
        .x_labels(8)
        .draw()?;
    chart
        .configure_secondary_axes()
        .y_desc("Download Speed (Mbps)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(primary.iter().copied(), &PRIMARY_COLOR))?
        .label("Conflict Intensity")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PRIMARY_COLOR));
    chart.draw_series(
        primary
            .iter()
            .map(|&(d, v)| Circle::new((d, v), 3, PRIMARY_COLOR.filled())),
    )?;

    if let Some(secondary) = secondary {
        chart
            .draw_secondary_series(LineSeries::new(secondary.iter().copied(), &SECONDARY_COLOR))?
            .label("Download Speed")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], SECONDARY_COLOR));
        chart.draw_secondary_series(
            secondary
                .iter()
                .map(|&(d, v)| Circle::new((d, v), 3, SECONDARY_COLOR.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    info!("Wrote time-series chart to {}", out.display());
    Ok(())
}
