//! Side-by-side horizontal bar panels comparing metrics across countries.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use plotters::prelude::*;
use tracing::{info, warn};

use crate::charts::table::Table;

/// Default matplotlib-style bar color.
const DEFAULT_BAR_COLOR: RGBColor = RGBColor(0x1f, 0x77, 0xb4);

/// Display overrides for one metric column.
#[derive(Debug, Clone)]
pub struct MetricStyle {
    pub title: String,
    pub color: RGBColor,
}

/// Configuration for a metric comparison figure.
#[derive(Debug, Clone)]
pub struct BarChartConfig {
    /// Metric column names, one panel each, in order.
    pub metrics: Vec<String>,
    /// Per-metric title/color overrides, keyed by column name.
    pub styles: HashMap<String, MetricStyle>,
    /// Numeric column to sort countries by, ascending.
    pub sort_by: Option<String>,
    pub title: String,
    /// Optional source annotation rendered under the title.
    pub source: Option<String>,
    /// Figure size in pixels.
    pub size: (u32, u32),
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            metrics: Vec::new(),
            styles: HashMap::new(),
            sort_by: None,
            title: "Comparison of Metrics by Country".to_string(),
            source: None,
            size: (1500, 800),
        }
    }
}

/// Parse a `#rrggbb` hex color.
pub fn parse_hex_color(s: &str) -> Option<RGBColor> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(RGBColor(r, g, b))
}

/// Row order after applying the configured sort.
///
/// Sorting asks for a numeric column; a missing or non-numeric sort column
/// keeps the input order with a warning, mirroring the renderers' general
/// degrade-don't-fail contract.
fn sorted_order(table: &Table, sort_by: Option<&str>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..table.len()).collect();
    let Some(sort_col) = sort_by else {
        return order;
    };
    match table.numeric_column(sort_col) {
        Some(values) => {
            info!("Sorting countries by '{}' in ascending order", sort_col);
            order.sort_by(|&a, &b| {
                values[a]
                    .partial_cmp(&values[b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        None => warn!("Sorting metric '{}' unavailable, keeping input order", sort_col),
    }
    order
}

/// Metrics from `config` that exist as numeric columns, with their values.
fn usable_metrics<'a>(table: &Table, config: &'a BarChartConfig) -> Vec<(&'a str, Vec<f64>)> {
    config
        .metrics
        .iter()
        .filter_map(|metric| {
            table
                .numeric_column(metric)
                .map(|values| (metric.as_str(), values))
        })
        .collect()
}

/// Render the comparison figure to an SVG file.
///
/// Panels share the country axis; missing metrics are skipped with a
/// warning. Errors only on I/O trouble or when no metric is usable.
pub fn render_metric_bars(table: &Table, config: &BarChartConfig, out: &Path) -> Result<()> {
    if table.is_empty() {
        bail!("Input table has no rows");
    }
    let countries = table
        .column("country")
        .context("Input table has no 'country' column")?;

    let metrics = usable_metrics(table, config);
    if metrics.is_empty() {
        bail!("No valid metrics found in the table");
    }

    let order = sorted_order(table, config.sort_by.as_deref());
    let labels: Vec<String> = order.iter().map(|&i| countries[i].to_string()).collect();
    let n_rows = labels.len();

    let root = SVGBackend::new(out, config.size).into_drawing_area();
    root.fill(&WHITE)?;

    let header = match &config.source {
        Some(source) => format!("{} — {}", config.title, source),
        None => config.title.clone(),
    };
    let root = root.titled(&header, ("sans-serif", 24))?;
    let panels = root.split_evenly((1, metrics.len()));

    for (panel_idx, ((metric, values), panel)) in metrics.iter().zip(panels.iter()).enumerate() {
        let style = config.styles.get(*metric);
        let panel_title = style.map(|s| s.title.clone()).unwrap_or_else(|| metric.to_string());
        let color = style.map(|s| s.color).unwrap_or(DEFAULT_BAR_COLOR);

        let max = order
            .iter()
            .map(|&i| values[i])
            .fold(0.0_f64, f64::max)
            .max(1.0);

        // Country labels only on the leftmost panel; the axis is shared.
        let y_label_area = if panel_idx == 0 { 140 } else { 10 };

        let mut chart = ChartBuilder::on(panel)
            .caption(&panel_title, ("sans-serif", 16))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(y_label_area)
            .build_cartesian_2d(0.0..max * 1.15, (0..n_rows).into_segmented())?;

        let chart_labels = labels.clone();
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n_rows)
            .y_label_formatter(&move |seg| match seg {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => chart_labels
                    .get(*i)
                    .cloned()
                    .unwrap_or_default(),
                SegmentValue::Last => String::new(),
            })
            .draw()?;

        chart.draw_series(order.iter().enumerate().map(|(pos, &row)| {
            Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(pos)),
                    (values[row], SegmentValue::Exact(pos + 1)),
                ],
                color.filled(),
            )
        }))?;

        // Value labels at the bar ends
        chart.draw_series(order.iter().enumerate().map(|(pos, &row)| {
            Text::new(
                format!("{:.1}", values[row]),
                (values[row], SegmentValue::CenterOf(pos)),
                ("sans-serif", 12),
            )
        }))?;
    }

    root.present()?;
    info!("Wrote metric comparison chart to {}", out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::table::Table;

    fn sample() -> Table {
        Table::from_parts(
            vec!["country".to_string(), "nrEvents".to_string(), "note".to_string()],
            vec![
                vec!["Yemen".into(), "30".into(), "x".into()],
                vec!["Syria".into(), "10".into(), "y".into()],
                vec!["Iraq".into(), "20".into(), "z".into()],
            ],
        )
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#d62728"), Some(RGBColor(0xd6, 0x27, 0x28)));
        assert_eq!(parse_hex_color("d62728"), None);
        assert_eq!(parse_hex_color("#xyzxyz"), None);
        assert_eq!(parse_hex_color("#fff"), None);
    }

    #[test]
    fn test_sorted_order_ascending() {
        let t = sample();
        assert_eq!(sorted_order(&t, Some("nrEvents")), vec![1, 2, 0]);
    }

    #[test]
    fn test_sort_by_missing_column_keeps_input_order() {
        let t = sample();
        assert_eq!(sorted_order(&t, Some("nope")), vec![0, 1, 2]);
        assert_eq!(sorted_order(&t, None), vec![0, 1, 2]);
    }

    #[test]
    fn test_sort_by_non_numeric_column_keeps_input_order() {
        let t = sample();
        assert_eq!(sorted_order(&t, Some("note")), vec![0, 1, 2]);
    }

    #[test]
    fn test_usable_metrics_skips_invalid() {
        let t = sample();
        let config = BarChartConfig {
            metrics: vec!["nrEvents".into(), "missing".into(), "note".into()],
            ..Default::default()
        };
        let metrics = usable_metrics(&t, &config);
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].0, "nrEvents");
    }
}
