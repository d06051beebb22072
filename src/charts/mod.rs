//! Chart rendering over tabular conflict/connectivity data.

pub mod bars;
pub mod series;
pub mod table;

pub use bars::{render_metric_bars, BarChartConfig, MetricStyle};
pub use series::{render_country_series, SeriesChartConfig};
pub use table::Table;
