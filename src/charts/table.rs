//! Minimal named-column table over CSV input.
//!
//! The chart renderers only need column lookup by name with string, numeric,
//! and date views; a missing or unparseable column degrades to an absence
//! with a warning rather than an error.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::warn;

/// Tabular dataset with named columns, as read from a CSV file.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    /// column name -> index into each row
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Read a table from a CSV file with a header row.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("Failed to read CSV header from {}", path.display()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.with_context(|| format!("Failed to read CSV row from {}", path.display()))?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }

        Ok(Self::from_parts(headers, rows))
    }

    /// Build a table from in-memory parts. Rows shorter than the header are
    /// padded with empty strings.
    pub fn from_parts(headers: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        for row in &mut rows {
            row.resize(headers.len(), String::new());
        }
        Self {
            headers,
            index,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// String view of a column; `None` (with a warning) if absent.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let Some(&i) = self.index.get(name) else {
            warn!("Column '{}' not found in table", name);
            return None;
        };
        Some(self.rows.iter().map(|row| row[i].as_str()).collect())
    }

    /// Numeric view of a column; `None` if absent or any value fails to
    /// parse as a float.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<f64>> {
        let values = self.column(name)?;
        let mut parsed = Vec::with_capacity(values.len());
        for (row, value) in values.iter().enumerate() {
            match value.trim().parse::<f64>() {
                Ok(v) => parsed.push(v),
                Err(_) => {
                    warn!(
                        "Column '{}' is not numeric: row {} holds {:?}",
                        name, row, value
                    );
                    return None;
                }
            }
        }
        Some(parsed)
    }

    /// Date view of a column (ISO `YYYY-MM-DD`); `None` if absent or any
    /// value fails to parse.
    pub fn date_column(&self, name: &str) -> Option<Vec<NaiveDate>> {
        let values = self.column(name)?;
        let mut parsed = Vec::with_capacity(values.len());
        for (row, value) in values.iter().enumerate() {
            match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
                Ok(d) => parsed.push(d),
                Err(e) => {
                    warn!(
                        "Column '{}' is not a date column: row {} holds {:?} ({})",
                        name, row, value, e
                    );
                    return None;
                }
            }
        }
        Some(parsed)
    }

    /// Row indices whose `column` value equals `value`, in input order.
    pub fn rows_where(&self, column: &str, value: &str) -> Vec<usize> {
        match self.column(column) {
            Some(values) => values
                .iter()
                .enumerate()
                .filter(|(_, v)| **v == value)
                .map(|(i, _)| i)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Distinct values of a column, in first-seen order.
    pub fn distinct(&self, column: &str) -> Vec<String> {
        let mut seen = Vec::new();
        if let Some(values) = self.column(column) {
            for v in values {
                if !seen.iter().any(|s| s == v) {
                    seen.push(v.to_string());
                }
            }
        }
        seen
    }
}
