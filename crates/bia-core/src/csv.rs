//! CSV export and import for time series.
//!
//! Format: a `timestamp,value,date` header, then one row per point with the
//! epoch-millisecond timestamp, the value, and an ISO-8601 UTC date. The date
//! column is informational and optional on import.

use std::path::Path;

use bia_common::{DataPoint, Error, Interval, Result, TimeSeries};
use chrono::{DateTime, SecondsFormat};

pub const CSV_HEADER: &str = "timestamp,value,date";

/// ISO-8601 UTC with millisecond precision, or empty when out of range.
pub fn iso_date(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Render `series` as CSV in stored point order.
pub fn export_to_csv(series: &TimeSeries) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + series.len() * 48);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for point in &series.points {
        out.push_str(&format!(
            "{},{},{}\n",
            point.timestamp,
            point.value,
            iso_date(point.timestamp)
        ));
    }
    out
}

fn parse_row(line_no: usize, line: &str) -> Result<DataPoint> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if !(2..=3).contains(&fields.len()) {
        return Err(Error::CsvParse {
            line: line_no,
            message: format!("expected 2 or 3 fields, found {}", fields.len()),
        });
    }
    let timestamp = fields[0].parse::<i64>().map_err(|_| Error::CsvParse {
        line: line_no,
        message: format!("invalid timestamp '{}'", fields[0]),
    })?;
    let value = fields[1].parse::<f64>().map_err(|_| Error::CsvParse {
        line: line_no,
        message: format!("invalid value '{}'", fields[1]),
    })?;
    Ok(DataPoint::new(timestamp, value))
}

/// Median spacing between consecutive distinct timestamps.
fn median_step(points: &[DataPoint]) -> Option<i64> {
    let mut stamps: Vec<i64> = points.iter().map(|p| p.timestamp).collect();
    stamps.sort_unstable();
    let mut steps: Vec<i64> = stamps
        .windows(2)
        .map(|w| w[1].saturating_sub(w[0]))
        .filter(|d| *d > 0)
        .collect();
    if steps.is_empty() {
        return None;
    }
    steps.sort_unstable();
    Some(steps[steps.len() / 2])
}

/// Parse CSV text. Blank lines and a leading header are skipped; errors
/// carry 1-based line numbers. When `interval` is `None` it is inferred from
/// the median spacing.
pub fn parse_csv(text: &str, interval: Option<Interval>) -> Result<TimeSeries> {
    let mut points = Vec::new();
    let mut seen_row = false;
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if !seen_row && line.to_ascii_lowercase().starts_with("timestamp") {
            seen_row = true;
            continue;
        }
        seen_row = true;
        points.push(parse_row(idx + 1, line)?);
    }

    let interval = interval.unwrap_or_else(|| {
        median_step(&points)
            .map(Interval::infer)
            .unwrap_or(Interval::Day)
    });
    Ok(TimeSeries::new(points, interval))
}

/// Read and parse a CSV file.
pub fn read_csv_file(path: &Path, interval: Option<Interval>) -> Result<TimeSeries> {
    let text = std::fs::read_to_string(path)?;
    parse_csv(&text, interval)
}
