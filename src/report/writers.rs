use std::io::Write;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

use super::aggregate::ReportResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Writes `results` in `format`.
///
/// # Errors
///
/// Returns an error when encoding or writing fails.
pub fn write_report<W: Write>(
    format: ReportFormat,
    results: &[ReportResult],
    out: &mut W,
) -> Result<(), ReportError> {
    match format {
        ReportFormat::Text => write_text(results, out),
        ReportFormat::Json => write_json(results, out),
    }
}

/// JSON array of results; durations are nanoseconds.
///
/// # Errors
///
/// Returns an error when encoding or writing fails.
pub fn write_json<W: Write>(results: &[ReportResult], out: &mut W) -> Result<(), ReportError> {
    serde_json::to_writer(&mut *out, results)
        .map_err(|err| ReportError::Serialize { source: err })?;
    writeln!(out).map_err(|err| ReportError::Write { source: err })
}

const HEADERS: [&str; 8] = ["API", "Method", "Count", "Average", "Max", "Min", "QPS", "Error"];

/// Aligned plain-text table.
///
/// # Errors
///
/// Returns an error when writing fails.
pub fn write_text<W: Write>(results: &[ReportResult], out: &mut W) -> Result<(), ReportError> {
    let rows: Vec<[String; 8]> = results
        .iter()
        .map(|result| {
            [
                result.api.clone(),
                result.method.clone(),
                result.count.to_string(),
                format_duration(result.average),
                format_duration(result.max),
                format_duration(result.min),
                result.qps.to_string(),
                result.error.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = HEADERS.map(str::to_owned);
    for row in std::iter::once(&header).chain(&rows) {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(out, "{}", line.trim_end()).map_err(|err| ReportError::Write { source: err })?;
    }
    Ok(())
}

fn format_duration(duration: Duration) -> String {
    format!("{duration:?}")
}
