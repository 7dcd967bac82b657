use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{AppError, AppResult, ReportError};
use crate::report::{ReportFormat, ReportResult, write_report};

/// Writes the report to `path`, or stdout when no path is given.
pub(crate) fn write_results(
    format: ReportFormat,
    results: &[ReportResult],
    path: Option<&Path>,
) -> AppResult<()> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|err| {
                AppError::report(ReportError::CreateFile {
                    path: path.to_path_buf(),
                    source: err,
                })
            })?;
            write_flushed(format, results, BufWriter::new(file))
        }
        None => write_flushed(format, results, std::io::stdout().lock()),
    }
}

fn write_flushed<W: Write>(
    format: ReportFormat,
    results: &[ReportResult],
    mut out: W,
) -> AppResult<()> {
    write_report(format, results, &mut out)?;
    out.flush()
        .map_err(|err| AppError::report(ReportError::Write { source: err }))
}
