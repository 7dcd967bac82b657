//! Per-run records and the per-endpoint aggregation built from them.
mod aggregate;
mod record;
mod reporter;
mod writers;


pub use aggregate::{ReportResult, aggregate};
pub use record::ReportRecord;
pub use reporter::{DiscardReporter, MemoryReporter, TestReporter};
pub use writers::{ReportFormat, write_json, write_report, write_text};
