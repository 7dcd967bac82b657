use std::sync::{Mutex, PoisonError};

use super::aggregate::{ReportResult, aggregate};
use super::record::ReportRecord;

/// Sink for run records, shared by every concurrently running case.
pub trait TestReporter: Send + Sync {
    fn put_record(&self, record: ReportRecord);
    /// Point-in-time copy of every record submitted so far.
    fn get_all_records(&self) -> Vec<ReportRecord>;
    /// Per-endpoint statistics ordered by descending average duration.
    fn export_all_report_results(&self) -> Vec<ReportResult>;
}

/// Keeps every record in memory behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    records: Mutex<Vec<ReportRecord>>,
}

impl MemoryReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TestReporter for MemoryReporter {
    fn put_record(&self, record: ReportRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    fn get_all_records(&self) -> Vec<ReportRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn export_all_report_results(&self) -> Vec<ReportResult> {
        let snapshot = self.get_all_records();
        aggregate(&snapshot)
    }
}

/// Drops every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardReporter;

impl TestReporter for DiscardReporter {
    fn put_record(&self, _record: ReportRecord) {}

    fn get_all_records(&self) -> Vec<ReportRecord> {
        Vec::new()
    }

    fn export_all_report_results(&self) -> Vec<ReportResult> {
        Vec::new()
    }
}
