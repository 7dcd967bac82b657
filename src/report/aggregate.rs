use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::record::ReportRecord;

const NANOS_PER_SEC: u128 = 1_000_000_000;
const MIN_QPS_WINDOW: Duration = Duration::from_millis(1);

/// Statistics for one API. `method` lists the distinct methods seen, comma
/// separated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportResult {
    #[serde(rename = "API")]
    pub api: String,
    #[serde(rename = "Method")]
    pub method: String,
    #[serde(rename = "Count")]
    pub count: u64,
    #[serde(rename = "Average", serialize_with = "as_nanos")]
    pub average: Duration,
    #[serde(rename = "Max", serialize_with = "as_nanos")]
    pub max: Duration,
    #[serde(rename = "Min", serialize_with = "as_nanos")]
    pub min: Duration,
    #[serde(rename = "QPS")]
    pub qps: u64,
    #[serde(rename = "Error")]
    pub error: u64,
}

#[derive(Default)]
struct Group<'a> {
    methods: BTreeSet<&'a str>,
    count: u64,
    total: u128,
    max: Duration,
    min: Option<Duration>,
    errors: u64,
    first_begin: Option<DateTime<Utc>>,
    last_end: Option<DateTime<Utc>>,
}

impl<'a> Group<'a> {
    fn add(&mut self, record: &'a ReportRecord) {
        self.methods.insert(record.method.as_str());
        let duration = record.duration();
        self.count = self.count.saturating_add(1);
        self.total = self.total.saturating_add(duration.as_nanos());
        self.max = self.max.max(duration);
        self.min = Some(self.min.map_or(duration, |min| min.min(duration)));
        self.errors = self.errors.saturating_add(record.error_count());
        self.first_begin = Some(
            self.first_begin
                .map_or(record.begin_time, |begin| begin.min(record.begin_time)),
        );
        self.last_end = Some(
            self.last_end
                .map_or(record.end_time, |end| end.max(record.end_time)),
        );
    }

    fn average(&self) -> Duration {
        let nanos = self
            .total
            .checked_div(u128::from(self.count))
            .unwrap_or_default();
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Runs per second over the group's window, rounded down. A window under
    /// one millisecond reports the count itself.
    fn qps(&self) -> u64 {
        let window = match (self.first_begin, self.last_end) {
            (Some(begin), Some(end)) => end
                .signed_duration_since(begin)
                .to_std()
                .unwrap_or_default(),
            (None, _) | (_, None) => Duration::ZERO,
        };
        if window < MIN_QPS_WINDOW {
            return self.count;
        }
        u128::from(self.count)
            .saturating_mul(NANOS_PER_SEC)
            .checked_div(window.as_nanos())
            .and_then(|qps| u64::try_from(qps).ok())
            .unwrap_or(self.count)
    }
}

/// Groups records by API and orders the groups by descending average
/// duration, then API.
#[must_use]
pub fn aggregate(records: &[ReportRecord]) -> Vec<ReportResult> {
    let mut groups: BTreeMap<&str, Group<'_>> = BTreeMap::new();
    for record in records {
        groups.entry(record.api.as_str()).or_default().add(record);
    }

    let mut results: Vec<ReportResult> = groups
        .into_iter()
        .map(|(api, group)| ReportResult {
            api: api.to_owned(),
            method: group.methods.iter().copied().collect::<Vec<_>>().join(","),
            count: group.count,
            average: group.average(),
            max: group.max,
            min: group.min.unwrap_or_default(),
            qps: group.qps(),
            error: group.errors,
        })
        .collect();
    results.sort_by(|left, right| {
        right
            .average
            .cmp(&left.average)
            .then_with(|| left.api.cmp(&right.api))
    });
    results
}

fn as_nanos<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX))
}
