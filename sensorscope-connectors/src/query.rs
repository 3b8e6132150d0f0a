//! Logical series queries
//!
//! A `Query` names what to fetch, independent of where it comes from:
//!
//! ```rust
//! use sensorscope_connectors::{Aggregate, AggregateWindow, Query};
//!
//! // Power readings of one plug, averaged over 10-minute windows
//! let query = Query::new("shellies")
//!     .with_tag("Sensor", "power")
//!     .with_window(AggregateWindow::new(600_000, Aggregate::Mean));
//! ```
//!
//! ## Windowed Aggregation
//!
//! Windows are aligned to the epoch and half open, `[start, start + every)`.
//! Each non-empty window yields one point stamped with the window's stop
//! time; empty windows yield nothing.

use std::collections::BTreeMap;

use sensorscope_core::Timestamp;

use crate::source::Record;

/// Field name used when the query does not set one
pub const DEFAULT_FIELD: &str = "value";

/// Reduction applied inside each window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Arithmetic mean
    Mean,
    /// Smallest value
    Min,
    /// Largest value
    Max,
    /// Latest value in the window
    Last,
}

impl Aggregate {
    fn reduce(self, values: &[f64]) -> Option<f64> {
        match self {
            Self::Mean => sensorscope_core::stats::mean(values),
            Self::Min => values.iter().copied().reduce(f64::min),
            Self::Max => values.iter().copied().reduce(f64::max),
            Self::Last => values.last().copied(),
        }
    }
}

/// Fixed-width aggregation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateWindow {
    /// Window width in milliseconds
    pub every_ms: u64,
    /// Reduction per window
    pub function: Aggregate,
}

impl AggregateWindow {
    /// Window of `every_ms` milliseconds reduced with `function`
    ///
    /// A zero width is not a window: `apply` returns nothing for it and
    /// sources reject the query with `SourceError::InvalidQuery`.
    pub fn new(every_ms: u64, function: Aggregate) -> Self {
        Self { every_ms, function }
    }

    /// Aggregate time-ordered points
    pub fn apply(&self, points: &[(Timestamp, f64)]) -> Vec<(Timestamp, f64)> {
        let every = self.every_ms;
        if every == 0 {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut current: Option<Timestamp> = None;
        let mut bucket: Vec<f64> = Vec::new();

        for &(t, v) in points {
            let start = t - t % every;
            if current != Some(start) {
                if let Some(prev) = current {
                    if let Some(reduced) = self.function.reduce(&bucket) {
                        out.push((prev + every, reduced));
                    }
                }
                current = Some(start);
                bucket.clear();
            }
            bucket.push(v);
        }
        if let (Some(prev), Some(reduced)) = (current, self.function.reduce(&bucket)) {
            out.push((prev + every, reduced));
        }

        out
    }
}

/// What to fetch from a series source
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Measurement name
    pub measurement: String,
    /// Field within the measurement
    pub field: String,
    /// Tags every record must carry with exactly these values
    pub tags: BTreeMap<String, String>,
    /// Inclusive lower time bound
    pub start: Option<Timestamp>,
    /// Exclusive upper time bound
    pub stop: Option<Timestamp>,
    /// Optional windowed aggregation
    pub window: Option<AggregateWindow>,
}

impl Query {
    /// Query all `value` records of a measurement
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            field: DEFAULT_FIELD.into(),
            tags: BTreeMap::new(),
            start: None,
            stop: None,
            window: None,
        }
    }

    /// Select a different field
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Require a tag value
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Restrict to `[start, stop)`
    pub fn with_range(mut self, start: Timestamp, stop: Timestamp) -> Self {
        self.start = Some(start);
        self.stop = Some(stop);
        self
    }

    /// Aggregate matching records per window
    pub fn with_window(mut self, window: AggregateWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// True when `record` passes every filter
    pub fn matches(&self, record: &Record) -> bool {
        record.measurement == self.measurement
            && record.field == self.field
            && self.start.map_or(true, |s| record.time >= s)
            && self.stop.map_or(true, |s| record.time < s)
            && self
                .tags
                .iter()
                .all(|(k, v)| record.tags.get(k).is_some_and(|rv| rv == v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(time: Timestamp, sensor: &str) -> Record {
        Record::new(time, "shellies", DEFAULT_FIELD, 1.0).with_tag("Sensor", sensor)
    }

    #[test]
    fn filters_by_tag_and_range() {
        let query = Query::new("shellies").with_tag("Sensor", "power").with_range(100, 200);

        assert!(query.matches(&record(100, "power")));
        assert!(query.matches(&record(199, "power")));
        assert!(!query.matches(&record(200, "power")));
        assert!(!query.matches(&record(150, "energy")));
        assert!(!query.matches(&Record::new(150, "shellies", "value", 1.0)));
        assert!(!query.matches(&Record::new(150, "trays", "value", 1.0).with_tag("Sensor", "power")));
    }

    #[test]
    fn windows_stamp_with_stop_and_skip_empty() {
        let window = AggregateWindow::new(10, Aggregate::Mean);
        let points = [(0, 1.0), (4, 3.0), (9, 5.0), (25, 10.0), (31, 2.0)];

        assert_eq!(window.apply(&points), vec![(10, 3.0), (30, 10.0), (40, 2.0)]);
    }

    #[test]
    fn window_reductions() {
        let points = [(0, 4.0), (1, -2.0), (2, 7.0)];
        assert_eq!(AggregateWindow::new(10, Aggregate::Min).apply(&points), vec![(10, -2.0)]);
        assert_eq!(AggregateWindow::new(10, Aggregate::Max).apply(&points), vec![(10, 7.0)]);
        assert_eq!(AggregateWindow::new(10, Aggregate::Last).apply(&points), vec![(10, 7.0)]);
        assert!(AggregateWindow::new(10, Aggregate::Mean).apply(&[]).is_empty());
    }

    #[test]
    fn zero_width_window_yields_nothing() {
        let window = AggregateWindow::new(0, Aggregate::Max);
        assert!(window.apply(&[(0, 1.0), (5, 2.0)]).is_empty());
    }
}
