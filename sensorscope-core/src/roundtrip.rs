//! Round-Trip Timing Between Repeated Labels
//!
//! ## Overview
//!
//! A tracked object passing the same sensor twice shows up as two events
//! with the same label. The round-trip time is the elapsed time between an
//! event and the next event carrying the same label.
//!
//! ## Matching
//!
//! One forward pass keeps the last timestamp seen for every label. When a
//! label reappears, the gap since its previous occurrence is recorded and
//! the entry is replaced:
//!
//! ```text
//! events:   (t=0, 1)  (t=5, 2)  (t=10, 1)  (t=20, 2)
//! last:     {1: 0}    {1:0,2:5} {1:10,2:5} {1:10,2:20}
//! records:                      (1, 10s)   (2, 15s)
//! ```
//!
//! Every event pairs with the *next* occurrence of its label, which makes the
//! pass O(n) instead of a nested scan. Sentinel events are removed before
//! matching and never reach the output.
//!
//! ## Grouping
//!
//! Records are grouped by label into count, mean and sample standard
//! deviation. The table is ordered by label.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::series::{EventSeries, Label};
use crate::stats;
use crate::time::{self, Timestamp};

/// Elapsed time between two consecutive events with the same label
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoundTrip {
    /// Shared label
    pub label: Label,
    /// Timestamp of the earlier event
    pub departed: Timestamp,
    /// Timestamp of the later event
    pub returned: Timestamp,
    /// `returned - departed` in seconds
    pub elapsed_secs: f64,
}

/// Per-label summary of round-trip durations
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoundTripStats {
    /// Number of round trips
    pub count: usize,
    /// Mean duration in seconds
    pub mean: f64,
    /// Sample standard deviation, `None` below two records
    pub std_dev: Option<f64>,
}

/// Round-trip statistics keyed by label
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoundTripTable {
    groups: BTreeMap<Label, RoundTripStats>,
}

impl RoundTripTable {
    /// Group records by label
    ///
    /// An empty record slice yields an empty table.
    pub fn from_records(records: &[RoundTrip]) -> Self {
        let mut durations: BTreeMap<Label, Vec<f64>> = BTreeMap::new();
        for record in records {
            durations.entry(record.label).or_default().push(record.elapsed_secs);
        }

        let groups = durations
            .into_iter()
            .filter_map(|(label, secs)| {
                let mean = stats::mean(&secs)?;
                Some((
                    label,
                    RoundTripStats {
                        count: secs.len(),
                        mean,
                        std_dev: stats::sample_std_dev(&secs),
                    },
                ))
            })
            .collect();

        Self { groups }
    }

    /// Statistics for one label
    pub fn get(&self, label: Label) -> Option<&RoundTripStats> {
        self.groups.get(&label)
    }

    /// Number of labels with at least one round trip
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when no label repeated
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Labels and their statistics in ascending label order
    pub fn iter(&self) -> impl Iterator<Item = (Label, &RoundTripStats)> + '_ {
        self.groups.iter().map(|(label, stats)| (*label, stats))
    }
}

/// Pairs each event with the next event of the same label
#[derive(Debug, Default)]
pub struct RoundTripMatcher {
    last_seen: BTreeMap<Label, Timestamp>,
}

impl RoundTripMatcher {
    /// Create a matcher with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Match every event in `series`, dropping sentinel events first
    pub fn match_series(mut self, series: &EventSeries) -> Vec<RoundTrip> {
        let filtered = series.without_sentinel();
        if filtered.len() < series.len() {
            log_debug!(
                "dropped {} sentinel events before matching",
                series.len() - filtered.len()
            );
        }

        let mut records = Vec::new();
        for event in filtered.events() {
            if let Some(departed) = self.last_seen.insert(event.label, event.timestamp) {
                records.push(RoundTrip {
                    label: event.label,
                    departed,
                    returned: event.timestamp,
                    elapsed_secs: time::elapsed_secs(departed, event.timestamp),
                });
            }
        }

        log_debug!(
            "matched {} round trips across {} labels",
            records.len(),
            self.last_seen.len()
        );
        records
    }
}

/// Match `series` and group the result in one call
pub fn round_trip_table(series: &EventSeries) -> (Vec<RoundTrip>, RoundTripTable) {
    let records = RoundTripMatcher::new().match_series(series);
    let table = RoundTripTable::from_records(&records);
    (records, table)
}
