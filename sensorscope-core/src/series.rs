//! Sample and event series
//!
//! Both series types are ordered by timestamp (non-decreasing, not
//! necessarily evenly spaced) and immutable once built. Constructors check the
//! ordering and reject non-finite values so the analyses never see coerced
//! data.
//!
//! ```rust
//! use sensorscope_core::series::{Event, EventSeries, Sample, SampleSeries};
//!
//! let power = SampleSeries::new(vec![
//!     Sample::new(0, 12.0),
//!     Sample::new(600_000, 12.5),
//! ]).unwrap();
//! assert_eq!(power.len(), 2);
//!
//! let trays = EventSeries::new(vec![Event::new(0, 3), Event::new(5_000, 0)]).unwrap();
//! assert_eq!(trays.without_sentinel().len(), 1);
//! ```

use alloc::vec::Vec;

use crate::errors::{AnalysisError, AnalysisResult};
use crate::time::Timestamp;

/// Discrete event label (e.g. a tray identifier)
pub type Label = u32;

/// Reserved label meaning "no detection"
pub const SENTINEL_LABEL: Label = 0;

/// A single numeric reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// When the reading was taken
    pub timestamp: Timestamp,
    /// Measured value
    pub value: f64,
}

impl Sample {
    /// Create a sample
    pub const fn new(timestamp: Timestamp, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// A single labelled event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// When the event was observed
    pub timestamp: Timestamp,
    /// Event label, `SENTINEL_LABEL` for "nothing seen"
    pub label: Label,
}

impl Event {
    /// Create an event
    pub const fn new(timestamp: Timestamp, label: Label) -> Self {
        Self { timestamp, label }
    }

    /// True for the "no event" sentinel
    pub fn is_sentinel(&self) -> bool {
        self.label == SENTINEL_LABEL
    }
}

/// Ordered numeric time series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSeries {
    samples: Vec<Sample>,
}

impl SampleSeries {
    /// Build a series, checking ordering and finiteness
    pub fn new(samples: Vec<Sample>) -> AnalysisResult<Self> {
        for (index, sample) in samples.iter().enumerate() {
            if !sample.value.is_finite() {
                return Err(AnalysisError::InvalidValue { index });
            }
        }
        check_ordered(samples.iter().map(|s| s.timestamp))?;

        Ok(Self { samples })
    }

    /// Build an evenly spaced series from raw values
    pub fn from_values(start: Timestamp, interval_ms: u64, values: &[f64]) -> AnalysisResult<Self> {
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, &value)| Sample::new(start + i as u64 * interval_ms, value))
            .collect();
        Self::new(samples)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples in order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Sample at `index`
    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    /// Values in order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }

    /// Timestamps in order
    pub fn timestamps(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.samples.iter().map(|s| s.timestamp)
    }
}

/// Ordered labelled event series
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSeries {
    events: Vec<Event>,
}

impl EventSeries {
    /// Build a series, checking ordering
    pub fn new(events: Vec<Event>) -> AnalysisResult<Self> {
        check_ordered(events.iter().map(|e| e.timestamp))?;
        Ok(Self { events })
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when the series holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Copy of the series with every sentinel event removed
    pub fn without_sentinel(&self) -> Self {
        Self {
            events: self.events.iter().copied().filter(|e| !e.is_sentinel()).collect(),
        }
    }
}

fn check_ordered(timestamps: impl Iterator<Item = Timestamp>) -> AnalysisResult<()> {
    let mut previous: Option<Timestamp> = None;
    for (index, ts) in timestamps.enumerate() {
        if previous.is_some_and(|p| ts < p) {
            return Err(AnalysisError::Unordered { index });
        }
        previous = Some(ts);
    }
    Ok(())
}
