//! Series sources
//!
//! `SeriesSource` is the seam between the analyses and wherever the data
//! lives. Records come back sorted by time; the core never re-sorts.

use std::collections::BTreeMap;

use log::debug;
use sensorscope_core::{
    AnalysisError, Event, EventSeries, Label, Sample, SampleSeries, Timestamp,
};

use crate::query::Query;
use crate::SourceError;

/// One stored point in long format
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Point time
    pub time: Timestamp,
    /// Measurement name
    pub measurement: String,
    /// Field name
    pub field: String,
    /// Numeric value
    pub value: f64,
    /// Tag columns
    pub tags: BTreeMap<String, String>,
}

impl Record {
    /// Record without tags
    pub fn new(
        time: Timestamp,
        measurement: impl Into<String>,
        field: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            time,
            measurement: measurement.into(),
            field: field.into(),
            value,
            tags: BTreeMap::new(),
        }
    }

    /// Attach a tag
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// Anything that can answer series queries
pub trait SeriesSource {
    /// Error type for failed fetches
    type Error;

    /// Numeric series for `query`
    fn samples(&mut self, query: &Query) -> Result<SampleSeries, Self::Error>;

    /// Labelled event series for `query`
    ///
    /// Values must be non-negative integers; the sentinel label is kept so
    /// the caller sees exactly what was recorded.
    fn events(&mut self, query: &Query) -> Result<EventSeries, Self::Error>;
}

/// Source backed by records held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<Record>,
}

impl MemorySource {
    /// Source over `records`, ordered by time (stable for equal times)
    pub fn new(mut records: Vec<Record>) -> Self {
        records.sort_by_key(|r| r.time);
        Self { records }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All stored records
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Matching points, aggregated if the query asks for it
    ///
    /// Every matched value must be finite before any window reduces it.
    fn points(&self, query: &Query) -> Result<Vec<(Timestamp, f64)>, SourceError> {
        let points: Vec<(Timestamp, f64)> = self
            .records
            .iter()
            .filter(|r| query.matches(r))
            .map(|r| (r.time, r.value))
            .collect();
        if let Some(index) = points.iter().position(|(_, v)| !v.is_finite()) {
            return Err(AnalysisError::InvalidValue { index }.into());
        }

        let matched = points.len();
        let points = match &query.window {
            Some(window) if window.every_ms == 0 => {
                return Err(SourceError::InvalidQuery {
                    reason: "aggregation window must be wider than 0 ms".into(),
                });
            }
            Some(window) => window.apply(&points),
            None => points,
        };
        debug!(
            "query {}/{}: {} records matched, {} points returned",
            query.measurement,
            query.field,
            matched,
            points.len()
        );
        Ok(points)
    }
}

impl SeriesSource for MemorySource {
    type Error = SourceError;

    fn samples(&mut self, query: &Query) -> Result<SampleSeries, SourceError> {
        let samples = self
            .points(query)?
            .into_iter()
            .map(|(t, v)| Sample::new(t, v))
            .collect();
        Ok(SampleSeries::new(samples)?)
    }

    fn events(&mut self, query: &Query) -> Result<EventSeries, SourceError> {
        let events = self
            .points(query)?
            .into_iter()
            .map(|(t, v)| to_label(v).map(|label| Event::new(t, label)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EventSeries::new(events)?)
    }
}

fn to_label(value: f64) -> Result<Label, SourceError> {
    if value.fract() != 0.0 || value < 0.0 || value > Label::MAX as f64 {
        return Err(SourceError::InvalidLabel { value });
    }
    Ok(value as Label)
}
