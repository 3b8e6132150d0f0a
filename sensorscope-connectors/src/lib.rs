//! Data Sources and Rendering Sinks for SensorScope
//!
//! ## Overview
//!
//! The analysis core only sees in-memory series. This crate sits on either
//! side of it:
//!
//! ```text
//! CSV export ──► CsvSource ──► SampleSeries / EventSeries ──► core ──► Figure ──► RenderSink
//!                   │                                                               │
//!               MemorySource                                              JsonSink / MemorySink
//! ```
//!
//! ## Sources
//!
//! A `SeriesSource` answers a logical `Query`: measurement, field, tag
//! filters, time range and an optional windowed aggregation. `MemorySource`
//! evaluates queries over records held in memory; `CsvSource` loads the
//! annotated CSV a time-series database exports and delegates to it.
//!
//! Malformed upstream data (unparsable timestamps, non-numeric values,
//! fractional labels) fails the whole fetch. Nothing is skipped or coerced.
//!
//! ## Sinks
//!
//! A `RenderSink` receives a finished `Figure`. `JsonSink` serializes it for
//! an external plotting tool; `MemorySink` keeps it for inspection in tests.
//!
//! ## Example Usage
//!
//! ```rust
//! use sensorscope_connectors::{CsvSource, Query, SeriesSource};
//! use sensorscope_core::StepDetector;
//!
//! let csv = "\
//! _time,_value,_field,_measurement,Sensor
//! 2023-03-01T10:00:00Z,4.0,value,shellies,power
//! 2023-03-01T10:10:00Z,4.0,value,shellies,power
//! 2023-03-01T10:20:00Z,90.0,value,shellies,power
//! 2023-03-01T10:30:00Z,90.0,value,shellies,power
//! ";
//! let mut source = CsvSource::parse_str(csv)?;
//! let query = Query::new("shellies").with_tag("Sensor", "power");
//! let power = source.samples(&query)?;
//!
//! let step = StepDetector::default().detect(&power)?;
//! assert_eq!(step.index, 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod csv;
pub mod query;
pub mod sink;
pub mod source;

// Re-export common types
pub use csv::{CsvSource, CsvStats};
pub use query::{Aggregate, AggregateWindow, Query};
pub use sink::{JsonSink, MemorySink, RenderSink};
pub use source::{MemorySource, Record, SeriesSource};

use sensorscope_core::AnalysisError;
use thiserror::Error;

/// Failures fetching series from upstream
#[derive(Debug, Error)]
pub enum SourceError {
    /// Underlying reader failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Export could not be parsed
    #[error("Format error on line {line}: {reason}")]
    Format {
        /// 1-based line number in the export
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// Query cannot be evaluated
    #[error("Invalid query: {reason}")]
    InvalidQuery {
        /// What was wrong with it
        reason: String,
    },

    /// Event value is not a non-negative integer
    #[error("Invalid label value {value}")]
    InvalidLabel {
        /// Raw value as stored
        value: f64,
    },

    /// Data violated a series invariant
    #[error("Invalid series: {0}")]
    Series(#[from] AnalysisError),
}

/// Failures handing a figure to a sink
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Figure could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
