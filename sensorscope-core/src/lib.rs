//! Analysis core for SensorScope
//!
//! Pure numeric transforms over sensor time series that have already been
//! fetched from a time-series database:
//!
//! - **Step detection**: matched filtering of a power series against an ideal
//!   step to locate the moment a load switched on.
//! - **Round-trip timing**: elapsed time between repeated sightings of the
//!   same label (e.g. a tray passing a sensor twice), grouped per label.
//!
//! Everything runs synchronously on in-memory data. Fetching, configuration
//! files and rendering are handled by `sensorscope-connectors`.
//!
//! ```rust
//! use sensorscope_core::{round_trip_table, Event, EventSeries, SampleSeries, StepDetector};
//!
//! let power = SampleSeries::from_values(0, 600_000, &[3.0, 3.0, 3.0, 18.0, 18.0]).unwrap();
//! let step = StepDetector::default().detect(&power).unwrap();
//! assert_eq!(step.index, 3);
//!
//! let trays = EventSeries::new(vec![
//!     Event::new(0, 1),
//!     Event::new(5_000, 2),
//!     Event::new(10_000, 1),
//!     Event::new(20_000, 2),
//! ]).unwrap();
//! let (_, table) = round_trip_table(&trays);
//! assert_eq!(table.get(2).unwrap().mean, 15.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

// Macros for optional logging
#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

pub mod config;
pub mod display;
pub mod errors;
pub mod roundtrip;
pub mod series;
pub mod signal;
pub mod stats;
pub mod step;
pub mod time;

// Public API
pub use config::EnvConfig;
pub use display::{round_trip_figure, step_figure, DisplayConfig, Figure};
pub use errors::{AnalysisError, AnalysisResult, ConfigError, ConfigResult};
pub use roundtrip::{round_trip_table, RoundTrip, RoundTripMatcher, RoundTripStats, RoundTripTable};
pub use series::{Event, EventSeries, Label, Sample, SampleSeries, SENTINEL_LABEL};
pub use step::{detect_step, StepDetection, StepDetector, StepPolarity};
pub use time::Timestamp;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
