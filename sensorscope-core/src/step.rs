//! Step Detection by Matched Filtering
//!
//! ## Overview
//!
//! Locates the single most probable rising step (a load switching on) in a
//! power series. The series is mean-centered to remove the DC level, then
//! correlated against an ideal step: N ones followed by N negative ones.
//! The response peaks where the level change starts.
//!
//! ## Algorithm
//!
//! ```text
//! x        = values - mean(values)
//! response = convolve_valid(x, [1; N] ++ [-1; N])     // N + 1 entries
//! index    = argmax(response)                         // first maximum wins
//! time     = timestamps[min(index, N - 1)]
//! ```
//!
//! The response has one more entry than the input. The last entry can only
//! win on a series without a rising edge, where it is rounding noise; its
//! timestamp is clamped to the last sample.
//!
//! ## Polarity
//!
//! With this kernel orientation a rising step gives a peak and a falling step
//! gives a trough. The default `StepPolarity::Rising` takes the plain argmax.
//! `Falling` takes the argmax of the negated response and `Either` the
//! argmax of its magnitude; the reported `peak` is always the raw response
//! value at the chosen index.
//!
//! ## Edge Cases
//!
//! - Fewer than two samples: `AnalysisError::InvalidInput`
//! - Flat series: all-zero response, index 0
//!
//! ## Example
//!
//! ```rust
//! use sensorscope_core::{SampleSeries, StepDetector};
//!
//! let power = SampleSeries::from_values(0, 600_000, &[5.0, 5.0, 5.0, 40.0, 40.0, 40.0]).unwrap();
//! let detection = StepDetector::default().detect(&power).unwrap();
//! assert_eq!(detection.index, 3);
//! assert_eq!(detection.timestamp, 1_800_000);
//! ```

use alloc::vec::Vec;

use crate::errors::{AnalysisError, AnalysisResult};
use crate::series::SampleSeries;
use crate::signal;
use crate::time::Timestamp;

/// Minimum series length the detector accepts
pub const MIN_SAMPLES: usize = 2;

/// Outcome of a step detection
#[derive(Debug, Clone, PartialEq)]
pub struct StepDetection {
    /// Index of the maximum response value
    pub index: usize,
    /// Timestamp of the sample at `index` (clamped to the last sample)
    pub timestamp: Timestamp,
    /// Response value at `index`
    pub peak: f64,
    /// Full matched-filter response, `N + 1` entries
    pub response: Vec<f64>,
}

/// Which edge direction the detector looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepPolarity {
    /// Level increases (a load switching on)
    #[default]
    Rising,
    /// Level decreases
    Falling,
    /// Largest change in either direction
    Either,
}

/// Matched-filter step detector
#[derive(Debug, Clone, Copy, Default)]
pub struct StepDetector {
    polarity: StepPolarity,
}

impl StepDetector {
    /// Create a detector for rising steps
    pub const fn new() -> Self {
        Self {
            polarity: StepPolarity::Rising,
        }
    }

    /// Set the edge direction
    pub fn with_polarity(mut self, polarity: StepPolarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Configured edge direction
    pub fn polarity(&self) -> StepPolarity {
        self.polarity
    }

    /// Find the most probable step of the configured polarity in `series`
    pub fn detect(&self, series: &SampleSeries) -> AnalysisResult<StepDetection> {
        let n = series.len();
        if n < MIN_SAMPLES {
            return Err(AnalysisError::InvalidInput {
                required: MIN_SAMPLES,
                available: n,
            });
        }

        let values: Vec<f64> = series.values().collect();
        let centered = signal::center(&values);
        let response = signal::step_response(&centered);

        let index = match self.polarity {
            StepPolarity::Rising => signal::argmax(&response),
            StepPolarity::Falling => {
                signal::argmax(&response.iter().map(|r| -r).collect::<Vec<_>>())
            }
            StepPolarity::Either => {
                signal::argmax(&response.iter().map(|r| libm::fabs(*r)).collect::<Vec<_>>())
            }
        }
        .ok_or(AnalysisError::InvalidInput {
            required: MIN_SAMPLES,
            available: n,
        })?;
        let timestamp = series
            .get(index.min(n - 1))
            .map(|s| s.timestamp)
            .ok_or(AnalysisError::InvalidInput {
                required: MIN_SAMPLES,
                available: n,
            })?;
        let peak = response[index];

        log_debug!(
            "step detected at index {} of {} (t={}, peak={})",
            index, n, timestamp, peak
        );

        Ok(StepDetection {
            index,
            timestamp,
            peak,
            response,
        })
    }
}

/// Shorthand for `StepDetector::default().detect(series)`
pub fn detect_step(series: &SampleSeries) -> AnalysisResult<StepDetection> {
    StepDetector::new().detect(series)
}
