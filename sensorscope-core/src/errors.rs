//! Error Types for Series Analysis and Configuration
//!
//! ## Error Categories
//!
//! ### Analysis Failures
//! - `InvalidInput`: series too short for the requested analysis (the step
//!   detector needs at least two samples)
//!
//! ### Malformed Upstream Data
//! - `InvalidValue`: a sample value is NaN or infinite
//! - `Unordered`: a timestamp goes backwards
//!
//! Malformed data is never coerced. The series constructors reject it and the
//! caller decides whether the whole run aborts (it normally does).
//!
//! ### Configuration
//! - `MissingKey`: a required key is absent from the key-value source
//! - `Malformed`: a non-comment line has no `=`
//! - `InvalidValue`: a key is present but does not parse as the wanted type
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use sensorscope_core::{AnalysisError, SampleSeries, StepDetector};
//!
//! let series = SampleSeries::from_values(0, 1_000, &[1.0]).unwrap();
//! match StepDetector::default().detect(&series) {
//!     Ok(detection) => println!("step at {}", detection.index),
//!     Err(AnalysisError::InvalidInput { required, available }) => {
//!         println!("need {} samples, have {}", required, available);
//!     }
//!     Err(e) => println!("analysis failed: {}", e),
//! }
//! ```

use alloc::string::String;

use thiserror_no_std::Error;

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Result type for configuration lookups
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Analysis errors - small and `Copy` so they can be returned from hot loops
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisError {
    /// Series is empty or shorter than the algorithm needs
    #[error("Invalid input: need at least {required} samples, have {available}")]
    InvalidInput {
        /// Minimum number of samples for the analysis
        required: usize,
        /// Actual number of samples supplied
        available: usize,
    },

    /// Value makes no numeric sense (NaN, infinity)
    #[error("Invalid value at index {index}: not a finite number")]
    InvalidValue {
        /// Position of the offending record
        index: usize,
    },

    /// Timestamp smaller than its predecessor
    #[error("Timestamp at index {index} precedes the previous record")]
    Unordered {
        /// Position of the offending record
        index: usize,
    },
}

/// Errors raised while reading the key-value configuration source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required key absent
    #[error("Missing configuration key: {key}")]
    MissingKey {
        /// Name of the key that was looked up
        key: String,
    },

    /// Line is neither a comment, blank, nor `KEY=VALUE`
    #[error("Malformed configuration line {line}")]
    Malformed {
        /// 1-based line number
        line: usize,
    },

    /// Key present but its value has the wrong shape
    #[error("Invalid value for configuration key {key}: {value}")]
    InvalidValue {
        /// Name of the key
        key: String,
        /// Raw value as written in the source
        value: String,
    },

    /// Source could not be read
    #[error("Cannot read configuration: {reason}")]
    Io {
        /// Underlying I/O error message
        reason: String,
    },
}
