//! Render-ready figure model
//!
//! The analyses return numbers; this module turns them into a `Figure` that a
//! rendering sink can draw without knowing anything about step detection.
//! Display constants (response scale, annotation offset) live in
//! `DisplayConfig` and are applied here only, after detection, so they can
//! never move the detected index.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::config::EnvConfig;
use crate::errors::{ConfigError, ConfigResult};
use crate::roundtrip::RoundTrip;
use crate::series::{Label, SampleSeries};
use crate::step::StepDetection;
use crate::time::{self, Timestamp};

/// Response divisor matching the 10-minute aggregation window upstream
pub const DEFAULT_RESPONSE_SCALE: f64 = 10.0;

/// Annotation offset used for the sensor-tray recordings
pub const TRAY_ANNOTATION_OFFSET: usize = 620;

/// Label format for the step time
pub const STEP_LABEL_FORMAT: &str = "%m.%d. %H:%M Uhr";

/// Tick format for the date axis
pub const DATE_AXIS_FORMAT: &str = "%d.%m.";

const SCALE_KEY: &str = "STEP_RESPONSE_SCALE";
const OFFSET_KEY: &str = "STEP_ANNOTATION_OFFSET";

const ROUND_TRIP_PALETTE: [&str; 6] = [
    "steelblue",
    "darkorange",
    "seagreen",
    "crimson",
    "mediumpurple",
    "saddlebrown",
];

/// Cosmetic settings for plotting detection results
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayConfig {
    /// Divisor applied to the response before plotting
    pub response_scale: f64,
    /// Samples to step back from the detected index when placing the label
    pub annotation_offset: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            response_scale: DEFAULT_RESPONSE_SCALE,
            annotation_offset: 0,
        }
    }
}

impl DisplayConfig {
    /// Set the response divisor
    pub fn with_response_scale(mut self, scale: f64) -> Self {
        self.response_scale = scale;
        self
    }

    /// Set the label offset in samples
    pub fn with_annotation_offset(mut self, offset: usize) -> Self {
        self.annotation_offset = offset;
        self
    }

    /// Read overrides from `STEP_RESPONSE_SCALE` / `STEP_ANNOTATION_OFFSET`
    ///
    /// Absent keys keep the defaults; present keys must parse.
    pub fn from_env(env: &EnvConfig) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(scale) = env.get_parsed::<f64>(SCALE_KEY)? {
            if !scale.is_finite() || scale == 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: SCALE_KEY.into(),
                    value: env.get(SCALE_KEY).unwrap_or_default().into(),
                });
            }
            config.response_scale = scale;
        }
        if let Some(offset) = env.get_parsed::<usize>(OFFSET_KEY)? {
            config.annotation_offset = offset;
        }

        Ok(config)
    }

    fn scale(&self, value: f64) -> f64 {
        value / self.response_scale
    }
}

/// Which y axis a trace is drawn against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Axis {
    /// Left axis
    Primary,
    /// Right axis sharing the same x axis
    Secondary,
}

/// How a trace is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TraceStyle {
    /// Connected line
    Line,
    /// Unconnected points
    Scatter,
}

/// One (x, y) sequence
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Trace {
    /// Legend entry
    pub name: String,
    /// Color name understood by the renderer
    pub color: String,
    /// Axis the y values belong to
    pub axis: Axis,
    /// Drawing style
    pub style: TraceStyle,
    /// Points as (timestamp, y)
    pub points: Vec<(Timestamp, f64)>,
}

/// Vertical segment at a fixed time
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Marker {
    /// Time of the segment
    pub x: Timestamp,
    /// Start height
    pub y_from: f64,
    /// End height
    pub y_to: f64,
    /// Color name
    pub color: String,
}

/// Text placed in data coordinates
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Annotation {
    /// Anchor time
    pub x: Timestamp,
    /// Anchor height
    pub y: f64,
    /// Label text
    pub text: String,
    /// Color name
    pub color: String,
}

/// Everything a rendering sink needs to draw one plot
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Figure {
    /// Plot title
    pub title: String,
    /// strftime pattern for the time axis ticks
    pub time_format: String,
    /// Data sequences
    pub traces: Vec<Trace>,
    /// Vertical markers
    pub markers: Vec<Marker>,
    /// Text labels
    pub annotations: Vec<Annotation>,
}

impl Figure {
    /// Empty figure with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            time_format: DATE_AXIS_FORMAT.into(),
            traces: Vec::new(),
            markers: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Find a trace by name
    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name == name)
    }
}

/// Plot of the scaled step response over the raw series, with the step marked
///
/// The response has one more entry than the series; the last entry is
/// dropped so both traces share the same timestamps.
pub fn step_figure(
    series: &SampleSeries,
    detection: &StepDetection,
    config: &DisplayConfig,
) -> Figure {
    let mut figure = Figure::new("Step detection");

    figure.traces.push(Trace {
        name: "response".into(),
        color: "salmon".into(),
        axis: Axis::Primary,
        style: TraceStyle::Line,
        points: series
            .timestamps()
            .zip(detection.response.iter())
            .map(|(t, r)| (t, config.scale(*r)))
            .collect(),
    });
    figure.traces.push(Trace {
        name: "value".into(),
        color: "yellowgreen".into(),
        axis: Axis::Secondary,
        style: TraceStyle::Line,
        points: series.samples().iter().map(|s| (s.timestamp, s.value)).collect(),
    });

    let peak = config.scale(detection.peak);
    figure.markers.push(Marker {
        x: detection.timestamp,
        y_from: peak,
        y_to: 0.0,
        color: "red".into(),
    });

    let label_index = detection
        .index
        .saturating_sub(config.annotation_offset)
        .min(series.len().saturating_sub(1));
    let label_x = series.get(label_index).map_or(detection.timestamp, |s| s.timestamp);
    let text = time::format(detection.timestamp, STEP_LABEL_FORMAT)
        .unwrap_or_else(|| format!("{} ms", detection.timestamp));
    figure.annotations.push(Annotation {
        x: label_x,
        y: peak,
        text,
        color: "red".into(),
    });

    figure
}

/// Scatter of round-trip durations over time, one trace per label
pub fn round_trip_figure(records: &[RoundTrip]) -> Figure {
    let mut figure = Figure::new("Round-trip times");
    let mut labels: Vec<Label> = records.iter().map(|r| r.label).collect();
    labels.sort_unstable();
    labels.dedup();

    for (i, label) in labels.into_iter().enumerate() {
        figure.traces.push(Trace {
            name: format!("label {}", label),
            color: ROUND_TRIP_PALETTE[i % ROUND_TRIP_PALETTE.len()].into(),
            axis: Axis::Primary,
            style: TraceStyle::Scatter,
            points: records
                .iter()
                .filter(|r| r.label == label)
                .map(|r| (r.returned, r.elapsed_secs))
                .collect(),
        });
    }
    figure
}
