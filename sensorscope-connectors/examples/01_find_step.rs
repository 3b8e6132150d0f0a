//! Step Detection Example
//!
//! Finds the moment a heater switched on in a smart-plug power export and
//! renders the step-response figure as JSON.
//!
//! ## What You'll Learn
//!
//! - Loading an annotated CSV export
//! - Querying a tagged series with windowed aggregation
//! - Detecting a level shift
//! - Overriding display settings from an environment file
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_find_step -- power.csv [environment.env]
//! ```

use std::env;
use std::io;

use anyhow::{bail, Context, Result};
use log::info;
use sensorscope_connectors::{
    Aggregate, AggregateWindow, CsvSource, JsonSink, Query, RenderSink, SeriesSource,
};
use sensorscope_core::{step_figure, time, DisplayConfig, EnvConfig, StepDetector};

const TEN_MINUTES_MS: u64 = 600_000;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(export) = args.next() else {
        bail!("usage: 01_find_step <export.csv> [environment.env]");
    };

    let display = match args.next() {
        Some(path) => {
            let env = EnvConfig::from_path(&path).with_context(|| format!("reading {}", path))?;
            DisplayConfig::from_env(&env)?
        }
        None => DisplayConfig::default(),
    };

    let mut source = CsvSource::open(&export).with_context(|| format!("loading {}", export))?;
    let query = Query::new("shellies")
        .with_tag("Sensor", "power")
        .with_window(AggregateWindow::new(TEN_MINUTES_MS, Aggregate::Mean));
    let power = source.samples(&query)?;
    info!("{} windowed power samples", power.len());

    let detection = StepDetector::default().detect(&power)?;
    let when = time::format(detection.timestamp, "%Y-%m-%d %H:%M UTC")
        .unwrap_or_else(|| detection.timestamp.to_string());
    eprintln!(
        "Step at sample {} ({}), response peak {:.1}",
        detection.index, when, detection.peak
    );

    let mut sink = JsonSink::new(io::stdout().lock()).pretty();
    sink.render(&step_figure(&power, &detection, &display))?;
    Ok(())
}
