//! Round-Trip Example
//!
//! Measures how long each tray takes to come back to the reader in a
//! logistics export and prints per-tray statistics.
//!
//! ## What You'll Learn
//!
//! - Fetching a labelled event series
//! - Pairing consecutive sightings of the same label
//! - Grouping round trips into a statistics table
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_round_trips -- trays.csv
//! ```

use std::env;
use std::io;

use anyhow::{bail, Context, Result};
use sensorscope_connectors::{CsvSource, JsonSink, Query, RenderSink, SeriesSource};
use sensorscope_core::{round_trip_figure, round_trip_table};

fn main() -> Result<()> {
    env_logger::init();

    let Some(export) = env::args().nth(1) else {
        bail!("usage: 02_round_trips <export.csv>");
    };

    let mut source = CsvSource::open(&export).with_context(|| format!("loading {}", export))?;
    let events = source.events(&Query::new("trays").with_tag("Sensor", "reader"))?;
    let (records, table) = round_trip_table(&events);

    eprintln!("{} events, {} round trips", events.len(), records.len());
    eprintln!("{:>6} {:>6} {:>10} {:>10}", "label", "count", "mean [s]", "std [s]");
    for (label, stats) in table.iter() {
        let std_dev = stats
            .std_dev
            .map_or_else(|| "-".to_string(), |s| format!("{:.1}", s));
        eprintln!("{:>6} {:>6} {:>10.1} {:>10}", label, stats.count, stats.mean, std_dev);
    }

    let mut sink = JsonSink::new(io::stdout().lock());
    sink.render(&round_trip_figure(&records))?;
    Ok(())
}
