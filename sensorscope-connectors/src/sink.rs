//! Rendering sinks
//!
//! A sink takes a finished `Figure` and presents it somewhere. Nothing flows
//! back to the analysis.

use std::convert::Infallible;
use std::io::Write;

use log::debug;
use sensorscope_core::Figure;

use crate::SinkError;

/// Anything that can present a figure
pub trait RenderSink {
    /// Error type for failed renders
    type Error;

    /// Present one figure
    fn render(&mut self, figure: &Figure) -> Result<(), Self::Error>;
}

/// Writes each figure as one JSON document followed by a newline
pub struct JsonSink<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonSink<W> {
    /// Compact output, one figure per line
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
        }
    }

    /// Indented output
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderSink for JsonSink<W> {
    type Error = SinkError;

    fn render(&mut self, figure: &Figure) -> Result<(), SinkError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, figure)?;
        } else {
            serde_json::to_writer(&mut self.writer, figure)?;
        }
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        debug!("rendered figure {:?} with {} traces", figure.title, figure.traces.len());
        Ok(())
    }
}

/// Keeps rendered figures in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    figures: Vec<Figure>,
}

impl MemorySink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Figures rendered so far
    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }
}

impl RenderSink for MemorySink {
    type Error = Infallible;

    fn render(&mut self, figure: &Figure) -> Result<(), Infallible> {
        self.figures.push(figure.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensorscope_core::{step_figure, DisplayConfig, SampleSeries, StepDetector};

    fn figure() -> Figure {
        let series = SampleSeries::from_values(0, 600_000, &[1.0, 1.0, 6.0, 6.0]).unwrap();
        let detection = StepDetector::default().detect(&series).unwrap();
        step_figure(&series, &detection, &DisplayConfig::default())
    }

    #[test]
    fn json_sink_writes_one_document_per_line() {
        let mut sink = JsonSink::new(Vec::new());
        sink.render(&figure()).unwrap();
        sink.render(&figure()).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let doc: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(doc["title"], "Step detection");
        assert_eq!(doc["traces"][0]["name"], "response");
        assert_eq!(doc["traces"][1]["axis"], "secondary");
        assert_eq!(doc["markers"][0]["x"], 1_200_000);
    }

    #[test]
    fn memory_sink_keeps_figures() {
        let mut sink = MemorySink::new();
        sink.render(&figure()).unwrap();
        assert_eq!(sink.figures().len(), 1);
        assert_eq!(sink.figures()[0].annotations.len(), 1);
    }
}
