//! Annotated CSV exports
//!
//! Reads the long-format CSV a time-series database writes when a query
//! result is exported:
//!
//! ```csv
//! #group,false,false,true,true,false,false,true,true,true
//! #datatype,string,long,dateTime:RFC3339,dateTime:RFC3339,dateTime:RFC3339,double,string,string,string
//! #default,_result,,,,,,,,
//! ,result,table,_start,_stop,_time,_value,_field,_measurement,Sensor
//! ,,0,2023-03-01T00:00:00Z,2023-03-02T00:00:00Z,2023-03-01T10:00:00Z,41.7,value,shellies,power
//! ```
//!
//! ## Layout Rules
//!
//! - Lines starting with `#` are annotations and are skipped
//! - The first other line of a table is its header
//! - A blank line ends the table; the next table brings its own header
//! - `_time` and `_value` columns are required; `_measurement` defaults to
//!   empty and `_field` to `value`
//! - Every column that is not a system column becomes a tag
//!
//! Values are split on commas without quote handling, which covers numeric
//! exports and plain tag values. Any row that cannot be read fails the load
//! with its line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};
use sensorscope_core::{time, EventSeries, SampleSeries};

use crate::query::{Query, DEFAULT_FIELD};
use crate::source::{MemorySource, Record, SeriesSource};
use crate::SourceError;

const SYSTEM_COLUMNS: [&str; 9] = [
    "",
    "result",
    "table",
    "_start",
    "_stop",
    "_time",
    "_value",
    "_field",
    "_measurement",
];

/// Statistics for a CSV load
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CsvStats {
    /// Total lines read
    pub lines_processed: usize,
    /// Annotation lines skipped
    pub annotation_lines: usize,
    /// Tables (header rows) seen
    pub tables: usize,
    /// Records parsed
    pub records_read: usize,
}

/// Column positions of one table
struct Header {
    columns: Vec<String>,
    time: usize,
    value: usize,
    field: Option<usize>,
    measurement: Option<usize>,
    tags: Vec<usize>,
}

impl Header {
    fn parse(line: &str, line_no: usize) -> Result<Self, SourceError> {
        let columns: Vec<String> = split_row(line).map(str::to_string).collect();
        let find = |name: &str| columns.iter().position(|c| c == name);

        let time = find("_time").ok_or_else(|| format_error(line_no, "missing _time column"))?;
        let value = find("_value").ok_or_else(|| format_error(line_no, "missing _value column"))?;
        let tags = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !SYSTEM_COLUMNS.contains(&c.as_str()))
            .map(|(i, _)| i)
            .collect();

        Ok(Self {
            time,
            value,
            field: find("_field"),
            measurement: find("_measurement"),
            tags,
            columns,
        })
    }

    fn record(&self, line: &str, line_no: usize) -> Result<Record, SourceError> {
        let cells: Vec<&str> = split_row(line).collect();
        if cells.len() != self.columns.len() {
            return Err(format_error(
                line_no,
                &format!("expected {} columns, found {}", self.columns.len(), cells.len()),
            ));
        }

        let time = time::parse_rfc3339(cells[self.time])
            .ok_or_else(|| format_error(line_no, &format!("invalid timestamp {:?}", cells[self.time])))?;
        let value: f64 = cells[self.value]
            .parse()
            .map_err(|_| format_error(line_no, &format!("invalid value {:?}", cells[self.value])))?;
        if !value.is_finite() {
            return Err(format_error(line_no, "non-finite value"));
        }

        let measurement = self.measurement.map_or("", |i| cells[i]);
        let field = self.field.map_or(DEFAULT_FIELD, |i| cells[i]);
        let mut record = Record::new(time, measurement, field, value);
        for &i in &self.tags {
            record = record.with_tag(self.columns[i].as_str(), cells[i]);
        }
        Ok(record)
    }
}

/// Series source over an annotated CSV export
///
/// The whole export is parsed up front; queries then run in memory.
///
/// ## Example
///
/// ```rust,no_run
/// use sensorscope_connectors::{CsvSource, Query, SeriesSource};
///
/// let mut source = CsvSource::open("exports/adler_tasks.csv")?;
/// let trays = source.events(&Query::new("trays").with_tag("Sensor", "reader"))?;
/// # Ok::<(), sensorscope_connectors::SourceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    inner: MemorySource,
    stats: CsvStats,
}

impl CsvSource {
    /// Load an export from disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let source = Self::from_reader(BufReader::new(File::open(path)?))?;
        info!(
            "loaded {} records in {} tables from {}",
            source.stats.records_read,
            source.stats.tables,
            path.display()
        );
        Ok(source)
    }

    /// Load an export from text
    pub fn parse_str(text: &str) -> Result<Self, SourceError> {
        Self::from_reader(text.as_bytes())
    }

    /// Load an export from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, SourceError> {
        let mut stats = CsvStats::default();
        let mut records = Vec::new();
        let mut header: Option<Header> = None;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            stats.lines_processed += 1;

            if line.trim().is_empty() {
                header = None;
                continue;
            }
            if line.starts_with('#') {
                stats.annotation_lines += 1;
                continue;
            }

            if header.is_none() {
                header = Some(Header::parse(&line, line_no)?);
                stats.tables += 1;
                continue;
            }
            if let Some(h) = &header {
                records.push(h.record(&line, line_no)?);
                stats.records_read += 1;
            }
        }

        debug!(
            "parsed {} lines: {} annotations, {} tables, {} records",
            stats.lines_processed, stats.annotation_lines, stats.tables, stats.records_read
        );
        Ok(Self {
            inner: MemorySource::new(records),
            stats,
        })
    }

    /// Load statistics
    pub fn stats(&self) -> &CsvStats {
        &self.stats
    }

    /// Parsed records, ordered by time
    pub fn records(&self) -> &[Record] {
        self.inner.records()
    }
}

impl SeriesSource for CsvSource {
    type Error = SourceError;

    fn samples(&mut self, query: &Query) -> Result<SampleSeries, SourceError> {
        self.inner.samples(query)
    }

    fn events(&mut self, query: &Query) -> Result<EventSeries, SourceError> {
        self.inner.events(query)
    }
}

fn split_row(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(|c| c.trim().trim_matches('"'))
}

fn format_error(line: usize, reason: &str) -> SourceError {
    SourceError::Format {
        line,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
#group,false,false,true,true,false,false,true,true,true
#datatype,string,long,dateTime:RFC3339,dateTime:RFC3339,dateTime:RFC3339,double,string,string,string
#default,_result,,,,,,,,
,result,table,_start,_stop,_time,_value,_field,_measurement,Sensor
,,0,2023-03-01T00:00:00Z,2023-03-02T00:00:00Z,2023-03-01T10:00:00Z,41.7,value,shellies,power
,,0,2023-03-01T00:00:00Z,2023-03-02T00:00:00Z,2023-03-01T10:10:00Z,42.1,value,shellies,power

#group,false,false,true,true,false,false,true,true,true
#datatype,string,long,dateTime:RFC3339,dateTime:RFC3339,dateTime:RFC3339,double,string,string,string
#default,_result,,,,,,,,
,result,table,_start,_stop,_time,_value,_field,_measurement,Sensor
,,1,2023-03-01T00:00:00Z,2023-03-02T00:00:00Z,2023-03-01T10:00:00Z,3,value,trays,reader
";

    #[test]
    fn reads_annotated_tables() {
        let source = CsvSource::parse_str(EXPORT).unwrap();
        let stats = source.stats();
        assert_eq!(stats.tables, 2);
        assert_eq!(stats.annotation_lines, 6);
        assert_eq!(stats.records_read, 3);

        let first = &source.records()[0];
        assert_eq!(first.measurement, "shellies");
        assert_eq!(first.field, "value");
        assert_eq!(first.tags.get("Sensor").map(String::as_str), Some("power"));
        assert!(!first.tags.contains_key("table"));
    }

    #[test]
    fn plain_csv_without_annotations() {
        let mut source = CsvSource::parse_str(
            "_time,_value,_measurement\n2023-03-01T10:00:00Z,1,shellies\n2023-03-01T10:10:00Z,2,shellies\n",
        )
        .unwrap();
        let series = source.samples(&Query::new("shellies")).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn bad_rows_report_line_numbers() {
        let err = CsvSource::parse_str("_time,_value\n2023-03-01T10:00:00Z,1\nnot-a-time,2\n").unwrap_err();
        assert!(matches!(err, SourceError::Format { line: 3, .. }));

        let err = CsvSource::parse_str("_time,_value\n2023-03-01T10:00:00Z,high\n").unwrap_err();
        assert!(matches!(err, SourceError::Format { line: 2, .. }));

        let err = CsvSource::parse_str("_time,_value\n2023-03-01T10:00:00Z\n").unwrap_err();
        assert!(matches!(err, SourceError::Format { line: 2, .. }));

        let err = CsvSource::parse_str("_time,reading\n").unwrap_err();
        assert!(matches!(err, SourceError::Format { line: 1, .. }));
    }

    #[test]
    fn nan_is_not_coerced() {
        let err = CsvSource::parse_str("_time,_value\n2023-03-01T10:00:00Z,NaN\n").unwrap_err();
        assert!(matches!(err, SourceError::Format { line: 2, .. }));
    }
}
