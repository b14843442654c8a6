//! Run-report output in JSON and JSONL formats.
//!
//! Provides a flexible writer that can output single records or batches
//! in either JSON or JSON Lines format.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::types::{DiffResult, FileRecord, RunStats};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl ReportFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Report entry for one produced diff, pixels omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffRecord {
    /// Original file name of the matched pair
    pub title: String,

    /// Diff frame width
    pub width: u32,

    /// Diff frame height
    pub height: u32,

    /// Byte size of the set-1 source file
    pub source_size: u64,
}

impl From<&DiffResult> for DiffRecord {
    fn from(result: &DiffResult) -> Self {
        Self {
            title: result.title.clone(),
            width: result.width,
            height: result.height,
            source_size: result.source_size,
        }
    }
}

/// Tagged union covering every record a compare run emits.
/// Internally tagged: `{"type":"file",...}`, `{"type":"diff",...}` or
/// `{"type":"stats",...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReportRecord {
    File(FileRecord),
    Diff(DiffRecord),
    Stats(RunStats),
}

/// A writer that serializes records to JSON or JSONL format.
pub struct ReportWriter<W: Write> {
    writer: W,
    format: ReportFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> ReportWriter<W> {
    /// Create a new report writer.
    ///
    /// `pretty` only affects JSON format; JSONL is one compact object per
    /// line by definition.
    pub fn new(writer: W, format: ReportFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Write a single record.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        match self.format {
            ReportFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, item)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
            }
            ReportFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
                writeln!(self.writer)?;
            }
        }
        self.items_written += 1;
        Ok(())
    }

    /// Write multiple records.
    ///
    /// For JSON format, writes a single array; for JSONL, one object per line.
    pub fn write_all<T: Serialize>(&mut self, items: &[T]) -> io::Result<()> {
        match self.format {
            ReportFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, items)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, items).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
                self.items_written += items.len();
            }
            ReportFormat::JsonLines => {
                for item in items {
                    self.write(item)?;
                }
            }
        }
        Ok(())
    }

    /// Get the number of records written.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileStatus, SetId};

    fn sample_record() -> ReportRecord {
        ReportRecord::File(FileRecord {
            set: SetId::One,
            name: "cat.png".to_string(),
            size: 2048,
            status: FileStatus::Accepted,
        })
    }

    #[test]
    fn test_report_record_tagging() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        assert!(json.contains("\"type\":\"file\""));
        assert!(json.contains("\"name\":\"cat.png\""));

        let parsed: ReportRecord = serde_json::from_str(&json).unwrap();
        assert!(matches!(parsed, ReportRecord::File(_)));
    }

    #[test]
    fn test_diff_record_from_result() {
        let result = DiffResult {
            title: "cat.png".to_string(),
            width: 4,
            height: 4,
            pixels: vec![0; 64],
            source_size: 2048,
        };
        let record = DiffRecord::from(&result);
        assert_eq!(record.title, "cat.png");
        assert_eq!(record.width, 4);
        let json = serde_json::to_string(&ReportRecord::Diff(record)).unwrap();
        assert!(json.contains("\"type\":\"diff\""));
        assert!(!json.contains("pixels"));
    }

    #[test]
    fn test_write_json_array() {
        let mut buffer = Vec::new();
        let mut writer = ReportWriter::new(&mut buffer, ReportFormat::Json, false);
        writer.write_all(&[sample_record(), sample_record()]).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.items_written(), 2);

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.starts_with('['));
        assert!(output.trim().ends_with(']'));
    }

    #[test]
    fn test_write_jsonl_lines() {
        let mut buffer = Vec::new();
        let mut writer = ReportWriter::new(&mut buffer, ReportFormat::JsonLines, false);
        writer.write_all(&[sample_record(), sample_record()]).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let _: ReportRecord = serde_json::from_str(line).unwrap();
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ReportFormat::parse("json"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::parse("jsonl"), Some(ReportFormat::JsonLines));
        assert_eq!(ReportFormat::parse("NDJSON"), Some(ReportFormat::JsonLines));
        assert_eq!(ReportFormat::parse("yaml"), None);
    }
}
