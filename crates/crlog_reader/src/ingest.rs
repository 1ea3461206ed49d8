use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use crlog::LogMessage;
use tracing::debug;

use crate::config::{CaptureRaw, ReaderConfig};
use crate::error::{LineRecord, LineRecordError, ReadError};
use crate::reader::{BoundedLine, BoundedLineReader};

/// Running totals for one reader.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct IngestStats {
    pub records: usize,
    /// Lines that were not valid UTF-8 or did not decode as a record.
    pub corrupt: usize,
    pub too_long: usize,
    pub io_errors: usize,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RawCaptureBudget {
    remaining_bytes: Option<usize>,
}

impl RawCaptureBudget {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self {
            remaining_bytes: limit,
        }
    }

    fn take(&mut self, line: &str) -> Option<String> {
        let bytes = line.len();
        if let Some(rem) = self.remaining_bytes {
            if bytes > rem {
                return None;
            }
            self.remaining_bytes = Some(rem - bytes);
        }
        Some(line.to_string())
    }
}

/// Turns bounded lines into decoded records. Shared by the sync and async readers.
#[derive(Debug)]
pub(crate) struct RecordDecoder {
    capture_raw: CaptureRaw,
    budget: RawCaptureBudget,
    stats: IngestStats,
}

impl RecordDecoder {
    pub(crate) fn new(config: &ReaderConfig) -> Self {
        Self {
            capture_raw: config.capture_raw,
            budget: RawCaptureBudget::new(config.limits.max_raw_bytes_total),
            stats: IngestStats::default(),
        }
    }

    pub(crate) fn stats(&self) -> IngestStats {
        self.stats
    }

    /// `None` for blank lines, which are skipped.
    pub(crate) fn decode(&mut self, line: BoundedLine) -> Option<LineRecord> {
        match line {
            BoundedLine::IoError { line_number, kind } => {
                self.stats.io_errors += 1;
                Some(failure(line_number, None, LineRecordError::Io { kind }))
            }
            BoundedLine::LineTooLong {
                line_number,
                observed_bytes,
                max_line_bytes,
            } => {
                self.stats.too_long += 1;
                debug!(line_number, observed_bytes, "skipping overlong log line");
                Some(failure(
                    line_number,
                    None,
                    LineRecordError::LineTooLong {
                        observed_bytes,
                        max_line_bytes,
                    },
                ))
            }
            BoundedLine::Line { line_number, bytes } => {
                let Ok(raw_line) = String::from_utf8(bytes) else {
                    self.stats.corrupt += 1;
                    debug!(line_number, "log line is not valid UTF-8");
                    return Some(failure(line_number, None, LineRecordError::InvalidUtf8));
                };
                let line = raw_line.strip_suffix('\r').unwrap_or(raw_line.as_str());
                if line.chars().all(char::is_whitespace) {
                    return None;
                }

                match LogMessage::parse(line) {
                    Some(message) => {
                        self.stats.records += 1;
                        let raw = self.capture(line, CaptureRaw::All);
                        Some(LineRecord {
                            line_number,
                            raw,
                            outcome: Ok(message),
                        })
                    }
                    None => {
                        self.stats.corrupt += 1;
                        debug!(line_number, "corrupt log record");
                        let raw = self.capture(line, CaptureRaw::Corrupt);
                        Some(failure(line_number, raw, LineRecordError::Corrupt))
                    }
                }
            }
        }
    }

    fn capture(&mut self, line: &str, wanted_by: CaptureRaw) -> Option<String> {
        match (self.capture_raw, wanted_by) {
            (CaptureRaw::All, _) | (CaptureRaw::Corrupt, CaptureRaw::Corrupt) => {
                self.budget.take(line)
            }
            _ => None,
        }
    }
}

fn failure(line_number: usize, raw: Option<String>, err: LineRecordError) -> LineRecord {
    LineRecord {
        line_number,
        raw,
        outcome: Err(err),
    }
}

/// Iterator decoding one [`LogMessage`] per line of a blocking reader.
///
/// Blank lines are skipped and a trailing `\r` is ignored. Undecodable lines are yielded as
/// errors and reading continues; an I/O error ends iteration.
pub struct RecordReader<R: Read> {
    lines: BoundedLineReader<R>,
    decoder: RecordDecoder,
}

impl<R: Read> RecordReader<R> {
    pub fn new(reader: R, config: ReaderConfig) -> Self {
        Self {
            lines: BoundedLineReader::new(reader, config.limits.max_line_bytes),
            decoder: RecordDecoder::new(&config),
        }
    }

    pub fn stats(&self) -> IngestStats {
        self.decoder.stats()
    }

    pub fn into_inner(self) -> R {
        self.lines.into_inner()
    }
}

impl RecordReader<File> {
    pub fn open(path: impl AsRef<Path>, config: ReaderConfig) -> Result<Self, ReadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ReadError::Open {
            path: PathBuf::from(path),
            source,
        })?;
        Ok(Self::new(file, config))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = LineRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            if let Some(record) = self.decoder.decode(line) {
                return Some(record);
            }
        }
    }
}

#[cfg(feature = "tokio")]
mod tokio_ingest {
    use tokio::io::AsyncRead;

    use super::{IngestStats, RecordDecoder};
    use crate::config::ReaderConfig;
    use crate::error::LineRecord;
    use crate::reader::AsyncBoundedLineReader;

    /// Async counterpart of [`RecordReader`](super::RecordReader).
    pub struct AsyncRecordReader<R: AsyncRead + Unpin> {
        lines: AsyncBoundedLineReader<R>,
        decoder: RecordDecoder,
    }

    impl<R: AsyncRead + Unpin> AsyncRecordReader<R> {
        pub fn new(reader: R, config: ReaderConfig) -> Self {
            Self {
                lines: AsyncBoundedLineReader::new(reader, config.limits.max_line_bytes),
                decoder: RecordDecoder::new(&config),
            }
        }

        pub fn stats(&self) -> IngestStats {
            self.decoder.stats()
        }

        pub async fn next_record(&mut self) -> Option<LineRecord> {
            loop {
                let line = self.lines.next_line().await?;
                if let Some(record) = self.decoder.decode(line) {
                    return Some(record);
                }
            }
        }
    }

}

#[cfg(feature = "tokio")]
pub use tokio_ingest::AsyncRecordReader;

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crlog::{MessageId, SourceInfo};

    use super::*;
    use crate::config::ReadLimits;

    fn read_all(data: &[u8], config: ReaderConfig) -> (Vec<LineRecord>, IngestStats) {
        let mut reader = RecordReader::new(Cursor::new(data.to_vec()), config);
        let records: Vec<_> = reader.by_ref().collect();
        (records, reader.stats())
    }

    #[test]
    fn counts_records_and_corrupt_lines() {
        let data = b"0 \"Worker\" 2\n0 \"X\" 99\n  \n1 \"Y\" 5 down\n\xff\xfe\n";
        let (records, stats) = read_all(data, ReaderConfig::default());

        assert_eq!(records.len(), 4);
        assert_eq!(
            records[0].outcome,
            Ok(LogMessage::new(SourceInfo::new(0, "Worker"), MessageId::Info))
        );
        assert_eq!(records[1].outcome, Err(LineRecordError::Corrupt));
        assert_eq!(records[2].line_number, 4);
        assert_eq!(records[3].outcome, Err(LineRecordError::InvalidUtf8));
        assert_eq!(
            stats,
            IngestStats {
                records: 2,
                corrupt: 2,
                too_long: 0,
                io_errors: 0
            }
        );
    }

    #[test]
    fn overlong_lines_are_reported_not_buffered() {
        let mut data = b"0 \"A\" 0\n".to_vec();
        data.extend_from_slice(format!("0 \"A\" 0 {}\n", "x".repeat(100)).as_bytes());
        data.extend_from_slice(b"0 \"A\" 1\n");
        let config = ReaderConfig {
            limits: ReadLimits {
                max_line_bytes: 32,
                max_raw_bytes_total: None,
            },
            capture_raw: CaptureRaw::All,
        };
        let (records, stats) = read_all(&data, config);

        assert!(matches!(
            records[1].outcome,
            Err(LineRecordError::LineTooLong {
                max_line_bytes: 32,
                ..
            })
        ));
        assert!(records[1].raw.is_none());
        assert_eq!(records[2].raw.as_deref(), Some("0 \"A\" 1"));
        assert_eq!(stats.too_long, 1);
    }

    #[test]
    fn capture_budget_is_spent_in_order() {
        let data = b"0 \"A\" 0 one\n0 \"A\" 0 two\n";
        let config = ReaderConfig {
            limits: ReadLimits {
                max_line_bytes: 1024,
                max_raw_bytes_total: Some(15),
            },
            capture_raw: CaptureRaw::All,
        };
        let (records, _) = read_all(data, config);
        assert_eq!(records[0].raw.as_deref(), Some("0 \"A\" 0 one"));
        assert!(records[1].raw.is_none());
        assert!(records[1].outcome.is_ok());
    }

    #[test]
    fn open_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.log");
        assert!(matches!(
            RecordReader::open(&missing, ReaderConfig::default()),
            Err(ReadError::Open { path, .. }) if path == missing
        ));
    }
}
