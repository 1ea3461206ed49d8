use std::{io, path::PathBuf};

use crlog::LogMessage;
use thiserror::Error;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum LineRecordError {
    #[error("I/O error while reading log records ({kind:?})")]
    Io { kind: io::ErrorKind },
    #[error("invalid UTF-8 in log record")]
    InvalidUtf8,
    #[error("line too long (observed_bytes={observed_bytes}, max_line_bytes={max_line_bytes})")]
    LineTooLong {
        observed_bytes: usize,
        max_line_bytes: usize,
    },
    #[error("line is not a valid log record")]
    Corrupt,
}

/// Outcome of reading one non-blank line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    /// 1-based line number in the source.
    pub line_number: usize,
    /// The line as read, when [`CaptureRaw`](crate::CaptureRaw) asked for it.
    pub raw: Option<String>,
    pub outcome: Result<LogMessage, LineRecordError>,
}

/// Outcome of one line found while scanning backward from the end of a log.
#[derive(Debug, Clone, PartialEq)]
pub struct TailRecord {
    /// Byte offset of the first byte of the line.
    pub offset: u64,
    pub outcome: Result<LogMessage, LineRecordError>,
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
