#![forbid(unsafe_code)]
//! Reading `crlog` record files back.
//!
//! - [`RecordReader`] walks a file front to back with bounded memory per line, decoding each line
//!   into a [`crlog::LogMessage`] and counting what it could not decode.
//! - [`last_records`] and [`tail_file`] find the newest records by scanning backward from the
//!   end, without decoding anything older.
//!
//! Enable the `tokio` feature for `AsyncRecordReader`.

mod config;
mod error;
mod ingest;
mod reader;
mod tail;

pub use config::{CaptureRaw, ReadLimits, ReaderConfig};
pub use error::{LineRecord, LineRecordError, ReadError, TailRecord};
pub use ingest::{IngestStats, RecordReader};
pub use reader::{BoundedLine, BoundedLineReader};
pub use tail::{last_records, tail_file};

#[cfg(feature = "tokio")]
pub use ingest::AsyncRecordReader;
#[cfg(feature = "tokio")]
pub use reader::AsyncBoundedLineReader;
