#![forbid(unsafe_code)]
//! Structured log records stored one per line of text.
//!
//! A record is a [`LogMessage`]: the [`SourceInfo`] that produced it, a [`MessageId`] and an
//! optional free-form payload. Records encode to a single line via `Display` and decode back via
//! [`LogMessage::parse`] (or `FromStr`). The wire form is
//!
//! ```text
//! <instance_id> "<type>" <ordinal>[ <data>]
//! ```
//!
//! Decoding is driven by [`Scanner`], a bidirectional cursor over the line. Decode failures are
//! silent: a line either yields a full record or nothing.
//!
//! The rest of the crate is plumbing around the format: a [`Logger`] that turns events into lines
//! and hands them to a [`LineSink`], and a [`CrashReporter`] capability that receives handled
//! errors. Both collaborators are injected; the crate holds no global state.

mod config;
mod error;
mod log_message;
mod logger;
mod message_id;
mod reporter;
mod scanner;
mod sink;
mod source_info;

pub use config::LogFileConfig;
pub use error::{ConfigError, DecodeError, ScanError, SinkError, UnknownMessageId};
pub use log_message::{merge_payload, LogMessage};
pub use logger::{Logger, LoggerBuilder};
pub use message_id::MessageId;
pub use reporter::{display_string, CrashReporter, NoopReporter, TracingReporter};
pub use scanner::{Direction, Scanner};
pub use sink::{FileSink, LineSink, MemorySink, NullSink};
pub use source_info::SourceInfo;

/// Builds a [`SourceInfo`] for the calling source file (`instance_id` 0, type = file name).
#[macro_export]
macro_rules! source_info {
    () => {
        $crate::SourceInfo::from_file(file!())
    };
}
