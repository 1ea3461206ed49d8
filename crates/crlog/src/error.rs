use std::{io, path::PathBuf};

use thiserror::Error;

/// Grammar violation reported by a [`Scanner`](crate::Scanner) primitive.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum ScanError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("expected at least one ASCII digit")]
    MissingDigits,
    #[error("integer does not fit the target type")]
    Overflow,
    #[error("expected {expected:?}, found {found:?}")]
    UnexpectedChar { expected: char, found: char },
    #[error("delimiter {delimiter:?} not found within {max_chars} characters")]
    DelimiterNotFound { delimiter: char, max_chars: usize },
    #[error("position {pos} is not a char boundary of the input")]
    InvalidPosition { pos: usize },
}

/// Returned by `FromStr` when a line is not a valid record. Carries no detail: a line either
/// decodes completely or not at all.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
#[error("malformed log record")]
pub struct DecodeError;

#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
#[error("unknown message id ordinal {0}")]
pub struct UnknownMessageId(pub u16);

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to append to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("sink lock poisoned by a panicked writer")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse log file config: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
    },
}
