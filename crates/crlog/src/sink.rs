use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, RwLock},
};

use tracing::debug;

use crate::{config::LogFileConfig, error::SinkError};

/// Append-only destination for encoded records.
///
/// Implementations must never interleave two appends: each call lands as one whole line.
pub trait LineSink: Send + Sync {
    fn append(&self, line: &str) -> Result<(), SinkError>;
}

/// Appends newline-terminated lines to a file.
///
/// Every append takes the write side of an `RwLock`, so at most one write is in flight.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    sync_each_line: bool,
    file: RwLock<File>,
}

impl FileSink {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        Self::from_config(&LogFileConfig::new(path))
    }

    pub fn from_config(config: &LogFileConfig) -> Result<Self, SinkError> {
        let path = config.path.clone();
        if config.create_parent_dirs {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|source| SinkError::CreateDir {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SinkError::Open {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), "opened log file");

        Ok(Self {
            path,
            sync_each_line: config.sync_each_line,
            file: RwLock::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSink for FileSink {
    fn append(&self, line: &str) -> Result<(), SinkError> {
        let mut file = self.file.write().map_err(|_| SinkError::Poisoned)?;
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let write_err = |source| SinkError::Write {
            path: self.path.clone(),
            source,
        };
        file.write_all(buf.as_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)?;
        if self.sync_each_line {
            file.sync_data().map_err(write_err)?;
        }
        Ok(())
    }
}

/// Keeps appended lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl LineSink for MemorySink {
    fn append(&self, line: &str) -> Result<(), SinkError> {
        self.lines
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .push(line.to_string());
        Ok(())
    }
}

/// Discards every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LineSink for NullSink {
    fn append(&self, _line: &str) -> Result<(), SinkError> {
        Ok(())
    }
}
