/// Which raw lines a record reader keeps alongside the decoded outcome.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum CaptureRaw {
    #[default]
    None,
    /// Only lines that failed to decode.
    Corrupt,
    All,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ReadLimits {
    pub max_line_bytes: usize,
    /// Total bytes of raw text captured over the reader's lifetime; `None` is unbounded.
    pub max_raw_bytes_total: Option<usize>,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_line_bytes: 64 * 1024,
            max_raw_bytes_total: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ReaderConfig {
    pub limits: ReadLimits,
    pub capture_raw: CaptureRaw,
}
