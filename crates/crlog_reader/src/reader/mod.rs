mod sync;

#[cfg(feature = "tokio")]
mod tokio;

use std::io::ErrorKind;

pub use sync::BoundedLineReader;

#[cfg(feature = "tokio")]
pub use self::tokio::AsyncBoundedLineReader;

pub(crate) const CHUNK_SIZE_BYTES: usize = 8192;

/// One newline-delimited unit produced by a bounded reader.
#[derive(Debug)]
pub enum BoundedLine {
    Line {
        line_number: usize,
        bytes: Vec<u8>,
    },
    LineTooLong {
        line_number: usize,
        observed_bytes: usize,
        max_line_bytes: usize,
    },
    IoError {
        line_number: usize,
        kind: ErrorKind,
    },
}

/// Splits a byte stream into lines without ever holding more than `max_line_bytes` of one line.
///
/// Bytes of an overlong line are counted and dropped; the line is still reported so line numbers
/// stay aligned with the source.
#[derive(Debug)]
pub(crate) struct LineAssembler {
    max_line_bytes: usize,
    current: Vec<u8>,
    observed_bytes: usize,
    overflowed: bool,
    line_number: usize,
}

impl LineAssembler {
    pub(crate) fn new(max_line_bytes: usize) -> Self {
        Self {
            max_line_bytes,
            current: Vec::new(),
            observed_bytes: 0,
            overflowed: false,
            line_number: 0,
        }
    }

    /// Consumes `chunk` up to and including the first newline. Returns how many bytes were used
    /// and the completed line, if the newline was found.
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> (usize, Option<BoundedLine>) {
        match chunk.iter().position(|b| *b == b'\n') {
            Some(idx) => {
                self.push(&chunk[..idx]);
                (idx + 1, Some(self.finish_line()))
            }
            None => {
                self.push(chunk);
                (chunk.len(), None)
            }
        }
    }

    /// Flushes a final line that had no trailing newline.
    pub(crate) fn finish(&mut self) -> Option<BoundedLine> {
        if self.overflowed || !self.current.is_empty() {
            return Some(self.finish_line());
        }
        None
    }

    pub(crate) fn io_error(&mut self, kind: ErrorKind) -> BoundedLine {
        self.line_number += 1;
        self.reset();
        BoundedLine::IoError {
            line_number: self.line_number,
            kind,
        }
    }

    fn push(&mut self, bytes: &[u8]) {
        self.observed_bytes = self.observed_bytes.saturating_add(bytes.len());
        if self.overflowed {
            return;
        }
        if self.observed_bytes > self.max_line_bytes {
            self.overflowed = true;
            self.current = Vec::new();
            return;
        }
        self.current.extend_from_slice(bytes);
    }

    fn finish_line(&mut self) -> BoundedLine {
        self.line_number += 1;
        let line_number = self.line_number;
        let line = if self.overflowed {
            BoundedLine::LineTooLong {
                line_number,
                observed_bytes: self.observed_bytes,
                max_line_bytes: self.max_line_bytes,
            }
        } else {
            BoundedLine::Line {
                line_number,
                bytes: std::mem::take(&mut self.current),
            }
        };
        self.reset();
        line
    }

    fn reset(&mut self) {
        self.current.clear();
        self.observed_bytes = 0;
        self.overflowed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_may_span_chunks() {
        let mut assembler = LineAssembler::new(64);
        assert!(matches!(assembler.feed(b"ab"), (2, None)));
        let (used, line) = assembler.feed(b"c\nrest");
        assert_eq!(used, 2);
        match line {
            Some(BoundedLine::Line { line_number, bytes }) => {
                assert_eq!(line_number, 1);
                assert_eq!(bytes, b"abc");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn overflow_is_reported_once_per_line() {
        let mut assembler = LineAssembler::new(4);
        assert!(matches!(assembler.feed(b"abc"), (3, None)));
        assert!(matches!(assembler.feed(b"def"), (3, None)));
        let (_, line) = assembler.feed(b"g\n");
        assert!(matches!(
            line,
            Some(BoundedLine::LineTooLong {
                line_number: 1,
                observed_bytes: 7,
                max_line_bytes: 4
            })
        ));
        assert!(assembler.finish().is_none());
    }

    #[test]
    fn unterminated_tail_is_flushed() {
        let mut assembler = LineAssembler::new(8);
        assembler.feed(b"tail");
        assert!(matches!(
            assembler.finish(),
            Some(BoundedLine::Line { line_number: 1, .. })
        ));
    }
}
