use std::{
    fs::File,
    io::{Read, Seek, SeekFrom},
    path::Path,
};

use crlog::{LogMessage, Scanner};

use crate::error::{LineRecordError, ReadError, TailRecord};

/// The last `limit` records of `text`, oldest first.
///
/// Lines are located by scanning backward from the end, so nothing before the returned records
/// is decoded. Blank lines are skipped and do not count toward `limit`.
pub fn last_records(text: &str, limit: usize) -> Vec<TailRecord> {
    scan_backward(text, limit)
}

/// The last `limit` records of the file at `path`, oldest first.
///
/// Only the end of the file is read: enough bytes for `limit + 1` lines of at most
/// `max_line_bytes` each. A longer line inside that window is reported as
/// [`LineRecordError::LineTooLong`] and may push older records out of the result. A line that
/// is not valid UTF-8 is reported as [`LineRecordError::InvalidUtf8`] without affecting its
/// neighbours.
pub fn tail_file(
    path: impl AsRef<Path>,
    limit: usize,
    max_line_bytes: usize,
) -> Result<Vec<TailRecord>, ReadError> {
    let path = path.as_ref();
    let read_err = |source| ReadError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(|source| ReadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let len = file.metadata().map_err(read_err)?.len();
    let window = (limit as u64)
        .saturating_add(1)
        .saturating_mul((max_line_bytes as u64).saturating_add(1))
        .min(len);
    let start = len - window;

    file.seek(SeekFrom::Start(start)).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.by_ref()
        .take(window)
        .read_to_end(&mut bytes)
        .map_err(read_err)?;

    // Mid-file windows usually open inside a line; drop everything up to the first boundary.
    let skipped = if start > 0 {
        bytes
            .iter()
            .position(|b| *b == b'\n')
            .map_or(bytes.len(), |idx| idx + 1)
    } else {
        0
    };

    Ok(split_backward(
        &bytes[skipped..],
        start + skipped as u64,
        limit,
        max_line_bytes,
    ))
}

/// Walks raw line boundaries from the end so each line is checked for UTF-8 on its own.
fn split_backward(
    bytes: &[u8],
    base_offset: u64,
    limit: usize,
    max_line_bytes: usize,
) -> Vec<TailRecord> {
    let mut found = Vec::new();
    let mut end = bytes.strip_suffix(b"\n").map_or(bytes.len(), <[u8]>::len);

    while found.len() < limit {
        let start = bytes[..end]
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |idx| idx + 1);
        let line = &bytes[start..end];
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        let outcome = if line.len() > max_line_bytes {
            Some(Err(too_long(line.len(), max_line_bytes)))
        } else {
            match std::str::from_utf8(line) {
                Ok(text) => decode_line(text, max_line_bytes),
                Err(_) => Some(Err(LineRecordError::InvalidUtf8)),
            }
        };
        if let Some(outcome) = outcome {
            found.push(TailRecord {
                offset: base_offset + start as u64,
                outcome,
            });
        }

        if start == 0 {
            break;
        }
        end = start - 1;
    }

    found.reverse();
    found
}

fn scan_backward(text: &str, limit: usize) -> Vec<TailRecord> {
    let mut found = Vec::new();
    let mut scanner = Scanner::from_end(text);
    skip_final_newline(&mut scanner);

    while found.len() < limit && !scanner.is_at_end() {
        let (line, start) = match scanner.read_until_match('\n', usize::MAX) {
            Ok(line) => (line, scanner.position() + 1),
            Err(_) => (scanner.read(), 0),
        };
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(outcome) = decode_line(line, usize::MAX) {
            found.push(TailRecord {
                offset: start as u64,
                outcome,
            });
        }
    }

    found.reverse();
    found
}

/// The newline that terminates the final record does not open another one. An unterminated
/// final record leaves the cursor untouched.
fn skip_final_newline(scanner: &mut Scanner<'_>) {
    scanner.expect('\n').ok();
}

/// `None` for blank lines, which are skipped and do not count toward the limit.
fn decode_line(
    line: &str,
    max_line_bytes: usize,
) -> Option<Result<LogMessage, LineRecordError>> {
    if line.chars().all(char::is_whitespace) {
        return None;
    }
    if line.len() > max_line_bytes {
        return Some(Err(too_long(line.len(), max_line_bytes)));
    }
    Some(LogMessage::parse(line).ok_or(LineRecordError::Corrupt))
}

fn too_long(observed_bytes: usize, max_line_bytes: usize) -> LineRecordError {
    LineRecordError::LineTooLong {
        observed_bytes,
        max_line_bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(records: &[TailRecord]) -> Vec<Option<String>> {
        records
            .iter()
            .map(|r| {
                r.outcome
                    .as_ref()
                    .ok()
                    .and_then(|m| m.data().map(str::to_string))
            })
            .collect()
    }

    #[test]
    fn returns_last_records_oldest_first() {
        let text = "0 \"A\" 2 one\n0 \"A\" 2 two\n0 \"A\" 2 three\n";
        let records = last_records(text, 2);
        assert_eq!(
            data(&records),
            vec![Some("two".to_string()), Some("three".to_string())]
        );
        assert_eq!(records[0].offset, 12);
        assert_eq!(records[1].offset, 24);
    }

    #[test]
    fn handles_missing_final_newline_and_short_input() {
        let records = last_records("0 \"A\" 2 one\r\n\n0 \"A\" 3", 5);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].offset, 0);
        assert_eq!(records[1].outcome.as_ref().unwrap().data(), None);
        assert!(last_records("", 3).is_empty());
        assert!(last_records("0 \"A\" 2\n", 0).is_empty());
    }

    #[test]
    fn corrupt_lines_count_toward_the_limit() {
        let records = last_records("0 \"A\" 2 ok\ngarbage\n", 2);
        assert!(records[0].outcome.is_ok());
        assert_eq!(records[1].outcome, Err(LineRecordError::Corrupt));
    }

    #[test]
    fn invalid_utf8_is_reported_per_line() {
        let bytes = b"0 \"A\" 2 one\n\xff\xfe\r\n\n0 \"A\" 2 three";
        let records = split_backward(bytes, 100, 1, 1024);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].offset, 100 + 17);
        assert_eq!(data(&records), vec![Some("three".to_string())]);

        let records = split_backward(bytes, 100, 5, 1024);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].offset, 100);
        assert_eq!(records[1].offset, 100 + 12);
        assert_eq!(records[1].outcome, Err(LineRecordError::InvalidUtf8));
    }

    #[test]
    fn split_and_scan_agree_on_valid_text() {
        let text = "0 \"A\" 2 one\r\n\n1 \"B\" 3\ngarbage\n";
        assert_eq!(
            split_backward(text.as_bytes(), 0, 10, usize::MAX),
            last_records(text, 10)
        );
        assert!(split_backward(b"", 0, 3, 64).is_empty());
        assert!(split_backward(b"\n", 0, 3, 64).is_empty());
    }
}
