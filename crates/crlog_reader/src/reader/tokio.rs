use std::io::ErrorKind;

use tokio::io::{AsyncRead, AsyncReadExt};

use super::{BoundedLine, LineAssembler, CHUNK_SIZE_BYTES};

/// Async counterpart of [`BoundedLineReader`](super::BoundedLineReader).
pub struct AsyncBoundedLineReader<R: AsyncRead + Unpin> {
    reader: R,
    assembler: LineAssembler,
    buffer: Vec<u8>,
    buffer_pos: usize,
    buffer_len: usize,
    done: bool,
}

impl<R: AsyncRead + Unpin> AsyncBoundedLineReader<R> {
    pub fn new(reader: R, max_line_bytes: usize) -> Self {
        Self {
            reader,
            assembler: LineAssembler::new(max_line_bytes),
            buffer: vec![0u8; CHUNK_SIZE_BYTES],
            buffer_pos: 0,
            buffer_len: 0,
            done: false,
        }
    }

    pub async fn next_line(&mut self) -> Option<BoundedLine> {
        if self.done {
            return None;
        }

        loop {
            if self.buffer_pos >= self.buffer_len {
                self.buffer_pos = 0;
                match self.reader.read(&mut self.buffer).await {
                    Ok(0) => {
                        self.done = true;
                        return self.assembler.finish();
                    }
                    Ok(n) => self.buffer_len = n,
                    Err(err) if err.kind() == ErrorKind::Interrupted => {
                        self.buffer_len = 0;
                        continue;
                    }
                    Err(err) => {
                        self.done = true;
                        return Some(self.assembler.io_error(err.kind()));
                    }
                }
            }

            let (used, line) = self
                .assembler
                .feed(&self.buffer[self.buffer_pos..self.buffer_len]);
            self.buffer_pos += used;
            if line.is_some() {
                return line;
            }
        }
    }
}
