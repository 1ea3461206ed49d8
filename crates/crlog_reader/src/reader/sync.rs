use std::io::{ErrorKind, Read};

use super::{BoundedLine, LineAssembler, CHUNK_SIZE_BYTES};

/// Iterator over the lines of a blocking reader, bounded per line.
pub struct BoundedLineReader<R: Read> {
    reader: R,
    assembler: LineAssembler,
    buffer: Vec<u8>,
    buffer_pos: usize,
    buffer_len: usize,
    done: bool,
}

impl<R: Read> BoundedLineReader<R> {
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

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for BoundedLineReader<R> {
    type Item = BoundedLine;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if self.buffer_pos >= self.buffer_len {
                self.buffer_pos = 0;
                match self.reader.read(&mut self.buffer) {
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
