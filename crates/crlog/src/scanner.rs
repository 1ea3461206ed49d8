use crate::error::ScanError;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Cursor over a borrowed text buffer that reads one grammar token at a time.
///
/// The cursor sits between characters. A forward scanner consumes the character after the
/// cursor, a backward scanner the one before it. Tokens are always returned in buffer order,
/// whatever the direction.
///
/// A failed read leaves the cursor where it was before the read, so a caller may try another
/// primitive. Record decoders never do: the first failure abandons the whole parse.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    dir: Direction,
}

impl<'a> Scanner<'a> {
    /// Forward scanner starting at the beginning of `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            dir: Direction::Forward,
        }
    }

    /// Backward scanner starting at the end of `text`.
    pub fn from_end(text: &'a str) -> Self {
        Self {
            text,
            pos: text.len(),
            dir: Direction::Backward,
        }
    }

    /// Scanner starting at byte offset `pos`, which must lie on a char boundary.
    pub fn at(text: &'a str, pos: usize, dir: Direction) -> Result<Self, ScanError> {
        if !text.is_char_boundary(pos) {
            return Err(ScanError::InvalidPosition { pos });
        }
        Ok(Self { text, pos, dir })
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().is_none()
    }

    /// Reads an optional `-` followed by one or more ASCII digits.
    pub fn read_i64(&mut self) -> Result<i64, ScanError> {
        self.attempt(|s| {
            let start = s.pos;
            match s.dir {
                Direction::Forward => {
                    s.eat('-');
                    s.digits()?;
                }
                Direction::Backward => {
                    s.digits()?;
                    s.eat('-');
                }
            }
            s.span_from(start)
                .parse::<i64>()
                .map_err(|_| ScanError::Overflow)
        })
    }

    /// Reads one or more ASCII digits. A sign is never accepted.
    pub fn read_u16(&mut self) -> Result<u16, ScanError> {
        self.attempt(|s| s.digits()?.parse::<u16>().map_err(|_| ScanError::Overflow))
    }

    /// Consumes exactly one character, failing unless it is `c`.
    pub fn expect(&mut self, c: char) -> Result<(), ScanError> {
        match self.peek() {
            None => Err(ScanError::UnexpectedEnd),
            Some(found) if found == c => {
                self.advance(found);
                Ok(())
            }
            Some(found) => Err(ScanError::UnexpectedChar { expected: c, found }),
        }
    }

    /// Returns the text up to the next `c` and consumes the delimiter too.
    ///
    /// At most `max_chars` characters may precede the delimiter.
    pub fn read_until_match(&mut self, c: char, max_chars: usize) -> Result<&'a str, ScanError> {
        self.attempt(|s| {
            let start = s.pos;
            let mut consumed = 0usize;
            loop {
                let Some(ch) = s.peek() else {
                    return Err(ScanError::UnexpectedEnd);
                };
                if ch == c {
                    let token = s.span_from(start);
                    s.advance(ch);
                    return Ok(token);
                }
                if consumed == max_chars {
                    return Err(ScanError::DelimiterNotFound {
                        delimiter: c,
                        max_chars,
                    });
                }
                s.advance(ch);
                consumed += 1;
            }
        })
    }

    /// Consumes everything left in the scan direction. Never fails.
    pub fn read(&mut self) -> &'a str {
        match self.dir {
            Direction::Forward => {
                let rest = &self.text[self.pos..];
                self.pos = self.text.len();
                rest
            }
            Direction::Backward => {
                let rest = &self.text[..self.pos];
                self.pos = 0;
                rest
            }
        }
    }

    fn attempt<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, ScanError>,
    ) -> Result<T, ScanError> {
        let start = self.pos;
        let result = read(self);
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    fn peek(&self) -> Option<char> {
        match self.dir {
            Direction::Forward => self.text[self.pos..].chars().next(),
            Direction::Backward => self.text[..self.pos].chars().next_back(),
        }
    }

    fn advance(&mut self, ch: char) {
        match self.dir {
            Direction::Forward => self.pos += ch.len_utf8(),
            Direction::Backward => self.pos -= ch.len_utf8(),
        }
    }

    fn eat(&mut self, c: char) -> bool {
        self.expect(c).is_ok()
    }

    fn digits(&mut self) -> Result<&'a str, ScanError> {
        let start = self.pos;
        while let Some(ch) = self.peek().filter(char::is_ascii_digit) {
            self.advance(ch);
        }
        if self.pos == start {
            return Err(ScanError::MissingDigits);
        }
        Ok(self.span_from(start))
    }

    fn span_from(&self, start: usize) -> &'a str {
        match self.dir {
            Direction::Forward => &self.text[start..self.pos],
            Direction::Backward => &self.text[self.pos..start],
        }
    }
}
