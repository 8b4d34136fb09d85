// Fri Jan 16 2026 - Alex

use crate::command::error::TokenizeError;

const VERBATIM_REST: &str = "rr:";
const ESCAPED_REST: &str = "r:";

/// Split a command line into decoded tokens.
///
/// Tokens are separated by whitespace. A token is either a quoted literal
/// (`'...'` or `"..."`) or a bare run of non-whitespace; both decode backslash
/// escapes. A token starting with `rr:` swallows the rest of the line
/// verbatim, one starting with `r:` swallows it with escapes decoded.
pub fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut decoder = CharDecoder::new(line);
    let mut tokens = Vec::new();

    loop {
        decoder.skip_whitespace();

        let Some(c) = decoder.peek() else {
            break;
        };

        match c {
            '\'' | '"' => tokens.push(decoder.quoted()?),
            'r' if decoder.remaining().starts_with(VERBATIM_REST) => {
                decoder.advance(VERBATIM_REST.len());
                let rest = decoder.take_remaining();
                if !rest.is_empty() {
                    tokens.push(rest.to_string());
                }
                break;
            }
            'r' if decoder.remaining().starts_with(ESCAPED_REST) => {
                decoder.advance(ESCAPED_REST.len());
                let rest = decoder.decode_remaining()?;
                if !rest.is_empty() {
                    tokens.push(rest);
                }
                break;
            }
            _ => tokens.push(decoder.bare()?),
        }
    }

    Ok(tokens)
}

/// Decode every escape sequence in `input`, without any token splitting.
pub fn unescape(input: &str) -> Result<String, TokenizeError> {
    CharDecoder::new(input).decode_remaining()
}

/// Cursor over a line that yields characters with escapes resolved.
///
/// Positions are byte offsets into the original input.
#[derive(Debug, Clone)]
pub struct CharDecoder<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> CharDecoder<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn remaining(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Next decoded character, consuming one escape sequence if present.
    pub fn next_char(&mut self) -> Result<char, TokenizeError> {
        let start = self.pos;
        let c = self.bump().ok_or(TokenizeError::UnexpectedEof(start))?;
        if c == '\\' {
            self.escape(start)
        } else {
            Ok(c)
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn advance(&mut self, bytes: usize) {
        self.pos = (self.pos + bytes).min(self.src.len());
    }

    fn take_remaining(&mut self) -> &'a str {
        let rest = self.remaining();
        self.pos = self.src.len();
        rest
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn decode_remaining(&mut self) -> Result<String, TokenizeError> {
        let mut out = String::new();
        while !self.is_at_end() {
            out.push(self.next_char()?);
        }
        Ok(out)
    }

    fn quoted(&mut self) -> Result<String, TokenizeError> {
        let start = self.pos;
        let quote = self.bump().ok_or(TokenizeError::UnexpectedEof(start))?;
        let mut out = String::new();

        loop {
            match self.peek() {
                None => return Err(TokenizeError::UnterminatedQuote(start)),
                Some(c) if c == quote => {
                    self.bump();
                    return Ok(out);
                }
                Some(_) => out.push(self.next_char()?),
            }
        }
    }

    fn bare(&mut self) -> Result<String, TokenizeError> {
        let mut out = String::new();
        while self.peek().is_some_and(|c| !c.is_whitespace()) {
            out.push(self.next_char()?);
        }
        Ok(out)
    }

    // `start` is the offset of the backslash; the backslash is already consumed.
    fn escape(&mut self, start: usize) -> Result<char, TokenizeError> {
        let c = self.bump().ok_or(TokenizeError::UnfinishedEscape(start))?;

        match c {
            'a' => Ok('\x07'),
            'b' if matches!(self.peek(), Some('0' | '1')) => self.digit_run(2, start),
            'b' => Ok('\x08'),
            'f' => Ok('\x0c'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'v' => Ok('\x0b'),
            ' ' | '"' | '\'' | '\\' => Ok(c),
            'o' => self.digit_run(8, start),
            'x' => self.digit_run(16, start),
            '0'..='9' => {
                // the first digit belongs to the number
                self.pos -= 1;
                self.digit_run(10, start)
            }
            _ => Err(TokenizeError::InvalidEscape(start)),
        }
    }

    fn digit_run(&mut self, radix: u32, start: usize) -> Result<char, TokenizeError> {
        let digits_start = self.pos;
        while self.peek().is_some_and(|c| c.is_digit(radix)) {
            self.bump();
        }

        let digits = &self.src[digits_start..self.pos];
        if digits.is_empty() {
            return Err(if self.is_at_end() {
                TokenizeError::UnfinishedEscape(start)
            } else {
                TokenizeError::InvalidEscape(start)
            });
        }

        u32::from_str_radix(digits, radix)
            .ok()
            .and_then(char::from_u32)
            .ok_or(TokenizeError::InvalidEscape(start))
    }
}
