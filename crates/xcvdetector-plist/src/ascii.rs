//! OpenStep (ASCII) property list reader.
//!
//! Covers dictionaries, arrays, quoted and bare strings, `<hex>` data and
//! `//` / `/* */` comments. A top level without braces is read as the body
//! of a dictionary, as in `.strings` files.

use plist::{Dictionary, Value};
use std::fmt;

#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.input.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            line: self.line,
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match (self.peek(), self.peek_next()) {
                (Some(c), _) if c.is_ascii_whitespace() => {
                    self.bump();
                }
                (Some(b'/'), Some(b'/')) => {
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.bump();
                    }
                }
                (Some(b'/'), Some(b'*')) => {
                    self.bump();
                    self.bump();
                    while self.peek().is_some() {
                        if self.peek() == Some(b'*') && self.peek_next() == Some(b'/') {
                            self.bump();
                            self.bump();
                            break;
                        }
                        self.bump();
                    }
                }
                _ => return,
            }
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), ParseError> {
        self.skip_trivia();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(format!(
                "expected '{}', found '{}'",
                expected as char, c as char
            ))),
            None => Err(self.error(format!("expected '{}', found end of input", expected as char))),
        }
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        self.skip_trivia();
        match self.peek() {
            Some(b'{') => {
                self.bump();
                self.dictionary(Some(b'}')).map(Value::Dictionary)
            }
            Some(b'(') => self.array(),
            Some(b'<') => self.data(),
            Some(_) => self.string().map(Value::String),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Entries up to `close`, or to the end of input when `close` is `None`.
    fn dictionary(&mut self, close: Option<u8>) -> Result<Dictionary, ParseError> {
        let mut dict = Dictionary::new();
        loop {
            self.skip_trivia();
            match (self.peek(), close) {
                (None, None) => return Ok(dict),
                (None, Some(_)) => return Err(self.error("unterminated dictionary")),
                (Some(c), Some(end)) if c == end => {
                    self.bump();
                    return Ok(dict);
                }
                _ => {}
            }

            let key = self.string()?;
            self.expect(b'=')?;
            let value = self.value()?;
            self.expect(b';')?;
            dict.insert(key, value);
        }
    }

    fn array(&mut self) -> Result<Value, ParseError> {
        self.expect(b'(')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some(b')') {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_trivia();
            match self.peek() {
                Some(b',') => {
                    self.bump();
                }
                Some(b')') => {}
                _ => return Err(self.error("expected ',' or ')' in array")),
            }
        }
    }

    fn data(&mut self) -> Result<Value, ParseError> {
        self.expect(b'<')?;
        let mut digits = Vec::new();
        loop {
            match self.bump() {
                Some(b'>') => break,
                Some(c) if c.is_ascii_whitespace() => {}
                Some(c) if c.is_ascii_hexdigit() => digits.push(c),
                Some(c) => return Err(self.error(format!("invalid data byte '{}'", c as char))),
                None => return Err(self.error("unterminated data")),
            }
        }
        if digits.len() % 2 != 0 {
            return Err(self.error("odd number of hex digits in data"));
        }
        let bytes = digits
            .chunks(2)
            .map(|pair| (hex_value(pair[0]) << 4) | hex_value(pair[1]))
            .collect();
        Ok(Value::Data(bytes))
    }

    fn string(&mut self) -> Result<String, ParseError> {
        self.skip_trivia();
        match self.peek() {
            Some(b'"') => self.quoted(),
            Some(c) if is_bare_char(c) => {
                let start = self.pos;
                while self.peek().is_some_and(is_bare_char) {
                    self.bump();
                }
                // Bare strings are ASCII, so the slice is valid UTF-8.
                Ok(String::from_utf8_lossy(&self.input[start..self.pos]).into_owned())
            }
            Some(c) => Err(self.error(format!("unexpected character '{}'", c as char))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn quoted(&mut self) -> Result<String, ParseError> {
        self.bump();
        let mut bytes = Vec::new();
        loop {
            match self.bump() {
                Some(b'"') => break,
                Some(b'\\') => match self.bump() {
                    Some(b'n') => bytes.push(b'\n'),
                    Some(b't') => bytes.push(b'\t'),
                    Some(b'r') => bytes.push(b'\r'),
                    Some(c) => bytes.push(c),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => bytes.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
        String::from_utf8(bytes).map_err(|_| self.error("string is not valid UTF-8"))
    }
}

fn is_bare_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'_' | b'$' | b'+' | b'/' | b':' | b'.' | b'-')
}

fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        _ => c - b'A' + 10,
    }
}

/// Parse OpenStep text into a plist value.
pub fn parse(input: &str) -> Result<Value, ParseError> {
    let mut parser = Parser {
        input: input.as_bytes(),
        pos: 0,
        line: 1,
    };

    parser.skip_trivia();
    let value = match parser.peek() {
        Some(b'{') | Some(b'(') | Some(b'<') => parser.value()?,
        _ => Value::Dictionary(parser.dictionary(None)?),
    };

    parser.skip_trivia();
    if parser.peek().is_some() {
        return Err(parser.error("trailing characters after value"));
    }
    Ok(value)
}
