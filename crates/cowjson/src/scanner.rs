//! Single-pass JSON tokenizer with one-token rollback.
//!
//! The scanner hands out one [`Token`] per [`Scanner::scan`] call. String and
//! number tokens borrow their raw text from the input: strings without the
//! surrounding quotes and with escape sequences left as written, numbers
//! exactly as spelled. Escapes are validated here and decoded later by
//! [`unescape`].
//!
//! [`Scanner::rollback`] rewinds to the start of the most recently returned
//! token so the next `scan` yields it again. Only one level is kept; rolling
//! back twice in a row lands on the same token, not on the one before it.

use crate::error::{FormatErrorKind, JsonError, Result};

/// A lexical unit of JSON text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `{`
    BeginObject,
    /// `}`
    EndObject,
    /// `[`
    BeginArray,
    /// `]`
    EndArray,
    /// `,`
    ValueSeparator,
    /// `:`
    NameSeparator,
    /// String contents between the quotes, escapes not decoded.
    String(&'a str),
    /// Number literal as written.
    Number(&'a str),
    True,
    False,
    Null,
    EndOfInput,
}

/// Tokenizer over a JSON text.
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    token_start: usize,
    last_string: Option<&'a str>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            token_start: 0,
            last_string: None,
        }
    }

    /// Current cursor position in bytes.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Byte offset where the most recently returned token started.
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Decoded text of the last token, if it was a string.
    pub fn string_value(&self) -> Option<String> {
        self.last_string.map(unescape)
    }

    /// Rewinds the cursor to the start of the last token.
    pub fn rollback(&mut self) {
        self.pos = self.token_start;
    }

    /// Skips whitespace and returns the offset of any input left after it.
    pub fn remaining_offset(&mut self) -> Option<usize> {
        self.skip_whitespace();
        (self.pos < self.input.len()).then_some(self.pos)
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn error(&self, kind: FormatErrorKind) -> JsonError {
        JsonError::format(kind, self.token_start)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Reads the next token. Whitespace before it is skipped.
    pub fn scan(&mut self) -> Result<Token<'a>> {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.last_string = None;

        let Some(b) = self.advance() else {
            return Ok(Token::EndOfInput);
        };
        match b {
            b'{' => Ok(Token::BeginObject),
            b'}' => Ok(Token::EndObject),
            b'[' => Ok(Token::BeginArray),
            b']' => Ok(Token::EndArray),
            b',' => Ok(Token::ValueSeparator),
            b':' => Ok(Token::NameSeparator),
            b'"' => self.scan_string(),
            b'-' | b'0'..=b'9' => self.scan_number(),
            b't' => self.scan_literal("rue", Token::True),
            b'f' => self.scan_literal("alse", Token::False),
            b'n' => self.scan_literal("ull", Token::Null),
            _ => {
                let c = self.input[self.token_start..]
                    .chars()
                    .next()
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                Err(self.error(FormatErrorKind::UnexpectedCharacter(c)))
            }
        }
    }

    /// Checks the rest of `true`/`false`/`null` after its lead byte.
    fn scan_literal(&mut self, rest: &str, token: Token<'a>) -> Result<Token<'a>> {
        if self.input[self.pos..].starts_with(rest) {
            self.pos += rest.len();
            Ok(token)
        } else {
            Err(self.error(FormatErrorKind::InvalidLiteral))
        }
    }

    /// Scans up to the closing quote; the opening quote is already consumed.
    fn scan_string(&mut self) -> Result<Token<'a>> {
        let start = self.pos;
        loop {
            match self.advance() {
                None => return Err(self.error(FormatErrorKind::UnterminatedString)),
                Some(b'"') => break,
                Some(b'\\') => self.scan_escape()?,
                Some(_) => {}
            }
        }
        // Both ends sit next to an ASCII quote, so they are char boundaries.
        let raw = &self.input[start..self.pos - 1];
        self.last_string = Some(raw);
        Ok(Token::String(raw))
    }

    /// Validates one escape sequence; the backslash is already consumed.
    fn scan_escape(&mut self) -> Result<()> {
        match self.advance() {
            None => Err(self.error(FormatErrorKind::UnterminatedString)),
            Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => Ok(()),
            Some(b'u') => {
                let code = self.scan_hex4()?;
                if (0xDC00..=0xDFFF).contains(&code) {
                    return Err(self.error(FormatErrorKind::InvalidEscape));
                }
                if (0xD800..=0xDBFF).contains(&code) {
                    // A high surrogate must be followed by an escaped low one.
                    if self.advance() != Some(b'\\') || self.advance() != Some(b'u') {
                        return Err(self.error(FormatErrorKind::InvalidEscape));
                    }
                    let low = self.scan_hex4()?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(self.error(FormatErrorKind::InvalidEscape));
                    }
                }
                Ok(())
            }
            Some(_) => Err(self.error(FormatErrorKind::InvalidEscape)),
        }
    }

    fn scan_hex4(&mut self) -> Result<u32> {
        let mut value = 0;
        for _ in 0..4 {
            let b = self
                .advance()
                .ok_or_else(|| self.error(FormatErrorKind::UnterminatedString))?;
            let digit = (b as char)
                .to_digit(16)
                .ok_or_else(|| self.error(FormatErrorKind::InvalidEscape))?;
            value = value * 16 + digit;
        }
        Ok(value)
    }

    fn skip_digits(&mut self) -> usize {
        let from = self.pos;
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
        self.pos - from
    }

    /// Scans `-? digits (. digits)? ([eE] [+-]? digits)?`. The lead byte is
    /// already consumed.
    fn scan_number(&mut self) -> Result<Token<'a>> {
        let lead_is_minus = self.input.as_bytes()[self.token_start] == b'-';
        let int_digits = self.skip_digits() + usize::from(!lead_is_minus);
        if int_digits == 0 {
            return Err(self.error(FormatErrorKind::InvalidNumber));
        }

        if self.peek() == Some(b'.') {
            self.pos += 1;
            if self.skip_digits() == 0 {
                return Err(self.error(FormatErrorKind::InvalidNumber));
            }
        }

        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if self.skip_digits() == 0 {
                return Err(self.error(FormatErrorKind::InvalidNumber));
            }
        }

        Ok(Token::Number(&self.input[self.token_start..self.pos]))
    }
}

/// Decodes the escape sequences in a string token's raw text.
///
/// Expects text that [`Scanner`] accepted: every escape is well-formed and
/// surrogate escapes come in high/low pairs.
pub fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_owned();
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0C}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let high = hex4(&mut chars);
                let code = if (0xD800..=0xDBFF).contains(&high) {
                    // skip the `\u` of the low half
                    chars.nth(1);
                    let low = hex4(&mut chars);
                    0x10000 + ((high - 0xD800) << 10) + low.saturating_sub(0xDC00)
                } else {
                    high
                };
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn hex4(chars: &mut std::str::Chars<'_>) -> u32 {
    chars
        .by_ref()
        .take(4)
        .fold(0, |acc, c| acc * 16 + c.to_digit(16).unwrap_or(0))
}
