//! Recursive-descent JSON parser.
//!
//! One method per grammar rule, each driven by the token the [`Scanner`]
//! returns next. The grammar is LL(1): the only lookahead is the scanner's
//! one-token rollback, used to check for an immediately closing `]`/`}`.
//!
//! # Key design decisions
//!
//! - **Number tags follow the literal's shape**: `2` is an `Int`, `2.0` and
//!   `2e0` are `Double`s. Integer-shaped literals that overflow `i64` fall
//!   back to `Double`.
//! - **Duplicate keys overwrite**: the last member with a given name wins.
//! - **Bounded recursion**: arrays and objects deeper than
//!   [`ParseOptions::max_depth`] fail with `NestingTooDeep`.
//! - **Empty input is `null`**, as is a value position holding a token that
//!   cannot start a value (`[,]` parses as `[null]`).

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{FormatErrorKind, JsonError, Result};
use crate::options::ParseOptions;
use crate::scanner::{unescape, Scanner, Token};
use crate::value::Json;

/// Parser over a single JSON text.
pub struct Parser<'a> {
    input: &'a str,
    scanner: Scanner<'a>,
    options: ParseOptions,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParseOptions::default())
    }

    pub fn with_options(input: &'a str, options: ParseOptions) -> Self {
        Self {
            input,
            scanner: Scanner::new(input),
            options,
            depth: 0,
        }
    }

    /// Parses the root value.
    pub fn parse(&mut self) -> Result<Json> {
        let value = self.parse_value()?;

        if self.options.reject_trailing {
            if let Some(offset) = self.scanner.remaining_offset() {
                return Err(JsonError::format(
                    FormatErrorKind::TrailingCharacters,
                    offset,
                ));
            }
        }

        Ok(value)
    }

    fn error(&self, kind: FormatErrorKind) -> JsonError {
        JsonError::format(kind, self.scanner.token_start())
    }

    fn parse_value(&mut self) -> Result<Json> {
        match self.scanner.scan()? {
            Token::EndOfInput | Token::Null => Ok(Json::Null),
            Token::String(raw) => Ok(Json::from(unescape(raw))),
            Token::Number(raw) => self.parse_number(raw),
            Token::True => Ok(Json::Bool(true)),
            Token::False => Ok(Json::Bool(false)),
            Token::BeginArray => self.nested(Self::parse_array),
            Token::BeginObject => self.nested(Self::parse_object),
            _ => Ok(Json::Null),
        }
    }

    fn parse_number(&self, raw: &str) -> Result<Json> {
        if !raw.contains(&['.', 'e', 'E'][..]) {
            if let Ok(n) = raw.parse::<i64>() {
                return Ok(Json::Int(n));
            }
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Json::Double(n)),
            _ => Err(self.error(FormatErrorKind::InvalidNumber)),
        }
    }

    /// Runs a container rule one nesting level deeper.
    fn nested(&mut self, rule: fn(&mut Self) -> Result<Json>) -> Result<Json> {
        if self.depth >= self.options.max_depth {
            return Err(self.error(FormatErrorKind::NestingTooDeep(self.options.max_depth)));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// Scans at a member-name position. A scan failure on anything but a
    /// quoted string means an unquoted key (`{a:1}`, `{name:1}`, `{-x:1}`).
    fn scan_key(&mut self) -> Result<Token<'a>> {
        self.scanner.scan().map_err(|err| {
            let lead = self.input.as_bytes().get(self.scanner.token_start());
            match lead {
                Some(b'"') => err,
                _ => self.error(FormatErrorKind::ExpectedKey),
            }
        })
    }

    /// Object members; the opening `{` is already consumed.
    fn parse_object(&mut self) -> Result<Json> {
        let mut map = BTreeMap::new();

        if self.scan_key()? == Token::EndObject {
            return Ok(Json::from(map));
        }
        self.scanner.rollback();

        loop {
            let key = match self.scan_key()? {
                Token::String(raw) => unescape(raw),
                _ => return Err(self.error(FormatErrorKind::ExpectedKey)),
            };

            if self.scanner.scan()? != Token::NameSeparator {
                return Err(self.error(FormatErrorKind::ExpectedColon));
            }

            let value = self.parse_value()?;
            map.insert(key, value);

            match self.scanner.scan()? {
                Token::ValueSeparator => {}
                Token::EndObject => break,
                _ => return Err(self.error(FormatErrorKind::ExpectedCommaOrBrace)),
            }
        }

        Ok(Json::from(map))
    }

    /// Array elements; the opening `[` is already consumed.
    fn parse_array(&mut self) -> Result<Json> {
        let mut items = Vec::new();

        if self.scanner.scan()? == Token::EndArray {
            return Ok(Json::from(items));
        }
        self.scanner.rollback();

        loop {
            items.push(self.parse_value()?);

            match self.scanner.scan()? {
                Token::ValueSeparator => {}
                Token::EndArray => break,
                _ => return Err(self.error(FormatErrorKind::ExpectedCommaOrBracket)),
            }
        }

        Ok(Json::from(items))
    }
}

/// Parses a JSON text with the default (strict) options.
pub fn parse_json_string(input: &str) -> Result<Json> {
    Parser::new(input).parse()
}

/// Parses a JSON text into `target`. On failure `target` is left unchanged.
pub fn parse_json_string_into(input: &str, target: &mut Json) -> Result<()> {
    *target = parse_json_string(input)?;
    Ok(())
}

/// Parses a JSON text with explicit options.
pub fn parse_with_options(input: &str, options: ParseOptions) -> Result<Json> {
    Parser::with_options(input, options).parse()
}

impl FromStr for Json {
    type Err = JsonError;

    fn from_str(s: &str) -> Result<Self> {
        parse_json_string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(input: &str) -> FormatErrorKind {
        parse_json_string(input)
            .unwrap_err()
            .format_kind()
            .cloned()
            .expect("expected a format error")
    }

    #[test]
    fn test_parse_scalars() {
        assert!(parse_json_string("null").unwrap().is_null());
        assert!(parse_json_string("true").unwrap().as_bool().unwrap());
        assert!(!parse_json_string("false").unwrap().as_bool().unwrap());
        assert_eq!(parse_json_string("\"hi\"").unwrap().as_str().unwrap(), "hi");
    }

    #[test]
    fn test_empty_input_is_null() {
        assert!(parse_json_string("").unwrap().is_null());
        assert!(parse_json_string("  \n ").unwrap().is_null());
    }

    #[test]
    fn test_number_shape_decides_tag() {
        assert_eq!(parse_json_string("2").unwrap().as_int().unwrap(), 2);
        assert_eq!(parse_json_string("2.0").unwrap().as_double().unwrap(), 2.0);
        assert_eq!(parse_json_string("-3.5").unwrap().as_double().unwrap(), -3.5);
        assert_eq!(parse_json_string("1e2").unwrap().as_double().unwrap(), 100.0);
        assert_eq!(parse_json_string("-0").unwrap().as_int().unwrap(), 0);
    }

    #[test]
    fn test_integer_overflow_falls_back_to_double() {
        let value = parse_json_string("92233720368547758080").unwrap();
        assert!(value.is_double());
        assert_eq!(
            parse_json_string("9223372036854775807").unwrap().as_int().unwrap(),
            i64::MAX
        );
    }

    #[test]
    fn test_overflowing_double_is_rejected() {
        for input in ["1e999", "-1e400", "[1.5e309]"] {
            assert_eq!(kind_of(input), FormatErrorKind::InvalidNumber, "input: {input}");
        }
        assert_eq!(parse_json_string("1.7e308").unwrap().as_double().unwrap(), 1.7e308);
    }

    #[test]
    fn test_string_escapes_decoded() {
        let value = parse_json_string(r#""a\tb\u0041""#).unwrap();
        assert_eq!(value.as_str().unwrap(), "a\tbA");
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let value = parse_json_string(r#"{"a":1,"a":2}"#).unwrap();
        assert_eq!(value.size().unwrap(), 1);
        assert_eq!(value.get("a").unwrap().as_int().unwrap(), 2);
    }

    #[test]
    fn test_grammar_errors() {
        assert_eq!(kind_of(r#"{"a":1,}"#), FormatErrorKind::ExpectedKey);
        assert_eq!(kind_of("{a:1}"), FormatErrorKind::ExpectedKey);
        assert_eq!(kind_of("{1:1}"), FormatErrorKind::ExpectedKey);
        assert_eq!(kind_of("{name:1}"), FormatErrorKind::ExpectedKey);
        assert_eq!(kind_of("{nul:1}"), FormatErrorKind::ExpectedKey);
        assert_eq!(kind_of("{-x:1}"), FormatErrorKind::ExpectedKey);
        assert_eq!(kind_of(r#"{"a":1,tru:2}"#), FormatErrorKind::ExpectedKey);
        assert_eq!(kind_of(r#"{"abc"#), FormatErrorKind::UnterminatedString);
        assert_eq!(kind_of(r#"{"a" 1}"#), FormatErrorKind::ExpectedColon);
        assert_eq!(kind_of(r#"{"a":1 "b":2}"#), FormatErrorKind::ExpectedCommaOrBrace);
        assert_eq!(kind_of("[1 2]"), FormatErrorKind::ExpectedCommaOrBracket);
        assert_eq!(kind_of("[1"), FormatErrorKind::ExpectedCommaOrBracket);
        assert_eq!(kind_of(r#"{"a":1"#), FormatErrorKind::ExpectedCommaOrBrace);
    }

    #[test]
    fn test_error_offset_points_at_token() {
        let err = parse_json_string(r#"{"a":1;}"#).unwrap_err();
        assert_eq!(
            err,
            JsonError::Format {
                kind: FormatErrorKind::UnexpectedCharacter(';'),
                offset: 6
            }
        );
        let err = parse_json_string(r#"{"a" 1}"#).unwrap_err();
        assert_eq!(
            err,
            JsonError::Format {
                kind: FormatErrorKind::ExpectedColon,
                offset: 5
            }
        );
    }

    #[test]
    fn test_non_value_token_yields_null() {
        let value = parse_json_string("[,]").unwrap();
        assert_eq!(value.size().unwrap(), 1);
        assert!(value.at(0).unwrap().is_null());
    }

    #[test]
    fn test_trailing_content() {
        assert_eq!(kind_of("1 2"), FormatErrorKind::TrailingCharacters);
        assert_eq!(kind_of("{} x"), FormatErrorKind::TrailingCharacters);
        let value = parse_with_options("{} x", ParseOptions::lenient()).unwrap();
        assert!(value.is_object());
        assert!(parse_json_string("[1]  \n").is_ok());
    }

    #[test]
    fn test_nesting_depth_limit() {
        let options = ParseOptions::default().with_max_depth(2);
        assert!(parse_with_options("[[1]]", options).is_ok());
        assert!(parse_with_options(r#"{"a":[1]}"#, options).is_ok());
        let err = parse_with_options("[[[1]]]", options).unwrap_err();
        assert_eq!(
            err,
            JsonError::Format {
                kind: FormatErrorKind::NestingTooDeep(2),
                offset: 2
            }
        );
    }

    #[test]
    fn test_deep_input_fails_cleanly_by_default() {
        let deep = "[".repeat(100_000);
        assert!(matches!(
            kind_of(&deep),
            FormatErrorKind::NestingTooDeep(_)
        ));
    }

    #[test]
    fn test_parse_into_overwrites_only_on_success() {
        let mut target = Json::from(7);
        parse_json_string_into("[1,2]", &mut target).unwrap();
        assert_eq!(target.size().unwrap(), 2);
        assert!(parse_json_string_into("[1,", &mut target).is_err());
        assert_eq!(target.size().unwrap(), 2);
    }

    #[test]
    fn test_from_str() {
        let value: Json = r#"{"k":[true]}"#.parse().unwrap();
        assert!(value.get("k").unwrap().at(0).unwrap().as_bool().unwrap());
    }
}
