//! Error types for document access and JSON parsing.

use std::fmt;

use thiserror::Error;

use crate::value::JsonType;

/// Errors produced by [`Json`](crate::Json) operations and by the parser.
///
/// Every variant is fatal to the operation that raised it: the parser never
/// returns a partial document, and mutators leave the target untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JsonError {
    /// Malformed JSON text. `offset` is the byte offset where the offending
    /// token started.
    #[error("format error at byte {offset}: {kind}")]
    Format { kind: FormatErrorKind, offset: usize },

    /// An accessor or mutator was called on a value with a different tag.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: JsonType, found: JsonType },

    /// Array index negative or past the end.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// The operation has no meaning for this tag (e.g. `size()` on a number).
    #[error("unsupported operation `{operation}` on {found}")]
    UnsupportedOperation {
        operation: &'static str,
        found: JsonType,
    },
}

impl JsonError {
    pub(crate) fn format(kind: FormatErrorKind, offset: usize) -> Self {
        JsonError::Format { kind, offset }
    }

    /// Returns the format error kind, if this is a parse failure.
    pub fn format_kind(&self) -> Option<&FormatErrorKind> {
        match self {
            JsonError::Format { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// True for any malformed-input error.
    pub fn is_format(&self) -> bool {
        matches!(self, JsonError::Format { .. })
    }
}

/// What exactly was malformed in a [`JsonError::Format`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// `true`, `false` or `null` misspelled or cut short.
    InvalidLiteral,
    /// Input ended before the closing quote.
    UnterminatedString,
    /// Unknown escape character, short `\u` sequence or lone surrogate.
    InvalidEscape,
    /// A `-` without digits, or a `.`/exponent without digits.
    InvalidNumber,
    /// A character that cannot start any token.
    UnexpectedCharacter(char),
    /// Object member name is not a string.
    ExpectedKey,
    /// Missing `:` after an object key.
    ExpectedColon,
    /// Object member not followed by `,` or `}`.
    ExpectedCommaOrBrace,
    /// Array element not followed by `,` or `]`.
    ExpectedCommaOrBracket,
    /// Arrays/objects nested deeper than the configured limit.
    NestingTooDeep(usize),
    /// Non-whitespace input after the root value.
    TrailingCharacters,
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatErrorKind::InvalidLiteral => f.write_str("invalid literal"),
            FormatErrorKind::UnterminatedString => f.write_str("missing closing quote"),
            FormatErrorKind::InvalidEscape => f.write_str("invalid escape sequence"),
            FormatErrorKind::InvalidNumber => f.write_str("invalid number"),
            FormatErrorKind::UnexpectedCharacter(c) => write!(f, "unexpected character {c:?}"),
            FormatErrorKind::ExpectedKey => f.write_str("the key must be a string"),
            FormatErrorKind::ExpectedColon => f.write_str("expected `:`"),
            FormatErrorKind::ExpectedCommaOrBrace => f.write_str("expected `,` or `}`"),
            FormatErrorKind::ExpectedCommaOrBracket => f.write_str("expected `,` or `]`"),
            FormatErrorKind::NestingTooDeep(limit) => {
                write!(f, "nesting deeper than {limit} levels")
            }
            FormatErrorKind::TrailingCharacters => f.write_str("trailing characters after value"),
        }
    }
}

/// Convenience alias used throughout cowjson.
pub type Result<T> = std::result::Result<T, JsonError>;
