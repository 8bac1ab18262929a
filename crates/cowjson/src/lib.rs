//! # cowjson
//!
//! A JSON document model with **copy-on-write** containers, plus a
//! single-pass recursive-descent parser and a compact serializer.
//!
//! Cloning a [`Json`] is O(1): strings, arrays and objects are shared behind
//! an `Rc`. The first write through any holder gives that holder a private
//! copy, so no other holder ever sees the change.
//!
//! ## Quick start
//!
//! ```rust
//! use cowjson::{parse_json_string, Json};
//!
//! let doc = parse_json_string(r#"{"name":"Cain","age":23}"#).unwrap();
//! assert_eq!(doc.get("age").unwrap().as_int().unwrap(), 23);
//!
//! // Shallow copy, then write: only `edited` changes.
//! let mut edited = doc.clone();
//! edited.insert_key("age", 24).unwrap();
//! assert_eq!(doc.get("age").unwrap().as_int().unwrap(), 23);
//!
//! // Keys serialize in sorted order.
//! assert_eq!(edited.to_json_string(), r#"{"age":24,"name":"Cain"}"#);
//! ```
//!
//! ## Modules
//!
//! - [`value`]: the `Json` type and its COW mutation API
//! - [`scanner`]: tokenizer with one-token rollback
//! - [`parser`]: recursive-descent parser and the parse entry points
//! - [`serializer`]: `Json` → compact JSON text
//! - [`options`]: parser limits
//! - [`interop`]: `serde` / `serde_json` bridges
//! - [`error`]: error types

pub mod error;
pub mod interop;
pub mod options;
pub mod parser;
pub mod scanner;
pub mod serializer;
pub mod value;

pub use error::{FormatErrorKind, JsonError, Result};
pub use options::{ParseOptions, DEFAULT_MAX_DEPTH};
pub use parser::{parse_json_string, parse_json_string_into, parse_with_options, Parser};
pub use scanner::{Scanner, Token};
pub use value::{Json, JsonType};
