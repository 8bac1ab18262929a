//! `Json` → compact JSON text.
//!
//! Output has no whitespace. Object members come out in key order (the
//! order of the backing `BTreeMap`), so equal documents serialize to equal
//! strings.
//!
//! Strings are escaped on the way out: `"` and `\`, the short escapes
//! `\b \f \n \r \t`, and `\u00XX` for the remaining control characters.
//! Everything else, including non-ASCII text, is written as is.
//!
//! Doubles always carry a fraction or an exponent (`2.0`, `1e21`) so that
//! re-parsing yields a `Double` again. NaN and infinities have no JSON
//! spelling and are written as `null`.

use std::fmt;

use crate::value::Json;

impl Json {
    /// Serializes this value to compact JSON.
    pub fn to_json_string(&self) -> String {
        let mut out = String::new();
        encode_value(self, &mut out);
        out
    }
}

impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json_string())
    }
}

fn encode_value(value: &Json, out: &mut String) {
    match value {
        Json::Null => out.push_str("null"),
        Json::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Json::Int(n) => out.push_str(&n.to_string()),
        Json::Double(n) => encode_double(*n, out),
        Json::String(s) => encode_string(s, out),
        Json::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                encode_value(item, out);
            }
            out.push(']');
        }
        Json::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                encode_string(key, out);
                out.push(':');
                encode_value(item, out);
            }
            out.push('}');
        }
    }
}

/// `{:?}` gives the shortest text that parses back to the same `f64` and
/// keeps a `.0` on integral values.
fn encode_double(n: f64, out: &mut String) {
    if n.is_finite() {
        out.push_str(&format!("{n:?}"));
    } else {
        out.push_str("null");
    }
}

fn encode_string(s: &str, out: &mut String) {
    out.reserve(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c < ' ' => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
