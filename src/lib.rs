//! # tomlutil
//!
//! Turns TOML documents into an ordered, dynamically-typed value tree and
//! back.
//!
//! A document goes through three stages:
//!
//! 1. [`parse`] reads the text with `toml_edit` into a [`document::Table`],
//!    a closed tree of node kinds.
//! 2. A [`Converter`] walks that tree once and builds a [`Map`]: tables
//!    become maps, arrays and `[[arrays of tables]]` become
//!    [`Value::Array`], and the four date/time flavors become one
//!    [`DateTime`] record.
//! 3. The caller owns the resulting [`Map`].
//!
//! Keys keep the order they have in the source file.
//!
//! ## Quick Start
//!
//! ```rust
//! use tomlutil::{from_str, Value};
//!
//! let map = from_str(r#"
//! title = "example"
//!
//! [owner]
//! name = "Tom"
//! dob = 1979-05-27T07:32:00-08:00
//!
//! [[products]]
//! name = "Hammer"
//!
//! [[products]]
//! name = "Nail"
//! "#).unwrap();
//!
//! let keys: Vec<_> = map.keys().cloned().collect();
//! assert_eq!(keys, vec!["title", "owner", "products"]);
//!
//! let dob = map.get("owner").and_then(|o| o.get("dob")).and_then(Value::as_datetime).unwrap();
//! assert_eq!(dob.offset, Some(-480));
//!
//! let products = map.get("products").and_then(Value::as_array).unwrap();
//! assert_eq!(products[1].get("name").and_then(Value::as_str), Some("Nail"));
//! ```
//!
//! ### Typed access
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use tomlutil::{from_str, from_value, to_string, Value};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! let server = Server { host: "localhost".into(), port: 8080 };
//! let text = to_string(&server).unwrap();
//! assert_eq!(text, "host = \"localhost\"\nport = 8080\n");
//!
//! let back: Server = from_value(Value::Map(from_str(&text).unwrap())).unwrap();
//! assert_eq!(back, server);
//! ```
//!
//! ### toml-test output
//!
//! ```rust
//! let json = tomlutil::to_debug_json("a = 1").unwrap();
//! assert_eq!(json, r#"{"a":{"type":"integer","value":"1"}}"#);
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and installs no logger.
//! Skipped nodes are reported at `warn`, container entry during conversion
//! at `trace`.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - parse, inspect and write back a document
//! - **`macro.rs`** - building values with `toml_value!`
//! - **`dynamic_values.rs`** - walking a value tree of unknown shape
//! - **`custom_options.rs`** - strict conversion and pretty output
//! - **`toml_test_json.rs`** - toml-test decoder reading stdin
//!
//! Run any example with: `cargo run --example <name>`

pub mod convert;
pub mod datetime;
pub mod de;
pub mod document;
pub mod error;
pub mod json;
pub mod macros;
pub mod map;
pub mod options;
pub mod parse;
pub mod ser;
pub mod value;

pub use convert::{convert, Converter, Fault};
pub use datetime::{DateTime, DateTimeKind};
pub use de::{from_value, ValueDeserializer};
pub use error::{Error, ErrorKind, Result, ERROR_DOMAIN};
pub use map::Map;
pub use options::{FaultPolicy, Options};
pub use ser::{Serializer, ValueSerializer};
pub use value::Value;

use serde::Serialize;
use std::io;

/// Parses TOML text into an ordered map.
///
/// Conversion uses [`FaultPolicy::BestEffort`]; see
/// [`from_str_with_options`] to change that.
///
/// # Examples
///
/// ```rust
/// use tomlutil::from_str;
///
/// let map = from_str("[a.b.c]\nv = 1").unwrap();
/// let v = map.get("a").and_then(|a| a.get("b")).and_then(|b| b.get("c")).and_then(|c| c.get("v"));
/// assert_eq!(v.and_then(|v| v.as_i64()), Some(1));
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] with line and column for malformed TOML.
pub fn from_str(s: &str) -> Result<Map> {
    from_str_with_options(s, &Options::default())
}

/// Parses TOML text with explicit conversion options.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed TOML, and under
/// [`FaultPolicy::Strict`] a contract error for a node the converter
/// cannot express.
pub fn from_str_with_options(s: &str, options: &Options) -> Result<Map> {
    let root = parse::parse(s)?;
    Converter::new(options).convert(&root)
}

/// Parses TOML from bytes.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the bytes are not UTF-8 or not valid TOML.
pub fn from_slice(v: &[u8]) -> Result<Map> {
    let root = parse::parse_slice(v)?;
    Converter::default().convert(&root)
}

/// Reads a TOML document from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
///
/// let map = tomlutil::from_reader(Cursor::new(b"x = 1\ny = 2")).unwrap();
/// assert_eq!(map.len(), 2);
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise as [`from_slice`].
pub fn from_reader<R>(mut reader: R) -> Result<Map>
where
    R: io::Read,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&bytes)
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use tomlutil::to_value;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: Option<i32> }
///
/// let value = to_value(&Point { x: 1, y: None }).unwrap();
/// assert!(value.is_map());
/// assert!(value.get("y").is_none());
/// ```
///
/// # Errors
///
/// Returns [`Error::Encode`] for integers outside the `i64` range and
/// [`Error::UnsupportedNone`] for a bare `None` or `()`.
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    ser::to_value(value)
}

/// Serialize any `T: Serialize` to a TOML string.
///
/// The value must serialize to a table: a struct, a map, or a [`Map`].
///
/// # Errors
///
/// Returns [`Error::Encode`] if the top level is not a table or a value has
/// no TOML representation.
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, Options::default())
}

/// Like [`to_string`], with every inline array spread one element per line.
///
/// # Examples
///
/// ```rust
/// use tomlutil::{toml_value, to_string_pretty};
///
/// let text = to_string_pretty(&toml_value!({ "ports": [80, 443] })).unwrap();
/// assert_eq!(text, "ports = [\n    80,\n    443,\n]\n");
/// ```
///
/// # Errors
///
/// As [`to_string`].
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, Options::pretty())
}

/// Serialize any `T: Serialize` to a TOML string with custom options.
///
/// # Errors
///
/// As [`to_string`].
pub fn to_string_with_options<T>(value: &T, options: Options) -> Result<String>
where
    T: ?Sized + Serialize,
{
    match to_value(value)? {
        Value::Map(map) => Serializer::new(options).to_string(&map),
        other => Err(Error::encode(format!(
            "top-level value must be a table, found {}",
            other.type_name()
        ))),
    }
}

/// Serialize any `T: Serialize` to TOML bytes.
///
/// # Errors
///
/// As [`to_string`].
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_string(value).map(String::into_bytes)
}

/// Serialize any `T: Serialize` as TOML into a writer.
///
/// # Errors
///
/// As [`to_string`], plus [`Error::Io`] if writing fails.
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Parses TOML text and renders the document tree in toml-test JSON.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed TOML.
pub fn to_debug_json(s: &str) -> Result<String> {
    let root = parse::parse(s)?;
    json::render(&root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    fn user() -> User {
        User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
        }
    }

    #[test]
    fn test_serialize_deserialize_user() {
        let text = to_string(&user()).unwrap();
        let back: User = from_value(Value::Map(from_str(&text).unwrap())).unwrap();
        assert_eq!(back, user());
    }

    #[test]
    fn test_pretty_printing() {
        let text = to_string_pretty(&user()).unwrap();
        assert!(text.contains("tags = [\n    \"admin\",\n    \"user\",\n]"));
        let back: User = from_value(Value::Map(from_str(&text).unwrap())).unwrap();
        assert_eq!(back, user());
    }

    #[test]
    fn test_top_level_must_be_table() {
        let err = to_string(&vec![1, 2, 3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encode);
        assert!(to_string(&42).is_err());
    }

    #[test]
    fn test_writer_and_vec_agree() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &user()).unwrap();
        assert_eq!(buffer, to_vec(&user()).unwrap());
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        let err = from_slice(b"name = \"\xc3\x28\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_parse_error_has_position() {
        let err = from_str("title = \"x\"\n[broken\n").unwrap_err();
        match err {
            Error::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_debug_json() {
        let json = to_debug_json("[[a]]\nb = true").unwrap();
        assert_eq!(json, r#"{"a":[{"b":{"type":"bool","value":"true"}}]}"#);
        assert!(to_debug_json("= 1").is_err());
    }
}
