//! Debug rendering of a document tree in the JSON shape used by the
//! [toml-test](https://github.com/toml-lang/toml-test) suite.
//!
//! Every leaf becomes `{"type": ..., "value": ...}` with the value as a
//! string; tables become objects and arrays (including arrays of tables)
//! become bare JSON arrays. Keys and leaf strings are quoted by `serde_json`.
//!
//! ## Examples
//!
//! ```rust
//! use tomlutil::document::{Node, Table};
//! use tomlutil::json::render;
//!
//! let mut root = Table::new();
//! root.push("n", Node::Integer(1));
//! assert_eq!(render(&root).unwrap(), r#"{"n":{"type":"integer","value":"1"}}"#);
//! ```

use crate::document::{Node, Table};
use crate::{Error, Result};
use std::io::Write;

/// Renders `root` as a JSON object.
///
/// # Errors
///
/// Only fails if the output cannot be written, which an in-memory buffer
/// never does.
pub fn render(root: &Table) -> Result<String> {
    let mut out = Vec::new();
    write_table(&mut out, root).map_err(|e| Error::io(&e.to_string()))?;
    String::from_utf8(out).map_err(Error::encode)
}

/// Writes the rendering of `table` to `out`.
///
/// # Errors
///
/// Returns the sink's I/O error.
pub fn write_table<W>(out: &mut W, table: &Table) -> serde_json::Result<()>
where
    W: ?Sized + Write,
{
    raw(out, "{")?;
    for (i, (key, node)) in table.iter().enumerate() {
        if i > 0 {
            raw(out, ",")?;
        }
        serde_json::to_writer(&mut *out, key)?;
        raw(out, ":")?;
        write_node(out, node)?;
    }
    raw(out, "}")
}

fn write_node<W>(out: &mut W, node: &Node) -> serde_json::Result<()>
where
    W: ?Sized + Write,
{
    match node {
        Node::Table(table) => write_table(out, table),
        Node::Array(items) => {
            raw(out, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    raw(out, ",")?;
                }
                write_node(out, item)?;
            }
            raw(out, "]")
        }
        Node::TableArray(tables) => {
            raw(out, "[")?;
            for (i, table) in tables.iter().enumerate() {
                if i > 0 {
                    raw(out, ",")?;
                }
                write_table(out, table)?;
            }
            raw(out, "]")
        }
        Node::String(s) => write_leaf(out, "string", s),
        Node::Integer(i) => write_leaf(out, "integer", &i.to_string()),
        Node::Float(f) => write_leaf(out, "float", &float_text(*f)),
        Node::Boolean(b) => write_leaf(out, "bool", if *b { "true" } else { "false" }),
        Node::LocalDate(date) => write_leaf(out, "date-local", &date.to_string()),
        Node::LocalTime(time) => write_leaf(out, "time-local", &time.to_string()),
        Node::LocalDateTime(dt) => write_leaf(out, "datetime-local", &dt.to_string()),
        Node::OffsetDateTime(dt) => write_leaf(out, "datetime", &dt.to_string()),
        Node::Unsupported(text) => write_leaf(out, "unsupported", text),
    }
}

fn write_leaf<W>(out: &mut W, kind: &str, value: &str) -> serde_json::Result<()>
where
    W: ?Sized + Write,
{
    raw(out, "{\"type\":")?;
    serde_json::to_writer(&mut *out, kind)?;
    raw(out, ",\"value\":")?;
    serde_json::to_writer(&mut *out, value)?;
    raw(out, "}")
}

fn raw<W>(out: &mut W, text: &str) -> serde_json::Result<()>
where
    W: ?Sized + Write,
{
    out.write_all(text.as_bytes()).map_err(serde_json::Error::io)
}

fn float_text(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f == f64::INFINITY {
        "inf".to_string()
    } else if f == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:?}", f)
    }
}
