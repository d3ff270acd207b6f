//! `toml_edit` adapter.
//!
//! Parses TOML text with [`toml_edit`] and lowers the result into a
//! [`document::Table`](crate::document::Table). Inline tables become plain
//! tables and `[[name]]` sections become table arrays; formatting and
//! comments are dropped.

use crate::document::{LocalDate, LocalDateTime, LocalTime, Node, OffsetDateTime, Table};
use crate::{Error, Result};
use log::debug;
use toml_edit::{Datetime, DocumentMut, Item, Offset, Value as TomlValue};

/// Parses `input` into a document tree.
///
/// # Errors
///
/// Returns [`Error::Parse`] with the line and column of the first syntax
/// error.
///
/// # Examples
///
/// ```rust
/// use tomlutil::document::Node;
/// use tomlutil::parse::parse;
///
/// let root = parse("[server]\nport = 8080").unwrap();
/// assert!(matches!(root.get("server"), Some(Node::Table(_))));
///
/// assert!(parse("port = ").is_err());
/// ```
pub fn parse(input: &str) -> Result<Table> {
    debug!("parsing {} bytes of TOML", input.len());
    let document = input
        .parse::<DocumentMut>()
        .map_err(|err| Error::from_toml(input, &err))?;
    Ok(lower_table(document.as_table().iter()))
}

/// Parses raw bytes, rejecting invalid UTF-8 as a parse error.
pub fn parse_slice(bytes: &[u8]) -> Result<Table> {
    match std::str::from_utf8(bytes) {
        Ok(input) => parse(input),
        Err(err) => {
            let valid = std::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or_default();
            let line = valid.matches('\n').count() + 1;
            let line_start = valid.rfind('\n').map_or(0, |i| i + 1);
            let col = valid[line_start..].chars().count() + 1;
            Err(Error::parse(
                line,
                col,
                "invalid UTF-8 sequence",
                &valid[line_start..],
            ))
        }
    }
}

fn lower_table<'a, I>(entries: I) -> Table
where
    I: Iterator<Item = (&'a str, &'a Item)>,
{
    let mut table = Table::with_capacity(entries.size_hint().0);
    for (key, item) in entries {
        table.push(key, lower_item(item));
    }
    table
}

fn lower_item(item: &Item) -> Node {
    match item {
        Item::Value(value) => lower_value(value),
        Item::Table(table) => Node::Table(lower_table(table.iter())),
        Item::ArrayOfTables(tables) => Node::TableArray(
            tables
                .iter()
                .map(|table| lower_table(table.iter()))
                .collect(),
        ),
        // Only a removed entry is `None`; a freshly parsed document has none.
        Item::None => Node::Unsupported("<none>".to_string()),
    }
}

fn lower_value(value: &TomlValue) -> Node {
    match value {
        TomlValue::String(s) => Node::String(s.value().clone()),
        TomlValue::Integer(i) => Node::Integer(*i.value()),
        TomlValue::Float(f) => Node::Float(*f.value()),
        TomlValue::Boolean(b) => Node::Boolean(*b.value()),
        TomlValue::Datetime(dt) => lower_datetime(dt.value()),
        TomlValue::Array(array) => Node::Array(array.iter().map(lower_value).collect()),
        TomlValue::InlineTable(table) => {
            let mut lowered = Table::with_capacity(table.len());
            for (key, value) in table.iter() {
                lowered.push(key, lower_value(value));
            }
            Node::Table(lowered)
        }
    }
}

fn lower_datetime(dt: &Datetime) -> Node {
    let date = dt.date.map(|d| LocalDate {
        year: d.year,
        month: d.month.saturating_sub(1),
        day: d.day,
    });
    let time = dt
        .time
        .map(|t| LocalTime::with_nanos(t.hour, t.minute, t.second, t.nanosecond));

    match (date, time, dt.offset) {
        (Some(date), Some(time), Some(offset)) => Node::OffsetDateTime(OffsetDateTime {
            date,
            time,
            offset_minutes: offset_minutes(offset),
        }),
        (Some(date), Some(time), None) => Node::LocalDateTime(LocalDateTime { date, time }),
        (Some(date), None, None) => Node::LocalDate(date),
        (None, Some(time), None) => Node::LocalTime(time),
        _ => Node::Unsupported(dt.to_string()),
    }
}

fn offset_minutes(offset: Offset) -> i16 {
    match offset {
        Offset::Z => 0,
        Offset::Custom { minutes } => minutes,
    }
}
