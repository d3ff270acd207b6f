//! The parsed document tree.
//!
//! [`Node`] is the closed set of node kinds the converter understands. Any
//! TOML parser is adapted to it at the boundary (see [`crate::parse`] for the
//! `toml_edit` adapter), so the traversal in [`crate::convert`] and the debug
//! writer in [`crate::json`] are written once against this type.
//!
//! Date and time leaves keep the shape parsers commonly hand out: a
//! zero-based month and sub-second precision split into milli-, micro- and
//! nanoseconds. [`crate::datetime`] normalizes them.
//!
//! ## Examples
//!
//! ```rust
//! use tomlutil::document::{Node, Table};
//!
//! let mut server = Table::new();
//! server.push("host", Node::String("localhost".into()));
//! server.push("port", Node::Integer(8080));
//!
//! let mut root = Table::new();
//! root.push("server", Node::Table(server));
//!
//! let map = tomlutil::convert(&root);
//! assert_eq!(map.get("server").and_then(|s| s.get("port")).and_then(|p| p.as_i64()), Some(8080));
//! ```

use std::fmt;

/// A calendar date as delivered by a parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocalDate {
    pub year: u16,
    /// Zero-based month: January is `0`.
    pub month: u8,
    pub day: u8,
}

/// A wall-clock time with split sub-second precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct LocalTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
    pub microsecond: u16,
    pub nanosecond: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocalDateTime {
    pub date: LocalDate,
    pub time: LocalTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OffsetDateTime {
    pub date: LocalDate,
    pub time: LocalTime,
    /// Signed distance from UTC in minutes.
    pub offset_minutes: i16,
}

impl LocalTime {
    /// Splits a nanosecond fraction into milli-, micro- and nanosecond parts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tomlutil::document::LocalTime;
    ///
    /// let t = LocalTime::with_nanos(10, 30, 0, 1_002_003);
    /// assert_eq!((t.millisecond, t.microsecond, t.nanosecond), (1, 2, 3));
    /// ```
    #[must_use]
    pub fn with_nanos(hour: u8, minute: u8, second: u8, nanos: u32) -> Self {
        LocalTime {
            hour,
            minute,
            second,
            millisecond: (nanos / 1_000_000 % 1_000) as u16,
            microsecond: (nanos / 1_000 % 1_000) as u16,
            nanosecond: (nanos % 1_000) as u16,
        }
    }

    /// Recombines the split sub-second parts into nanoseconds.
    #[must_use]
    pub fn total_nanos(&self) -> u32 {
        u32::from(self.millisecond)
            .saturating_mul(1_000_000)
            .saturating_add(u32::from(self.microsecond) * 1_000)
            .saturating_add(u32::from(self.nanosecond))
    }
}

impl fmt::Display for LocalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.year,
            u16::from(self.month) + 1,
            self.day
        )
    }
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        write_fraction(f, self.total_nanos())
    }
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)
    }
}

impl fmt::Display for OffsetDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)?;
        write_offset(f, self.offset_minutes)
    }
}

/// Writes `.fffffffff` with trailing zeros trimmed, or nothing for zero.
pub(crate) fn write_fraction(f: &mut impl fmt::Write, nanos: u32) -> fmt::Result {
    if nanos == 0 {
        return Ok(());
    }
    let digits = format!("{:09}", nanos);
    write!(f, ".{}", digits.trim_end_matches('0'))
}

/// Writes `Z` for UTC, otherwise `+hh:mm` / `-hh:mm`.
pub(crate) fn write_offset(f: &mut impl fmt::Write, minutes: i16) -> fmt::Result {
    if minutes == 0 {
        return f.write_char('Z');
    }
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.unsigned_abs();
    write!(f, "{}{:02}:{:02}", sign, abs / 60, abs % 60)
}

/// An ordered table of document nodes.
///
/// Entries keep source order. Parsers guarantee unique keys; a hand-built
/// table may break that, which the converter reports as a contract fault.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Table {
    entries: Vec<(String, Node)>,
}

impl Table {
    #[must_use]
    pub fn new() -> Self {
        Table {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Table {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends an entry after the existing ones.
    pub fn push(&mut self, key: impl Into<String>, node: Node) {
        self.entries.push((key.into(), node));
    }

    /// Returns the first node stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in source order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, node)| (k.as_str(), node))
    }
}

impl FromIterator<(String, Node)> for Table {
    fn from_iter<T: IntoIterator<Item = (String, Node)>>(iter: T) -> Self {
        Table {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A node of the parsed document.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Table(Table),
    Array(Vec<Node>),
    /// An array of tables (`[[name]]`).
    TableArray(Vec<Table>),
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    LocalDate(LocalDate),
    LocalTime(LocalTime),
    LocalDateTime(LocalDateTime),
    OffsetDateTime(OffsetDateTime),
    /// Something the adapter could not express, kept in its textual form.
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> LocalDate {
        LocalDate {
            year: 1979,
            month: 4,
            day: 27,
        }
    }

    #[test]
    fn test_display_uses_one_based_month() {
        assert_eq!(date().to_string(), "1979-05-27");
    }

    #[test]
    fn test_time_fraction_is_trimmed() {
        let t = LocalTime::with_nanos(7, 32, 0, 999_000_000);
        assert_eq!(t.to_string(), "07:32:00.999");
        assert_eq!(LocalTime::with_nanos(7, 32, 0, 0).to_string(), "07:32:00");
    }

    #[test]
    fn test_offset_display() {
        let dt = OffsetDateTime {
            date: date(),
            time: LocalTime::with_nanos(0, 32, 0, 0),
            offset_minutes: -420,
        };
        assert_eq!(dt.to_string(), "1979-05-27T00:32:00-07:00");

        let utc = OffsetDateTime {
            offset_minutes: 0,
            ..dt
        };
        assert_eq!(utc.to_string(), "1979-05-27T00:32:00Z");
    }

    #[test]
    fn test_table_keeps_order() {
        let table: Table = vec![
            ("b".to_string(), Node::Integer(1)),
            ("a".to_string(), Node::Integer(2)),
        ]
        .into_iter()
        .collect();
        let keys: Vec<_> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(table.get("a"), Some(&Node::Integer(2)));
        assert!(table.get("c").is_none());
    }
}
