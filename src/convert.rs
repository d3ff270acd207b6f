//! Document tree to dynamic value conversion.
//!
//! The [`Converter`] walks a [`Table`] depth-first, pre-order. Every node is
//! converted and written into the *active container* before its children are
//! visited; containers are therefore built in place rather than assembled
//! from recursive return values.
//!
//! The active container is a [`Cursor`]: either a map together with the key
//! the next value goes under, or a sequence that values are appended to.
//! Entering a table or array writes a fresh empty container into the current
//! cursor and opens a child cursor on it. The child borrows the new container
//! only, so when it goes out of scope the parent cursor (container, pending
//! key and shape) is exactly as it was and sibling entries keep writing into
//! the right place, however deep the subtree went.
//!
//! The root table is not special-cased: it is written under a synthetic key
//! into a one-entry context map, and the map stored there is unwrapped at
//! the end.
//!
//! ## Examples
//!
//! ```rust
//! use tomlutil::document::{Node, Table};
//! use tomlutil::{Converter, FaultPolicy, Options};
//!
//! let mut root = Table::new();
//! root.push("ok", Node::Boolean(true));
//! root.push("odd", Node::Unsupported("<placeholder>".into()));
//!
//! let mut converter = Converter::new(&Options::new());
//! let map = converter.convert(&root).unwrap();
//! assert!(map.contains_key("ok"));
//! assert!(!map.contains_key("odd"));
//! assert_eq!(converter.skipped().len(), 1);
//!
//! let mut strict = Converter::with_policy(FaultPolicy::Strict);
//! assert!(strict.convert(&root).is_err());
//! ```

use crate::document::{Node, Table};
use crate::{Error, FaultPolicy, Map, Options, Result, Value};
use log::{trace, warn};
use std::fmt;

/// Key of the synthetic context the root table is written under.
const ROOT_KEY: &str = "TOMLRoot";

/// A contract violation the converter skipped under
/// [`FaultPolicy::BestEffort`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    /// A node with no value representation, in its textual form.
    Unsupported { path: String, node: String },
    /// A key written a second time; the first value was kept.
    DuplicateKey { path: String, key: String },
}

impl Fault {
    /// Dotted path of the offending node, e.g. `servers[1].ip`.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Fault::Unsupported { path, .. } | Fault::DuplicateKey { path, .. } => path,
        }
    }

    fn into_error(self) -> Error {
        match self {
            Fault::Unsupported { path, node } => Error::UnsupportedNode { path, node },
            Fault::DuplicateKey { path, key } => Error::DuplicateKey { path, key },
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Unsupported { path, node } => {
                write!(f, "unsupported node `{}` at `{}`", node, path)
            }
            Fault::DuplicateKey { path, key } => {
                write!(f, "duplicate key `{}` at `{}`", key, path)
            }
        }
    }
}

/// The active container values are written into.
enum Cursor<'a> {
    Map { map: &'a mut Map, pending_key: String },
    Sequence(&'a mut Vec<Value>),
}

impl<'a> Cursor<'a> {
    fn map(map: &'a mut Map) -> Self {
        Cursor::Map {
            map,
            pending_key: String::new(),
        }
    }

    fn sequence(seq: &'a mut Vec<Value>) -> Self {
        Cursor::Sequence(seq)
    }

    /// Sets the key for the next write. No-op for sequences.
    fn set_key(&mut self, key: &str) {
        if let Cursor::Map { pending_key, .. } = self {
            pending_key.clear();
            pending_key.push_str(key);
        }
    }

    /// The pending key, if writing would overwrite an existing entry.
    fn colliding_key(&self) -> Option<&str> {
        match self {
            Cursor::Map { map, pending_key } if map.contains_key(pending_key) => {
                Some(pending_key.as_str())
            }
            _ => None,
        }
    }

    /// Appends to a sequence or inserts under the pending key, and returns
    /// the slot the value landed in. An existing map entry is left as is.
    fn write(&mut self, value: Value) -> &mut Value {
        match self {
            Cursor::Map { map, pending_key } => map.entry(pending_key.clone()).or_insert(value),
            Cursor::Sequence(seq) => {
                let index = seq.len();
                seq.push(value);
                &mut seq[index]
            }
        }
    }
}

enum Segment {
    Key(String),
    Index(usize),
}

/// Converts document trees into [`Map`]s.
///
/// A converter carries no state between documents other than the faults
/// recorded by the last [`convert`](Converter::convert) call.
#[derive(Default)]
pub struct Converter {
    policy: FaultPolicy,
    path: Vec<Segment>,
    skipped: Vec<Fault>,
}

impl Converter {
    #[must_use]
    pub fn new(options: &Options) -> Self {
        Self::with_policy(options.fault_policy)
    }

    #[must_use]
    pub fn with_policy(policy: FaultPolicy) -> Self {
        Converter {
            policy,
            path: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Faults skipped during the last conversion, in traversal order.
    #[must_use]
    pub fn skipped(&self) -> &[Fault] {
        &self.skipped
    }

    /// Converts `root` into a map with the same keys in the same order.
    ///
    /// # Errors
    ///
    /// Under [`FaultPolicy::Strict`], returns [`Error::UnsupportedNode`] or
    /// [`Error::DuplicateKey`] for the first contract violation. Never fails
    /// under [`FaultPolicy::BestEffort`].
    pub fn convert(&mut self, root: &Table) -> Result<Map> {
        self.path.clear();
        self.skipped.clear();

        let mut context = Map::with_capacity(1);
        {
            let mut cursor = Cursor::map(&mut context);
            cursor.set_key(ROOT_KEY);
            self.visit_table(root, &mut cursor)?;
        }

        match context.remove(ROOT_KEY) {
            Some(Value::Map(map)) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    fn visit(&mut self, node: &Node, cursor: &mut Cursor<'_>) -> Result<()> {
        let value = match node {
            Node::Table(table) => return self.visit_table(table, cursor),
            Node::Array(items) => return self.visit_array(items, cursor),
            Node::TableArray(tables) => return self.visit_table_array(tables, cursor),
            Node::String(s) => Value::String(s.clone()),
            Node::Integer(i) => Value::Integer(*i),
            Node::Float(f) => Value::Float(*f),
            Node::Boolean(b) => Value::Boolean(*b),
            Node::LocalDate(date) => Value::DateTime(date.into()),
            Node::LocalTime(time) => Value::DateTime(time.into()),
            Node::LocalDateTime(dt) => Value::DateTime(dt.into()),
            Node::OffsetDateTime(dt) => Value::DateTime(dt.into()),
            Node::Unsupported(text) => {
                let fault = Fault::Unsupported {
                    path: self.path_string(),
                    node: text.clone(),
                };
                return self.fault(fault);
            }
        };
        self.write_value(cursor, value).map(drop)
    }

    fn visit_table(&mut self, table: &Table, cursor: &mut Cursor<'_>) -> Result<()> {
        trace!(
            "table at `{}` with {} entries",
            self.path_string(),
            table.len()
        );
        let Some(slot) = self.write_value(cursor, Value::Map(Map::with_capacity(table.len())))?
        else {
            return Ok(());
        };
        let Some(map) = slot.as_map_mut() else {
            return Ok(());
        };

        let mut child = Cursor::map(map);
        for (key, node) in table.iter() {
            child.set_key(key);
            self.path.push(Segment::Key(key.to_string()));
            let result = self.visit(node, &mut child);
            self.path.pop();
            result?;
        }
        Ok(())
    }

    fn visit_array(&mut self, items: &[Node], cursor: &mut Cursor<'_>) -> Result<()> {
        trace!("array at `{}` with {} items", self.path_string(), items.len());
        let Some(seq) = self.open_sequence(cursor, items.len())? else {
            return Ok(());
        };

        let mut child = Cursor::sequence(seq);
        for (index, node) in items.iter().enumerate() {
            self.path.push(Segment::Index(index));
            let result = self.visit(node, &mut child);
            self.path.pop();
            result?;
        }
        Ok(())
    }

    fn visit_table_array(&mut self, tables: &[Table], cursor: &mut Cursor<'_>) -> Result<()> {
        trace!(
            "table array at `{}` with {} tables",
            self.path_string(),
            tables.len()
        );
        let Some(seq) = self.open_sequence(cursor, tables.len())? else {
            return Ok(());
        };

        let mut child = Cursor::sequence(seq);
        for (index, table) in tables.iter().enumerate() {
            self.path.push(Segment::Index(index));
            let result = self.visit_table(table, &mut child);
            self.path.pop();
            result?;
        }
        Ok(())
    }

    fn open_sequence<'c>(
        &mut self,
        cursor: &'c mut Cursor<'_>,
        capacity: usize,
    ) -> Result<Option<&'c mut Vec<Value>>> {
        let slot = self.write_value(cursor, Value::Array(Vec::with_capacity(capacity)))?;
        Ok(slot.and_then(Value::as_array_mut))
    }

    fn write_value<'c>(
        &mut self,
        cursor: &'c mut Cursor<'_>,
        value: Value,
    ) -> Result<Option<&'c mut Value>> {
        if let Some(key) = cursor.colliding_key() {
            let fault = Fault::DuplicateKey {
                path: self.path_string(),
                key: key.to_string(),
            };
            self.fault(fault)?;
            return Ok(None);
        }
        Ok(Some(cursor.write(value)))
    }

    fn fault(&mut self, fault: Fault) -> Result<()> {
        match self.policy {
            FaultPolicy::Strict => Err(fault.into_error()),
            FaultPolicy::BestEffort => {
                warn!("skipping {}", fault);
                self.skipped.push(fault);
                Ok(())
            }
        }
    }

    fn path_string(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                Segment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                Segment::Index(index) => {
                    out.push('[');
                    out.push_str(&index.to_string());
                    out.push(']');
                }
            }
        }
        out
    }
}

/// Converts `root` with the default best-effort policy.
///
/// Unsupported nodes and duplicate keys are logged and left out of the
/// result; use a [`Converter`] to inspect them or to fail instead.
///
/// # Examples
///
/// ```rust
/// use tomlutil::document::{Node, Table};
///
/// let mut root = Table::new();
/// root.push("answer", Node::Integer(42));
///
/// let map = tomlutil::convert(&root);
/// assert_eq!(map.get("answer").and_then(|v| v.as_i64()), Some(42));
/// ```
#[must_use]
pub fn convert(root: &Table) -> Map {
    Converter::default().convert(root).unwrap_or_default()
}
