//! TOML serialization.
//!
//! Two pieces live here:
//!
//! - [`Serializer`] writes a [`Map`] out as TOML text through a
//!   [`toml_edit::DocumentMut`].
//! - [`ValueSerializer`] is a serde serializer that turns any
//!   `T: Serialize` into a [`Value`]; [`crate::to_value`] and the
//!   `to_string*` functions go through it.
//!
//! ## Layout
//!
//! Nested maps become `[table]` sections and non-empty arrays made only of
//! maps become `[[array]]` sections. Every other array is written inline,
//! with maps inside it as inline tables. A table's plain keys are always
//! written before its sub-tables, so a map whose keys interleave the two
//! reads back with the sub-tables moved last.
//!
//! ## Usage
//!
//! ```rust
//! use tomlutil::ser::Serializer;
//! use tomlutil::{toml_value, Options};
//!
//! let value = toml_value!({
//!     "title": "demo",
//!     "owner": { "name": "Tom" }
//! });
//! let map = value.as_map().unwrap();
//!
//! let text = Serializer::new(Options::new()).to_string(map).unwrap();
//! assert_eq!(text, "title = \"demo\"\n\n[owner]\nname = \"Tom\"\n");
//! ```

use crate::datetime::NEWTYPE_NAME;
use crate::{DateTime, Error, Map, Options, Result, Value};
use log::debug;
use serde::ser::{self, Serialize};
use toml_edit::{Array, ArrayOfTables, DocumentMut, InlineTable, Item, Table};

/// The TOML writer.
///
/// Created via [`Serializer::new`] with the output [`Options`].
pub struct Serializer {
    options: Options,
    check_dates: bool,
}

impl Serializer {
    #[must_use]
    pub fn new(options: Options) -> Self {
        Serializer {
            options,
            check_dates: true,
        }
    }

    /// Renders `value` as an inline TOML literal. Date-times are written
    /// field by field even when out of range.
    pub(crate) fn inline(value: &Value) -> Result<toml_edit::Value> {
        Serializer {
            options: Options::new(),
            check_dates: false,
        }
        .value(value, 0)
    }

    /// Builds an editable document from `map`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] for a date-time with out-of-range fields.
    pub fn to_document(&self, map: &Map) -> Result<DocumentMut> {
        let mut document = DocumentMut::new();
        *document.as_table_mut() = self.table(map)?;
        Ok(document)
    }

    /// Writes `map` as TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] for a date-time with out-of-range fields.
    pub fn to_string(&self, map: &Map) -> Result<String> {
        debug!("encoding table with {} keys", map.len());
        Ok(self.to_document(map)?.to_string())
    }

    fn table(&self, map: &Map) -> Result<Table> {
        let mut table = Table::new();
        for (key, value) in map {
            table.insert(key, self.item(value)?);
        }
        Ok(table)
    }

    fn item(&self, value: &Value) -> Result<Item> {
        match value {
            Value::Map(map) => Ok(Item::Table(self.table(map)?)),
            Value::Array(items) if is_table_array(items) => {
                let mut tables = ArrayOfTables::new();
                for item in items {
                    if let Value::Map(map) = item {
                        tables.push(self.table(map)?);
                    }
                }
                Ok(Item::ArrayOfTables(tables))
            }
            _ => Ok(Item::Value(self.value(value, 0)?)),
        }
    }

    /// `depth` counts enclosing inline arrays and tables.
    fn value(&self, value: &Value, depth: usize) -> Result<toml_edit::Value> {
        Ok(match value {
            Value::String(s) => toml_edit::Value::from(s.as_str()),
            Value::Integer(i) => toml_edit::Value::from(*i),
            Value::Float(f) => toml_edit::Value::from(*f),
            Value::Boolean(b) => toml_edit::Value::from(*b),
            Value::DateTime(dt) if self.check_dates => toml_edit::Value::from(dt.to_toml()?),
            Value::DateTime(dt) => toml_edit::Value::from(dt.to_toml_unchecked()),
            Value::Array(items) => {
                let mut array = Array::new();
                for item in items {
                    array.push(self.value(item, depth + 1)?);
                }
                if self.options.pretty && !array.is_empty() {
                    self.spread(&mut array, depth + 1);
                }
                toml_edit::Value::Array(array)
            }
            Value::Map(map) => {
                let mut table = InlineTable::new();
                for (key, item) in map {
                    table.insert(key.as_str(), self.value(item, depth + 1)?);
                }
                toml_edit::Value::InlineTable(table)
            }
        })
    }

    /// Puts each element of `array` on its own line.
    fn spread(&self, array: &mut Array, depth: usize) {
        let indent = " ".repeat(self.options.indent * depth);
        for element in array.iter_mut() {
            element.decor_mut().set_prefix(format!("\n{}", indent));
            element.decor_mut().set_suffix("");
        }
        let closing = " ".repeat(self.options.indent * depth.saturating_sub(1));
        array.set_trailing(format!("\n{}", closing));
        array.set_trailing_comma(true);
    }
}

fn is_table_array(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(Value::is_map)
}

/// Serde serializer producing a [`Value`].
///
/// TOML has no null: `None` and `()` are rejected with
/// [`Error::UnsupportedNone`], except as struct fields or map values, which
/// are left out instead.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: Map,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

fn integer<T>(v: T) -> Result<Value>
where
    T: Copy + std::fmt::Display + TryInto<i64>,
{
    v.try_into()
        .map(Value::Integer)
        .map_err(|_| Error::encode(format!("unsupported numeric range: {}", v)))
}

/// Wraps `value` as `{ variant = value }`.
fn tagged(variant: &'static str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(variant.to_string(), value);
    Value::Map(map)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        integer(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        integer(v)
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        integer(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Array(
            v.iter().map(|&b| Value::Integer(i64::from(b))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Value> {
        Err(Error::UnsupportedNone)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Err(Error::UnsupportedNone)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Err(Error::UnsupportedNone)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let value = value.serialize(self)?;
        match value {
            Value::String(s) if name == NEWTYPE_NAME => {
                let dt = s.parse::<DateTime>().map_err(|err| match err {
                    Error::Custom(msg) => Error::Encode(msg),
                    other => other,
                })?;
                dt.validate()?;
                Ok(Value::DateTime(dt))
            }
            other => Ok(other),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0), None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        let array = Value::Array(self.vec);
        match self.variant {
            Some(variant) => tagged(variant, array),
            None => array,
        }
    }
}

impl SerializeMap {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: Map::with_capacity(capacity),
            current_key: None,
            variant,
        }
    }

    /// Inserts `value` under `key`, leaving out `None` and unit values.
    fn insert<T>(&mut self, key: String, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(value) {
            Ok(value) => {
                self.map.insert(key, value);
                Ok(())
            }
            Err(Error::UnsupportedNone) => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn finish(self) -> Value {
        let map = Value::Map(self.map);
        match self.variant {
            Some(variant) => tagged(variant, map),
            None => map,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            Value::Integer(i) => {
                self.current_key = Some(i.to_string());
                Ok(())
            }
            other => Err(Error::encode(format!(
                "table keys must be strings, found {}",
                other.type_name()
            ))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

pub(crate) fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    fn map(value: Value) -> Map {
        match value {
            Value::Map(map) => map,
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_struct_skips_none_fields() {
        #[derive(Serialize)]
        struct Config {
            name: String,
            nickname: Option<String>,
            port: Option<u16>,
        }

        let value = to_value(&Config {
            name: "db".into(),
            nickname: None,
            port: Some(5432),
        })
        .unwrap();
        let keys: Vec<_> = map(value).keys().cloned().collect();
        assert_eq!(keys, vec!["name", "port"]);
    }

    #[test]
    fn test_bare_none_is_rejected() {
        assert_eq!(to_value(&None::<i32>), Err(Error::UnsupportedNone));
        assert_eq!(to_value(&()), Err(Error::UnsupportedNone));
        assert!(to_value(&vec![Some(1), None]).is_err());
    }

    #[test]
    fn test_integer_range() {
        assert_eq!(to_value(&(i64::MAX as u64)), Ok(Value::Integer(i64::MAX)));
        let err = to_value(&u64::MAX).unwrap_err();
        assert!(err.to_string().contains("unsupported numeric range"));
        assert!(to_value(&i128::MIN).is_err());
        assert_eq!(to_value(&-5i128), Ok(Value::Integer(-5)));
    }

    #[test]
    fn test_enum_variants() {
        #[derive(Serialize)]
        enum Shape {
            Empty,
            Circle(f64),
            Point(i32, i32),
            Rect { w: i32, h: i32 },
        }

        assert_eq!(to_value(&Shape::Empty), Ok(Value::from("Empty")));

        let circle = map(to_value(&Shape::Circle(1.5)).unwrap());
        assert_eq!(circle.get("Circle"), Some(&Value::Float(1.5)));

        let point = map(to_value(&Shape::Point(1, 2)).unwrap());
        assert_eq!(
            point.get("Point"),
            Some(&Value::Array(vec![Value::Integer(1), Value::Integer(2)]))
        );

        let rect = map(to_value(&Shape::Rect { w: 3, h: 4 }).unwrap());
        assert_eq!(rect.get("Rect").and_then(|r| r.get("h")), Some(&Value::Integer(4)));
    }

    #[test]
    fn test_datetime_stays_datetime() {
        let dt = DateTime::local_date(1979, 5, 27);
        assert_eq!(to_value(&dt), Ok(Value::DateTime(dt)));
    }

    #[test]
    fn test_invalid_datetime_is_an_encode_error() {
        for bad in [
            DateTime::local_date(2024, 2, 32),
            DateTime::local_date(2023, 2, 29),
            DateTime::local_date(10000, 1, 1),
            DateTime::local_time(25, 0, 0, 0),
        ] {
            let err = to_value(&bad).unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::Encode, "{bad:?}");
        }
    }

    #[test]
    fn test_map_keys() {
        let mut source = BTreeMap::new();
        source.insert(1, "one");
        let value = map(to_value(&source).unwrap());
        assert_eq!(value.get("1"), Some(&Value::from("one")));

        let mut bad = BTreeMap::new();
        bad.insert(true, 1);
        assert_eq!(to_value(&bad).unwrap_err().kind(), crate::ErrorKind::Encode);
    }

    #[test]
    fn test_writer_table_arrays() {
        let mut first = Map::new();
        first.insert("name".into(), Value::from("a"));
        let mut second = Map::new();
        second.insert("name".into(), Value::from("b"));

        let mut root = Map::new();
        root.insert(
            "items".into(),
            Value::Array(vec![Value::Map(first), Value::Map(second)]),
        );
        root.insert("empty".into(), Value::Array(vec![]));

        let text = Serializer::new(Options::new()).to_string(&root).unwrap();
        assert!(text.contains("empty = []"));
        assert!(text.contains("[[items]]\nname = \"a\"\n\n[[items]]\nname = \"b\"\n"));
    }

    #[test]
    fn test_writer_mixed_array_is_inline() {
        let mut inner = Map::new();
        inner.insert("x".into(), Value::Integer(1));
        let mut root = Map::new();
        root.insert(
            "mixed".into(),
            Value::Array(vec![Value::Integer(0), Value::Map(inner)]),
        );

        let text = Serializer::new(Options::new()).to_string(&root).unwrap();
        assert_eq!(text, "mixed = [0, { x = 1 }]\n");
    }

    #[test]
    fn test_writer_pretty_arrays() {
        let mut root = Map::new();
        root.insert(
            "ports".into(),
            Value::Array(vec![Value::Integer(80), Value::Integer(443)]),
        );

        let text = Serializer::new(Options::pretty()).to_string(&root).unwrap();
        assert_eq!(text, "ports = [\n    80,\n    443,\n]\n");
    }

    #[test]
    fn test_writer_rejects_bad_datetime() {
        let mut root = Map::new();
        root.insert(
            "when".into(),
            Value::DateTime(DateTime::local_time(25, 0, 0, 0)),
        );
        let err = Serializer::new(Options::new()).to_string(&root).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Encode);
        assert!(err.to_string().contains("hour"));

        let mut root = Map::new();
        root.insert(
            "feb".into(),
            Value::DateTime(DateTime::local_date(2023, 2, 30)),
        );
        let err = Serializer::new(Options::new()).to_string(&root).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Encode);
    }
}
