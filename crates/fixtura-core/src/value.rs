use std::net::IpAddr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use serde_json::{Map as JsonMap, Number, Value as Json};
use uuid::Uuid;

use crate::types::{ScalarKind, TypeRef};

/// Generated value for any requested type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    U8(u8),
    I8(i8),
    Char(char),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(f64),
    Text(String),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
    TimeSpan(TimeDelta),
    Uuid(Uuid),
    IpAddr(IpAddr),
    Uri(String),
    Enum { type_name: String, variant: String },
    List(Vec<Value>),
    Set(Vec<Value>),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Record(Record),
    Object(Object),
    Table(DataTable),
    TableSet(DataSet),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Scalar kind of a primitive value.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        let kind = match self {
            Value::Bool(_) => ScalarKind::Bool,
            Value::U8(_) => ScalarKind::U8,
            Value::I8(_) => ScalarKind::I8,
            Value::Char(_) => ScalarKind::Char,
            Value::I16(_) => ScalarKind::I16,
            Value::U16(_) => ScalarKind::U16,
            Value::I32(_) => ScalarKind::I32,
            Value::U32(_) => ScalarKind::U32,
            Value::I64(_) => ScalarKind::I64,
            Value::U64(_) => ScalarKind::U64,
            Value::F32(_) => ScalarKind::F32,
            Value::F64(_) => ScalarKind::F64,
            Value::Decimal(_) => ScalarKind::Decimal,
            Value::Text(_) => ScalarKind::String,
            Value::DateTime(_) => ScalarKind::DateTime,
            Value::DateTimeOffset(_) => ScalarKind::DateTimeOffset,
            Value::TimeSpan(_) => ScalarKind::TimeSpan,
            Value::Uuid(_) => ScalarKind::Uuid,
            Value::IpAddr(_) => ScalarKind::IpAddr,
            Value::Uri(_) => ScalarKind::Uri,
            _ => return None,
        };
        Some(kind)
    }

    /// Type of the value as observed at runtime.
    ///
    /// Containers report the type of their first element; empty containers
    /// and `Null` have no observable type.
    pub fn runtime_type(&self) -> Option<TypeRef> {
        if let Some(kind) = self.scalar_kind() {
            return Some(TypeRef::Scalar(kind));
        }
        match self {
            Value::Enum { type_name, .. } => Some(TypeRef::named(type_name.clone())),
            Value::Object(object) => Some(TypeRef::named(object.type_name.clone())),
            Value::Record(_) => Some(TypeRef::Record),
            Value::Table(_) => Some(TypeRef::Table),
            Value::TableSet(_) => Some(TypeRef::TableSet),
            Value::List(items) => items.first()?.runtime_type().map(TypeRef::list),
            Value::Set(items) => items.first()?.runtime_type().map(TypeRef::set),
            Value::Array(items) => items.first()?.runtime_type().map(TypeRef::array),
            Value::Map(entries) => {
                let (key, value) = entries.first()?;
                Some(TypeRef::map(key.runtime_type()?, value.runtime_type()?))
            }
            _ => None,
        }
    }

    /// Items of a list, set or array.
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Set(items) | Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&DataTable> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_table_set(&self) -> Option<&DataSet> {
        match self {
            Value::TableSet(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::U8(value) => Some(i64::from(*value)),
            Value::I8(value) => Some(i64::from(*value)),
            Value::I16(value) => Some(i64::from(*value)),
            Value::U16(value) => Some(i64::from(*value)),
            Value::I32(value) => Some(i64::from(*value)),
            Value::U32(value) => Some(i64::from(*value)),
            Value::I64(value) => Some(*value),
            Value::U64(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) | Value::Uri(value) => Some(value.as_str()),
            Value::Enum { variant, .. } => Some(variant.as_str()),
            _ => None,
        }
    }

    /// Stable JSON rendering used for snapshots and comparisons.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Bool(value) => Json::Bool(*value),
            Value::U8(value) => Json::from(*value),
            Value::I8(value) => Json::from(*value),
            Value::Char(value) => Json::String(value.to_string()),
            Value::I16(value) => Json::from(*value),
            Value::U16(value) => Json::from(*value),
            Value::I32(value) => Json::from(*value),
            Value::U32(value) => Json::from(*value),
            Value::I64(value) => Json::from(*value),
            Value::U64(value) => Json::from(*value),
            Value::F32(value) => float_json(f64::from(*value)),
            Value::F64(value) | Value::Decimal(value) => float_json(*value),
            Value::Text(value) | Value::Uri(value) => Json::String(value.clone()),
            Value::DateTime(value) => {
                Json::String(value.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
            }
            Value::DateTimeOffset(value) => Json::String(value.to_rfc3339()),
            Value::TimeSpan(value) => Json::from(value.num_milliseconds()),
            Value::Uuid(value) => Json::String(value.to_string()),
            Value::IpAddr(value) => Json::String(value.to_string()),
            Value::Enum { variant, .. } => Json::String(variant.clone()),
            Value::List(items) | Value::Set(items) | Value::Array(items) => {
                Json::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(entries) => Json::Array(
                entries
                    .iter()
                    .map(|(key, value)| Json::Array(vec![key.to_json(), value.to_json()]))
                    .collect(),
            ),
            Value::Record(record) => Json::Object(
                record
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_json()))
                    .collect::<JsonMap<_, _>>(),
            ),
            Value::Object(object) => {
                let fields = object
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_json()))
                    .collect::<JsonMap<_, _>>();
                let mut rendered = JsonMap::new();
                rendered.insert("type".to_string(), Json::String(object.type_name.clone()));
                rendered.insert("fields".to_string(), Json::Object(fields));
                Json::Object(rendered)
            }
            Value::Table(table) => table.to_json(),
            Value::TableSet(set) => {
                let mut rendered = JsonMap::new();
                rendered.insert("name".to_string(), Json::String(set.name.clone()));
                rendered.insert(
                    "tables".to_string(),
                    Json::Array(set.tables.iter().map(DataTable::to_json).collect()),
                );
                Json::Object(rendered)
            }
        }
    }
}

fn float_json(value: f64) -> Json {
    Number::from_f64(value).map(Json::Number).unwrap_or(Json::Null)
}

/// Instance of a composite type: the type name plus its assigned fields in
/// assignment order.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub type_name: String,
    fields: Vec<(String, Value)>,
}

impl Object {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, value);
        self
    }

    /// Value of a field; unassigned fields read as absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Field value, treating unassigned fields as `Null`.
    pub fn field(&self, name: &str) -> &Value {
        self.get(name).unwrap_or(&Value::Null)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.get_mut(&name) {
            Some(slot) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

/// Loosely-typed object: an ordered map of names to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| value)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.entries.iter_mut().find(|(entry, _)| *entry == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

/// Generated rows for a table, column values in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl DataTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, column: &str) -> Vec<&Value> {
        match self.column_index(column) {
            Some(index) => self.rows.iter().filter_map(|row| row.get(index)).collect(),
            None => Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn to_json(&self) -> Json {
        let mut rendered = JsonMap::new();
        rendered.insert("name".to_string(), Json::String(self.name.clone()));
        rendered.insert(
            "columns".to_string(),
            Json::Array(self.columns.iter().cloned().map(Json::String).collect()),
        );
        rendered.insert(
            "rows".to_string(),
            Json::Array(
                self.rows
                    .iter()
                    .map(|row| Json::Array(row.iter().map(Value::to_json).collect()))
                    .collect(),
            ),
        );
        Json::Object(rendered)
    }
}

/// Generated tables of a table set.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    pub name: String,
    pub tables: Vec<DataTable>,
}

impl DataSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    pub fn table(&self, name: &str) -> Option<&DataTable> {
        self.tables.iter().find(|table| table.name == name)
    }
}
