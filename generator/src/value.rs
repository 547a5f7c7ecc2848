// Licensed under the Apache-2.0 license

//! Context values consumed by the template engine.
//!
//! A context is a tree: scalar leaves (integers, strings, booleans), records
//! mapping keys to values, and lists of values. The context builder produces
//! one [`Record`] per address map; the template engine only ever reads.

use regspace_model::PropertyValue;

/// One context value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Str(String),
    Bool(bool),
    Record(Record),
    List(Vec<Value>),
}

impl Value {
    /// Scalar rendering: integers in decimal, booleans as `1`/`0`.
    /// `None` for records and lists, which have no direct text form.
    pub fn display(&self) -> Option<String> {
        match self {
            Value::Int(v) => Some(v.to_string()),
            Value::Str(s) => Some(s.clone()),
            Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            Value::Record(_) | Value::List(_) => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Record(_) | Value::List(_))
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Int(v as i64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}

impl From<Vec<Record>> for Value {
    fn from(v: Vec<Record>) -> Self {
        Value::List(v.into_iter().map(Value::Record).collect())
    }
}

impl From<&PropertyValue> for Value {
    fn from(v: &PropertyValue) -> Self {
        match v {
            PropertyValue::Int(i) => Value::Int(*i),
            PropertyValue::Str(s) => Value::Str(s.clone()),
            PropertyValue::Bool(b) => Value::Bool(*b),
            PropertyValue::EnumTag(s) => Value::Str(s.clone()),
        }
    }
}

/// Insertion-ordered key → [`Value`] map.
///
/// Key sets stay small, so lookups are linear scans; iteration order is
/// insertion order, which keeps rendered output stable across runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key, replacing any previous value under the same name.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Resolve a possibly dotted key path (`a.b.c`) through nested records.
    /// An exact top-level key wins over path traversal, so keys containing
    /// dots stay addressable.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.get(path) {
            return Some(value);
        }
        let mut parts = path.split('.');
        let mut current = self.get(parts.next()?)?;
        for part in parts {
            current = current.as_record()?.get(part)?;
        }
        Some(current)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
