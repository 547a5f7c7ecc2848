// Licensed under the Apache-2.0 license

//! Typed property values attached to model nodes.
//!
//! Hardware descriptions carry arbitrary named properties (access channels,
//! data-type descriptors, documentation strings, tool flags). Rather than a
//! stringly-typed bag, each value is one of a small set of variants and is
//! read back through kind-checked accessors; an absent property is simply
//! `None`.

/// A single property value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyValue {
    /// Integer property (addresses, channel ids, counts).
    Int(i64),
    /// Free-form string property (descriptions, data-type descriptors).
    Str(String),
    /// Boolean property (tool flags such as `generate_hdl`).
    Bool(bool),
    /// Enumeration tag (access kinds such as `rw`, `r`, `w`, `na`).
    EnumTag(String),
}

impl PropertyValue {
    /// Integer value, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// String value, if this is a `Str` or `EnumTag`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) | PropertyValue::EnumTag(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean value, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<u32> for PropertyValue {
    fn from(v: u32) -> Self {
        PropertyValue::Int(v as i64)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Str(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Str(v)
    }
}

/// Insertion-ordered name → value map.
///
/// Node property sets are small (a handful of entries), so lookups are linear
/// scans over a `Vec`; iteration order is the order properties were first
/// set, which keeps generated output stable across runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, PropertyValue)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any previous value under the same name.
    /// A replaced property keeps its original position.
    pub fn set(&mut self, name: &str, value: impl Into<PropertyValue>) {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name.to_string(), value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(PropertyValue::as_int)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropertyValue::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(PropertyValue::as_bool)
    }

    /// Truthiness helper for flag-like properties: `Bool(true)` or a
    /// non-zero `Int` count as set.
    pub fn get_flag(&self, name: &str) -> bool {
        match self.get(name) {
            Some(PropertyValue::Bool(b)) => *b,
            Some(PropertyValue::Int(v)) => *v != 0,
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Property names with designated meaning to the generator.
pub mod names {
    /// Bus/channel anchor, resolved by walking the ancestor chain.
    pub const ACCESS_CHANNEL: &str = "access_channel";
    /// Bus bar id carried by a top-level address map.
    pub const BAR: &str = "bar";
    /// Field data-type descriptor (`int`, `uint`, `fixed8`, `float`, ...).
    pub const DATA_TYPE: &str = "data_type";
    /// Per-address-map HDL generation gate; absent means generate.
    pub const GENERATE_HDL: &str = "generate_hdl";
    /// Software access kind (`rw`, `r`, `w`, `na`).
    pub const SW: &str = "sw";
    /// Hardware access kind (`rw`, `r`, `w`, `na`).
    pub const HW: &str = "hw";
    /// Field reset value.
    pub const RESET: &str = "reset";
    /// Field is a counter.
    pub const COUNTER: &str = "counter";
    /// Field is an interrupt source.
    pub const INTR: &str = "intr";
    /// Hardware write-enable.
    pub const WE: &str = "we";
    /// Counter increment step width in bits.
    pub const INCRWIDTH: &str = "incrwidth";
    /// Counter decrement step width in bits.
    pub const DECRWIDTH: &str = "decrwidth";
    /// Documentation text.
    pub const DESC: &str = "desc";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let mut props = Properties::new();
        props.set("access_channel", 3i64);
        props.set("desc", "control register");
        props.set("counter", true);
        assert_eq!(props.get_int("access_channel"), Some(3));
        assert_eq!(props.get_str("desc"), Some("control register"));
        assert_eq!(props.get_bool("counter"), Some(true));
        assert_eq!(props.get_int("missing"), None);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut props = Properties::new();
        props.set("a", 1i64);
        props.set("b", 2i64);
        props.set("a", 10i64);
        let names: Vec<&str> = props.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(props.get_int("a"), Some(10));
    }

    #[test]
    fn test_kind_checked_access() {
        let mut props = Properties::new();
        props.set("desc", "text");
        assert_eq!(props.get_int("desc"), None);
        assert_eq!(props.get_bool("desc"), None);
        props.set("sw", PropertyValue::EnumTag("rw".to_string()));
        assert_eq!(props.get_str("sw"), Some("rw"));
    }

    #[test]
    fn test_flags() {
        let mut props = Properties::new();
        props.set("intr", true);
        props.set("we", 1i64);
        props.set("counter", false);
        assert!(props.get_flag("intr"));
        assert!(props.get_flag("we"));
        assert!(!props.get_flag("counter"));
        assert!(!props.get_flag("absent"));
    }
}
