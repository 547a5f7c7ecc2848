// Licensed under the Apache-2.0 license

//! Loading elaborated models from their serialized JSON form.
//!
//! The upstream elaborator emits one JSON document per model: a tree of
//! nodes with kind, name, geometry, optional array declaration and a flat
//! property object. This module deserializes that document and hands it to
//! [`crate::builder::build`] for unrolling.
//!
//! ```
//! let space = regspace_model::from_json_str(
//!     r#"{
//!         "addrmaps": [{
//!             "kind": "addrmap", "name": "top", "offset": 4096,
//!             "properties": { "access_channel": 0 },
//!             "children": [
//!                 { "kind": "reg", "name": "ctrl", "offset": 0, "width": 32 }
//!             ]
//!         }]
//!     }"#,
//! )
//! .unwrap();
//! assert_eq!(space.roots().count(), 1);
//! ```

use crate::builder::{build, NodeSpec};
use crate::error::ModelError;
use crate::node::AddressSpace;
use crate::property::{names, Properties, PropertyValue};
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct RawModel {
    addrmaps: Vec<RawNode>,
}

#[derive(Deserialize)]
struct RawNode {
    kind: String,
    name: String,
    #[serde(default)]
    type_name: Option<String>,
    #[serde(default)]
    offset: u64,
    #[serde(default)]
    size: Option<u64>,
    /// Bit width for registers, fields and memory entries.
    #[serde(default)]
    width: Option<u64>,
    /// Memory entry count.
    #[serde(default)]
    entries: Option<u64>,
    /// Field low bit position.
    #[serde(default)]
    low: Option<u64>,
    #[serde(default)]
    array: Vec<u32>,
    #[serde(default)]
    stride: Option<u64>,
    #[serde(default)]
    external: bool,
    #[serde(default)]
    properties: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    children: Vec<RawNode>,
}

/// Parse a serialized model document.
pub fn from_json_str(text: &str) -> Result<AddressSpace, ModelError> {
    let raw: RawModel = serde_json::from_str(text)?;
    let mut specs = Vec::new();
    for node in &raw.addrmaps {
        specs.push(convert(node, "")?);
    }
    build(specs)
}

/// Read and parse a serialized model file.
pub fn from_json_file(path: &Path) -> Result<AddressSpace, ModelError> {
    let text = std::fs::read_to_string(path)?;
    from_json_str(&text)
}

fn convert(raw: &RawNode, parent_path: &str) -> Result<NodeSpec, ModelError> {
    let path = if parent_path.is_empty() {
        raw.name.clone()
    } else {
        format!("{parent_path}.{}", raw.name)
    };
    let mut spec = match raw.kind.as_str() {
        "addrmap" => NodeSpec::addrmap(&raw.name)
            .offset(raw.offset)
            .size(raw.size.unwrap_or(0)),
        "regfile" => NodeSpec::regfile(&raw.name)
            .offset(raw.offset)
            .size(raw.size.unwrap_or(0)),
        "reg" => NodeSpec::reg(&raw.name, raw.offset, raw.width.unwrap_or(32)),
        "field" => NodeSpec::field(&raw.name, raw.low.unwrap_or(0), raw.width.unwrap_or(1)),
        "mem" => {
            let entries = raw.entries.ok_or_else(|| ModelError::MissingEntries {
                path: path.clone(),
            })?;
            NodeSpec::mem(&raw.name, raw.offset, entries, raw.width.unwrap_or(32))
        }
        other => {
            return Err(ModelError::UnknownKind {
                kind: other.to_string(),
                path,
            })
        }
    };
    if let Some(type_name) = &raw.type_name {
        spec = spec.type_name(type_name);
    }
    spec.array = raw.array.clone();
    spec.stride = raw.stride;
    spec.external = raw.external;
    spec.properties = convert_properties(&raw.properties, &path)?;
    for child in &raw.children {
        spec.children.push(convert(child, &path)?);
    }
    Ok(spec)
}

fn convert_properties(
    raw: &serde_json::Map<String, serde_json::Value>,
    path: &str,
) -> Result<Properties, ModelError> {
    let mut props = Properties::new();
    for (name, value) in raw {
        let value = match value {
            serde_json::Value::Bool(b) => PropertyValue::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(v) => PropertyValue::Int(v),
                None => {
                    return Err(ModelError::BadProperty {
                        name: name.clone(),
                        path: path.to_string(),
                    })
                }
            },
            // access kinds are enumeration tags, everything else is text
            serde_json::Value::String(s) if name == names::SW || name == names::HW => {
                PropertyValue::EnumTag(s.clone())
            }
            serde_json::Value::String(s) => PropertyValue::Str(s.clone()),
            _ => {
                return Err(ModelError::BadProperty {
                    name: name.clone(),
                    path: path.to_string(),
                })
            }
        };
        props.set(name, value);
    }
    Ok(props)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_tree() {
        let space = from_json_str(
            r#"{
                "addrmaps": [{
                    "kind": "addrmap", "name": "top", "offset": 4096,
                    "properties": { "access_channel": 2, "desc": "top map" },
                    "children": [
                        {
                            "kind": "reg", "name": "ctrl", "offset": 16, "width": 32,
                            "children": [
                                { "kind": "field", "name": "enable", "low": 0, "width": 1,
                                  "properties": { "sw": "rw", "hw": "r", "reset": 1 } }
                            ]
                        },
                        { "kind": "mem", "name": "buf", "offset": 64,
                          "entries": 16, "width": 32, "external": true },
                        { "kind": "reg", "name": "port", "offset": 128,
                          "width": 32, "array": [4] }
                    ]
                }]
            }"#,
        )
        .unwrap();
        let top = space.roots().next().unwrap();
        assert_eq!(top.inst_name(), "top");
        assert_eq!(top.absolute_address(), 4096);
        assert_eq!(top.properties().get_int("access_channel"), Some(2));
        let children: Vec<_> = top.children().collect();
        // ctrl + buf + 4 unrolled port elements
        assert_eq!(children.len(), 6);
        assert_eq!(children[0].absolute_address(), 4096 + 16);
        let enable = children[0].children().next().unwrap();
        assert_eq!(enable.properties().get_str("sw"), Some("rw"));
        assert!(children[1].is_external());
        assert_eq!(children[1].mem_entries(), 16);
        assert_eq!(children[5].current_index(), &[3]);
    }

    #[test]
    fn test_unknown_kind() {
        let err = from_json_str(
            r#"{ "addrmaps": [{ "kind": "gizmo", "name": "x" }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::UnknownKind { ref kind, .. } if kind == "gizmo"));
    }

    #[test]
    fn test_float_property_rejected() {
        let err = from_json_str(
            r#"{ "addrmaps": [{ "kind": "addrmap", "name": "top",
                 "properties": { "gain": 1.5 } }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::BadProperty { ref name, .. } if name == "gain"));
    }

    #[test]
    fn test_access_kinds_are_enum_tags() {
        let space = from_json_str(
            r#"{ "addrmaps": [{ "kind": "addrmap", "name": "top", "children": [
                 { "kind": "reg", "name": "r", "width": 32, "children": [
                   { "kind": "field", "name": "f", "width": 4,
                     "properties": { "sw": "r", "hw": "w" } } ] } ] }] }"#,
        )
        .unwrap();
        let field = space
            .roots()
            .next()
            .unwrap()
            .children()
            .next()
            .unwrap()
            .children()
            .next()
            .unwrap();
        assert_eq!(
            field.properties().get("sw"),
            Some(&PropertyValue::EnumTag("r".to_string()))
        );
    }

    #[test]
    fn test_oversized_field_width_is_rejected() {
        let err = from_json_str(
            r#"{ "addrmaps": [{ "kind": "addrmap", "name": "top", "children": [
                 { "kind": "reg", "name": "r", "width": 32, "children": [
                   { "kind": "field", "name": "f", "low": 0, "width": 70 } ] } ] }] }"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, ModelError::FieldTooWide { ref path, high: 69 } if path == "top.r.f")
        );
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            from_json_str("not json").unwrap_err(),
            ModelError::Json(_)
        ));
    }
}
