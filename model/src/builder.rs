// Licensed under the Apache-2.0 license

//! Construction of elaborated address spaces.
//!
//! [`NodeSpec`] is the hierarchical description an upstream elaborator (or a
//! test) hands over; [`build`] turns a set of top-level specs into an
//! [`AddressSpace`], unrolling every array instance into concrete elements
//! with per-element offsets and precomputed absolute addresses.

use crate::error::ModelError;
use crate::node::{AddressSpace, NodeData, NodeId, NodeKind};
use crate::property::{Properties, PropertyValue};

/// Hierarchical description of one instance before elaboration.
///
/// Offsets and sizes are in bytes, except for [`NodeKind::Field`] where they
/// are the low bit position and the bit width.
///
/// ```
/// use regspace_model::{build, NodeSpec};
///
/// let space = build(vec![NodeSpec::addrmap("top")
///     .prop("access_channel", 0i64)
///     .child(
///         NodeSpec::reg("ctrl", 0x0, 32)
///             .child(NodeSpec::field("enable", 0, 1)),
///     )
///     .child(NodeSpec::reg("port", 0x10, 32).array(&[4]))])
/// .unwrap();
///
/// let top = space.roots().next().unwrap();
/// // one scalar register plus four unrolled array elements
/// assert_eq!(top.children().count(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub name: String,
    pub type_name: Option<String>,
    pub offset: u64,
    pub size: u64,
    pub mem_entries: u64,
    pub mem_width: u64,
    pub array: Vec<u32>,
    pub stride: Option<u64>,
    pub external: bool,
    pub properties: Properties,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    fn new(kind: NodeKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            type_name: None,
            offset: 0,
            size: 0,
            mem_entries: 0,
            mem_width: 0,
            array: Vec::new(),
            stride: None,
            external: false,
            properties: Properties::new(),
            children: Vec::new(),
        }
    }

    /// Address map; its offset is the base address when used as a root.
    pub fn addrmap(name: &str) -> Self {
        Self::new(NodeKind::AddrMap, name)
    }

    pub fn regfile(name: &str) -> Self {
        Self::new(NodeKind::RegFile, name)
    }

    /// Register of `width` bits at `offset`.
    pub fn reg(name: &str, offset: u64, width: u64) -> Self {
        let mut spec = Self::new(NodeKind::Reg, name);
        spec.offset = offset;
        spec.size = width.div_ceil(8);
        spec
    }

    /// Field spanning `width` bits starting at bit `low`.
    pub fn field(name: &str, low: u64, width: u64) -> Self {
        let mut spec = Self::new(NodeKind::Field, name);
        spec.offset = low;
        spec.size = width;
        spec
    }

    /// Memory of `entries` entries, each `width` bits wide.
    pub fn mem(name: &str, offset: u64, entries: u64, width: u64) -> Self {
        let mut spec = Self::new(NodeKind::Mem, name);
        spec.offset = offset;
        spec.size = entries * width.div_ceil(8);
        spec.mem_entries = entries;
        spec.mem_width = width;
        spec
    }

    pub fn type_name(mut self, type_name: &str) -> Self {
        self.type_name = Some(type_name.to_string());
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Declare this instance as an array (one or two dimensions).
    pub fn array(mut self, dims: &[u32]) -> Self {
        self.array = dims.to_vec();
        self
    }

    /// Address stride between array elements; defaults to the element size.
    pub fn stride(mut self, stride: u64) -> Self {
        self.stride = Some(stride);
        self
    }

    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    pub fn prop(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.set(name, value);
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: Vec<NodeSpec>) -> Self {
        self.children.extend(children);
        self
    }
}

/// Elaborate top-level specs into an address space.
pub fn build(specs: Vec<NodeSpec>) -> Result<AddressSpace, ModelError> {
    let mut space = AddressSpace::default();
    let mut roots = Vec::new();
    for spec in &specs {
        roots.extend(elaborate(&mut space, spec, None, 0, "", false)?);
    }
    space.roots = roots;
    Ok(space)
}

/// Insert one spec into the arena, unrolled: returns one node per array
/// element (a single node for non-arrays), in row-major index order.
/// The external flag propagates down: everything under an external node is
/// reachable only through that endpoint.
fn elaborate(
    space: &mut AddressSpace,
    spec: &NodeSpec,
    parent: Option<NodeId>,
    parent_abs: u64,
    parent_path: &str,
    parent_external: bool,
) -> Result<Vec<NodeId>, ModelError> {
    let path = if parent_path.is_empty() {
        spec.name.clone()
    } else {
        format!("{parent_path}.{}", spec.name)
    };
    validate(spec, &path)?;

    let stride = spec.stride.unwrap_or(spec.size);
    let external = spec.external || parent_external;
    let mut ids = Vec::new();
    for idx in index_tuples(&spec.array) {
        let offset = spec.offset + linear_index(&spec.array, &idx) * stride;
        // Fields live in the bit domain; their address is the register's.
        let abs = match spec.kind {
            NodeKind::Field => parent_abs,
            _ => parent_abs + offset,
        };
        let id = space.push(NodeData {
            kind: spec.kind,
            inst_name: spec.name.clone(),
            type_name: spec
                .type_name
                .clone()
                .unwrap_or_else(|| spec.name.clone()),
            offset,
            absolute_address: abs,
            size: spec.size,
            mem_entries: spec.mem_entries,
            mem_width: spec.mem_width,
            array_dims: spec.array.clone(),
            current_idx: idx,
            external,
            properties: spec.properties.clone(),
            parent,
            children: Vec::new(),
        });
        let mut children = Vec::new();
        for child in &spec.children {
            children.extend(elaborate(space, child, Some(id), abs, &path, external)?);
        }
        space.node_arena[id].children = children;
        ids.push(id);
    }
    Ok(ids)
}

fn validate(spec: &NodeSpec, path: &str) -> Result<(), ModelError> {
    if spec.array.len() > 2 {
        return Err(ModelError::TooManyDimensions {
            path: path.to_string(),
            dims: spec.array.len(),
        });
    }
    match spec.kind {
        NodeKind::Mem if spec.mem_entries == 0 => Err(ModelError::MissingEntries {
            path: path.to_string(),
        }),
        NodeKind::Field if spec.size == 0 => Err(ModelError::ZeroWidthField {
            path: path.to_string(),
        }),
        NodeKind::Field if spec.offset + spec.size > 64 => Err(ModelError::FieldTooWide {
            path: path.to_string(),
            high: spec.offset + spec.size - 1,
        }),
        _ => Ok(()),
    }
}

/// Every index tuple of an array declaration, row-major. A non-array yields
/// one empty tuple.
fn index_tuples(dims: &[u32]) -> Vec<Vec<u32>> {
    match *dims {
        [] => vec![Vec::new()],
        [m] => (0..m).map(|j| vec![j]).collect(),
        [n, m] => {
            let mut tuples = Vec::with_capacity((n as usize) * (m as usize));
            for i in 0..n {
                for j in 0..m {
                    tuples.push(vec![i, j]);
                }
            }
            tuples
        }
        // validate() rejects anything longer
        _ => Vec::new(),
    }
}

fn linear_index(dims: &[u32], idx: &[u32]) -> u64 {
    match (dims, idx) {
        ([_], [j]) => *j as u64,
        ([_, m], [i, j]) => (*i as u64) * (*m as u64) + *j as u64,
        _ => 0,
    }
}
