// Licensed under the Apache-2.0 license

//! Elaborated address-space tree and read-only node views.
//!
//! The [`AddressSpace`] struct is the root container for one elaborated
//! register-space model. Nodes are stored in an arena for stable reference by
//! index; array instances are fully unrolled at build time, so every node in
//! the arena is one concrete element with a stored current index and a
//! precomputed absolute address.
//!
//! ## Architecture Overview
//!
//! ```text
//! AddressSpace
//! ├── node_arena: Vec<NodeData>    # All elaborated instances
//! │   ├── AddrMap    # Address maps (addressable containers)
//! │   ├── RegFile    # Register file groupings
//! │   ├── Reg        # Registers, decomposed into fields
//! │   ├── Field      # Bit fields (offset/size in the bit domain)
//! │   └── Mem        # Memories (uniform-width entry blocks)
//! │
//! └── roots: Vec<NodeId>           # Top-level address maps
//! ```
//!
//! External references (address maps, register files or registers that live
//! behind another bus endpoint) are ordinary nodes with the `external` flag
//! set.

use crate::property::Properties;

/// Index into the node arena.
pub type NodeId = usize;

//=============================================================================
// NodeKind - Variants of elaborated nodes
//=============================================================================

/// The structural kind of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Addressable container grouping registers, memories and nested maps.
    AddrMap,
    /// Reusable addressable grouping of registers inside an address map.
    RegFile,
    /// Addressable unit decomposed into bit fields.
    Reg,
    /// Bit field within a register.
    Field,
    /// Addressable block of uniform-width entries.
    Mem,
}

//=============================================================================
// NodeData - Arena storage for one elaborated instance
//=============================================================================

/// Storage for one elaborated node.
///
/// For addressable kinds `offset` and `size` are in bytes; for [`NodeKind::Field`]
/// they are the low bit position and the bit width (see [`Node::low`],
/// [`Node::width`]).
#[derive(Clone, Debug)]
pub struct NodeData {
    pub kind: NodeKind,
    /// Instance name (e.g. `status`).
    pub inst_name: String,
    /// Type name; defaults to the instance name for anonymous types.
    pub type_name: String,
    /// Offset relative to the parent, adjusted for the array element.
    pub offset: u64,
    /// Absolute address; for fields, the owning register's address.
    pub absolute_address: u64,
    /// Element size in bytes (bit width for fields).
    pub size: u64,
    /// Entry count, memories only.
    pub mem_entries: u64,
    /// Entry bit width, memories only.
    pub mem_width: u64,
    /// Declared array dimensions (empty, one or two entries).
    pub array_dims: Vec<u32>,
    /// This element's index per dimension; same arity as `array_dims`.
    pub current_idx: Vec<u32>,
    /// Reachable through another bus endpoint rather than decoded here.
    pub external: bool,
    pub properties: Properties,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

//=============================================================================
// AddressSpace - Root container
//=============================================================================

/// One elaborated register-space model.
///
/// Nodes are added during elaboration and never removed, so `NodeId` values
/// remain stable for the lifetime of the space.
#[derive(Clone, Debug, Default)]
pub struct AddressSpace {
    pub(crate) node_arena: Vec<NodeData>,
    pub(crate) roots: Vec<NodeId>,
}

impl AddressSpace {
    /// View over the node with the given id.
    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node { space: self, id }
    }

    /// Top-level address maps in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = Node<'_>> {
        self.roots.iter().map(move |&id| self.node(id))
    }

    pub fn len(&self) -> usize {
        self.node_arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_arena.is_empty()
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.node_arena[id]
    }

    pub(crate) fn push(&mut self, data: NodeData) -> NodeId {
        let id = self.node_arena.len();
        self.node_arena.push(data);
        id
    }
}

//=============================================================================
// Node - Read-only view
//=============================================================================

/// Read-only view over one node in an [`AddressSpace`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    space: &'a AddressSpace,
    id: NodeId,
}

impl<'a> Node<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn inst_name(&self) -> &'a str {
        &self.data().inst_name
    }

    pub fn type_name(&self) -> &'a str {
        &self.data().type_name
    }

    /// Offset relative to the parent, in bytes (bit position for fields).
    pub fn address_offset(&self) -> u64 {
        self.data().offset
    }

    pub fn absolute_address(&self) -> u64 {
        self.data().absolute_address
    }

    /// Element size in bytes (bit width for fields).
    pub fn size(&self) -> u64 {
        self.data().size
    }

    pub fn is_array(&self) -> bool {
        !self.data().array_dims.is_empty()
    }

    pub fn array_dimensions(&self) -> &'a [u32] {
        &self.data().array_dims
    }

    pub fn current_index(&self) -> &'a [u32] {
        &self.data().current_idx
    }

    /// True when every entry of the current index is zero (also true for
    /// non-array nodes). The canonical element represents its array in
    /// declaration lists.
    pub fn is_canonical_element(&self) -> bool {
        self.data().current_idx.iter().all(|&i| i == 0)
    }

    /// Number of elements in the whole array (1 for non-array nodes).
    pub fn element_count(&self) -> u64 {
        self.data().array_dims.iter().map(|&d| d as u64).product()
    }

    /// Byte span of the whole array (element size times element count).
    pub fn total_size(&self) -> u64 {
        self.size() * self.element_count()
    }

    pub fn is_external(&self) -> bool {
        self.data().external
    }

    pub fn properties(&self) -> &'a Properties {
        &self.data().properties
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        let space = self.space;
        self.data().parent.map(|id| space.node(id))
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let space = self.space;
        self.data().children.iter().map(move |&id| space.node(id))
    }

    /// Bit width: field width, register width in bits, or memory entry width.
    pub fn width(&self) -> u64 {
        match self.kind() {
            NodeKind::Field => self.size(),
            NodeKind::Mem => self.data().mem_width,
            _ => self.size() * 8,
        }
    }

    /// Low bit position of a field.
    pub fn low(&self) -> u64 {
        self.data().offset
    }

    /// High bit position of a field.
    pub fn high(&self) -> u64 {
        self.data().offset + self.data().size - 1
    }

    /// Memory entry count (0 for non-memories).
    pub fn mem_entries(&self) -> u64 {
        self.data().mem_entries
    }

    /// Dotted instance path from the root, array elements suffixed with
    /// their index (e.g. `top.ports.2.ctrl`). Used in diagnostics and
    /// generated identifiers.
    pub fn path(&self) -> String {
        let mut segments = Vec::new();
        let mut cursor = Some(*self);
        while let Some(node) = cursor {
            segments.push(node.path_segment_raw());
            cursor = node.parent();
        }
        segments.reverse();
        segments.join(".")
    }

    /// This node's path segment: the instance name, suffixed with the
    /// current index for array elements only.
    pub(crate) fn path_segment_raw(&self) -> String {
        let data = self.data();
        if data.current_idx.is_empty() {
            data.inst_name.clone()
        } else {
            let mut segment = data.inst_name.clone();
            for idx in &data.current_idx {
                segment.push('.');
                segment.push_str(&idx.to_string());
            }
            segment
        }
    }

    fn data(&self) -> &'a NodeData {
        self.space.data(self.id)
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("path", &self.path())
            .finish()
    }
}
