// Licensed under the Apache-2.0 license

//! Per-address-map context compilation.
//!
//! One bottom-up traversal turns the elaborated tree into renderable
//! contexts: entering an address map opens a fresh [`Scope`] (type
//! registries for the subtree), exiting it flattens the map's immediate
//! children into item lists and assembles the full [`Record`] handed to the
//! template engine. Nested address maps produce their own contexts first,
//! and a parent's scope never sees a child map's types.
//!
//! Failures are scoped per address map: an unresolvable channel or a
//! property colliding with a derived key aborts that map's context and the
//! traversal carries on with its siblings.
//!
//! The implementation is split across submodules:
//! - `items`: the per-item record builders (registers, fields, memories,
//!   external references, type tables)

mod items;

use crate::config::{FlattenPolicy, GeneratorConfig};
use crate::error::Result;
use crate::registry::TypeRegistry;
use crate::value::Record;
use log::{debug, error};
use regspace_model::{property_names, AddressSpace, Node, NodeId, NodeKind, PropertyValue};


/// One address map's compiled context.
#[derive(Debug)]
pub struct BuiltContext {
    /// The address-map node this context was built from.
    pub node: NodeId,
    /// Instance name, as used in destination file names.
    pub name: String,
    pub type_name: String,
    /// Dotted instance path, for diagnostics.
    pub path: String,
    /// Whether HDL output is wanted for this map (`generate_hdl` property,
    /// absent means yes).
    pub generate_hdl: bool,
    pub record: Record,
}

/// Type registries scoped to one address map's subtree.
#[derive(Default)]
struct Scope {
    regtypes: TypeRegistry,
    memtypes: TypeRegistry,
}

/// Compile a context for every address map in the space, bottom-up.
///
/// The result keeps traversal order; failed maps stay in place as errors so
/// a driver can report them while still rendering the rest.
pub fn build_contexts(
    space: &AddressSpace,
    config: &GeneratorConfig,
) -> Vec<Result<BuiltContext>> {
    let mut out = Vec::new();
    for root in space.roots() {
        visit_addrmap(space, root, config, &mut out);
    }
    out
}

fn visit_addrmap(
    space: &AddressSpace,
    map: Node<'_>,
    config: &GeneratorConfig,
    out: &mut Vec<Result<BuiltContext>>,
) {
    debug!("entering address map `{}`", map.path());
    let mut scope = Scope::default();
    for child in map.children() {
        collect(space, child, config, &mut scope, out);
    }
    let result = build_addrmap_context(space, map, &scope, config);
    if let Err(err) = &result {
        error!("skipping address map `{}`: {err}", map.path());
    }
    out.push(result);
}

/// Walk one child of an address map, registering types. Nested address
/// maps recurse into [`visit_addrmap`] with their own scope; register files
/// are transparent. External registers never register a type: nothing on
/// this bus decodes them, and that exclusion covers virtual registers
/// inside external memories through flag inheritance.
fn collect(
    space: &AddressSpace,
    node: Node<'_>,
    config: &GeneratorConfig,
    scope: &mut Scope,
    out: &mut Vec<Result<BuiltContext>>,
) {
    match node.kind() {
        NodeKind::AddrMap => visit_addrmap(space, node, config, out),
        NodeKind::Reg => {
            if !node.is_external() {
                scope.regtypes.register(node);
            }
        }
        NodeKind::Mem => {
            scope.memtypes.register(node);
            for child in node.children() {
                collect(space, child, config, scope, out);
            }
        }
        NodeKind::RegFile => {
            for child in node.children() {
                collect(space, child, config, scope, out);
            }
        }
        NodeKind::Field => {}
    }
}

fn keep(node: Node<'_>, policy: FlattenPolicy) -> bool {
    match policy {
        FlattenPolicy::Full => true,
        FlattenPolicy::Declaration => node.is_canonical_element(),
    }
}

fn build_addrmap_context(
    space: &AddressSpace,
    map: Node<'_>,
    scope: &Scope,
    config: &GeneratorConfig,
) -> Result<BuiltContext> {
    let mut record = Record::new();
    record.set("name", map.inst_name());
    record.set("typename", map.type_name());
    items::set_location(&mut record, map, config)?;
    record.set("size", map.size());

    let mut regtypes = Vec::new();
    for (i, id) in scope.regtypes.values().enumerate() {
        regtypes.push(items::regtype_item(i, space.node(id), config)?);
    }
    let mut memtypes = Vec::new();
    for (i, id) in scope.memtypes.values().enumerate() {
        memtypes.push(items::memtype_item(i, space.node(id), config)?);
    }

    let mut regitems = Vec::new();
    let mut base = 0u64;
    for child in map.children() {
        if child.kind() != NodeKind::Reg || child.is_external() {
            continue;
        }
        if !keep(child, config.reg_policy()) {
            continue;
        }
        regitems.push(items::reg_item(regitems.len(), child, config, base)?);
        base += match config.reg_policy() {
            FlattenPolicy::Declaration => child.element_count(),
            FlattenPolicy::Full => 1,
        };
    }

    let mut memitems = Vec::new();
    for child in map.children() {
        if child.kind() != NodeKind::Mem || !keep(child, config.mem_policy()) {
            continue;
        }
        memitems.push(items::mem_item(memitems.len(), child, config)?);
    }

    let mut extitems = Vec::new();
    for child in map.children() {
        let referencable = matches!(
            child.kind(),
            NodeKind::AddrMap | NodeKind::RegFile | NodeKind::Reg
        );
        if !referencable || !child.is_external() || !keep(child, config.ext_policy()) {
            continue;
        }
        extitems.push(items::ext_item(extitems.len(), child, config)?);
    }

    // every register element of this map, arrays fully counted
    let regcount = map
        .children()
        .filter(|c| c.kind() == NodeKind::Reg && !c.is_external())
        .count() as i64;

    record.set("n_regtypes", regtypes.len() as i64);
    record.set("n_memtypes", memtypes.len() as i64);
    record.set("n_regitems", regitems.len() as i64);
    record.set("n_memitems", memitems.len() as i64);
    record.set("n_extitems", extitems.len() as i64);
    record.set("n_regcount", regcount);
    record.set("regtypes", regtypes);
    record.set("memtypes", memtypes);
    record.set("regitems", regitems);
    record.set("memitems", memitems);
    record.set("extitems", extitems);

    items::merge_user_properties(&mut record, map)?;

    Ok(BuiltContext {
        node: map.id(),
        name: map.inst_name().to_string(),
        type_name: map.type_name().to_string(),
        path: map.path(),
        generate_hdl: hdl_enabled(map),
        record,
    })
}

fn hdl_enabled(map: Node<'_>) -> bool {
    match map.properties().get(property_names::GENERATE_HDL) {
        Some(PropertyValue::Bool(b)) => *b,
        Some(PropertyValue::Int(v)) => *v != 0,
        _ => true,
    }
}
