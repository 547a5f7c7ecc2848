// Licensed under the Apache-2.0 license

//! Record builders for the individual entries inside an address-map
//! context: register/memory/external items, field descriptions, and the
//! deduplicated type tables.

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::field;
use crate::resolve;
use crate::util::ceil_log2;
use crate::value::{Record, Value};
use regspace_model::{property_names, Node, NodeKind};

/// Properties consumed while deriving keys. They never pass through to the
/// record verbatim, so a component carrying one cannot collide with the
/// derived key of the same name.
const DECODED_PROPS: &[&str] = &[
    property_names::ACCESS_CHANNEL,
    property_names::BAR,
    property_names::DATA_TYPE,
    property_names::GENERATE_HDL,
    property_names::SW,
    property_names::HW,
    property_names::RESET,
    property_names::COUNTER,
    property_names::INTR,
    property_names::WE,
    property_names::INCRWIDTH,
    property_names::DECRWIDTH,
];

/// Copy all remaining component properties into `record`. A property whose
/// name is already a key in the record is fatal for this context.
pub(super) fn merge_user_properties(record: &mut Record, node: Node<'_>) -> Result<()> {
    for (name, value) in node.properties().iter() {
        if DECODED_PROPS.contains(&name) {
            continue;
        }
        if record.contains_key(name) {
            return Err(Error::KeyCollision {
                key: name.to_string(),
                path: node.path(),
            });
        }
        record.set(name, Value::from(value));
    }
    Ok(())
}

/// Set the addressing keys shared by every addressable item: the owning
/// map's segment and path, relative and absolute addresses, BAR binding and
/// the resolved access channel.
pub(super) fn set_location(
    record: &mut Record,
    node: Node<'_>,
    config: &GeneratorConfig,
) -> Result<()> {
    let owner = resolve::owning_addrmap(node);
    if let Some(map) = owner {
        record.set("addrmap", resolve::map_segment(map));
        record.set("addrmap_path", map.path());
    }
    record.set("reladdr", node.address_offset() as i64);
    record.set("absaddr", node.absolute_address() as i64);
    let (bar, bar_base) = resolve::bar(node);
    record.set("bar", bar);
    record.set(
        "baraddr",
        node.absolute_address().wrapping_sub(bar_base) as i64,
    );
    record.set("channel", resolve::channel(node, config)?);
    Ok(())
}

pub(super) fn fixed_bits_value(bits: field::DataTypeBits) -> Value {
    match bits {
        field::DataTypeBits::Bits(n) => Value::Int(n),
        field::DataTypeBits::Ieee754 => Value::from("IEEE754"),
    }
}

/// `[n][m]` geometry of an instantiation: scalars are `1 x 1`, 1-D arrays
/// `1 x m`, 2-D arrays `n x m`.
pub(super) fn dims_nm(node: Node<'_>) -> (u64, u64) {
    let dims = node.array_dimensions();
    match dims.len() {
        0 => (1, 1),
        1 => (1, u64::from(dims[0])),
        _ => (u64::from(dims[0]), u64::from(dims[1])),
    }
}

pub(super) fn reg_item(
    index: usize,
    node: Node<'_>,
    config: &GeneratorConfig,
    base_words: u64,
) -> Result<Record> {
    let mut record = Record::new();
    record.set("index", index as i64);
    record.set("name", node.inst_name());
    record.set("typename", node.type_name());
    set_location(&mut record, node, config)?;
    let (n, m) = dims_nm(node);
    record.set("dim_n", n as i64);
    record.set("dim_m", m as i64);
    record.set("base", base_words as i64);
    record.set("rw", field::reg_rw(node));
    record.set("width", node.width() as i64);
    let (signed, bits) = field::reg_data_type(node);
    record.set("signed", signed);
    record.set("fixedbits", fixed_bits_value(bits));
    merge_user_properties(&mut record, node)?;
    Ok(record)
}

pub(super) fn field_item(index: usize, node: Node<'_>) -> Result<Record> {
    let props = node.properties();
    let mut record = Record::new();
    record.set("index", index as i64);
    record.set("name", node.type_name());
    record.set("low", node.low() as i64);
    record.set("high", node.high() as i64);
    record.set("width", node.width() as i64);
    record.set("mask", field::bit_mask(node.low(), node.width()));
    record.set(
        "reset",
        field::normalize_reset(props.get_int(property_names::RESET).unwrap_or(0)),
    );
    record.set("ftype", field::field_type(node));
    record.set("sw_access", field::sw_access(node));
    record.set("hw_access", field::hw_access(node));
    record.set("hw_we", i64::from(props.get_flag(property_names::WE)));
    record.set("constant", i64::from(field::is_constant(node)));
    let descriptor = props.get_str(property_names::DATA_TYPE).unwrap_or_default();
    let (signed, bits) = field::parse_data_type(descriptor);
    record.set("signed", signed);
    record.set("fixedbits", fixed_bits_value(bits));
    record.set(
        "incrwidth",
        props.get_int(property_names::INCRWIDTH).unwrap_or(1),
    );
    record.set(
        "decrwidth",
        props.get_int(property_names::DECRWIDTH).unwrap_or(1),
    );
    merge_user_properties(&mut record, node)?;
    Ok(record)
}

/// One entry of the deduplicated register type table, with the full field
/// list of the defining instance.
pub(super) fn regtype_item(
    index: usize,
    node: Node<'_>,
    config: &GeneratorConfig,
) -> Result<Record> {
    let mut record = Record::new();
    record.set("index", index as i64);
    record.set("name", node.type_name());
    record.set("width", node.width() as i64);
    record.set("channel", resolve::channel(node, config)?);
    let mut fields = Vec::new();
    for child in node.children() {
        if child.kind() == NodeKind::Field {
            fields.push(field_item(fields.len(), child)?);
        }
    }
    record.set("n_fields", fields.len() as i64);
    record.set("fields", fields);
    merge_user_properties(&mut record, node)?;
    Ok(record)
}

pub(super) fn memtype_item(
    index: usize,
    node: Node<'_>,
    config: &GeneratorConfig,
) -> Result<Record> {
    let mut record = Record::new();
    record.set("index", index as i64);
    record.set("name", node.type_name());
    set_mem_geometry(&mut record, node);
    record.set("channel", resolve::channel(node, config)?);
    merge_user_properties(&mut record, node)?;
    Ok(record)
}

/// Entries, data width and the derived word-address geometry of a memory.
/// Addresses count 32-bit words on the bus side, so a memory of `entries`
/// locations occupies `entries * 4` addresses regardless of data width.
fn set_mem_geometry(record: &mut Record, node: Node<'_>) {
    let entries = node.mem_entries();
    let addresses = entries * 4;
    record.set("entries", entries as i64);
    record.set("width", node.width() as i64);
    record.set("addresses", addresses as i64);
    record.set("aw", ceil_log2(addresses) as i64);
}

pub(super) fn mem_item(index: usize, node: Node<'_>, config: &GeneratorConfig) -> Result<Record> {
    let mut record = Record::new();
    record.set("index", index as i64);
    record.set("name", node.inst_name());
    record.set("typename", node.type_name());
    set_location(&mut record, node, config)?;
    set_mem_geometry(&mut record, node);
    // registers declared inside the memory describe its entry layout; they
    // occupy no bus addresses of their own
    let mut vregs = Vec::new();
    let mut base = 0u64;
    for child in node.children() {
        if child.kind() != NodeKind::Reg || !child.is_canonical_element() {
            continue;
        }
        vregs.push(reg_item(vregs.len(), child, config, base)?);
        base += child.element_count();
    }
    record.set("vregs", vregs);
    merge_user_properties(&mut record, node)?;
    Ok(record)
}

pub(super) fn ext_item(index: usize, node: Node<'_>, config: &GeneratorConfig) -> Result<Record> {
    let mut record = Record::new();
    record.set("index", index as i64);
    record.set("name", node.inst_name());
    record.set("typename", node.type_name());
    set_location(&mut record, node, config)?;
    let size = node.size();
    record.set("size", size as i64);
    record.set("total_words", (node.total_size() / 4) as i64);
    record.set("aw", ceil_log2(size) as i64);
    merge_user_properties(&mut record, node)?;
    Ok(record)
}
