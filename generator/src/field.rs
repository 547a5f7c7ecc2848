// Licensed under the Apache-2.0 license

//! Field-level metadata: bit masks, normalized reset values, data-type
//! decoding and access classification.

use regspace_model::{property_names, Node};

/// Fixed-point width decoded from a data-type descriptor: a bit count
/// (possibly negative) or the IEEE754 marker for floating point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataTypeBits {
    Bits(i64),
    Ieee754,
}

/// Mask of `width` bits starting at bit `low`. Spans past bit 63 are
/// rejected when the model is built, so `low + width` never exceeds 64 here.
pub fn bit_mask(low: u64, width: u64) -> u64 {
    (((1u128 << width) - 1) << low) as u64
}

/// Normalize a raw reset value to a 32-bit two's-complement signed integer.
pub fn normalize_reset(raw: i64) -> i64 {
    let v = (raw as u64) & 0xFFFF_FFFF;
    if v > 0x7FFF_FFFF {
        v as i64 - 0x1_0000_0000
    } else {
        v as i64
    }
}

/// Decode a free-form data-type descriptor into `(signed, bits)`.
///
/// Case-insensitive and total: a leading `int` or `fixed` token means
/// signed; `fixed<N>`/`ufixed<N>` carry the fixed-point bit count (N may be
/// negative); a leading `float` maps to the IEEE754 marker. Anything
/// malformed degrades to no type information rather than failing.
pub fn parse_data_type(descriptor: &str) -> (i64, DataTypeBits) {
    let d = descriptor.trim().to_ascii_lowercase();
    let signed = if d.starts_with("int") || d.starts_with("fixed") {
        1
    } else {
        0
    };
    if d.starts_with("float") {
        return (signed, DataTypeBits::Ieee754);
    }
    let bits = d
        .strip_prefix("ufixed")
        .or_else(|| d.strip_prefix("fixed"))
        .map(leading_int)
        .unwrap_or(0);
    (signed, DataTypeBits::Bits(bits))
}

/// Parse a leading (optionally negative) decimal integer; 0 when absent.
fn leading_int(s: &str) -> i64 {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|v| sign * v).unwrap_or(0)
}

/// Software access kind of a field; the elaborator's default is `rw`.
pub fn sw_access(field: Node<'_>) -> String {
    field
        .properties()
        .get_str(property_names::SW)
        .unwrap_or("rw")
        .to_string()
}

/// Hardware access kind of a field; the elaborator's default is `r`.
pub fn hw_access(field: Node<'_>) -> String {
    field
        .properties()
        .get_str(property_names::HW)
        .unwrap_or("r")
        .to_string()
}

fn is_writable(access: &str) -> bool {
    access.contains('w')
}

fn is_readable(access: &str) -> bool {
    access.contains('r')
}

/// Field classification for interface generation. Counters and interrupt
/// sources take precedence; otherwise a software-writable field needs
/// storage and everything else is a wire.
pub fn field_type(field: Node<'_>) -> &'static str {
    let props = field.properties();
    if props.get_flag(property_names::COUNTER) {
        "COUNTER"
    } else if props.get_flag(property_names::INTR) {
        "INTERRUPT"
    } else if is_writable(&sw_access(field)) {
        "STORAGE"
    } else {
        "WIRE"
    }
}

/// A field is constant when neither side can write it.
pub fn is_constant(field: Node<'_>) -> bool {
    !is_writable(&sw_access(field)) && !is_writable(&hw_access(field))
}

/// Register-level access mode, derived from its fields: `RW` when software
/// can both read and write somewhere in the register, `WO` for write-only,
/// `RO` otherwise.
pub fn reg_rw(reg: Node<'_>) -> &'static str {
    let mut readable = false;
    let mut writable = false;
    for field in reg.children() {
        let sw = sw_access(field);
        readable |= is_readable(&sw);
        writable |= is_writable(&sw);
    }
    match (writable, readable) {
        (true, true) => "RW",
        (true, false) => "WO",
        _ => "RO",
    }
}

/// Register-level data type: mirrors the first field's descriptor (the
/// single-field register is the overwhelmingly common shape in map files).
pub fn reg_data_type(reg: Node<'_>) -> (i64, DataTypeBits) {
    match reg.children().next() {
        Some(field) => parse_data_type(
            field
                .properties()
                .get_str(property_names::DATA_TYPE)
                .unwrap_or(""),
        ),
        None => (0, DataTypeBits::Bits(0)),
    }
}
