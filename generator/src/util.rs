// Licensed under the Apache-2.0 license

//! Small numeric helpers shared by the context builder and the template
//! engine.

/// Ceiling of log2, as used for address-bus widths.
///
/// ```
/// use regspace_generator::util::ceil_log2;
///
/// assert_eq!(ceil_log2(1), 0);
/// assert_eq!(ceil_log2(8), 3);
/// assert_eq!(ceil_log2(9), 4);
/// ```
pub fn ceil_log2(v: u64) -> u64 {
    if v <= 1 {
        0
    } else {
        64 - (v - 1).leading_zeros() as u64
    }
}

/// Lower-case hex of the two's-complement bit pattern, optionally
/// zero-padded to `pad` digits.
///
/// ```
/// use regspace_generator::util::to_hex;
///
/// assert_eq!(to_hex(0x1A, None), "1a");
/// assert_eq!(to_hex(0x1A, Some(8)), "0000001a");
/// assert_eq!(to_hex(-1, Some(8)), "ffffffffffffffff");
/// ```
pub fn to_hex(v: i64, pad: Option<usize>) -> String {
    match pad {
        Some(pad) => format!("{:0pad$x}", v as u64),
        None => format!("{:x}", v as u64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_log2() {
        assert_eq!(ceil_log2(0), 0);
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(4), 2);
        assert_eq!(ceil_log2(1024), 10);
        assert_eq!(ceil_log2(1025), 11);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(0, None), "0");
        assert_eq!(to_hex(255, Some(4)), "00ff");
        // padding never truncates
        assert_eq!(to_hex(0x1234, Some(2)), "1234");
    }
}
