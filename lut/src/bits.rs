//! Binary and hexadecimal digit-string encodings.
//!
//! Table addresses are written as two's-complement strings of the full
//! address width; table values are written as zero-padded unsigned strings.
//! Hex output groups four binary digits per nibble, padding on the left when
//! the digit count is not a multiple of four.

use crate::error::{Result, TableError};

/// Returns the number of binary digits needed to represent `value`.
///
/// Zero needs no digits, matching `int.bit_length()` semantics.
#[must_use]
pub const fn bit_length(value: u64) -> u32 {
    u64::BITS - value.leading_zeros()
}

/// Encodes `n` as a two's-complement binary string of exactly `width` digits.
///
/// Bits above `width` are discarded, so `-1` at width 4 is `"1111"`.
#[must_use]
pub fn signed_bits(n: i64, width: u32) -> String {
    let mask = if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    };
    format!("{:0>width$b}", (n as u64) & mask, width = width as usize)
}

/// Encodes `value` as a zero-padded binary string of `width` digits.
///
/// A value wider than `width` is returned in full (unpadded), so callers can
/// detect overflow from the string length.
#[must_use]
pub fn unsigned_bits(value: u64, width: u32) -> String {
    format!("{:0>width$b}", value, width = width as usize)
}

/// Decodes an unsigned binary string.
///
/// # Errors
///
/// Returns [`TableError::InvalidBitString`] if the string is empty, contains
/// anything other than `0`/`1`, or is wider than 64 digits.
pub fn parse_bits(bits: &str) -> Result<u64> {
    if bits.is_empty() || bits.len() > 64 || !is_binary(bits) {
        return Err(TableError::InvalidBitString(bits.to_string()));
    }
    u64::from_str_radix(bits, 2).map_err(|_| TableError::InvalidBitString(bits.to_string()))
}

/// Converts a binary digit string to lowercase hex, one nibble per four digits.
///
/// Leading zeros are added until the digit count is a multiple of four.
///
/// # Errors
///
/// Returns [`TableError::InvalidBitString`] on any non-binary character.
pub fn bin_to_hex(bits: &str) -> Result<String> {
    if !is_binary(bits) {
        return Err(TableError::InvalidBitString(bits.to_string()));
    }
    let pad = (4 - bits.len() % 4) % 4;
    let padded: Vec<u8> = std::iter::repeat(b'0')
        .take(pad)
        .chain(bits.bytes())
        .collect();

    let mut out = String::with_capacity(padded.len() / 4);
    for nibble in padded.chunks(4) {
        let v = nibble
            .iter()
            .fold(0u32, |acc, &b| (acc << 1) | u32::from(b - b'0'));
        // v < 16 by construction
        if let Some(c) = char::from_digit(v, 16) {
            out.push(c);
        }
    }
    Ok(out)
}

/// Number of hex digits needed to show `width` binary digits.
#[must_use]
pub const fn hex_digits(width: u32) -> u32 {
    width.div_ceil(4)
}

fn is_binary(bits: &str) -> bool {
    bits.bytes().all(|b| b == b'0' || b == b'1')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_length_matches_digit_count() {
        assert_eq!(bit_length(0), 0);
        assert_eq!(bit_length(1), 1);
        assert_eq!(bit_length(255), 8);
        assert_eq!(bit_length(256), 9);
    }

    #[test]
    fn signed_bits_twos_complement() {
        assert_eq!(signed_bits(0, 10), "0000000000");
        assert_eq!(signed_bits(-512, 10), "1000000000");
        assert_eq!(signed_bits(511, 10), "0111111111");
        assert_eq!(signed_bits(-1, 4), "1111");
    }

    #[test]
    fn unsigned_bits_pads_but_never_truncates() {
        assert_eq!(unsigned_bits(128, 8), "10000000");
        assert_eq!(unsigned_bits(3, 8), "00000011");
        assert_eq!(unsigned_bits(256, 8), "100000000");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_bits("1111").ok(), Some(15));
        assert!(parse_bits("").is_err());
        assert!(parse_bits("10a1").is_err());
    }

    #[test]
    fn hex_groups_and_left_pads() {
        assert_eq!(bin_to_hex("01001111").ok().as_deref(), Some("4f"));
        assert_eq!(bin_to_hex("111").ok().as_deref(), Some("7"));
        assert_eq!(bin_to_hex("100000000").ok().as_deref(), Some("100"));
        assert!(bin_to_hex("12").is_err());
    }

    #[test]
    fn hex_digit_count() {
        assert_eq!(hex_digits(8), 2);
        assert_eq!(hex_digits(9), 3);
        assert_eq!(hex_digits(1), 1);
    }
}
