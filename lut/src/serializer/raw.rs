//! Raw value dumps: newline-delimited binary or hex digits, or a single
//! comma-separated hex list.
//!
//! Only values are written; the address of each line is implied by the
//! table's emission order.

use crate::bits;
use crate::error::Result;
use crate::table::Table;

/// Digit encoding of a raw dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEncoding {
    /// Zero-padded binary digits, `value_bits` per line.
    Binary,
    /// Lowercase hex digits, four binary digits per nibble.
    Hex,
}

/// Serializes every value on its own line.
///
/// # Errors
///
/// Returns [`crate::TableError::InvalidBitString`] only if the binary
/// encoding produced non-binary digits.
pub fn to_raw(table: &Table, encoding: RawEncoding) -> Result<String> {
    let mut out = String::with_capacity(table.len() * (table.config().value_bits() as usize + 1));
    for entry in table {
        let digits = table.value_bits(entry);
        match encoding {
            RawEncoding::Binary => out.push_str(&digits),
            RawEncoding::Hex => out.push_str(&bits::bin_to_hex(&digits)?),
        }
        out.push('\n');
    }
    Ok(out)
}

/// Serializes every value as uppercase hex, each followed by a comma.
///
/// # Errors
///
/// Same as [`to_raw`].
pub fn to_hex_list(table: &Table) -> Result<String> {
    let mut out = String::with_capacity(table.len() * 4);
    for entry in table {
        out.push_str(&bits::bin_to_hex(&table.value_bits(entry))?.to_uppercase());
        out.push(',');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivationFn, TableConfig};

    fn small() -> Table {
        // 16 entries over [-2, 2), 6-bit values
        Table::generate(&TableConfig::new(ActivationFn::Sigmoid, 16, 6, 2).unwrap())
    }

    #[test]
    fn binary_lines_are_fixed_width() {
        let text = to_raw(&small(), RawEncoding::Binary).unwrap();
        assert_eq!(text.lines().count(), 16);
        assert!(text.lines().all(|l| l.len() == 6));
        // address 0 sits at index 8 in signed order: 0.5 * 64 = 32
        assert_eq!(text.lines().nth(8), Some("100000"));
    }

    #[test]
    fn hex_lines_pad_to_whole_nibbles() {
        let text = to_raw(&small(), RawEncoding::Hex).unwrap();
        assert!(text.lines().all(|l| l.len() == 2));
        assert_eq!(text.lines().nth(8), Some("20"));
    }

    #[test]
    fn hex_list_is_comma_terminated_uppercase() {
        let text = to_hex_list(&small()).unwrap();
        assert_eq!(text.matches(',').count(), 16);
        assert!(text.ends_with(','));
        assert!(!text.chars().any(|c| c.is_ascii_lowercase()));
    }
}
