//! Memory-initialisation serializer.
//!
//! Writes `@ADDR VALUE` lines with uppercase hex. `ADDR` is the entry's ROM
//! index (address bits read unsigned), so the file loads correctly whatever
//! the table's emission order.

use std::fmt::Write as FmtWrite;

use crate::bits;
use crate::table::Table;

/// Serializes up to `depth` entries (all when `None`) as memory-init lines.
#[must_use]
pub fn to_mem(table: &Table, depth: Option<usize>) -> String {
    let config = table.config();
    let enc = config.encoding();
    let digits = bits::hex_digits(config.value_bits()) as usize;
    let limit = depth.unwrap_or(table.len()).min(table.len());

    let mut out = String::with_capacity(limit * (digits + 8));
    for entry in table.iter().take(limit) {
        let _ = writeln!(
            out,
            "@{:X} {:0>digits$X}",
            enc.rom_index(entry.address),
            entry.value
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivationFn, AddressOrder, TableConfig};

    #[test]
    fn addresses_are_rom_indices() {
        let table = Table::generate(&TableConfig::new(ActivationFn::Sigmoid, 1024, 8, 8).unwrap());
        let text = to_mem(&table, None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1024);
        assert_eq!(lines[0], "@200 00");
        assert_eq!(lines[512], "@0 80");
        assert_eq!(lines[1023], "@1FF FF");
    }

    #[test]
    fn depth_limits_output() {
        let config = TableConfig::builder(ActivationFn::Sigmoid)
            .order(AddressOrder::Unsigned)
            .build()
            .unwrap();
        let table = Table::generate(&config);
        let text = to_mem(&table, Some(16));
        assert_eq!(text.lines().count(), 16);
        assert_eq!(text.lines().next(), Some("@0 80"));
        assert_eq!(to_mem(&table, Some(5000)).lines().count(), 1024);
    }
}
