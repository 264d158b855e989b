//! Verilog case-table serializer.
//!
//! Each entry becomes one case item:
//!
//! ```text
//! \t\t10'b1000000000: sigmoid = 8'b00000000;
//! ```
//!
//! The paired form assigns both signals from one address:
//!
//! ```text
//! \t\t10'b1000000000: begin sigmoid <= 6'b000000; sigmoid_prime <= 4'b0000; end
//! ```

use std::fmt::Write as FmtWrite;

use super::RenderOptions;
use crate::table::{Table, TablePair};

/// Serializes `table` as Verilog case items, one line per entry.
#[must_use]
pub fn to_case_table(table: &Table, options: &RenderOptions) -> String {
    let config = table.config();
    let addr_width = config.encoding().total_bits;
    let value_width = config.value_bits();
    let signal = options
        .signal
        .as_deref()
        .unwrap_or_else(|| config.function().signal_name());

    let mut out = String::with_capacity(table.len() * 48);
    if options.header {
        let _ = writeln!(out, "{}", layout_comment(table));
    }
    for entry in table {
        let _ = writeln!(
            out,
            "\t\t{addr_width}'b{}: {signal} = {value_width}'b{};",
            table.address_bits(entry),
            table.value_bits(entry)
        );
    }
    out
}

/// Serializes a sigmoid/derivative pair as combined `begin ... end` case items.
#[must_use]
pub fn to_paired_case_table(pair: &TablePair, header: bool) -> String {
    let (sig, prime) = (pair.sigmoid(), pair.prime());
    let addr_width = sig.config().encoding().total_bits;
    let sig_width = sig.config().value_bits();
    let prime_width = prime.config().value_bits();
    let sig_name = sig.config().function().signal_name();
    let prime_name = prime.config().function().signal_name();

    let mut out = String::with_capacity(sig.len() * 80);
    if header {
        let _ = writeln!(out, "{}", layout_comment(sig));
        let _ = writeln!(out, "{}", layout_comment(prime));
    }
    for (s, p) in pair.rows() {
        let _ = writeln!(
            out,
            "\t\t{addr_width}'b{}: begin {sig_name} <= {sig_width}'b{}; \
             {prime_name} <= {prime_width}'b{}; end",
            sig.address_bits(s),
            sig.value_bits(s),
            prime.value_bits(p)
        );
    }
    out
}

/// One-line `//` comment describing the address and value layouts.
#[must_use]
pub fn layout_comment(table: &Table) -> String {
    let config = table.config();
    let enc = config.encoding();
    let value_step = (-f64::from(config.value_bits())).exp2() / config.scale_factor();
    format!(
        "// {}: sign, {}bits_i, {}bits_f ~ {}  --->  {}bits_f ~ {} (scale {})",
        config.function().signal_name(),
        enc.sign_and_integer_bits - 1,
        enc.fractional_bits,
        enc.step(),
        config.value_bits(),
        value_step,
        config.scale_factor()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivationFn, AddressOrder, RoundingMode, TableConfig};

    fn table(function: ActivationFn) -> Table {
        Table::generate(&TableConfig::new(function, 1024, 8, 8).unwrap())
    }

    #[test]
    fn one_line_per_entry() {
        let text = to_case_table(&table(ActivationFn::Sigmoid), &RenderOptions::default());
        assert_eq!(text.lines().count(), 1024);
    }

    #[test]
    fn line_shape_matches_case_item() {
        let text = to_case_table(&table(ActivationFn::Sigmoid), &RenderOptions::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "\t\t10'b1000000000: sigmoid = 8'b00000000;");
        assert_eq!(lines[512], "\t\t10'b0000000000: sigmoid = 8'b10000000;");
        assert_eq!(lines[1023], "\t\t10'b0111111111: sigmoid = 8'b11111111;");
    }

    #[test]
    fn custom_signal_and_header() {
        let opts = RenderOptions {
            header: true,
            signal: Some("act".to_string()),
            mem_depth: None,
        };
        let text = to_case_table(&table(ActivationFn::SigmoidPrime), &opts);
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("// sigmoid_prime: sign, 3bits_i, 6bits_f ~ 0.015625"));
        assert!(lines.next().unwrap().contains(": act = 8'b"));
    }

    #[test]
    fn paired_lines_carry_both_signals() {
        let pair =
            TablePair::from_word_bits(1024, 6, 8, RoundingMode::HalfEven, AddressOrder::Signed)
                .unwrap();
        let text = to_paired_case_table(&pair, false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1024);
        // z = 0: sigmoid 0.5 -> 32 of 64; 4 * 0.25 = 1.0 saturates to 15.
        assert_eq!(
            lines[512],
            "\t\t10'b0000000000: begin sigmoid <= 6'b100000; sigmoid_prime <= 4'b1111; end"
        );
    }
}
