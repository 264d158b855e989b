//! Property-based tests for the tabulator.
//!
//! Random valid configurations are drawn from small size / width / domain
//! ranges so that every case stays cheap to generate.

use std::collections::HashSet;

use actlut::bits::{parse_bits, signed_bits};
use actlut::quantize::dequantize;
use actlut::verify::verify_table;
use actlut::{generate_table, ActivationFn, AddressOrder, RoundingMode, TableConfig};
use proptest::prelude::*;

fn function() -> impl Strategy<Value = ActivationFn> {
    prop_oneof![Just(ActivationFn::Sigmoid), Just(ActivationFn::SigmoidPrime)]
}

fn rounding() -> impl Strategy<Value = RoundingMode> {
    prop_oneof![
        Just(RoundingMode::HalfEven),
        Just(RoundingMode::HalfAwayFromZero),
        Just(RoundingMode::Truncate),
    ]
}

fn order() -> impl Strategy<Value = AddressOrder> {
    prop_oneof![Just(AddressOrder::Signed), Just(AddressOrder::Unsigned)]
}

/// Valid configs: 2..=12 address bits, domain bound leaving a fractional bit.
fn valid_config() -> impl Strategy<Value = TableConfig> {
    (2u32..=12)
        .prop_flat_map(|addr_bits| {
            (
                Just(addr_bits),
                0u32..(addr_bits - 1),
                1u32..=16,
                function(),
                rounding(),
                order(),
            )
        })
        .prop_map(|(addr_bits, bound_log2, value_bits, f, r, o)| {
            TableConfig::builder(f)
                .size(1usize << addr_bits)
                .domain_bound(1u32 << bound_log2)
                .value_bits(value_bits)
                .rounding(r)
                .order(o)
                .build()
                .unwrap()
        })
}

// =============================================================================
// Shape
// =============================================================================

proptest! {
    /// Exactly `size` entries with distinct addresses covering the signed range.
    #[test]
    fn prop_full_distinct_address_range(config in valid_config()) {
        let table = generate_table(&config);
        prop_assert_eq!(table.len(), config.size());

        let half = (config.size() / 2) as i64;
        let addrs: HashSet<i64> = table.iter().map(|e| e.address).collect();
        prop_assert_eq!(addrs.len(), config.size());
        prop_assert!(addrs.iter().all(|&a| (-half..half).contains(&a)));
    }

    /// Every value fits in `value_bits`.
    #[test]
    fn prop_values_never_escape_width(config in valid_config()) {
        let table = generate_table(&config);
        let limit = 1u64 << config.value_bits();
        for e in table.iter() {
            prop_assert!(e.value < limit);
            prop_assert_eq!(table.value_bits(e).len(), config.value_bits() as usize);
        }
    }

    /// Signed order is ascending; unsigned order is ascending in ROM index.
    #[test]
    fn prop_emission_order(config in valid_config()) {
        let table = generate_table(&config);
        let enc = config.encoding();
        for pair in table.entries().windows(2) {
            match config.order() {
                AddressOrder::Signed => prop_assert!(pair[0].address < pair[1].address),
                AddressOrder::Unsigned => prop_assert!(
                    enc.rom_index(pair[0].address) < enc.rom_index(pair[1].address)
                ),
            }
        }
    }
}

// =============================================================================
// Function shape
// =============================================================================

proptest! {
    /// Sigmoid values never decrease as the signed address increases.
    #[test]
    fn prop_sigmoid_monotonic(
        addr_bits in 3u32..=12,
        value_bits in 1u32..=16,
        r in rounding(),
    ) {
        let config = TableConfig::builder(ActivationFn::Sigmoid)
            .size(1usize << addr_bits)
            .domain_bound(2)
            .value_bits(value_bits)
            .rounding(r)
            .build()
            .unwrap();
        let table = generate_table(&config);
        for pair in table.entries().windows(2) {
            prop_assert!(pair[0].value <= pair[1].value);
        }
    }

    /// The derivative is even: value(n) == value(-n).
    #[test]
    fn prop_derivative_symmetric(config in valid_config()) {
        prop_assume!(config.function() == ActivationFn::SigmoidPrime);
        let table = generate_table(&config);
        let max = config.encoding().max_address();
        for n in 1..=max {
            let pos = table.entry(n).unwrap();
            let neg = table.entry(-n).unwrap();
            prop_assert_eq!(pos.value, neg.value);
        }
    }

    /// The built-in self-checks agree with the properties above.
    #[test]
    fn prop_self_checks_pass(config in valid_config()) {
        let report = verify_table(&generate_table(&config));
        prop_assert!(report.all_passed(), "{:#?}", report.results);
    }
}

// =============================================================================
// Encoding
// =============================================================================

proptest! {
    /// Decoding an emitted value string reproduces the stored code, and
    /// dividing by 2^value_bits gives back the quantized real value.
    #[test]
    fn prop_value_bits_round_trip(config in valid_config()) {
        let table = generate_table(&config);
        for e in table.iter() {
            let decoded = parse_bits(&table.value_bits(e)).unwrap();
            prop_assert_eq!(decoded, e.value);
            let real = dequantize(decoded, config.value_bits());
            prop_assert_eq!(real * f64::from(config.value_bits()).exp2(), e.value as f64);
        }
    }

    /// Address strings are the two's-complement form of the address.
    #[test]
    fn prop_address_bits_twos_complement(config in valid_config()) {
        let table = generate_table(&config);
        let width = config.encoding().total_bits;
        for e in table.iter() {
            let digits = table.address_bits(e);
            prop_assert_eq!(digits.len(), width as usize);
            prop_assert_eq!(&digits, &signed_bits(e.address, width));
            let raw = parse_bits(&digits).unwrap();
            prop_assert_eq!(raw, config.encoding().rom_index(e.address));
        }
    }
}
