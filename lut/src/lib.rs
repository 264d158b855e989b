//! Fixed-point lookup tables for the logistic sigmoid and its derivative.
//!
//! The `actlut` crate tabulates a continuous activation function over a
//! quantized, signed address domain and encodes every value as an unsigned
//! fixed-point code, ready to be embedded as a read-only table in hardware.
//! Serializers turn a table into Verilog case items, raw binary or hex dumps,
//! or memory-init files.
//!
//! # Entry Point
//!
//! ```
//! use actlut::{generate_table, ActivationFn, TableConfig};
//!
//! let config = TableConfig::new(ActivationFn::Sigmoid, 1024, 8, 8)?;
//! let table = generate_table(&config);
//! assert_eq!(table.len(), 1024);
//! assert_eq!(table.entry(0).map(|e| e.value), Some(128));
//! # Ok::<(), actlut::TableError>(())
//! ```
//!
//! # Serialization
//!
//! ```
//! use actlut::serializer::{render, OutputFormat, RenderOptions};
//! # use actlut::{generate_table, ActivationFn, TableConfig};
//! # let table = generate_table(&TableConfig::new(ActivationFn::Sigmoid, 1024, 8, 8)?);
//! let case = render(&table, OutputFormat::Case, &RenderOptions::default())?;
//! assert!(case.starts_with("\t\t10'b1000000000: sigmoid = 8'b"));
//! # Ok::<(), actlut::TableError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod bits;
#[cfg(feature = "config")]
pub mod config;
pub mod error;
pub mod model;
pub mod quantize;
pub mod serializer;
pub mod table;
pub mod verify;

pub use error::{Result, TableError};
pub use model::{
    ActivationFn, AddressEncoding, AddressOrder, RoundingMode, TableConfig, TableConfigBuilder,
};
pub use table::{generate_table, Table, TableEntry, TablePair};

/// Conventional artifact file name for a single table.
///
/// `sigmoid_table_size1024_word8_maxdom8.v` for a case table of the
/// reference sigmoid.
#[must_use]
pub fn artifact_name(config: &TableConfig, extension: &str) -> String {
    format!(
        "{}_table_size{}_word{}_maxdom{}.{}",
        config.function().signal_name(),
        config.size(),
        config.value_bits(),
        config.domain_bound(),
        extension
    )
}

/// Conventional artifact file name for a sigmoid/derivative pair.
///
/// The word width is the sigmoid's.
#[must_use]
pub fn pair_artifact_name(pair: &TablePair, extension: &str) -> String {
    let config = pair.sigmoid().config();
    format!(
        "sigmoid_sigmoidprime_table_size{}_word{}_maxdom{}.{}",
        config.size(),
        config.value_bits(),
        config.domain_bound(),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names_follow_convention() {
        let config = TableConfig::new(ActivationFn::SigmoidPrime, 4096, 12, 8).unwrap();
        assert_eq!(
            artifact_name(&config, "dat"),
            "sigmoid_prime_table_size4096_word12_maxdom8.dat"
        );

        let pair =
            TablePair::from_word_bits(1024, 6, 8, RoundingMode::HalfEven, AddressOrder::Signed)
                .unwrap();
        assert_eq!(
            pair_artifact_name(&pair, "dat"),
            "sigmoid_sigmoidprime_table_size1024_word6_maxdom8.dat"
        );
    }
}
