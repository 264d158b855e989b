//! Shared command-line plumbing for the `actlut` client binaries.
//!
//! Both binaries accept the same table parameters: an optional TOML
//! description file (`--config`) whose values are overridden by any flag
//! given on the command line.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod artifacts;

use std::path::PathBuf;

use actlut::config::TableSpec;
use actlut::{ActivationFn, AddressOrder, RoundingMode};
use anyhow::{Context, Result};
use clap::Args;
use tracing_subscriber::EnvFilter;

pub use artifacts::{write_artifacts, Built};

/// Table parameters shared by every client.
#[derive(Debug, Clone, Default, Args)]
pub struct TableArgs {
    /// TOML table description; flags below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Function to tabulate (`sigmoid`, `sigmoid-prime`).
    #[arg(long)]
    pub function: Option<ActivationFn>,

    /// Generate the sigmoid and its derivative together.
    #[arg(long)]
    pub paired: bool,

    /// Number of table entries (power of two).
    #[arg(long)]
    pub size: Option<usize>,

    /// Width of each stored value (the sigmoid's width when paired).
    #[arg(long)]
    pub value_bits: Option<u32>,

    /// Derivative width when paired (default: value bits - 2).
    #[arg(long)]
    pub derivative_bits: Option<u32>,

    /// Largest absolute input value (power of two).
    #[arg(long)]
    pub domain_bound: Option<u32>,

    /// Multiplier applied before quantization.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Rounding policy (`half-even`, `half-away-from-zero`, `truncate`).
    #[arg(long)]
    pub rounding: Option<RoundingMode>,

    /// Emission order (`signed`, `unsigned`).
    #[arg(long)]
    pub order: Option<AddressOrder>,
}

impl TableArgs {
    /// Loads the description file, if any, and layers the flags on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the description file cannot be read or parsed, or
    /// if the layered settings conflict (see [`TableSpec::validate`]).
    pub fn resolve(&self) -> Result<TableSpec> {
        let mut spec = match &self.config {
            Some(path) => TableSpec::load(path)
                .with_context(|| format!("Failed to load table description {}", path.display()))?,
            None => TableSpec::default(),
        };

        let t = &mut spec.table;
        if let Some(function) = self.function {
            t.function = function;
        }
        if self.paired {
            t.paired = true;
        }
        if let Some(size) = self.size {
            t.size = size;
        }
        if let Some(bits) = self.value_bits {
            t.value_bits = bits;
        }
        if let Some(bits) = self.derivative_bits {
            t.derivative_bits = Some(bits);
        }
        if let Some(bound) = self.domain_bound {
            t.domain_bound = bound;
        }
        if let Some(scale) = self.scale {
            t.scale_factor = Some(scale);
        }
        if let Some(rounding) = self.rounding {
            t.rounding = rounding;
        }
        if let Some(order) = self.order {
            t.order = order;
        }
        spec.validate().context("Conflicting table options")?;
        Ok(spec)
    }
}

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`.
///
/// Without `RUST_LOG`, `verbose` selects `debug` for the table crates and
/// `warn` otherwise.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "actlut=debug,actlut_clients=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
