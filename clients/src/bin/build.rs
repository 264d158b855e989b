//! `actlut-build` — Generates fixed-point activation tables and writes them
//! to the output directory.
//!
//! **Outputs** (names follow the table parameters):
//! - `<out>/sigmoid_table_size<N>_word<W>_maxdom<D>.<ext>`
//! - `<out>/sigmoid_prime_table_size<N>_word<W>_maxdom<D>.<ext>`
//! - `<out>/sigmoid_sigmoidprime_table_size<N>_word<W>_maxdom<D>.v` (paired case table)
//!
//! **Usage:**
//! ```text
//! actlut-build [--config <table.toml>] [--function sigmoid] [--size 1024]
//!              [--value-bits 8] [--domain-bound 8] [--format case] [--out <path>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use actlut::serializer::OutputFormat;
use actlut::Table;
use actlut_clients::{init_tracing, write_artifacts, TableArgs};
use anyhow::Result;
use clap::Parser;

/// Build fixed-point activation lookup tables.
#[derive(Parser)]
#[command(name = "actlut-build", about = "Build fixed-point activation lookup tables")]
struct Args {
    #[command(flatten)]
    table: TableArgs,

    /// Artifact format (`case`, `binary`, `hex`, `hex-list`, `mem`).
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Prefix case tables with a bit-layout comment.
    #[arg(long)]
    header: bool,

    /// Signal name for single case tables.
    #[arg(long)]
    signal: Option<String>,

    /// Write at most this many memory-init lines.
    #[arg(long)]
    mem_depth: Option<usize>,

    /// Output directory for generated artifacts.
    #[arg(long, default_value = "tables")]
    out: PathBuf,

    /// Log generation details to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut spec = args.table.resolve()?;
    if let Some(format) = args.format {
        spec.output.format = format;
    }
    if args.header {
        spec.output.header = true;
    }
    if args.signal.is_some() {
        spec.output.signal.clone_from(&args.signal);
    }
    if args.mem_depth.is_some() {
        spec.output.mem_depth = args.mem_depth;
    }

    let built = write_artifacts(&spec, &args.out)?;
    for table in &built.tables {
        summarize(table);
    }
    for path in &built.paths {
        println!("  Written: {}", path.display());
    }

    println!("Build complete.");
    Ok(())
}

fn summarize(table: &Table) {
    let config = table.config();
    let enc = config.encoding();
    println!(
        "{}: {} entries, address {}.{} (sign+int.frac) over [-{}, {}), \
         {}-bit values x{}, {} rounding, {} saturated",
        config.function(),
        table.len(),
        enc.sign_and_integer_bits,
        enc.fractional_bits,
        config.domain_bound(),
        config.domain_bound(),
        config.value_bits(),
        config.scale_factor(),
        config.rounding(),
        table.saturated_count()
    );
}
