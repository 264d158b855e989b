//! `actlut-verify` — Generates a table and runs its self-checks.
//!
//! Checks cardinality, address coverage, value range, monotonicity of the
//! sigmoid, symmetry of the derivative, saturation, and bit-string round
//! trips.
//!
//! **Usage:**
//! ```text
//! actlut-verify [--config <table.toml>] [--function sigmoid] [--size 1024] ...
//! ```
//!
//! Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::process;

use actlut::generate_table;
use actlut::verify::{verify_pair, verify_table, Severity};
use actlut_clients::{init_tracing, TableArgs};
use anyhow::{Context, Result};
use clap::Parser;

/// Run the table self-checks.
#[derive(Parser)]
#[command(name = "actlut-verify", about = "Check a generated table against its invariants")]
struct Args {
    #[command(flatten)]
    table: TableArgs,

    /// Log generation details to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let spec = args.table.resolve()?;
    let report = if spec.table.paired {
        verify_pair(&spec.to_pair().context("Invalid table configuration")?)
    } else {
        verify_table(&generate_table(
            &spec.to_config().context("Invalid table configuration")?,
        ))
    };

    println!("Table Self-Check Report");
    println!("=======================");
    println!();

    for result in &report.results {
        let status = match result.severity {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        };
        println!("[{}] {} - {}", status, result.check, result.message);
        for detail in &result.details {
            println!("       {}", detail);
        }
    }

    let failed = report.failure_count();
    let warned = report.warning_count();
    let passed = report.results.len() - failed - warned;
    println!();
    println!("Summary: {passed} passed, {warned} warnings, {failed} failed");

    if failed > 0 {
        eprintln!("Self-check FAILED: {failed} check(s) did not pass.");
        process::exit(1);
    }

    println!("Self-check PASSED.");
    Ok(())
}
