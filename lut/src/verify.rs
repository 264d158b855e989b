//! Self-checks over a generated table.
//!
//! Each check inspects the in-memory entries and reports pass, warning, or
//! failure:
//! - cardinality and address coverage (`table/addresses`)
//! - value range (`table/range`)
//! - monotonicity of monotonic functions (`table/monotonic`)
//! - symmetry of even functions (`table/symmetry`)
//! - saturation summary (`table/saturation`)
//! - bit-string round trip (`table/encoding`)
//!
//! These are internal consistency checks; nothing here knows about the
//! hardware that consumes the table.

use std::collections::HashSet;

use crate::bits;
use crate::table::{Table, TablePair};

/// How a check came out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The invariant holds.
    Pass,
    /// Worth a look, but the table is usable.
    Warning,
    /// The table violates an invariant.
    Failure,
}

/// Outcome of one check, with optional detail lines.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Check identifier, e.g. `table/range`.
    pub check: &'static str,
    /// Severity of the outcome.
    pub severity: Severity,
    /// One-line summary.
    pub message: String,
    /// Offending addresses or other detail lines.
    pub details: Vec<String>,
}

impl CheckResult {
    fn new(check: &'static str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            check,
            severity,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// A passing outcome.
    pub fn pass(check: &'static str, message: impl Into<String>) -> Self {
        Self::new(check, Severity::Pass, message)
    }

    /// A warning.
    pub fn warn(check: &'static str, message: impl Into<String>) -> Self {
        Self::new(check, Severity::Warning, message)
    }

    /// A failed invariant.
    pub fn fail(check: &'static str, message: impl Into<String>) -> Self {
        Self::new(check, Severity::Failure, message)
    }

    /// Attaches detail lines, keeping at most [`MAX_DETAILS`] of them.
    #[must_use]
    pub fn with_details(mut self, mut details: Vec<String>) -> Self {
        details.truncate(MAX_DETAILS);
        self.details = details;
        self
    }

    /// Returns true if this result is a failure.
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// Aggregated results of all checks.
#[derive(Debug, Default)]
pub struct VerifyReport {
    /// Individual results, in the order the checks ran.
    pub results: Vec<CheckResult>,
}

impl VerifyReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result.
    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// Appends every result of `other`.
    pub fn extend(&mut self, other: VerifyReport) {
        self.results.extend(other.results);
    }

    /// Number of failed checks.
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.severity == Severity::Warning)
            .count()
    }

    /// True if nothing failed.
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Detail lines kept per result.
pub const MAX_DETAILS: usize = 8;

/// Pushes a pass when `problems` is empty, otherwise a failure listing them.
fn settle(
    report: &mut VerifyReport,
    check: &'static str,
    problems: Vec<String>,
    ok: impl Into<String>,
    broken: &str,
) {
    let result = if problems.is_empty() {
        CheckResult::pass(check, ok)
    } else {
        CheckResult::fail(check, broken).with_details(problems)
    };
    report.push(result);
}

/// Runs every check against `table`.
pub fn verify_table(table: &Table) -> VerifyReport {
    let mut report = VerifyReport::new();
    check_addresses(table, &mut report);
    check_range(table, &mut report);
    check_monotonic(table, &mut report);
    check_symmetry(table, &mut report);
    check_saturation(table, &mut report);
    check_encoding(table, &mut report);
    report
}

/// Runs every check against both tables of a pair, plus row alignment.
pub fn verify_pair(pair: &TablePair) -> VerifyReport {
    let mut report = verify_table(pair.sigmoid());
    report.extend(verify_table(pair.prime()));

    let misaligned = pair
        .rows()
        .filter(|(s, p)| s.address != p.address)
        .map(|(s, p)| format!("sigmoid row {} vs derivative row {}", s.address, p.address))
        .collect();
    settle(
        &mut report,
        "pair/alignment",
        misaligned,
        "rows share addresses",
        "rows do not share addresses",
    );
    report
}

fn check_addresses(table: &Table, report: &mut VerifyReport) {
    const ID: &str = "table/addresses";
    let config = table.config();
    let enc = config.encoding();

    if table.len() != config.size() {
        report.push(CheckResult::fail(
            ID,
            format!("{} entries, expected {}", table.len(), config.size()),
        ));
        return;
    }

    let mut seen = HashSet::with_capacity(table.len());
    let mut problems = Vec::new();
    for entry in table {
        if entry.address < enc.min_address() || entry.address > enc.max_address() {
            problems.push(format!("address {} outside range", entry.address));
        } else if !seen.insert(entry.address) {
            problems.push(format!("address {} repeated", entry.address));
        }
    }

    settle(
        report,
        ID,
        problems,
        format!(
            "{} distinct addresses cover [{}, {}]",
            table.len(),
            enc.min_address(),
            enc.max_address()
        ),
        "address set is not the full signed range",
    );
}

fn check_range(table: &Table, report: &mut VerifyReport) {
    let max = table.config().max_value();
    let over = table
        .iter()
        .filter(|e| e.value > max)
        .map(|e| format!("address {}: value {} > {}", e.address, e.value, max))
        .collect();
    settle(
        report,
        "table/range",
        over,
        format!("all values <= {max}"),
        "values escaped saturation",
    );
}

fn check_monotonic(table: &Table, report: &mut VerifyReport) {
    let config = table.config();
    if !config.function().is_monotonic() {
        return;
    }

    let enc = config.encoding();
    let mut drops = Vec::new();
    let mut prev: Option<u64> = None;
    for address in enc.min_address()..=enc.max_address() {
        let Some(entry) = table.entry(address) else {
            continue;
        };
        if let Some(p) = prev {
            if entry.value < p {
                drops.push(format!("address {address}: {} after {p}", entry.value));
            }
        }
        prev = Some(entry.value);
    }

    settle(
        report,
        "table/monotonic",
        drops,
        "values never decrease with address",
        "values decrease somewhere along the address range",
    );
}

fn check_symmetry(table: &Table, report: &mut VerifyReport) {
    let config = table.config();
    if !config.function().is_even() {
        return;
    }

    // -size/2 has no mirror inside the table.
    let mut broken = Vec::new();
    for address in 1..=config.encoding().max_address() {
        if let (Some(pos), Some(neg)) = (table.entry(address), table.entry(-address)) {
            if pos.value != neg.value {
                broken.push(format!(
                    "address {address}: {} vs {} at {}",
                    pos.value, neg.value, -address
                ));
            }
        }
    }

    settle(
        report,
        "table/symmetry",
        broken,
        "value(n) == value(-n) for every mirrored pair",
        "even function tabulated asymmetrically",
    );
}

fn check_saturation(table: &Table, report: &mut VerifyReport) {
    const ID: &str = "table/saturation";
    let count = table.saturated_count();
    if count == 0 {
        report.push(CheckResult::pass(ID, "no values saturated"));
        return;
    }

    let clamped = table
        .iter()
        .filter(|e| e.saturated)
        .map(|e| format!("address {}", e.address))
        .collect();
    report.push(
        CheckResult::warn(
            ID,
            format!(
                "{count} of {} values saturated to {}",
                table.len(),
                table.config().max_value()
            ),
        )
        .with_details(clamped),
    );
}

fn check_encoding(table: &Table, report: &mut VerifyReport) {
    let value_width = table.config().value_bits() as usize;
    let addr_width = table.config().encoding().total_bits as usize;
    let mut problems = Vec::new();

    for entry in table {
        let value_digits = table.value_bits(entry);
        let address_digits = table.address_bits(entry);
        if value_digits.len() != value_width || address_digits.len() != addr_width {
            problems.push(format!(
                "address {}: {address_digits} / {value_digits} has the wrong width",
                entry.address
            ));
            continue;
        }
        match bits::parse_bits(&value_digits) {
            Ok(v) if v == entry.value => {}
            _ => problems.push(format!(
                "address {}: {value_digits} does not decode to {}",
                entry.address, entry.value
            )),
        }
    }

    settle(
        report,
        "table/encoding",
        problems,
        "every bit string decodes to its code",
        "bit strings do not round-trip",
    );
}
