//! Serializers for generated tables.
//!
//! Each format consumes the entry sequence of a [`Table`] and is independent
//! of how the table was computed:
//! - **Case table** ([`case`]): Verilog `case` items, one per address
//! - **Raw** ([`raw`]): one value per line, binary or hex digits
//! - **Hex list** ([`raw::to_hex_list`]): comma-separated uppercase hex values
//! - **Memory init** ([`mem`]): `@ADDR VALUE` lines for memory initialisation

pub mod case;
pub mod mem;
pub mod raw;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::error::{Result, TableError};
use crate::table::{Table, TablePair};

/// Artifact formats understood by [`render`] and [`write_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum OutputFormat {
    /// Verilog case items.
    #[default]
    Case,
    /// One binary value per line.
    Binary,
    /// One hex value per line.
    Hex,
    /// Comma-separated uppercase hex values.
    HexList,
    /// `@ADDR VALUE` memory-init lines.
    Mem,
}

impl OutputFormat {
    /// File extension conventionally used for the format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            OutputFormat::Case => "v",
            OutputFormat::Binary | OutputFormat::Hex | OutputFormat::HexList => "dat",
            OutputFormat::Mem => "mem",
        }
    }

    /// Kebab-case name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Case => "case",
            OutputFormat::Binary => "binary",
            OutputFormat::Hex => "hex",
            OutputFormat::HexList => "hex-list",
            OutputFormat::Mem => "mem",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "case" | "verilog" => Ok(OutputFormat::Case),
            "binary" | "bin" => Ok(OutputFormat::Binary),
            "hex" => Ok(OutputFormat::Hex),
            "hex-list" => Ok(OutputFormat::HexList),
            "mem" => Ok(OutputFormat::Mem),
            other => Err(TableError::invalid(format!("unknown output format `{other}`"))),
        }
    }
}

/// Format-specific knobs; formats ignore the fields they do not use.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Prefix case tables with a `//` comment describing the bit layout.
    pub header: bool,
    /// Signal name for case assignments; defaults to the function's name.
    pub signal: Option<String>,
    /// Emit at most this many memory-init lines.
    pub mem_depth: Option<usize>,
}

/// Renders a single table in `format`.
///
/// # Errors
///
/// Returns [`TableError::InvalidBitString`] only if an internal encoding
/// produced non-binary digits.
pub fn render(table: &Table, format: OutputFormat, options: &RenderOptions) -> Result<String> {
    match format {
        OutputFormat::Case => Ok(case::to_case_table(table, options)),
        OutputFormat::Binary => raw::to_raw(table, raw::RawEncoding::Binary),
        OutputFormat::Hex => raw::to_raw(table, raw::RawEncoding::Hex),
        OutputFormat::HexList => raw::to_hex_list(table),
        OutputFormat::Mem => Ok(mem::to_mem(table, options.mem_depth)),
    }
}

/// Renders a sigmoid/derivative pair.
///
/// Case tables become a single combined `begin ... end` table; every other
/// format yields one rendering per table, sigmoid first.
///
/// # Errors
///
/// Same as [`render`].
pub fn render_pair(
    pair: &TablePair,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<Vec<String>> {
    match format {
        OutputFormat::Case => Ok(vec![case::to_paired_case_table(pair, options.header)]),
        _ => Ok(vec![
            render(pair.sigmoid(), format, options)?,
            render(pair.prime(), format, options)?,
        ]),
    }
}

/// Renders `table` and writes it to `sink`.
///
/// # Errors
///
/// Returns [`TableError::Io`] if the sink rejects the write.
pub fn write_to<W: Write>(
    sink: &mut W,
    table: &Table,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<()> {
    let text = render(table, format, options)?;
    sink.write_all(text.as_bytes())?;
    sink.flush()?;
    Ok(())
}
