//! Table description files.
//!
//! A description is a small TOML document naming the table parameters and,
//! optionally, how to write the result:
//!
//! ```toml
//! [table]
//! function = "sigmoid"      # or "sigmoid-prime"
//! size = 1024
//! value_bits = 8
//! domain_bound = 8
//! rounding = "half-even"    # "half-away-from-zero", "truncate"
//! order = "signed"          # "unsigned"
//!
//! [output]
//! format = "case"           # "binary", "hex", "hex-list", "mem"
//! header = true
//! ```
//!
//! Setting `paired = true` generates the sigmoid and its derivative together;
//! `value_bits` then sizes the sigmoid and `derivative_bits` (default
//! `value_bits - 2`) sizes the derivative.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::model::{ActivationFn, AddressOrder, RoundingMode, TableConfig};
use crate::serializer::{OutputFormat, RenderOptions};
use crate::table::TablePair;

/// A parsed table description file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSpec {
    /// Table parameters.
    #[serde(default)]
    pub table: TableSection,
    /// Output parameters.
    #[serde(default)]
    pub output: OutputSection,
}

/// The `[table]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableSection {
    /// Function to tabulate; ignored when `paired` is set.
    pub function: ActivationFn,
    /// Generate sigmoid and derivative together.
    pub paired: bool,
    /// Number of entries.
    pub size: usize,
    /// Width of each value (the sigmoid's width when paired).
    pub value_bits: u32,
    /// Derivative width when paired; defaults to `value_bits - 2`.
    pub derivative_bits: Option<u32>,
    /// Largest absolute input value.
    pub domain_bound: u32,
    /// Overrides the function's default scale factor (single tables only).
    pub scale_factor: Option<f64>,
    /// Rounding policy.
    pub rounding: RoundingMode,
    /// Emission order.
    pub order: AddressOrder,
}

impl Default for TableSection {
    fn default() -> Self {
        Self {
            function: ActivationFn::Sigmoid,
            paired: false,
            size: 1024,
            value_bits: 8,
            derivative_bits: None,
            domain_bound: 8,
            scale_factor: None,
            rounding: RoundingMode::default(),
            order: AddressOrder::default(),
        }
    }
}

/// The `[output]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    /// Artifact format.
    pub format: OutputFormat,
    /// Prefix case tables with a layout comment.
    pub header: bool,
    /// Signal name for single case tables.
    pub signal: Option<String>,
    /// Limit on memory-init lines.
    pub mem_depth: Option<usize>,
}

impl TableSpec {
    /// Parses a description from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Config`] if the text is not a valid description.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a description file.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Io`] if the file cannot be read, or
    /// [`TableError::Config`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Rejects settings that the selected mode would otherwise ignore.
    ///
    /// A paired description has no single scale factor or signal name, and a
    /// single table has no derivative width.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidConfiguration`] naming the first
    /// conflicting setting.
    pub fn validate(&self) -> Result<()> {
        let t = &self.table;
        if t.paired {
            if let Some(scale) = t.scale_factor {
                return Err(TableError::invalid(format!(
                    "scale factor {scale} cannot be applied to a paired table \
                     (sigmoid uses 1, derivative uses 4)"
                )));
            }
            if let Some(signal) = &self.output.signal {
                return Err(TableError::invalid(format!(
                    "signal name {signal:?} cannot be applied to a paired table"
                )));
            }
        } else if let Some(bits) = t.derivative_bits {
            return Err(TableError::invalid(format!(
                "derivative width {bits} only applies to paired tables"
            )));
        }
        Ok(())
    }

    /// Builds the single-table configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidConfiguration`] if the description is
    /// paired, carries a paired-only setting, or the parameters are invalid.
    pub fn to_config(&self) -> Result<TableConfig> {
        let t = &self.table;
        if t.paired {
            return Err(TableError::invalid(
                "description is paired; use to_pair() instead",
            ));
        }
        self.validate()?;
        let mut builder = TableConfig::builder(t.function)
            .size(t.size)
            .value_bits(t.value_bits)
            .domain_bound(t.domain_bound)
            .rounding(t.rounding)
            .order(t.order);
        if let Some(scale) = t.scale_factor {
            builder = builder.scale_factor(scale);
        }
        builder.build()
    }

    /// Generates the sigmoid/derivative pair.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidConfiguration`] if the description sets
    /// a scale factor or signal name, or if the shared parameters or either
    /// width are invalid.
    pub fn to_pair(&self) -> Result<TablePair> {
        self.validate()?;
        let t = &self.table;
        let derivative_bits = match t.derivative_bits {
            Some(bits) => bits,
            None if t.value_bits >= 3 => t.value_bits - 2,
            None => {
                return Err(TableError::invalid(format!(
                    "value width {} leaves no derivative bits (need at least 3)",
                    t.value_bits
                )))
            }
        };
        let build = |function, value_bits| {
            TableConfig::builder(function)
                .size(t.size)
                .value_bits(value_bits)
                .domain_bound(t.domain_bound)
                .rounding(t.rounding)
                .order(t.order)
                .build()
        };
        TablePair::generate(
            &build(ActivationFn::Sigmoid, t.value_bits)?,
            &build(ActivationFn::SigmoidPrime, derivative_bits)?,
        )
    }

    /// Serializer options from the `[output]` section.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            header: self.output.header,
            signal: self.output.signal.clone(),
            mem_depth: self.output.mem_depth,
        }
    }
}
