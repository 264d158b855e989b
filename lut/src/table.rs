//! The tabulator: configuration in, ordered fixed-point entries out.

use tracing::{debug, trace};

use crate::bits;
use crate::error::{Result, TableError};
use crate::model::{ActivationFn, AddressOrder, RoundingMode, TableConfig};
use crate::quantize::{dequantize, quantize};

/// One cell of a lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    /// Signed fixed-point address.
    pub address: i64,
    /// Unsigned fixed-point value code.
    pub value: u64,
    /// Whether `value` was clamped to the largest (or smallest) code.
    pub saturated: bool,
}

/// A fully computed lookup table.
///
/// Entries are computed eagerly by [`generate_table`] and never change.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    config: TableConfig,
    entries: Vec<TableEntry>,
}

/// Tabulates `config.function()` over every address of the table.
///
/// Each address `n` in `[-size/2, size/2)` maps to `z = n / 2^fractional_bits`;
/// the stored code is `round(scale * f(z) * 2^value_bits)`, saturated to the
/// value width. Entries are returned in the configured [`AddressOrder`].
#[must_use]
pub fn generate_table(config: &TableConfig) -> Table {
    let encoding = config.encoding();
    let function = config.function();
    let scale = config.scale_factor();
    let value_bits = config.value_bits();
    let rounding = config.rounding();

    let entries: Vec<TableEntry> = addresses(config)
        .map(|address| {
            let z = encoding.to_real(address);
            let q = quantize(scale * function.eval(z), value_bits, rounding);
            if q.saturated {
                trace!(address, z, code = q.code, "value saturated");
            }
            TableEntry {
                address,
                value: q.code,
                saturated: q.saturated,
            }
        })
        .collect();

    let table = Table {
        config: config.clone(),
        entries,
    };
    debug!(
        function = %function,
        size = config.size(),
        value_bits,
        domain_bound = config.domain_bound(),
        fractional_bits = encoding.fractional_bits,
        saturated = table.saturated_count(),
        "generated table"
    );
    table
}

fn addresses(config: &TableConfig) -> impl Iterator<Item = i64> {
    let enc = config.encoding();
    let size = config.size() as i64;
    let (min, max) = (enc.min_address(), enc.max_address());
    let order = config.order();
    (0..size).map(move |i| match order {
        AddressOrder::Signed => min + i,
        AddressOrder::Unsigned if i <= max => i,
        AddressOrder::Unsigned => i - size,
    })
}

impl Table {
    /// Shorthand for [`generate_table`].
    #[must_use]
    pub fn generate(config: &TableConfig) -> Self {
        generate_table(config)
    }

    /// Configuration the table was built from.
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Entries in emission order.
    #[must_use]
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    /// Number of entries; always equals `config().size()`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True only for a table with no entries, which generation never produces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, TableEntry> {
        self.entries.iter()
    }

    /// Entry stored at signed address `address`, if in range.
    #[must_use]
    pub fn entry(&self, address: i64) -> Option<&TableEntry> {
        let enc = self.config.encoding();
        if address < enc.min_address() || address > enc.max_address() {
            return None;
        }
        let index = match self.config.order() {
            AddressOrder::Signed => (address - enc.min_address()) as usize,
            AddressOrder::Unsigned => enc.rom_index(address) as usize,
        };
        self.entries.get(index)
    }

    /// Entry whose address cell contains the real input `z`.
    ///
    /// Inputs outside `[-domain_bound, domain_bound)` resolve to the nearest
    /// edge entry.
    #[must_use]
    pub fn lookup(&self, z: f64) -> Option<&TableEntry> {
        self.entry(self.config.encoding().from_real(z))
    }

    /// Approximation of `scale * f(z)` read back from the table.
    #[must_use]
    pub fn approximate(&self, z: f64) -> Option<f64> {
        self.lookup(z)
            .map(|e| dequantize(e.value, self.config.value_bits()))
    }

    /// Number of entries whose value was clamped.
    #[must_use]
    pub fn saturated_count(&self) -> usize {
        self.entries.iter().filter(|e| e.saturated).count()
    }

    /// Two's-complement address digits, `log2(size)` wide.
    #[must_use]
    pub fn address_bits(&self, entry: &TableEntry) -> String {
        bits::signed_bits(entry.address, self.config.encoding().total_bits)
    }

    /// Zero-padded value digits, `value_bits` wide.
    #[must_use]
    pub fn value_bits(&self, entry: &TableEntry) -> String {
        bits::unsigned_bits(entry.value, self.config.value_bits())
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a TableEntry;
    type IntoIter = std::slice::Iter<'a, TableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// Paired sigmoid / derivative tables
// ============================================================================

/// Sigmoid and derivative tables over the same address domain.
///
/// Both tables share size, domain bound, and order, so their entries line
/// up row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePair {
    sigmoid: Table,
    prime: Table,
}

impl TablePair {
    /// Generates both tables.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidConfiguration`] if the configs are not a
    /// sigmoid and a derivative config, or if their size, domain bound, or
    /// address order differ.
    pub fn generate(sigmoid: &TableConfig, prime: &TableConfig) -> Result<Self> {
        if sigmoid.function() != ActivationFn::Sigmoid
            || prime.function() != ActivationFn::SigmoidPrime
        {
            return Err(TableError::invalid(
                "a table pair needs one sigmoid and one sigmoid-prime config",
            ));
        }
        if sigmoid.size() != prime.size()
            || sigmoid.domain_bound() != prime.domain_bound()
            || sigmoid.order() != prime.order()
        {
            return Err(TableError::invalid(
                "paired tables must share size, domain bound, and address order",
            ));
        }
        Ok(Self {
            sigmoid: generate_table(sigmoid),
            prime: generate_table(prime),
        })
    }

    /// Builds the pair from a single word width: the sigmoid uses
    /// `word_bits`, the derivative `word_bits - 2` with its default scale of 4.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidConfiguration`] if `word_bits < 3` or the
    /// shared size and domain bound are invalid.
    pub fn from_word_bits(
        size: usize,
        word_bits: u32,
        domain_bound: u32,
        rounding: RoundingMode,
        order: AddressOrder,
    ) -> Result<Self> {
        if word_bits < 3 {
            return Err(TableError::invalid(format!(
                "word width {word_bits} leaves no derivative bits (need at least 3)"
            )));
        }
        let build = |function, value_bits| {
            TableConfig::builder(function)
                .size(size)
                .value_bits(value_bits)
                .domain_bound(domain_bound)
                .rounding(rounding)
                .order(order)
                .build()
        };
        let sigmoid = build(ActivationFn::Sigmoid, word_bits)?;
        let prime = build(ActivationFn::SigmoidPrime, word_bits - 2)?;
        Self::generate(&sigmoid, &prime)
    }

    /// The sigmoid table.
    #[must_use]
    pub fn sigmoid(&self) -> &Table {
        &self.sigmoid
    }

    /// The derivative table.
    #[must_use]
    pub fn prime(&self) -> &Table {
        &self.prime
    }

    /// Row-aligned `(sigmoid, derivative)` entries.
    pub fn rows(&self) -> impl Iterator<Item = (&TableEntry, &TableEntry)> {
        self.sigmoid.iter().zip(self.prime.iter())
    }
}
