//! Table configuration model.
//!
//! A [`TableConfig`] is built once from literal parameters (or a table
//! description file) and never changes afterwards. Every derived quantity,
//! such as the address layout in [`AddressEncoding`], is computed from it.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TableError};

/// Widest address the tabulator will materialise.
pub const MAX_ADDRESS_BITS: u32 = 32;

/// Widest stored value.
pub const MAX_VALUE_BITS: u32 = 63;

// ============================================================================
// Functions
// ============================================================================

/// The continuous function being tabulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum ActivationFn {
    /// Logistic sigmoid `1 / (1 + e^-z)`, range `(0, 1)`.
    Sigmoid,
    /// Sigmoid derivative `sigmoid(z) * (1 - sigmoid(z))`, range `(0, 0.25]`.
    SigmoidPrime,
}

impl ActivationFn {
    /// Evaluates the function at `z`.
    #[must_use]
    pub fn eval(self, z: f64) -> f64 {
        match self {
            ActivationFn::Sigmoid => sigmoid(z),
            ActivationFn::SigmoidPrime => sigmoid_prime(z),
        }
    }

    /// Default multiplier applied before quantization.
    ///
    /// The derivative never exceeds 0.25, so it is stretched by 4 to use the
    /// full value width.
    #[must_use]
    pub const fn default_scale(self) -> f64 {
        match self {
            ActivationFn::Sigmoid => 1.0,
            ActivationFn::SigmoidPrime => 4.0,
        }
    }

    /// Signal name used on the left-hand side of case-table assignments.
    #[must_use]
    pub const fn signal_name(self) -> &'static str {
        match self {
            ActivationFn::Sigmoid => "sigmoid",
            ActivationFn::SigmoidPrime => "sigmoid_prime",
        }
    }

    /// Whether the function is non-decreasing over the whole real line.
    #[must_use]
    pub const fn is_monotonic(self) -> bool {
        matches!(self, ActivationFn::Sigmoid)
    }

    /// Whether `f(z) == f(-z)`.
    #[must_use]
    pub const fn is_even(self) -> bool {
        matches!(self, ActivationFn::SigmoidPrime)
    }

    /// Kebab-case name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ActivationFn::Sigmoid => "sigmoid",
            ActivationFn::SigmoidPrime => "sigmoid-prime",
        }
    }
}

impl fmt::Display for ActivationFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivationFn {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sigmoid" => Ok(ActivationFn::Sigmoid),
            "sigmoid-prime" | "sigmoid_prime" => Ok(ActivationFn::SigmoidPrime),
            other => Err(TableError::invalid(format!("unknown function `{other}`"))),
        }
    }
}

/// Logistic sigmoid.
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Sigmoid derivative.
///
/// Evaluated as `e^-|z| / (1 + e^-|z|)^2`, which equals
/// `sigmoid(z) * (1 - sigmoid(z))` and is bit-exactly even in `z`.
#[must_use]
pub fn sigmoid_prime(z: f64) -> f64 {
    let e = (-z.abs()).exp();
    e / ((1.0 + e) * (1.0 + e))
}

// ============================================================================
// Quantization policies
// ============================================================================

/// How a scaled real value is turned into an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum RoundingMode {
    /// Round to nearest, ties to even.
    #[default]
    HalfEven,
    /// Round to nearest, ties away from zero.
    HalfAwayFromZero,
    /// Drop the fractional part (integer cast).
    Truncate,
}

impl RoundingMode {
    /// Applies the rounding rule.
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            RoundingMode::HalfEven => x.round_ties_even(),
            RoundingMode::HalfAwayFromZero => x.round(),
            RoundingMode::Truncate => x.trunc(),
        }
    }

    /// Kebab-case name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RoundingMode::HalfEven => "half-even",
            RoundingMode::HalfAwayFromZero => "half-away-from-zero",
            RoundingMode::Truncate => "truncate",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingMode {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "half-even" => Ok(RoundingMode::HalfEven),
            "half-away-from-zero" | "half-away" => Ok(RoundingMode::HalfAwayFromZero),
            "truncate" => Ok(RoundingMode::Truncate),
            other => Err(TableError::invalid(format!("unknown rounding mode `{other}`"))),
        }
    }
}

/// Order in which entries are emitted.
///
/// Both orders produce the same address bit pattern for a given signed
/// address; they differ only in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum AddressOrder {
    /// Ascending signed address: `-size/2, ..., size/2 - 1`.
    #[default]
    Signed,
    /// Ascending ROM index (address bits read unsigned):
    /// `0, ..., size/2 - 1, -size/2, ..., -1`.
    Unsigned,
}

impl AddressOrder {
    /// Kebab-case name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AddressOrder::Signed => "signed",
            AddressOrder::Unsigned => "unsigned",
        }
    }
}

impl fmt::Display for AddressOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressOrder {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "signed" => Ok(AddressOrder::Signed),
            "unsigned" | "rom" => Ok(AddressOrder::Unsigned),
            other => Err(TableError::invalid(format!("unknown address order `{other}`"))),
        }
    }
}

// ============================================================================
// Address layout
// ============================================================================

/// Fixed-point layout of a table address.
///
/// An address is a signed integer of `total_bits` digits read as a real
/// number with `fractional_bits` fractional digits, so the addresses span
/// exactly `[-domain_bound, domain_bound)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressEncoding {
    /// `log2(size)`.
    pub total_bits: u32,
    /// `1 + log2(domain_bound)`: one sign bit plus the integer bits.
    pub sign_and_integer_bits: u32,
    /// Remaining bits after the sign and integer part; always at least one.
    pub fractional_bits: u32,
}

impl AddressEncoding {
    /// Derives the layout for a table of `size` entries over
    /// `[-domain_bound, domain_bound)`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidConfiguration`] when either argument is
    /// not a positive power of two, when the address is wider than
    /// [`MAX_ADDRESS_BITS`], or when no fractional bit would remain.
    pub fn new(size: usize, domain_bound: u32) -> Result<Self> {
        if !size.is_power_of_two() {
            return Err(TableError::invalid(format!(
                "size {size} is not a positive power of two"
            )));
        }
        if !domain_bound.is_power_of_two() {
            return Err(TableError::invalid(format!(
                "domain bound {domain_bound} is not a positive power of two"
            )));
        }
        let total_bits = size.trailing_zeros();
        if total_bits > MAX_ADDRESS_BITS {
            return Err(TableError::invalid(format!(
                "size {size} needs {total_bits} address bits (max {MAX_ADDRESS_BITS})"
            )));
        }
        let sign_and_integer_bits = 1 + domain_bound.trailing_zeros();
        if sign_and_integer_bits >= total_bits {
            return Err(TableError::invalid(format!(
                "domain bound {domain_bound} needs {sign_and_integer_bits} sign and integer bits, \
                 leaving no fractional bits in a {total_bits}-bit address"
            )));
        }
        Ok(Self {
            total_bits,
            sign_and_integer_bits,
            fractional_bits: total_bits - sign_and_integer_bits,
        })
    }

    /// Number of table entries, `2^total_bits`.
    #[must_use]
    pub const fn size(&self) -> usize {
        1usize << self.total_bits
    }

    /// Most negative address, `-size/2`.
    #[must_use]
    pub const fn min_address(&self) -> i64 {
        -(1i64 << (self.total_bits - 1))
    }

    /// Most positive address, `size/2 - 1`.
    #[must_use]
    pub const fn max_address(&self) -> i64 {
        (1i64 << (self.total_bits - 1)) - 1
    }

    /// Distance between two adjacent addresses on the real line.
    #[must_use]
    pub fn step(&self) -> f64 {
        (-f64::from(self.fractional_bits)).exp2()
    }

    /// Real input value represented by address `n`.
    #[must_use]
    pub fn to_real(&self, n: i64) -> f64 {
        n as f64 / f64::from(self.fractional_bits).exp2()
    }

    /// Address whose cell contains `z`, clamped to the table's range.
    ///
    /// NaN maps to address 0.
    #[must_use]
    pub fn from_real(&self, z: f64) -> i64 {
        if z.is_nan() {
            return 0;
        }
        let n = (z * f64::from(self.fractional_bits).exp2()).floor();
        if n <= self.min_address() as f64 {
            self.min_address()
        } else if n >= self.max_address() as f64 {
            self.max_address()
        } else {
            n as i64
        }
    }

    /// The address bit pattern read as an unsigned integer.
    #[must_use]
    pub const fn rom_index(&self, n: i64) -> u64 {
        (n as u64) & ((1u64 << self.total_bits) - 1)
    }
}

// ============================================================================
// Table configuration
// ============================================================================

/// Immutable description of one lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableConfig {
    function: ActivationFn,
    size: usize,
    value_bits: u32,
    domain_bound: u32,
    scale_factor: f64,
    rounding: RoundingMode,
    order: AddressOrder,
    encoding: AddressEncoding,
}

impl TableConfig {
    /// Builds a config with the function's default scale factor,
    /// half-even rounding, and signed address order.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidConfiguration`] for any combination
    /// rejected by [`TableConfigBuilder::build`].
    pub fn new(
        function: ActivationFn,
        size: usize,
        value_bits: u32,
        domain_bound: u32,
    ) -> Result<Self> {
        Self::builder(function)
            .size(size)
            .value_bits(value_bits)
            .domain_bound(domain_bound)
            .build()
    }

    /// Starts a builder for `function`.
    #[must_use]
    pub fn builder(function: ActivationFn) -> TableConfigBuilder {
        TableConfigBuilder::new(function)
    }

    /// Function being tabulated.
    #[must_use]
    pub fn function(&self) -> ActivationFn {
        self.function
    }

    /// Number of entries.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Width of each stored value.
    #[must_use]
    pub fn value_bits(&self) -> u32 {
        self.value_bits
    }

    /// Largest absolute input value covered by the table.
    ///
    /// Always an integral power of two (1, 2, 4, ...). Fractional bounds such
    /// as 0.5 are not representable; shrink the input range by scaling the
    /// inputs before lookup instead.
    #[must_use]
    pub fn domain_bound(&self) -> u32 {
        self.domain_bound
    }

    /// Multiplier applied to the function output before quantization.
    #[must_use]
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Rounding policy.
    #[must_use]
    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// Emission order.
    #[must_use]
    pub fn order(&self) -> AddressOrder {
        self.order
    }

    /// Derived address layout.
    #[must_use]
    pub fn encoding(&self) -> AddressEncoding {
        self.encoding
    }

    /// Largest storable value code, `2^value_bits - 1`.
    #[must_use]
    pub fn max_value(&self) -> u64 {
        (1u64 << self.value_bits) - 1
    }
}

/// Step-by-step construction of a [`TableConfig`].
///
/// Unset fields default to `size = 1024`, `value_bits = 8`,
/// `domain_bound = 8`, the function's default scale, half-even rounding,
/// and signed order.
#[derive(Debug, Clone)]
pub struct TableConfigBuilder {
    function: ActivationFn,
    size: usize,
    value_bits: u32,
    domain_bound: u32,
    scale_factor: Option<f64>,
    rounding: RoundingMode,
    order: AddressOrder,
}

impl TableConfigBuilder {
    fn new(function: ActivationFn) -> Self {
        Self {
            function,
            size: 1024,
            value_bits: 8,
            domain_bound: 8,
            scale_factor: None,
            rounding: RoundingMode::default(),
            order: AddressOrder::default(),
        }
    }

    /// Sets the number of entries.
    #[must_use]
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Sets the value width.
    #[must_use]
    pub fn value_bits(mut self, value_bits: u32) -> Self {
        self.value_bits = value_bits;
        self
    }

    /// Sets the domain bound, an integral power of two (at least 1).
    #[must_use]
    pub fn domain_bound(mut self, domain_bound: u32) -> Self {
        self.domain_bound = domain_bound;
        self
    }

    /// Overrides the function's default scale factor.
    #[must_use]
    pub fn scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = Some(scale_factor);
        self
    }

    /// Sets the rounding policy.
    #[must_use]
    pub fn rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    /// Sets the emission order.
    #[must_use]
    pub fn order(mut self, order: AddressOrder) -> Self {
        self.order = order;
        self
    }

    /// Validates and freezes the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidConfiguration`] when the size or domain
    /// bound is not a positive power of two, when no fractional address bit
    /// remains, when `value_bits` is outside `1..=63`, or when the scale
    /// factor is not finite and positive.
    pub fn build(self) -> Result<TableConfig> {
        let encoding = AddressEncoding::new(self.size, self.domain_bound)?;
        if self.value_bits == 0 || self.value_bits > MAX_VALUE_BITS {
            return Err(TableError::invalid(format!(
                "value width {} is outside 1..={MAX_VALUE_BITS}",
                self.value_bits
            )));
        }
        let scale_factor = self
            .scale_factor
            .unwrap_or_else(|| self.function.default_scale());
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return Err(TableError::invalid(format!(
                "scale factor {scale_factor} must be finite and positive"
            )));
        }
        Ok(TableConfig {
            function: self.function,
            size: self.size,
            value_bits: self.value_bits,
            domain_bound: self.domain_bound,
            scale_factor,
            rounding: self.rounding,
            order: self.order,
            encoding,
        })
    }
}
