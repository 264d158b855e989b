//! Error type shared by the tabulator, the bit encoders, and the serializers.

use thiserror::Error;

/// Errors produced while configuring, encoding, or writing a table.
///
/// Value overflow is never reported here: out-of-range quantized values are
/// saturated to the largest representable code.
#[derive(Debug, Error)]
pub enum TableError {
    /// The size, domain bound, or width combination cannot describe a table.
    #[error("invalid table configuration: {reason}")]
    InvalidConfiguration {
        /// What was wrong with the configuration.
        reason: String,
    },

    /// A bit string contained something other than `0` and `1`.
    #[error("invalid bit string {0:?}: expected only '0' and '1'")]
    InvalidBitString(String),

    /// Writing to an output sink failed.
    #[error("failed to write table output")]
    Io(#[from] std::io::Error),

    /// A table description file could not be parsed.
    #[cfg(feature = "config")]
    #[error("failed to parse table description")]
    Config(#[source] toml::de::Error),
}

#[cfg(feature = "config")]
impl From<toml::de::Error> for TableError {
    fn from(err: toml::de::Error) -> Self {
        TableError::Config(err)
    }
}

impl TableError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        TableError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableError>;
