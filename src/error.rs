//! Error types for suffixdb.

use thiserror::Error;

/// Error type for suffixdb operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database built without a hasher
    #[error("no hasher provided")]
    NoHasher,

    /// Database was invalidated and can no longer be used
    #[error("database uninitialized")]
    Uninitialized,

    /// Rule buffer would grow past the 28-bit offset ceiling
    #[error("rule buffer capacity exceeded: offset {offset} is above {max}")]
    CapacityExceeded { offset: usize, max: u32 },

    /// Entry range with `lo > hi`
    #[error("invalid entry range: {lo}..{hi}")]
    InvalidRange { lo: u32, hi: u32 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Download error
    #[error("download error: {0}")]
    Download(String),

    /// A rule source produced no data
    #[error("empty rule source: {0}")]
    EmptySource(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for suffixdb operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the ASCII normalization seam.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Rule bytes are not valid UTF-8
    #[error("rule is not valid UTF-8")]
    InvalidUtf8,

    /// IDNA conversion rejected the input
    #[error("IDNA conversion failed: {0}")]
    Idna(String),
}
