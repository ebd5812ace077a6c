//! Error types for the book-exchange crate.
//!
//! The core data structures never fail on ordinary misses or duplicates;
//! those are reported through `bool` and `Option` returns. The variants
//! here cover input validation at the [`Exchange`](crate::Exchange)
//! boundary, snapshot encoding/decoding, and configuration.

use thiserror::Error;

/// The main error type for this crate
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem or stream error while reading or writing a snapshot
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// User-supplied field failed validation
    #[error("Invalid {field}: {reason}")]
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Snapshot line could not be decoded into an item
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number (0 when decoding a standalone line)
        line: usize,
        /// Why the line was rejected
        reason: String,
    },

    /// Item field cannot be represented in the line format
    #[error("Cannot encode {field}: contains a comma or line break")]
    Unencodable {
        /// Name of the offending field
        field: &'static str,
    },

    /// Invalid configuration (bad environment value, inverted range)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Check if this error was caused by user input rather than I/O
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::InvalidInput { .. } | Error::Unencodable { .. })
    }
}
