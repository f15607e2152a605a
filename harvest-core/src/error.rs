//! Error types for the harvest core library.

use thiserror::Error;

/// Top-level error type for all harvest core operations.
///
/// A pattern that matches nothing is never an error; only patterns that
/// cannot be compiled are.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// A regular expression failed to compile.
    #[error("Invalid pattern `{expression}`: {reason}")]
    InvalidPattern {
        /// The expression as supplied by the caller.
        expression: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// `take` was called on a list with no unconsumed items.
    #[error("Retrieval list '{list}' is empty or exhausted")]
    EmptyOrExhausted {
        /// Name of the list (may be empty).
        list: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, HarvestError>;
