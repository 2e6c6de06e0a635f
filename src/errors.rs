//! Error types for grammar construction.
//!
//! The attachment engine itself never fails: an attachment site that does not
//! resolve simply yields no result. Errors only arise at the data boundary,
//! where interchange records and configuration are read.

use thiserror::Error;

/// Errors that can occur while loading or building a grammar.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// Error reading a grammar or config file.
    #[error("failed to load {path}: {message}")]
    Load { path: String, message: String },

    /// Error decoding interchange records.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A record that decoded but cannot be turned into a tree.
    #[error("malformed record {index}: {message}")]
    Record { index: usize, message: String },

    /// Rule slot other than left (0) or right (1).
    #[error("invalid slot {0}: expected 0 (left) or 1 (right)")]
    InvalidSlot(i64),

    /// Tree filter pattern that is not a valid regex.
    #[error("invalid tree pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },

    /// Dotted address that is not of the form `0(.n)*`.
    #[error("invalid tree address `{0}`")]
    InvalidAddress(String),
}

/// Result type for grammar operations.
pub type GrammarResult<T> = Result<T, GrammarError>;
