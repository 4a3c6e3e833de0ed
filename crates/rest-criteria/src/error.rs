//! Error types for criteria parsing.

use thiserror::Error;

/// Errors that can occur while parsing or constructing criteria.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriteriaError {
    /// Malformed input at a specific position in the (trimmed) criteria string.
    #[error("syntax error at position {position}: {message}")]
    Syntax {
        /// Byte offset into the trimmed input where parsing stopped.
        position: usize,
        /// Description of the error, including an excerpt of the unparsed input.
        message: String,
    },

    /// Empty or whitespace-only criteria string.
    #[error("empty criteria expression")]
    EmptyCriteria,

    /// Criteria string ended before a full condition could be read.
    #[error("criteria is incomplete: {0}")]
    Incomplete(String),

    /// Parenthesis nesting exceeds the supported depth.
    #[error("criteria nesting exceeds the maximum depth of {limit}")]
    NestingTooDeep {
        /// The maximum supported nesting depth.
        limit: usize,
    },

    /// A run of `NOT`s or a chain of `AND`/`OR` operators exceeds the
    /// supported length.
    #[error("operator chain exceeds the maximum length of {limit}")]
    ChainTooLong {
        /// The maximum supported chain length.
        limit: usize,
    },

    /// A variable path was constructed with no segments. The grammar cannot
    /// produce this; seeing it means a caller violated a construction contract.
    #[error("variable path requires at least one segment")]
    EmptyVariablePath,
}

/// Result type for criteria operations.
pub type CriteriaResult<T> = std::result::Result<T, CriteriaError>;
