//! Error types for revertex

use thiserror::Error;

/// revertex error type
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or inconsistent caller input
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Histogram dimensionality outside 1..=2
    #[error("it is only supported to sample from 1D or 2D histograms, not {0}D")]
    UnsupportedDimension(usize),

    /// Unit string missing from the conversion table
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    /// Output mode other than `pos` or `kin`
    #[error("unknown output mode '{0}', expected 'pos' or 'kin'")]
    UnknownOutputMode(String),

    /// Parallel inputs of different lengths
    #[error("length mismatch for {what}: expected {expected}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Weights that cannot be normalized (all zero, negative or not finite)
    #[error("degenerate weights: {0}")]
    DegenerateWeights(String),

    /// Object collection whose names and offsets disagree
    #[error("object collection key mismatch: {0}")]
    KeyMismatch(String),

    /// Column required by an output schema is absent
    #[error("missing field '{0}'")]
    MissingField(String),

    /// Name pattern that resolved to no object
    #[error("pattern '{0}' matched no detector")]
    NoMatch(String),

    /// Feature that is deliberately not provided
    #[error("not implemented: {0}")]
    Unsupported(String),

    /// Rejection loop ran out of attempts before reaching the requested count
    #[error(
        "sampling did not converge: accepted {accepted} of {requested} points after {attempts} attempts"
    )]
    SamplingExhausted {
        requested: usize,
        accepted: usize,
        attempts: usize,
    },

    /// Text input that could not be parsed
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid wildcard pattern
    #[error("pattern error: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
