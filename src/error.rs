//! Error types for the fallible edges of the crate
//!
//! The simulation itself never returns errors: malformed entities panic and
//! degenerate geometry simply doesn't overlap. Only loading data can fail.

/// Errors from loading or validating a [`crate::Tuning`]
#[derive(thiserror::Error, Debug)]
pub enum TuningError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values parsed but are inconsistent
    #[error("Invalid tuning: {0}")]
    Invalid(String),
}

/// Errors from building a [`crate::sim::Mesh`]
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MeshError {
    /// Index list length isn't a multiple of three
    #[error("index count {0} is not a multiple of 3")]
    NotTriangulated(usize),

    /// An index points past the vertex list
    #[error("index {index} out of range for {len} vertices")]
    IndexOutOfRange { index: u32, len: usize },
}
