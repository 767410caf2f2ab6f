//! Error types for the scratch card core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum ScratchError {
    #[error("Invalid weight table: {0}")]
    InvalidWeights(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Unknown bet mode: {0}")]
    UnknownBetMode(String),

    #[error("Unknown distribution '{criteria}' in bet mode '{mode}'")]
    UnknownDistribution { mode: String, criteria: String },

    #[error("Grid shape mismatch: expected {expected_rows}x{expected_columns}, got {rows}x{columns}")]
    GridShape {
        expected_rows: usize,
        expected_columns: usize,
        rows: usize,
        columns: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias
pub type ScratchResult<T> = Result<T, ScratchError>;
