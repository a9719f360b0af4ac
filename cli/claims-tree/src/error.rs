use thiserror::Error;

/// Errors produced while encoding records, building trees and exporting claims.
///
/// All variants are deterministic functions of the input; none are retryable.
#[derive(Debug, Error)]
pub enum Error {
    /// A field value does not fit its declared ABI type.
    #[error("encoding error: {0}")]
    Encoding(String),
    /// A tree needs at least one leaf.
    #[error("cannot build a Merkle tree from zero records")]
    EmptyTree,
    #[error("leaf index {index} is out of bounds for tree with {leaves} leaves")]
    IndexOutOfRange { index: usize, leaves: usize },
    #[error("no claim found for address {0}")]
    NotFound(String),
    #[error("duplicate address {0} in record set")]
    DuplicateAddress(String),
    #[error("duplicate index {0} in record set")]
    DuplicateIndex(u64),
    #[error("root mismatch: expected {expected}, computed {computed}")]
    RootMismatch { expected: String, computed: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
