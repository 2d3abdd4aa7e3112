//! Error types for intoto-types

use thiserror::Error;

/// Errors that can occur while building or validating keys
#[derive(Error, Debug)]
pub enum Error {
    /// Key type is not one of rsa, ecdsa or ed25519
    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// Key fails scheme / hash algorithm policy
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Hex text could not be decoded
    #[error("invalid hex string: {0}")]
    InvalidHexString(String),

    /// Value cannot be expressed in canonical JSON
    #[error("canonicalization failed: {0}")]
    Canonicalization(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for intoto-types operations
pub type Result<T> = std::result::Result<T, Error>;
