//! Error types for intoto-crypto

use intoto_types::KeyType;
use thiserror::Error;

/// Errors that can occur in key decoding, signing and verification
#[derive(Error, Debug)]
pub enum Error {
    /// Input holds no PEM block
    #[error("failed to decode the data as PEM block (are you sure this is a pem file?)")]
    NoPemBlock,

    /// PEM body is not a PKCS8 or PKCS1 private key, nor a PKIX public key
    #[error("failed parsing the PEM block: unsupported PEM type")]
    FailedPemParsing,

    /// Decoded key material does not fit the key's declared type or use
    #[error("key type mismatch: {0}")]
    KeyTypeMismatch(String),

    /// ECDSA curve embedded in the key disagrees with the scheme
    #[error("curve size {curve_bits} does not match scheme {scheme}")]
    CurveSizeSchemeMismatch {
        /// Bit size of the key's curve
        curve_bits: usize,
        /// Scheme asserted by the key
        scheme: String,
    },

    /// Hex key material could not be decoded
    #[error("invalid hex string: {0}")]
    InvalidHexString(String),

    /// Key material decoded but has the wrong shape
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Signature text or its ASN.1 payload is malformed
    #[error("malformed signature: {0}")]
    SignatureEncoding(String),

    /// Signature is well-formed but does not verify
    #[error("invalid signature: {0}")]
    InvalidSignature(KeyType),

    /// Primitive failed while producing a signature
    #[error("signing error: {0}")]
    Signing(String),

    /// DER encoding/decoding error
    #[error("DER error: {0}")]
    Der(String),

    /// Scheme, key type or hash algorithm policy error
    #[error(transparent)]
    Types(#[from] intoto_types::Error),
}

impl From<der::Error> for Error {
    fn from(e: der::Error) -> Self {
        Error::Der(e.to_string())
    }
}

impl From<aws_lc_rs::error::KeyRejected> for Error {
    fn from(e: aws_lc_rs::error::KeyRejected) -> Self {
        Error::InvalidKeyMaterial(e.to_string())
    }
}

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, Error>;
