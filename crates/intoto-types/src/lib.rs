//! Core types for in-toto key management
//!
//! This crate provides the key and signature data model shared by in-toto
//! implementations: key families and schemes, the serialized key shape, and
//! the canonical encoding that key ids are derived from.

pub mod canonical;
pub mod encoding;
pub mod error;
pub mod key;
pub mod scheme;
pub mod signature;

pub use canonical::encode_canonical;
pub use encoding::Hex;
pub use error::{Error, Result};
pub use key::{derive_key_id, Key, KeyVal};
pub use scheme::{
    validate_key, KeyIdHashAlgorithm, KeyType, Scheme, ECDSA_SCHEMES, ED25519_SCHEMES,
    KEY_ID_HASH_ALGORITHMS, RSA_SCHEMES,
};
pub use signature::Signature;
