//! Hashing utilities using aws-lc-rs

use aws_lc_rs::digest::{self, SHA256, SHA384, SHA512};

/// Digests used by the signature schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashAlgorithm {
    /// Pick the digest for an ECDSA curve of `curve_bits` size
    ///
    /// RFC 5656 section 6.2.1: up to 256 bits uses SHA-256, up to 384 bits
    /// SHA-384, anything larger SHA-512.
    pub fn for_curve_bits(curve_bits: usize) -> Self {
        match curve_bits {
            0..=256 => HashAlgorithm::Sha256,
            257..=384 => HashAlgorithm::Sha384,
            _ => HashAlgorithm::Sha512,
        }
    }

    /// Get the digest size in bytes for this algorithm
    pub fn digest_size(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Hash `data` with this algorithm
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        let alg = match self {
            HashAlgorithm::Sha256 => &SHA256,
            HashAlgorithm::Sha384 => &SHA384,
            HashAlgorithm::Sha512 => &SHA512,
        };
        digest::digest(alg, data).as_ref().to_vec()
    }
}
