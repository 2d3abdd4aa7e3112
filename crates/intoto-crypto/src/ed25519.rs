//! Ed25519 keys using aws-lc-rs
//!
//! Ed25519 material is never wrapped in PEM once loaded: public keys are the
//! 32 raw bytes and private keys the 64-byte `seed || public` form, both as
//! lowercase hex.

use crate::error::{Error, Result};
use aws_lc_rs::signature::{Ed25519KeyPair, KeyPair as AwsKeyPair, UnparsedPublicKey, ED25519};
use der::{asn1::OctetStringRef, Decode};
use intoto_types::KeyType;

const SEED_LEN: usize = 32;
const PUBLIC_KEY_LEN: usize = 32;

/// An Ed25519 private key
pub struct Ed25519PrivateKey {
    key_pair: Ed25519KeyPair,
    seed: [u8; SEED_LEN],
}

impl Ed25519PrivateKey {
    /// Build from a 32-byte seed or the 64-byte `seed || public` form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let key_pair = match bytes.len() {
            SEED_LEN => Ed25519KeyPair::from_seed_unchecked(bytes)?,
            64 => Ed25519KeyPair::from_seed_and_public_key(&bytes[..SEED_LEN], &bytes[SEED_LEN..])?,
            n => {
                return Err(Error::InvalidKeyMaterial(format!(
                    "ed25519 private key must be 32 or 64 bytes, got {}",
                    n
                )))
            }
        };
        let mut seed = [0u8; SEED_LEN];
        seed.copy_from_slice(&bytes[..SEED_LEN]);
        Ok(Self { key_pair, seed })
    }

    /// Decode hex text holding either accepted private key form
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = hex::decode(text).map_err(|e| Error::InvalidHexString(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Parse the `privateKey` field of a PKCS#8 Ed25519 key (RFC 8410)
    ///
    /// The field holds a DER OCTET STRING wrapping the 32-byte seed.
    pub fn from_pkcs8_private_key(private_key: &[u8]) -> Result<Self> {
        let seed = OctetStringRef::from_der(private_key)?;
        if seed.as_bytes().len() != SEED_LEN {
            return Err(Error::InvalidKeyMaterial(
                "ed25519 PKCS#8 seed must be 32 bytes".to_string(),
            ));
        }
        Self::from_bytes(seed.as_bytes())
    }

    /// The public half of this key
    pub fn public_key(&self) -> Ed25519PublicKey {
        let mut bytes = [0u8; PUBLIC_KEY_LEN];
        bytes.copy_from_slice(self.key_pair.public_key().as_ref());
        Ed25519PublicKey(bytes)
    }

    /// The 64-byte `seed || public` form
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SEED_LEN + PUBLIC_KEY_LEN);
        bytes.extend_from_slice(&self.seed);
        bytes.extend_from_slice(self.key_pair.public_key().as_ref());
        bytes
    }

    /// Sign the payload directly; Ed25519 hashes internally
    pub fn sign(&self, payload: &[u8]) -> Vec<u8> {
        self.key_pair.sign(payload).as_ref().to_vec()
    }
}

/// An Ed25519 public key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ed25519PublicKey([u8; PUBLIC_KEY_LEN]);

impl Ed25519PublicKey {
    /// Build from the 32 raw public key bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; PUBLIC_KEY_LEN] = bytes.try_into().map_err(|_| {
            Error::InvalidKeyMaterial(format!(
                "ed25519 public key must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Decode hex text of the 32 raw bytes
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = hex::decode(text).map_err(|e| Error::InvalidHexString(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// The raw public key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Verify a raw 64-byte signature over the payload
    pub fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<()> {
        UnparsedPublicKey::new(&ED25519, &self.0)
            .verify(payload, signature)
            .map_err(|_| Error::InvalidSignature(KeyType::Ed25519))
    }
}
