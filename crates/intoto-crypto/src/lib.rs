//! Signing and verification for in-toto keys
//!
//! This crate decodes PEM key material (PKCS#8, PKCS#1 and PKIX), turns it
//! into [`intoto_types::Key`] values, and signs and verifies payloads with
//! RSASSA-PSS, ECDSA over the NIST curves, or Ed25519.
//!
//! aws-lc-rs backs digests, RSA and Ed25519. ECDSA uses the RustCrypto curve
//! crates, which can sign an explicit digest and cover P-224.
//!
//! # Example
//!
//! ```no_run
//! use intoto_crypto::{load_key_with_config, sign, verify, LoadConfig};
//!
//! # fn main() -> intoto_crypto::Result<()> {
//! let pem = std::fs::read("functionary.pem").expect("key file");
//! let key = load_key_with_config(&pem, &LoadConfig::default())?;
//! let signature = sign(&key, b"metadata")?;
//! verify(&key.public_only(), &signature, b"metadata")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod ecdsa;
pub mod ed25519;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod key;
pub mod rsa;
pub mod signing;
pub mod verification;

pub use config::LoadConfig;
pub use crate::ecdsa::{match_ecdsa_scheme, EcdsaCurve, EcdsaSignatureValue};
pub use encoding::{decode, encode_pem, DecodedKey};
pub use error::{Error, Result};
pub use hash::HashAlgorithm;
pub use key::{load_key, load_key_with_config, normalize, parse_ed25519_from_private_json};
pub use signing::sign;
pub use verification::verify;
