//! Key families, signature schemes and the tables binding them
//!
//! The registry is a set of constant tables: which schemes a key family may
//! use and which digest names may appear in `keyid_hash_algorithms`.
//! [`validate_key`] is the gate every sign and verify call passes through.

use crate::error::{Error, Result};
use crate::key::Key;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// RSA
    Rsa,
    /// ECDSA over a NIST prime curve
    Ecdsa,
    /// Ed25519
    Ed25519,
}

impl KeyType {
    /// Get the key type string
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Rsa => "rsa",
            KeyType::Ecdsa => "ecdsa",
            KeyType::Ed25519 => "ed25519",
        }
    }

    /// Schemes this key family may be used with
    pub fn schemes(&self) -> &'static [Scheme] {
        match self {
            KeyType::Rsa => RSA_SCHEMES,
            KeyType::Ecdsa => ECDSA_SCHEMES,
            KeyType::Ed25519 => ED25519_SCHEMES,
        }
    }

    /// Whether `scheme` belongs to this family's scheme set
    pub fn supports(&self, scheme: Scheme) -> bool {
        self.schemes().contains(&scheme)
    }
}

impl FromStr for KeyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rsa" => Ok(KeyType::Rsa),
            "ecdsa" => Ok(KeyType::Ecdsa),
            "ed25519" => Ok(KeyType::Ed25519),
            _ => Err(Error::UnsupportedKeyType(s.to_string())),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signature scheme names
///
/// `ecdsa-sha2-nistp256` is recognised so that a P-256 key can be matched
/// against its curve, but it is not in the ecdsa scheme set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    /// RSASSA-PSS with SHA-256
    #[serde(rename = "rsassa-pss-sha256")]
    RsassaPssSha256,
    /// ECDSA on P-224
    #[serde(rename = "ecdsa-sha2-nistp224")]
    EcdsaSha2Nistp224,
    /// ECDSA on P-256
    #[serde(rename = "ecdsa-sha2-nistp256")]
    EcdsaSha2Nistp256,
    /// ECDSA on P-384
    #[serde(rename = "ecdsa-sha2-nistp384")]
    EcdsaSha2Nistp384,
    /// ECDSA on P-521
    #[serde(rename = "ecdsa-sha2-nistp521")]
    EcdsaSha2Nistp521,
    /// Ed25519
    #[serde(rename = "ed25519")]
    Ed25519,
}

impl Scheme {
    /// Get the scheme string
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::RsassaPssSha256 => "rsassa-pss-sha256",
            Scheme::EcdsaSha2Nistp224 => "ecdsa-sha2-nistp224",
            Scheme::EcdsaSha2Nistp256 => "ecdsa-sha2-nistp256",
            Scheme::EcdsaSha2Nistp384 => "ecdsa-sha2-nistp384",
            Scheme::EcdsaSha2Nistp521 => "ecdsa-sha2-nistp521",
            Scheme::Ed25519 => "ed25519",
        }
    }

    /// Curve size in bits named by an ECDSA scheme, `None` for other schemes
    pub fn ecdsa_curve_bits(&self) -> Option<usize> {
        match self {
            Scheme::EcdsaSha2Nistp224 => Some(224),
            Scheme::EcdsaSha2Nistp256 => Some(256),
            Scheme::EcdsaSha2Nistp384 => Some(384),
            Scheme::EcdsaSha2Nistp521 => Some(521),
            Scheme::RsassaPssSha256 | Scheme::Ed25519 => None,
        }
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rsassa-pss-sha256" => Ok(Scheme::RsassaPssSha256),
            "ecdsa-sha2-nistp224" => Ok(Scheme::EcdsaSha2Nistp224),
            "ecdsa-sha2-nistp256" => Ok(Scheme::EcdsaSha2Nistp256),
            "ecdsa-sha2-nistp384" => Ok(Scheme::EcdsaSha2Nistp384),
            "ecdsa-sha2-nistp521" => Ok(Scheme::EcdsaSha2Nistp521),
            "ed25519" => Ok(Scheme::Ed25519),
            _ => Err(Error::InvalidKey(format!("unknown scheme {}", s))),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Digest names a key may be referenced by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyIdHashAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-512
    Sha512,
}

impl KeyIdHashAlgorithm {
    /// Get the algorithm name
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyIdHashAlgorithm::Sha256 => "sha256",
            KeyIdHashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl FromStr for KeyIdHashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sha256" => Ok(KeyIdHashAlgorithm::Sha256),
            "sha512" => Ok(KeyIdHashAlgorithm::Sha512),
            _ => Err(Error::InvalidKey(format!(
                "unsupported keyid hash algorithm {}",
                s
            ))),
        }
    }
}

impl fmt::Display for KeyIdHashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schemes valid for rsa keys
pub const RSA_SCHEMES: &[Scheme] = &[Scheme::RsassaPssSha256];

/// Schemes valid for ecdsa keys
pub const ECDSA_SCHEMES: &[Scheme] = &[
    Scheme::EcdsaSha2Nistp224,
    Scheme::EcdsaSha2Nistp384,
    Scheme::EcdsaSha2Nistp521,
];

/// Schemes valid for ed25519 keys
pub const ED25519_SCHEMES: &[Scheme] = &[Scheme::Ed25519];

/// Legal values of `keyid_hash_algorithms`
pub const KEY_ID_HASH_ALGORITHMS: &[KeyIdHashAlgorithm] =
    &[KeyIdHashAlgorithm::Sha256, KeyIdHashAlgorithm::Sha512];

/// Check a key against the scheme and hash algorithm tables
pub fn validate_key(key: &Key) -> Result<()> {
    validate_parts(key.key_type(), key.scheme(), key.key_id_hash_algorithms())
}

pub(crate) fn validate_parts(
    key_type: KeyType,
    scheme: Scheme,
    key_id_hash_algorithms: &[KeyIdHashAlgorithm],
) -> Result<()> {
    if !key_type.supports(scheme) {
        return Err(Error::InvalidKey(format!(
            "scheme {} is not valid for {} keys",
            scheme, key_type
        )));
    }
    if key_id_hash_algorithms.is_empty() {
        return Err(Error::InvalidKey(
            "keyid_hash_algorithms must not be empty".to_string(),
        ));
    }
    if let Some(alg) = key_id_hash_algorithms
        .iter()
        .find(|alg| !KEY_ID_HASH_ALGORITHMS.contains(alg))
    {
        return Err(Error::InvalidKey(format!(
            "unsupported keyid hash algorithm {}",
            alg
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(KeyType::Rsa, Scheme::RsassaPssSha256, true)]
    #[case(KeyType::Rsa, Scheme::Ed25519, false)]
    #[case(KeyType::Ecdsa, Scheme::EcdsaSha2Nistp224, true)]
    #[case(KeyType::Ecdsa, Scheme::EcdsaSha2Nistp256, false)]
    #[case(KeyType::Ecdsa, Scheme::EcdsaSha2Nistp384, true)]
    #[case(KeyType::Ecdsa, Scheme::EcdsaSha2Nistp521, true)]
    #[case(KeyType::Ecdsa, Scheme::RsassaPssSha256, false)]
    #[case(KeyType::Ed25519, Scheme::Ed25519, true)]
    #[case(KeyType::Ed25519, Scheme::EcdsaSha2Nistp384, false)]
    fn test_scheme_table(#[case] key_type: KeyType, #[case] scheme: Scheme, #[case] ok: bool) {
        assert_eq!(key_type.supports(scheme), ok);
        let result = validate_parts(key_type, scheme, &[KeyIdHashAlgorithm::Sha256]);
        assert_eq!(result.is_ok(), ok);
    }

    #[test]
    fn test_empty_hash_algorithms_rejected() {
        let err = validate_parts(KeyType::Ed25519, Scheme::Ed25519, &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[test]
    fn test_key_type_from_str() {
        assert_eq!("ecdsa".parse::<KeyType>().unwrap(), KeyType::Ecdsa);
        let err = "dsa".parse::<KeyType>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedKeyType(ref t) if t == "dsa"));
    }

    #[test]
    fn test_scheme_round_trips_through_str() {
        for scheme in [
            Scheme::RsassaPssSha256,
            Scheme::EcdsaSha2Nistp224,
            Scheme::EcdsaSha2Nistp256,
            Scheme::EcdsaSha2Nistp384,
            Scheme::EcdsaSha2Nistp521,
            Scheme::Ed25519,
        ] {
            assert_eq!(scheme.as_str().parse::<Scheme>().unwrap(), scheme);
            let json = serde_json::to_string(&scheme).unwrap();
            assert_eq!(json, format!("\"{}\"", scheme.as_str()));
        }
        assert!("ecdsa-sha2-nistp192".parse::<Scheme>().is_err());
    }

    #[test]
    fn test_hash_algorithm_from_str() {
        assert_eq!(
            "sha512".parse::<KeyIdHashAlgorithm>().unwrap(),
            KeyIdHashAlgorithm::Sha512
        );
        assert!(matches!(
            "md5".parse::<KeyIdHashAlgorithm>(),
            Err(Error::InvalidKey(_))
        ));
    }
}
