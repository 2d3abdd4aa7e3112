//! The key model
//!
//! A [`Key`] couples a key family and signature scheme with textual key
//! material (PEM for rsa/ecdsa, hex for ed25519) and an identifier derived
//! from the public fields. Keys are only built through [`Key::new`], which
//! derives the id and validates the result, so every `Key` value in memory is
//! internally consistent.

use crate::canonical::encode_canonical;
use crate::error::{Error, Result};
use crate::scheme::{validate_parts, KeyIdHashAlgorithm, KeyType, Scheme};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Public and private key material in text form
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyVal {
    /// Public key text
    pub public: String,
    /// Private key text, empty for a public-only key
    #[serde(default)]
    pub private: String,
}

impl KeyVal {
    /// Key material without a private half
    pub fn public_only(public: impl Into<String>) -> Self {
        Self {
            public: public.into(),
            private: String::new(),
        }
    }

    /// Whether private material is present
    pub fn has_private(&self) -> bool {
        !self.private.is_empty()
    }
}

/// A public key or key pair with its derived identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "KeyRecord")]
pub struct Key {
    #[serde(rename = "keytype")]
    key_type: KeyType,
    scheme: Scheme,
    #[serde(rename = "keyid")]
    key_id: String,
    #[serde(rename = "keyid_hash_algorithms")]
    key_id_hash_algorithms: Vec<KeyIdHashAlgorithm>,
    #[serde(rename = "keyval")]
    key_val: KeyVal,
}

impl Key {
    /// Build a key, deriving its id and checking it against the scheme tables
    pub fn new(
        key_type: KeyType,
        scheme: Scheme,
        key_id_hash_algorithms: Vec<KeyIdHashAlgorithm>,
        key_val: KeyVal,
    ) -> Result<Self> {
        validate_parts(key_type, scheme, &key_id_hash_algorithms)?;
        let key_id = derive_key_id(key_type, scheme, &key_id_hash_algorithms, &key_val.public)?;
        Ok(Self {
            key_type,
            scheme,
            key_id,
            key_id_hash_algorithms,
            key_val,
        })
    }

    /// Parse a key from its JSON form
    ///
    /// The stored `keyid` is not trusted; it is derived again from the public
    /// fields.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Json)
    }

    /// Serialize the key to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::Json)
    }

    /// The same key with the private half removed
    ///
    /// The id is unaffected since it never covers private material.
    pub fn public_only(&self) -> Self {
        Self {
            key_val: KeyVal::public_only(self.key_val.public.clone()),
            ..self.clone()
        }
    }

    /// Key family
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Signature scheme the key is used with
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Lowercase hex SHA-256 of the canonical public fields
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Hash algorithms recorded for key id derivation
    pub fn key_id_hash_algorithms(&self) -> &[KeyIdHashAlgorithm] {
        &self.key_id_hash_algorithms
    }

    /// Public and private material
    pub fn key_val(&self) -> &KeyVal {
        &self.key_val
    }

    /// Public material: PEM for rsa and ecdsa, hex for ed25519
    pub fn public(&self) -> &str {
        &self.key_val.public
    }

    /// Private material, empty for a public-only key
    pub fn private(&self) -> &str {
        &self.key_val.private
    }

    /// Whether the key can be used for signing
    pub fn has_private(&self) -> bool {
        self.key_val.has_private()
    }
}

#[derive(Serialize)]
struct PublicKeyVal<'a> {
    public: &'a str,
}

/// The subset of key fields covered by the identifier
#[derive(Serialize)]
struct KeyIdFields<'a> {
    keytype: KeyType,
    scheme: Scheme,
    keyid_hash_algorithms: &'a [KeyIdHashAlgorithm],
    keyval: PublicKeyVal<'a>,
}

/// Derive the key id from the public fields of a key
///
/// The id is the lowercase hex SHA-256 of the canonical JSON of
/// `{keytype, scheme, keyid_hash_algorithms, keyval: {public}}`. Private
/// material never contributes.
pub fn derive_key_id(
    key_type: KeyType,
    scheme: Scheme,
    key_id_hash_algorithms: &[KeyIdHashAlgorithm],
    public: &str,
) -> Result<String> {
    let fields = KeyIdFields {
        keytype: key_type,
        scheme,
        keyid_hash_algorithms: key_id_hash_algorithms,
        keyval: PublicKeyVal { public },
    };
    let canonical = encode_canonical(&fields)?;
    Ok(hex::encode(Sha256::digest(&canonical)))
}

/// Wire form of a key as it appears in JSON
#[derive(Deserialize)]
struct KeyRecord {
    keytype: String,
    scheme: String,
    #[serde(default)]
    keyid: Option<String>,
    #[serde(default)]
    keyid_hash_algorithms: Vec<String>,
    keyval: KeyVal,
}

impl TryFrom<KeyRecord> for Key {
    type Error = Error;

    fn try_from(record: KeyRecord) -> Result<Self> {
        let key_type: KeyType = record.keytype.parse()?;
        let scheme: Scheme = record.scheme.parse()?;
        let key_id_hash_algorithms = record
            .keyid_hash_algorithms
            .iter()
            .map(|alg| alg.parse())
            .collect::<Result<Vec<KeyIdHashAlgorithm>>>()?;

        let key = Key::new(key_type, scheme, key_id_hash_algorithms, record.keyval)?;
        if let Some(stored) = record.keyid.as_deref() {
            if stored != key.key_id() {
                tracing::warn!(
                    stored,
                    derived = key.key_id(),
                    "stored keyid does not match the derived keyid, using derived"
                );
            }
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ED25519_PUBLIC: &str =
        "8f93f549eb4cca8dc2142fb655ba2d0955d1824f79474f354e38d6a359e9d440";
    const ED25519_PRIVATE: &str =
        "861fd1b466cfc6f73f8ed630f99d8eda250421f0e3a6123fd5c311cc001bda49";
    const ED25519_KEY_ID: &str =
        "308e3f53523b632983a988b72a2e39c85fe8fc967116043ce51fa8d92a6aef64";

    fn default_algs() -> Vec<KeyIdHashAlgorithm> {
        vec![KeyIdHashAlgorithm::Sha256, KeyIdHashAlgorithm::Sha512]
    }

    #[test]
    fn test_key_id_golden_value() {
        let key = Key::new(
            KeyType::Ed25519,
            Scheme::Ed25519,
            default_algs(),
            KeyVal {
                public: ED25519_PUBLIC.to_string(),
                private: ED25519_PRIVATE.to_string(),
            },
        )
        .unwrap();
        assert_eq!(key.key_id(), ED25519_KEY_ID);
    }

    #[test]
    fn test_key_id_ignores_private_material() {
        let public_only = Key::new(
            KeyType::Ed25519,
            Scheme::Ed25519,
            default_algs(),
            KeyVal::public_only(ED25519_PUBLIC),
        )
        .unwrap();
        assert_eq!(public_only.key_id(), ED25519_KEY_ID);
        assert!(!public_only.has_private());
    }

    #[test]
    fn test_key_id_depends_on_hash_algorithm_order() {
        let a = derive_key_id(KeyType::Ed25519, Scheme::Ed25519, &default_algs(), ED25519_PUBLIC)
            .unwrap();
        let b = derive_key_id(
            KeyType::Ed25519,
            Scheme::Ed25519,
            &[KeyIdHashAlgorithm::Sha512, KeyIdHashAlgorithm::Sha256],
            ED25519_PUBLIC,
        )
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_id_covers_pem_newlines() {
        let pem = "-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----";
        let canonical = encode_canonical(&KeyIdFields {
            keytype: KeyType::Rsa,
            scheme: Scheme::RsassaPssSha256,
            keyid_hash_algorithms: &[KeyIdHashAlgorithm::Sha256],
            keyval: PublicKeyVal { public: pem },
        })
        .unwrap();
        assert_eq!(
            String::from_utf8(canonical).unwrap(),
            concat!(
                "{\"keyid_hash_algorithms\":[\"sha256\"],\"keytype\":\"rsa\",",
                "\"keyval\":{\"public\":",
                "\"-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\"},",
                "\"scheme\":\"rsassa-pss-sha256\"}"
            )
        );
    }

    #[test]
    fn test_new_rejects_cross_family_scheme() {
        let err = Key::new(
            KeyType::Rsa,
            Scheme::Ed25519,
            default_algs(),
            KeyVal::public_only(ED25519_PUBLIC),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[test]
    fn test_json_round_trip_shape() {
        let json = format!(
            r#"{{"keytype": "ed25519", "scheme": "ed25519", "keyid": "{}",
                "keyid_hash_algorithms": ["sha256", "sha512"],
                "keyval": {{"public": "{}", "private": ""}}}}"#,
            ED25519_KEY_ID, ED25519_PUBLIC
        );
        let key = Key::from_json(&json).unwrap();
        assert_eq!(key.key_id(), ED25519_KEY_ID);

        let value: serde_json::Value = serde_json::from_str(&key.to_json().unwrap()).unwrap();
        assert_eq!(value["keytype"], "ed25519");
        assert_eq!(value["keyid"], ED25519_KEY_ID);
        assert_eq!(value["keyid_hash_algorithms"][1], "sha512");
        assert_eq!(value["keyval"]["public"], ED25519_PUBLIC);
        assert_eq!(value["keyval"]["private"], "");
    }

    #[test]
    fn test_json_keyid_is_rederived() {
        let json = format!(
            r#"{{"keytype": "ed25519", "scheme": "ed25519", "keyid": "deadbeef",
                "keyid_hash_algorithms": ["sha256", "sha512"], "keyval": {{"public": "{}"}}}}"#,
            ED25519_PUBLIC
        );
        let key = Key::from_json(&json).unwrap();
        assert_eq!(key.key_id(), ED25519_KEY_ID);
    }

    #[test]
    fn test_json_unknown_key_type() {
        let json = r#"{"keytype": "dsa", "scheme": "ed25519",
            "keyid_hash_algorithms": ["sha256"], "keyval": {"public": "00"}}"#;
        let err = Key::from_json(json).unwrap_err();
        assert!(err.to_string().contains("unsupported key type"));
    }

    #[test]
    fn test_json_unknown_hash_algorithm() {
        let json = format!(
            r#"{{"keytype": "ed25519", "scheme": "ed25519",
                "keyid_hash_algorithms": ["md5"], "keyval": {{"public": "{}"}}}}"#,
            ED25519_PUBLIC
        );
        assert!(Key::from_json(&json).is_err());
    }

    #[test]
    fn test_public_only_keeps_key_id() {
        let key = Key::new(
            KeyType::Ed25519,
            Scheme::Ed25519,
            default_algs(),
            KeyVal {
                public: ED25519_PUBLIC.to_string(),
                private: ED25519_PRIVATE.to_string(),
            },
        )
        .unwrap();
        let public = key.public_only();
        assert_eq!(public.key_id(), key.key_id());
        assert_eq!(public.private(), "");
        assert_eq!(public.public(), key.public());
    }
}
