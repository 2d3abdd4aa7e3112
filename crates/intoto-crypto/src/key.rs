//! Building keys from decoded material
//!
//! [`normalize`] turns raw key bytes into the stored text forms (PEM for rsa
//! and ecdsa, hex for ed25519) and builds a [`Key`]. [`load_key`] runs a PEM
//! block through the codec first.

use crate::config::LoadConfig;
use crate::ed25519::{Ed25519PrivateKey, Ed25519PublicKey};
use crate::encoding::{
    decode, encode_pem, DecodedKey, PEM_PRIVATE_KEY, PEM_PUBLIC_KEY, PEM_RSA_PRIVATE_KEY,
};
use crate::error::{Error, Result};
use intoto_types::{Key, KeyIdHashAlgorithm, KeyType, KeyVal, Scheme};

/// Build a key from raw public and private bytes
///
/// For rsa and ecdsa the bytes are DER and get wrapped in PEM; for ed25519
/// they are the raw key bytes and get hex encoded. An empty `private` yields
/// a public-only key.
pub fn normalize(
    public: &[u8],
    private: &[u8],
    key_type: KeyType,
    scheme: Scheme,
    key_id_hash_algorithms: Vec<KeyIdHashAlgorithm>,
) -> Result<Key> {
    let encode = |bytes: &[u8], label: &str| match key_type {
        KeyType::Rsa | KeyType::Ecdsa => encode_pem(bytes, label),
        KeyType::Ed25519 => hex::encode(bytes),
    };
    let private_label = match key_type {
        KeyType::Rsa => PEM_RSA_PRIVATE_KEY,
        _ => PEM_PRIVATE_KEY,
    };

    let key_val = KeyVal {
        public: encode(public, PEM_PUBLIC_KEY),
        private: if private.is_empty() {
            String::new()
        } else {
            encode(private, private_label)
        },
    };
    let key = Key::new(key_type, scheme, key_id_hash_algorithms, key_val)?;
    tracing::debug!(
        key_id = key.key_id(),
        key_type = %key_type,
        scheme = %scheme,
        has_private = key.has_private(),
        "normalized key"
    );
    Ok(key)
}

/// Load a key from a PEM block with the given scheme and key id algorithms
pub fn load_key(
    pem: &[u8],
    scheme: Scheme,
    key_id_hash_algorithms: Vec<KeyIdHashAlgorithm>,
) -> Result<Key> {
    let config = LoadConfig::default()
        .with_scheme(scheme)
        .with_key_id_hash_algorithms(key_id_hash_algorithms);
    load_key_with_config(pem, &config)
}

/// Load a key from a PEM block
///
/// Accepts PKCS#8 private keys of every family, PKCS#1 RSA private keys and
/// PKIX public keys. Private rsa and ecdsa keys keep the PEM body exactly as
/// read; their public half is stored as PKIX.
pub fn load_key_with_config(pem: &[u8], config: &LoadConfig) -> Result<Key> {
    let (block, decoded) = decode(pem)?;
    let default_scheme = match &decoded {
        DecodedKey::RsaPrivate(_) | DecodedKey::RsaPublic(_) => Scheme::RsassaPssSha256,
        DecodedKey::EcdsaPrivate(key) => key.curve().scheme(),
        DecodedKey::EcdsaPublic(key) => key.curve().scheme(),
        DecodedKey::Ed25519Private(_) | DecodedKey::Ed25519Public(_) => Scheme::Ed25519,
    };
    let scheme = config.scheme.unwrap_or(default_scheme);
    let key_type = decoded.key_type();

    let (public, private) = match decoded {
        DecodedKey::RsaPublic(key) => (key.to_spki_der()?, Vec::new()),
        DecodedKey::RsaPrivate(key) => (
            key.public_key()?.to_spki_der()?,
            block.contents().to_vec(),
        ),
        DecodedKey::EcdsaPublic(key) => (key.to_spki_der()?, Vec::new()),
        DecodedKey::EcdsaPrivate(key) => (
            key.public_key().to_spki_der()?,
            block.contents().to_vec(),
        ),
        DecodedKey::Ed25519Public(key) => (key.as_bytes().to_vec(), Vec::new()),
        DecodedKey::Ed25519Private(key) => (key.public_key().as_bytes().to_vec(), key.to_bytes()),
    };

    normalize(
        &public,
        &private,
        key_type,
        scheme,
        config.key_id_hash_algorithms.clone(),
    )
}

/// Build an ed25519 key pair from its JSON form
///
/// The `keyid` in the document is ignored and derived again. Both halves must
/// be present and belong together.
pub fn parse_ed25519_from_private_json(json: &str) -> Result<Key> {
    let key = Key::from_json(json)?;
    if key.key_type() != KeyType::Ed25519 {
        return Err(Error::KeyTypeMismatch(format!(
            "expected an ed25519 key, got {}",
            key.key_type()
        )));
    }
    if !key.has_private() {
        return Err(Error::InvalidKeyMaterial(
            "ed25519 key has no private half".to_string(),
        ));
    }

    let public = Ed25519PublicKey::from_hex(key.public())?;
    let private_bytes =
        hex::decode(key.private()).map_err(|e| Error::InvalidHexString(e.to_string()))?;
    let private = Ed25519PrivateKey::from_bytes(&private_bytes)?;
    if private.public_key() != public {
        return Err(Error::InvalidKeyMaterial(
            "ed25519 private key does not match the public key".to_string(),
        ));
    }

    normalize(
        public.as_bytes(),
        &private_bytes,
        KeyType::Ed25519,
        key.scheme(),
        key.key_id_hash_algorithms().to_vec(),
    )
}

/// Decode a PEM field of `key` and check it belongs to the key's family
pub(crate) fn decode_field(key: &Key, text: &str) -> Result<DecodedKey> {
    let (_, decoded) = decode(text.as_bytes())?;
    if decoded.key_type() != key.key_type() {
        return Err(unexpected_key(key, &decoded));
    }
    Ok(decoded)
}

pub(crate) fn unexpected_key(key: &Key, decoded: &DecodedKey) -> Error {
    Error::KeyTypeMismatch(format!(
        "{} key {} holds {}",
        key.key_type(),
        key.key_id(),
        decoded.describe()
    ))
}
