//! Checking signatures against a key's public half

use crate::ecdsa::{match_ecdsa_scheme, EcdsaSignatureValue};
use crate::ed25519::Ed25519PublicKey;
use crate::encoding::DecodedKey;
use crate::error::{Error, Result};
use crate::key::{decode_field, unexpected_key};
use intoto_types::{validate_key, Key, KeyType, Signature};

/// Verify `signature` over `payload` with `key`
///
/// Mirrors [`crate::sign`]: the digest is chosen the same way for each
/// family. Only the public half of `key` is used.
pub fn verify(key: &Key, signature: &Signature, payload: &[u8]) -> Result<()> {
    validate_key(key)?;
    let sig = signature
        .sig
        .decode()
        .map_err(|e| Error::SignatureEncoding(e.to_string()))?;

    let result = match key.key_type() {
        KeyType::Rsa => match decode_field(key, key.public())? {
            DecodedKey::RsaPublic(public) => public.verify_pss_sha256(payload, &sig),
            other => Err(unexpected_key(key, &other)),
        },
        KeyType::Ecdsa => match decode_field(key, key.public())? {
            DecodedKey::EcdsaPublic(public) => {
                let curve = public.curve();
                match_ecdsa_scheme(curve.bit_size(), key.scheme())?;
                let value = EcdsaSignatureValue::from_der_bytes(&sig)?;
                let digest = curve.hash_algorithm().digest(payload);
                public.verify_prehash(&digest, &value)
            }
            other => Err(unexpected_key(key, &other)),
        },
        KeyType::Ed25519 => Ed25519PublicKey::from_hex(key.public())?.verify(payload, &sig),
    };

    match &result {
        Ok(()) => tracing::debug!(key_id = key.key_id(), "signature verified"),
        Err(e) => tracing::debug!(key_id = key.key_id(), "signature rejected: {}", e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use intoto_types::{KeyIdHashAlgorithm, KeyVal, Scheme};

    const PUBLIC_HEX: &str = "8f93f549eb4cca8dc2142fb655ba2d0955d1824f79474f354e38d6a359e9d440";

    fn ed25519_public() -> Key {
        Key::new(
            KeyType::Ed25519,
            Scheme::Ed25519,
            vec![KeyIdHashAlgorithm::Sha256, KeyIdHashAlgorithm::Sha512],
            KeyVal::public_only(PUBLIC_HEX),
        )
        .unwrap()
    }

    #[test]
    fn test_malformed_sig_hex() {
        let key = ed25519_public();
        let signature = Signature {
            key_id: key.key_id().to_string(),
            sig: "not hex".into(),
        };
        assert!(matches!(
            verify(&key, &signature, b"payload"),
            Err(Error::SignatureEncoding(_))
        ));
    }

    #[test]
    fn test_wrong_signature_rejected() {
        let key = ed25519_public();
        let signature = Signature::new(key.key_id(), &[0u8; 64]);
        assert!(matches!(
            verify(&key, &signature, b"payload"),
            Err(Error::InvalidSignature(KeyType::Ed25519))
        ));
    }

    #[test]
    fn test_ecdsa_sig_not_asn1() {
        let key = Key::new(
            KeyType::Ecdsa,
            Scheme::EcdsaSha2Nistp384,
            vec![KeyIdHashAlgorithm::Sha256],
            KeyVal::public_only(include_str!("../test-data/keys/ecdsa-p384.pub.pem")),
        )
        .unwrap();
        let signature = Signature::new(key.key_id(), b"definitely not DER");
        assert!(matches!(
            verify(&key, &signature, b"payload"),
            Err(Error::SignatureEncoding(_))
        ));
    }
}
