//! Producing signatures with a key's private half

use crate::ecdsa::match_ecdsa_scheme;
use crate::ed25519::Ed25519PrivateKey;
use crate::encoding::DecodedKey;
use crate::error::{Error, Result};
use crate::key::{decode_field, unexpected_key};
use intoto_types::{validate_key, Key, KeyType, Signature};

/// Sign `payload` with `key`
///
/// - rsa: RSASSA-PSS over SHA-256 with a 32-byte salt.
/// - ecdsa: the payload is hashed with the digest matching the curve size and
///   the digest is signed; the signature is DER `SEQUENCE { r, s }`.
/// - ed25519: plain Ed25519 over the payload.
///
/// The returned signature carries `key`'s id and the raw signature as hex.
pub fn sign(key: &Key, payload: &[u8]) -> Result<Signature> {
    validate_key(key)?;
    if !key.has_private() {
        return Err(Error::KeyTypeMismatch(format!(
            "{} key {} has no private key to sign with",
            key.key_type(),
            key.key_id()
        )));
    }

    let sig = match key.key_type() {
        KeyType::Rsa => match decode_field(key, key.private())? {
            DecodedKey::RsaPrivate(private) => private.sign_pss_sha256(payload)?,
            other => return Err(unexpected_key(key, &other)),
        },
        KeyType::Ecdsa => match decode_field(key, key.private())? {
            DecodedKey::EcdsaPrivate(private) => {
                let curve = private.curve();
                match_ecdsa_scheme(curve.bit_size(), key.scheme())?;
                let digest = curve.hash_algorithm().digest(payload);
                private.sign_prehash(&digest)?.to_der_bytes()?
            }
            other => return Err(unexpected_key(key, &other)),
        },
        KeyType::Ed25519 => Ed25519PrivateKey::from_hex(key.private())?.sign(payload),
    };

    tracing::debug!(
        key_id = key.key_id(),
        scheme = %key.scheme(),
        "signed {} byte payload",
        payload.len()
    );
    Ok(Signature::new(key.key_id(), &sig))
}
