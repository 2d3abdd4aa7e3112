//! PEM and DER key codec
//!
//! Decoding takes one PEM block and tries its body as, in order, a PKCS#8
//! private key, a PKCS#1 RSA private key and a PKIX public key. The first
//! format that parses wins. Encoding wraps DER in a bare PEM block with LF
//! line endings and no surrounding whitespace.

use crate::ecdsa::{EcdsaCurve, EcdsaPrivateKey, EcdsaPublicKey};
use crate::ed25519::{Ed25519PrivateKey, Ed25519PublicKey};
use crate::error::{Error, Result};
use crate::rsa::{RsaPrivateKey, RsaPublicKey};
use const_oid::db::{
    rfc5912::{ID_EC_PUBLIC_KEY, RSA_ENCRYPTION},
    rfc8410::ID_ED_25519,
};
use intoto_types::KeyType;
use pem::{EncodeConfig, LineEnding, Pem};
use pkcs8::PrivateKeyInfo;
use spki::SubjectPublicKeyInfoRef;
use std::fmt;

/// Label for PKIX public keys
pub const PEM_PUBLIC_KEY: &str = "PUBLIC KEY";

/// Label for ECDSA and generic PKCS#8 private keys
pub const PEM_PRIVATE_KEY: &str = "PRIVATE KEY";

/// Label for stored RSA private keys
///
/// Sibling in-toto implementations write this exact (non-standard) label, so
/// it is kept for interoperability.
pub const PEM_RSA_PRIVATE_KEY: &str = "PRIVATE RSA KEY";

/// A key object decoded from a PEM block
pub enum DecodedKey {
    RsaPrivate(RsaPrivateKey),
    RsaPublic(RsaPublicKey),
    EcdsaPrivate(EcdsaPrivateKey),
    EcdsaPublic(EcdsaPublicKey),
    Ed25519Private(Ed25519PrivateKey),
    Ed25519Public(Ed25519PublicKey),
}

impl DecodedKey {
    /// The key family of the decoded object
    pub fn key_type(&self) -> KeyType {
        match self {
            DecodedKey::RsaPrivate(_) | DecodedKey::RsaPublic(_) => KeyType::Rsa,
            DecodedKey::EcdsaPrivate(_) | DecodedKey::EcdsaPublic(_) => KeyType::Ecdsa,
            DecodedKey::Ed25519Private(_) | DecodedKey::Ed25519Public(_) => KeyType::Ed25519,
        }
    }

    /// Whether the block held private key material
    pub fn is_private(&self) -> bool {
        matches!(
            self,
            DecodedKey::RsaPrivate(_) | DecodedKey::EcdsaPrivate(_) | DecodedKey::Ed25519Private(_)
        )
    }

    /// Short description used in errors and logs
    pub fn describe(&self) -> String {
        let visibility = if self.is_private() { "private" } else { "public" };
        format!("{} {} key", self.key_type(), visibility)
    }
}

impl fmt::Debug for DecodedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print private material
        f.debug_tuple("DecodedKey").field(&self.describe()).finish()
    }
}

/// Wrap DER bytes in a PEM block with the given label
pub fn encode_pem(der: &[u8], label: &str) -> String {
    let block = Pem::new(label, der.to_vec());
    let config = EncodeConfig::new().set_line_ending(LineEnding::LF);
    pem::encode_config(&block, config).trim().to_string()
}

/// Decode one PEM block into a key object
///
/// Returns the parsed PEM block alongside the key so callers can keep the
/// original DER body.
pub fn decode(bytes: &[u8]) -> Result<(Pem, DecodedKey)> {
    let block = pem::parse(bytes).map_err(|e| {
        tracing::debug!("no PEM block found: {}", e);
        Error::NoPemBlock
    })?;
    let key = parse_der(block.contents())?;
    tracing::debug!(label = block.tag(), "decoded {}", key.describe());
    Ok((block, key))
}

/// Try each supported DER format in turn
pub fn parse_der(der: &[u8]) -> Result<DecodedKey> {
    match parse_pkcs8(der) {
        Ok(key) => return Ok(key),
        Err(e) => tracing::debug!("not a PKCS#8 private key: {}", e),
    }
    match RsaPrivateKey::from_pkcs1(der) {
        Ok(key) => return Ok(DecodedKey::RsaPrivate(key)),
        Err(e) => tracing::debug!("not a PKCS#1 private key: {}", e),
    }
    match parse_pkix(der) {
        Ok(key) => return Ok(key),
        Err(e) => tracing::debug!("not a PKIX public key: {}", e),
    }
    Err(Error::FailedPemParsing)
}

fn parse_pkcs8(der: &[u8]) -> Result<DecodedKey> {
    let info = PrivateKeyInfo::try_from(der).map_err(|e| Error::Der(e.to_string()))?;
    match info.algorithm.oid {
        RSA_ENCRYPTION => Ok(DecodedKey::RsaPrivate(RsaPrivateKey::from_pkcs8(der)?)),
        ID_EC_PUBLIC_KEY => {
            let curve = curve_from_parameters(info.algorithm.parameters_oid())?;
            Ok(DecodedKey::EcdsaPrivate(EcdsaPrivateKey::from_pkcs8(curve, der)?))
        }
        ID_ED_25519 => Ok(DecodedKey::Ed25519Private(
            Ed25519PrivateKey::from_pkcs8_private_key(info.private_key)?,
        )),
        oid => Err(Error::InvalidKeyMaterial(format!(
            "unsupported PKCS#8 algorithm {}",
            oid
        ))),
    }
}

fn parse_pkix(der: &[u8]) -> Result<DecodedKey> {
    let spki = SubjectPublicKeyInfoRef::try_from(der).map_err(|e| Error::Der(e.to_string()))?;
    let raw = spki.subject_public_key.raw_bytes();
    match spki.algorithm.oid {
        RSA_ENCRYPTION => Ok(DecodedKey::RsaPublic(RsaPublicKey::from_pkcs1(raw)?)),
        ID_EC_PUBLIC_KEY => {
            let curve = curve_from_parameters(spki.algorithm.parameters_oid())?;
            Ok(DecodedKey::EcdsaPublic(EcdsaPublicKey::from_spki_der(curve, der)?))
        }
        ID_ED_25519 => Ok(DecodedKey::Ed25519Public(Ed25519PublicKey::from_bytes(raw)?)),
        oid => Err(Error::InvalidKeyMaterial(format!(
            "unsupported public key algorithm {}",
            oid
        ))),
    }
}

fn curve_from_parameters(oid: spki::Result<const_oid::ObjectIdentifier>) -> Result<EcdsaCurve> {
    let oid = oid.map_err(|e| Error::InvalidKeyMaterial(format!("missing curve OID: {}", e)))?;
    EcdsaCurve::from_oid(oid)
        .ok_or_else(|| Error::InvalidKeyMaterial(format!("unsupported curve {}", oid)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ED25519_PUB: &str = include_str!("../test-data/keys/ed25519.pub.pem");
    const ED25519_PRIV: &str = include_str!("../test-data/keys/ed25519.pem");
    const RSA_PKCS1: &str = include_str!("../test-data/keys/rsa.pkcs1.pem");
    const P384_PRIV: &str = include_str!("../test-data/keys/ecdsa-p384.pem");

    #[test]
    fn test_encode_pem_shape() {
        let text = encode_pem(&[0u8; 60], PEM_PUBLIC_KEY);
        assert!(text.starts_with("-----BEGIN PUBLIC KEY-----\n"));
        assert!(text.ends_with("-----END PUBLIC KEY-----"));
        assert!(!text.contains('\r'));
        let parsed = pem::parse(&text).unwrap();
        assert_eq!(parsed.contents(), &[0u8; 60][..]);
    }

    #[test]
    fn test_no_pem_block() {
        assert!(matches!(decode(b"not a pem file"), Err(Error::NoPemBlock)));
        assert!(matches!(decode(b""), Err(Error::NoPemBlock)));
    }

    #[test]
    fn test_unparseable_body() {
        let text = encode_pem(b"garbage", PEM_PUBLIC_KEY);
        assert!(matches!(
            decode(text.as_bytes()),
            Err(Error::FailedPemParsing)
        ));
    }

    #[test]
    fn test_decode_families() {
        let (_, key) = decode(ED25519_PUB.as_bytes()).unwrap();
        assert!(matches!(key, DecodedKey::Ed25519Public(_)));

        let (_, key) = decode(ED25519_PRIV.as_bytes()).unwrap();
        assert!(matches!(key, DecodedKey::Ed25519Private(_)));

        let (block, key) = decode(RSA_PKCS1.as_bytes()).unwrap();
        assert_eq!(block.tag(), "RSA PRIVATE KEY");
        assert!(matches!(key, DecodedKey::RsaPrivate(_)));

        let (_, key) = decode(P384_PRIV.as_bytes()).unwrap();
        match key {
            DecodedKey::EcdsaPrivate(k) => assert_eq!(k.curve(), EcdsaCurve::P384),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_debug_hides_material() {
        let (_, key) = decode(ED25519_PRIV.as_bytes()).unwrap();
        assert_eq!(format!("{:?}", key), "DecodedKey(\"ed25519 private key\")");
    }
}
