//! ECDSA over the NIST prime curves
//!
//! Signing follows RFC 5656 section 6.2.1: the payload is hashed with a
//! digest chosen from the curve size and the resulting digest is signed as a
//! prehash. The signature travels as a DER `SEQUENCE { r INTEGER, s INTEGER }`.

use crate::error::{Error, Result};
use crate::hash::HashAlgorithm;
use const_oid::db::rfc5912::{SECP_224_R_1, SECP_256_R_1, SECP_384_R_1, SECP_521_R_1};
use const_oid::ObjectIdentifier;
use der::{asn1::Uint, Decode, Encode, Sequence};
use ecdsa::signature::hazmat::{PrehashVerifier, RandomizedPrehashSigner};
use intoto_types::{KeyType, Scheme};
use pkcs8::DecodePrivateKey;
use rand_core::OsRng;
use spki::{DecodePublicKey, EncodePublicKey};

/// Supported named curves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcdsaCurve {
    /// secp224r1
    P224,
    /// secp256r1 / prime256v1
    P256,
    /// secp384r1
    P384,
    /// secp521r1
    P521,
}

impl EcdsaCurve {
    /// Look up a curve by its named-curve OID
    pub fn from_oid(oid: ObjectIdentifier) -> Option<Self> {
        match oid {
            SECP_224_R_1 => Some(EcdsaCurve::P224),
            SECP_256_R_1 => Some(EcdsaCurve::P256),
            SECP_384_R_1 => Some(EcdsaCurve::P384),
            SECP_521_R_1 => Some(EcdsaCurve::P521),
            _ => None,
        }
    }

    /// Curve size in bits
    pub fn bit_size(&self) -> usize {
        match self {
            EcdsaCurve::P224 => 224,
            EcdsaCurve::P256 => 256,
            EcdsaCurve::P384 => 384,
            EcdsaCurve::P521 => 521,
        }
    }

    /// Length of a serialized scalar in bytes
    pub fn field_size(&self) -> usize {
        self.bit_size().div_ceil(8)
    }

    /// Digest applied to payloads signed with this curve
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::for_curve_bits(self.bit_size())
    }

    /// The scheme that names this curve
    pub fn scheme(&self) -> Scheme {
        match self {
            EcdsaCurve::P224 => Scheme::EcdsaSha2Nistp224,
            EcdsaCurve::P256 => Scheme::EcdsaSha2Nistp256,
            EcdsaCurve::P384 => Scheme::EcdsaSha2Nistp384,
            EcdsaCurve::P521 => Scheme::EcdsaSha2Nistp521,
        }
    }
}

/// Check that `scheme` names a curve of `curve_bits` size
pub fn match_ecdsa_scheme(curve_bits: usize, scheme: Scheme) -> Result<()> {
    match scheme.ecdsa_curve_bits() {
        Some(bits) if bits == curve_bits => Ok(()),
        _ => Err(Error::CurveSizeSchemeMismatch {
            curve_bits,
            scheme: scheme.to_string(),
        }),
    }
}

/// The (r, s) pair of an ECDSA signature in its ASN.1 form
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct EcdsaSignatureValue {
    /// First signature component
    pub r: Uint,
    /// Second signature component
    pub s: Uint,
}

impl EcdsaSignatureValue {
    /// Build from big-endian unsigned scalars
    pub fn from_scalars(r: &[u8], s: &[u8]) -> Result<Self> {
        Ok(Self {
            r: Uint::new(r)?,
            s: Uint::new(s)?,
        })
    }

    /// Decode a DER signature
    pub fn from_der_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_der(bytes).map_err(|e| Error::SignatureEncoding(e.to_string()))
    }

    /// Encode as DER
    pub fn to_der_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.to_der()?)
    }

    /// Concatenate r and s, each left-padded to `field_size` bytes
    ///
    /// Returns `None` when a component does not fit the field.
    fn to_fixed_bytes(&self, field_size: usize) -> Option<Vec<u8>> {
        let mut out = vec![0u8; field_size * 2];
        let chunks = out.chunks_mut(field_size);
        for (component, chunk) in [&self.r, &self.s].into_iter().zip(chunks) {
            let bytes = component.as_bytes();
            if bytes.len() > field_size {
                return None;
            }
            chunk[field_size - bytes.len()..].copy_from_slice(bytes);
        }
        Some(out)
    }
}

macro_rules! for_each_curve {
    ($value:expr, $ty:ident, |$key:ident, $curve:ident| $body:expr) => {
        match $value {
            $ty::P224($key) => {
                type $curve = p224::NistP224;
                $body
            }
            $ty::P256($key) => {
                type $curve = p256::NistP256;
                $body
            }
            $ty::P384($key) => {
                type $curve = p384::NistP384;
                $body
            }
            $ty::P521($key) => {
                type $curve = p521::NistP521;
                $body
            }
        }
    };
}

/// An ECDSA private key on one of the supported curves
pub enum EcdsaPrivateKey {
    P224(ecdsa::SigningKey<p224::NistP224>),
    P256(ecdsa::SigningKey<p256::NistP256>),
    P384(ecdsa::SigningKey<p384::NistP384>),
    P521(ecdsa::SigningKey<p521::NistP521>),
}

impl EcdsaPrivateKey {
    /// Parse a PKCS#8 PrivateKeyInfo for a key on `curve`
    pub fn from_pkcs8(curve: EcdsaCurve, der: &[u8]) -> Result<Self> {
        let invalid = |e: pkcs8::Error| Error::InvalidKeyMaterial(e.to_string());
        Ok(match curve {
            EcdsaCurve::P224 => {
                Self::P224(ecdsa::SigningKey::from_pkcs8_der(der).map_err(invalid)?)
            }
            EcdsaCurve::P256 => {
                Self::P256(ecdsa::SigningKey::from_pkcs8_der(der).map_err(invalid)?)
            }
            EcdsaCurve::P384 => {
                Self::P384(ecdsa::SigningKey::from_pkcs8_der(der).map_err(invalid)?)
            }
            EcdsaCurve::P521 => {
                Self::P521(ecdsa::SigningKey::from_pkcs8_der(der).map_err(invalid)?)
            }
        })
    }

    /// Curve this key lives on
    pub fn curve(&self) -> EcdsaCurve {
        match self {
            Self::P224(_) => EcdsaCurve::P224,
            Self::P256(_) => EcdsaCurve::P256,
            Self::P384(_) => EcdsaCurve::P384,
            Self::P521(_) => EcdsaCurve::P521,
        }
    }

    /// The public half of this key
    pub fn public_key(&self) -> EcdsaPublicKey {
        match self {
            Self::P224(key) => EcdsaPublicKey::P224(key.verifying_key().clone()),
            Self::P256(key) => EcdsaPublicKey::P256(key.verifying_key().clone()),
            Self::P384(key) => EcdsaPublicKey::P384(key.verifying_key().clone()),
            Self::P521(key) => EcdsaPublicKey::P521(key.verifying_key().clone()),
        }
    }

    /// Sign a digest with a fresh random nonce
    pub fn sign_prehash(&self, prehash: &[u8]) -> Result<EcdsaSignatureValue> {
        let failed = |e: ecdsa::Error| Error::Signing(e.to_string());
        // FieldBytes differ in length per curve
        let (r, s) = match self {
            Self::P224(key) => {
                let signature: ecdsa::Signature<p224::NistP224> =
                    key.sign_prehash_with_rng(&mut OsRng, prehash).map_err(failed)?;
                let (r, s) = signature.split_bytes();
                (r.to_vec(), s.to_vec())
            }
            Self::P256(key) => {
                let signature: ecdsa::Signature<p256::NistP256> =
                    key.sign_prehash_with_rng(&mut OsRng, prehash).map_err(failed)?;
                let (r, s) = signature.split_bytes();
                (r.to_vec(), s.to_vec())
            }
            Self::P384(key) => {
                let signature: ecdsa::Signature<p384::NistP384> =
                    key.sign_prehash_with_rng(&mut OsRng, prehash).map_err(failed)?;
                let (r, s) = signature.split_bytes();
                (r.to_vec(), s.to_vec())
            }
            Self::P521(key) => {
                // NistP521 has no default digest, so the generic key cannot sign
                let signer = p521::ecdsa::SigningKey::from(key.clone());
                let signature: p521::ecdsa::Signature =
                    signer.sign_prehash_with_rng(&mut OsRng, prehash).map_err(failed)?;
                let (r, s) = signature.split_bytes();
                (r.to_vec(), s.to_vec())
            }
        };
        EcdsaSignatureValue::from_scalars(&r, &s)
    }
}

/// An ECDSA public key on one of the supported curves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcdsaPublicKey {
    P224(ecdsa::VerifyingKey<p224::NistP224>),
    P256(ecdsa::VerifyingKey<p256::NistP256>),
    P384(ecdsa::VerifyingKey<p384::NistP384>),
    P521(ecdsa::VerifyingKey<p521::NistP521>),
}

impl EcdsaPublicKey {
    /// Parse an X.509 SubjectPublicKeyInfo for a key on `curve`
    pub fn from_spki_der(curve: EcdsaCurve, der: &[u8]) -> Result<Self> {
        let invalid = |e: spki::Error| Error::InvalidKeyMaterial(e.to_string());
        Ok(match curve {
            EcdsaCurve::P224 => {
                Self::P224(ecdsa::VerifyingKey::from_public_key_der(der).map_err(invalid)?)
            }
            EcdsaCurve::P256 => {
                Self::P256(ecdsa::VerifyingKey::from_public_key_der(der).map_err(invalid)?)
            }
            EcdsaCurve::P384 => {
                Self::P384(ecdsa::VerifyingKey::from_public_key_der(der).map_err(invalid)?)
            }
            EcdsaCurve::P521 => {
                Self::P521(ecdsa::VerifyingKey::from_public_key_der(der).map_err(invalid)?)
            }
        })
    }

    /// Curve this key lives on
    pub fn curve(&self) -> EcdsaCurve {
        match self {
            Self::P224(_) => EcdsaCurve::P224,
            Self::P256(_) => EcdsaCurve::P256,
            Self::P384(_) => EcdsaCurve::P384,
            Self::P521(_) => EcdsaCurve::P521,
        }
    }

    /// Encode as an X.509 SubjectPublicKeyInfo with an uncompressed point
    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        let document = for_each_curve!(self, EcdsaPublicKey, |key, _C| {
            EncodePublicKey::to_public_key_der(key)
        })
        .map_err(|e| Error::Der(e.to_string()))?;
        Ok(document.as_bytes().to_vec())
    }

    /// Verify a signature over a digest
    pub fn verify_prehash(&self, prehash: &[u8], value: &EcdsaSignatureValue) -> Result<()> {
        let invalid = |_| Error::InvalidSignature(KeyType::Ecdsa);
        let fixed = value
            .to_fixed_bytes(self.curve().field_size())
            .ok_or(Error::InvalidSignature(KeyType::Ecdsa))?;
        for_each_curve!(self, EcdsaPublicKey, |key, C| {
            let signature = ecdsa::Signature::<C>::from_slice(&fixed).map_err(invalid)?;
            key.verify_prehash(prehash, &signature).map_err(invalid)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_ecdsa_scheme() {
        assert!(match_ecdsa_scheme(224, Scheme::EcdsaSha2Nistp224).is_ok());
        assert!(match_ecdsa_scheme(256, Scheme::EcdsaSha2Nistp256).is_ok());
        assert!(match_ecdsa_scheme(384, Scheme::EcdsaSha2Nistp384).is_ok());
        assert!(match_ecdsa_scheme(521, Scheme::EcdsaSha2Nistp521).is_ok());

        let err = match_ecdsa_scheme(384, Scheme::EcdsaSha2Nistp224).unwrap_err();
        assert!(matches!(
            err,
            Error::CurveSizeSchemeMismatch { curve_bits: 384, .. }
        ));
        assert!(match_ecdsa_scheme(256, Scheme::Ed25519).is_err());
    }

    #[test]
    fn test_curve_properties() {
        assert_eq!(EcdsaCurve::P521.field_size(), 66);
        assert_eq!(EcdsaCurve::P224.field_size(), 28);
        assert_eq!(EcdsaCurve::P224.hash_algorithm(), HashAlgorithm::Sha256);
        assert_eq!(EcdsaCurve::P384.hash_algorithm(), HashAlgorithm::Sha384);
        assert_eq!(EcdsaCurve::P521.hash_algorithm(), HashAlgorithm::Sha512);
        assert_eq!(EcdsaCurve::from_oid(SECP_384_R_1), Some(EcdsaCurve::P384));
        assert_eq!(EcdsaCurve::P384.scheme(), Scheme::EcdsaSha2Nistp384);
    }

    #[test]
    fn test_signature_value_der() {
        // r has its high bit set and needs a leading zero; s has a leading
        // zero byte that must be stripped.
        let value = EcdsaSignatureValue::from_scalars(&[0x80, 0x01], &[0x00, 0x7f]).unwrap();
        let der = value.to_der_bytes().unwrap();
        assert_eq!(der, vec![0x30, 0x08, 0x02, 0x03, 0x00, 0x80, 0x01, 0x02, 0x01, 0x7f]);
        assert_eq!(EcdsaSignatureValue::from_der_bytes(&der).unwrap(), value);
    }

    fn fixture_key(pem_text: &str, curve: EcdsaCurve) -> EcdsaPrivateKey {
        let block = pem::parse(pem_text).unwrap();
        EcdsaPrivateKey::from_pkcs8(curve, block.contents()).unwrap()
    }

    #[test]
    fn test_p521_sign_and_verify_prehash() {
        let key = fixture_key(include_str!("../test-data/keys/ecdsa-p521.pem"), EcdsaCurve::P521);
        assert_eq!(key.curve(), EcdsaCurve::P521);

        let digest = HashAlgorithm::Sha512.digest(b"step metadata");
        let value = key.sign_prehash(&digest).unwrap();
        assert!(value.to_fixed_bytes(66).is_some());

        let public = key.public_key();
        assert_eq!(public.curve(), EcdsaCurve::P521);
        public.verify_prehash(&digest, &value).unwrap();

        let other = HashAlgorithm::Sha512.digest(b"other metadata");
        assert!(matches!(
            public.verify_prehash(&other, &value),
            Err(Error::InvalidSignature(KeyType::Ecdsa))
        ));
    }

    #[test]
    fn test_p224_sign_and_verify_prehash() {
        let key = fixture_key(include_str!("../test-data/keys/ecdsa-p224.pem"), EcdsaCurve::P224);
        let digest = HashAlgorithm::Sha256.digest(b"step metadata");
        let value = key.sign_prehash(&digest).unwrap();
        key.public_key().verify_prehash(&digest, &value).unwrap();
    }

    #[test]
    fn test_signature_value_rejects_garbage() {
        let err = EcdsaSignatureValue::from_der_bytes(b"not asn1").unwrap_err();
        assert!(matches!(err, Error::SignatureEncoding(_)));
    }

    #[test]
    fn test_fixed_bytes_padding() {
        let value = EcdsaSignatureValue::from_scalars(&[0x01], &[0x02, 0x03]).unwrap();
        assert_eq!(value.to_fixed_bytes(3).unwrap(), vec![0, 0, 1, 0, 2, 3]);
        assert!(value.to_fixed_bytes(1).is_none());
    }
}
