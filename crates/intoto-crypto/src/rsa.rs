//! RSA-PSS keys using aws-lc-rs

use crate::error::{Error, Result};
use aws_lc_rs::{
    rand::SystemRandom,
    signature::{
        KeyPair as AwsKeyPair, RsaKeyPair, UnparsedPublicKey, RSA_PSS_2048_8192_SHA256,
        RSA_PSS_SHA256,
    },
};
use const_oid::db::rfc5912::RSA_ENCRYPTION;
use der::{
    asn1::{BitString, Null, UintRef},
    Decode, Encode, Sequence,
};
use intoto_types::KeyType;
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

/// PKCS#1 RSAPublicKey, parsed only to validate the key
#[derive(Sequence)]
struct RsaPublicKeyDer<'a> {
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
}

/// An RSA private key
pub struct RsaPrivateKey {
    key_pair: RsaKeyPair,
}

impl RsaPrivateKey {
    /// Parse a PKCS#8 PrivateKeyInfo
    pub fn from_pkcs8(der: &[u8]) -> Result<Self> {
        Ok(Self {
            key_pair: RsaKeyPair::from_pkcs8(der)?,
        })
    }

    /// Parse a PKCS#1 RSAPrivateKey
    pub fn from_pkcs1(der: &[u8]) -> Result<Self> {
        Ok(Self {
            key_pair: RsaKeyPair::from_der(der)?,
        })
    }

    /// The public half of this key
    pub fn public_key(&self) -> Result<RsaPublicKey> {
        RsaPublicKey::from_pkcs1(self.key_pair.public_key().as_ref())
    }

    /// Sign with RSASSA-PSS, SHA-256 for digest and MGF1, 32-byte salt
    ///
    /// The payload is hashed by the primitive, so the signed value is the
    /// same as signing a pre-computed SHA-256 digest with PSS.
    pub fn sign_pss_sha256(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let rng = SystemRandom::new();
        let mut sig = vec![0u8; self.key_pair.public_modulus_len()];
        self.key_pair
            .sign(&RSA_PSS_SHA256, &rng, payload, &mut sig)
            .map_err(|_| Error::Signing("RSA-PSS signing failed".to_string()))?;
        Ok(sig)
    }
}

/// An RSA public key, held as PKCS#1 RSAPublicKey DER
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pkcs1: Vec<u8>,
}

impl RsaPublicKey {
    /// Parse a PKCS#1 RSAPublicKey
    pub fn from_pkcs1(der: &[u8]) -> Result<Self> {
        let parsed = RsaPublicKeyDer::from_der(der)?;
        let is_zero = |value: UintRef<'_>| value.as_bytes().iter().all(|b| *b == 0);
        if is_zero(parsed.modulus) || is_zero(parsed.public_exponent) {
            return Err(Error::InvalidKeyMaterial(
                "RSA public key has a zero modulus or exponent".to_string(),
            ));
        }
        Ok(Self {
            pkcs1: der.to_vec(),
        })
    }

    /// Encode as an X.509 SubjectPublicKeyInfo
    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        let spki = SubjectPublicKeyInfoOwned {
            algorithm: AlgorithmIdentifierOwned {
                oid: RSA_ENCRYPTION,
                parameters: Some(der::Any::encode_from(&Null)?),
            },
            subject_public_key: BitString::from_bytes(&self.pkcs1)?,
        };
        Ok(spki.to_der()?)
    }

    /// Verify an RSASSA-PSS SHA-256 signature over `payload`
    pub fn verify_pss_sha256(&self, payload: &[u8], signature: &[u8]) -> Result<()> {
        let key = UnparsedPublicKey::new(&RSA_PSS_2048_8192_SHA256, &self.pkcs1);
        key.verify(payload, signature)
            .map_err(|_| Error::InvalidSignature(KeyType::Rsa))
    }
}
