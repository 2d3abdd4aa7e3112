//! Signature record

use crate::encoding::Hex;
use serde::{Deserialize, Serialize};

/// A signature over a payload, tagged with the signing key's id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Id of the key that produced the signature
    #[serde(rename = "keyid")]
    pub key_id: String,
    /// Raw signature bytes as lowercase hex
    pub sig: Hex,
}

impl Signature {
    /// Create a signature record from raw signature bytes
    pub fn new(key_id: impl Into<String>, sig_bytes: &[u8]) -> Self {
        Self {
            key_id: key_id.into(),
            sig: Hex::encode(sig_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_json_shape() {
        let sig = Signature::new("abcd", &[0x01, 0xfe]);
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, r#"{"keyid":"abcd","sig":"01fe"}"#);

        let parsed: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sig);
    }
}
