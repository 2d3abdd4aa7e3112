//! Hex text wrapper
//!
//! Signatures travel as lowercase hex text. The newtype keeps encoded text
//! from being confused with raw signature bytes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Lowercase hex text as it appears in a signature record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hex(String);

impl Hex {
    /// Wrap text as-is; it is only checked by [`Hex::decode`]
    pub fn new(text: String) -> Self {
        Hex(text)
    }

    /// Hex encode raw bytes
    pub fn encode(bytes: &[u8]) -> Self {
        Hex(hex::encode(bytes))
    }

    /// Raw bytes behind the text
    pub fn decode(&self) -> Result<Vec<u8>> {
        hex::decode(&self.0).map_err(|e| Error::InvalidHexString(e.to_string()))
    }

    /// The hex text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Hex {
    fn from(text: &str) -> Self {
        Hex(text.to_string())
    }
}
