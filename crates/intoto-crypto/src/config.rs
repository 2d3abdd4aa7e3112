//! Key loading configuration

use intoto_types::{KeyIdHashAlgorithm, Scheme};
use serde::{Deserialize, Serialize};

/// Options applied when loading a key from PEM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Scheme to assign; `None` picks the default for the decoded key
    pub scheme: Option<Scheme>,
    /// Digest names the key id may be referenced by
    pub key_id_hash_algorithms: Vec<KeyIdHashAlgorithm>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            scheme: None,
            key_id_hash_algorithms: vec![KeyIdHashAlgorithm::Sha256, KeyIdHashAlgorithm::Sha512],
        }
    }
}

impl LoadConfig {
    /// Use `scheme` instead of the family default
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    /// Record these algorithms on loaded keys
    pub fn with_key_id_hash_algorithms(mut self, algorithms: Vec<KeyIdHashAlgorithm>) -> Self {
        self.key_id_hash_algorithms = algorithms;
        self
    }
}
