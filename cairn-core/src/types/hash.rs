/// SHA-256 hash type used throughout Cairn for variant content addressing
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content fingerprint of a variant's identity fields
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct VariantHash(#[serde(with = "serde_bytes")] pub [u8; 32]);

impl VariantHash {
    /// Compute a SHA-256 hash from raw data
    pub fn compute(data: &[u8]) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(data);
        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        Self(hash)
    }

    /// Create from hex string
    pub fn from_hex(hex: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(hex)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes);
        Ok(Self(hash))
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Truncate to the first N hex characters for display
    pub fn truncated(&self, len: usize) -> String {
        let hex = self.to_hex();
        if hex.len() <= len {
            hex
        } else {
            format!("{}...", &hex[..len])
        }
    }
}

impl fmt::Display for VariantHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.truncated(8))
    }
}

impl AsRef<[u8]> for VariantHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for VariantHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let a = VariantHash::compute(b"GCA_000002305.1_9796_NW_001868106.1_124459_SNV");
        let b = VariantHash::compute(b"GCA_000002305.1_9796_NW_001868106.1_124459_SNV");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_content_changes_hash() {
        let a = VariantHash::compute(b"GCA_000002305.1_9796_NW_001868106.1_124459_SNV");
        let b = VariantHash::compute(b"GCA_000002305.1_9796_NW_001868106.1_124460_SNV");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hex_roundtrip() {
        let hash = VariantHash::compute(b"some variant summary");
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(VariantHash::from_hex(&hex).unwrap(), hash);
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        assert!(VariantHash::from_hex("abcd").is_err());
    }
}
