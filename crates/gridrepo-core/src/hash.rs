//! Content hashing for stored files.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte Blake3 digest of file content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Compute the Blake3 hash of the given data.
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(ContentHash::hash(b"rpm"), ContentHash::hash(b"rpm"));
        assert_ne!(ContentHash::hash(b"rpm"), ContentHash::hash(b"deb"));
    }

    #[test]
    fn test_debug_is_truncated() {
        let debug = format!("{:?}", ContentHash::hash(b""));
        assert!(debug.starts_with("ContentHash("));
        assert_eq!(debug.len(), "ContentHash()".len() + 16);
    }
}
