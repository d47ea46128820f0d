//! Replication batch messages.
//!
//! Batches travel to mirrors CBOR-encoded.

use serde::{Deserialize, Serialize};

use gridrepo_store::StoredFile;

use crate::error::{Result, SyncError};

/// A bounded group of files from one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationBatch {
    /// Repository the files belong to.
    pub repository: String,
    /// Position of this batch within the repository's transfer.
    pub sequence: u32,
    /// Files in this batch.
    pub files: Vec<StoredFile>,
    /// Whether this is the repository's final batch.
    pub last: bool,
}

/// Mirror acknowledgement of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAck {
    pub repository: String,
    pub sequence: u32,
    /// Number of files the mirror stored.
    pub accepted: usize,
}

impl ReplicationBatch {
    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| SyncError::EncodingError(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e| SyncError::EncodingError(e.to_string()))
    }

    /// Total payload size in bytes.
    pub fn payload_len(&self) -> u64 {
        self.files.iter().map(StoredFile::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridrepo_core::FileAddress;

    #[test]
    fn test_batch_survives_wire_encoding() {
        let file = StoredFile::new(
            FileAddress::parse("base/noarch/tool.rpm").unwrap(),
            &b"payload"[..],
        );
        let batch = ReplicationBatch {
            repository: "base".into(),
            sequence: 3,
            files: vec![file],
            last: true,
        };

        let bytes = batch.to_bytes().unwrap();
        let decoded = ReplicationBatch::from_bytes(&bytes).unwrap();

        assert_eq!(decoded, batch);
        assert_eq!(decoded.payload_len(), 7);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            ReplicationBatch::from_bytes(&[0xff, 0x00, 0x13]),
            Err(SyncError::EncodingError(_))
        ));
    }
}
