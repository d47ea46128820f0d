//! Mirror target abstraction.
//!
//! A target receives replication batches. Implementations may push over
//! HTTP, write to another store, or anything else.

use async_trait::async_trait;

use crate::batch::{BatchAck, ReplicationBatch};
use crate::error::Result;

/// Downstream server receiving replicated repositories.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait MirrorTarget: Send + Sync {
    /// Human readable name of the mirror, for logs and reports.
    fn name(&self) -> &str;

    /// Deliver one batch and wait for its acknowledgement.
    async fn send_batch(&self, batch: ReplicationBatch) -> Result<BatchAck>;
}

/// A simple in-memory mirror for testing.
///
/// Every batch goes through CBOR encoding so the wire format is exercised.
pub mod memory {
    use super::*;
    use std::time::Duration;

    use gridrepo_core::FileAddress;
    use tokio::sync::RwLock;

    /// In-memory mirror implementation.
    #[derive(Default)]
    pub struct MemoryMirror {
        name: String,
        received: RwLock<Vec<ReplicationBatch>>,
        delay: Option<Duration>,
    }

    impl MemoryMirror {
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                ..Self::default()
            }
        }

        /// Delay every acknowledgement.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Batches received so far, in arrival order.
        pub async fn batches(&self) -> Vec<ReplicationBatch> {
            self.received.read().await.clone()
        }

        /// Addresses of every file received.
        pub async fn received_files(&self) -> Vec<FileAddress> {
            self.received
                .read()
                .await
                .iter()
                .flat_map(|batch| batch.files.iter().map(|file| file.address.clone()))
                .collect()
        }

        /// Repositories that reached the mirror.
        pub async fn repositories(&self) -> Vec<String> {
            let mut repos: Vec<String> = self
                .received
                .read()
                .await
                .iter()
                .map(|batch| batch.repository.clone())
                .collect();
            repos.dedup();
            repos
        }
    }

    #[async_trait]
    impl MirrorTarget for MemoryMirror {
        fn name(&self) -> &str {
            &self.name
        }

        async fn send_batch(&self, batch: ReplicationBatch) -> Result<BatchAck> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let decoded = ReplicationBatch::from_bytes(&batch.to_bytes()?)?;
            let ack = BatchAck {
                repository: decoded.repository.clone(),
                sequence: decoded.sequence,
                accepted: decoded.files.len(),
            };
            self.received.write().await.push(decoded);
            Ok(ack)
        }
    }
}
