//! Mirror session.
//!
//! Replicates repositories from a local store to one mirror, skipping every
//! repository the access policy refuses to propagate.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use gridrepo_perms::AccessPolicy;
use gridrepo_store::FileStore;

use crate::batch::{BatchAck, ReplicationBatch};
use crate::error::{Result, SyncError};
use crate::target::MirrorTarget;

/// Result of a mirror session.
#[derive(Debug, Default)]
pub struct MirrorReport {
    /// Repositories fully sent to the mirror.
    pub replicated: BTreeSet<String>,
    /// Repositories withheld because they are protected.
    pub skipped: BTreeSet<String>,
    /// Number of files sent.
    pub files_sent: usize,
    /// Number of batches sent.
    pub batches_sent: usize,
    /// Files listed but gone by the time they were read.
    pub files_vanished: usize,
}

/// Configuration for mirroring behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Maximum files per batch.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Timeout for a batch acknowledgement, in milliseconds.
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
}

fn default_max_batch_size() -> usize {
    50
}

fn default_send_timeout_ms() -> u64 {
    30_000
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
            send_timeout_ms: default_send_timeout_ms(),
        }
    }
}

impl MirrorConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_batch_size == 0 {
            return Err("max_batch_size must be greater than 0".to_string());
        }
        if self.send_timeout_ms == 0 {
            return Err("send_timeout_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Replication of local repositories to a single mirror.
pub struct MirrorSession<'a, S: FileStore + ?Sized, T: MirrorTarget + ?Sized> {
    store: &'a S,
    target: &'a T,
    policy: Arc<AccessPolicy>,
    config: MirrorConfig,
    /// Repositories to mirror (empty = all).
    repositories: Vec<String>,
}

impl<'a, S: FileStore + ?Sized, T: MirrorTarget + ?Sized> MirrorSession<'a, S, T> {
    /// Create a new mirror session.
    pub fn new(store: &'a S, target: &'a T, policy: Arc<AccessPolicy>, config: MirrorConfig) -> Self {
        Self {
            store,
            target,
            policy,
            config,
            repositories: Vec::new(),
        }
    }

    /// Restrict the session to these repositories (empty = all).
    pub fn with_repositories(mut self, repositories: Vec<String>) -> Self {
        self.repositories = repositories;
        self
    }

    /// Replicate every eligible repository.
    pub async fn run(&self) -> Result<MirrorReport> {
        let mut report = MirrorReport::default();

        let repositories = if self.repositories.is_empty() {
            self.store.list_repositories().await?
        } else {
            self.repositories.clone()
        };

        for repository in repositories {
            if self.replicate_repository(&repository, &mut report).await? {
                report.replicated.insert(repository);
            } else {
                report.skipped.insert(repository);
            }
        }

        tracing::info!(
            mirror = self.target.name(),
            replicated = report.replicated.len(),
            skipped = report.skipped.len(),
            files = report.files_sent,
            "mirror session finished"
        );
        Ok(report)
    }

    /// Send one repository. Returns false when the policy withholds it.
    ///
    /// The propagation check is repeated before each batch, so a repository
    /// protected mid-session stops leaving the server at the next batch.
    async fn replicate_repository(&self, repository: &str, report: &mut MirrorReport) -> Result<bool> {
        let addresses = self.store.list_files(repository).await?;
        let chunks: Vec<_> = addresses.chunks(self.config.max_batch_size.max(1)).collect();
        let last_index = chunks.len().saturating_sub(1);

        for (index, chunk) in chunks.into_iter().enumerate() {
            if !self.policy.is_allowed_propagation_repo(repository) {
                tracing::warn!(repo = repository, mirror = self.target.name(), "protected repository withheld from mirror");
                return Ok(false);
            }

            let mut files = Vec::with_capacity(chunk.len());
            for address in chunk {
                match self.store.get_file(address).await? {
                    Some(file) => files.push(file),
                    None => report.files_vanished += 1,
                }
            }

            let batch = ReplicationBatch {
                repository: repository.to_owned(),
                sequence: index as u32,
                files,
                last: index == last_index,
            };
            let sent = batch.files.len();
            let ack = self.send(batch).await?;
            tracing::debug!(repo = repository, sequence = ack.sequence, accepted = ack.accepted, "batch acknowledged");

            report.files_sent += sent;
            report.batches_sent += 1;
        }

        // An empty repository still has to pass the gate to count as replicated.
        Ok(self.policy.is_allowed_propagation_repo(repository))
    }

    async fn send(&self, batch: ReplicationBatch) -> Result<BatchAck> {
        let timeout = self.config.send_timeout();
        let repository = batch.repository.clone();
        let sequence = batch.sequence;

        tokio::time::timeout(timeout, self.target.send_batch(batch))
            .await
            .map_err(|_| {
                SyncError::Timeout(format!(
                    "mirror {} did not acknowledge {repository} batch {sequence}",
                    self.target.name()
                ))
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::memory::MemoryMirror;
    use async_trait::async_trait;
    use gridrepo_core::FileAddress;
    use gridrepo_perms::IpRange;
    use gridrepo_store::{MemoryStore, StoredFile};

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        for path in [
            "public/noarch/a.rpm",
            "public/noarch/b.rpm",
            "public/noarch/c.rpm",
            "public/repodata/repomd.xml",
            "secure/noarch/host01-config.rpm",
            "secure/repodata/repomd.xml",
        ] {
            let file = StoredFile::new(FileAddress::parse(path).unwrap(), path.as_bytes().to_vec());
            store.put_file(file).await.unwrap();
        }
        store
    }

    fn policy(protected: &[&str]) -> Arc<AccessPolicy> {
        Arc::new(AccessPolicy::new(protected.iter().copied(), Vec::<IpRange>::new()))
    }

    #[tokio::test]
    async fn test_protected_repositories_are_not_mirrored() {
        let store = seeded_store().await;
        let mirror = MemoryMirror::new("downstream");

        let report = MirrorSession::new(&store, &mirror, policy(&["secure"]), MirrorConfig::default())
            .run()
            .await
            .unwrap();

        assert_eq!(report.replicated, BTreeSet::from(["public".to_string()]));
        assert_eq!(report.skipped, BTreeSet::from(["secure".to_string()]));
        assert_eq!(report.files_sent, 4);
        assert!(mirror
            .received_files()
            .await
            .iter()
            .all(|address| address.repository() == "public"));
    }

    #[tokio::test]
    async fn test_batches_are_bounded() {
        let store = seeded_store().await;
        let mirror = MemoryMirror::new("downstream");
        let config = MirrorConfig {
            max_batch_size: 3,
            ..MirrorConfig::default()
        };

        let report = MirrorSession::new(&store, &mirror, policy(&[]), config)
            .with_repositories(vec!["public".into()])
            .run()
            .await
            .unwrap();

        let batches = mirror.batches().await;
        assert_eq!(report.batches_sent, 2);
        assert_eq!(batches[0].files.len(), 3);
        assert!(!batches[0].last);
        assert_eq!(batches[1].files.len(), 1);
        assert!(batches[1].last);
        assert_eq!(batches[1].sequence, 1);
    }

    #[tokio::test]
    async fn test_newly_protected_repository_is_withheld() {
        let store = seeded_store().await;
        let mirror = MemoryMirror::new("downstream");
        let policy = policy(&[]);

        policy.add_protected_repo("public");
        let report = MirrorSession::new(&store, &mirror, Arc::clone(&policy), MirrorConfig::default())
            .run()
            .await
            .unwrap();

        assert!(report.skipped.contains("public"));
        assert_eq!(mirror.repositories().await, vec!["secure".to_string()]);
    }

    /// Protects each repository as soon as its first batch arrives.
    struct ProtectingMirror {
        inner: MemoryMirror,
        policy: Arc<AccessPolicy>,
    }

    #[async_trait]
    impl MirrorTarget for ProtectingMirror {
        fn name(&self) -> &str {
            self.inner.name()
        }

        async fn send_batch(&self, batch: ReplicationBatch) -> Result<BatchAck> {
            self.policy.add_protected_repo(&batch.repository);
            self.inner.send_batch(batch).await
        }
    }

    #[tokio::test]
    async fn test_protection_during_transfer_stops_next_batch() {
        let store = seeded_store().await;
        let policy = policy(&[]);
        let mirror = ProtectingMirror {
            inner: MemoryMirror::new("downstream"),
            policy: Arc::clone(&policy),
        };
        let config = MirrorConfig {
            max_batch_size: 2,
            ..MirrorConfig::default()
        };

        let report = MirrorSession::new(&store, &mirror, policy, config)
            .with_repositories(vec!["public".into()])
            .run()
            .await
            .unwrap();

        let batches = mirror.inner.batches().await;
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].sequence, 0);
        assert!(!batches[0].last);
        assert_eq!(report.batches_sent, 1);
        assert_eq!(report.files_sent, 2);
        assert!(report.skipped.contains("public"));
        assert!(report.replicated.is_empty());
    }

    #[tokio::test]
    async fn test_explicit_empty_repository() {
        let store = seeded_store().await;
        let mirror = MemoryMirror::new("downstream");

        let report = MirrorSession::new(&store, &mirror, policy(&["secure"]), MirrorConfig::default())
            .with_repositories(vec!["empty".into(), "secure".into()])
            .run()
            .await
            .unwrap();

        assert!(report.replicated.contains("empty"));
        assert!(report.skipped.contains("secure"));
        assert_eq!(report.batches_sent, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_mirror_times_out() {
        let store = seeded_store().await;
        let mirror = MemoryMirror::new("slow").with_delay(Duration::from_secs(60));
        let config = MirrorConfig {
            send_timeout_ms: 500,
            ..MirrorConfig::default()
        };

        let err = MirrorSession::new(&store, &mirror, policy(&["secure"]), config)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::Timeout(_)));
    }

    #[test]
    fn test_config_validation() {
        assert!(MirrorConfig::default().validate().is_ok());
        assert!(MirrorConfig {
            max_batch_size: 0,
            ..MirrorConfig::default()
        }
        .validate()
        .is_err());
    }
}
