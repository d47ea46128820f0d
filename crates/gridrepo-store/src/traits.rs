//! FileStore trait: the abstract interface for file persistence.
//!
//! The download, upload and mirroring paths go through this trait so they
//! stay agnostic of the binary store behind it.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use gridrepo_core::{ContentHash, FileAddress};

use crate::error::{Result, StoreError};

/// A stored file with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Where the file lives.
    pub address: FileAddress,
    /// File content.
    pub content: Bytes,
    /// MIME type served with the file.
    pub content_type: String,
    /// Blake3 digest of the content.
    pub hash: ContentHash,
    /// Upload time (Unix ms).
    pub uploaded_at: i64,
}

impl StoredFile {
    /// Wrap content for `address`, deriving content type and hash.
    pub fn new(address: FileAddress, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            content_type: content_type_for(address.filename()).to_string(),
            hash: ContentHash::hash(&content),
            address,
            content,
            uploaded_at: now_millis(),
        }
    }

    pub fn len(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Content type for a filename, by extension.
pub fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, ext)| ext) {
        Some("rpm") => "application/x-rpm",
        Some("xml") => "application/xml",
        Some("gz") => "application/x-gzip",
        Some("bz2") => "application/x-bzip2",
        Some("sqlite") => "application/x-sqlite3",
        _ => "application/octet-stream",
    }
}

/// Result of storing a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutResult {
    /// No file existed at the address.
    Created,
    /// A file with different content was replaced.
    Replaced,
    /// Identical content was already stored (idempotent - not an error).
    Unchanged,
}

/// Async interface for file persistence.
#[async_trait]
pub trait FileStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // File Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a file at its address.
    async fn put_file(&self, file: StoredFile) -> Result<PutResult>;

    /// Fetch a file.
    async fn get_file(&self, address: &FileAddress) -> Result<Option<StoredFile>>;

    /// Check whether a file exists.
    async fn has_file(&self, address: &FileAddress) -> Result<bool>;

    /// Delete a file. Returns whether it existed.
    async fn delete_file(&self, address: &FileAddress) -> Result<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Repository Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Names of all repositories holding at least one file, sorted.
    async fn list_repositories(&self) -> Result<Vec<String>>;

    /// Addresses of every file in a repository, sorted.
    async fn list_files(&self, repository: &str) -> Result<Vec<FileAddress>>;

    /// Move every file of `from` into `to`. Returns the number of files moved.
    ///
    /// Fails with `NotFound` if `from` is empty and `RepositoryExists` if
    /// `to` already holds files.
    async fn rename_repository(&self, from: &str, to: &str) -> Result<usize>;
}

/// Extension trait for common store patterns.
pub trait FileStoreExt: FileStore {
    /// Whether a repository holds any file.
    fn repository_exists(
        &self,
        repository: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Move a file to another address, replacing whatever was there.
    fn move_file(
        &self,
        from: &FileAddress,
        to: &FileAddress,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

impl<S: FileStore + ?Sized> FileStoreExt for S {
    async fn repository_exists(&self, repository: &str) -> Result<bool> {
        Ok(!self.list_files(repository).await?.is_empty())
    }

    async fn move_file(&self, from: &FileAddress, to: &FileAddress) -> Result<()> {
        let mut file = self
            .get_file(from)
            .await?
            .ok_or_else(|| StoreError::NotFound(from.canonical_path()))?;

        file.address = to.clone();
        file.content_type = content_type_for(to.filename()).to_string();
        self.put_file(file).await?;
        self.delete_file(from).await?;
        Ok(())
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
