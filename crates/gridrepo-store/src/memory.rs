//! In-memory implementation of the FileStore trait.
//!
//! Same semantics as a persistent backend but keeps everything in memory.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use gridrepo_core::FileAddress;

use crate::error::{Result, StoreError};
use crate::traits::{FileStore, PutResult, StoredFile};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RwLock<BTreeMap<FileAddress, StoredFile>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn put_file(&self, file: StoredFile) -> Result<PutResult> {
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);

        let result = match files.get(&file.address) {
            Some(existing) if existing.hash == file.hash => return Ok(PutResult::Unchanged),
            Some(_) => PutResult::Replaced,
            None => PutResult::Created,
        };
        files.insert(file.address.clone(), file);
        Ok(result)
    }

    async fn get_file(&self, address: &FileAddress) -> Result<Option<StoredFile>> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        Ok(files.get(address).cloned())
    }

    async fn has_file(&self, address: &FileAddress) -> Result<bool> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        Ok(files.contains_key(address))
    }

    async fn delete_file(&self, address: &FileAddress) -> Result<bool> {
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        Ok(files.remove(address).is_some())
    }

    async fn list_repositories(&self) -> Result<Vec<String>> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        let repos: BTreeSet<&str> = files.keys().map(FileAddress::repository).collect();
        Ok(repos.into_iter().map(str::to_owned).collect())
    }

    async fn list_files(&self, repository: &str) -> Result<Vec<FileAddress>> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        Ok(files
            .keys()
            .filter(|address| address.repository() == repository)
            .cloned()
            .collect())
    }

    async fn rename_repository(&self, from: &str, to: &str) -> Result<usize> {
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);

        if files.keys().any(|address| address.repository() == to) {
            return Err(StoreError::RepositoryExists(to.to_owned()));
        }

        let moving: Vec<FileAddress> = files
            .keys()
            .filter(|address| address.repository() == from)
            .cloned()
            .collect();
        if moving.is_empty() {
            return Err(StoreError::NotFound(from.to_owned()));
        }

        // Validate the new name before touching anything.
        let mut candidate = moving[0].clone();
        candidate.set_repository(to)?;

        for address in &moving {
            if let Some(mut file) = files.remove(address) {
                file.address.set_repository(to)?;
                files.insert(file.address.clone(), file);
            }
        }

        tracing::info!(from, to, files = moving.len(), "repository renamed");
        Ok(moving.len())
    }
}
