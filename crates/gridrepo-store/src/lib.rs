//! # gridrepo Store
//!
//! Storage abstraction for repository files. Every file is keyed by its
//! [`FileAddress`](gridrepo_core::FileAddress).
//!
//! ## Overview
//!
//! The durable binary store lives outside this workspace; components talk
//! to it through the [`FileStore`] trait. [`MemoryStore`] implements the
//! same semantics in memory for tests and local tooling.
//!
//! ## Key Types
//!
//! - [`FileStore`] - The async trait for all storage operations
//! - [`StoredFile`] - File content plus content type, length and hash
//! - [`PutResult`] - Result of storing a file
//!
//! ## Design Notes
//!
//! - **Idempotent puts**: Storing identical content again returns `Unchanged`
//! - **Repository rename**: Rewrites the repository segment of every address
//!   in place; the target repository must be empty

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use traits::{content_type_for, FileStore, FileStoreExt, PutResult, StoredFile};
