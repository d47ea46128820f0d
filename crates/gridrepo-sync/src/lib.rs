//! # gridrepo Sync
//!
//! Replication of repositories to downstream mirrors, and propagation of
//! single packages between repositories.
//!
//! ## Overview
//!
//! A [`MirrorSession`] walks the repositories of a
//! [`FileStore`](gridrepo_store::FileStore) and ships their files to a
//! [`MirrorTarget`] in bounded [`ReplicationBatch`]es. Before every batch
//! the session asks the shared
//! [`AccessPolicy`](gridrepo_perms::AccessPolicy) whether the repository may
//! be propagated; protected repositories never leave this server, because
//! mirrors do not enforce the same access rules.
//!
//! ## Message Flow
//!
//! ```text
//! Server                              Mirror
//!   |-------- Batch(repo, seq 0) ----->|
//!   |<------- Ack ---------------------|
//!   |-------- Batch(repo, seq 1, last)>|
//!   |<------- Ack ---------------------|
//! ```

pub mod batch;
pub mod error;
pub mod propagation;
pub mod session;
pub mod target;

pub use batch::{BatchAck, ReplicationBatch};
pub use error::{Result, SyncError};
pub use propagation::{propagate_package, propagate_repository};
pub use session::{MirrorConfig, MirrorReport, MirrorSession};
pub use target::{memory::MemoryMirror, MirrorTarget};
