//! Versioned single-document storage for the business directory.
//!
//! Provides the [`DocumentStore`] trait, the contract every backend
//! implements, plus the [`GitHubContentStore`] and [`InMemoryStore`] backends.
//!
//! # Architecture
//!
//! The whole directory is one document. A read returns the decoded
//! collection together with a [`VersionToken`] naming the exact bytes that
//! were read; a write must present that token and fails with
//! [`StorageError::VersionConflict`] if anyone committed in between. That
//! compare-and-swap rule is the only concurrency control in the system.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`token`]: VersionToken
//! - [`codec`]: base64/JSON document encoding shared by all backends
//! - [`traits`]: DocumentStore trait and the snapshot/receipt types
//! - [`github`]: GitHub contents API backend
//! - [`memory`]: InMemoryStore implementation

pub mod codec;
pub mod error;
pub mod github;
pub mod memory;
pub mod token;
pub mod traits;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use github::{GitHubContentStore, RemoteConfig};
pub use memory::InMemoryStore;
pub use token::VersionToken;
pub use traits::{DocumentStore, RemoteStatus, RepositoryInfo, Snapshot, WriteReceipt};
