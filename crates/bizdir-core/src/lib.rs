//! Data model and pure mutation logic for the business directory.
//!
//! The whole directory is one [`BusinessCollection`] persisted as a single
//! JSON document. This crate knows nothing about where that document lives;
//! it only computes the next collection state for a [`Mutation`].
//!
//! # Modules
//!
//! - [`id`]: BusinessId newtype
//! - [`record`]: BusinessRecord, BusinessFields, RecordStatus
//! - [`collection`]: BusinessCollection, the persisted document shape
//! - [`mutate`]: create/update/delete over a collection
//! - [`error`]: CoreError

pub mod collection;
pub mod error;
pub mod id;
pub mod mutate;
pub mod record;

// Re-export commonly used types
pub use collection::BusinessCollection;
pub use error::CoreError;
pub use id::BusinessId;
pub use mutate::{Mutation, MutationOutcome};
pub use record::{BusinessFields, BusinessRecord, RecordStatus};
