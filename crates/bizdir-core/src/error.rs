//! Core error types for bizdir-core.
//!
//! Uses `thiserror` for matchable variants covering the ways a mutation can
//! be rejected before anything touches storage.

use crate::id::BusinessId;
use thiserror::Error;

/// Errors produced by the record mutator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No record with the referenced id exists in the collection.
    #[error("business not found: {id}")]
    NotFound { id: BusinessId },

    /// The submitted payload is missing required fields.
    #[error("invalid business data: {reason}")]
    Validation { reason: String },

    /// The largest id in the collection leaves no room for another.
    #[error("no business id left after {max}")]
    IdSpaceExhausted { max: BusinessId },
}
