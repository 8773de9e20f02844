//! HTTP handler modules for the directory API.
//!
//! Handlers parse the request, delegate to [`DirectoryService`], and wrap
//! the result in a response type. No business logic lives here.
//!
//! [`DirectoryService`]: crate::service::DirectoryService

pub mod businesses;
pub mod status;
