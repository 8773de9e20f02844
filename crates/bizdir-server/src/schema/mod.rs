//! API schema types for request/response definitions.
//!
//! Each sub-module defines the request and response types for one route.
//! Field names are camelCase on the wire.

pub mod businesses;
pub mod status;
