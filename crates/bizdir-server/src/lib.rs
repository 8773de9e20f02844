//! HTTP/JSON API for the business directory.
//!
//! Serves the directory document over `/businesses` and guards every
//! mutation with the admin gate and a single compare-and-swap attempt
//! against the document store. This crate contains the server framework,
//! API schema types, error handling, configuration and route definitions.

pub mod auth;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
