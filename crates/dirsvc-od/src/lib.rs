//! Directory-service client for a handle-based identity backend.
//!
//! This crate provides a stateful client that issues paginated attribute
//! queries and drives native authentication against a pluggable directory
//! backend. The backend speaks an opaque handle protocol (service, node and
//! I/O buffer handles); this crate owns the lifecycle of those handles and
//! guarantees ordered acquisition and ordered, idempotent release on every
//! exit path.

#![deny(missing_docs)]

pub mod attrs;
pub mod backend;
mod auth;
mod client;
mod config;
mod query;
mod record;
mod session;

pub use client::DirectoryClient;
pub use config::{DirectoryConfig, DEFAULT_BUFFER_SIZE};
pub use record::{AttrValue, MatchType, QueryResult, RecordEntry};

/// Convenient result alias that reuses the core error type.
pub type Result<T> = dirsvc_core::Result<T>;
