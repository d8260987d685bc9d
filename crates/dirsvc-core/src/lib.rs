//! # dirsvc-core
//!
//! Core types shared by the directory-service client crates.
//!
//! This crate provides the error taxonomy used across the workspace and the
//! raw status-code type spoken by the handle-based directory backend.
//!
//! ## Modules
//!
//! - [`error`] - Error types and structured error responses
//! - [`status`] - Backend status codes

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod status;

// Re-export commonly used types
pub use error::{Error, Result};
pub use status::DirStatus;
