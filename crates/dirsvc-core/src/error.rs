//! Error types for directory-service operations.
//!
//! This module provides the error taxonomy shared by the directory client and
//! the GSSAPI exchange crates, along with a structured response form for
//! callers that need machine-readable errors.

use crate::status::DirStatus;
use serde::Serialize;
use thiserror::Error;

/// Main error type for directory-service operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The directory backend reported a non-recoverable status
    #[error("Directory backend error: status {status} at {location}")]
    Backend {
        /// Raw backend status code
        status: DirStatus,
        /// Source location where the failing call was issued
        location: String,
    },

    /// A required input was missing or malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The security-negotiation layer reported a failure
    #[error("Negotiation failed: {message}")]
    Negotiation {
        /// Major status code from the security layer
        major: u32,
        /// Minor (mechanism) status code from the security layer
        minor: u32,
        /// Concatenated major/minor diagnostic text
        message: String,
    },

    /// Internal invariant violation
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Specialized result type for directory-service operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error response for serialization.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail structure.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorDetail {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Backend status code, when the backend produced one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
}

impl Error {
    /// Builds a backend error from a status code, capturing the caller's
    /// source location.
    #[must_use]
    #[track_caller]
    pub fn backend(status: DirStatus) -> Self {
        let caller = std::panic::Location::caller();
        Self::Backend {
            status,
            location: format!("{}:{}", caller.file(), caller.line()),
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Backend { .. } => "BACKEND_ERROR",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::Negotiation { .. } => "NEGOTIATION_FAILED",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the backend status code when one is attached.
    #[must_use]
    pub const fn backend_status(&self) -> Option<DirStatus> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Converts the error into an `ErrorResponse`.
    #[must_use]
    pub fn into_error_response(self) -> ErrorResponse {
        let status = self.backend_status().map(DirStatus::code);
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                status,
            },
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Backend { .. } | Self::ConfigError(_) | Self::InternalError(_)
        )
    }
}
