//! Status codes reported by the directory backend.

use serde::Serialize;
use std::fmt;

/// Raw status code returned by a directory backend call.
///
/// The backend protocol reports success and failure through signed integer
/// codes. Only a handful of codes change control flow in this client; every
/// other value is carried through untouched so callers can inspect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DirStatus(pub i32);

impl DirStatus {
    /// The call completed successfully.
    pub const NO_ERR: Self = Self(0);
    /// The backend service could not be opened.
    pub const OPEN_FAILED: Self = Self(-14000);
    /// The named node does not exist.
    pub const NODE_NOT_FOUND: Self = Self(-14008);
    /// The supplied I/O buffer cannot hold the reply; retry with a larger one.
    pub const BUFFER_TOO_SMALL: Self = Self(-14069);
    /// Buffer allocation failed.
    pub const NULL_DATA_BUFFER: Self = Self(-14081);
    /// The credentials were rejected.
    pub const AUTH_FAILED: Self = Self(-14090);
    /// The requested record does not exist.
    pub const RECORD_NOT_FOUND: Self = Self(-14136);

    /// Returns the raw status code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Returns true if the status reports success.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }

    /// Returns a symbolic name for codes this client interprets.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self {
            Self::NO_ERR => Some("no-error"),
            Self::OPEN_FAILED => Some("open-failed"),
            Self::NODE_NOT_FOUND => Some("node-not-found"),
            Self::BUFFER_TOO_SMALL => Some("buffer-too-small"),
            Self::NULL_DATA_BUFFER => Some("null-data-buffer"),
            Self::AUTH_FAILED => Some("auth-failed"),
            Self::RECORD_NOT_FOUND => Some("record-not-found"),
            _ => None,
        }
    }
}

impl fmt::Display for DirStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({name})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<i32> for DirStatus {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_detection() {
        assert!(DirStatus::NO_ERR.is_ok());
        assert!(!DirStatus::BUFFER_TOO_SMALL.is_ok());
        assert!(!DirStatus(-1).is_ok());
    }

    #[test]
    fn display_names_known_codes() {
        assert_eq!(
            DirStatus::BUFFER_TOO_SMALL.to_string(),
            "-14069 (buffer-too-small)"
        );
        assert_eq!(DirStatus(-99).to_string(), "-99");
    }

    #[test]
    fn round_trips_raw_codes() {
        let status = DirStatus::from(-14136);
        assert_eq!(status, DirStatus::RECORD_NOT_FOUND);
        assert_eq!(status.code(), -14136);
    }
}
