//! Configuration for the directory client.

use dirsvc_core::Error;
use crate::Result;

/// Default I/O buffer size for directory operations (32 KiB).
pub const DEFAULT_BUFFER_SIZE: u32 = 32 * 1024;

/// Configuration for a [`DirectoryClient`](crate::DirectoryClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    node_name: String,
    initial_buffer_size: u32,
}

impl DirectoryConfig {
    /// Creates a configuration bound to the given node name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the node name is empty.
    pub fn new(node_name: impl Into<String>) -> Result<Self> {
        let node_name = node_name.into();
        if node_name.is_empty() {
            return Err(Error::ConfigError("node name must not be empty".to_string()));
        }
        Ok(Self {
            node_name,
            initial_buffer_size: DEFAULT_BUFFER_SIZE,
        })
    }

    /// Returns the configured node name.
    #[must_use]
    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    /// Returns the initial I/O buffer size.
    #[must_use]
    pub const fn initial_buffer_size(&self) -> u32 {
        self.initial_buffer_size
    }

    /// Overrides the initial I/O buffer size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the size is zero.
    pub fn with_initial_buffer_size(mut self, size: u32) -> Result<Self> {
        if size == 0 {
            return Err(Error::ConfigError(
                "initial buffer size must be non-zero".to_string(),
            ));
        }
        self.initial_buffer_size = size;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DirectoryConfig::new("/Search").unwrap();
        assert_eq!(config.node_name(), "/Search");
        assert_eq!(config.initial_buffer_size(), 32 * 1024);
    }

    #[test]
    fn builder_overrides() {
        let config = DirectoryConfig::new("/LDAPv3/ldap.example.com")
            .unwrap()
            .with_initial_buffer_size(4096)
            .unwrap();
        assert_eq!(config.initial_buffer_size(), 4096);
    }

    #[test]
    fn rejects_empty_node_name() {
        let err = DirectoryConfig::new("").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn rejects_zero_buffer_size() {
        let err = DirectoryConfig::new("/Search")
            .unwrap()
            .with_initial_buffer_size(0)
            .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
