//! Configuration types for the phonebook service
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

use crate::directory::DirectoryRules;
use crate::firewall::DEFAULT_ALLOWED_ORIGINS;
use crate::store::file::DEFAULT_MIN_NAME_LEN;

/// Main phonebook configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhonebookConfig {
    /// Listener and origin settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Directory store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Business rules; defaults depend on the store variant when unset
    #[serde(default)]
    pub rules: Option<DirectoryRules>,
}

impl PhonebookConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            rules: None,
        }
    }

    /// Rules in force: the explicit ones, or the store variant's defaults
    pub fn effective_rules(&self) -> DirectoryRules {
        self.rules.unwrap_or_else(|| self.store.default_rules())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.server.validate()?;
        self.store.validate()?;

        Ok(())
    }
}

impl Default for PhonebookConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// TCP port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origins allowed through the origin firewall
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Validate the server configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        for origin in &self.allowed_origins {
            if !origin.starts_with("http://") && !origin.starts_with("https://") {
                return Err(crate::Error::config(format!(
                    "Allowed origin must start with http:// or https://. Got: {}",
                    origin
                )));
            }
            if origin.ends_with('/') {
                return Err(crate::Error::config(format!(
                    "Allowed origin must not end with '/'. Got: {}",
                    origin
                )));
            }
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Directory store configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// In-memory store (not persistent)
    #[default]
    Memory,

    /// File-based document store
    File {
        /// Path to the directory file
        path: String,
        /// Minimum name length enforced by the store schema
        #[serde(default = "default_min_name_len")]
        min_name_len: Option<usize>,
    },
}

impl StoreConfig {
    /// Create a file store configuration with the default schema
    pub fn file(path: impl Into<String>) -> Self {
        StoreConfig::File {
            path: path.into(),
            min_name_len: default_min_name_len(),
        }
    }

    /// Get the store type name
    pub fn type_name(&self) -> &'static str {
        match self {
            StoreConfig::Memory => "memory",
            StoreConfig::File { .. } => "file",
        }
    }

    /// Rules each variant has always applied
    ///
    /// The memory store guards against duplicate names and numbers; the
    /// file store relies on its schema alone.
    pub fn default_rules(&self) -> DirectoryRules {
        match self {
            StoreConfig::Memory => DirectoryRules { unique_fields: true },
            StoreConfig::File { .. } => DirectoryRules {
                unique_fields: false,
            },
        }
    }

    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StoreConfig::Memory => Ok(()),
            StoreConfig::File { path, min_name_len } => {
                if path.is_empty() {
                    return Err(crate::Error::config("File store path cannot be empty"));
                }
                if *min_name_len == Some(0) {
                    return Err(crate::Error::config(
                        "Minimum name length must be > 0 (omit it to disable the check)",
                    ));
                }
                Ok(())
            }
        }
    }
}

fn default_port() -> u16 {
    3002
}

fn default_allowed_origins() -> Vec<String> {
    DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect()
}

fn default_min_name_len() -> Option<usize> {
    Some(DEFAULT_MIN_NAME_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PhonebookConfig::default();
        assert_eq!(config.server.port, 3002);
        assert_eq!(config.server.allowed_origins.len(), 3);
        assert_eq!(config.store, StoreConfig::Memory);
        assert!(config.effective_rules().unique_fields);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_store_defaults() {
        let store: StoreConfig =
            serde_json::from_str(r#"{"type":"file","path":"/tmp/contacts.json"}"#).unwrap();
        assert_eq!(store, StoreConfig::file("/tmp/contacts.json"));
        assert!(!store.default_rules().unique_fields);
    }

    #[test]
    fn test_explicit_rules_override_store_defaults() {
        let mut config = PhonebookConfig::new();
        config.store = StoreConfig::file("contacts.json");
        config.rules = Some(DirectoryRules { unique_fields: true });
        assert!(config.effective_rules().unique_fields);
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = PhonebookConfig::new();
        config.store = StoreConfig::file("");
        assert!(config.validate().is_err());

        let mut config = PhonebookConfig::new();
        config.server.allowed_origins = vec!["localhost:5173".to_string()];
        assert!(config.validate().is_err());
    }
}
