//! Plugin-based store registry
//!
//! The registry allows directory store variants to be registered
//! dynamically at runtime, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use phonebook_core::{StoreConfig, StoreRegistry};
//!
//! let registry = StoreRegistry::with_builtin();
//! let store = registry.create_store(&StoreConfig::file("contacts.json")).await?;
//! ```

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::store::{FileDirectoryStoreFactory, MemoryDirectoryStoreFactory};
use crate::traits::{DirectoryStore, DirectoryStoreFactory};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Store registry for plugin-based directory store creation
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct StoreRegistry {
    /// Registered directory store factories
    stores: RwLock<HashMap<String, Arc<dyn DirectoryStoreFactory>>>,
}

impl StoreRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the "memory" and "file" stores registered
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register_store("memory", Box::new(MemoryDirectoryStoreFactory));
        registry.register_store("file", Box::new(FileDirectoryStoreFactory));
        registry
    }

    /// Register a directory store factory
    ///
    /// # Parameters
    ///
    /// - `name`: Store type name (e.g., "file", "memory")
    /// - `factory`: Factory object for creating store instances
    pub fn register_store(&self, name: impl Into<String>, factory: Box<dyn DirectoryStoreFactory>) {
        let name = name.into();
        let mut stores = self.stores.write().unwrap_or_else(|e| e.into_inner());
        stores.insert(name, Arc::from(factory));
    }

    /// Create a directory store from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DirectoryStore>)`: Created store instance
    /// - `Err(Error)`: If store type is not registered or creation fails
    pub async fn create_store(&self, config: &StoreConfig) -> Result<Box<dyn DirectoryStore>> {
        let store_type = config.type_name();

        let factory = {
            let stores = self.stores.read().unwrap_or_else(|e| e.into_inner());
            stores
                .get(store_type)
                .ok_or_else(|| Error::config(format!("Unknown store type: {}", store_type)))?
                .clone()
        };

        // Lock released before the async create
        factory.create(config).await
    }

    /// List all registered store types
    pub fn list_stores(&self) -> Vec<String> {
        let stores = self.stores.read().unwrap_or_else(|e| e.into_inner());
        stores.keys().cloned().collect()
    }

    /// Check if a store type is registered
    pub fn has_store(&self, name: &str) -> bool {
        let stores = self.stores.read().unwrap_or_else(|e| e.into_inner());
        stores.contains_key(name)
    }
}
