// # Memory Directory Store
//
// Volatile implementation of DirectoryStore.
//
// ## Purpose
//
// Provides a simple, fast store that doesn't persist across restarts.
// Records keep their insertion order.
//
// ## Crash Behavior
//
// - All records are lost on restart/crash
// - Identifiers restart from 1 in a new process
//
// ## When to Use
//
// - Testing environments
// - Demo deployments where an empty directory on start is fine

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::config::StoreConfig;
use crate::store::ids::SequentialIds;
use crate::traits::{
    Contact, ContactDraft, ContactId, DirectoryStore, DirectoryStoreFactory, IdAllocator,
};

/// In-memory directory store implementation
///
/// This implementation keeps all records in a `Vec` protected by a RwLock.
/// It provides no persistence across restarts.
///
/// # Example
///
/// ```rust,ignore
/// use phonebook_core::store::MemoryDirectoryStore;
/// use phonebook_core::traits::DirectoryStore;
///
/// let store = MemoryDirectoryStore::new();
/// let contact = store.create(draft).await?;
/// assert_eq!(store.get(&contact.id).await?, Some(contact));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryDirectoryStore {
    inner: Arc<RwLock<Vec<Contact>>>,
    ids: Arc<SequentialIds>,
}

impl MemoryDirectoryStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Vec::new())),
            ids: Arc::new(SequentialIds::new()),
        }
    }

    /// Get the number of records in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

impl Default for MemoryDirectoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryStore for MemoryDirectoryStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    fn parse_id(&self, raw: &str) -> Result<ContactId, Error> {
        // Any text is a well-formed key here; unknown keys are simply absent
        Ok(ContactId::new(raw))
    }

    async fn create(&self, draft: ContactDraft) -> Result<Contact, Error> {
        let contact = Contact::from_draft(self.ids.next_id(), draft);
        let mut guard = self.inner.write().await;
        guard.push(contact.clone());
        Ok(contact)
    }

    async fn list(&self) -> Result<Vec<Contact>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.clone())
    }

    async fn get(&self, id: &ContactId) -> Result<Option<Contact>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.iter().find(|c| &c.id == id).cloned())
    }

    async fn update(&self, id: &ContactId, draft: ContactDraft) -> Result<Option<Contact>, Error> {
        let mut guard = self.inner.write().await;
        Ok(guard.iter_mut().find(|c| &c.id == id).map(|contact| {
            contact.apply(draft);
            contact.clone()
        }))
    }

    async fn delete(&self, id: &ContactId) -> Result<bool, Error> {
        let mut guard = self.inner.write().await;
        let before = guard.len();
        guard.retain(|c| &c.id != id);
        Ok(guard.len() != before)
    }

    async fn count(&self) -> Result<usize, Error> {
        Ok(self.inner.read().await.len())
    }

    async fn flush(&self) -> Result<(), Error> {
        // No-op for memory store
        Ok(())
    }
}

/// Factory for [`MemoryDirectoryStore`]
pub struct MemoryDirectoryStoreFactory;

#[async_trait]
impl DirectoryStoreFactory for MemoryDirectoryStoreFactory {
    async fn create(&self, config: &StoreConfig) -> Result<Box<dyn DirectoryStore>, Error> {
        match config {
            StoreConfig::Memory => Ok(Box::new(MemoryDirectoryStore::new())),
            other => Err(Error::config(format!(
                "Memory store factory cannot build a '{}' store",
                other.type_name()
            ))),
        }
    }
}
