// # Directory Store Trait
//
// Defines the interface for contact record storage.
//
// ## Purpose
//
// The directory store exclusively owns the contact records. It offers
// create, point lookup, full scan, update and delete by identifier,
// each of which either succeeds or fails. It does not validate caller
// input; that is done by [`crate::Directory`] before the store is reached.
//
// ## Implementations
//
// - Memory: volatile, insertion-ordered
// - File: durable JSON document file with crash recovery
//
// ## Usage
//
// ```rust,ignore
// use phonebook_core::{DirectoryStore, MemoryDirectoryStore};
//
// let store = MemoryDirectoryStore::new();
// let contact = store.create(draft).await?;
// let found = store.get(&contact.id).await?;
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, store-assigned identifier of a contact record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    /// Wrap an identifier produced by an allocator or parsed by a store
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the textual form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A name/number pair that already passed the Format Validator
///
/// Both fields are trimmed and non-empty, and `number` only holds
/// digits and hyphens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub(crate) name: String,
    pub(crate) number: String,
}

impl ContactDraft {
    /// Create a draft
    ///
    /// # Visibility
    ///
    /// This is `pub(crate)` so drafts can only come out of
    /// [`crate::rules::validate_format`].
    pub(crate) fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> &str {
        &self.number
    }
}

/// A stored contact record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Identifier, fixed for the lifetime of the record
    pub id: ContactId,
    /// Display name
    pub name: String,
    /// Phone number (digits and hyphens)
    pub number: String,
}

impl Contact {
    pub(crate) fn from_draft(id: ContactId, draft: ContactDraft) -> Self {
        Self {
            id,
            name: draft.name,
            number: draft.number,
        }
    }

    /// Replace name and number, keeping the identifier
    pub(crate) fn apply(&mut self, draft: ContactDraft) {
        self.name = draft.name;
        self.number = draft.number;
    }
}

/// Trait for directory store implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Failure Modes
///
/// - [`crate::Error::MalformedId`]: identifier has the wrong shape (from `parse_id`)
/// - [`crate::Error::Constraint`]: a storage-level rule rejected the write
/// - [`crate::Error::Store`] / [`crate::Error::Io`]: storage fault
///
/// "Not found" is reported in-band (`None` / `false`); turning it into
/// an error is up to the caller.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Short name of the variant ("memory", "file")
    fn kind(&self) -> &'static str;

    /// Check a caller-supplied identifier against the store's expected shape
    ///
    /// This never touches stored data, so a malformed identifier is
    /// rejected without a lookup.
    fn parse_id(&self, raw: &str) -> Result<ContactId, crate::Error>;

    /// Persist a new record and return it with its fresh identifier
    async fn create(&self, draft: ContactDraft) -> Result<Contact, crate::Error>;

    /// All live records
    async fn list(&self) -> Result<Vec<Contact>, crate::Error>;

    /// Point lookup
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Contact))`: The record
    /// - `Ok(None)`: No record found
    /// - `Err(Error)`: Storage error
    async fn get(&self, id: &ContactId) -> Result<Option<Contact>, crate::Error>;

    /// Replace name and number of an existing record
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Contact))`: The updated record
    /// - `Ok(None)`: No record found
    /// - `Err(Error)`: Storage error or constraint violation
    async fn update(
        &self,
        id: &ContactId,
        draft: ContactDraft,
    ) -> Result<Option<Contact>, crate::Error>;

    /// Delete a record
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: Deleted
    /// - `Ok(false)`: No record found
    /// - `Err(Error)`: Storage error
    async fn delete(&self, id: &ContactId) -> Result<bool, crate::Error>;

    /// Number of live records
    async fn count(&self) -> Result<usize, crate::Error>;

    /// Persist any pending changes
    async fn flush(&self) -> Result<(), crate::Error>;
}

/// Helper trait for constructing directory stores from configuration
#[async_trait]
pub trait DirectoryStoreFactory: Send + Sync {
    /// Create a DirectoryStore instance from configuration
    async fn create(
        &self,
        config: &crate::config::StoreConfig,
    ) -> Result<Box<dyn DirectoryStore>, crate::Error>;
}
