//! Directory service
//!
//! The Directory runs every caller operation through the business rules
//! before it reaches the store:
//!
//! ```text
//!   raw id ──► DirectoryStore::parse_id ──► MalformedId?
//!                                   │
//!   name/number ──► validate_format ──► check_duplicates (if unique_fields)
//!                                   │
//!                                   ▼
//!                          ┌────────────────┐
//!                          │ DirectoryStore │
//!                          └────────────────┘
//! ```
//!
//! ## Concurrency
//!
//! Reads go straight to the store. Mutations take a single-writer gate,
//! so the duplicate check and the write it guards cannot interleave with
//! another mutation.

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::rules::{check_duplicates, validate_format};
use crate::traits::{Contact, DirectoryStore};

/// Business rules applied on top of the Format Validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRules {
    /// Reject names and numbers already used by another record
    pub unique_fields: bool,
}

impl Default for DirectoryRules {
    fn default() -> Self {
        Self {
            unique_fields: true,
        }
    }
}

/// Contact directory service
pub struct Directory {
    /// Backing store
    store: Box<dyn DirectoryStore>,

    /// Rules in force
    rules: DirectoryRules,

    /// Single-writer gate for mutations
    write_gate: Mutex<()>,
}

impl Directory {
    /// Create a new directory
    pub fn new(store: Box<dyn DirectoryStore>, rules: DirectoryRules) -> Self {
        info!(
            "Directory ready: store={}, unique_fields={}",
            store.kind(),
            rules.unique_fields
        );

        Self {
            store,
            rules,
            write_gate: Mutex::new(()),
        }
    }

    pub fn rules(&self) -> DirectoryRules {
        self.rules
    }

    pub fn store_kind(&self) -> &'static str {
        self.store.kind()
    }

    /// All records
    pub async fn list(&self) -> Result<Vec<Contact>> {
        self.store.list().await
    }

    /// Number of records
    pub async fn count(&self) -> Result<usize> {
        self.store.count().await
    }

    /// Look up one record
    ///
    /// A malformed identifier is rejected before the store is queried.
    pub async fn get(&self, raw_id: &str) -> Result<Contact> {
        let id = self.store.parse_id(raw_id)?;
        debug!("Looking up contact {}", id);
        self.store
            .get(&id)
            .await?
            .ok_or_else(|| Error::not_found(id.as_str()))
    }

    /// Validate and store a new record
    pub async fn create(&self, name: Option<&str>, number: Option<&str>) -> Result<Contact> {
        let draft = validate_format(name, number)?;

        let _gate = self.write_gate.lock().await;

        if self.rules.unique_fields {
            let existing = self.store.list().await?;
            check_duplicates(&draft, &existing, None)?;
        }

        let contact = self.store.create(draft).await?;
        info!("Created contact {}", contact.id);

        Ok(contact)
    }

    /// Replace name and number of an existing record
    ///
    /// The new values go through the same rules as on create; the record
    /// never counts as a duplicate of itself.
    pub async fn update(
        &self,
        raw_id: &str,
        name: Option<&str>,
        number: Option<&str>,
    ) -> Result<Contact> {
        let id = self.store.parse_id(raw_id)?;
        let draft = validate_format(name, number)?;

        let _gate = self.write_gate.lock().await;

        if self.rules.unique_fields {
            let existing = self.store.list().await?;
            check_duplicates(&draft, &existing, Some(&id))?;
        }

        let contact = self
            .store
            .update(&id, draft)
            .await?
            .ok_or_else(|| Error::not_found(id.as_str()))?;

        info!("Updated contact {}", contact.id);

        Ok(contact)
    }

    /// Remove a record
    pub async fn delete(&self, raw_id: &str) -> Result<()> {
        let id = self.store.parse_id(raw_id)?;

        let _gate = self.write_gate.lock().await;

        if !self.store.delete(&id).await? {
            return Err(Error::not_found(id.as_str()));
        }

        info!("Deleted contact {}", id);

        Ok(())
    }

    /// Persist pending store changes
    pub async fn flush(&self) -> Result<()> {
        self.store.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{OutcomeKind, classify};
    use crate::rules::Rejection;
    use crate::store::{FileDirectoryStore, MemoryDirectoryStore};
    use std::sync::Arc;

    fn memory_directory() -> Directory {
        Directory::new(
            Box::new(MemoryDirectoryStore::new()),
            DirectoryRules { unique_fields: true },
        )
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let directory = memory_directory();

        let created = directory.create(Some("Mary"), Some("12-34")).await.unwrap();
        assert_eq!(created.name, "Mary");
        assert_eq!(created.number, "12-34");

        let fetched = directory.get(created.id.as_str()).await.unwrap();
        assert_eq!(fetched, created);

        let all = directory.list().await.unwrap();
        assert_eq!(all, vec![created]);
    }

    #[tokio::test]
    async fn test_format_rejections_reach_no_store() {
        let directory = memory_directory();

        let err = directory.create(Some(""), Some("123")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(Rejection::MissingValues)));

        let err = directory.create(Some("Ann"), Some("12x")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(Rejection::InvalidNumber)));

        assert_eq!(directory.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_guard() {
        let directory = memory_directory();
        directory.create(Some("Arto"), Some("111")).await.unwrap();

        let err = directory.create(Some("Arto"), Some("222")).await.unwrap_err();
        assert_eq!(classify(&err).reason, "Duplicate name");

        let err = directory.create(Some("Ada"), Some("111")).await.unwrap_err();
        assert_eq!(classify(&err).reason, "Duplicate number");

        // Format still takes priority over duplicates
        let err = directory.create(Some("Arto"), Some("abc")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(Rejection::InvalidNumber)));
    }

    #[tokio::test]
    async fn test_duplicates_allowed_when_rule_off() {
        let directory = Directory::new(
            Box::new(MemoryDirectoryStore::new()),
            DirectoryRules {
                unique_fields: false,
            },
        );
        directory.create(Some("Arto"), Some("111")).await.unwrap();
        directory.create(Some("Arto"), Some("111")).await.unwrap();
        assert_eq!(directory.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_creates_admit_one() {
        let directory = memory_directory();
        let directory = Arc::new(directory);

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let directory = directory.clone();
                tokio::spawn(async move { directory.create(Some("Arto"), Some("111")).await })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(directory.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update() {
        let directory = memory_directory();
        let arto = directory.create(Some("Arto"), Some("111")).await.unwrap();
        directory.create(Some("Ada"), Some("222")).await.unwrap();

        // Same values on itself are fine
        let same = directory
            .update(arto.id.as_str(), Some("Arto"), Some("111"))
            .await
            .unwrap();
        assert_eq!(same, arto);

        let updated = directory
            .update(arto.id.as_str(), Some("Arto"), Some("333"))
            .await
            .unwrap();
        assert_eq!(updated.id, arto.id);
        assert_eq!(updated.number, "333");

        let err = directory
            .update(arto.id.as_str(), Some("Ada"), Some("333"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(Rejection::DuplicateName)));

        let err = directory
            .update("999", Some("Zed"), Some("999"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let directory = memory_directory();
        let created = directory.create(Some("Arto"), Some("111")).await.unwrap();

        directory.delete(created.id.as_str()).await.unwrap();
        let err = directory.delete(created.id.as_str()).await.unwrap_err();
        assert_eq!(classify(&err).kind, OutcomeKind::NotFound);
    }

    #[tokio::test]
    async fn test_mutation_sequence_is_reflected_in_reads() {
        let directory = memory_directory();
        let created = directory.create(Some("Arto"), Some("111")).await.unwrap();
        directory
            .update(created.id.as_str(), Some("Arto"), Some("222"))
            .await
            .unwrap();
        assert_eq!(directory.get(created.id.as_str()).await.unwrap().number, "222");

        directory.delete(created.id.as_str()).await.unwrap();
        assert!(directory.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_malformed_id_and_constraint() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDirectoryStore::new(dir.path().join("contacts.json"))
            .await
            .unwrap();
        let directory = Directory::new(
            Box::new(store),
            DirectoryRules {
                unique_fields: false,
            },
        );

        let err = directory.get("short").await.unwrap_err();
        assert!(matches!(err, Error::MalformedId(_)));

        let err = directory.delete("short").await.unwrap_err();
        assert!(matches!(err, Error::MalformedId(_)));

        // Right length, wrong alphabet
        let err = directory.get("zzzzzzzzzzzzzzzzzzzzzzzz").await.unwrap_err();
        assert!(matches!(err, Error::MalformedId(_)));

        let err = directory.create(Some("Mary"), Some("12-34")).await.unwrap_err();
        assert!(matches!(err, Error::Constraint(_)));

        let created = directory
            .create(Some("Mary Poppendieck"), Some("12-34"))
            .await
            .unwrap();
        assert_eq!(directory.get(created.id.as_str()).await.unwrap(), created);

        let err = directory.get("000000000000000000000000").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
