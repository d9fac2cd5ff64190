// # File Directory Store
//
// Durable implementation of DirectoryStore with crash recovery.
//
// ## Purpose
//
// Keeps the directory across restarts. Every mutation is written to a
// JSON document file before it becomes visible to readers.
//
// ## Crash Recovery
//
// - Atomic writes: Uses write-then-rename for atomicity
// - Corruption detection: Validates JSON on load
// - Automatic backup: Keeps .backup of last known good state
// - Recovery: Falls back to backup if corruption detected
//
// ## Schema
//
// Identifiers are 24 hex character tokens; anything else is malformed.
// Names shorter than the configured minimum (5 by default, counted in
// UTF-16 code units) are refused as a constraint violation, on create
// and on update.
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "contacts": [
//     { "id": "65a0f00d0000000000000000", "name": "Mary Poppendieck", "number": "39-23-6423122" }
//   ]
// }
// ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::Error;
use crate::config::StoreConfig;
use crate::store::ids::ObjectIds;
use crate::traits::{
    Contact, ContactDraft, ContactId, DirectoryStore, DirectoryStoreFactory, IdAllocator,
};

/// Directory file format version
/// Used for future migration if format changes
const DIRECTORY_FILE_VERSION: &str = "1.0";

/// Default minimum name length of the document schema
pub const DEFAULT_MIN_NAME_LEN: usize = 5;

/// File-based directory store with crash recovery
///
/// Readers are served from memory; writers hold the lock across the
/// disk write so the file and the in-memory view never disagree.
///
/// # Example
///
/// ```rust,ignore
/// use phonebook_core::store::FileDirectoryStore;
/// use phonebook_core::traits::DirectoryStore;
///
/// let store = FileDirectoryStore::new("/var/lib/phonebook/contacts.json").await?;
/// let contact = store.create(draft).await?; // atomically written to disk
/// ```
#[derive(Debug)]
pub struct FileDirectoryStore {
    path: PathBuf,
    contacts: RwLock<Vec<Contact>>,
    ids: ObjectIds,
    min_name_len: Option<usize>,
}

/// Serializable directory file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct DirectoryFileFormat {
    version: String,
    contacts: Vec<Contact>,
}

impl FileDirectoryStore {
    /// Create or load a file directory store
    ///
    /// This will:
    /// 1. Try to load existing directory file
    /// 2. If corruption detected, try to load from backup
    /// 3. If both fail, start with an empty directory
    /// 4. Create parent directories if needed
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let contacts = Self::load_with_recovery(&path).await?;
        let ids = ObjectIds::seeded_from(contacts.iter().map(|c| &c.id));

        Ok(Self {
            path,
            contacts: RwLock::new(contacts),
            ids,
            min_name_len: Some(DEFAULT_MIN_NAME_LEN),
        })
    }

    /// Override the minimum name length (`None` disables the constraint)
    pub fn with_min_name_len(mut self, min_name_len: Option<usize>) -> Self {
        self.min_name_len = min_name_len;
        self
    }

    /// Load directory from file with automatic recovery
    ///
    /// Recovery strategy:
    /// 1. Try to load main file
    /// 2. If JSON parse error, try loading backup
    /// 3. If backup also fails, start with an empty directory
    async fn load_with_recovery(path: &Path) -> Result<Vec<Contact>, Error> {
        match Self::load(path).await {
            Ok(contacts) => {
                tracing::debug!("Loaded directory from file: {} contacts", contacts.len());
                Ok(contacts)
            }
            Err(Error::Json(e)) => {
                tracing::warn!(
                    "Directory file appears corrupted: {}. Attempting recovery from backup.",
                    e
                );

                let backup_path = Self::backup_path(path);
                if !backup_path.exists() {
                    tracing::warn!("No backup file found. Starting with empty directory.");
                    return Ok(Vec::new());
                }

                match Self::load(&backup_path).await {
                    Ok(contacts) => {
                        tracing::info!(
                            "Recovered directory from backup: {} contacts",
                            contacts.len()
                        );

                        if let Err(restore_err) = fs::copy(&backup_path, path).await {
                            tracing::error!(
                                "Failed to restore directory file from backup: {}",
                                restore_err
                            );
                        }

                        Ok(contacts)
                    }
                    Err(backup_err) => {
                        tracing::error!(
                            "Backup also corrupted: {}. Starting with empty directory.",
                            backup_err
                        );
                        Ok(Vec::new())
                    }
                }
            }
            // Other error (not corruption)
            Err(e) => Err(e),
        }
    }

    /// Load directory from file
    async fn load(path: &Path) -> Result<Vec<Contact>, Error> {
        if !path.exists() {
            tracing::debug!("Directory file does not exist: {}", path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::store(format!(
                "Failed to read directory file {}: {}",
                path.display(),
                e
            ))
        })?;

        let file: DirectoryFileFormat = serde_json::from_str(&content)?;

        if file.version != DIRECTORY_FILE_VERSION {
            tracing::warn!(
                "Directory file version mismatch: expected {}, got {}. \
                Attempting to load anyway.",
                DIRECTORY_FILE_VERSION,
                file.version
            );
        }

        Ok(file.contacts)
    }

    /// Write contacts to file atomically
    ///
    /// Callers hold the write lock, so only one write is in flight.
    async fn persist(&self, contacts: &[Contact]) -> Result<(), Error> {
        let file = DirectoryFileFormat {
            version: DIRECTORY_FILE_VERSION.to_string(),
            contacts: contacts.to_vec(),
        };

        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| Error::store(format!("Failed to serialize directory: {}", e)))?;

        // Write to temporary file first
        let temp_path = self.temp_path();
        {
            let mut out = fs::File::create(&temp_path).await.map_err(|e| {
                Error::store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            out.write_all(json.as_bytes()).await.map_err(|e| {
                Error::store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            out.flush().await.map_err(|e| {
                Error::store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        // Keep the last good file as backup
        if self.path.exists() {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("Failed to create backup: {}", e);
            }
        }

        // Atomic rename (temp -> actual)
        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Directory written to file: {}", self.path.display());
        Ok(())
    }

    /// Schema check applied on every write
    fn check_schema(&self, draft: &ContactDraft) -> Result<(), Error> {
        if let Some(min) = self.min_name_len
            && draft.name().encode_utf16().count() < min
        {
            return Err(Error::constraint(format!(
                "Contact validation failed: name: shorter than the minimum allowed length ({})",
                min
            )));
        }
        Ok(())
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    /// Get path to backup file
    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}

#[async_trait]
impl DirectoryStore for FileDirectoryStore {
    fn kind(&self) -> &'static str {
        "file"
    }

    fn parse_id(&self, raw: &str) -> Result<ContactId, Error> {
        let well_formed = self.ids.id_len().is_none_or(|len| raw.len() == len)
            && raw.bytes().all(|b| b.is_ascii_hexdigit());
        if !well_formed {
            return Err(Error::malformed_id(raw));
        }
        // Stored identifiers are lowercase hex
        Ok(ContactId::new(raw.to_ascii_lowercase()))
    }

    async fn create(&self, draft: ContactDraft) -> Result<Contact, Error> {
        self.check_schema(&draft)?;

        let mut guard = self.contacts.write().await;
        let contact = Contact::from_draft(self.ids.next_id(), draft);

        let mut next = guard.clone();
        next.push(contact.clone());
        self.persist(&next).await?;
        *guard = next;

        Ok(contact)
    }

    async fn list(&self) -> Result<Vec<Contact>, Error> {
        Ok(self.contacts.read().await.clone())
    }

    async fn get(&self, id: &ContactId) -> Result<Option<Contact>, Error> {
        let guard = self.contacts.read().await;
        Ok(guard.iter().find(|c| &c.id == id).cloned())
    }

    async fn update(&self, id: &ContactId, draft: ContactDraft) -> Result<Option<Contact>, Error> {
        self.check_schema(&draft)?;

        let mut guard = self.contacts.write().await;
        let Some(pos) = guard.iter().position(|c| &c.id == id) else {
            return Ok(None);
        };

        let mut next = guard.clone();
        next[pos].apply(draft);
        let updated = next[pos].clone();
        self.persist(&next).await?;
        *guard = next;

        Ok(Some(updated))
    }

    async fn delete(&self, id: &ContactId) -> Result<bool, Error> {
        let mut guard = self.contacts.write().await;
        let Some(pos) = guard.iter().position(|c| &c.id == id) else {
            return Ok(false);
        };

        let mut next = guard.clone();
        next.remove(pos);
        self.persist(&next).await?;
        *guard = next;

        Ok(true)
    }

    async fn count(&self) -> Result<usize, Error> {
        Ok(self.contacts.read().await.len())
    }

    async fn flush(&self) -> Result<(), Error> {
        // Every mutation is already on disk; rewrite to be sure the file exists
        let guard = self.contacts.read().await;
        self.persist(&guard).await
    }
}

/// Factory for [`FileDirectoryStore`]
pub struct FileDirectoryStoreFactory;

#[async_trait]
impl DirectoryStoreFactory for FileDirectoryStoreFactory {
    async fn create(&self, config: &StoreConfig) -> Result<Box<dyn DirectoryStore>, Error> {
        match config {
            StoreConfig::File { path, min_name_len } => {
                let store = FileDirectoryStore::new(path)
                    .await?
                    .with_min_name_len(*min_name_len);
                Ok(Box::new(store))
            }
            other => Err(Error::config(format!(
                "File store factory cannot build a '{}' store",
                other.type_name()
            ))),
        }
    }
}
