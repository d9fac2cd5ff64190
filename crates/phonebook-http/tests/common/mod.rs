//! Test doubles and common utilities for REST contract tests
//!
//! Servers are started on an ephemeral port and driven with reqwest.

#![allow(dead_code)]

use phonebook_core::error::Result;
use phonebook_core::traits::{Contact, ContactDraft, ContactId, DirectoryStore};
use phonebook_core::{
    Directory, DirectoryRules, Error, FileDirectoryStore, MemoryDirectoryStore, OriginFirewall,
};
use phonebook_http::AppState;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

/// A running server plus a client pointed at it
pub struct TestServer {
    pub base: String,
    pub client: reqwest::Client,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// POST a contact and return the raw response
    pub async fn post_contact(&self, name: &str, number: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/persons"))
            .json(&serde_json::json!({ "name": name, "number": number }))
            .send()
            .await
            .expect("request succeeds")
    }

    /// Current record list as JSON values
    pub async fn list(&self) -> Vec<serde_json::Value> {
        self.client
            .get(self.url("/api/persons"))
            .send()
            .await
            .expect("request succeeds")
            .json()
            .await
            .expect("list is JSON")
    }

    /// Stop the server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start a server around any store
pub async fn spawn_with(
    store: Box<dyn DirectoryStore>,
    rules: DirectoryRules,
    firewall: OriginFirewall,
) -> TestServer {
    let directory = Directory::new(store, rules);
    let state = AppState::new(directory, firewall);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let shutdown = async move {
            let _ = shutdown_rx.await;
        };
        phonebook_http::serve(listener, state, shutdown)
            .await
            .expect("server runs");
    });

    TestServer {
        base: format!("http://{}", addr),
        client: reqwest::Client::new(),
        shutdown_tx: Some(shutdown_tx),
    }
}

/// Volatile variant with its default rules
pub async fn spawn_memory() -> TestServer {
    spawn_with(
        Box::new(MemoryDirectoryStore::new()),
        DirectoryRules {
            unique_fields: true,
        },
        OriginFirewall::default(),
    )
    .await
}

/// Persistent variant with its default rules
pub async fn spawn_file(path: &Path) -> TestServer {
    let store = FileDirectoryStore::new(path)
        .await
        .expect("file store opens");
    spawn_with(
        Box::new(store),
        DirectoryRules {
            unique_fields: false,
        },
        OriginFirewall::default(),
    )
    .await
}

/// A store that counts lookups and expects 24 hex character identifiers
pub struct ProbeStore {
    inner: MemoryDirectoryStore,
    lookups: Arc<AtomicUsize>,
}

impl ProbeStore {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let lookups = Arc::new(AtomicUsize::new(0));
        let store = Self {
            inner: MemoryDirectoryStore::new(),
            lookups: lookups.clone(),
        };
        (store, lookups)
    }

    fn count_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl DirectoryStore for ProbeStore {
    fn kind(&self) -> &'static str {
        "probe"
    }

    fn parse_id(&self, raw: &str) -> Result<ContactId> {
        if raw.len() != 24 || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::malformed_id(raw));
        }
        Ok(ContactId::new(raw))
    }

    async fn create(&self, draft: ContactDraft) -> Result<Contact> {
        self.inner.create(draft).await
    }

    async fn list(&self) -> Result<Vec<Contact>> {
        self.count_lookup();
        self.inner.list().await
    }

    async fn get(&self, id: &ContactId) -> Result<Option<Contact>> {
        self.count_lookup();
        self.inner.get(id).await
    }

    async fn update(&self, id: &ContactId, draft: ContactDraft) -> Result<Option<Contact>> {
        self.count_lookup();
        self.inner.update(id, draft).await
    }

    async fn delete(&self, id: &ContactId) -> Result<bool> {
        self.count_lookup();
        self.inner.delete(id).await
    }

    async fn count(&self) -> Result<usize> {
        self.inner.count().await
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// A store whose every operation fails with an internal fault
pub struct BrokenStore;

#[async_trait::async_trait]
impl DirectoryStore for BrokenStore {
    fn kind(&self) -> &'static str {
        "broken"
    }

    fn parse_id(&self, raw: &str) -> Result<ContactId> {
        Ok(ContactId::new(raw))
    }

    async fn create(&self, _draft: ContactDraft) -> Result<Contact> {
        Err(Error::store("disk quota exceeded on /srv/phonebook"))
    }

    async fn list(&self) -> Result<Vec<Contact>> {
        Err(Error::store("disk quota exceeded on /srv/phonebook"))
    }

    async fn get(&self, _id: &ContactId) -> Result<Option<Contact>> {
        Err(Error::store("disk quota exceeded on /srv/phonebook"))
    }

    async fn update(&self, _id: &ContactId, _draft: ContactDraft) -> Result<Option<Contact>> {
        Err(Error::store("disk quota exceeded on /srv/phonebook"))
    }

    async fn delete(&self, _id: &ContactId) -> Result<bool> {
        Err(Error::store("disk quota exceeded on /srv/phonebook"))
    }

    async fn count(&self) -> Result<usize> {
        Err(Error::store("disk quota exceeded on /srv/phonebook"))
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}
