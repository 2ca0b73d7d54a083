//! Persistence gateway: key-value storage of the two record collections
//!
//! Records live under two independent keys, `courses` and `semesters`, each holding
//! a JSON array. They are read once at startup. Writes are handed to a background
//! writer thread; when several writes for the same key are queued, only the newest
//! is written. Failures are logged and never reach the caller that triggered them.

use crate::core::error::StorageError;
use crate::core::models::{Course, Term};
use crate::{debug, error, warn};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// Key holding the course collection
pub const COURSES_KEY: &str = "courses";

/// Key holding the term collection
pub const SEMESTERS_KEY: &str = "semesters";

/// Minimal string key-value storage
pub trait KeyValueStore: Send + 'static {
    /// Read the text stored under `key`, if any
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One JSON file per key inside a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`; the directory is created on first write
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Data directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        // Write beside the target and rename so a torn write never replaces good data
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Io { path, source })
    }
}

/// Shared in-memory store. Clones see the same entries, so a test can keep one
/// handle while the gateway owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current value under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    /// Seed a value directly, bypassing the failure switch
    pub fn insert(&self, key: &str, value: impl Into<String>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.into());
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.entries
            .lock()
            .map(|entries| entries.get(key).cloned())
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!(
                "write to '{key}' rejected"
            )));
        }
        self.entries
            .lock()
            .map(|mut entries| {
                entries.insert(key.to_string(), value.to_string());
            })
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }
}

/// Collections read at startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedState {
    /// Stored courses (empty when missing or unreadable)
    pub courses: Vec<Course>,
    /// Stored terms (empty when missing or unreadable)
    pub terms: Vec<Term>,
}

enum Message {
    Write { key: &'static str, value: String },
    Flush(Sender<()>),
}

/// Write-behind front of a [`KeyValueStore`]
pub struct PersistenceGateway {
    sender: Option<Sender<Message>>,
    worker: Option<JoinHandle<()>>,
}

impl PersistenceGateway {
    /// Load both collections from `store`, then hand the store to a background
    /// writer. A missing, unreadable or unparseable key loads as empty.
    #[must_use]
    pub fn start<S: KeyValueStore>(store: S) -> (Self, LoadedState) {
        let loaded = LoadedState {
            courses: load_collection(&store, COURSES_KEY),
            terms: load_collection(&store, SEMESTERS_KEY),
        };

        let (sender, receiver) = mpsc::channel();
        let worker = std::thread::Builder::new()
            .name("cum-tracker-writer".to_string())
            .spawn(move || run_writer(store, &receiver));

        let gateway = match worker {
            Ok(handle) => Self {
                sender: Some(sender),
                worker: Some(handle),
            },
            Err(e) => {
                error!("Failed to start persistence writer, changes will not be saved: {e}");
                Self::detached()
            }
        };
        (gateway, loaded)
    }

    /// Gateway with no backing store; writes are discarded
    #[must_use]
    pub const fn detached() -> Self {
        Self {
            sender: None,
            worker: None,
        }
    }

    /// Whether writes reach a backing store
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.sender.is_some()
    }

    /// Schedule a write of the course collection
    pub fn persist_courses(&self, courses: &[Course]) {
        self.schedule(COURSES_KEY, courses);
    }

    /// Schedule a write of the term collection
    pub fn persist_terms(&self, terms: &[Term]) {
        self.schedule(SEMESTERS_KEY, terms);
    }

    fn schedule<T: serde::Serialize + ?Sized>(&self, key: &'static str, records: &T) {
        let Some(sender) = &self.sender else {
            return;
        };
        match serde_json::to_string(records) {
            Ok(value) => {
                if sender.send(Message::Write { key, value }).is_err() {
                    error!("Persistence writer stopped; '{key}' was not saved");
                }
            }
            Err(e) => error!("Failed to serialize '{key}': {e}"),
        }
    }

    /// Block until every write scheduled so far has been attempted
    pub fn flush(&self) {
        let Some(sender) = &self.sender else {
            return;
        };
        let (ack_tx, ack_rx) = mpsc::channel();
        if sender.send(Message::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

impl Drop for PersistenceGateway {
    fn drop(&mut self) {
        // Closing the channel lets the writer drain what is queued and exit
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Persistence writer panicked");
            }
        }
    }
}

impl std::fmt::Debug for PersistenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceGateway")
            .field("attached", &self.is_attached())
            .finish()
    }
}

fn load_collection<S, T>(store: &S, key: &str) -> Vec<T>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    match store.get_item(key) {
        Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("Stored '{key}' could not be parsed, starting empty: {e}");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Failed to load '{key}', starting empty: {e}");
            Vec::new()
        }
    }
}

fn run_writer<S: KeyValueStore>(mut store: S, receiver: &Receiver<Message>) {
    while let Ok(first) = receiver.recv() {
        // Coalesce everything already queued: newest value per key wins
        let mut pending: BTreeMap<&'static str, String> = BTreeMap::new();
        let mut acks = Vec::new();
        for message in std::iter::once(first).chain(receiver.try_iter()) {
            match message {
                Message::Write { key, value } => {
                    pending.insert(key, value);
                }
                Message::Flush(ack) => acks.push(ack),
            }
        }

        for (key, value) in pending {
            match store.set_item(key, &value) {
                Ok(()) => debug!("Saved '{key}' ({} bytes)", value.len()),
                Err(e) => error!("Error saving '{key}': {e}"),
            }
        }
        for ack in acks {
            let _ = ack.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let mut handle = store.clone();
        handle.set_item("courses", "[]").expect("write");
        assert_eq!(store.get("courses").as_deref(), Some("[]"));
    }

    #[test]
    fn missing_keys_load_empty() {
        let (_gateway, loaded) = PersistenceGateway::start(MemoryStore::new());
        assert_eq!(loaded, LoadedState::default());
    }

    #[test]
    fn garbage_loads_empty() {
        let store = MemoryStore::new();
        store.insert(COURSES_KEY, "{not json");
        store.insert(SEMESTERS_KEY, r#"[{"id":"t1","name":"Ciclo 1","year":"2025"}]"#);
        let (_gateway, loaded) = PersistenceGateway::start(store);
        assert!(loaded.courses.is_empty());
        assert_eq!(loaded.terms.len(), 1);
    }

    #[test]
    fn flush_waits_for_latest_write() {
        let store = MemoryStore::new();
        let (gateway, _) = PersistenceGateway::start(store.clone());
        gateway.persist_terms(&[]);
        let term = Term {
            id: "t1".to_string(),
            name: "Ciclo 1".to_string(),
            year: "2025".to_string(),
            number: None,
        };
        gateway.persist_terms(std::slice::from_ref(&term));
        gateway.flush();

        let stored: Vec<Term> =
            serde_json::from_str(&store.get(SEMESTERS_KEY).expect("terms saved")).expect("parse");
        assert_eq!(stored, vec![term]);
    }

    #[test]
    fn failed_writes_are_swallowed() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let (gateway, _) = PersistenceGateway::start(store.clone());
        gateway.persist_courses(&[]);
        gateway.flush();
        assert!(store.get(COURSES_KEY).is_none());

        store.set_fail_writes(false);
        gateway.persist_courses(&[]);
        gateway.flush();
        assert_eq!(store.get(COURSES_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn drop_drains_pending_writes() {
        let store = MemoryStore::new();
        {
            let (gateway, _) = PersistenceGateway::start(store.clone());
            gateway.persist_courses(&[]);
        }
        assert_eq!(store.get(COURSES_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn detached_gateway_ignores_writes() {
        let gateway = PersistenceGateway::detached();
        assert!(!gateway.is_attached());
        gateway.persist_courses(&[]);
        gateway.flush();
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let mut store = FileStore::new(dir.path().join("data"));
        assert!(store.get_item(COURSES_KEY).expect("read").is_none());
        store.set_item(COURSES_KEY, "[]").expect("write");
        assert_eq!(
            store.get_item(COURSES_KEY).expect("read").as_deref(),
            Some("[]")
        );
        assert!(!dir.path().join("data").join(".courses.json.tmp").exists());
    }
}
