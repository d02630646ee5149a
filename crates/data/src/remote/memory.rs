//! In-process remote store.
//!
//! Used when no database is configured, and by tests. Clones share the same
//! documents, so several sessions built on clones of one `MemoryRemote` see
//! each other's writes live, like several browsers on one database.
//!
//! Two switches inject failures: [`MemoryRemote::set_offline`] makes every
//! operation fail, and [`MemoryRemote::disconnect_watchers`] ends every open
//! subscription with an error.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};

use super::{RemoteStore, SUBSCRIPTION_CAPACITY, Subscription};
use crate::document::{Collection, DocPath, Document};
use crate::error::RemoteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Updated(Collection),
    Disconnected,
}

#[derive(Debug)]
struct Shared {
    documents: Mutex<HashMap<Collection, BTreeMap<String, Value>>>,
    changes: broadcast::Sender<Change>,
    offline: AtomicBool,
    writes: AtomicUsize,
}

/// In-memory document store with live change notifications.
#[derive(Debug, Clone)]
pub struct MemoryRemote {
    shared: Arc<Shared>,
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemote {
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            shared: Arc::new(Shared {
                documents: Mutex::new(HashMap::new()),
                changes,
                offline: AtomicBool::new(false),
                writes: AtomicUsize::new(0),
            }),
        }
    }

    /// Make every operation fail with [`RemoteError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.shared.offline.store(offline, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.shared.offline.load(Ordering::SeqCst)
    }

    /// End every open subscription with [`RemoteError::Disconnected`].
    pub fn disconnect_watchers(&self) {
        // No receivers just means nobody is watching.
        let _ = self.shared.changes.send(Change::Disconnected);
    }

    /// Successful writes and deletes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.shared.writes.load(Ordering::SeqCst)
    }

    /// Read a document without going through the async API.
    #[must_use]
    pub fn document(&self, path: &DocPath) -> Option<Value> {
        self.documents()
            .get(&path.collection)
            .and_then(|docs| docs.get(&path.id))
            .cloned()
    }

    /// Read a collection without going through the async API.
    #[must_use]
    pub fn collection(&self, collection: Collection) -> Vec<Document> {
        self.documents()
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn documents(&self) -> MutexGuard<'_, HashMap<Collection, BTreeMap<String, Value>>> {
        self.shared
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn check_online(&self) -> Result<(), RemoteError> {
        if self.is_offline() {
            Err(RemoteError::Unavailable)
        } else {
            Ok(())
        }
    }

    fn changed(&self, collection: Collection) {
        self.shared.writes.fetch_add(1, Ordering::SeqCst);
        let _ = self.shared.changes.send(Change::Updated(collection));
    }

    /// Spawn a watcher that re-reads on every change to `collection` and
    /// forwards snapshots that differ from the last one sent.
    fn spawn_watch<T, F>(&self, collection: Collection, read: F) -> Subscription<T>
    where
        T: Clone + PartialEq + Send + 'static,
        F: Fn(&Self) -> Result<T, RemoteError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_CAPACITY);
        let mut changes = self.shared.changes.subscribe();
        let remote = self.clone();

        tokio::spawn(async move {
            let mut last: Option<T> = None;
            let mut next = read(&remote);

            loop {
                match next {
                    Ok(snapshot) if last.as_ref() == Some(&snapshot) => {}
                    Ok(snapshot) => {
                        last = Some(snapshot.clone());
                        if tx.send(Ok(snapshot)).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Err(e)).await;
                        return;
                    }
                }

                next = loop {
                    tokio::select! {
                        () = tx.closed() => return,
                        change = changes.recv() => match change {
                            Ok(Change::Updated(c)) if c != collection => {}
                            Ok(Change::Updated(_)) | Err(RecvError::Lagged(_)) => break read(&remote),
                            Ok(Change::Disconnected) => break Err(RemoteError::Disconnected),
                            Err(RecvError::Closed) => return,
                        },
                    }
                };
            }
        });

        rx
    }
}

impl RemoteStore for MemoryRemote {
    async fn get_document(&self, path: &DocPath) -> Result<Option<Value>, RemoteError> {
        self.check_online()?;
        Ok(self.document(path))
    }

    async fn set_document(&self, path: &DocPath, data: Value) -> Result<(), RemoteError> {
        self.check_online()?;
        self.documents()
            .entry(path.collection)
            .or_default()
            .insert(path.id.clone(), data);
        self.changed(path.collection);
        Ok(())
    }

    async fn delete_document(&self, path: &DocPath) -> Result<(), RemoteError> {
        self.check_online()?;
        if let Some(docs) = self.documents().get_mut(&path.collection) {
            docs.remove(&path.id);
        }
        self.changed(path.collection);
        Ok(())
    }

    async fn watch_document(
        &self,
        path: DocPath,
    ) -> Result<Subscription<Option<Value>>, RemoteError> {
        let collection = path.collection;
        Ok(self.spawn_watch(collection, move |remote| {
            remote.check_online()?;
            Ok(remote.document(&path))
        }))
    }

    async fn watch_collection(
        &self,
        collection: Collection,
    ) -> Result<Subscription<Vec<Document>>, RemoteError> {
        Ok(self.spawn_watch(collection, move |remote| {
            remote.check_online()?;
            Ok(remote.collection(collection))
        }))
    }
}
