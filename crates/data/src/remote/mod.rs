//! Remote document store.
//!
//! The store every client shares. Single documents are read, written and
//! deleted by path; documents and whole collections can be watched.
//!
//! # Subscriptions
//!
//! A watch delivers the full current value as soon as it opens and again after
//! every change. An `Err` item ends the subscription: the channel closes right
//! after it. Dropping the receiver stops the watch.

use std::future::Future;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::document::{Collection, DocPath, Document};
use crate::error::RemoteError;

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryRemote;

/// Buffered snapshots per subscription.
pub(crate) const SUBSCRIPTION_CAPACITY: usize = 16;

/// A live stream of snapshots.
pub type Subscription<T> = mpsc::Receiver<Result<T, RemoteError>>;

/// A remote document store backend.
pub trait RemoteStore: Send + Sync + 'static {
    /// Read one document body. `Ok(None)` when it does not exist.
    fn get_document(
        &self,
        path: &DocPath,
    ) -> impl Future<Output = Result<Option<Value>, RemoteError>> + Send;

    /// Create or replace a document body.
    fn set_document(
        &self,
        path: &DocPath,
        data: Value,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Delete a document. Deleting a missing document succeeds.
    fn delete_document(&self, path: &DocPath)
    -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Watch one document. Snapshots are `None` while it does not exist.
    fn watch_document(
        &self,
        path: DocPath,
    ) -> impl Future<Output = Result<Subscription<Option<Value>>, RemoteError>> + Send;

    /// Watch every document of a collection, ordered by id.
    fn watch_collection(
        &self,
        collection: Collection,
    ) -> impl Future<Output = Result<Subscription<Vec<Document>>, RemoteError>> + Send;
}

/// Runtime-selected backend.
#[derive(Debug, Clone)]
pub enum Remote {
    Memory(MemoryRemote),
    #[cfg(feature = "postgres")]
    Postgres(postgres::PgRemote),
}

impl Remote {
    /// Backend name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => "postgres",
        }
    }
}

impl From<MemoryRemote> for Remote {
    fn from(remote: MemoryRemote) -> Self {
        Self::Memory(remote)
    }
}

#[cfg(feature = "postgres")]
impl From<postgres::PgRemote> for Remote {
    fn from(remote: postgres::PgRemote) -> Self {
        Self::Postgres(remote)
    }
}

impl RemoteStore for Remote {
    async fn get_document(&self, path: &DocPath) -> Result<Option<Value>, RemoteError> {
        match self {
            Self::Memory(r) => r.get_document(path).await,
            #[cfg(feature = "postgres")]
            Self::Postgres(r) => r.get_document(path).await,
        }
    }

    async fn set_document(&self, path: &DocPath, data: Value) -> Result<(), RemoteError> {
        match self {
            Self::Memory(r) => r.set_document(path, data).await,
            #[cfg(feature = "postgres")]
            Self::Postgres(r) => r.set_document(path, data).await,
        }
    }

    async fn delete_document(&self, path: &DocPath) -> Result<(), RemoteError> {
        match self {
            Self::Memory(r) => r.delete_document(path).await,
            #[cfg(feature = "postgres")]
            Self::Postgres(r) => r.delete_document(path).await,
        }
    }

    async fn watch_document(
        &self,
        path: DocPath,
    ) -> Result<Subscription<Option<Value>>, RemoteError> {
        match self {
            Self::Memory(r) => r.watch_document(path).await,
            #[cfg(feature = "postgres")]
            Self::Postgres(r) => r.watch_document(path).await,
        }
    }

    async fn watch_collection(
        &self,
        collection: Collection,
    ) -> Result<Subscription<Vec<Document>>, RemoteError> {
        match self {
            Self::Memory(r) => r.watch_collection(collection).await,
            #[cfg(feature = "postgres")]
            Self::Postgres(r) => r.watch_collection(collection).await,
        }
    }
}
