//! Dulsan Data - offline-first storage and remote synchronization.
//!
//! Three layers, from the bottom up:
//!
//! - [`storage`] / [`cache`] - a small key-value store (files on disk or
//!   memory) holding JSON snapshots of every entity, guarded by a global
//!   version marker.
//! - [`remote`] - the shared document store every client reads and writes:
//!   an in-process backend and a `PostgreSQL` backend (feature `postgres`)
//!   with `LISTEN`/`NOTIFY` change feeds.
//! - [`sync`] - [`LocalData`], the session that starts from the cache,
//!   seeds an empty remote store, subscribes to live updates and writes
//!   every local mutation through to the remote store.
//!
//! Remote failures never surface to callers of the mutation API: they are
//! logged and the local state stands.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod document;
pub mod error;
pub mod remote;
pub mod storage;
pub mod sync;

pub use cache::{CacheKey, DATA_VERSION, LocalCache, VERSION_KEY};
pub use document::{Collection, DocPath, Document, Singleton};
pub use error::{RemoteError, StorageError, SyncError};
pub use remote::{MemoryRemote, Remote, RemoteStore, Subscription};
pub use storage::{FileStorage, Local, MemoryStorage, Storage};
pub use sync::{EmptySnapshot, Freshness, LocalData, SeedOutcome, State, Synced};

#[cfg(feature = "postgres")]
pub use remote::postgres::{MIGRATOR, PgRemote};
