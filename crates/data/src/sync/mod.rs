//! The synchronization session.
//!
//! [`LocalData`] owns the in-memory state of every entity and keeps it in step
//! with the local cache and the remote store:
//!
//! 1. **Restore** - built synchronously from the cache; anything missing falls
//!    back to the built-in defaults.
//! 2. **Seed** - [`LocalData::connect`] checks for the business config
//!    document and, if the remote store is empty, writes the defaults once per
//!    session: singletons, then categories, then products, one write each.
//! 3. **Listen** - whatever the seed outcome, four singleton documents and
//!    three collections are watched. Snapshots replace the in-memory value and
//!    the cache entry. Missing singletons are ignored; empty product and
//!    category snapshots are ignored; reservation snapshots always apply.
//! 4. **Write through** - every mutation updates memory, then the cache, then
//!    starts a detached remote write. A failed remote write is logged and
//!    nothing else: no retry, no rollback.
//!
//! Observers follow [`LocalData::changes`], a revision counter bumped on every
//! state change.

mod ids;
mod slots;
mod synced;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
};

use chrono::Utc;
use dulsan_core::{
    AboutConfig, BusinessConfig, Category, CategoryId, CategoryUpdate, ImagesConfig, NewCategory,
    NewProduct, NewReservation, Product, ProductId, ProductUpdate, Reservation, ReservationId,
    ReservationStatus, ReservationUpdate, SocialConfig, defaults,
};
use serde::Serialize;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

pub use ids::IdClock;
use slots::{CollectionSlot, SingletonSlot};
pub use synced::{EmptySnapshot, Freshness, Synced};

use crate::cache::{CacheKey, LocalCache};
use crate::document::{DocPath, Document, Singleton, encode_body};
use crate::error::SyncError;
use crate::remote::{RemoteStore, Subscription};
use crate::storage::Storage;

/// In-memory state of every entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct State {
    pub products: Synced<Vec<Product>>,
    pub categories: Synced<Vec<Category>>,
    pub config: Synced<BusinessConfig>,
    pub images: Synced<ImagesConfig>,
    pub about: Synced<AboutConfig>,
    pub social: Synced<SocialConfig>,
    pub reservations: Synced<Vec<Reservation>>,
}

impl State {
    fn restore<S: Storage>(cache: &LocalCache<S>) -> Self {
        Self {
            products: Synced::restore(cache.restore(CacheKey::Products), defaults::products),
            categories: Synced::restore(cache.restore(CacheKey::Categories), defaults::categories),
            config: Synced::restore(cache.restore(CacheKey::Config), defaults::business_config),
            images: Synced::restore(cache.restore(CacheKey::Images), defaults::images_config),
            about: Synced::restore(cache.restore(CacheKey::About), defaults::about_config),
            social: Synced::restore(cache.restore(CacheKey::Social), defaults::social_config),
            reservations: Synced::restore(cache.restore(CacheKey::Reservations), Vec::new),
        }
    }
}

/// Result of [`LocalData::seed_if_empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The business config document exists; nothing written.
    AlreadyPopulated,
    /// This session already attempted a seed; nothing written.
    AlreadyAttempted,
    /// The defaults were written.
    Seeded { documents: usize },
}

enum RemoteWrite {
    Set(DocPath, Value),
    Delete(DocPath),
}

struct Core<S> {
    state: State,
    cache: LocalCache<S>,
}

struct Inner<R, S> {
    remote: Arc<R>,
    core: RwLock<Core<S>>,
    ids: IdClock,
    seeded: AtomicBool,
    connecting: AtomicBool,
    connected: AtomicBool,
    revision: watch::Sender<u64>,
    listeners: Mutex<Vec<JoinHandle<()>>>,
    writes: Mutex<Vec<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<R, S> Drop for Inner<R, S> {
    fn drop(&mut self) {
        let listeners = self
            .listeners
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.drain(..) {
            listener.abort();
        }
    }
}

impl<R: RemoteStore, S: Storage> Inner<R, S> {
    fn read(&self) -> RwLockReadGuard<'_, Core<S>> {
        self.core.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Core<S>> {
        self.core.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn apply_singleton<T: SingletonSlot>(&self, snapshot: Option<Value>) {
        // A singleton that does not exist yet keeps the local value.
        let Some(data) = snapshot else {
            return;
        };
        let value: T::Value = match serde_json::from_value(data) {
            Ok(value) => value,
            Err(e) => {
                warn!(document = %T::DOC.path(), error = %e, "skipping undecodable document");
                return;
            }
        };

        {
            let mut core = self.write();
            let Core { state, cache } = &mut *core;
            let slot = T::slot(state);
            slot.apply_remote(value);
            cache.persist(T::KEY, &slot.value);
        }
        self.bump();
    }

    fn apply_collection<T: CollectionSlot>(&self, documents: Vec<Document>) {
        let items: Vec<T::Item> = documents
            .iter()
            .filter_map(|doc| match doc.decode() {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(
                        collection = %T::COLLECTION,
                        id = %doc.id,
                        error = %e,
                        "skipping undecodable document"
                    );
                    None
                }
            })
            .collect();

        let applied = {
            let mut core = self.write();
            let Core { state, cache } = &mut *core;
            let slot = T::slot(state);
            let applied = slot.apply_collection(items, T::EMPTY);
            if applied {
                cache.persist(T::KEY, &slot.value);
            }
            applied
        };

        if applied {
            self.bump();
        } else {
            debug!(collection = %T::COLLECTION, "empty snapshot ignored");
        }
    }
}

/// Drain a subscription into `apply` until it ends or the session is gone.
async fn listen<R, S, T>(
    session: Weak<Inner<R, S>>,
    mut subscription: Subscription<T>,
    source: String,
    apply: fn(&Inner<R, S>, T),
) where
    R: RemoteStore,
    S: Storage,
{
    while let Some(message) = subscription.recv().await {
        let Some(inner) = session.upgrade() else {
            return;
        };
        match message {
            Ok(snapshot) => apply(&inner, snapshot),
            Err(e) => {
                warn!(%source, error = %e, "remote subscription ended");
                return;
            }
        }
    }
}

/// The offline-first data session. Clones share one session.
pub struct LocalData<R, S> {
    inner: Arc<Inner<R, S>>,
}

impl<R, S> Clone for LocalData<R, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R, S> std::fmt::Debug for LocalData<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalData")
            .field("revision", &*self.inner.revision.borrow())
            .field("connected", &self.inner.connected.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<R: RemoteStore, S: Storage> LocalData<R, S> {
    /// Build the session from the local cache. Never touches the remote store.
    pub fn new(remote: R, storage: S) -> Self {
        let cache = LocalCache::new(storage);
        let state = State::restore(&cache);
        info!(
            products = state.products.value.len(),
            categories = state.categories.value.len(),
            reservations = state.reservations.value.len(),
            from_cache = state.products.freshness == Freshness::Cached,
            "local data restored"
        );

        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                remote: Arc::new(remote),
                core: RwLock::new(Core { state, cache }),
                ids: IdClock::new(),
                seeded: AtomicBool::new(false),
                connecting: AtomicBool::new(false),
                connected: AtomicBool::new(false),
                revision,
                listeners: Mutex::new(Vec::new()),
                writes: Mutex::new(Vec::new()),
            }),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Run `f` against the current state.
    pub fn read<T>(&self, f: impl FnOnce(&State) -> T) -> T {
        f(&self.inner.read().state)
    }

    /// A copy of the whole state.
    #[must_use]
    pub fn state(&self) -> State {
        self.read(Clone::clone)
    }

    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.read(|s| s.products.value.clone())
    }

    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.read(|s| s.categories.value.clone())
    }

    #[must_use]
    pub fn config(&self) -> BusinessConfig {
        self.read(|s| s.config.value.clone())
    }

    #[must_use]
    pub fn images(&self) -> ImagesConfig {
        self.read(|s| s.images.value.clone())
    }

    #[must_use]
    pub fn about(&self) -> AboutConfig {
        self.read(|s| s.about.value.clone())
    }

    #[must_use]
    pub fn social(&self) -> SocialConfig {
        self.read(|s| s.social.value.clone())
    }

    #[must_use]
    pub fn reservations(&self) -> Vec<Reservation> {
        self.read(|s| s.reservations.value.clone())
    }

    /// Revision feed; the value increases on every state change.
    #[must_use]
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Current revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.inner.revision.borrow()
    }

    /// Whether live subscriptions are open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Seed the remote store if needed, then open every subscription.
    ///
    /// Subscriptions open even when the seed check fails. The session counts
    /// as connected only once all of them are open. Calling this again does
    /// nothing.
    #[instrument(skip(self))]
    pub async fn connect(&self) {
        if self.inner.connecting.swap(true, Ordering::SeqCst) {
            return;
        }

        match self.seed_if_empty().await {
            Ok(outcome) => info!(?outcome, "seed check finished"),
            Err(e) => warn!(error = %e, "seed check failed, continuing with local data"),
        }

        let (opened, total) = self.subscribe().await;
        if opened == total {
            self.inner.connected.store(true, Ordering::SeqCst);
            info!("listening for remote changes");
        } else {
            warn!(opened, total, "remote store unreachable, serving local data");
        }
    }

    /// Write the defaults to the remote store if it has no business config
    /// and no seed was attempted yet in this session.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` on the first failed read or write. Documents
    /// written before the failure stay written.
    #[instrument(skip(self))]
    pub async fn seed_if_empty(&self) -> Result<SeedOutcome, SyncError> {
        let remote = &*self.inner.remote;

        if remote
            .get_document(&Singleton::Business.path())
            .await?
            .is_some()
        {
            info!("remote store already has data, skipping seed");
            return Ok(SeedOutcome::AlreadyPopulated);
        }
        if self.inner.seeded.swap(true, Ordering::SeqCst) {
            return Ok(SeedOutcome::AlreadyAttempted);
        }

        let categories = defaults::categories();
        let products = defaults::products();
        info!(
            categories = categories.len(),
            products = products.len(),
            "seeding remote store with default data"
        );

        put(remote, Singleton::Business.path(), &defaults::business_config()).await?;
        put(remote, Singleton::Images.path(), &defaults::images_config()).await?;
        put(remote, Singleton::About.path(), &defaults::about_config()).await?;
        put(remote, Singleton::Social.path(), &defaults::social_config()).await?;
        let mut documents = Singleton::ALL.len();

        for category in &categories {
            let path = DocPath::new(slots::Categories::COLLECTION, category.id.as_str());
            put(remote, path, category).await?;
            documents += 1;
        }
        for product in &products {
            let path = DocPath::new(slots::Products::COLLECTION, product.id.as_str());
            put(remote, path, product).await?;
            documents += 1;
        }

        info!(documents, "remote store seeded");
        Ok(SeedOutcome::Seeded { documents })
    }

    /// Open every subscription; returns how many opened out of how many.
    async fn subscribe(&self) -> (usize, usize) {
        let attempts = [
            self.watch_singleton::<slots::Business>().await,
            self.watch_singleton::<slots::Images>().await,
            self.watch_singleton::<slots::About>().await,
            self.watch_singleton::<slots::Social>().await,
            self.watch_collection::<slots::Products>().await,
            self.watch_collection::<slots::Categories>().await,
            self.watch_collection::<slots::Reservations>().await,
        ];
        let total = attempts.len();
        let opened: Vec<_> = attempts.into_iter().flatten().collect();
        let count = opened.len();
        lock(&self.inner.listeners).extend(opened);
        (count, total)
    }

    async fn watch_singleton<T: SingletonSlot>(&self) -> Option<JoinHandle<()>> {
        let path = T::DOC.path();
        let subscription = match self.inner.remote.watch_document(path.clone()).await {
            Ok(subscription) => subscription,
            Err(e) => {
                warn!(document = %path, error = %e, "failed to subscribe");
                return None;
            }
        };
        Some(tokio::spawn(listen(
            Arc::downgrade(&self.inner),
            subscription,
            path.to_string(),
            Inner::<R, S>::apply_singleton::<T>,
        )))
    }

    async fn watch_collection<T: CollectionSlot>(&self) -> Option<JoinHandle<()>> {
        let subscription = match self.inner.remote.watch_collection(T::COLLECTION).await {
            Ok(subscription) => subscription,
            Err(e) => {
                warn!(collection = %T::COLLECTION, error = %e, "failed to subscribe");
                return None;
            }
        };
        Some(tokio::spawn(listen(
            Arc::downgrade(&self.inner),
            subscription,
            T::COLLECTION.to_string(),
            Inner::<R, S>::apply_collection::<T>,
        )))
    }

    /// Close every subscription. In-flight remote writes keep running.
    pub fn shutdown(&self) {
        for listener in lock(&self.inner.listeners).drain(..) {
            listener.abort();
        }
        self.inner.connected.store(false, Ordering::SeqCst);
        self.inner.connecting.store(false, Ordering::SeqCst);
        info!("remote subscriptions closed");
    }

    /// Wait for every remote write started so far to finish.
    pub async fn flush(&self) {
        loop {
            let pending = std::mem::take(&mut *lock(&self.inner.writes));
            if pending.is_empty() {
                return;
            }
            for task in pending {
                if let Err(e) = task.await {
                    warn!(error = %e, "remote write task aborted");
                }
            }
        }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Add a product with a fresh id.
    pub fn add_product(&self, product: NewProduct) -> Product {
        let product = product.with_id(ProductId::from_millis(self.inner.ids.next()));
        self.mutate::<slots::Products, _>(|items| items.push(product.clone()));
        self.write_item::<slots::Products>(&product);
        product
    }

    /// Merge an update into a product. `None` if no product has this id.
    pub fn update_product(&self, id: &ProductId, update: ProductUpdate) -> Option<Product> {
        let updated = self.mutate::<slots::Products, _>(|items| {
            let product = items.iter_mut().find(|p| &p.id == id)?;
            product.apply(update);
            Some(product.clone())
        });
        if let Some(product) = &updated {
            self.write_item::<slots::Products>(product);
        }
        updated
    }

    /// Delete a product. Returns whether it was present locally.
    pub fn delete_product(&self, id: &ProductId) -> bool {
        let removed = self.mutate::<slots::Products, _>(|items| remove_where(items, |p| &p.id == id));
        self.delete_item::<slots::Products>(id.as_str());
        removed
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Add a category; its id derives from the name. A category with the
    /// same id is replaced.
    pub fn add_category(&self, category: NewCategory) -> Category {
        let category = category.into_category();
        self.mutate::<slots::Categories, _>(|items| {
            match items.iter_mut().find(|c| c.id == category.id) {
                Some(existing) => *existing = category.clone(),
                None => items.push(category.clone()),
            }
        });
        self.write_item::<slots::Categories>(&category);
        category
    }

    pub fn update_category(&self, id: &CategoryId, update: CategoryUpdate) -> Option<Category> {
        let updated = self.mutate::<slots::Categories, _>(|items| {
            let category = items.iter_mut().find(|c| &c.id == id)?;
            category.apply(update);
            Some(category.clone())
        });
        if let Some(category) = &updated {
            self.write_item::<slots::Categories>(category);
        }
        updated
    }

    /// Delete a category. Products pointing at it are left as they are.
    pub fn delete_category(&self, id: &CategoryId) -> bool {
        let removed =
            self.mutate::<slots::Categories, _>(|items| remove_where(items, |c| &c.id == id));
        self.delete_item::<slots::Categories>(id.as_str());
        removed
    }

    // =========================================================================
    // Reservations
    // =========================================================================

    /// Record a reservation request as pending.
    pub fn add_reservation(&self, request: NewReservation) -> Reservation {
        let id = ReservationId::from_millis(self.inner.ids.next());
        let reservation = request.into_reservation(id, Utc::now());
        self.mutate::<slots::Reservations, _>(|items| items.push(reservation.clone()));
        self.write_item::<slots::Reservations>(&reservation);
        reservation
    }

    pub fn update_reservation(
        &self,
        id: &ReservationId,
        update: ReservationUpdate,
    ) -> Option<Reservation> {
        let updated = self.mutate::<slots::Reservations, _>(|items| {
            let reservation = items.iter_mut().find(|r| &r.id == id)?;
            reservation.apply(update);
            Some(reservation.clone())
        });
        if let Some(reservation) = &updated {
            self.write_item::<slots::Reservations>(reservation);
        }
        updated
    }

    pub fn confirm_reservation(&self, id: &ReservationId) -> Option<Reservation> {
        self.update_reservation(id, ReservationUpdate::status(ReservationStatus::Confirmed))
    }

    pub fn delete_reservation(&self, id: &ReservationId) -> bool {
        let removed =
            self.mutate::<slots::Reservations, _>(|items| remove_where(items, |r| &r.id == id));
        self.delete_item::<slots::Reservations>(id.as_str());
        removed
    }

    // =========================================================================
    // Singletons
    // =========================================================================

    pub fn save_config(&self, config: BusinessConfig) {
        self.save::<slots::Business>(config);
    }

    pub fn save_images(&self, images: ImagesConfig) {
        self.save::<slots::Images>(images);
    }

    pub fn save_about(&self, about: AboutConfig) {
        self.save::<slots::About>(about);
    }

    pub fn save_social(&self, social: SocialConfig) {
        self.save::<slots::Social>(social);
    }

    /// Restore products, categories, business config and images to the
    /// defaults and clear reservations, in memory and in the cache only.
    ///
    /// About, social and the remote store are untouched; the next remote
    /// snapshot overwrites the reset values.
    pub fn reset(&self) {
        {
            let mut core = self.inner.write();
            let Core { state, cache } = &mut *core;

            state.products.set_local(defaults::products());
            cache.persist(CacheKey::Products, &state.products.value);
            state.categories.set_local(defaults::categories());
            cache.persist(CacheKey::Categories, &state.categories.value);
            state.config.set_local(defaults::business_config());
            cache.persist(CacheKey::Config, &state.config.value);
            state.images.set_local(defaults::images_config());
            cache.persist(CacheKey::Images, &state.images.value);
            state.reservations.set_local(Vec::new());
            cache.persist(CacheKey::Reservations, &state.reservations.value);
        }
        self.inner.bump();
        info!("local data reset to defaults");
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Mutate a collection in memory, then persist it.
    fn mutate<T: CollectionSlot, O>(&self, f: impl FnOnce(&mut Vec<T::Item>) -> O) -> O {
        let out = {
            let mut core = self.inner.write();
            let Core { state, cache } = &mut *core;
            let slot = T::slot(state);
            let out = f(slot.local_mut());
            cache.persist(T::KEY, &slot.value);
            out
        };
        self.inner.bump();
        out
    }

    fn save<T: SingletonSlot>(&self, value: T::Value) {
        let body = encode_body(&value);
        {
            let mut core = self.inner.write();
            let Core { state, cache } = &mut *core;
            let slot = T::slot(state);
            slot.set_local(value);
            cache.persist(T::KEY, &slot.value);
        }
        self.inner.bump();

        match body {
            Ok(data) => self.spawn_write(RemoteWrite::Set(T::DOC.path(), data)),
            Err(e) => warn!(document = %T::DOC.path(), error = %e, "failed to encode document"),
        }
    }

    fn write_item<T: CollectionSlot>(&self, item: &T::Item) {
        let path = DocPath::new(T::COLLECTION, T::id(item));
        match encode_body(item) {
            Ok(data) => self.spawn_write(RemoteWrite::Set(path, data)),
            Err(e) => warn!(%path, error = %e, "failed to encode document"),
        }
    }

    fn delete_item<T: CollectionSlot>(&self, id: &str) {
        self.spawn_write(RemoteWrite::Delete(DocPath::new(T::COLLECTION, id)));
    }

    /// Start a detached remote write. Its failure is only logged.
    fn spawn_write(&self, write: RemoteWrite) {
        let Ok(runtime) = Handle::try_current() else {
            warn!("no async runtime, remote write skipped");
            return;
        };
        let remote = Arc::clone(&self.inner.remote);

        let task = runtime.spawn(async move {
            let (path, result) = match write {
                RemoteWrite::Set(path, data) => {
                    let result = remote.set_document(&path, data).await;
                    (path, result)
                }
                RemoteWrite::Delete(path) => {
                    let result = remote.delete_document(&path).await;
                    (path, result)
                }
            };
            match result {
                Ok(()) => debug!(%path, "remote write done"),
                Err(e) => warn!(%path, error = %e, "remote write failed"),
            }
        });

        let mut writes = lock(&self.inner.writes);
        writes.retain(|task| !task.is_finished());
        writes.push(task);
    }
}

async fn put<R: RemoteStore, T: Serialize>(
    remote: &R,
    path: DocPath,
    value: &T,
) -> Result<(), SyncError> {
    remote.set_document(&path, encode_body(value)?).await?;
    Ok(())
}

fn remove_where<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !matches(item));
    items.len() != before
}
