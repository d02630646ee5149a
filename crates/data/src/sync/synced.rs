//! Values tagged with where they came from.

use serde::Serialize;

/// Provenance of an in-memory value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Built-in defaults; nothing cached or received yet.
    Loading,
    /// Restored from the local cache, or changed locally.
    Cached,
    /// At least one remote snapshot has been applied.
    Live,
}

/// What to do with a collection snapshot that has no documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptySnapshot {
    /// Keep the current value. An empty remote collection is treated as
    /// "not populated yet", never as "everything was deleted".
    Ignore,
    /// Replace the current value with the empty list.
    Apply,
}

/// A value plus its [`Freshness`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Synced<T> {
    pub value: T,
    pub freshness: Freshness,
}

impl<T> Synced<T> {
    /// Start from a cache hit, or from the fallback on a miss.
    pub fn restore(cached: Option<T>, fallback: impl FnOnce() -> T) -> Self {
        match cached {
            Some(value) => Self {
                value,
                freshness: Freshness::Cached,
            },
            None => Self {
                value: fallback(),
                freshness: Freshness::Loading,
            },
        }
    }

    /// Replace the value after a local mutation.
    pub fn set_local(&mut self, value: T) {
        self.value = value;
        self.touch_local();
    }

    /// Mutable access for a local mutation.
    pub fn local_mut(&mut self) -> &mut T {
        self.touch_local();
        &mut self.value
    }

    /// Replace the value with a remote snapshot.
    pub fn apply_remote(&mut self, value: T) {
        self.value = value;
        self.freshness = Freshness::Live;
    }

    fn touch_local(&mut self) {
        if self.freshness == Freshness::Loading {
            self.freshness = Freshness::Cached;
        }
    }
}

impl<E> Synced<Vec<E>> {
    /// Apply a collection snapshot under `policy`. Returns whether anything
    /// changed.
    pub fn apply_collection(&mut self, items: Vec<E>, policy: EmptySnapshot) -> bool {
        if items.is_empty() && policy == EmptySnapshot::Ignore {
            return false;
        }
        self.apply_remote(items);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_tags_source() {
        let hit = Synced::restore(Some(vec![1]), Vec::new);
        assert_eq!(hit.freshness, Freshness::Cached);

        let miss: Synced<Vec<i32>> = Synced::restore(None, || vec![9]);
        assert_eq!(miss.freshness, Freshness::Loading);
        assert_eq!(miss.value, vec![9]);
    }

    #[test]
    fn test_empty_snapshot_policy() {
        let mut products = Synced::restore(Some(vec![1, 2]), Vec::new);
        assert!(!products.apply_collection(Vec::new(), EmptySnapshot::Ignore));
        assert_eq!(products.value, vec![1, 2]);
        assert_eq!(products.freshness, Freshness::Cached);

        let mut reservations = Synced::restore(Some(vec![1]), Vec::new);
        assert!(reservations.apply_collection(Vec::new(), EmptySnapshot::Apply));
        assert!(reservations.value.is_empty());
        assert_eq!(reservations.freshness, Freshness::Live);
    }

    #[test]
    fn test_local_change_keeps_live() {
        let mut value = Synced::restore(None, || 1);
        value.set_local(2);
        assert_eq!(value.freshness, Freshness::Cached);

        value.apply_remote(3);
        *value.local_mut() += 1;
        assert_eq!(value.value, 4);
        assert_eq!(value.freshness, Freshness::Live);
    }
}
