//! Where each entity lives: state field, cache key and remote location.
//!
//! One marker type per entity lets the snapshot handlers and mutation
//! helpers in the parent module stay generic.

use dulsan_core::{
    AboutConfig, BusinessConfig, Category, ImagesConfig, Product, Reservation, SocialConfig,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::State;
use super::synced::{EmptySnapshot, Synced};
use crate::cache::CacheKey;
use crate::document::{Collection, Singleton};

/// An entity stored as a collection of documents.
pub trait CollectionSlot: 'static {
    type Item: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    const COLLECTION: Collection;
    const KEY: CacheKey;
    const EMPTY: EmptySnapshot;

    fn slot(state: &mut State) -> &mut Synced<Vec<Self::Item>>;
    fn id(item: &Self::Item) -> &str;
}

/// An entity stored as one well-known document.
pub trait SingletonSlot: 'static {
    type Value: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    const DOC: Singleton;
    const KEY: CacheKey;

    fn slot(state: &mut State) -> &mut Synced<Self::Value>;
}

pub struct Products;
pub struct Categories;
pub struct Reservations;

impl CollectionSlot for Products {
    type Item = Product;

    const COLLECTION: Collection = Collection::MenuItems;
    const KEY: CacheKey = CacheKey::Products;
    const EMPTY: EmptySnapshot = EmptySnapshot::Ignore;

    fn slot(state: &mut State) -> &mut Synced<Vec<Product>> {
        &mut state.products
    }

    fn id(item: &Product) -> &str {
        item.id.as_str()
    }
}

impl CollectionSlot for Categories {
    type Item = Category;

    const COLLECTION: Collection = Collection::Categories;
    const KEY: CacheKey = CacheKey::Categories;
    const EMPTY: EmptySnapshot = EmptySnapshot::Ignore;

    fn slot(state: &mut State) -> &mut Synced<Vec<Category>> {
        &mut state.categories
    }

    fn id(item: &Category) -> &str {
        item.id.as_str()
    }
}

impl CollectionSlot for Reservations {
    type Item = Reservation;

    const COLLECTION: Collection = Collection::Reservations;
    const KEY: CacheKey = CacheKey::Reservations;
    // Deleting the last reservation must empty the list everywhere.
    const EMPTY: EmptySnapshot = EmptySnapshot::Apply;

    fn slot(state: &mut State) -> &mut Synced<Vec<Reservation>> {
        &mut state.reservations
    }

    fn id(item: &Reservation) -> &str {
        item.id.as_str()
    }
}

macro_rules! singleton_slot {
    ($marker:ident, $value:ty, $doc:ident, $key:ident, $field:ident) => {
        pub struct $marker;

        impl SingletonSlot for $marker {
            type Value = $value;

            const DOC: Singleton = Singleton::$doc;
            const KEY: CacheKey = CacheKey::$key;

            fn slot(state: &mut State) -> &mut Synced<$value> {
                &mut state.$field
            }
        }
    };
}

singleton_slot!(Business, BusinessConfig, Business, Config, config);
singleton_slot!(Images, ImagesConfig, Images, Images, images);
singleton_slot!(About, AboutConfig, About, About, about);
singleton_slot!(Social, SocialConfig, Social, Social, social);
