//! Remote document addressing and encoding.
//!
//! The remote store is a set of collections of JSON documents keyed by id.
//! An entity's `id` is its document key and is never stored inside the
//! document body: writes strip it, reads put it back.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Remote collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    /// Singleton configuration documents.
    Config,
    /// Products.
    MenuItems,
    Categories,
    Reservations,
}

impl Collection {
    pub const ALL: [Self; 4] = [
        Self::Config,
        Self::MenuItems,
        Self::Categories,
        Self::Reservations,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::MenuItems => "menuItems",
            Self::Categories => "categories",
            Self::Reservations => "reservations",
        }
    }

    /// Parse a collection name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The well-known singleton documents in [`Collection::Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Singleton {
    Business,
    Images,
    About,
    Social,
}

impl Singleton {
    /// Seeding order.
    pub const ALL: [Self; 4] = [Self::Business, Self::Images, Self::About, Self::Social];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Images => "images",
            Self::About => "about",
            Self::Social => "social",
        }
    }

    #[must_use]
    pub fn path(self) -> DocPath {
        DocPath::new(Collection::Config, self.id())
    }
}

/// Address of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    pub collection: Collection,
    pub id: String,
}

impl DocPath {
    #[must_use]
    pub fn new(collection: Collection, id: impl Into<String>) -> Self {
        Self {
            collection,
            id: id.into(),
        }
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A document read from a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    #[must_use]
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Decode the document into an entity, restoring `id` from the key.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the body does not match the entity.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let mut data = self.data.clone();
        if let Value::Object(fields) = &mut data {
            fields.insert("id".to_owned(), Value::String(self.id.clone()));
        }
        serde_json::from_value(data)
    }
}

/// Encode an entity as a document body, dropping its `id` field.
///
/// # Errors
///
/// Returns `serde_json::Error` if the value cannot be serialized.
pub fn encode_body<T: Serialize + ?Sized>(value: &T) -> Result<Value, serde_json::Error> {
    let mut data = serde_json::to_value(value)?;
    if let Value::Object(fields) = &mut data {
        fields.remove("id");
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use dulsan_core::{Category, CategoryId, defaults};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_body_excludes_id() {
        let category = Category {
            id: CategoryId::new("tortas"),
            name: "Tortas".to_string(),
            icon: "🥪".to_string(),
        };
        let body = encode_body(&category).expect("encode");
        assert_eq!(body, json!({"name": "Tortas", "icon": "🥪"}));

        let decoded: Category = Document::new("tortas", body).decode().expect("decode");
        assert_eq!(decoded, category);
    }

    #[test]
    fn test_key_wins_over_body_id() {
        let doc = Document::new("real", json!({"id": "stale", "name": "X", "icon": ""}));
        let decoded: Category = doc.decode().expect("decode");
        assert_eq!(decoded.id.as_str(), "real");
    }

    #[test]
    fn test_product_body_keeps_numeric_price() {
        let product = defaults::products().remove(0);
        let body = encode_body(&product).expect("encode");
        assert!(body.get("id").is_none());
        assert!(body["price"].is_number());
    }

    #[test]
    fn test_paths() {
        assert_eq!(Singleton::Business.path().to_string(), "config/business");
        assert_eq!(Collection::from_name("menuItems"), Some(Collection::MenuItems));
        assert_eq!(Collection::from_name("menu_items"), None);
    }
}
