//! Menu products.

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, ImageRef, Price, ProductId};

/// A product on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: ImageRef,
    /// Category this product is listed under. May dangle.
    pub category: CategoryId,
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

/// Fields for a product that has not been assigned an ID yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: ImageRef,
    pub category: CategoryId,
    #[serde(default = "default_available")]
    pub available: bool,
}

impl NewProduct {
    /// Attach an ID, producing a full product.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
            image: self.image,
            category: self.category,
            available: self.available,
        }
    }
}

/// Partial update for a product. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub image: Option<ImageRef>,
    pub category: Option<CategoryId>,
    pub available: Option<bool>,
}

impl Product {
    /// Merge a partial update into this product.
    pub fn apply(&mut self, update: ProductUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(image) = update.image {
            self.image = image;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(available) = update.available {
            self.available = available;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn croissant() -> Product {
        NewProduct {
            name: "Croissant".to_string(),
            price: Price::whole(45),
            description: "Croissant recién horneado".to_string(),
            image: ImageRef::default(),
            category: CategoryId::new("otros"),
            available: true,
        }
        .with_id(ProductId::new("27"))
    }

    #[test]
    fn test_apply_partial_update() {
        let mut product = croissant();
        product.apply(ProductUpdate {
            price: Some(Price::whole(50)),
            available: Some(false),
            ..ProductUpdate::default()
        });

        assert_eq!(product.price, Price::whole(50));
        assert!(!product.available);
        assert_eq!(product.name, "Croissant");
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(croissant()).expect("serialize");
        assert_eq!(json["id"], "27");
        assert_eq!(json["category"], "otros");
        assert_eq!(json["price"].as_f64(), Some(45.0));
        assert_eq!(json["available"], true);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let product: Product = serde_json::from_str(
            r#"{"id":"x","name":"Pan","price":10,"category":"otros"}"#,
        )
        .expect("deserialize");
        assert!(product.available);
        assert!(product.image.is_empty());
        assert!(product.description.is_empty());
    }
}
