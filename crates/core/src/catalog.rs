//! Catalog filtering, search and per-category counts.
//!
//! Only available products are ever shown on the public menu. The category
//! filter and the search text combine: a product must pass both.

use serde::{Deserialize, Serialize};

use crate::models::{Category, Product, Reservation};
use crate::types::{CategoryId, ReservationStatus};

/// Category selection on the menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every category.
    #[default]
    All,
    /// A single category.
    Only(CategoryId),
}

impl CategoryFilter {
    /// Parse a query value. Missing, empty and `all` select every category.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("" | "all") => Self::All,
            Some(id) => Self::Only(CategoryId::new(id)),
        }
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(id) => &product.category == id,
        }
    }
}

/// Menu query: category selection plus free-text search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub category: CategoryFilter,
    pub search: String,
}

impl CatalogQuery {
    /// Whether a product is visible under this query.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        product.available && self.category.matches(product) && matches_search(product, &self.search)
    }

    /// Filter products, preserving their order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Case-insensitive substring match over name or description.
///
/// An empty needle matches everything.
#[must_use]
pub fn matches_search(product: &Product, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    product.name.to_lowercase().contains(&needle)
        || product.description.to_lowercase().contains(&needle)
}

/// Category with its count of available products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
    pub count: usize,
}

/// Count available products in one category, or in all of them.
#[must_use]
pub fn count_available(products: &[Product], filter: &CategoryFilter) -> usize {
    products
        .iter()
        .filter(|p| p.available && filter.matches(p))
        .count()
}

/// Per-category counts of available products, in category order.
#[must_use]
pub fn category_counts(categories: &[Category], products: &[Product]) -> Vec<CategoryCount> {
    categories
        .iter()
        .map(|c| CategoryCount {
            id: c.id.clone(),
            name: c.name.clone(),
            icon: c.icon.clone(),
            count: count_available(products, &CategoryFilter::Only(c.id.clone())),
        })
        .collect()
}

/// Look up the category a product points at.
///
/// Dangling references are tolerated and simply return `None`.
#[must_use]
pub fn category_of<'a>(categories: &'a [Category], product: &Product) -> Option<&'a Category> {
    categories.iter().find(|c| c.id == product.category)
}

/// Reservations split by status for the admin view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReservationBoard {
    pub pending: Vec<Reservation>,
    pub confirmed: Vec<Reservation>,
}

impl ReservationBoard {
    /// Group reservations. Cancelled reservations are not listed.
    #[must_use]
    pub fn from_reservations(reservations: &[Reservation]) -> Self {
        let mut board = Self::default();
        for reservation in reservations {
            match reservation.status {
                ReservationStatus::Pending => board.pending.push(reservation.clone()),
                ReservationStatus::Confirmed => board.confirmed.push(reservation.clone()),
                ReservationStatus::Cancelled => {}
            }
        }
        board
    }
}
