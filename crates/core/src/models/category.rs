//! Menu categories.

use serde::{Deserialize, Serialize};

use crate::types::CategoryId;

/// A menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Short display icon, usually an emoji.
    #[serde(default)]
    pub icon: String,
}

/// Fields for a category that has not been created yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

impl NewCategory {
    /// Build the category, deriving its ID from the name.
    #[must_use]
    pub fn into_category(self) -> Category {
        Category {
            id: CategoryId::from_name(&self.name),
            name: self.name,
            icon: self.icon,
        }
    }
}

/// Partial update for a category. The ID never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
}

impl Category {
    /// Merge a partial update into this category.
    pub fn apply(&mut self, update: CategoryUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(icon) = update.icon {
            self.icon = icon;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_keeps_id() {
        let mut category = NewCategory {
            name: "Bebidas Frías".to_string(),
            icon: "🧊".to_string(),
        }
        .into_category();
        assert_eq!(category.id.as_str(), "bebidas-frías");

        category.apply(CategoryUpdate {
            name: Some("Bebidas Heladas".to_string()),
            icon: None,
        });
        assert_eq!(category.id.as_str(), "bebidas-frías");
        assert_eq!(category.name, "Bebidas Heladas");
        assert_eq!(category.icon, "🧊");
    }
}
