//! Catalog records: products and categories as served by the REST API.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// A product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// Image URL, when the product has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Units currently available.
    #[serde(default)]
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
}

impl Product {
    /// Returns true if at least one unit can be ordered.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Display name of the category, if the API populated it.
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        match self.category.as_ref()? {
            CategoryRef::Populated(summary) => Some(&summary.name),
            CategoryRef::Id(_) => None,
        }
    }

    /// Category id, whether populated or not.
    #[must_use]
    pub fn category_id(&self) -> Option<&CategoryId> {
        self.category.as_ref().map(CategoryRef::id)
    }
}

/// Category reference on a product.
///
/// List endpoints populate the category object; some write endpoints echo
/// back the bare id instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Populated(CategorySummary),
    Id(CategoryId),
}

impl CategoryRef {
    /// The referenced category id.
    #[must_use]
    pub const fn id(&self) -> &CategoryId {
        match self {
            Self::Populated(summary) => &summary.id,
            Self::Id(id) => id,
        }
    }
}

/// Minimal category data embedded in a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Products in the category (only populated by the detail endpoint).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Product>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_with_populated_category() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Desk Lamp",
            "description": "Warm light",
            "price": 24.5,
            "image": "https://cdn.example.com/lamp.jpg",
            "stock": 3,
            "category": { "_id": "c1", "name": "Lighting" },
            "createdAt": "2025-01-05T10:00:00.000Z"
        }))
        .unwrap();

        assert!(product.in_stock());
        assert_eq!(product.category_name(), Some("Lighting"));
        assert_eq!(product.category_id(), Some(&CategoryId::new("c1")));
        assert_eq!(product.price, Price::from_cents(2450));
    }

    #[test]
    fn test_product_with_bare_category_and_defaults() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p2",
            "name": "Mug",
            "price": 8,
            "category": "c9"
        }))
        .unwrap();

        assert!(!product.in_stock());
        assert_eq!(product.category_name(), None);
        assert_eq!(product.category_id(), Some(&CategoryId::new("c9")));
        assert!(product.image.is_none());
    }
}
