//! Cache types for catalog reads.

use shophub_core::{ApiEnvelope, Category, CategoryId, Product, ProductId};

use super::products::ProductQuery;

/// Cache key for products and categories.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products(ProductQuery),
    Category(CategoryId),
    Categories,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(ApiEnvelope<Vec<Product>>),
    Category(Box<Category>),
    Categories(ApiEnvelope<Vec<Category>>),
}
