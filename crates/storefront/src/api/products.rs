//! Product endpoints.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::de::IgnoredAny;
use tracing::{debug, instrument};

use shophub_core::{ApiEnvelope, CategoryId, Price, Product, ProductId};

use super::cache::{CacheKey, CacheValue};
use super::{ApiClient, ApiError, Body};

/// Filters for the product list.
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Option<CategoryId>,
    pub search: Option<String>,
}

impl ProductQuery {
    /// Products in one category.
    #[must_use]
    pub fn category(id: impl Into<CategoryId>) -> Self {
        Self {
            category: Some(id.into()),
            search: None,
        }
    }

    /// Products whose name matches `term`.
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            category: None,
            search: Some(term.into()),
        }
    }

    fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category", category.as_str()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.as_str()));
        }
        pairs
    }
}

/// Image file attached to a product form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Fields sent when creating or updating a product.
#[derive(Debug, Clone)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: CategoryId,
    pub stock: u32,
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    /// Encode as a multipart form, the way the product endpoints expect it.
    ///
    /// # Errors
    ///
    /// Returns an error if the image content type is not a valid MIME type.
    pub fn into_multipart(self) -> Result<Form, ApiError> {
        let mut form = Form::new()
            .text("name", self.name)
            .text("description", self.description)
            .text("price", self.price.amount().normalize().to_string())
            .text("category", self.category.into_inner())
            .text("stock", self.stock.to_string());

        if let Some(image) = self.image {
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)?;
            form = form.part("image", part);
        }

        Ok(form)
    }
}

impl ApiClient {
    /// List products, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<ApiEnvelope<Vec<Product>>, ApiError> {
        let key = CacheKey::Products(query.clone());
        if let Some(CacheValue::Products(products)) = self.cache().get(&key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: ApiEnvelope<Vec<Product>> = self
            .send(Method::GET, "/products", &query.pairs(), Body::Empty)
            .await?;

        self.cache()
            .insert(key, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.cache().get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let envelope: ApiEnvelope<Product> = self
            .send(Method::GET, &format!("/products/{id}"), &[], Body::Empty)
            .await?;

        self.cache()
            .insert(key, CacheValue::Product(Box::new(envelope.data.clone())))
            .await;
        Ok(envelope.data)
    }

    /// Create a product (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the form.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create_product(&self, form: ProductForm) -> Result<Product, ApiError> {
        let body = Body::Multipart(form.into_multipart()?);
        let envelope: ApiEnvelope<Product> =
            self.send(Method::POST, "/products", &[], body).await?;
        self.invalidate_catalog();
        Ok(envelope.data)
    }

    /// Replace a product's fields (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the form.
    #[instrument(skip(self, form), fields(product_id = %id))]
    pub async fn update_product(&self, id: &ProductId, form: ProductForm) -> Result<Product, ApiError> {
        let body = Body::Multipart(form.into_multipart()?);
        let envelope: ApiEnvelope<Product> = self
            .send(Method::PUT, &format!("/products/{id}"), &[], body)
            .await?;
        self.invalidate_catalog();
        Ok(envelope.data)
    }

    /// Delete a product (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .send(Method::DELETE, &format!("/products/{id}"), &[], Body::Empty)
            .await?;
        self.invalidate_catalog();
        Ok(())
    }
}
