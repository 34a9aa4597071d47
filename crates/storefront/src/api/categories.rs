//! Category endpoints.

use reqwest::Method;
use serde::Serialize;
use serde::de::IgnoredAny;
use tracing::{debug, instrument};

use shophub_core::{ApiEnvelope, Category, CategoryId};

use super::cache::{CacheKey, CacheValue};
use super::{ApiClient, ApiError, Body};

/// Fields sent when creating or updating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: String,
}

impl ApiClient {
    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<ApiEnvelope<Vec<Category>>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.cache().get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: ApiEnvelope<Vec<Category>> = self
            .send(Method::GET, "/categories", &[], Body::Empty)
            .await?;

        self.cache()
            .insert(CacheKey::Categories, CacheValue::Categories(categories.clone()))
            .await;
        Ok(categories)
    }

    /// Fetch one category with its products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the category does not exist.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn category(&self, id: &CategoryId) -> Result<Category, ApiError> {
        let key = CacheKey::Category(id.clone());
        if let Some(CacheValue::Category(category)) = self.cache().get(&key).await {
            debug!("Cache hit for category");
            return Ok(*category);
        }

        let envelope: ApiEnvelope<Category> = self
            .send(Method::GET, &format!("/categories/{id}"), &[], Body::Empty)
            .await?;

        self.cache()
            .insert(key, CacheValue::Category(Box::new(envelope.data.clone())))
            .await;
        Ok(envelope.data)
    }

    /// Create a category (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the input.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        let body = Body::Json(serde_json::to_value(input)?);
        let envelope: ApiEnvelope<Category> =
            self.send(Method::POST, "/categories", &[], body).await?;
        self.invalidate_catalog();
        Ok(envelope.data)
    }

    /// Update a category (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the input.
    #[instrument(skip(self, input), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        let body = Body::Json(serde_json::to_value(input)?);
        let envelope: ApiEnvelope<Category> = self
            .send(Method::PUT, &format!("/categories/{id}"), &[], body)
            .await?;
        self.invalidate_catalog();
        Ok(envelope.data)
    }

    /// Delete a category (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, e.g. the category still has
    /// products.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .send(Method::DELETE, &format!("/categories/{id}"), &[], Body::Empty)
            .await?;
        self.invalidate_catalog();
        Ok(())
    }
}
