//! Category management.

use tracing::{info, instrument};

use shophub_core::{Category, CategoryId};
use shophub_storefront::api::{ApiClient, CategoryInput};

use crate::AdminError;

/// Category form. `id` is set when editing an existing category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub id: Option<CategoryId>,
    pub name: String,
    pub description: String,
}

impl CategoryDraft {
    /// Prefill a draft from an existing category for editing.
    #[must_use]
    pub fn from_category(category: &Category) -> Self {
        Self {
            id: Some(category.id.clone()),
            name: category.name.clone(),
            description: category.description.clone(),
        }
    }

    /// Check the draft and convert it into API input.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Invalid`] if the name is blank.
    pub fn to_input(&self) -> Result<CategoryInput, AdminError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AdminError::invalid("Category name is required"));
        }
        Ok(CategoryInput {
            name: name.to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

/// Every category.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn list(client: &ApiClient) -> Result<Vec<Category>, AdminError> {
    Ok(client.categories().await?.data)
}

/// Create the category, or update it when the draft carries an id.
///
/// # Errors
///
/// Returns an error if validation or the request fails.
#[instrument(skip(client, draft), fields(name = %draft.name))]
pub async fn save(client: &ApiClient, draft: &CategoryDraft) -> Result<Category, AdminError> {
    let input = draft.to_input()?;
    let category = match &draft.id {
        Some(id) => client.update_category(id, &input).await?,
        None => client.create_category(&input).await?,
    };
    info!(
        category_id = %category.id,
        updated = draft.id.is_some(),
        "category saved"
    );
    Ok(category)
}

/// Delete category `id`.
///
/// # Errors
///
/// Returns an error if the request fails.
#[instrument(skip(client), fields(category_id = %id))]
pub async fn delete(client: &ApiClient, id: &CategoryId) -> Result<(), AdminError> {
    client.delete_category(id).await?;
    info!("category deleted");
    Ok(())
}
