//! Product management.

use tracing::{info, instrument};

use shophub_core::{CategoryId, Price, Product, ProductId};
use shophub_storefront::api::{ApiClient, ImageUpload, ProductForm, ProductQuery};

use crate::AdminError;

/// Product form as typed by the admin, before validation.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub category: String,
    pub image: Option<ImageUpload>,
}

impl ProductDraft {
    /// Prefill a draft from an existing product for editing.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
            category: product
                .category_id()
                .map(ToString::to_string)
                .unwrap_or_default(),
            image: None,
        }
    }

    /// Check the draft and convert it into a form the API accepts.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Invalid`] listing every failing field.
    pub fn validate(self) -> Result<ProductForm, AdminError> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("Product name is required".to_string());
        }

        let price = if self.price.trim().is_empty() {
            errors.push("Price is required".to_string());
            None
        } else {
            Price::parse(&self.price)
                .map_err(|e| errors.push(format!("Invalid price: {e}")))
                .ok()
        };

        let stock = self
            .stock
            .trim()
            .parse::<u32>()
            .map_err(|_| errors.push("Stock must be a whole number of 0 or more".to_string()))
            .ok();

        let category = self.category.trim();
        if category.is_empty() {
            errors.push("Please select a category".to_string());
        }

        match (price, stock) {
            (Some(price), Some(stock)) if errors.is_empty() => Ok(ProductForm {
                name: name.to_string(),
                description: self.description.trim().to_string(),
                price,
                category: CategoryId::new(category),
                stock,
                image: self.image,
            }),
            _ => Err(AdminError::Invalid(errors)),
        }
    }
}

/// Products whose name contains `term`, ignoring case. An empty term keeps
/// everything.
#[must_use]
pub fn filter_by_name<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let term = term.trim().to_lowercase();
    products
        .iter()
        .filter(|product| product.name.to_lowercase().contains(&term))
        .collect()
}

/// Every product in the catalog.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn list(client: &ApiClient) -> Result<Vec<Product>, AdminError> {
    Ok(client.products(&ProductQuery::default()).await?.data)
}

/// Validate `draft` and create the product.
///
/// # Errors
///
/// Returns an error if validation or the request fails.
#[instrument(skip(client, draft), fields(name = %draft.name))]
pub async fn create(client: &ApiClient, draft: ProductDraft) -> Result<Product, AdminError> {
    let product = client.create_product(draft.validate()?).await?;
    info!(product_id = %product.id, "product created");
    Ok(product)
}

/// Validate `draft` and replace product `id` with it.
///
/// # Errors
///
/// Returns an error if validation or the request fails.
#[instrument(skip(client, draft), fields(product_id = %id))]
pub async fn update(
    client: &ApiClient,
    id: &ProductId,
    draft: ProductDraft,
) -> Result<Product, AdminError> {
    let product = client.update_product(id, draft.validate()?).await?;
    info!("product updated");
    Ok(product)
}

/// Delete product `id`.
///
/// # Errors
///
/// Returns an error if the request fails.
#[instrument(skip(client), fields(product_id = %id))]
pub async fn delete(client: &ApiClient, id: &ProductId) -> Result<(), AdminError> {
    client.delete_product(id).await?;
    info!("product deleted");
    Ok(())
}
