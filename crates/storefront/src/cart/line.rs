//! Cart line and product snapshot types.

use serde::{Deserialize, Serialize};

use shophub_core::{Price, Product, ProductId};

/// One product entry in the cart.
///
/// Field names on the wire follow the stored cart format:
/// `{"_id", "name", "price", "image", "stock", "quantity"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "_id")]
    pub product_id: ProductId,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Price,
    #[serde(rename = "image", default)]
    pub image_ref: Option<String>,
    /// Stock available when the product was added. Bounds `quantity`.
    #[serde(rename = "stock")]
    pub stock_limit: u32,
    pub quantity: u32,
}

impl CartLine {
    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Product fields copied into the cart when a line is created.
///
/// The snapshot is never refreshed, so it may drift from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub image_ref: Option<String>,
    pub stock_limit: u32,
}

impl ProductSnapshot {
    /// Build a snapshot from its parts.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, unit_price: Price, stock_limit: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            image_ref: None,
            stock_limit,
        }
    }

    /// Attach an image reference.
    #[must_use]
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub(crate) fn into_line(self, quantity: u32) -> CartLine {
        CartLine {
            product_id: self.id,
            name: self.name,
            unit_price: self.unit_price,
            image_ref: self.image_ref,
            stock_limit: self.stock_limit,
            quantity,
        }
    }
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            image_ref: product.image.clone(),
            stock_limit: product.stock,
        }
    }
}
