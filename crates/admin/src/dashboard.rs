//! Dashboard statistics.

use tracing::instrument;

use shophub_core::Price;
use shophub_storefront::api::{ApiClient, OrderQuery, ProductQuery};

use crate::AdminError;

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_categories: usize,
    pub total_orders: usize,
    /// Sum of the totals of the orders returned by the order list.
    pub total_revenue: Price,
}

impl DashboardStats {
    /// Fetch products, categories and orders concurrently and summarize them.
    ///
    /// # Errors
    ///
    /// Returns the first failing request's error.
    #[instrument(skip(client))]
    pub async fn fetch(client: &ApiClient) -> Result<Self, AdminError> {
        let product_query = ProductQuery::default();
        let (products, categories, orders) = tokio::try_join!(
            client.products(&product_query),
            client.categories(),
            client.orders(OrderQuery::default()),
        )?;

        Ok(Self {
            total_products: products.total(),
            total_categories: categories.total(),
            total_orders: orders.total(),
            total_revenue: orders.data.iter().map(|order| order.total).sum(),
        })
    }
}
