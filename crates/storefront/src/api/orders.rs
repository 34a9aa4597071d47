//! Order endpoints. Never cached.

use reqwest::Method;
use tracing::instrument;

use shophub_core::{ApiEnvelope, NewOrder, Order, OrderId, OrderStatus};

use super::{ApiClient, ApiError, Body};

/// Filters for the order list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
}

impl ApiClient {
    /// List orders (admin only), optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn orders(&self, query: OrderQuery) -> Result<ApiEnvelope<Vec<Order>>, ApiError> {
        let status = query.status.map(|s| s.as_str()).unwrap_or_default();
        self.send(Method::GET, "/orders", &[("status", status)], Body::Empty)
            .await
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let envelope: ApiEnvelope<Order> = self
            .send(Method::GET, &format!("/orders/{id}"), &[], Body::Empty)
            .await?;
        Ok(envelope.data)
    }

    /// Place an order for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the order.
    #[instrument(skip(self, order), fields(items = order.items.len()))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        let body = Body::Json(serde_json::to_value(order)?);
        let envelope: ApiEnvelope<Order> = self.send(Method::POST, "/orders", &[], body).await?;
        Ok(envelope.data)
    }

    /// Move an order to a new status (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the change.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let body = Body::Json(serde_json::json!({ "status": status }));
        let envelope: ApiEnvelope<Order> = self
            .send(Method::PUT, &format!("/orders/{id}"), &[], body)
            .await?;
        Ok(envelope.data)
    }

    /// Orders placed by the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<ApiEnvelope<Vec<Order>>, ApiError> {
        self.send(Method::GET, "/orders/my-orders", &[], Body::Empty)
            .await
    }
}
