//! Order management.

use tracing::{info, instrument};

use shophub_core::{Order, OrderId, OrderStatus};
use shophub_storefront::api::{ApiClient, OrderQuery};

use crate::AdminError;

/// Length of the id prefix shown in order tables.
const SHORT_ID_LEN: usize = 8;

/// Orders, optionally only those in `status`.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn list(
    client: &ApiClient,
    status: Option<OrderStatus>,
) -> Result<Vec<Order>, AdminError> {
    Ok(client.orders(OrderQuery { status }).await?.data)
}

/// Move order `id` to `status`.
///
/// # Errors
///
/// Returns an error if the request fails.
#[instrument(skip(client), fields(order_id = %id, status = %status))]
pub async fn update_status(
    client: &ApiClient,
    id: &OrderId,
    status: OrderStatus,
) -> Result<Order, AdminError> {
    let order = client.update_order_status(id, status).await?;
    info!("order status updated");
    Ok(order)
}

/// First eight characters of the id followed by `...`.
#[must_use]
pub fn short_order_id(id: &OrderId) -> String {
    let prefix: String = id.as_str().chars().take(SHORT_ID_LEN).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_order_id() {
        assert_eq!(
            short_order_id(&OrderId::new("66a1b2c3d4e5f6a7b8c9d0e1")),
            "66a1b2c3..."
        );
        assert_eq!(short_order_id(&OrderId::new("abc")), "abc...");
    }
}
