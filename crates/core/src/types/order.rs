//! Order records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{OrderId, ProductId};
use super::price::Price;
use super::status::OrderStatus;

/// An order as listed in the back-office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    /// Customer who placed the order; absent for deleted accounts.
    #[serde(default)]
    pub user: Option<OrderCustomer>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total: Price,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Customer details populated on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCustomer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub product: Option<ProductId>,
    #[serde(default)]
    pub name: String,
    pub price: Price,
    pub quantity: u32,
}

/// Request body for creating an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<NewOrderItem>,
    pub shipping_address: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One requested line of a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrderItem {
    pub product: ProductId,
    pub quantity: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_order_deserialize() {
        let order: Order = serde_json::from_value(json!({
            "_id": "66a1b2c3d4e5f6a7b8c9d0e1",
            "user": { "name": "Ada", "email": "ada@example.com" },
            "items": [
                { "product": "p1", "name": "Lamp", "price": 10, "quantity": 2 }
            ],
            "total": 20,
            "status": "processing",
            "createdAt": "2025-01-05T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total, Price::from_cents(2000));
        assert_eq!(order.user.unwrap().name, "Ada");
    }
}
