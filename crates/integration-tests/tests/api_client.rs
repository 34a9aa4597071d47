//! REST client behavior against the in-process fake backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use secrecy::SecretString;

use shophub_core::{CategoryId, Credentials, Email, OrderStatus, Price, ProductId, Registration};
use shophub_integration_tests::{ADMIN_TOKEN, CUSTOMER_TOKEN, FakeShop, PASSWORD};
use shophub_storefront::api::{
    ApiClient, ApiError, CategoryInput, ImageUpload, OrderQuery, ProductForm, ProductQuery,
};
use shophub_storefront::session::SessionStore;
use shophub_storefront::storage::MemoryStorage;

fn session_with(token: &str) -> Arc<SessionStore<MemoryStorage>> {
    let session = Arc::new(SessionStore::new(MemoryStorage::new()));
    session.set_token(&SecretString::from(token));
    session
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_products_list_and_filters() {
    let shop = FakeShop::spawn().await;
    let client = ApiClient::anonymous(&shop.api_config());

    let all = client.products(&ProductQuery::default()).await.unwrap();
    assert_eq!(all.total(), 3);
    assert_eq!(all.data[0].category_name(), Some("Lighting"));
    assert_eq!(all.data[1].price, Price::from_cents(8999));

    let lighting = client.products(&ProductQuery::category("c1")).await.unwrap();
    assert_eq!(lighting.data.len(), 2);

    let lamps = client.products(&ProductQuery::search("LAMP")).await.unwrap();
    let names: Vec<_> = lamps.data.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Desk Lamp", "Floor Lamp"]);
}

#[tokio::test]
async fn test_catalog_reads_are_cached_until_a_write() {
    let shop = FakeShop::spawn().await;
    let client = ApiClient::new(&shop.api_config(), session_with(ADMIN_TOKEN));

    client.products(&ProductQuery::default()).await.unwrap();
    client.products(&ProductQuery::default()).await.unwrap();
    assert_eq!(shop.product_list_hits(), 1);

    // A different query is a different cache entry.
    client.products(&ProductQuery::search("note")).await.unwrap();
    assert_eq!(shop.product_list_hits(), 2);

    client.delete_product(&ProductId::new("p2")).await.unwrap();
    let after = client.products(&ProductQuery::default()).await.unwrap();
    assert_eq!(shop.product_list_hits(), 3);
    assert_eq!(after.data.len(), 2);
}

#[tokio::test]
async fn test_missing_product_maps_to_not_found() {
    let shop = FakeShop::spawn().await;
    let client = ApiClient::anonymous(&shop.api_config());

    let err = client.product(&ProductId::new("nope")).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Product not found");
}

#[tokio::test]
async fn test_category_detail_includes_products() {
    let shop = FakeShop::spawn().await;
    let client = ApiClient::anonymous(&shop.api_config());

    let categories = client.categories().await.unwrap();
    assert_eq!(categories.total(), 3);

    let lighting = client.category(&CategoryId::new("c1")).await.unwrap();
    assert_eq!(lighting.name, "Lighting");
    assert_eq!(lighting.products.len(), 2);
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_login_stores_session_and_token_is_sent() {
    let shop = FakeShop::spawn().await;
    let session = Arc::new(SessionStore::new(MemoryStorage::new()));
    let client = ApiClient::new(&shop.api_config(), session.clone());

    let auth = client
        .login(&Credentials {
            email: Email::parse("ada@example.com").unwrap(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();
    assert!(shop.last_authorization().is_none());
    session.sign_in(&auth);

    let me = client.me().await.unwrap();
    assert_eq!(me.name, "Ada");
    assert!(!me.is_admin());
    assert_eq!(
        shop.last_authorization().as_deref(),
        Some(format!("Bearer {CUSTOMER_TOKEN}").as_str())
    );

    session.sign_out();
    let err = client.me().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_bad_credentials_surface_server_message() {
    let shop = FakeShop::spawn().await;
    let client = ApiClient::anonymous(&shop.api_config());

    let err = client
        .login(&Credentials {
            email: Email::parse("ada@example.com").unwrap(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 401, ref message } if message == "Invalid credentials"));
}

#[tokio::test]
async fn test_register_returns_session() {
    let shop = FakeShop::spawn().await;
    let client = ApiClient::anonymous(&shop.api_config());

    let auth = client
        .register(&Registration {
            name: "Lin".to_string(),
            email: Email::parse("lin@example.com").unwrap(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(auth.token, CUSTOMER_TOKEN);
    assert_eq!(auth.user.name, "Lin");
}

// =============================================================================
// Writes
// =============================================================================

#[tokio::test]
async fn test_create_product_sends_multipart_with_image() {
    let shop = FakeShop::spawn().await;
    let client = ApiClient::new(&shop.api_config(), session_with(ADMIN_TOKEN));

    let product = client
        .create_product(ProductForm {
            name: "Reading Lamp".to_string(),
            description: "Clamp-on".to_string(),
            price: Price::from_cents(2450),
            category: CategoryId::new("c1"),
            stock: 7,
            image: Some(ImageUpload {
                file_name: "reading.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            }),
        })
        .await
        .unwrap();

    assert_eq!(product.name, "Reading Lamp");
    assert_eq!(product.price, Price::from_cents(2450));
    assert_eq!(product.stock, 7);
    assert_eq!(product.image.as_deref(), Some("/uploads/reading.png"));
    assert_eq!(product.category_name(), Some("Lighting"));
    assert_eq!(
        shop.last_multipart_fields(),
        vec!["name", "description", "price", "category", "stock", "image"]
    );
}

#[tokio::test]
async fn test_customer_cannot_write_catalog() {
    let shop = FakeShop::spawn().await;
    let client = ApiClient::new(&shop.api_config(), session_with(CUSTOMER_TOKEN));

    let err = client
        .create_category(&CategoryInput {
            name: "Garden".to_string(),
            description: String::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_orders_round_trip() {
    let shop = FakeShop::spawn().await;
    let admin = ApiClient::new(&shop.api_config(), session_with(ADMIN_TOKEN));
    let customer = ApiClient::new(&shop.api_config(), session_with(CUSTOMER_TOKEN));

    let pending = admin
        .orders(OrderQuery {
            status: Some(OrderStatus::Pending),
        })
        .await
        .unwrap();
    assert_eq!(pending.data.len(), 1);

    let order = pending.data[0].clone();
    let shipped = admin
        .update_order_status(&order.id, OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);
    assert_eq!(
        customer.order(&order.id).await.unwrap().status,
        OrderStatus::Shipped
    );

    let mine = customer.my_orders().await.unwrap();
    assert!(mine.data.iter().all(|o| {
        o.user
            .as_ref()
            .is_some_and(|u| u.email == "ada@example.com")
    }));
}

#[tokio::test]
async fn test_non_json_error_body_uses_fallback_message() {
    let shop = FakeShop::spawn().await;
    shop.break_orders();
    let client = ApiClient::new(&shop.api_config(), session_with(ADMIN_TOKEN));

    let err = client.orders(OrderQuery::default()).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Api { status: 500, ref message } if message == "Something went wrong"
    ));
}
