//! Browse, fill the cart, sign in and check out, end to end.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::TempDir;

use shophub_core::{Credentials, Email, Price, ProductId};
use shophub_integration_tests::{FakeShop, PASSWORD};
use shophub_storefront::api::{ApiClient, ProductQuery};
use shophub_storefront::cart::{CartStore, ProductSnapshot};
use shophub_storefront::checkout::{CheckoutError, CheckoutForm, place_order, prepare_order};
use shophub_storefront::config::CheckoutConfig;
use shophub_storefront::session::{Access, GuardDecision, SessionStore};
use shophub_storefront::storage::FileStorage;

fn form() -> CheckoutForm {
    CheckoutForm {
        name: "Ada Lovelace".to_string(),
        phone: "+254 700 000000".to_string(),
        address: "12 Analytical Way".to_string(),
        notes: "Ring twice".to_string(),
    }
}

#[tokio::test]
async fn test_shopper_journey() {
    let shop = FakeShop::spawn().await;
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));
    let session = Arc::new(SessionStore::new(Arc::clone(&storage)));
    let client = ApiClient::new(&shop.api_config(), session.clone());
    let cart = CartStore::new(Arc::clone(&storage));

    let changes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&changes);
    let _badge = cart.subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    // Browse and add: quantities beyond stock are capped.
    let lamps = client.products(&ProductQuery::search("desk")).await.unwrap();
    let desk_lamp = ProductSnapshot::from(&lamps.data[0]);
    cart.add(&desk_lamp, 4);
    cart.add(&desk_lamp, 4);
    assert_eq!(cart.quantity_of(&desk_lamp.id), 5);

    let notebook = client.product(&ProductId::new("p3")).await.unwrap();
    cart.add(&ProductSnapshot::from(&notebook), 2);
    assert_eq!(cart.total(), Price::from_cents(13_200));
    assert_eq!(changes.load(Ordering::SeqCst), 3);

    // Order history needs a signed-in user.
    assert_eq!(
        session.guard(Access::Authenticated),
        GuardDecision::RedirectToLogin
    );
    let auth = client
        .login(&Credentials {
            email: Email::parse("ada@example.com").unwrap(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();
    session.sign_in(&auth);
    assert!(session.guard(Access::Authenticated).is_allowed());
    assert_eq!(
        session.guard(Access::AdminOnly),
        GuardDecision::RedirectToHome
    );

    // Record the order with the store, then hand off to WhatsApp.
    let before = shop.order_count();
    let recorded = client
        .create_order(&form().to_new_order(&cart.lines()))
        .await
        .unwrap();
    assert_eq!(recorded.total, Price::from_cents(13_200));
    assert_eq!(shop.order_count(), before + 1);

    let receipt = place_order(&cart, &CheckoutConfig::default(), &form()).unwrap();
    assert_eq!(receipt.item_count, 7);
    assert!(receipt.message.contains("1. Desk Lamp\n   Qty: 5 x $25.00 = $125.00"));
    assert!(receipt.message.contains("*Total: $132.00*"));
    assert!(receipt.message.contains("Ring twice"));
    assert_eq!(receipt.whatsapp_url.host_str(), Some("wa.me"));
    assert_eq!(receipt.whatsapp_url.path(), "/254114087028");

    // The hand-off empties the cart and tells observers.
    assert!(cart.is_empty());
    assert_eq!(changes.load(Ordering::SeqCst), 4);

    // The session outlives the cart.
    let reopened = SessionStore::new(FileStorage::new(dir.path()));
    assert_eq!(reopened.user().unwrap().name, "Ada");
}

#[tokio::test]
async fn test_recorded_checkout_keeps_cart_until_order_is_stored() {
    let shop = FakeShop::spawn().await;
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));
    let session = Arc::new(SessionStore::new(Arc::clone(&storage)));
    let client = ApiClient::new(&shop.api_config(), session.clone());
    let cart = CartStore::new(Arc::clone(&storage));
    cart.add(
        &ProductSnapshot::new("p3", "Notebook", Price::from_cents(350), 100),
        2,
    );

    // Not signed in: recording fails and the cart is untouched.
    let pending = prepare_order(&cart, &CheckoutConfig::default(), &form()).unwrap();
    let err = client
        .create_order(&form().to_new_order(&pending.lines))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(cart.item_count(), 2);

    let auth = client
        .login(&Credentials {
            email: Email::parse("ada@example.com").unwrap(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();
    session.sign_in(&auth);

    let before = shop.order_count();
    let pending = prepare_order(&cart, &CheckoutConfig::default(), &form()).unwrap();
    client
        .create_order(&form().to_new_order(&pending.lines))
        .await
        .unwrap();
    assert_eq!(shop.order_count(), before + 1);

    let receipt = pending.complete(&cart);
    assert_eq!(receipt.total, Price::from_cents(700));
    assert!(cart.is_empty());
}

#[test]
fn test_checkout_with_invalid_form_keeps_cart() {
    let dir = TempDir::new().unwrap();
    let cart = CartStore::new(FileStorage::new(dir.path()));
    cart.add(
        &ProductSnapshot::new("p3", "Notebook", Price::from_cents(350), 100),
        3,
    );

    let form = CheckoutForm {
        phone: "not a phone".to_string(),
        ..form()
    };
    let err = place_order(&cart, &CheckoutConfig::default(), &form).unwrap_err();
    assert!(matches!(err, CheckoutError::Invalid(ref fields) if fields.len() == 1));
    assert_eq!(cart.item_count(), 3);
}

#[test]
fn test_custom_store_name_and_number() {
    let dir = TempDir::new().unwrap();
    let cart = CartStore::new(FileStorage::new(dir.path()));
    cart.add(
        &ProductSnapshot::new("p3", "Notebook", Price::from_cents(350), 100),
        1,
    );

    let config = CheckoutConfig {
        whatsapp_number: "15551234567".to_string(),
        store_name: "Corner Shop".to_string(),
    };
    let receipt = place_order(&cart, &config, &form()).unwrap();
    assert!(receipt.message.starts_with("*New Order from Corner Shop*"));
    assert!(receipt.message.ends_with("_Generated from Corner Shop eCommerce_"));
    assert_eq!(receipt.whatsapp_url.path(), "/15551234567");
}
