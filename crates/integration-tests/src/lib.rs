//! Integration tests for ShopHub.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shophub-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - cart scenarios over file storage, property tests
//! - `api_client` - REST client against [`FakeShop`]
//! - `checkout_flow` - cart to WhatsApp hand-off, session guard
//! - `admin_backoffice` - dashboard and catalog management
//!
//! [`FakeShop`] is an in-process axum server speaking the ShopHub REST API
//! over a small seeded catalog. Tests talk to it through the real
//! [`ApiClient`](shophub_storefront::api::ApiClient).

#![allow(clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

use shophub_storefront::config::ApiConfig;

/// Bearer token the fake issues to administrators.
pub const ADMIN_TOKEN: &str = "admin-token";
/// Bearer token the fake issues to customers.
pub const CUSTOMER_TOKEN: &str = "customer-token";
/// The only password the fake accepts.
pub const PASSWORD: &str = "secret";

const CUSTOMER_EMAIL: &str = "ada@example.com";

/// Running fake REST backend.
pub struct FakeShop {
    pub base_url: Url,
    state: Arc<ShopState>,
}

impl FakeShop {
    /// Start a fake on an ephemeral localhost port.
    pub async fn spawn() -> Self {
        let state = Arc::new(ShopState::seeded());
        let app = router(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake shop listener");
        let addr = listener.local_addr().expect("fake shop address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake shop server");
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/api")).expect("fake shop url"),
            state,
        }
    }

    /// Client configuration pointing at this fake.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.base_url.clone())
    }

    /// Number of `GET /products` requests served so far.
    #[must_use]
    pub fn product_list_hits(&self) -> usize {
        self.state.product_list_hits.load(Ordering::SeqCst)
    }

    /// `Authorization` header of the most recent request.
    #[must_use]
    pub fn last_authorization(&self) -> Option<String> {
        lock(&self.state.last_authorization).clone()
    }

    /// Field names of the most recent multipart upload, in order.
    #[must_use]
    pub fn last_multipart_fields(&self) -> Vec<String> {
        lock(&self.state.last_multipart_fields).clone()
    }

    /// Make the order list fail with a bare 500.
    pub fn break_orders(&self) {
        self.state.orders_broken.store(true, Ordering::SeqCst);
    }

    /// Number of orders stored.
    #[must_use]
    pub fn order_count(&self) -> usize {
        lock(&self.state.orders).len()
    }
}

#[derive(Default)]
struct ShopState {
    products: Mutex<Vec<Value>>,
    categories: Mutex<Vec<Value>>,
    orders: Mutex<Vec<Value>>,
    next_id: AtomicUsize,
    product_list_hits: AtomicUsize,
    orders_broken: AtomicBool,
    last_authorization: Mutex<Option<String>>,
    last_multipart_fields: Mutex<Vec<String>>,
}

impl ShopState {
    fn seeded() -> Self {
        let lighting = json!({ "_id": "c1", "name": "Lighting" });
        let stationery = json!({ "_id": "c2", "name": "Stationery" });

        Self {
            categories: Mutex::new(vec![
                json!({ "_id": "c1", "name": "Lighting", "description": "Lamps and bulbs" }),
                json!({ "_id": "c2", "name": "Stationery", "description": "Paper goods" }),
                json!({ "_id": "c3", "name": "Empty", "description": "" }),
            ]),
            products: Mutex::new(vec![
                json!({
                    "_id": "p1", "name": "Desk Lamp", "description": "Warm light",
                    "price": 25, "stock": 5, "image": "/uploads/lamp.png",
                    "category": lighting
                }),
                json!({
                    "_id": "p2", "name": "Floor Lamp", "description": "Tall",
                    "price": 89.99, "stock": 0, "category": lighting
                }),
                json!({
                    "_id": "p3", "name": "Notebook", "description": "A5 dotted",
                    "price": 3.5, "stock": 100, "category": stationery
                }),
            ]),
            orders: Mutex::new(vec![
                json!({
                    "_id": "66a1b2c3d4e5f6a7b8c9d0e1",
                    "user": { "name": "Ada", "email": CUSTOMER_EMAIL },
                    "items": [{ "product": "p1", "name": "Desk Lamp", "price": 25, "quantity": 2 }],
                    "total": 50, "status": "pending",
                    "createdAt": "2025-01-05T10:00:00.000Z"
                }),
                json!({
                    "_id": "77b2c3d4e5f6a7b8c9d0e1f2",
                    "user": { "name": "Grace", "email": "grace@example.com" },
                    "items": [{ "product": "p3", "name": "Notebook", "price": 3.5, "quantity": 3 }],
                    "total": 10.5, "status": "delivered",
                    "createdAt": "2025-02-10T08:30:00.000Z"
                }),
            ]),
            next_id: AtomicUsize::new(100),
            ..Self::default()
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn category_summary(&self, id: &str) -> Value {
        lock(&self.categories)
            .iter()
            .find(|c| c.get("_id").and_then(Value::as_str) == Some(id))
            .map_or_else(
                || json!(id),
                |c| json!({ "_id": id, "name": c.get("name").cloned().unwrap_or_default() }),
            )
    }
}

fn router(state: Arc<ShopState>) -> Router {
    Router::new()
        .route("/api/auth/login", axum::routing::post(login))
        .route("/api/auth/register", axum::routing::post(register))
        .route("/api/auth/me", get(me))
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/my-orders", get(my_orders))
        .route("/api/orders/{id}", get(get_order).put(update_order))
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

type Shared = State<Arc<ShopState>>;

async fn login(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record_auth(&state, &headers);
    let email = str_field(&body, "email");
    if str_field(&body, "password") != PASSWORD {
        return fail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    session_for(&email, "Ada")
}

async fn register(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record_auth(&state, &headers);
    let email = str_field(&body, "email");
    if email.starts_with("taken") {
        return fail(StatusCode::BAD_REQUEST, "User already exists");
    }
    session_for(&email, &str_field(&body, "name"))
}

async fn me(State(state): Shared, headers: HeaderMap) -> Response {
    match role(&state, &headers) {
        Some(Role::Admin) => ok(user_json("admin@example.com", "Grace", "admin")),
        Some(Role::Customer) => ok(user_json(CUSTOMER_EMAIL, "Ada", "user")),
        None => fail(StatusCode::UNAUTHORIZED, "Not authorized, no token"),
    }
}

#[derive(Deserialize)]
struct ProductParams {
    category: Option<String>,
    search: Option<String>,
}

async fn list_products(
    State(state): Shared,
    headers: HeaderMap,
    Query(params): Query<ProductParams>,
) -> Response {
    record_auth(&state, &headers);
    state.product_list_hits.fetch_add(1, Ordering::SeqCst);

    let search = params.search.map(|s| s.to_lowercase());
    let products: Vec<Value> = lock(&state.products)
        .iter()
        .filter(|p| {
            params
                .category
                .as_deref()
                .is_none_or(|c| category_of(p) == Some(c))
        })
        .filter(|p| {
            search
                .as_deref()
                .is_none_or(|s| str_field(p, "name").to_lowercase().contains(s))
        })
        .cloned()
        .collect();
    list(products)
}

async fn get_product(State(state): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    record_auth(&state, &headers);
    find(&state.products, &id).map_or_else(|| fail(StatusCode::NOT_FOUND, "Product not found"), ok)
}

async fn create_product(State(state): Shared, headers: HeaderMap, multipart: Multipart) -> Response {
    if role(&state, &headers) != Some(Role::Admin) {
        return fail(StatusCode::FORBIDDEN, "Not authorized as an admin");
    }
    let id = state.next_id("p");
    let product = product_from_form(&state, &id, multipart).await;
    lock(&state.products).push(product.clone());
    ok(product)
}

async fn update_product(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    if role(&state, &headers) != Some(Role::Admin) {
        return fail(StatusCode::FORBIDDEN, "Not authorized as an admin");
    }
    let product = product_from_form(&state, &id, multipart).await;
    if replace(&state.products, &id, product.clone()) {
        ok(product)
    } else {
        fail(StatusCode::NOT_FOUND, "Product not found")
    }
}

async fn delete_product(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if role(&state, &headers) != Some(Role::Admin) {
        return fail(StatusCode::FORBIDDEN, "Not authorized as an admin");
    }
    lock(&state.products).retain(|p| str_field(p, "_id") != id);
    ok(json!({}))
}

async fn list_categories(State(state): Shared, headers: HeaderMap) -> Response {
    record_auth(&state, &headers);
    list(lock(&state.categories).clone())
}

async fn get_category(State(state): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    record_auth(&state, &headers);
    let Some(mut category) = find(&state.categories, &id) else {
        return fail(StatusCode::NOT_FOUND, "Category not found");
    };
    let products: Vec<Value> = lock(&state.products)
        .iter()
        .filter(|p| category_of(p) == Some(id.as_str()))
        .cloned()
        .collect();
    if let Some(object) = category.as_object_mut() {
        object.insert("products".to_string(), Value::Array(products));
    }
    ok(category)
}

async fn create_category(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if role(&state, &headers) != Some(Role::Admin) {
        return fail(StatusCode::FORBIDDEN, "Not authorized as an admin");
    }
    let category = json!({
        "_id": state.next_id("c"),
        "name": str_field(&body, "name"),
        "description": str_field(&body, "description"),
    });
    lock(&state.categories).push(category.clone());
    ok(category)
}

async fn update_category(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if role(&state, &headers) != Some(Role::Admin) {
        return fail(StatusCode::FORBIDDEN, "Not authorized as an admin");
    }
    let category = json!({
        "_id": id,
        "name": str_field(&body, "name"),
        "description": str_field(&body, "description"),
    });
    if replace(&state.categories, &id, category.clone()) {
        ok(category)
    } else {
        fail(StatusCode::NOT_FOUND, "Category not found")
    }
}

async fn delete_category(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if role(&state, &headers) != Some(Role::Admin) {
        return fail(StatusCode::FORBIDDEN, "Not authorized as an admin");
    }
    let in_use = lock(&state.products)
        .iter()
        .any(|p| category_of(p) == Some(id.as_str()));
    if in_use {
        return fail(
            StatusCode::BAD_REQUEST,
            "Cannot delete category with existing products",
        );
    }
    lock(&state.categories).retain(|c| str_field(c, "_id") != id);
    ok(json!({}))
}

#[derive(Deserialize)]
struct OrderParams {
    status: Option<String>,
}

async fn list_orders(
    State(state): Shared,
    headers: HeaderMap,
    Query(params): Query<OrderParams>,
) -> Response {
    if role(&state, &headers) != Some(Role::Admin) {
        return fail(StatusCode::FORBIDDEN, "Not authorized as an admin");
    }
    if state.orders_broken.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }
    let orders: Vec<Value> = lock(&state.orders)
        .iter()
        .filter(|o| {
            params
                .status
                .as_deref()
                .is_none_or(|s| str_field(o, "status") == s)
        })
        .cloned()
        .collect();
    list(orders)
}

async fn my_orders(State(state): Shared, headers: HeaderMap) -> Response {
    if role(&state, &headers).is_none() {
        return fail(StatusCode::UNAUTHORIZED, "Not authorized, no token");
    }
    let orders: Vec<Value> = lock(&state.orders)
        .iter()
        .filter(|o| o.pointer("/user/email").and_then(Value::as_str) == Some(CUSTOMER_EMAIL))
        .cloned()
        .collect();
    list(orders)
}

async fn get_order(State(state): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if role(&state, &headers).is_none() {
        return fail(StatusCode::UNAUTHORIZED, "Not authorized, no token");
    }
    find(&state.orders, &id).map_or_else(|| fail(StatusCode::NOT_FOUND, "Order not found"), ok)
}

async fn create_order(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if role(&state, &headers).is_none() {
        return fail(StatusCode::UNAUTHORIZED, "Not authorized, no token");
    }

    let mut items = Vec::new();
    let mut total = 0.0;
    for item in body.get("items").and_then(Value::as_array).into_iter().flatten() {
        let product_id = str_field(item, "product");
        let quantity = item.get("quantity").and_then(Value::as_u64).unwrap_or(0);
        let Some(product) = find(&state.products, &product_id) else {
            return fail(StatusCode::NOT_FOUND, "Product not found");
        };
        let price = product.get("price").and_then(Value::as_f64).unwrap_or(0.0);
        #[allow(clippy::cast_precision_loss)]
        let line = price * quantity as f64;
        total += line;
        items.push(json!({
            "product": product_id,
            "name": str_field(&product, "name"),
            "price": price,
            "quantity": quantity,
        }));
    }
    if items.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "No order items");
    }

    let order = json!({
        "_id": state.next_id("o"),
        "user": { "name": "Ada", "email": CUSTOMER_EMAIL },
        "items": items,
        "total": total,
        "status": "pending",
        "shippingAddress": str_field(&body, "shippingAddress"),
        "phone": str_field(&body, "phone"),
        "createdAt": "2025-03-01T12:00:00.000Z",
    });
    lock(&state.orders).push(order.clone());
    ok(order)
}

async fn update_order(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if role(&state, &headers) != Some(Role::Admin) {
        return fail(StatusCode::FORBIDDEN, "Not authorized as an admin");
    }
    let Some(mut order) = find(&state.orders, &id) else {
        return fail(StatusCode::NOT_FOUND, "Order not found");
    };
    if let Some(object) = order.as_object_mut() {
        object.insert("status".to_string(), json!(str_field(&body, "status")));
    }
    replace(&state.orders, &id, order.clone());
    ok(order)
}

// =============================================================================
// Helper Functions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Admin,
    Customer,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn record_auth(state: &ShopState, headers: &HeaderMap) {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *lock(&state.last_authorization) = value;
}

fn role(state: &ShopState, headers: &HeaderMap) -> Option<Role> {
    record_auth(state, headers);
    match lock(&state.last_authorization).as_deref() {
        Some(auth) if auth == format!("Bearer {ADMIN_TOKEN}") => Some(Role::Admin),
        Some(auth) if auth == format!("Bearer {CUSTOMER_TOKEN}") => Some(Role::Customer),
        _ => None,
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn category_of(product: &Value) -> Option<&str> {
    let category = product.get("category")?;
    category
        .get("_id")
        .and_then(Value::as_str)
        .or_else(|| category.as_str())
}

fn find(records: &Mutex<Vec<Value>>, id: &str) -> Option<Value> {
    lock(records)
        .iter()
        .find(|r| r.get("_id").and_then(Value::as_str) == Some(id))
        .cloned()
}

fn replace(records: &Mutex<Vec<Value>>, id: &str, record: Value) -> bool {
    let mut records = lock(records);
    records
        .iter_mut()
        .find(|r| r.get("_id").and_then(Value::as_str) == Some(id))
        .map(|slot| *slot = record)
        .is_some()
}

async fn product_from_form(state: &ShopState, id: &str, mut multipart: Multipart) -> Value {
    let mut fields = Vec::new();
    let mut product = json!({ "_id": id });

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let _ = field.bytes().await;
            product["image"] = json!(format!("/uploads/{file_name}"));
        } else {
            let text = field.text().await.unwrap_or_default();
            product[name.as_str()] = match name.as_str() {
                "price" => json!(text.parse::<f64>().unwrap_or(0.0)),
                "stock" => json!(text.parse::<u64>().unwrap_or(0)),
                "category" => state.category_summary(&text),
                _ => json!(text),
            };
        }
        fields.push(name);
    }

    *lock(&state.last_multipart_fields) = fields;
    product
}

fn session_for(email: &str, name: &str) -> Response {
    let (token, role) = if email.starts_with("admin") {
        (ADMIN_TOKEN, "admin")
    } else {
        (CUSTOMER_TOKEN, "user")
    };
    Json(json!({
        "success": true,
        "token": token,
        "user": user_json(email, name, role),
    }))
    .into_response()
}

fn user_json(email: &str, name: &str, role: &str) -> Value {
    json!({ "_id": format!("u-{name}"), "name": name, "email": email, "role": role })
}

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

fn list(data: Vec<Value>) -> Response {
    Json(json!({ "success": true, "count": data.len(), "data": data })).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}
