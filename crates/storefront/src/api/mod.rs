//! REST API client.
//!
//! # Architecture
//!
//! - Thin wrapper over `reqwest`: every call is one request against
//!   `<base_url><endpoint>`
//! - The bearer token is read from a [`TokenSource`] per request, so signing
//!   in or out takes effect immediately
//! - Catalog reads (products, categories) are cached via `moka`; any catalog
//!   write clears the cache
//!
//! # Errors
//!
//! Non-2xx responses become [`ApiError::Api`] carrying the server's
//! `message` field, or `"Something went wrong"` when there is none.
//!
//! # Example
//!
//! ```rust,ignore
//! use shophub_storefront::api::{ApiClient, ProductQuery};
//!
//! let client = ApiClient::new(&config.api, session.clone());
//! let lamps = client.products(&ProductQuery::search("lamp")).await?;
//! ```

mod auth;
mod cache;
mod categories;
mod orders;
mod products;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::session::{Anonymous, TokenSource};

use cache::{CacheKey, CacheValue};

pub use categories::CategoryInput;
pub use orders::OrderQuery;
pub use products::{ImageUpload, ProductForm, ProductQuery};

/// Message used when a failed response carries none.
const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

/// Errors that can occur when talking to the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The endpoint could not be turned into a URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The stored token cannot be sent as a header.
    #[error("Invalid bearer token")]
    InvalidToken,
}

impl ApiError {
    /// HTTP status for API errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the API rejected the credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Returns true if the API reported a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }
}

/// Request body.
#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(serde_json::Value),
    /// Multipart upload; the content type (with boundary) is set by `reqwest`.
    Multipart(reqwest::multipart::Form),
}

/// Client for the ShopHub REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client that authenticates with tokens from `tokens`.
    #[must_use]
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenSource>) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                http: reqwest::Client::new(),
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                tokens,
                cache,
            }),
        }
    }

    /// Create a client that never sends a bearer token.
    #[must_use]
    pub fn anonymous(config: &ApiConfig) -> Self {
        Self::new(config, Arc::new(Anonymous))
    }

    /// Resolve an endpoint such as `/products` against the base URL.
    ///
    /// Empty query values are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the result is not a valid URL.
    pub fn url(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}{endpoint}", self.inner.base_url))?;
        let pairs: Vec<_> = query.iter().filter(|(_, v)| !v.is_empty()).collect();
        if !pairs.is_empty() {
            let mut serializer = url.query_pairs_mut();
            for (key, value) in pairs {
                serializer.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Build a request with JSON content type and bearer token applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or a header value is invalid.
    pub fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Body,
    ) -> Result<reqwest::Request, ApiError> {
        let url = self.url(endpoint, query)?;
        let mut builder = self.inner.http.request(method, url);

        builder = match body {
            Body::Empty => builder.header(CONTENT_TYPE, "application/json"),
            Body::Json(value) => builder.json(&value),
            Body::Multipart(form) => builder.multipart(form),
        };

        if let Some(token) = self.inner.tokens.token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| ApiError::InvalidToken)?;
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }

        Ok(builder.build()?)
    }

    /// Send a request and decode the JSON response.
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Body,
    ) -> Result<T, ApiError> {
        let request = self.request(method, endpoint, query, body)?;
        debug!(method = %request.method(), url = %request.url(), "API request");

        let response = self.inner.http.execute(request).await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let parsed = serde_json::from_slice::<serde_json::Value>(&bytes);

        if !status.is_success() {
            let message = parsed
                .ok()
                .as_ref()
                .and_then(|body| body.get("message"))
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| FALLBACK_ERROR_MESSAGE.to_string(), str::to_string);
            debug!(status = status.as_u16(), %message, "API error response");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_value(parsed?)?)
    }

    /// Drop every cached catalog read.
    pub fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
    }

    fn cache(&self) -> &Cache<CacheKey, CacheValue> {
        &self.inner.cache
    }
}
