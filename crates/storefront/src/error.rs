//! Unified error handling.
//!
//! Front-ends work with a single [`AppError`] and use
//! [`AppError::user_message`] for anything shown to the customer, so
//! transport and parse details only reach the logs.

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// REST API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Durable storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Checkout was rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not signed in or lacks the required role.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Message safe to show to the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Api { message, .. }) => message.clone(),
            Self::Api(_) => "Could not reach the store, please try again".to_string(),
            Self::Storage(_) => "Local data could not be saved".to_string(),
            Self::Checkout(CheckoutError::Invalid(fields)) => fields
                .iter()
                .map(|f| f.message)
                .collect::<Vec<_>>()
                .join("; "),
            Self::Checkout(err) => err.to_string(),
            Self::Config(err) => err.to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
        }
    }

    /// Process exit code for command-line front-ends.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 78,
            Self::BadRequest(_) | Self::Checkout(_) => 65,
            Self::Unauthorized(_) => 77,
            Self::NotFound(_) => 66,
            Self::Api(err) if err.is_unauthorized() => 77,
            Self::Api(err) if err.is_not_found() => 66,
            Self::Api(_) => 69,
            Self::Storage(_) => 74,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
