//! Error handling for admin operations.

use thiserror::Error;

use shophub_storefront::AppError;
use shophub_storefront::api::ApiError;

/// Errors from back-office operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// REST API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Form input failed validation; one message per failing field.
    #[error("{}", .0.join("; "))]
    Invalid(Vec<String>),

    /// No signed-in user.
    #[error("Please sign in to continue")]
    NotSignedIn,

    /// Signed in without the admin role.
    #[error("Administrator access required")]
    Forbidden,
}

impl AdminError {
    /// Validation failure with a single message.
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(vec![message.into()])
    }
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::Api(err) => Self::Api(err),
            AdminError::Invalid(_) => Self::BadRequest(err.to_string()),
            AdminError::NotSignedIn | AdminError::Forbidden => Self::Unauthorized(err.to_string()),
        }
    }
}
