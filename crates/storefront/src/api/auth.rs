//! Authentication endpoints.

use reqwest::Method;
use tracing::instrument;

use shophub_core::{ApiEnvelope, AuthSession, Credentials, Registration, User};

use super::{ApiClient, ApiError, Body};

impl ApiClient {
    /// Exchange credentials for a token and profile.
    ///
    /// The caller decides where to keep the result, typically
    /// [`SessionStore::sign_in`](crate::session::SessionStore::sign_in).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are rejected.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        let body = Body::Json(serde_json::to_value(credentials)?);
        self.send(Method::POST, "/auth/login", &[], body).await
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the input.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<AuthSession, ApiError> {
        let body = Body::Json(serde_json::to_value(registration)?);
        self.send(Method::POST, "/auth/register", &[], body).await
    }

    /// Profile of the token's owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<User, ApiError> {
        let envelope: ApiEnvelope<User> = self
            .send(Method::GET, "/auth/me", &[], Body::Empty)
            .await?;
        Ok(envelope.data)
    }
}
