//! Signed-in session: bearer token and user profile.
//!
//! Both live in the same durable storage as the cart, under their own keys.
//! Route guards and the API client read them on every use; nothing is
//! cached in memory.

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use shophub_core::{AuthSession, User};

use crate::storage::Storage;

/// Storage keys for session data.
pub mod keys {
    /// Key for the bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the JSON-encoded user profile.
    pub const USER: &str = "user";
}

/// Source of the bearer token attached to API requests.
pub trait TokenSource: Send + Sync {
    /// Current token, if signed in.
    fn token(&self) -> Option<SecretString>;
}

/// No token, ever. For anonymous API access.
#[derive(Debug, Default, Clone, Copy)]
pub struct Anonymous;

impl TokenSource for Anonymous {
    fn token(&self) -> Option<SecretString> {
        None
    }
}

/// Which routes a guard protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any signed-in user.
    Authenticated,
    /// Signed-in administrators only.
    AdminOnly,
}

/// Outcome of a route guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the route.
    Allow(User),
    /// Not signed in; go to the login page.
    RedirectToLogin,
    /// Signed in without the required role; go to the home page.
    RedirectToHome,
}

impl GuardDecision {
    /// Returns true if the route may be rendered.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

/// Session persisted in a [`Storage`].
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    /// Create a session store over `storage`.
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Stored bearer token.
    pub fn token(&self) -> Option<SecretString> {
        match self.storage.get(keys::TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(SecretString::from),
            Err(e) => {
                warn!(error = %e, "failed to read session token");
                None
            }
        }
    }

    /// Store a bearer token.
    pub fn set_token(&self, token: &SecretString) {
        if let Err(e) = self.storage.set(keys::TOKEN, token.expose_secret()) {
            warn!(error = %e, "failed to store session token");
        }
    }

    /// Forget the bearer token.
    pub fn remove_token(&self) {
        if let Err(e) = self.storage.remove(keys::TOKEN) {
            warn!(error = %e, "failed to remove session token");
        }
    }

    /// Stored user profile. Unreadable data reads as signed out.
    pub fn user(&self) -> Option<User> {
        let raw = match self.storage.get(keys::USER) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "failed to read session user");
                return None;
            }
        };

        serde_json::from_str(&raw)
            .inspect_err(|e| warn!(error = %e, "stored user profile is corrupt"))
            .ok()
    }

    /// Store the user profile.
    pub fn set_user(&self, user: &User) {
        let encoded = match serde_json::to_string(user) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "failed to encode user profile");
                return;
            }
        };
        if let Err(e) = self.storage.set(keys::USER, &encoded) {
            warn!(error = %e, "failed to store user profile");
        }
    }

    /// Forget the user profile.
    pub fn remove_user(&self) {
        if let Err(e) = self.storage.remove(keys::USER) {
            warn!(error = %e, "failed to remove user profile");
        }
    }

    /// Persist a successful login or registration.
    pub fn sign_in(&self, session: &AuthSession) {
        self.set_token(&SecretString::from(session.token.clone()));
        self.set_user(&session.user);
    }

    /// Forget token and profile.
    pub fn sign_out(&self) {
        self.remove_token();
        self.remove_user();
    }

    /// Decide whether a route requiring `access` may be rendered.
    pub fn guard(&self, access: Access) -> GuardDecision {
        let (Some(_token), Some(user)) = (self.token(), self.user()) else {
            return GuardDecision::RedirectToLogin;
        };

        if access == Access::AdminOnly && !user.is_admin() {
            return GuardDecision::RedirectToHome;
        }

        GuardDecision::Allow(user)
    }
}

impl<S: Storage> TokenSource for SessionStore<S> {
    fn token(&self) -> Option<SecretString> {
        Self::token(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shophub_core::{Email, UserId, UserRole};

    use super::*;
    use crate::storage::{MemoryStorage, UnavailableStorage};

    fn user(role: UserRole) -> User {
        User {
            id: UserId::new("u1"),
            name: "Ada".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            role,
        }
    }

    fn signed_in(role: UserRole) -> SessionStore<MemoryStorage> {
        let session = SessionStore::new(MemoryStorage::new());
        session.sign_in(&AuthSession {
            token: "jwt-token".to_string(),
            user: user(role),
        });
        session
    }

    #[test]
    fn test_sign_in_persists_token_and_user() {
        let session = signed_in(UserRole::Customer);
        assert_eq!(session.token().unwrap().expose_secret(), "jwt-token");
        assert_eq!(session.user(), Some(user(UserRole::Customer)));
    }

    #[test]
    fn test_sign_out_clears_both_keys() {
        let session = signed_in(UserRole::Customer);
        session.sign_out();
        assert!(session.token().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_guard_requires_token_and_user() {
        let session = SessionStore::new(MemoryStorage::new());
        assert_eq!(
            session.guard(Access::Authenticated),
            GuardDecision::RedirectToLogin
        );

        session.set_token(&SecretString::from("jwt-token"));
        assert_eq!(
            session.guard(Access::Authenticated),
            GuardDecision::RedirectToLogin
        );

        session.set_user(&user(UserRole::Customer));
        assert!(session.guard(Access::Authenticated).is_allowed());
    }

    #[test]
    fn test_guard_admin_only() {
        let customer = signed_in(UserRole::Customer);
        assert_eq!(
            customer.guard(Access::AdminOnly),
            GuardDecision::RedirectToHome
        );

        let admin = signed_in(UserRole::Admin);
        assert_eq!(
            admin.guard(Access::AdminOnly),
            GuardDecision::Allow(user(UserRole::Admin))
        );
    }

    #[test]
    fn test_corrupt_user_reads_as_signed_out() {
        let storage = MemoryStorage::new();
        storage.set(keys::TOKEN, "jwt-token").unwrap();
        storage.set(keys::USER, "not-json").unwrap();
        let session = SessionStore::new(storage);

        assert!(session.user().is_none());
        assert_eq!(
            session.guard(Access::Authenticated),
            GuardDecision::RedirectToLogin
        );
    }

    #[test]
    fn test_unavailable_storage_is_signed_out() {
        let session = SessionStore::new(UnavailableStorage);
        session.sign_in(&AuthSession {
            token: "jwt-token".to_string(),
            user: user(UserRole::Admin),
        });
        assert!(session.token().is_none());
        assert_eq!(
            session.guard(Access::AdminOnly),
            GuardDecision::RedirectToLogin
        );
    }
}
