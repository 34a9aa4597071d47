//! Admin route guard.

use shophub_core::User;
use shophub_storefront::session::{Access, GuardDecision, SessionStore};
use shophub_storefront::storage::Storage;

use crate::AdminError;

/// Return the signed-in administrator, or why there is none.
///
/// # Errors
///
/// [`AdminError::NotSignedIn`] without a token and profile,
/// [`AdminError::Forbidden`] when the user is not an admin.
pub fn require_admin<S: Storage>(session: &SessionStore<S>) -> Result<User, AdminError> {
    match session.guard(Access::AdminOnly) {
        GuardDecision::Allow(user) => Ok(user),
        GuardDecision::RedirectToLogin => Err(AdminError::NotSignedIn),
        GuardDecision::RedirectToHome => Err(AdminError::Forbidden),
    }
}
