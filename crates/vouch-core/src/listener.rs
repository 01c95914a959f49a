//! Attempt observation hooks.

use crate::authenticator::AuthenticationOutcome;
use crate::error::AuthError;
use crate::principal::PrincipalSet;
use crate::token::AuthToken;

/// Observer notified at the end of every authentication attempt and on
/// logout. Registered via
/// [`Authenticator::with_listener`](crate::Authenticator::with_listener).
///
/// Listeners run synchronously on the authenticating caller's thread and
/// must be stateless or internally synchronized. All hooks default to
/// ignoring the event.
pub trait AuthenticationListener: Send + Sync {
    /// An attempt for `token` completed successfully.
    fn on_success(&self, token: &dyn AuthToken, outcome: &AuthenticationOutcome) {
        let _ = (token, outcome);
    }

    /// An attempt for `token` failed with `error`.
    fn on_failure(&self, token: &dyn AuthToken, error: &AuthError) {
        let _ = (token, error);
    }

    /// A subject identified by `principals` logged out.
    fn on_logout(&self, principals: &PrincipalSet) {
        let _ = principals;
    }
}
