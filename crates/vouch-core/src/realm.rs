//! Credential source capability.

use crate::error::AuthResult;
use crate::identity::IdentityInfo;
use crate::principal::PrincipalSet;
use crate::token::AuthToken;

/// A pluggable source of identity data: an LDAP directory, a database, a
/// static file, a remote service.
///
/// Realms are shared across concurrent authentication attempts and must
/// be internally thread safe. Blocking I/O belongs inside
/// [`resolve`](Realm::resolve); the engine treats it as a potentially
/// slow, potentially failing synchronous call.
pub trait Realm: Send + Sync {
    /// Name used in diagnostics and principal attribution. Expected to be
    /// unique within one authenticator.
    fn name(&self) -> &str;

    /// Whether this realm recognizes the token's shape.
    ///
    /// Must be a pure predicate: no side effects, no failures. Realms
    /// that return `false` are skipped without being consulted.
    fn supports(&self, token: &dyn AuthToken) -> bool;

    /// Look up identity data for the token.
    ///
    /// `Ok(None)` means "no account found" and is not an error; whether
    /// it fails the attempt is the active policy's call.
    ///
    /// # Errors
    ///
    /// A classified [`AuthError`](crate::AuthError) for refusals the realm
    /// can name (for example [`AuthError::Rejected`](crate::AuthError::Rejected)),
    /// or any other failure converted into
    /// [`AuthError::Source`](crate::AuthError::Source).
    fn resolve(&self, token: &dyn AuthToken) -> AuthResult<Option<Box<dyn IdentityInfo>>>;

    /// Logout notification for this realm's accounts.
    ///
    /// Invoked for every configured realm when a subject logs out,
    /// regardless of which realms participated in the original
    /// authentication. Best effort; the default ignores the event.
    fn on_logout(&self, principals: &PrincipalSet) {
        let _ = principals;
    }
}
