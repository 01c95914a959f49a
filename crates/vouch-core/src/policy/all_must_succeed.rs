//! Every consulted realm must produce identity data.

use crate::error::{AuthError, AuthResult};
use crate::identity::{Aggregate, IdentityInfo};
use crate::policy::{AttemptFlow, AuthenticationPolicy};
use crate::realm::Realm;
use crate::token::AuthToken;

/// Policy requiring every consulted realm to succeed.
///
/// A realm failure or a no-account result fails the whole attempt
/// immediately; nothing is tolerated. Unclassified realm failures are
/// promoted to the final failure with realm context attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllMustSucceed;

impl AuthenticationPolicy for AllMustSucceed {
    fn before_attempt(
        &self,
        realm: &dyn Realm,
        token: &dyn AuthToken,
        aggregate: Aggregate,
    ) -> AuthResult<AttemptFlow> {
        // The loop already skips unsupporting realms; this policy refuses
        // them outright instead.
        if !realm.supports(token) {
            return Err(AuthError::UnsupportedToken {
                realm: realm.name().to_owned(),
                kind: token.kind().to_owned(),
            });
        }
        Ok(AttemptFlow::Continue(aggregate))
    }

    fn after_attempt(
        &self,
        realm: &dyn Realm,
        _token: &dyn AuthToken,
        resolved: AuthResult<Option<Box<dyn IdentityInfo>>>,
        aggregate: Aggregate,
    ) -> AuthResult<Aggregate> {
        match resolved {
            Ok(Some(info)) => self.merge(info, aggregate),
            Ok(None) => Err(AuthError::UnknownAccount {
                realm: realm.name().to_owned(),
            }),
            Err(err) => Err(err.with_realm_context(realm.name())),
        }
    }
}
