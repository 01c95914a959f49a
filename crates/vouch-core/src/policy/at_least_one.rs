//! At least one realm must produce a non-empty identity.

use crate::error::{AuthError, AuthResult};
use crate::identity::Aggregate;
use crate::policy::AuthenticationPolicy;
use crate::token::AuthToken;

/// Default policy: an attempt succeeds when any consulted realm produced
/// a non-empty identity. Realm failures and no-account results along the
/// way are tolerated; only the final aggregate is judged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtLeastOneMustSucceed;

impl AuthenticationPolicy for AtLeastOneMustSucceed {
    fn after_all(&self, token: &dyn AuthToken, aggregate: Aggregate) -> AuthResult<Aggregate> {
        match aggregate {
            Some(info) if !info.is_empty() => Ok(Some(info)),
            _ => Err(AuthError::Unauthenticated {
                kind: token.kind().to_owned(),
            }),
        }
    }
}
