//! Multi-realm aggregation policies.
//!
//! A policy decides what success means when two or more realms are
//! consulted for one token: all must succeed, at least one must succeed,
//! or the first success wins. The [`Authenticator`](crate::Authenticator)
//! drives the hooks around each realm consultation; policies stay
//! stateless so a single instance can serve concurrent attempts.
//!
//! # Hook sequence
//!
//! ```text
//! before_all ─▶ [ per supporting realm: before_attempt ─▶ resolve ─▶ after_attempt ] ─▶ after_all
//! ```
//!
//! A hook returning an error aborts the attempt with that failure. A
//! [`AttemptFlow::ShortCircuit`] from `before_attempt` ends the loop
//! early instead: the carried aggregate is final and `after_all` does not
//! run.

mod all_must_succeed;
mod at_least_one;
mod first_success;

pub use all_must_succeed::AllMustSucceed;
pub use at_least_one::AtLeastOneMustSucceed;
pub use first_success::{FirstSuccessWins, FirstSuccessWinsEarlyExit};

use std::sync::Arc;

use crate::error::AuthResult;
use crate::identity::{Aggregate, IdentityInfo, SimpleIdentity};
use crate::realm::Realm;
use crate::token::AuthToken;

/// Flow decision returned by [`AuthenticationPolicy::before_attempt`].
#[derive(Debug)]
pub enum AttemptFlow {
    /// Consult the realm and continue the loop.
    Continue(Aggregate),
    /// Stop consulting realms; the carried aggregate is final.
    ShortCircuit(Aggregate),
}

/// Decision hooks around each realm consultation in a multi-realm
/// attempt.
///
/// Every hook has a default implementing accumulate-and-tolerate
/// behavior: seed an empty mergeable aggregate, consult every supporting
/// realm, swallow realm failures, merge whatever identity data turns up.
/// The shipped policies override only the hooks where their semantics
/// diverge, and custom policies can do the same.
pub trait AuthenticationPolicy: Send + Sync {
    /// Seed the aggregate before any realm is consulted.
    fn before_all(&self, realms: &[Arc<dyn Realm>], token: &dyn AuthToken) -> AuthResult<Aggregate> {
        let _ = (realms, token);
        Ok(Some(Box::new(SimpleIdentity::empty())))
    }

    /// Inspect, and possibly finalize, the aggregate just before a realm
    /// is consulted.
    fn before_attempt(
        &self,
        realm: &dyn Realm,
        token: &dyn AuthToken,
        aggregate: Aggregate,
    ) -> AuthResult<AttemptFlow> {
        let _ = (realm, token);
        Ok(AttemptFlow::Continue(aggregate))
    }

    /// Interpret one realm's result.
    ///
    /// `resolved` carries the realm's lookup outcome: identity found, no
    /// account, or failure. The default tolerates failures and no-account
    /// results, and merges found identity through
    /// [`merge`](AuthenticationPolicy::merge).
    fn after_attempt(
        &self,
        realm: &dyn Realm,
        token: &dyn AuthToken,
        resolved: AuthResult<Option<Box<dyn IdentityInfo>>>,
        aggregate: Aggregate,
    ) -> AuthResult<Aggregate> {
        match resolved {
            Ok(Some(info)) => self.merge(info, aggregate),
            Ok(None) => Ok(aggregate),
            Err(err) => {
                tracing::warn!(
                    realm = realm.name(),
                    token_kind = token.kind(),
                    error = %err,
                    "realm failed during multi-realm authentication; continuing with remaining realms"
                );
                Ok(aggregate)
            }
        }
    }

    /// Final validation once every realm has been consulted.
    fn after_all(&self, token: &dyn AuthToken, aggregate: Aggregate) -> AuthResult<Aggregate> {
        let _ = token;
        Ok(aggregate)
    }

    /// Merge rule folding a realm's identity into the aggregate.
    ///
    /// The default absorbs `info` into an existing aggregate, or adopts
    /// `info` wholesale when there is no aggregate yet. Asking a
    /// non-mergeable aggregate to absorb is a configuration error.
    fn merge(&self, info: Box<dyn IdentityInfo>, aggregate: Aggregate) -> AuthResult<Aggregate> {
        match aggregate {
            Some(mut current) => {
                current.absorb(info.as_ref())?;
                Ok(Some(current))
            }
            None => Ok(Some(info)),
        }
    }
}

#[cfg(test)]
pub(crate) mod support {
    use super::*;
    use std::any::Any;

    pub(crate) struct StubRealm {
        pub(crate) name: &'static str,
        pub(crate) supports: bool,
    }

    impl Realm for StubRealm {
        fn name(&self) -> &str {
            self.name
        }

        fn supports(&self, _token: &dyn AuthToken) -> bool {
            self.supports
        }

        fn resolve(&self, _token: &dyn AuthToken) -> AuthResult<Option<Box<dyn IdentityInfo>>> {
            Ok(None)
        }
    }

    #[derive(Debug)]
    pub(crate) struct StubToken;

    impl AuthToken for StubToken {
        fn kind(&self) -> &str {
            "stub"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::support::{StubRealm, StubToken};
    use super::*;
    use crate::error::AuthError;

    struct Defaults;
    impl AuthenticationPolicy for Defaults {}

    #[test]
    fn default_seed_is_an_empty_mergeable_aggregate() {
        let policy = Defaults;
        let aggregate = policy.before_all(&[], &StubToken).unwrap();
        let seed = aggregate.unwrap();
        assert!(seed.is_empty());
    }

    #[test]
    fn default_merge_adopts_info_when_there_is_no_aggregate() {
        let policy = Defaults;
        let info: Box<dyn IdentityInfo> = Box::new(SimpleIdentity::for_principal("ldap", "alice"));
        let merged = policy.merge(info, None).unwrap().unwrap();
        assert_eq!(merged.principals().primary(), Some("alice"));
    }

    #[test]
    fn default_merge_absorbs_into_an_existing_aggregate() {
        let policy = Defaults;
        let aggregate: Aggregate = Some(Box::new(SimpleIdentity::for_principal("ldap", "alice")));
        let info: Box<dyn IdentityInfo> = Box::new(SimpleIdentity::for_principal("local", "u-1"));
        let merged = policy.merge(info, aggregate).unwrap().unwrap();
        assert!(merged.principals().contains("alice"));
        assert!(merged.principals().contains("u-1"));
    }

    #[test]
    fn default_after_attempt_swallows_realm_failures() {
        let policy = Defaults;
        let realm = StubRealm { name: "ldap", supports: true };
        let aggregate: Aggregate = Some(Box::new(SimpleIdentity::for_principal("local", "u-1")));
        let result = policy
            .after_attempt(
                &realm,
                &StubToken,
                Err(AuthError::from(anyhow::anyhow!("connection refused"))),
                aggregate,
            )
            .unwrap();
        assert_eq!(result.unwrap().principals().primary(), Some("u-1"));
    }

    #[test]
    fn default_before_attempt_continues_with_the_aggregate_unchanged() {
        let policy = Defaults;
        let realm = StubRealm { name: "ldap", supports: true };
        let flow = policy.before_attempt(&realm, &StubToken, None).unwrap();
        assert!(matches!(flow, AttemptFlow::Continue(None)));
    }
}
