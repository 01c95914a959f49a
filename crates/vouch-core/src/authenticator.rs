//! Orchestrates authentication across the configured realms.
//!
//! One configured realm takes a fast path with no policy hooks; two or
//! more run the policy-driven loop, consulting realms strictly in
//! configured order. The authenticator holds no per-attempt state: the
//! aggregate lives in locals and is threaded through the policy hooks in
//! functional-update style.

use std::sync::Arc;

use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::identity::{Aggregate, IdentityInfo};
use crate::listener::AuthenticationListener;
use crate::policy::{AtLeastOneMustSucceed, AttemptFlow, AuthenticationPolicy};
use crate::principal::PrincipalSet;
use crate::realm::Realm;
use crate::token::AuthToken;

/// Record of a realm whose failure the active policy tolerated during an
/// otherwise successful attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToleratedFailure {
    /// Name of the realm that failed.
    pub realm: String,
    /// Rendered failure, for diagnostics and assertions.
    pub error: String,
}

/// Successful result of an authentication attempt: the aggregated
/// identity plus diagnostics about realms that failed along the way.
#[derive(Debug)]
pub struct AuthenticationOutcome {
    identity: Box<dyn IdentityInfo>,
    tolerated: Vec<ToleratedFailure>,
}

impl AuthenticationOutcome {
    /// Aggregated identity across the consulted realms.
    pub fn identity(&self) -> &dyn IdentityInfo {
        self.identity.as_ref()
    }

    /// Take ownership of the identity, discarding diagnostics.
    pub fn into_identity(self) -> Box<dyn IdentityInfo> {
        self.identity
    }

    /// Shorthand for the aggregated principal set.
    pub fn principals(&self) -> &PrincipalSet {
        self.identity.principals()
    }

    /// Realm failures the active policy tolerated during this attempt.
    /// Empty on the single-realm fast path.
    pub fn tolerated_failures(&self) -> &[ToleratedFailure] {
        &self.tolerated
    }
}

/// Multi-realm authenticator.
///
/// Owns the configured realm order, the active aggregation policy
/// (defaulting to [`AtLeastOneMustSucceed`]) and any attempt listeners.
/// A shared instance serves concurrent attempts; realms and policies are
/// consulted through shared references only.
pub struct Authenticator {
    realms: Vec<Arc<dyn Realm>>,
    policy: Arc<dyn AuthenticationPolicy>,
    listeners: Vec<Arc<dyn AuthenticationListener>>,
}

impl Authenticator {
    /// Create an authenticator consulting `realms` in the given order,
    /// with the default [`AtLeastOneMustSucceed`] policy.
    pub fn new(realms: Vec<Arc<dyn Realm>>) -> Self {
        Self {
            realms,
            policy: Arc::new(AtLeastOneMustSucceed),
            listeners: Vec::new(),
        }
    }

    /// Replace the aggregation policy. Only consulted when two or more
    /// realms are configured; the single-realm fast path bypasses it.
    pub fn with_policy(mut self, policy: Arc<dyn AuthenticationPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Register an attempt listener.
    pub fn with_listener(mut self, listener: Arc<dyn AuthenticationListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Realms consulted by this authenticator, in order.
    pub fn realms(&self) -> &[Arc<dyn Realm>] {
        &self.realms
    }

    /// Authenticate `token` against the configured realms.
    ///
    /// Exactly one classified failure or one successful outcome results
    /// from every call; raw realm errors are wrapped or swallowed by the
    /// active policy, never passed through unclassified context-free.
    ///
    /// # Errors
    ///
    /// [`AuthError::Config`] when no realms are configured; otherwise
    /// whatever classification the fast path or the active policy
    /// produces.
    pub fn authenticate(&self, token: &dyn AuthToken) -> AuthResult<AuthenticationOutcome> {
        let result = self.try_authenticate(token);
        match &result {
            Ok(outcome) => {
                for listener in &self.listeners {
                    listener.on_success(token, outcome);
                }
            }
            Err(error) => {
                for listener in &self.listeners {
                    listener.on_failure(token, error);
                }
            }
        }
        result
    }

    /// Propagate a logout event.
    ///
    /// Listeners are notified first, then every configured realm's
    /// [`Realm::on_logout`] hook runs, regardless of which realms
    /// participated in the original authentication. Best effort: the
    /// hooks are infallible by signature and every realm is reached.
    pub fn logout(&self, principals: &PrincipalSet) {
        for listener in &self.listeners {
            listener.on_logout(principals);
        }
        for realm in &self.realms {
            trace!(realm = realm.name(), "forwarding logout notification");
            realm.on_logout(principals);
        }
    }

    fn try_authenticate(&self, token: &dyn AuthToken) -> AuthResult<AuthenticationOutcome> {
        if self.realms.is_empty() {
            return Err(AuthError::config(
                "no realms are configured; at least one realm is required to authenticate",
            ));
        }

        let attempt_id = Uuid::new_v4();
        let span = tracing::debug_span!("authenticate", %attempt_id, token_kind = token.kind());
        let _entered = span.enter();
        trace!(
            realm_count = self.realms.len(),
            principal_hint = token.principal_hint().unwrap_or("<none>"),
            "authentication attempt received"
        );

        if let [realm] = self.realms.as_slice() {
            self.single_realm(realm.as_ref(), token)
        } else {
            self.multi_realm(token)
        }
    }

    /// Fast path for the single-realm deployment: no policy hooks run.
    fn single_realm(
        &self,
        realm: &dyn Realm,
        token: &dyn AuthToken,
    ) -> AuthResult<AuthenticationOutcome> {
        if !realm.supports(token) {
            return Err(AuthError::UnsupportedToken {
                realm: realm.name().to_owned(),
                kind: token.kind().to_owned(),
            });
        }

        let resolved = realm
            .resolve(token)
            .map_err(|err| err.with_realm_context(realm.name()))?;
        match resolved {
            Some(identity) => {
                debug!(realm = realm.name(), "single-realm authentication succeeded");
                Ok(AuthenticationOutcome {
                    identity,
                    tolerated: Vec::new(),
                })
            }
            None => Err(AuthError::UnknownAccount {
                realm: realm.name().to_owned(),
            }),
        }
    }

    fn multi_realm(&self, token: &dyn AuthToken) -> AuthResult<AuthenticationOutcome> {
        let policy = self.policy.as_ref();
        let mut aggregate = policy.before_all(&self.realms, token)?;
        let mut tolerated = Vec::new();
        trace!(
            realm_count = self.realms.len(),
            "consulting realms for multi-realm authentication"
        );

        for realm in &self.realms {
            if !realm.supports(token) {
                debug!(
                    realm = realm.name(),
                    token_kind = token.kind(),
                    "realm does not support token; skipping"
                );
                continue;
            }

            aggregate = match policy.before_attempt(realm.as_ref(), token, aggregate)? {
                AttemptFlow::Continue(aggregate) => aggregate,
                AttemptFlow::ShortCircuit(aggregate) => {
                    debug!(
                        realm = realm.name(),
                        "policy short-circuited remaining realms"
                    );
                    // A short-circuit finalizes the aggregate as-is;
                    // after_all is not consulted.
                    return self.finish(token, aggregate, tolerated);
                }
            };

            trace!(realm = realm.name(), "consulting realm");
            let resolved = realm.resolve(token);
            let failure = resolved.as_ref().err().map(ToString::to_string);
            aggregate = policy.after_attempt(realm.as_ref(), token, resolved, aggregate)?;
            if let Some(error) = failure {
                // after_attempt returned Ok despite the realm failing:
                // the policy tolerated it. Keep that visible to callers.
                tolerated.push(ToleratedFailure {
                    realm: realm.name().to_owned(),
                    error,
                });
            }
        }

        let aggregate = policy.after_all(token, aggregate)?;
        self.finish(token, aggregate, tolerated)
    }

    /// A final aggregate with no principals never reaches the caller as a
    /// success.
    fn finish(
        &self,
        token: &dyn AuthToken,
        aggregate: Aggregate,
        tolerated: Vec<ToleratedFailure>,
    ) -> AuthResult<AuthenticationOutcome> {
        match aggregate {
            Some(identity) if !identity.is_empty() => {
                debug!(
                    principal = identity.principals().primary().unwrap_or("<none>"),
                    tolerated_failures = tolerated.len(),
                    "authentication succeeded"
                );
                Ok(AuthenticationOutcome {
                    identity,
                    tolerated,
                })
            }
            _ => Err(AuthError::Unauthenticated {
                kind: token.kind().to_owned(),
            }),
        }
    }
}
