//! First non-empty identity wins.

use std::sync::Arc;

use crate::error::AuthResult;
use crate::identity::{Aggregate, IdentityInfo};
use crate::policy::{AttemptFlow, AuthenticationPolicy};
use crate::realm::Realm;
use crate::token::AuthToken;

/// Shared merge rule for the first-success policies: a non-empty
/// aggregate has already won and later identity data is dropped.
fn keep_first(info: Box<dyn IdentityInfo>, aggregate: Aggregate) -> AuthResult<Aggregate> {
    match aggregate {
        Some(current) if !current.is_empty() => Ok(Some(current)),
        _ => Ok(Some(info)),
    }
}

/// Policy keeping the first non-empty identity and ignoring later ones.
///
/// Starts with no aggregate seed and inverts the default merge
/// precedence: once the aggregate is non-empty, identity data from
/// further realms is dropped rather than merged. Every supporting realm
/// is still consulted; see [`FirstSuccessWinsEarlyExit`] to stop early.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSuccessWins;

impl AuthenticationPolicy for FirstSuccessWins {
    fn before_all(
        &self,
        _realms: &[Arc<dyn Realm>],
        _token: &dyn AuthToken,
    ) -> AuthResult<Aggregate> {
        Ok(None)
    }

    fn merge(&self, info: Box<dyn IdentityInfo>, aggregate: Aggregate) -> AuthResult<Aggregate> {
        keep_first(info, aggregate)
    }
}

/// [`FirstSuccessWins`] plus an early exit: once a realm has produced a
/// non-empty identity, remaining realms are not consulted at all.
///
/// Produces the same outcome as [`FirstSuccessWins`] for any realm order
/// and token; only the number of realms actually consulted differs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSuccessWinsEarlyExit;

impl AuthenticationPolicy for FirstSuccessWinsEarlyExit {
    fn before_all(
        &self,
        _realms: &[Arc<dyn Realm>],
        _token: &dyn AuthToken,
    ) -> AuthResult<Aggregate> {
        Ok(None)
    }

    fn before_attempt(
        &self,
        _realm: &dyn Realm,
        _token: &dyn AuthToken,
        aggregate: Aggregate,
    ) -> AuthResult<AttemptFlow> {
        match &aggregate {
            Some(current) if !current.is_empty() => Ok(AttemptFlow::ShortCircuit(aggregate)),
            _ => Ok(AttemptFlow::Continue(aggregate)),
        }
    }

    fn merge(&self, info: Box<dyn IdentityInfo>, aggregate: Aggregate) -> AuthResult<Aggregate> {
        keep_first(info, aggregate)
    }
}
