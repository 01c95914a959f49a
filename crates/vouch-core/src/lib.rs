//! Vouch: policy-driven multi-realm authentication.
//!
//! An [`Authenticator`] consults an ordered collection of [`Realm`]s
//! (pluggable credential sources) for a submitted [`AuthToken`] and
//! aggregates the per-realm results under an [`AuthenticationPolicy`]:
//!
//! - exactly one configured realm takes a fast path with no policy hooks;
//! - two or more realms run the policy-driven loop, which tolerates or
//!   promotes per-realm failures as the active policy dictates.
//!
//! Four policies ship: [`AllMustSucceed`], [`AtLeastOneMustSucceed`]
//! (the default), [`FirstSuccessWins`] and [`FirstSuccessWinsEarlyExit`].
//! Custom policies implement the same trait.
//!
//! The engine is synchronous and per-attempt stateless: realms are
//! consulted strictly in configured order and all attempt state lives in
//! the aggregate threaded through the policy hooks. Sessions, credential
//! matching and authorization live outside this crate.

pub mod authenticator;
pub mod config;
pub mod error;
pub mod identity;
pub mod listener;
pub mod policy;
pub mod principal;
pub mod realm;
pub mod token;

pub use authenticator::{AuthenticationOutcome, Authenticator, ToleratedFailure};
pub use config::{AuthenticatorConfig, PolicyKind};
pub use error::{AuthError, AuthResult};
pub use identity::{Aggregate, CredentialMaterial, IdentityInfo, SimpleIdentity};
pub use listener::AuthenticationListener;
pub use policy::{
    AllMustSucceed, AtLeastOneMustSucceed, AttemptFlow, AuthenticationPolicy, FirstSuccessWins,
    FirstSuccessWinsEarlyExit,
};
pub use principal::PrincipalSet;
pub use realm::Realm;
pub use token::{AuthToken, UsernamePasswordToken};
