//! Policy selection configuration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::authenticator::Authenticator;
use crate::policy::{
    AllMustSucceed, AtLeastOneMustSucceed, AuthenticationPolicy, FirstSuccessWins,
    FirstSuccessWinsEarlyExit,
};
use crate::realm::Realm;

/// Named selection of the multi-realm aggregation policy, for use in
/// application configuration files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// Every supporting realm must succeed.
    AllMustSucceed,
    /// At least one realm must produce a non-empty identity.
    #[default]
    AtLeastOneMustSucceed,
    /// First non-empty identity wins; every realm is still consulted.
    FirstSuccessWins,
    /// First non-empty identity wins; remaining realms are skipped.
    FirstSuccessWinsEarlyExit,
}

impl PolicyKind {
    /// Instantiate the selected policy.
    pub fn build(self) -> Arc<dyn AuthenticationPolicy> {
        match self {
            Self::AllMustSucceed => Arc::new(AllMustSucceed),
            Self::AtLeastOneMustSucceed => Arc::new(AtLeastOneMustSucceed),
            Self::FirstSuccessWins => Arc::new(FirstSuccessWins),
            Self::FirstSuccessWinsEarlyExit => Arc::new(FirstSuccessWinsEarlyExit),
        }
    }
}

/// Authenticator settings loaded from an application's configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticatorConfig {
    /// Aggregation policy applied when two or more realms are configured.
    pub policy: PolicyKind,
}

impl Authenticator {
    /// Create an authenticator for `realms` with the configured policy.
    pub fn from_config(realms: Vec<Arc<dyn Realm>>, config: &AuthenticatorConfig) -> Self {
        Self::new(realms).with_policy(config.policy.build())
    }
}
