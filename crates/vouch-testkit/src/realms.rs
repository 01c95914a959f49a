//! Scripted realm doubles.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use vouch_core::{
    AuthError, AuthResult, AuthToken, CredentialMaterial, IdentityInfo, PrincipalSet, Realm,
    SimpleIdentity,
};

/// What a [`ScriptedRealm`] does when consulted.
#[derive(Debug, Clone)]
enum Script {
    /// Produce a single-principal identity attributed to the realm.
    Identity(String),
    /// Produce `Ok(None)`: no account for the token.
    Unknown,
    /// Fail with an unclassified source error.
    Fail(String),
    /// Fail with a classified rejection.
    Reject(String),
}

/// Deterministic realm following a fixed script.
///
/// Counts `resolve` consultations and records logout notifications so
/// tests can assert on exactly which realms ran.
pub struct ScriptedRealm {
    name: String,
    supports: bool,
    script: Script,
    resolve_calls: AtomicUsize,
    logouts: Mutex<Vec<PrincipalSet>>,
}

impl ScriptedRealm {
    fn new(name: impl Into<String>, supports: bool, script: Script) -> Self {
        Self {
            name: name.into(),
            supports,
            script,
            resolve_calls: AtomicUsize::new(0),
            logouts: Mutex::new(Vec::new()),
        }
    }

    /// Realm producing an identity for `principal` on every consultation.
    pub fn returning(name: impl Into<String>, principal: impl Into<String>) -> Self {
        Self::new(name, true, Script::Identity(principal.into()))
    }

    /// Realm that supports the token but never finds an account.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, true, Script::Unknown)
    }

    /// Realm failing with an unclassified error on every consultation.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, true, Script::Fail(message.into()))
    }

    /// Realm refusing the token with a classified rejection.
    pub fn rejecting(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(name, true, Script::Reject(reason.into()))
    }

    /// Realm that does not recognize any token.
    pub fn unsupported(name: impl Into<String>) -> Self {
        Self::new(name, false, Script::Unknown)
    }

    /// How many times `resolve` ran.
    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    /// Logout notifications received, in order.
    pub fn logouts(&self) -> Vec<PrincipalSet> {
        self.logouts.lock().clone()
    }
}

impl Realm for ScriptedRealm {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, _token: &dyn AuthToken) -> bool {
        self.supports
    }

    fn resolve(&self, _token: &dyn AuthToken) -> AuthResult<Option<Box<dyn IdentityInfo>>> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Identity(principal) => Ok(Some(Box::new(
                SimpleIdentity::for_principal(self.name.clone(), principal.clone())
                    .with_credential(CredentialMaterial::new(principal.as_bytes())),
            ))),
            Script::Unknown => Ok(None),
            Script::Fail(message) => Err(anyhow::anyhow!("{message}").into()),
            Script::Reject(reason) => Err(AuthError::rejected(self.name.clone(), reason.clone())),
        }
    }

    fn on_logout(&self, principals: &PrincipalSet) {
        self.logouts.lock().push(principals.clone());
    }
}

/// Identity that does not opt into merging.
///
/// Exercises the configuration-error path for policies that try to
/// absorb into a non-mergeable aggregate.
#[derive(Debug, Clone)]
pub struct SealedIdentity {
    principals: PrincipalSet,
    attributes: BTreeMap<String, serde_json::Value>,
}

impl SealedIdentity {
    /// Create a sealed identity asserting one principal for one realm.
    pub fn of(realm: impl Into<String>, principal: impl Into<String>) -> Self {
        Self {
            principals: PrincipalSet::single(realm, principal),
            attributes: BTreeMap::new(),
        }
    }
}

impl IdentityInfo for SealedIdentity {
    fn principals(&self) -> &PrincipalSet {
        &self.principals
    }

    fn credentials(&self) -> &[CredentialMaterial] {
        &[]
    }

    fn attributes(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.attributes
    }
}

/// Realm producing a [`SealedIdentity`] for `principal` on every
/// consultation.
pub struct SealedRealm {
    name: String,
    principal: String,
}

impl SealedRealm {
    /// Create a sealed realm named `name` asserting `principal`.
    pub fn returning(name: impl Into<String>, principal: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            principal: principal.into(),
        }
    }
}

impl Realm for SealedRealm {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, _token: &dyn AuthToken) -> bool {
        true
    }

    fn resolve(&self, _token: &dyn AuthToken) -> AuthResult<Option<Box<dyn IdentityInfo>>> {
        Ok(Some(Box::new(SealedIdentity::of(
            self.name.clone(),
            self.principal.clone(),
        ))))
    }
}
