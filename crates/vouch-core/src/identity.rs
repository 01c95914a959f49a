//! Per-realm and aggregated identity data.
//!
//! A realm that recognizes a token produces an [`IdentityInfo`] value;
//! multi-realm policies fold those values into a running aggregate of the
//! same shape. Emptiness is judged solely by the principal set:
//! credential material and attributes never make an identity non-empty on
//! their own.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use crate::principal::PrincipalSet;

/// Running combination of identity data across one authentication
/// attempt. `None` is the "no seed yet / nothing learned" state.
pub type Aggregate = Option<Box<dyn IdentityInfo>>;

/// Opaque credential material attached to an identity, for example a
/// password digest. The engine never interprets it; credential matching
/// happens upstream.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialMaterial(Vec<u8>);

impl CredentialMaterial {
    /// Wrap raw credential bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The wrapped bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for CredentialMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialMaterial({} bytes)", self.0.len())
    }
}

/// What one realm, or the running aggregate, knows about a subject.
pub trait IdentityInfo: fmt::Debug + Send {
    /// Principal identifiers asserted for the subject.
    fn principals(&self) -> &PrincipalSet;

    /// Opaque credential material for upstream credential matching.
    fn credentials(&self) -> &[CredentialMaterial];

    /// Realm-specific attributes.
    fn attributes(&self) -> &BTreeMap<String, serde_json::Value>;

    /// Whether the principal set is empty.
    fn is_empty(&self) -> bool {
        self.principals().is_empty()
    }

    /// Fold another identity's data into this one.
    ///
    /// Implementations that can act as a multi-realm aggregate override
    /// this. The default declines, which surfaces as a configuration
    /// error when a policy asks a non-mergeable aggregate to merge.
    fn absorb(&mut self, other: &dyn IdentityInfo) -> AuthResult<()> {
        let _ = other;
        Err(AuthError::config(
            "aggregate identity type does not support merging; \
             multi-realm policies that accumulate require a mergeable aggregate",
        ))
    }
}

/// Standard mergeable identity used by built-in realms and as the
/// aggregate seed for accumulating policies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimpleIdentity {
    principals: PrincipalSet,
    credentials: Vec<CredentialMaterial>,
    attributes: BTreeMap<String, serde_json::Value>,
}

impl SimpleIdentity {
    /// Create an identity with no principals, credentials or attributes.
    /// Used as the empty aggregate seed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create an identity asserting one principal for one realm.
    pub fn for_principal(realm: impl Into<String>, principal: impl Into<String>) -> Self {
        Self {
            principals: PrincipalSet::single(realm, principal),
            ..Self::default()
        }
    }

    /// Attach credential material.
    pub fn with_credential(mut self, material: CredentialMaterial) -> Self {
        self.credentials.push(material);
        self
    }

    /// Attach a realm-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

impl IdentityInfo for SimpleIdentity {
    fn principals(&self) -> &PrincipalSet {
        &self.principals
    }

    fn credentials(&self) -> &[CredentialMaterial] {
        &self.credentials
    }

    fn attributes(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.attributes
    }

    fn absorb(&mut self, other: &dyn IdentityInfo) -> AuthResult<()> {
        // An identity with no principals contributes nothing.
        if other.principals().is_empty() {
            return Ok(());
        }

        self.principals.merge(other.principals());
        for material in other.credentials() {
            if !self.credentials.contains(material) {
                self.credentials.push(material.clone());
            }
        }
        for (key, value) in other.attributes() {
            self.attributes.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_unions_principals_and_credentials() {
        let mut aggregate = SimpleIdentity::empty();
        let ldap = SimpleIdentity::for_principal("ldap", "alice")
            .with_credential(CredentialMaterial::new(b"digest-a".as_slice()));
        let local = SimpleIdentity::for_principal("local", "u-1001")
            .with_credential(CredentialMaterial::new(b"digest-a".as_slice()))
            .with_credential(CredentialMaterial::new(b"digest-b".as_slice()));

        aggregate.absorb(&ldap).unwrap();
        aggregate.absorb(&local).unwrap();

        assert_eq!(aggregate.principals().len(), 2);
        assert_eq!(aggregate.principals().primary(), Some("alice"));
        // Duplicate material collapses.
        assert_eq!(aggregate.credentials().len(), 2);
    }

    #[test]
    fn absorb_of_empty_identity_is_a_no_op() {
        let mut aggregate = SimpleIdentity::for_principal("ldap", "alice");
        let empty = SimpleIdentity::empty()
            .with_attribute("shadowed", serde_json::json!(true));

        aggregate.absorb(&empty).unwrap();
        assert_eq!(aggregate.principals().len(), 1);
        assert!(aggregate.attributes().is_empty());
    }

    #[test]
    fn later_attributes_override_on_collision() {
        let mut aggregate = SimpleIdentity::for_principal("ldap", "alice")
            .with_attribute("display-name", serde_json::json!("Alice L."));
        let local = SimpleIdentity::for_principal("local", "u-1001")
            .with_attribute("display-name", serde_json::json!("Alice"));

        aggregate.absorb(&local).unwrap();
        assert_eq!(
            aggregate.attributes()["display-name"],
            serde_json::json!("Alice")
        );
    }

    #[test]
    fn default_absorb_declines_with_a_configuration_error() {
        #[derive(Debug)]
        struct Frozen(PrincipalSet);

        impl IdentityInfo for Frozen {
            fn principals(&self) -> &PrincipalSet {
                &self.0
            }
            fn credentials(&self) -> &[CredentialMaterial] {
                &[]
            }
            fn attributes(&self) -> &BTreeMap<String, serde_json::Value> {
                static EMPTY: std::sync::OnceLock<BTreeMap<String, serde_json::Value>> =
                    std::sync::OnceLock::new();
                EMPTY.get_or_init(BTreeMap::new)
            }
        }

        let mut frozen = Frozen(PrincipalSet::single("token", "alice"));
        let incoming = SimpleIdentity::for_principal("local", "u-1001");
        let err = frozen.absorb(&incoming).unwrap_err();
        assert!(matches!(err, AuthError::Config(_)));
    }
}
