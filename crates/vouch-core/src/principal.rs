//! Realm-attributed principal identifiers.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Ordered set of principal identifiers, grouped by the realm that
/// asserted them.
///
/// Insertion order is significant: the primary principal is the first
/// principal asserted by the first realm, and merging keeps earlier
/// assertions ahead of later ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalSet {
    by_realm: IndexMap<String, IndexSet<String>>,
}

impl PrincipalSet {
    /// Create an empty principal set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding one principal asserted by one realm.
    pub fn single(realm: impl Into<String>, principal: impl Into<String>) -> Self {
        let mut set = Self::new();
        set.add(realm, principal);
        set
    }

    /// Record `principal` as asserted by `realm`.
    pub fn add(&mut self, realm: impl Into<String>, principal: impl Into<String>) {
        self.by_realm
            .entry(realm.into())
            .or_default()
            .insert(principal.into());
    }

    /// Whether no realm has asserted any principal.
    pub fn is_empty(&self) -> bool {
        self.by_realm.values().all(IndexSet::is_empty)
    }

    /// Total number of (realm, principal) assertions.
    pub fn len(&self) -> usize {
        self.by_realm.values().map(IndexSet::len).sum()
    }

    /// The first principal asserted by the first realm, if any.
    pub fn primary(&self) -> Option<&str> {
        self.by_realm
            .values()
            .find_map(IndexSet::first)
            .map(String::as_str)
    }

    /// Whether any realm asserted `principal`.
    pub fn contains(&self, principal: &str) -> bool {
        self.by_realm.values().any(|set| set.contains(principal))
    }

    /// Principals asserted by `realm`, in assertion order.
    pub fn from_realm<'a>(&'a self, realm: &str) -> impl Iterator<Item = &'a str> {
        self.by_realm
            .get(realm)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Realms that asserted at least one principal, in assertion order.
    pub fn realms(&self) -> impl Iterator<Item = &str> {
        self.by_realm.keys().map(String::as_str)
    }

    /// All (realm, principal) pairs in assertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_realm.iter().flat_map(|(realm, principals)| {
            principals
                .iter()
                .map(move |principal| (realm.as_str(), principal.as_str()))
        })
    }

    /// Union-merge `other` into this set, keeping existing assertion
    /// order and appending new assertions after it.
    pub fn merge(&mut self, other: &PrincipalSet) {
        for (realm, principals) in &other.by_realm {
            let entry = self.by_realm.entry(realm.clone()).or_default();
            for principal in principals {
                entry.insert(principal.clone());
            }
        }
    }
}
