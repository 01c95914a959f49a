//! Failure taxonomy for authentication attempts.
//!
//! Every attempt surfaces exactly one value to the caller: a successful
//! outcome or one of these classified failures. Realm failures tolerated
//! by the active policy never appear here; they are reported through
//! [`AuthenticationOutcome::tolerated_failures`](crate::AuthenticationOutcome::tolerated_failures).

/// Result alias for operations that fail with [`AuthError`].
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Classified failure surfaced by an authentication attempt.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Deployment or wiring bug: an empty realm set, a non-mergeable
    /// aggregate, and similar. Never caused by the submitted token.
    #[error("authentication configuration error: {0}")]
    Config(String),

    /// The consulted realm does not recognize the token's shape.
    #[error("realm `{realm}` does not support tokens of kind `{kind}`")]
    UnsupportedToken {
        /// Realm that declined the token.
        realm: String,
        /// Kind discriminator of the submitted token.
        kind: String,
    },

    /// The consulted realm found no account for the submitted token.
    #[error("realm `{realm}` found no account for the submitted token")]
    UnknownAccount {
        /// Realm that came up empty.
        realm: String,
    },

    /// No configured realm produced a usable identity.
    #[error("no configured realm authenticated the submitted token of kind `{kind}`")]
    Unauthenticated {
        /// Kind discriminator of the submitted token.
        kind: String,
    },

    /// A realm understood the token and explicitly refused it, for
    /// example on a credential mismatch or a locked account.
    #[error("realm `{realm}` rejected the submitted token: {reason}")]
    Rejected {
        /// Realm that refused the token.
        realm: String,
        /// Realm-provided refusal reason.
        reason: String,
    },

    /// Unclassified failure raised by a realm while resolving a token.
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

impl AuthError {
    /// Build a [`AuthError::Config`] from any message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Build a [`AuthError::Rejected`] for the given realm.
    pub fn rejected(realm: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            realm: realm.into(),
            reason: reason.into(),
        }
    }

    /// Whether this failure carries an authentication classification, as
    /// opposed to wrapping a raw realm error.
    pub fn is_classified(&self) -> bool {
        !matches!(self, Self::Source(_))
    }

    /// Attach realm context to an unclassified source error; classified
    /// failures pass through untouched.
    pub(crate) fn with_realm_context(self, realm: &str) -> Self {
        match self {
            Self::Source(err) => {
                Self::Source(err.context(format!("realm `{realm}` failed during authentication")))
            }
            other => other,
        }
    }
}
