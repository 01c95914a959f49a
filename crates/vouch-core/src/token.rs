//! Submitted proof-of-identity types.

use std::any::Any;
use std::fmt;

use zeroize::Zeroizing;

/// A submitted proof of identity, immutable for the duration of one
/// authentication attempt.
///
/// Tokens are opaque to the engine. Realms declare whether they recognize
/// a token's shape via [`Realm::supports`](crate::Realm::supports) and
/// downcast through [`AuthToken::as_any`] to read concrete fields.
pub trait AuthToken: fmt::Debug + Send + Sync {
    /// Stable discriminator for the token's shape, used in support checks
    /// and diagnostics.
    fn kind(&self) -> &str;

    /// Principal the caller claims to be, when the token carries one.
    /// Used for log correlation only.
    fn principal_hint(&self) -> Option<&str> {
        None
    }

    /// Concrete-type access for realms that recognize this token.
    fn as_any(&self) -> &dyn Any;
}

/// Username/password token, the reference [`AuthToken`] implementation.
///
/// The secret is zeroized on drop and redacted from `Debug` output.
pub struct UsernamePasswordToken {
    username: String,
    password: Zeroizing<String>,
}

impl UsernamePasswordToken {
    /// Kind discriminator reported by [`AuthToken::kind`].
    pub const KIND: &'static str = "username-password";

    /// Create a token for the given username and secret.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// The claimed username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The submitted secret.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for UsernamePasswordToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsernamePasswordToken")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AuthToken for UsernamePasswordToken {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn principal_hint(&self) -> Option<&str> {
        Some(&self.username)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_the_secret() {
        let token = UsernamePasswordToken::new("alice", "hunter2");
        let rendered = format!("{token:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn downcast_recovers_the_concrete_token() {
        let token = UsernamePasswordToken::new("alice", "hunter2");
        let dynamic: &dyn AuthToken = &token;
        let concrete = dynamic
            .as_any()
            .downcast_ref::<UsernamePasswordToken>()
            .unwrap();
        assert_eq!(concrete.password(), "hunter2");
        assert_eq!(dynamic.principal_hint(), Some("alice"));
    }
}
