//! Recording listener double.

use parking_lot::Mutex;

use vouch_core::{AuthError, AuthToken, AuthenticationListener, AuthenticationOutcome, PrincipalSet};

/// Event captured by a [`RecordingListener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Successful attempt, with the aggregated primary principal.
    Success {
        /// Primary principal of the outcome, if any.
        primary: Option<String>,
    },
    /// Failed attempt, with the rendered error.
    Failure {
        /// Rendered failure message.
        error: String,
    },
    /// Logout notification, with the affected principals.
    Logout {
        /// Principal identifiers in assertion order.
        principals: Vec<String>,
    },
}

/// Listener recording every notification it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<AuthEvent>>,
}

impl RecordingListener {
    /// Create an empty recording listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, in order.
    pub fn events(&self) -> Vec<AuthEvent> {
        self.events.lock().clone()
    }
}

impl AuthenticationListener for RecordingListener {
    fn on_success(&self, _token: &dyn AuthToken, outcome: &AuthenticationOutcome) {
        self.events.lock().push(AuthEvent::Success {
            primary: outcome.principals().primary().map(str::to_owned),
        });
    }

    fn on_failure(&self, _token: &dyn AuthToken, error: &AuthError) {
        self.events.lock().push(AuthEvent::Failure {
            error: error.to_string(),
        });
    }

    fn on_logout(&self, principals: &PrincipalSet) {
        self.events.lock().push(AuthEvent::Logout {
            principals: principals.iter().map(|(_, p)| p.to_owned()).collect(),
        });
    }
}
