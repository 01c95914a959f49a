//! Test doubles for the vouch authentication engine.
//!
//! Deterministic realms and listeners for exercising aggregation
//! policies without real credential stores. Mock implementations live
//! here, never in `vouch-core`.

pub mod listeners;
pub mod realms;

pub use listeners::{AuthEvent, RecordingListener};
pub use realms::{ScriptedRealm, SealedIdentity, SealedRealm};

/// Install a compact tracing subscriber for test output.
///
/// Safe to call from every test; only the first call installs.
pub fn init_test_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
