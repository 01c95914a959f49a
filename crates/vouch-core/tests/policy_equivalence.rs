//! Equivalence and ordering properties of the first-success policies
//! over generated realm line-ups.

use std::sync::Arc;

use proptest::prelude::*;
use vouch_core::{
    AuthError, AuthResult, AuthenticationOutcome, Authenticator, FirstSuccessWins,
    FirstSuccessWinsEarlyExit, Realm, UsernamePasswordToken,
};
use vouch_testkit::ScriptedRealm;

#[derive(Debug, Clone)]
enum Script {
    Identity(String),
    Unknown,
    Fail,
    Unsupported,
}

fn principal() -> impl Strategy<Value = String> {
    proptest::sample::select(vec!["alice", "bob", "carol", "dave", "erin", "frank"])
        .prop_map(str::to_owned)
}

fn script() -> impl Strategy<Value = Script> {
    prop_oneof![
        principal().prop_map(Script::Identity),
        Just(Script::Unknown),
        Just(Script::Fail),
        Just(Script::Unsupported),
    ]
}

fn build(scripts: &[Script]) -> Vec<Arc<ScriptedRealm>> {
    scripts
        .iter()
        .enumerate()
        .map(|(index, script)| {
            let name = format!("realm-{index}");
            Arc::new(match script {
                Script::Identity(principal) => {
                    ScriptedRealm::returning(name.as_str(), principal.clone())
                }
                Script::Unknown => ScriptedRealm::unknown(name.as_str()),
                Script::Fail => ScriptedRealm::failing(name.as_str(), "backend offline"),
                Script::Unsupported => ScriptedRealm::unsupported(name.as_str()),
            })
        })
        .collect()
}

fn as_realms(realms: &[Arc<ScriptedRealm>]) -> Vec<Arc<dyn Realm>> {
    realms
        .iter()
        .map(|realm| realm.clone() as Arc<dyn Realm>)
        .collect()
}

/// Comparable rendering of an attempt result: principal content on
/// success, failure classification otherwise.
fn fingerprint(result: &AuthResult<AuthenticationOutcome>) -> String {
    match result {
        Ok(outcome) => {
            let pairs: Vec<String> = outcome
                .principals()
                .iter()
                .map(|(realm, principal)| format!("{realm}/{principal}"))
                .collect();
            format!("ok:{}", pairs.join(","))
        }
        Err(AuthError::Config(_)) => "err:config".to_owned(),
        Err(AuthError::UnsupportedToken { .. }) => "err:unsupported-token".to_owned(),
        Err(AuthError::UnknownAccount { .. }) => "err:unknown-account".to_owned(),
        Err(AuthError::Unauthenticated { .. }) => "err:unauthenticated".to_owned(),
        Err(AuthError::Rejected { .. }) => "err:rejected".to_owned(),
        Err(AuthError::Source(_)) => "err:source".to_owned(),
    }
}

proptest! {
    #[test]
    fn early_exit_is_outcome_equivalent_to_first_success(
        scripts in proptest::collection::vec(script(), 2..6)
    ) {
        let token = UsernamePasswordToken::new("alice", "correct horse");

        let plain = build(&scripts);
        let plain_result = Authenticator::new(as_realms(&plain))
            .with_policy(Arc::new(FirstSuccessWins))
            .authenticate(&token);

        let eager = build(&scripts);
        let eager_result = Authenticator::new(as_realms(&eager))
            .with_policy(Arc::new(FirstSuccessWinsEarlyExit))
            .authenticate(&token);

        prop_assert_eq!(fingerprint(&plain_result), fingerprint(&eager_result));

        // The eager variant never resolves a realm configured after the
        // first winner.
        if let Some(winner) = scripts
            .iter()
            .position(|script| matches!(script, Script::Identity(_)))
        {
            for realm in &eager[winner + 1..] {
                prop_assert_eq!(realm.resolve_calls(), 0);
            }
        }
    }

    #[test]
    fn first_success_keeps_only_the_earliest_identity(
        principals in proptest::collection::vec(principal(), 2..5)
    ) {
        let token = UsernamePasswordToken::new("alice", "correct horse");
        let realms: Vec<Arc<ScriptedRealm>> = principals
            .iter()
            .enumerate()
            .map(|(index, principal)| {
                Arc::new(ScriptedRealm::returning(
                    format!("realm-{index}"),
                    principal.clone(),
                ))
            })
            .collect();

        let outcome = Authenticator::new(as_realms(&realms))
            .with_policy(Arc::new(FirstSuccessWins))
            .authenticate(&token)
            .unwrap();

        prop_assert_eq!(outcome.principals().primary(), Some(principals[0].as_str()));
        prop_assert_eq!(outcome.principals().len(), 1);
    }
}
