//! Session-level tests: strictness per stubbing, audit and verification.

use crate::double::MockSettings;
use crate::error::StrictnessError;
use crate::events::SessionAction;
use crate::invocation::Classification;
use crate::matcher::{ArgsPattern, any, arg_that};
use crate::report::{FindingKind, FindingOrigin, Reporter};
use crate::session::{MockingSession, VerificationMode};
use crate::strictness::Strictness;
use crate::{Double, Finding};
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// =========================================================================
// Helper functions
// =========================================================================

/// Strict session with one mock carrying a strict `simple_method("1")` and a
/// lenient `different_method("2")` stubbing.
fn strict_session_with_stubs() -> (MockingSession, Double) {
    let session = MockingSession::start(Strictness::Strict);
    let mock = session.mock("mock").unwrap();
    mock.stub("simple_method", [json!("1")])
        .then_return("1")
        .unwrap();
    mock.stub("different_method", [json!("2")])
        .lenient()
        .then_return("2")
        .unwrap();
    (session, mock)
}

fn unnecessary_message(err: StrictnessError) -> (String, Vec<Finding>) {
    match err {
        StrictnessError::UnnecessaryStubbing { message, findings } => (message, findings),
        other => panic!("expected unnecessary stubbing, got {:?}", other),
    }
}

// =========================================================================
// Strictness per stubbing
// =========================================================================

#[test]
fn potential_stubbing_problem() {
    let (_session, mock) = strict_session_with_stubs();

    // lenient stubbing tolerates argument drift
    assert_eq!(
        mock.call("different_method", [json!("200")]).unwrap(),
        json!(null)
    );

    // strict stubbing does not
    let err = mock.call("simple_method", [json!("100")]).unwrap_err();
    match err {
        StrictnessError::PotentialStubbingProblem { message, findings } => {
            assert!(message.contains(r#"mock.simple_method("100")"#));
            assert!(message.contains(r#"1. mock.simple_method("1")"#));
            assert_eq!(findings.len(), 2);
            assert_eq!(findings[0].origin, FindingOrigin::Invocation);
            assert_eq!(findings[0].arguments, Some(vec![json!("100")]));
            assert_eq!(findings[1].origin, FindingOrigin::Stubbing);
            assert_eq!(findings[1].method, "simple_method");
            assert!(
                findings
                    .iter()
                    .all(|f| f.kind == FindingKind::PotentialStubbingConflict)
            );
        }
        other => panic!("expected potential stubbing problem, got {:?}", other),
    }
}

#[test]
fn unnecessary_stubbing() {
    let (session, _mock) = strict_session_with_stubs();

    let (message, findings) = unnecessary_message(session.finish_mocking().unwrap_err());

    assert!(message.contains("1. -> "));
    assert!(message.contains(r#"mock.simple_method("1")"#));
    assert!(!message.contains("2. ->"));
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].method, "simple_method");
}

#[test]
fn verify_no_more_interactions_ignores_strict_but_flags_lenient_mismatch() {
    let (session, mock) = strict_session_with_stubs();

    mock.call("simple_method", [json!("1")]).unwrap();
    mock.call("different_method", [json!("200")]).unwrap();

    let err = session.verify_no_more_interactions(&[&mock]).unwrap_err();
    match err {
        StrictnessError::NoInteractionsWanted { message, findings } => {
            assert!(message.contains("But found this interaction on mock 'mock'"));
            assert!(message.contains(r#"mock.different_method("200")"#));
            assert!(message.contains("Actually, above is the only interaction with this mock"));
            assert_eq!(findings.len(), 1);
            assert_eq!(findings[0].arguments, Some(vec![json!("200")]));
        }
        other => panic!("expected no interactions wanted, got {:?}", other),
    }
}

#[test]
fn conflict_changes_no_usage_counter() {
    let session = MockingSession::start(Strictness::Strict);
    let mock = session.mock("mock").unwrap();
    let strict = mock.stub("m", [json!(1)]).then_return(1).unwrap();
    let lenient = mock.stub("m", [json!(2)]).lenient().then_return(2).unwrap();

    assert!(mock.call("m", [json!(3)]).is_err());

    assert_eq!(strict.use_count().unwrap(), 0);
    assert_eq!(lenient.use_count().unwrap(), 0);
}

#[test]
fn matched_lenient_stubbing_is_not_implicitly_verified() {
    let session = MockingSession::start(Strictness::Strict);
    let mock = session.mock("mock").unwrap();
    mock.stub("m", [json!(2)]).lenient().then_return(2).unwrap();

    mock.call("m", [json!(2)]).unwrap();

    let err = session.verify_no_more_interactions(&[&mock]).unwrap_err();
    assert!(matches!(err, StrictnessError::NoInteractionsWanted { .. }));
}

#[test]
fn lenient_stubbings_are_never_unnecessary() {
    let session = MockingSession::start(Strictness::Strict);
    let mock = session.mock("mock").unwrap();
    mock.stub("unused", [json!(1)]).lenient().then_return(1).unwrap();
    mock.stub("used", [json!(1)]).lenient().then_return(1).unwrap();

    mock.call("used", [json!(1)]).unwrap();

    session.finish_mocking().unwrap();
}

#[test]
fn lenient_session_reports_nothing() {
    let session = MockingSession::start(Strictness::Lenient);
    let mock = session.mock("mock").unwrap();
    mock.stub("m", [json!(1)]).then_return(1).unwrap();

    assert_eq!(mock.call("m", [json!(99)]).unwrap(), json!(null));
    session.finish_mocking().unwrap();
}

#[test]
fn strict_override_in_lenient_session() {
    let session = MockingSession::start(Strictness::Lenient);
    let mock = session.mock("mock").unwrap();
    mock.stub("m", [json!(1)])
        .with_strictness(Strictness::Strict)
        .then_return(1)
        .unwrap();

    let err = mock.call("m", [json!(2)]).unwrap_err();
    assert!(matches!(err, StrictnessError::PotentialStubbingProblem { .. }));
}

#[test]
fn unnecessary_findings_keep_session_wide_registration_order() {
    let session = MockingSession::start(Strictness::Strict);
    let first = session.mock("first").unwrap();
    let second = session.mock("second").unwrap();
    first.stub("a", [json!(1)]).then_return(1).unwrap();
    second.stub("b", [json!(1)]).then_return(1).unwrap();
    first.stub("c", [json!(1)]).then_return(1).unwrap();

    let (message, findings) = unnecessary_message(session.finish_mocking().unwrap_err());

    let described: Vec<_> = findings.iter().map(|f| f.description.as_str()).collect();
    assert_eq!(described, vec!["first.a(1)", "second.b(1)", "first.c(1)"]);
    assert!(message.contains("1. -> first.a(1)"));
    assert!(message.contains("2. -> second.b(1)"));
    assert!(message.contains("3. -> first.c(1)"));
}

// =========================================================================
// Interception
// =========================================================================

#[test]
fn later_stubbing_overrides_earlier() {
    let session = MockingSession::start(Strictness::Strict);
    let mock = session.mock("mock").unwrap();
    let old = mock.stub("m", [json!(1)]).then_return("old").unwrap();
    let new = mock.stub("m", [json!(1)]).then_return("new").unwrap();

    assert_eq!(mock.call("m", [json!(1)]).unwrap(), json!("new"));
    assert_eq!(old.use_count().unwrap(), 0);
    assert_eq!(new.use_count().unwrap(), 1);
}

#[test]
fn unstubbed_calls_return_the_default_answer() {
    let session = MockingSession::start(Strictness::Strict);
    let plain = session.mock("plain").unwrap();
    let custom = session
        .mock_with(MockSettings::new("custom").default_answer(json!([])))
        .unwrap();

    assert_eq!(plain.call("anything", []).unwrap(), json!(null));
    assert_eq!(custom.call("anything", []).unwrap(), json!([]));
}

#[test]
fn then_do_sees_the_invocation() {
    let session = MockingSession::start(Strictness::Strict);
    let mock = session.mock("calc").unwrap();
    mock.stub("double", ArgsPattern::new().arg(any()))
        .then_do(|inv| {
            let n = inv.args()[0]
                .as_i64()
                .ok_or_else(|| anyhow::anyhow!("not a number"))?;
            Ok(json!(n * 2))
        })
        .unwrap();

    assert_eq!(mock.call("double", [json!(21)]).unwrap(), json!(42));
    let err = mock.call("double", [json!("x")]).unwrap_err();
    assert!(matches!(err, StrictnessError::Answer(_)));
    assert_eq!(err.to_string(), "not a number");
}

#[test]
fn answers_may_call_other_mocks() {
    let session = MockingSession::start(Strictness::Strict);
    let inner = session.mock("inner").unwrap();
    let outer = session.mock("outer").unwrap();
    inner.stub("get", ArgsPattern::new()).then_return(7).unwrap();

    let inner_handle = inner.clone();
    outer
        .stub("get", ArgsPattern::new())
        .then_do(move |_| Ok(inner_handle.call("get", [])?))
        .unwrap();

    assert_eq!(outer.call("get", []).unwrap(), json!(7));
    session.finish_mocking().unwrap();
}

#[test]
fn then_fail_surfaces_as_answer_error() {
    let session = MockingSession::start(Strictness::Strict);
    let mock = session.mock("mock").unwrap();
    mock.stub("save", [json!("x")]).then_fail("disk full").unwrap();

    let err = mock.call("save", [json!("x")]).unwrap_err();
    assert!(matches!(err, StrictnessError::Answer(_)));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn consecutive_answers_then_last_repeats() {
    let session = MockingSession::start(Strictness::Strict);
    let mock = session.mock("mock").unwrap();
    mock.stub("next", ArgsPattern::new())
        .then_return(1)
        .unwrap()
        .then_fail("exhausted")
        .unwrap();

    assert_eq!(mock.call("next", []).unwrap(), json!(1));
    assert!(mock.call("next", []).is_err());
    assert!(mock.call("next", []).is_err());
}

#[test]
fn mock_level_strictness_applies_to_its_stubbings() {
    let session = MockingSession::start(Strictness::Strict);
    let relaxed = session
        .mock_with(MockSettings::new("relaxed").lenient())
        .unwrap();
    let handle = relaxed.stub("m", [json!(1)]).then_return(1).unwrap();
    let strict = relaxed
        .stub("s", [json!(1)])
        .with_strictness(Strictness::Strict)
        .then_return(1)
        .unwrap();

    assert_eq!(handle.effective_strictness().unwrap(), Strictness::Lenient);
    assert_eq!(strict.effective_strictness().unwrap(), Strictness::Strict);
    assert_eq!(relaxed.call("m", [json!(2)]).unwrap(), json!(null));
    assert!(relaxed.call("s", [json!(2)]).is_err());
}

#[test]
fn invocations_are_logged_with_classification() {
    let (session, mock) = strict_session_with_stubs();

    mock.call("simple_method", [json!("1")]).unwrap();
    mock.call("unstubbed", []).unwrap();

    let calls = mock.invocations().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].sequence(), 1);
    assert_eq!(calls[1].describe(), "mock.unstubbed()");
    assert!(calls[0].location().contains("tests.rs"));

    let invoked: Vec<_> = session
        .events()
        .unwrap()
        .into_iter()
        .filter(|e| e.action == SessionAction::Invoked)
        .collect();
    assert_eq!(invoked.len(), 2);
    assert_eq!(invoked[0].details["classification"]["state"], "matched");
    assert_eq!(invoked[1].details["classification"]["state"], "unmatched_free");
    assert_eq!(
        serde_json::to_value(Classification::UnmatchedConflict).unwrap()["state"],
        "unmatched_conflict"
    );
}

// =========================================================================
// Verification
// =========================================================================

#[test]
fn explicit_verify_marks_calls_verified() {
    let session = MockingSession::start(Strictness::Strict);
    let mock = session.mock("mock").unwrap();

    mock.call("log", [json!("a")]).unwrap();
    mock.call("log", [json!("b")]).unwrap();

    session
        .verify(&mock, "log", ArgsPattern::new().arg(any()), VerificationMode::Times(2))
        .unwrap();
    session.verify_no_more_interactions(&[&mock]).unwrap();
}

#[test]
fn verify_reports_count_mismatch() {
    let session = MockingSession::start(Strictness::Strict);
    let mock = session.mock("mock").unwrap();
    mock.call("log", [json!("a")]).unwrap();

    let err = session
        .verify(&mock, "log", [json!("a")], VerificationMode::Times(2))
        .unwrap_err();
    assert!(matches!(err, StrictnessError::Verification(_)));
    assert!(err.to_string().contains("Wanted 2 time(s) but was 1."));

    let err = session
        .verify(&mock, "log", [json!("z")], VerificationMode::AtLeastOnce)
        .unwrap_err();
    assert!(err.to_string().starts_with("Wanted but not invoked:"));

    session
        .verify(&mock, "log", [json!("z")], VerificationMode::Never)
        .unwrap();
}

#[test]
fn several_unverified_calls_are_all_listed() {
    let session = MockingSession::start(Strictness::Strict);
    let mock = session.mock("mock").unwrap();
    mock.call("a", []).unwrap();
    mock.call("b", []).unwrap();

    let err = session.verify_no_more_interactions(&[&mock]).unwrap_err();
    assert_eq!(err.findings().len(), 2);
    assert!(!err.to_string().contains("only interaction"));
}

#[test]
fn conflicting_call_is_still_an_unverified_interaction() {
    let (session, mock) = strict_session_with_stubs();

    assert!(mock.call("simple_method", [json!("100")]).is_err());

    let err = session.verify_no_more_interactions(&[&mock]).unwrap_err();
    let described: Vec<_> = err.findings().iter().map(|f| f.description.as_str()).collect();
    assert_eq!(described, vec![r#"mock.simple_method("100")"#]);
    assert_eq!(err.findings()[0].kind, FindingKind::UnverifiedInteraction);
}

#[test]
fn verify_no_more_interactions_is_scoped_to_given_doubles() {
    let session = MockingSession::start(Strictness::Strict);
    let quiet = session.mock("quiet").unwrap();
    let noisy = session.mock("noisy").unwrap();
    noisy.call("ping", []).unwrap();

    session.verify_no_more_interactions(&[&quiet]).unwrap();
    let err = session
        .verify_no_more_interactions(&[&quiet, &noisy])
        .unwrap_err();
    assert_eq!(err.findings()[0].mock, "noisy");
}

#[test]
fn verification_works_after_finish() {
    let (session, mock) = strict_session_with_stubs();
    mock.call("simple_method", [json!("1")]).unwrap();

    session.finish_mocking().unwrap();
    session.verify_no_more_interactions(&[&mock]).unwrap();
}

// =========================================================================
// Lifecycle and misuse
// =========================================================================

#[test]
fn second_finish_is_misuse_and_reports_nothing_new() {
    let (session, _mock) = strict_session_with_stubs();

    assert!(matches!(
        session.finish_mocking(),
        Err(StrictnessError::UnnecessaryStubbing { .. })
    ));
    assert!(session.is_closed().unwrap());

    let err = session.finish_mocking().unwrap_err();
    assert!(err.is_misuse());
    assert!(err.findings().is_empty());
}

#[test]
fn finish_after_failure_skips_audit() {
    let (session, _mock) = strict_session_with_stubs();

    session.finish_mocking_after_failure().unwrap();
    assert!(session.is_closed().unwrap());
    assert!(session.finish_mocking().unwrap_err().is_misuse());
}

#[test]
fn closed_session_rejects_stubs_calls_and_mocks() {
    let session = MockingSession::start(Strictness::Strict);
    let mock = session.mock("mock").unwrap();
    let handle = mock.stub("m", ArgsPattern::new()).then_return(1).unwrap();
    mock.call("m", []).unwrap();
    session.finish_mocking().unwrap();

    assert!(mock.stub("m", ArgsPattern::new()).then_return(2).unwrap_err().is_misuse());
    assert!(mock.call("m", []).unwrap_err().is_misuse());
    assert!(session.mock("late").unwrap_err().is_misuse());
    assert!(handle.then_return(3).unwrap_err().is_misuse());
}

#[test]
fn dropped_session_makes_doubles_unusable() {
    let session = MockingSession::start(Strictness::Strict);
    let mock = session.mock("orphan").unwrap();
    drop(session);

    let err = mock.call("m", []).unwrap_err();
    assert!(err.is_misuse());
    assert!(err.to_string().contains("orphan"));
}

#[test]
fn foreign_double_is_rejected() {
    let session = MockingSession::start(Strictness::Strict);
    let other = MockingSession::start(Strictness::Strict);
    let foreign = other.mock("foreign").unwrap();

    let err = session.verify_no_more_interactions(&[&foreign]).unwrap_err();
    assert!(err.is_misuse());
    assert!(session.verify_no_more_interactions(&[]).unwrap_err().is_misuse());
}

// =========================================================================
// Configuration, reporter and journal
// =========================================================================

#[test]
fn session_from_config() {
    let config = crate::SessionConfig::from_yaml(
        "strictness: lenient\nname: from config\nrecord_events: false",
    )
    .unwrap();

    let session = MockingSession::from_config(&config).unwrap();
    assert_eq!(session.strictness(), Strictness::Lenient);
    assert_eq!(session.name(), "from config");
    assert!(session.events().unwrap().is_empty());
}

#[test]
fn hidden_locations_are_not_rendered() {
    let session = MockingSession::builder().show_locations(false).start();
    let mock = session.mock("mock").unwrap();
    mock.stub("m", ArgsPattern::new()).then_return(1).unwrap();

    let err = session.finish_mocking().unwrap_err();
    assert!(!err.to_string().contains(" at "));
    assert!(err.findings()[0].location.contains("tests.rs"));
}

struct CountingReporter;

impl Reporter for CountingReporter {
    fn render(&self, kind: FindingKind, findings: &[Finding]) -> String {
        format!("{:?}: {}", kind, findings.len())
    }
}

#[test]
fn custom_reporter_renders_messages() {
    let session = MockingSession::builder()
        .name("custom")
        .reporter(CountingReporter)
        .start();
    let mock = session.mock("mock").unwrap();
    mock.stub("a", ArgsPattern::new()).then_return(1).unwrap();
    mock.stub("b", ArgsPattern::new()).then_return(1).unwrap();

    let err = session.finish_mocking().unwrap_err();
    assert_eq!(err.to_string(), "UnnecessaryStubbing: 2");
}

#[test]
fn journal_tracks_the_lifecycle() {
    let (session, mock) = strict_session_with_stubs();
    let _ = mock.call("simple_method", [json!("9")]);
    let _ = session.finish_mocking();

    let actions: Vec<_> = session
        .events()
        .unwrap()
        .iter()
        .map(|e| e.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            SessionAction::Start,
            SessionAction::MockCreated,
            SessionAction::Stubbed,
            SessionAction::Stubbed,
            SessionAction::Invoked,
            SessionAction::StubbingProblem,
            SessionAction::Finished,
        ]
    );

    let ndjson = session.events_ndjson().unwrap();
    assert_eq!(ndjson.lines().count(), actions.len());
    assert!(ndjson.lines().all(|l| l.contains("\"session\":\"mocking session\"")));
}

// =========================================================================
// Re-entrant access
// =========================================================================

#[test]
fn matcher_touching_the_session_gets_misuse_instead_of_panic() {
    let session = MockingSession::start(Strictness::Strict);
    let mock = session.mock("mock").unwrap();
    let other = session.mock("other").unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let peeked = other.clone();
    let pattern = ArgsPattern::new().arg(arg_that("peeks at other", move |_| {
        sink.borrow_mut().push(peeked.invocations().map(|calls| calls.len()));
        sink.borrow_mut().push(peeked.call("get", []).map(|_| 0));
        true
    }));
    mock.stub("m", pattern).then_return(1).unwrap();

    assert_eq!(mock.call("m", [json!(1)]).unwrap(), json!(1));

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    for result in seen.iter() {
        let err = result.as_ref().unwrap_err();
        assert!(err.is_misuse());
        assert!(err.to_string().contains("re-entrant access"));
    }
    assert!(other.invocations().unwrap().is_empty());
}

struct PeekingReporter {
    mock: Rc<RefCell<Option<Double>>>,
    rejected: Rc<Cell<bool>>,
}

impl Reporter for PeekingReporter {
    fn render(&self, _kind: FindingKind, findings: &[Finding]) -> String {
        if let Some(mock) = self.mock.borrow().as_ref() {
            self.rejected
                .set(mock.invocations().is_err_and(|e| e.is_misuse()));
        }
        format!("{} finding(s)", findings.len())
    }
}

#[test]
fn reporter_touching_the_session_gets_misuse_instead_of_panic() {
    let slot = Rc::new(RefCell::new(None));
    let rejected = Rc::new(Cell::new(false));
    let session = MockingSession::builder()
        .reporter(PeekingReporter {
            mock: Rc::clone(&slot),
            rejected: Rc::clone(&rejected),
        })
        .start();
    let mock = session.mock("mock").unwrap();
    *slot.borrow_mut() = Some(mock.clone());
    mock.stub("m", [json!(1)]).then_return(1).unwrap();

    let err = mock.call("m", [json!(2)]).unwrap_err();

    assert!(matches!(err, StrictnessError::PotentialStubbingProblem { .. }));
    assert_eq!(err.to_string(), "2 finding(s)");
    assert!(rejected.get());
    assert!(!session.is_closed().unwrap());
    assert_eq!(mock.invocations().unwrap().len(), 1);
}
