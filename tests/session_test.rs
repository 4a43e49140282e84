//! Session behaviour end to end: state container, controller and client

mod common;

use common::{result_with_sentence, session_with, ScriptedClient};
use factgraph_core::{
    AnalysisFailure, Completion, Disposition, NoticeLevel, UiState,
};
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_loading_clears_after_success() {
    let client = Arc::new(ScriptedClient::new().on(
        "Alice founded Acme.",
        Duration::from_millis(20),
        Ok(result_with_sentence("Alice founded Acme.")),
    ));
    let mut session = session_with(client.clone(), TIMEOUT);

    session.set_input("Alice founded Acme.");
    assert!(session.submit().is_some());
    assert!(session.state().loading(), "busy as soon as submitted");

    session.settle().await;
    assert!(!session.state().loading());
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_loading_clears_after_each_failure_kind() {
    let failures = [
        AnalysisFailure::Unreachable("connection refused".to_string()),
        AnalysisFailure::Rejected {
            status: 422,
            detail: "bad".to_string(),
        },
        AnalysisFailure::ServerError {
            status: 500,
            detail: "boom".to_string(),
        },
        AnalysisFailure::MalformedResponse("missing field `summary`".to_string()),
    ];

    for failure in failures {
        let client = Arc::new(ScriptedClient::new().on("text", Duration::ZERO, Err(failure.clone())));
        let mut session = session_with(client, TIMEOUT);

        session.set_input("text");
        session.submit();
        assert!(session.state().loading());

        session.settle().await;
        assert!(!session.state().loading(), "still loading after {:?}", failure);
    }
}

#[tokio::test]
async fn test_slow_call_times_out_and_clears_loading() {
    let client = Arc::new(ScriptedClient::new().on(
        "text",
        Duration::from_secs(10),
        Ok(result_with_sentence("never")),
    ));
    let mut session = session_with(client, Duration::from_millis(50));

    session.set_input("text");
    session.submit();
    session.settle().await;

    assert!(!session.state().loading());
    assert!(session.state().result().is_none());
    let notices = session.state_mut().take_notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message.contains("timed out"));
}

#[tokio::test]
async fn test_blank_input_never_reaches_client() {
    let client = Arc::new(ScriptedClient::new());
    let mut session = session_with(client.clone(), TIMEOUT);

    for blank in ["", "   ", "\n\t  \n"] {
        session.set_input(blank);
        assert_eq!(session.submit(), None);
        assert!(!session.state().loading());
    }

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(client.calls(), 0);
    assert_eq!(session.state_mut().take_notices().len(), 3);
}

#[tokio::test]
async fn test_most_recent_submission_wins_when_it_answers_first() {
    let client = Arc::new(
        ScriptedClient::new()
            .on("first", Duration::from_millis(200), Ok(result_with_sentence("first")))
            .on("second", Duration::from_millis(10), Ok(result_with_sentence("second"))),
    );
    let mut session = session_with(client.clone(), TIMEOUT);

    session.set_input("first");
    let first = session.submit().unwrap();
    // Let the first call reach the client before it is superseded
    tokio::time::sleep(Duration::from_millis(20)).await;
    session.set_input("second");
    let second = session.submit().unwrap();
    assert!(second > first);

    session.settle().await;
    assert_eq!(session.state().result().unwrap().summary[0].text, "second");

    // The superseded call was cancelled; whatever it reports is stale
    tokio::time::sleep(Duration::from_millis(300)).await;
    session.poll_completions();
    assert_eq!(session.state().result().unwrap().summary[0].text, "second");
    assert_eq!(client.seen(), vec!["first".to_string(), "second".to_string()]);
}

#[tokio::test]
async fn test_late_answer_to_older_request_is_discarded() {
    // Newer answers first, older arrives afterwards: the newer one stays
    let client = Arc::new(ScriptedClient::new());
    let mut session = session_with(client, TIMEOUT);

    session.set_input("first");
    let first = session.submit().unwrap();
    session.set_input("second");
    let second = session.submit().unwrap();

    let applied = session.apply(Completion {
        seq: second,
        outcome: Ok(result_with_sentence("second")),
    });
    assert_eq!(applied, Disposition::Applied);

    let late = session.apply(Completion {
        seq: first,
        outcome: Ok(result_with_sentence("first")),
    });
    assert_eq!(late, Disposition::Stale);
    assert_eq!(session.state().result().unwrap().summary[0].text, "second");
}

#[test]
fn test_state_level_overlap_keeps_latest_issued() {
    let mut state = UiState::default();
    state.input_change("first");
    let first = state.submit_start().unwrap();
    state.input_change("second");
    let second = state.submit_start().unwrap();

    assert_eq!(
        state.submit_success(second.seq, result_with_sentence("second")),
        Disposition::Applied
    );
    assert_eq!(
        state.submit_success(first.seq, result_with_sentence("first")),
        Disposition::Stale
    );
    assert_eq!(state.result().unwrap().summary[0].text, "second");
    assert!(!state.loading());
}

#[tokio::test]
async fn test_transport_failure_keeps_previous_result() {
    let client = Arc::new(
        ScriptedClient::new()
            .on("good", Duration::ZERO, Ok(result_with_sentence("kept")))
            .on(
                "bad",
                Duration::ZERO,
                Err(AnalysisFailure::Unreachable("connection refused".to_string())),
            ),
    );
    let mut session = session_with(client, TIMEOUT);

    session.set_input("good");
    session.submit();
    session.settle().await;
    session.state_mut().take_notices();
    let before = session.state().result().cloned();
    let revision = session.state().result_revision();

    session.set_input("bad");
    session.submit();
    session.settle().await;

    assert_eq!(session.state().result().cloned(), before);
    assert_eq!(session.state().result_revision(), revision);

    let notices = session.state_mut().take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].message.contains("unreachable"));

    // Raised once, not again on later polls
    session.poll_completions();
    assert!(session.state_mut().take_notices().is_empty());
}

#[tokio::test]
async fn test_cancel_then_resubmit() {
    let client = Arc::new(ScriptedClient::new().on(
        "slow",
        Duration::from_secs(10),
        Ok(result_with_sentence("slow")),
    ));
    let mut session = session_with(client, TIMEOUT);

    session.set_input("slow");
    let seq = session.submit().unwrap();
    assert_eq!(session.cancel(), Some(seq));
    assert!(!session.state().loading());

    let notices = session.state_mut().take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);

    // Cancelled completion arrives but is stale
    assert_eq!(session.next_completion().await, Some(Disposition::Stale));
    assert!(session.state().result().is_none());

    session.set_input("fast");
    session.submit();
    session.settle().await;
    assert!(session.state().result().is_some());
}
