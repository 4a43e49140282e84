//! Request controller
//!
//! Runs analysis calls off the UI flow of control. Each dispatched call is
//! bounded by a timeout and a cancellation token; its outcome comes back as
//! a [`Completion`] on an unbounded channel, tagged with the request
//! sequence number so the state container can drop superseded answers.

use crate::client::AnalysisClient;
use crate::error::AnalysisFailure;
use crate::state::{RequestSeq, SubmitTicket};
use crate::types::{AnalysisRequest, AnalysisResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Outcome of one dispatched request
#[derive(Debug, Clone)]
pub struct Completion {
    pub seq: RequestSeq,
    pub outcome: Result<AnalysisResult, AnalysisFailure>,
}

/// Dispatches analysis calls and tracks the one that matters
pub struct RequestController {
    client: Arc<dyn AnalysisClient>,
    timeout: Duration,
    /// Parent of every request token; cancelled on teardown
    root: CancellationToken,
    current: Option<(RequestSeq, CancellationToken)>,
    completions: mpsc::UnboundedSender<Completion>,
}

impl RequestController {
    /// Create a controller and the receiving end of its completions
    pub fn new(
        client: Arc<dyn AnalysisClient>,
        timeout: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            client,
            timeout,
            root: CancellationToken::new(),
            current: None,
            completions: tx,
        };
        (controller, rx)
    }

    /// Spawn the call for `ticket`, cancelling the previous one
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, ticket: SubmitTicket) {
        if let Some((previous, token)) = self.current.take() {
            debug!("Cancelling request {} (superseded by {})", previous, ticket.seq);
            token.cancel();
        }

        let token = self.root.child_token();
        self.current = Some((ticket.seq, token.clone()));

        let client = Arc::clone(&self.client);
        let timeout = self.timeout;
        let tx = self.completions.clone();

        debug!("Dispatching request {}", ticket.seq);
        tokio::spawn(async move {
            let outcome = bounded_call(client.as_ref(), &ticket.request, timeout, &token).await;
            debug!(
                "Request {} settled: {}",
                ticket.seq,
                if outcome.is_ok() { "ok" } else { "failed" }
            );
            if tx
                .send(Completion {
                    seq: ticket.seq,
                    outcome,
                })
                .is_err()
            {
                debug!("Completion receiver dropped, discarding request {}", ticket.seq);
            }
        });
    }

    /// Abort the in-flight request, if any
    pub fn cancel_current(&mut self) -> Option<RequestSeq> {
        let (seq, token) = self.current.take()?;
        debug!("Cancelling request {}", seq);
        token.cancel();
        Some(seq)
    }

    /// Forget the token of a request that has settled
    pub fn settled(&mut self, seq: RequestSeq) {
        if matches!(&self.current, Some((current, _)) if *current == seq) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<RequestSeq> {
        self.current.as_ref().map(|(seq, _)| *seq)
    }

    /// Cancel everything, now and later
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }
}

impl Drop for RequestController {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

async fn bounded_call(
    client: &dyn AnalysisClient,
    request: &AnalysisRequest,
    timeout: Duration,
    token: &CancellationToken,
) -> Result<AnalysisResult, AnalysisFailure> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(AnalysisFailure::Cancelled),
        outcome = tokio::time::timeout(timeout, client.analyze(request)) => {
            outcome.unwrap_or(Err(AnalysisFailure::Timeout { after: timeout }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockAnalysisClient;
    use crate::state::UiState;
    use async_trait::async_trait;

    struct SlowClient {
        delay: Duration,
    }

    #[async_trait]
    impl AnalysisClient for SlowClient {
        async fn analyze(&self, _request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisFailure> {
            tokio::time::sleep(self.delay).await;
            Ok(AnalysisResult::default())
        }
    }

    fn ticket(state: &mut UiState, text: &str) -> SubmitTicket {
        state.input_change(text);
        state.submit_start().unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_delivers_completion() {
        let mut mock = MockAnalysisClient::new();
        mock.expect_analyze()
            .times(1)
            .returning(|req| {
                assert_eq!(req.text, "Alice founded Acme.");
                Ok(AnalysisResult::default())
            });

        let (mut controller, mut rx) = RequestController::new(Arc::new(mock), Duration::from_secs(5));
        let mut state = UiState::default();
        let t = ticket(&mut state, "Alice founded Acme.");
        let seq = t.seq;
        controller.dispatch(t);

        let completion = rx.recv().await.unwrap();
        assert_eq!(completion.seq, seq);
        assert!(completion.outcome.is_ok());
    }

    #[tokio::test]
    async fn test_timeout_bounds_the_call() {
        let client = SlowClient {
            delay: Duration::from_secs(10),
        };
        let (mut controller, mut rx) = RequestController::new(Arc::new(client), Duration::from_millis(50));
        let mut state = UiState::default();
        controller.dispatch(ticket(&mut state, "text"));

        let completion = rx.recv().await.unwrap();
        assert_eq!(
            completion.outcome,
            Err(AnalysisFailure::Timeout {
                after: Duration::from_millis(50)
            })
        );
    }

    #[tokio::test]
    async fn test_new_dispatch_cancels_previous() {
        let client = SlowClient {
            delay: Duration::from_millis(200),
        };
        let (mut controller, mut rx) = RequestController::new(Arc::new(client), Duration::from_secs(5));
        let mut state = UiState::default();
        let first = ticket(&mut state, "first");
        let first_seq = first.seq;
        controller.dispatch(first);
        let second = ticket(&mut state, "second");
        let second_seq = second.seq;
        controller.dispatch(second);

        let a = rx.recv().await.unwrap();
        assert_eq!(a.seq, first_seq);
        assert_eq!(a.outcome, Err(AnalysisFailure::Cancelled));

        let b = rx.recv().await.unwrap();
        assert_eq!(b.seq, second_seq);
        assert!(b.outcome.is_ok());
        assert_eq!(controller.current(), Some(second_seq));
    }

    #[tokio::test]
    async fn test_cancel_current() {
        let client = SlowClient {
            delay: Duration::from_secs(10),
        };
        let (mut controller, mut rx) = RequestController::new(Arc::new(client), Duration::from_secs(30));
        let mut state = UiState::default();
        let t = ticket(&mut state, "text");
        let seq = t.seq;
        controller.dispatch(t);

        assert_eq!(controller.cancel_current(), Some(seq));
        assert_eq!(controller.cancel_current(), None);
        let completion = rx.recv().await.unwrap();
        assert_eq!(completion.outcome, Err(AnalysisFailure::Cancelled));
    }

    #[tokio::test]
    async fn test_shutdown_cancels_later_dispatches() {
        let client = SlowClient {
            delay: Duration::from_secs(10),
        };
        let (mut controller, mut rx) = RequestController::new(Arc::new(client), Duration::from_secs(30));
        controller.shutdown();
        assert!(controller.is_shut_down());

        let mut state = UiState::default();
        controller.dispatch(ticket(&mut state, "text"));
        let completion = rx.recv().await.unwrap();
        assert_eq!(completion.outcome, Err(AnalysisFailure::Cancelled));
    }

    #[tokio::test]
    async fn test_settled_clears_current_only_for_matching_seq() {
        let mut mock = MockAnalysisClient::new();
        mock.expect_analyze().returning(|_| Ok(AnalysisResult::default()));
        let (mut controller, mut rx) = RequestController::new(Arc::new(mock), Duration::from_secs(5));
        let mut state = UiState::default();
        let t = ticket(&mut state, "text");
        let seq = t.seq;
        controller.dispatch(t);
        rx.recv().await.unwrap();

        let other = ticket(&mut state, "other").seq;
        controller.settled(other);
        assert_eq!(controller.current(), Some(seq));
        controller.settled(seq);
        assert_eq!(controller.current(), None);
    }
}
