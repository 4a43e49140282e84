//! Analysis session: the state container wired to the request controller
//!
//! The session is the only owner of [`UiState`]. Completions are applied on
//! the caller's flow of control, never from the spawned request tasks.

use crate::client::AnalysisClient;
use crate::controller::{Completion, RequestController};
use crate::config::InputSettings;
use crate::error::AnalysisFailure;
use crate::state::{Disposition, RequestSeq, UiState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

pub struct AnalysisSession {
    state: UiState,
    controller: RequestController,
    completions: mpsc::UnboundedReceiver<Completion>,
}

impl AnalysisSession {
    pub fn new(client: Arc<dyn AnalysisClient>, input_settings: InputSettings, timeout: Duration) -> Self {
        let (controller, completions) = RequestController::new(client, timeout);
        Self {
            state: UiState::new(input_settings),
            controller,
            completions,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut UiState {
        &mut self.state
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.input_change(text);
    }

    /// Submit the current input
    ///
    /// Returns the issued sequence number, or `None` when the input was
    /// rejected (a notice explains why and nothing is sent).
    pub fn submit(&mut self) -> Option<RequestSeq> {
        let ticket = self.state.submit_start().ok()?;
        let seq = ticket.seq;
        self.controller.dispatch(ticket);
        Some(seq)
    }

    /// Abort the in-flight request; the state settles immediately
    pub fn cancel(&mut self) -> Option<RequestSeq> {
        let seq = self.controller.cancel_current()?;
        self.state.submit_failure(seq, AnalysisFailure::Cancelled);
        Some(seq)
    }

    /// Apply one completion to the state
    pub fn apply(&mut self, completion: Completion) -> Disposition {
        self.controller.settled(completion.seq);
        match completion.outcome {
            Ok(result) => self.state.submit_success(completion.seq, result),
            Err(failure) => self.state.submit_failure(completion.seq, failure),
        }
    }

    /// Apply every completion that has already arrived, without waiting
    pub fn poll_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion and apply it
    pub async fn next_completion(&mut self) -> Option<Disposition> {
        let completion = self.completions.recv().await?;
        Some(self.apply(completion))
    }

    /// Wait until no request is outstanding
    pub async fn settle(&mut self) {
        while self.state.loading() {
            if self.next_completion().await.is_none() {
                debug!("Completion channel closed while loading");
                break;
            }
        }
    }

    /// Cancel all outstanding and future work
    pub fn shutdown(&self) {
        self.controller.shutdown();
    }
}
