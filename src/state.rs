//! UI state container
//!
//! All state the interface holds lives in [`UiState`] and changes only
//! through its transition methods, so every transition can be exercised
//! without a terminal. The container also issues request sequence numbers:
//! a completion is applied only when it answers the most recently issued
//! request.

use crate::config::{InputSettings, LimitMode};
use crate::error::{AnalysisFailure, InputRejection};
use crate::graph::{GraphViewport, ViewportSize};
use crate::types::{AnalysisRequest, AnalysisResult};
use std::fmt;
use tracing::{debug, info, warn};

/// Monotonic request sequence number, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(u64);

impl RequestSeq {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Accepted submission, ready to dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub seq: RequestSeq,
    pub request: AnalysisRequest,
}

/// Whether a completion changed the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Applied,
    /// Answer to a superseded request, dropped
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// User-facing message raised by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Process-local interface state
#[derive(Debug, Clone)]
pub struct UiState {
    input_text: String,
    result: Option<AnalysisResult>,
    /// Bumped every time `result` is replaced
    result_revision: u64,
    last_issued: u64,
    in_flight: Option<RequestSeq>,
    viewport: GraphViewport,
    input_settings: InputSettings,
    notices: Vec<Notice>,
}

impl UiState {
    pub fn new(input_settings: InputSettings) -> Self {
        Self {
            input_text: String::new(),
            result: None,
            result_revision: 0,
            last_issued: 0,
            in_flight: None,
            viewport: GraphViewport::default(),
            input_settings,
            notices: Vec::new(),
        }
    }

    // === Transitions ===

    pub fn input_change(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
    }

    /// Validate the input and issue a new request
    ///
    /// A rejection raises a warning notice and leaves everything else as is.
    /// An accepted submission supersedes whatever was in flight.
    pub fn submit_start(&mut self) -> Result<SubmitTicket, InputRejection> {
        if let Err(rejection) = self.validate_input() {
            debug!("Submission rejected: {}", rejection);
            self.notices
                .push(Notice::new(NoticeLevel::Warning, rejection.to_string()));
            return Err(rejection);
        }

        let chars = self.input_chars();
        if chars > self.input_settings.max_chars {
            self.notices.push(Notice::new(
                NoticeLevel::Warning,
                format!(
                    "Text is {} characters long; the advised limit is {}. Submitting anyway.",
                    chars, self.input_settings.max_chars
                ),
            ));
        }

        self.last_issued += 1;
        let seq = RequestSeq(self.last_issued);
        if let Some(previous) = self.in_flight.replace(seq) {
            debug!("Request {} supersedes {}", seq, previous);
        }

        Ok(SubmitTicket {
            seq,
            request: AnalysisRequest::new(self.input_text.clone()),
        })
    }

    /// Apply a successful response if it answers the latest request
    pub fn submit_success(&mut self, seq: RequestSeq, result: AnalysisResult) -> Disposition {
        if self.in_flight != Some(seq) {
            warn!("Discarding stale result for request {}", seq);
            return Disposition::Stale;
        }

        let out_of_range = result.out_of_range_confidences();
        if out_of_range > 0 {
            warn!(
                "{} sentence(s) carry a confidence outside [0, 1]; rendering unclamped",
                out_of_range
            );
        }

        info!(
            "Applied result for request {}: {} sentences",
            seq,
            result.summary.len()
        );
        self.result = Some(result);
        self.result_revision += 1;
        self.in_flight = None;
        Disposition::Applied
    }

    /// Record a failed call if it answers the latest request
    ///
    /// `result` is never touched; exactly one notice is raised.
    pub fn submit_failure(&mut self, seq: RequestSeq, failure: AnalysisFailure) -> Disposition {
        if self.in_flight != Some(seq) {
            debug!("Ignoring failure of superseded request {}: {}", seq, failure);
            return Disposition::Stale;
        }

        self.in_flight = None;
        let notice = match &failure {
            AnalysisFailure::Cancelled => Notice::new(NoticeLevel::Info, failure.to_string()),
            AnalysisFailure::Unreachable(_) => Notice::new(
                NoticeLevel::Error,
                format!("{}. Is the analysis service running?", failure),
            ),
            _ => Notice::new(NoticeLevel::Error, failure.to_string()),
        };
        warn!("Request {} failed: {}", seq, failure);
        self.notices.push(notice);
        Disposition::Applied
    }

    /// Record the graph container size for the current result
    pub fn viewport_resize(&mut self, size: ViewportSize) {
        self.viewport.record_measurement(size, self.result_revision);
    }

    /// Drain notices raised since the last call
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // === Queries ===

    pub fn validate_input(&self) -> Result<(), InputRejection> {
        if self.input_text.trim().is_empty() {
            return Err(InputRejection::Empty);
        }

        let chars = self.input_chars();
        if self.input_settings.limit == LimitMode::Reject && chars > self.input_settings.max_chars {
            return Err(InputRejection::TooLong {
                chars,
                max: self.input_settings.max_chars,
            });
        }
        Ok(())
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn input_chars(&self) -> usize {
        self.input_text.chars().count()
    }

    pub fn over_limit(&self) -> bool {
        self.input_chars() > self.input_settings.max_chars
    }

    pub fn input_settings(&self) -> &InputSettings {
        &self.input_settings
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn result_revision(&self) -> u64 {
        self.result_revision
    }

    /// True exactly while the latest issued request is outstanding
    pub fn loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<RequestSeq> {
        self.in_flight
    }

    pub fn viewport(&self) -> &GraphViewport {
        &self.viewport
    }

    /// The graph container has not been measured since the result changed
    pub fn needs_viewport_measure(&self) -> bool {
        self.viewport.needs_measure(self.result_revision)
    }

    pub fn pending_notices(&self) -> &[Notice] {
        &self.notices
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(InputSettings::default())
    }
}
