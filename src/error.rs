//! Error types for FactGraph
//!
//! `AnalysisFailure` and `InputRejection` are the user-facing taxonomy: each
//! variant renders as a distinct notice. `FactGraphError` is the crate-level
//! error for everything else (configuration, I/O, serialization) and wraps
//! the first two when they need to cross an API boundary.

use std::time::Duration;
use thiserror::Error;

/// Why an analysis call did not produce a result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisFailure {
    /// No response within the configured bound
    #[error("Analysis timed out after {}s", .after.as_secs())]
    Timeout { after: Duration },

    /// Could not connect or the transport broke mid-exchange
    #[error("Analysis endpoint unreachable: {0}")]
    Unreachable(String),

    /// The endpoint refused the request (4xx)
    #[error("Analysis request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// The endpoint failed while processing (5xx or any other non-success)
    #[error("Analysis service error ({status}): {detail}")]
    ServerError { status: u16, detail: String },

    /// Success status but the body is not a usable analysis result
    #[error("Malformed analysis response: {0}")]
    MalformedResponse(String),

    /// Superseded, aborted by the user, or torn down
    #[error("Analysis cancelled")]
    Cancelled,
}

impl AnalysisFailure {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, detail: String) -> Self {
        if (400..500).contains(&status) {
            AnalysisFailure::Rejected { status, detail }
        } else {
            AnalysisFailure::ServerError { status, detail }
        }
    }
}

/// Why a submission was refused before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputRejection {
    #[error("Please enter some text first.")]
    Empty,

    #[error("Text is {chars} characters long; the limit is {max}.")]
    TooLong { chars: usize, max: usize },
}

/// Main error type for FactGraph operations
#[derive(Error, Debug)]
pub enum FactGraphError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Config could not be written
    #[error("Config write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// HTTP client setup error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Analysis call failed
    #[error(transparent)]
    Analysis(#[from] AnalysisFailure),

    /// Submission refused
    #[error(transparent)]
    Input(#[from] InputRejection),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for FactGraph operations
pub type Result<T> = std::result::Result<T, FactGraphError>;

/// Convert anyhow::Error to FactGraphError
impl From<anyhow::Error> for FactGraphError {
    fn from(err: anyhow::Error) -> Self {
        FactGraphError::Other(err.to_string())
    }
}
