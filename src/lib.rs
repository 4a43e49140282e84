//! FactGraph - AI summarizer and knowledge verification client
//!
//! Sends a document to an analysis service and presents what comes back:
//! - A summary where every sentence carries a verification status and a
//!   confidence score, with hallucination risks flagged
//! - An entity knowledge graph (nodes grouped by entity type, plus links)
//!
//! # Architecture
//!
//! - **Types**: Wire format of the analysis exchange
//! - **State**: Pure UI state transitions (input, loading, result, notices)
//! - **Controller**: Request lifecycle (timeout, cancellation, supersession)
//! - **Session**: State plus controller, driven by the caller
//! - **Summary / Graph**: Presentation of a result
//! - **TUI**: Terminal front end built on ratatui
//!
//! # Example
//!
//! ```ignore
//! use factgraph_core::{AnalysisSession, FactGraphConfig, HttpAnalysisClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = FactGraphConfig::default();
//!     let client = Arc::new(HttpAnalysisClient::from_config(&config)?);
//!     let mut session = AnalysisSession::new(client, config.input.clone(), config.request_timeout());
//!
//!     session.set_input("Alice founded Acme in 1999.");
//!     session.submit();
//!     session.settle().await;
//!
//!     if let Some(result) = session.state().result() {
//!         for line in factgraph_core::summary::plain_lines(&result.summary) {
//!             println!("{}", line);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod graph;
pub mod session;
pub mod state;
pub mod summary;
pub mod tui;
pub mod types;

// Re-export commonly used types
pub use client::{AnalysisClient, HttpAnalysisClient};
pub use config::{FactGraphConfig, InputSettings, LimitMode};
pub use controller::{Completion, RequestController};
pub use error::{AnalysisFailure, FactGraphError, InputRejection, Result};
pub use graph::{GraphHints, GraphRenderer, GraphScene, GraphViewport, ViewportContent, ViewportSize};
pub use session::AnalysisSession;
pub use state::{Disposition, Notice, NoticeLevel, RequestSeq, UiState};
pub use types::{
    AnalysisRequest, AnalysisResult, AnnotatedSentence, GraphData, GraphLink, GraphNode, NodeGroup,
    SentenceStatus,
};
