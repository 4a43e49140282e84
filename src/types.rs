//! Core data types for FactGraph
//!
//! Wire types of the analysis endpoint. The client never mutates an
//! [`AnalysisResult`] after accepting it; the graph payload is passed through
//! to the rendering collaborator as received.

use crate::error::AnalysisFailure;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of the outbound analysis call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Verification label attached to a summary sentence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SentenceStatus {
    /// Supported by the source text
    Verified,
    /// Potentially unsupported by the source text
    HallucinationRisk,
    /// Neither supported nor contradicted
    Unverified,
    /// Any label this client does not know about
    Other(String),
}

impl SentenceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SentenceStatus::Verified => "Verified",
            SentenceStatus::HallucinationRisk => "Hallucination Risk",
            SentenceStatus::Unverified => "Unverified",
            SentenceStatus::Other(label) => label,
        }
    }
}

impl From<String> for SentenceStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Verified" => SentenceStatus::Verified,
            "Hallucination Risk" => SentenceStatus::HallucinationRisk,
            "Unverified" => SentenceStatus::Unverified,
            _ => SentenceStatus::Other(label),
        }
    }
}

impl From<SentenceStatus> for String {
    fn from(status: SentenceStatus) -> Self {
        match status {
            SentenceStatus::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SentenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sentence of the returned summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedSentence {
    pub text: String,
    pub status: SentenceStatus,
    /// Nominally in [0, 1]; not clamped
    pub confidence: f64,
}

/// Entity group: the backend sends either a label or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeGroup {
    Label(String),
    Number(serde_json::Number),
}

impl fmt::Display for NodeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeGroup::Label(label) => f.write_str(label),
            NodeGroup::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Graph node (an extracted entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub group: NodeGroup,
}

/// Graph edge between two node ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// Knowledge graph payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphData {
    /// Distinct groups in first-seen order
    pub fn groups(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for node in &self.nodes {
            let key = node.group.to_string();
            if !seen.contains(&key) {
                seen.push(key);
            }
        }
        seen
    }
}

/// Complete response of one successful analysis call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: Vec<AnnotatedSentence>,
    #[serde(default)]
    pub graph_data: Option<GraphData>,
}

impl AnalysisResult {
    /// Reject results that cannot be rendered faithfully
    pub fn validate(&self) -> Result<(), AnalysisFailure> {
        if let Some((idx, _)) = self
            .summary
            .iter()
            .enumerate()
            .find(|(_, s)| !s.confidence.is_finite())
        {
            return Err(AnalysisFailure::MalformedResponse(format!(
                "summary[{}].confidence is not a finite number",
                idx
            )));
        }
        Ok(())
    }

    /// Sentences whose confidence lies outside [0, 1]
    pub fn out_of_range_confidences(&self) -> usize {
        self.summary
            .iter()
            .filter(|s| !(0.0..=1.0).contains(&s.confidence))
            .count()
    }
}
