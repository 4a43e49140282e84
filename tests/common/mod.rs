//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use factgraph_core::{
    AnalysisClient, AnalysisFailure, AnalysisRequest, AnalysisResult, AnalysisSession,
    InputSettings,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned answer for one input text
#[derive(Clone)]
pub struct Script {
    pub delay: Duration,
    pub outcome: Result<AnalysisResult, AnalysisFailure>,
}

/// Fake client answering from a per-text script
///
/// Unknown texts answer immediately with an empty result.
#[derive(Default)]
pub struct ScriptedClient {
    scripts: Mutex<HashMap<String, Script>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, text: &str, delay: Duration, outcome: Result<AnalysisResult, AnalysisFailure>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(text.to_string(), Script { delay, outcome });
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisClient for ScriptedClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.text.clone());

        let script = self.scripts.lock().unwrap().get(&request.text).cloned();
        match script {
            Some(script) => {
                tokio::time::sleep(script.delay).await;
                script.outcome
            }
            None => Ok(AnalysisResult::default()),
        }
    }
}

/// Session over `client` with default input settings
pub fn session_with(client: Arc<ScriptedClient>, timeout: Duration) -> AnalysisSession {
    AnalysisSession::new(client, InputSettings::default(), timeout)
}

/// Result whose single sentence is `text`
pub fn result_with_sentence(text: &str) -> AnalysisResult {
    serde_json::from_value(json!({
        "summary": [{"text": text, "status": "Verified", "confidence": 0.9}]
    }))
    .unwrap()
}

/// A representative service response
pub fn sample_response() -> Value {
    json!({
        "summary": [
            {"text": "Alice founded Acme in 1999.", "status": "Verified", "confidence": 0.97},
            {"text": "Acme is headquartered on Mars.", "status": "Hallucination Risk", "confidence": 0.42}
        ],
        "graph_data": {
            "nodes": [
                {"id": "Alice", "group": "PERSON"},
                {"id": "Acme", "group": "ORG"},
                {"id": "1999", "group": "DATE"}
            ],
            "links": [
                {"source": "Alice", "target": "Acme"},
                {"source": "Acme", "target": "1999", "value": 1}
            ]
        }
    })
}

/// Serve `router` on an ephemeral local port
pub async fn spawn_stub(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Endpoint URL for a stub bound at `addr`
pub fn endpoint(addr: SocketAddr) -> String {
    format!("http://{}/analyze", addr)
}

/// A local port with nothing listening on it
pub async fn closed_port() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
