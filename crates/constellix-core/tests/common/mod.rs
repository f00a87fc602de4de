//! Test doubles and common utilities for adapter contract tests
//!
//! - [`MockApiClient`]: records every request and answers from a script
//! - [`LabelKind`]: a minimal domain-scoped record kind driven through the
//!   generic adapter

#![allow(dead_code)]

use constellix_core::error::{Error, Result};
use constellix_core::mapper::{PayloadMode, lenient};
use constellix_core::traits::{
    ApiClient, ApiResponse, Endpoint, KeyLayout, Mapper, RecordKind, Scope,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// HTTP verb of a recorded request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// One request seen by the mock client
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub payload: Option<Value>,
}

/// A mock ApiClient that records calls and replays scripted responses
///
/// Responses are consumed in order regardless of method. When the script
/// runs dry every request fails with a 500 so a test sees the extra call.
#[derive(Clone, Default)]
pub struct MockApiClient {
    calls: Arc<Mutex<Vec<Call>>>,
    script: Arc<Mutex<VecDeque<Result<ApiResponse>>>>,
    request_count: Arc<AtomicUsize>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    pub fn respond(&self, status: u16, body: impl Into<String>) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse::new(status, body)));
        self
    }

    /// Queue a JSON response with status 200
    pub fn respond_json(&self, body: Value) -> &Self {
        self.respond(200, body.to_string())
    }

    /// Queue a failure
    pub fn fail(&self, error: Error) -> &Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    /// All requests issued so far
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests issued so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Requests issued with a given method
    pub fn calls_with(&self, method: Method) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    fn next(&self, method: Method, path: &str, payload: Option<&Value>) -> Result<ApiResponse> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            payload: payload.cloned(),
        });

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::api(500, format!("unscripted request to {}", path))))
    }
}

#[async_trait::async_trait]
impl ApiClient for MockApiClient {
    async fn get_by_id(&self, path: &str) -> Result<ApiResponse> {
        self.next(Method::Get, path, None)
    }

    async fn save(&self, payload: &Value, path: &str) -> Result<ApiResponse> {
        self.next(Method::Post, path, Some(payload))
    }

    async fn update_by_id(&self, payload: &Value, path: &str) -> Result<ApiResponse> {
        self.next(Method::Put, path, Some(payload))
    }

    async fn delete_by_id(&self, path: &str) -> Result<()> {
        self.next(Method::Delete, path, None).map(|_| ())
    }
}

/// Configuration of the test record kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub domain_id: String,
    pub source_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRemote {
    #[serde(default, deserialize_with = "lenient::string")]
    name: String,
    #[serde(default, deserialize_with = "lenient::int")]
    ttl: i64,
    #[serde(default, deserialize_with = "lenient::boolean")]
    enabled: bool,
    #[serde(default, deserialize_with = "lenient::seq")]
    tags: Vec<String>,
}

/// Domain-scoped test record living under `.../records/label`
pub struct LabelKind;

impl RecordKind for LabelKind {
    type Config = Label;
    const TYPE_NAME: &'static str = "test_label";
}

impl Endpoint for LabelKind {
    const KEY_LAYOUT: KeyLayout = KeyLayout::Scoped;

    fn collection_path(config: &Label) -> Result<String> {
        let scope = Scope::new(config.source_type.as_str(), config.domain_id.as_str())?;
        Ok(format!("{}/records/label", scope.path_prefix()))
    }

    fn apply_scope(config: &mut Label, scope: &Scope) {
        config.source_type = scope.source_type.clone();
        config.domain_id = scope.domain_id.clone();
    }
}

impl Mapper for LabelKind {
    type Wire = LabelPayload;
    type Remote = LabelRemote;

    fn to_wire(config: &Label, mode: PayloadMode) -> Result<LabelPayload> {
        Ok(LabelPayload {
            name: mode.forward(Some(&config.name)),
            ttl: mode.forward(config.ttl.as_ref()),
            enabled: mode.forward(config.enabled.as_ref()),
            tags: mode.forward_collection(config.tags.iter().cloned().collect()),
        })
    }

    fn from_wire(config: &mut Label, remote: LabelRemote) {
        config.name = remote.name;
        config.ttl = Some(remote.ttl);
        config.enabled = Some(remote.enabled);
        config.tags = remote.tags.into_iter().collect();
    }
}

/// A label in domain 555 with two tags
pub fn sample_label() -> Label {
    Label {
        domain_id: "555".to_string(),
        source_type: "domains".to_string(),
        name: "www".to_string(),
        ttl: Some(300),
        enabled: None,
        tags: BTreeSet::from(["blue".to_string(), "green".to_string()]),
    }
}
