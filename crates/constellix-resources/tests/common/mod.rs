//! Recording API client for record kind scenario tests

#![allow(dead_code)]

use constellix_core::error::{Error, Result};
use constellix_core::traits::{ApiClient, ApiResponse};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One request seen by the mock client
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub payload: Option<Value>,
}

/// A mock ApiClient that records calls and replays scripted responses
#[derive(Clone, Default)]
pub struct RecordingClient {
    calls: Arc<Mutex<Vec<Call>>>,
    script: Arc<Mutex<VecDeque<Result<ApiResponse>>>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: impl Into<String>) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse::new(status, body)));
        self
    }

    pub fn fail(&self, error: Error) -> &Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, method: &'static str, path: &str, payload: Option<&Value>) -> Result<ApiResponse> {
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
impl ApiClient for RecordingClient {
    async fn get_by_id(&self, path: &str) -> Result<ApiResponse> {
        self.next("GET", path, None)
    }

    async fn save(&self, payload: &Value, path: &str) -> Result<ApiResponse> {
        self.next("POST", path, Some(payload))
    }

    async fn update_by_id(&self, payload: &Value, path: &str) -> Result<ApiResponse> {
        self.next("PUT", path, Some(payload))
    }

    async fn delete_by_id(&self, path: &str) -> Result<()> {
        self.next("DELETE", path, None).map(|_| ())
    }
}
