// # Constellix API Client
//
// This crate provides the HTTP implementation of `ApiClient` for the
// Constellix DNS v1 REST API.
//
// ## Behavior
//
// - One HTTP request per call; no retry, backoff or rate limiting
// - HTTP timeout configured (30 seconds by default)
// - Status codes mapped to typed errors (401/403, 404, 429, others)
// - Dry-run mode: writes are only logged; GETs go out unless they target a
//   record the dry run itself pretended to create
// - Never spawns background tasks, never caches responses
//
// ## Authentication
//
// Every request carries three headers:
//
// - `x-cnsdns-apiKey`: the API key
// - `x-cnsdns-requestDate`: milliseconds since the Unix epoch
// - `x-cnsdns-hmac`: base64(HMAC-SHA1(secret key, requestDate))
//
// ## Security Requirements
//
// - Neither key ever appears in logs or `Debug` output
// - Construction fails if either key is empty

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use constellix_core::config::ClientConfig;
use constellix_core::traits::{ApiClient, ApiResponse};
use constellix_core::{Error, Result};
use hmac::{Hmac, Mac};
use reqwest::RequestBuilder;
use serde_json::Value;
use sha1::Sha1;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

type HmacSha1 = Hmac<Sha1>;

const API_KEY_HEADER: &str = "x-cnsdns-apikey";
const REQUEST_DATE_HEADER: &str = "x-cnsdns-requestdate";
const HMAC_HEADER: &str = "x-cnsdns-hmac";

/// Constellix REST client
///
/// # Dry-Run Mode
///
/// When `dry_run` is set, the client will:
/// - Perform GET requests
/// - Log POST/PUT/DELETE requests without sending them
/// - Answer writes with a synthetic body echoing the payload and `"id": 0`
/// - Answer GETs of `<collection>/0` from the synthetic body of the last
///   POST to that collection, so a create can read itself back
pub struct ConstellixClient {
    /// Keys, base URL and timeout
    /// ⚠️ NEVER log the keys
    config: ClientConfig,

    /// HTTP client for API requests
    http: reqwest::Client,

    /// Synthetic records by item path (dry-run only)
    dry_run_records: Mutex<HashMap<String, String>>,
}

// Custom Debug implementation that hides the keys
impl std::fmt::Debug for ConstellixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstellixClient")
            .field("api_key", &"<REDACTED>")
            .field("secret_key", &"<REDACTED>")
            .field("base_url", &self.config.base_url)
            .field("dry_run", &self.config.dry_run)
            .finish()
    }
}

impl ConstellixClient {
    /// Create a client from validated configuration
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if either key is empty, the base URL has no HTTP
    /// scheme, or the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        if config.dry_run {
            tracing::warn!("Constellix client running in DRY-RUN mode - no changes will be made");
        }

        Ok(Self {
            config: config.clone(),
            http,
            dry_run_records: Mutex::new(HashMap::new()),
        })
    }

    /// Whether writes are suppressed
    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    fn signed(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let request_date = chrono::Utc::now().timestamp_millis().to_string();
        let signature = sign(&self.config.secret_key, &request_date)?;

        Ok(builder
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(REQUEST_DATE_HEADER, request_date)
            .header(HMAC_HEADER, signature)
            .header("Content-Type", "application/json"))
    }

    async fn execute(&self, builder: RequestBuilder, path: &str) -> Result<ApiResponse> {
        let response = self
            .signed(builder)?
            .send()
            .await
            .map_err(|e| Error::http(format!("Request to {} failed: {}", path, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response from {}: {}", path, e)))?;

        if !(200..300).contains(&status) {
            tracing::debug!("{} answered with status {}", path, status);
            return Err(status_error(status, path, &body));
        }

        Ok(ApiResponse::new(status, body))
    }

    fn dry_run_response(&self, method: &str, path: &str, payload: Option<&Value>) -> ApiResponse {
        tracing::warn!("[DRY-RUN] Would send {} {}", method, path);
        if let Some(payload) = payload {
            tracing::info!("[DRY-RUN] Payload: {}", payload);
        }

        let mut body = match payload {
            Some(Value::Object(map)) => map.clone(),
            _ => serde_json::Map::new(),
        };
        body.insert("id".to_string(), Value::from(0));
        ApiResponse::new(200, Value::Object(body).to_string())
    }

    fn dry_run_record(&self, path: &str) -> Option<String> {
        let records = self.dry_run_records.lock().ok()?;
        records.get(path).cloned()
    }

    fn remember_dry_run_record(&self, path: String, body: Option<String>) {
        if let Ok(mut records) = self.dry_run_records.lock() {
            match body {
                Some(body) => records.insert(path, body),
                None => records.remove(&path),
            };
        }
    }
}

#[async_trait]
impl ApiClient for ConstellixClient {
    async fn get_by_id(&self, path: &str) -> Result<ApiResponse> {
        if self.config.dry_run
            && let Some(body) = self.dry_run_record(path)
        {
            tracing::debug!("[DRY-RUN] Answering GET {} from the synthetic record", path);
            return Ok(ApiResponse::new(200, body));
        }

        tracing::debug!("GET {}", path);
        let url = self.config.url_for(path);
        self.execute(self.http.get(url), path).await
    }

    async fn save(&self, payload: &Value, path: &str) -> Result<ApiResponse> {
        if self.config.dry_run {
            let response = self.dry_run_response("POST", path, Some(payload));
            self.remember_dry_run_record(format!("{}/0", path), Some(response.body.clone()));
            return Ok(response);
        }

        tracing::debug!("POST {}", path);
        let url = self.config.url_for(path);
        self.execute(self.http.post(url).json(payload), path).await
    }

    async fn update_by_id(&self, payload: &Value, path: &str) -> Result<ApiResponse> {
        if self.config.dry_run {
            let response = self.dry_run_response("PUT", path, Some(payload));
            if self.dry_run_record(path).is_some() {
                self.remember_dry_run_record(path.to_string(), Some(response.body.clone()));
            }
            return Ok(response);
        }

        tracing::debug!("PUT {}", path);
        let url = self.config.url_for(path);
        self.execute(self.http.put(url).json(payload), path).await
    }

    async fn delete_by_id(&self, path: &str) -> Result<()> {
        if self.config.dry_run {
            self.dry_run_response("DELETE", path, None);
            self.remember_dry_run_record(path.to_string(), None);
            return Ok(());
        }

        tracing::debug!("DELETE {}", path);
        let url = self.config.url_for(path);
        self.execute(self.http.delete(url), path).await.map(|_| ())
    }
}

/// Compute the `x-cnsdns-hmac` header for a request date
pub fn sign(secret_key: &str, request_date: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(secret_key.as_bytes())
        .map_err(|e| Error::config(format!("Invalid secret key: {}", e)))?;
    mac.update(request_date.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Map a non-success status to an error
fn status_error(status: u16, path: &str, body: &str) -> Error {
    match status {
        401 | 403 => Error::auth(format!(
            "Authentication failed for {}: invalid keys or insufficient permissions. Status: {}",
            path, status
        )),
        404 => Error::not_found(path),
        429 => Error::rate_limited(format!(
            "Rate limit exceeded on {}. Please retry later. Status: {}",
            path, status
        )),
        _ => Error::api(status, error_message(body)),
    }
}

/// Extract the message of an error body
///
/// Constellix reports `{"errors": ["..."]}`; anything else is passed through
/// as text.
fn error_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body)
        && let Some(Value::Array(errors)) = map.get("errors")
    {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| match e {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        if !messages.is_empty() {
            return messages.join("; ");
        }
    }

    let body = body.trim();
    if body.is_empty() {
        "empty response body".to_string()
    } else {
        body.to_string()
    }
}
