// # API Client Trait
//
// Defines the interface the resource adapters use to reach the Constellix
// REST API.
//
// ## Implementations
//
// - reqwest/HMAC: `constellix-client` crate
// - Recording mocks: `tests/common/mod.rs`
//
// ## Usage
//
// ```rust,ignore
// use constellix_core::ApiClient;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let client = /* ApiClient implementation */;
//
//     let response = client.get_by_id("v1/pools/A/42").await?;
//     println!("{}", response.body);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Raw answer to a successful API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code (always a success code)
    pub status: u16,
    /// Response body as returned by the server
    pub body: String,
}

impl ApiResponse {
    /// Create a response from a status and body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Trait for Constellix API client implementations
///
/// Paths are versioned and relative (`v1/pools/A/42`); the client owns the
/// base URL and authentication.
///
/// # Error mapping
///
/// Implementations map non-success statuses onto [`crate::Error`]:
///
/// - 404 → [`crate::Error::NotFound`]
/// - 401/403 → [`crate::Error::Authentication`]
/// - 429 → [`crate::Error::RateLimited`]
/// - anything else → [`crate::Error::Api`]
///
/// Transport failures become [`crate::Error::Http`].
///
/// # No retry logic
///
/// Clients perform exactly one round trip per call. Adapters never retry
/// either; a failed call ends the current lifecycle operation.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Fetch a single resource
    async fn get_by_id(&self, path: &str) -> Result<ApiResponse, crate::Error>;

    /// Create a resource under a collection path (POST)
    async fn save(
        &self,
        payload: &serde_json::Value,
        path: &str,
    ) -> Result<ApiResponse, crate::Error>;

    /// Replace an existing resource (PUT)
    async fn update_by_id(
        &self,
        payload: &serde_json::Value,
        path: &str,
    ) -> Result<ApiResponse, crate::Error>;

    /// Delete an existing resource
    async fn delete_by_id(&self, path: &str) -> Result<(), crate::Error>;
}
