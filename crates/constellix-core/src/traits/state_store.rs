// # State Store Trait
//
// Defines the resource state container and the interface for persisting it
// between lifecycle invocations.
//
// ## Purpose
//
// A resource's state is its identifier plus its configuration. The
// identifier is the only key used for read/update/delete; an empty
// identifier means the resource is absent and must be created.
//
// ## Implementations
//
// - In-memory: `state::MemoryStateStore`
// - JSON file: `state::FileStateStore`
//
// ## Usage
//
// ```rust,ignore
// use constellix_core::StateStore;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let store = /* StateStore implementation */;
//
//     if let Some(doc) = store.get("constellix_srv_record.sip").await? {
//         println!("sip is record {}", doc.id);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Typed state of one resource instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceState<C> {
    /// Provider-assigned identifier; empty while the resource is absent
    pub id: String,
    /// Declared and computed attributes
    pub config: C,
}

impl<C> ResourceState<C> {
    /// State for a resource that does not exist yet
    pub fn new(config: C) -> Self {
        Self {
            id: String::new(),
            config,
        }
    }

    /// State for a resource that already has an identifier
    pub fn with_id(id: impl Into<String>, config: C) -> Self {
        Self {
            id: id.into(),
            config,
        }
    }

    /// Whether the resource is known to exist remotely
    pub fn is_present(&self) -> bool {
        !self.id.is_empty()
    }

    /// Mark the resource absent
    pub fn clear_id(&mut self) {
        self.id.clear();
    }
}

/// Untyped state of one resource instance, as stored and exchanged with hosts
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StateDocument {
    /// Registry type name of the resource
    pub resource_type: String,
    /// Provider-assigned identifier; empty while the resource is absent
    #[serde(default)]
    pub id: String,
    /// Attributes in their snake_case configuration form
    #[serde(default)]
    pub attributes: serde_json::Value,
    /// Timestamp of the last successful lifecycle operation
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl StateDocument {
    /// Create a document for a resource that does not exist yet
    pub fn new(resource_type: impl Into<String>, attributes: serde_json::Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: String::new(),
            attributes,
            last_updated: chrono::Utc::now(),
        }
    }

    /// Encode typed state into a document
    pub fn encode<C: Serialize>(
        resource_type: impl Into<String>,
        state: &ResourceState<C>,
    ) -> Result<Self> {
        Ok(Self {
            resource_type: resource_type.into(),
            id: state.id.clone(),
            attributes: serde_json::to_value(&state.config)?,
            last_updated: chrono::Utc::now(),
        })
    }

    /// Decode the attributes into typed state
    ///
    /// `null` attributes decode to the configuration's default.
    pub fn decode<C: DeserializeOwned + Default>(&self) -> Result<ResourceState<C>> {
        let config = if self.attributes.is_null() {
            C::default()
        } else {
            serde_json::from_value(self.attributes.clone()).map_err(|e| {
                Error::invalid_input(format!(
                    "attributes do not match {}: {}",
                    self.resource_type, e
                ))
            })?
        };
        Ok(ResourceState {
            id: self.id.clone(),
            config,
        })
    }

    /// Whether the resource is known to exist remotely
    pub fn is_present(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Trait for state store implementations
///
/// Keys are resource addresses (`<type>.<name>`, e.g.
/// `constellix_mx_record.mail`).
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
///
/// ## Implementation Guidelines
///
/// - **Async I/O only**: Use async file/database operations, never blocking I/O
/// - **Explicit flush**: `flush()` must persist all pending changes
/// - **No background tasks**
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Get the stored document for an address
    ///
    /// # Returns
    ///
    /// - `Ok(Some(StateDocument))`: The stored document
    /// - `Ok(None)`: Nothing stored under this address
    /// - `Err(Error)`: Storage error
    async fn get(&self, address: &str) -> Result<Option<StateDocument>>;

    /// Create or replace the document for an address
    async fn put(&self, address: &str, document: &StateDocument) -> Result<()>;

    /// Remove the document for an address (no-op if absent)
    async fn remove(&self, address: &str) -> Result<()>;

    /// List all stored addresses
    async fn list(&self) -> Result<Vec<String>>;

    /// Persist any pending changes
    async fn flush(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Fixture {
        name: String,
        #[serde(default)]
        ttl: i64,
    }

    #[test]
    fn resource_state_presence_follows_id() {
        let mut state = ResourceState::with_id("42", Fixture::default());
        assert!(state.is_present());
        state.clear_id();
        assert!(!state.is_present());
        assert!(!ResourceState::new(Fixture::default()).is_present());
    }

    #[test]
    fn document_encodes_and_decodes_typed_state() {
        let state = ResourceState::with_id(
            "7",
            Fixture {
                name: "www".to_string(),
                ttl: 300,
            },
        );
        let doc = StateDocument::encode("fixture", &state).unwrap();
        assert_eq!(doc.attributes, json!({"name": "www", "ttl": 300}));

        let back: ResourceState<Fixture> = doc.decode().unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn null_attributes_decode_to_default() {
        let doc = StateDocument::new("fixture", serde_json::Value::Null);
        let state: ResourceState<Fixture> = doc.decode().unwrap();
        assert_eq!(state.config, Fixture::default());
        assert!(!state.is_present());
    }

    #[test]
    fn mismatched_attributes_are_invalid_input() {
        let doc = StateDocument::new("fixture", json!({"name": 5}));
        let result: Result<ResourceState<Fixture>> = doc.decode();
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
