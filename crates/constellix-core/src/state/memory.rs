// # Memory State Store
//
// In-memory implementation of StateStore.
//
// ## Purpose
//
// Holds resource state documents for the lifetime of the process. Useful for
// tests and for hosts that keep their own persistence.
//
// ## Crash Behavior
//
// All state is lost on restart. Resources whose identifiers are lost will be
// treated as absent and scheduled for creation again.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::state_store::{StateDocument, StateStore};

/// In-memory state store implementation
///
/// # Example
///
/// ```rust,no_run
/// use constellix_core::state::MemoryStateStore;
/// use constellix_core::traits::{StateDocument, StateStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryStateStore::new();
///
///     let doc = StateDocument::new("constellix_a_record_pool", serde_json::json!({}));
///     store.put("constellix_a_record_pool.web", &doc).await?;
///
///     assert!(store.get("constellix_a_record_pool.web").await?.is_some());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStateStore {
    inner: Arc<RwLock<HashMap<String, StateDocument>>>,
}

impl MemoryStateStore {
    /// Create a new empty memory state store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the number of documents in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, address: &str) -> Result<Option<StateDocument>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(address).cloned())
    }

    async fn put(&self, address: &str, document: &StateDocument) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.insert(address.to_string(), document.clone());
        Ok(())
    }

    async fn remove(&self, address: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.remove(address);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, Error> {
        let guard = self.inner.read().await;
        let mut addresses: Vec<String> = guard.keys().cloned().collect();
        addresses.sort();
        Ok(addresses)
    }

    async fn flush(&self) -> Result<(), Error> {
        // Nothing buffered
        Ok(())
    }
}
