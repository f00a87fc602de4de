// # Resource Trait
//
// Type-erased lifecycle interface used by the registry and by hosts that
// only know a resource by its type name.
//
// Every `ResourceAdapter<K>` implements this by decoding the document's
// attributes into `K::Config`, running the typed operation and encoding the
// result back.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::traits::api_client::ApiClient;
use crate::traits::record_kind::KeyLayout;
use crate::traits::state_store::StateDocument;

/// Lifecycle operations over untyped state documents
///
/// The document is only written back when the operation succeeds, except
/// for `create`: once the remote record has an identifier the document
/// carries it, even when the follow-up read fails.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Registry type name of the resource
    fn type_name(&self) -> &'static str;

    /// Shape of the key accepted by [`Resource::import`]
    fn key_layout(&self) -> KeyLayout;

    /// Create the remote record and refresh the document from it
    async fn create(&self, document: &mut StateDocument) -> Result<()>;

    /// Refresh the document; a vanished record clears the identifier
    async fn read(&self, document: &mut StateDocument) -> Result<()>;

    /// Push the document's attributes and refresh it
    async fn update(&self, document: &mut StateDocument) -> Result<()>;

    /// Delete the remote record and clear the identifier
    async fn delete(&self, document: &mut StateDocument) -> Result<()>;

    /// Build a document for an existing record from its import key
    async fn import(&self, key: &str) -> Result<StateDocument>;
}

/// Helper trait for constructing resources bound to an API client
pub trait ResourceFactory: Send + Sync {
    /// Create a Resource instance that talks through `client`
    fn create(&self, client: Arc<dyn ApiClient>) -> Box<dyn Resource>;
}
