//! Generic resource adapter
//!
//! `ResourceAdapter<K>` implements the five lifecycle operations once for
//! every record kind `K: Endpoint + Mapper`:
//!
//! ```text
//!            create                 update
//!  absent ───────────▶ present ◀──────────▶ present
//!    ▲                    │
//!    │      delete        │ read (404)
//!    └────────────────────┘
//! ```
//!
//! ## Operation contract
//!
//! | operation | request | on success |
//! |---|---|---|
//! | create | `POST {collection}` (set, non-zero fields only) | id from response, then read |
//! | read | `GET {collection}/{id}` | every persisted field overwritten |
//! | update | `PUT {collection}/{id}` (every field with a value) | read |
//! | delete | `DELETE {collection}/{id}` | id cleared |
//! | import | `GET {collection}/{record_id}` | new state, scope taken from the key |
//!
//! A 404 on read clears the identifier and succeeds. A 404 on delete or
//! import is an error.
//!
//! Operations are sequential: every request is awaited before the next one
//! is issued and nothing is spawned. There is no retry.

use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::mapper::{self, PayloadMode};
use crate::traits::{
    ApiClient, Endpoint, KeyLayout, Mapper, Resource, ResourceFactory, ResourceState,
    StateDocument,
};

/// Lifecycle operations for one record kind
pub struct ResourceAdapter<K> {
    client: Arc<dyn ApiClient>,
    kind: PhantomData<fn() -> K>,
}

impl<K> Clone for ResourceAdapter<K> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            kind: PhantomData,
        }
    }
}

impl<K> std::fmt::Debug for ResourceAdapter<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceAdapter")
            .field("kind", &std::any::type_name::<K>())
            .finish()
    }
}

impl<K: Endpoint + Mapper> ResourceAdapter<K> {
    /// Create an adapter that talks through `client`
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self {
            client,
            kind: PhantomData,
        }
    }

    /// Create the remote record
    ///
    /// Only fields that are set to a non-zero value are sent. The identifier
    /// is taken from the write response, after which exactly one read
    /// refreshes the state; the final state reflects that read.
    ///
    /// # Errors
    ///
    /// - the write fails
    /// - the response carries no usable `id` ([`Error::UnexpectedShape`])
    /// - the follow-up read fails
    pub async fn create(&self, state: &mut ResourceState<K::Config>) -> Result<()> {
        let path = K::collection_path(&state.config)?;
        let payload = serde_json::to_value(K::to_wire(&state.config, PayloadMode::Create)?)?;

        debug!("Creating {} at {}", K::TYPE_NAME, path);
        let response = self.client.save(&payload, &path).await?;

        let object = mapper::decode_object_tolerant(&response.body)
            .map_err(|e| shape_context(K::TYPE_NAME, "create response", e))?;
        state.id = mapper::format_id(object.get("id"))
            .map_err(|e| shape_context(K::TYPE_NAME, "create response", e))?;
        info!("Created {} {}", K::TYPE_NAME, state.id);

        self.read(state).await
    }

    /// Refresh state from the remote record
    ///
    /// An empty identifier means the resource is already absent; nothing is
    /// requested. A 404 clears the identifier and leaves every other field
    /// as it was.
    pub async fn read(&self, state: &mut ResourceState<K::Config>) -> Result<()> {
        if !state.is_present() {
            debug!("{} has no identifier, nothing to read", K::TYPE_NAME);
            return Ok(());
        }

        let path = K::item_path(&state.config, &state.id)?;
        debug!("Reading {} from {}", K::TYPE_NAME, path);

        let response = match self.client.get_by_id(&path).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                warn!(
                    "{} {} no longer exists, marking it absent",
                    K::TYPE_NAME,
                    state.id
                );
                state.clear_id();
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        Self::apply_response(state, &response.body)
    }

    /// Push the current configuration to the remote record
    ///
    /// Every field with a value is sent, including fields that have not
    /// changed since the last read. The identifier is unchanged; a read
    /// follows.
    pub async fn update(&self, state: &mut ResourceState<K::Config>) -> Result<()> {
        Self::require_id(state, "update")?;

        let path = K::item_path(&state.config, &state.id)?;
        let payload = serde_json::to_value(K::to_wire(&state.config, PayloadMode::Update)?)?;

        debug!("Updating {} at {}", K::TYPE_NAME, path);
        self.client.update_by_id(&payload, &path).await?;
        info!("Updated {} {}", K::TYPE_NAME, state.id);

        self.read(state).await
    }

    /// Delete the remote record and clear the identifier
    ///
    /// A 404 is not tolerated here and surfaces as [`Error::NotFound`].
    pub async fn delete(&self, state: &mut ResourceState<K::Config>) -> Result<()> {
        Self::require_id(state, "delete")?;

        let path = K::item_path(&state.config, &state.id)?;
        debug!("Deleting {} at {}", K::TYPE_NAME, path);
        self.client.delete_by_id(&path).await?;

        info!("Deleted {} {}", K::TYPE_NAME, state.id);
        state.clear_id();
        Ok(())
    }

    /// Build state for an existing record from its import key
    ///
    /// `source_type` and `domain_id` come from the key, never from the
    /// response. A 404 is an error.
    pub async fn import(&self, key: &str) -> Result<ResourceState<K::Config>> {
        debug!("{}: Beginning import of {}", key, K::TYPE_NAME);
        let parsed = K::KEY_LAYOUT.parse(key)?;

        let mut state = ResourceState::with_id(parsed.record_id, K::Config::default());
        if let Some(scope) = &parsed.scope {
            K::apply_scope(&mut state.config, scope);
        }

        let path = K::item_path(&state.config, &state.id)?;
        let response = self.client.get_by_id(&path).await?;
        Self::apply_response(&mut state, &response.body)?;

        if let Some(scope) = &parsed.scope {
            K::apply_scope(&mut state.config, scope);
        }

        debug!("{} finished import", state.id);
        Ok(state)
    }

    fn apply_response(state: &mut ResourceState<K::Config>, body: &str) -> Result<()> {
        let object = mapper::decode_object(body)
            .map_err(|e| shape_context(K::TYPE_NAME, "read response", e))?;
        let id = mapper::format_id(object.get("id"))
            .map_err(|e| shape_context(K::TYPE_NAME, "read response", e))?;
        let remote: K::Remote =
            serde_json::from_value(serde_json::Value::Object(object)).map_err(|e| {
                Error::unexpected_shape(format!("{} read response: {}", K::TYPE_NAME, e))
            })?;

        K::from_wire(&mut state.config, remote);
        state.id = id;
        Ok(())
    }

    fn require_id(state: &ResourceState<K::Config>, operation: &str) -> Result<()> {
        if state.is_present() {
            Ok(())
        } else {
            Err(Error::invalid_input(format!(
                "cannot {} {} without an identifier",
                operation,
                K::TYPE_NAME
            )))
        }
    }

    fn decode(document: &StateDocument) -> Result<ResourceState<K::Config>> {
        if document.resource_type != K::TYPE_NAME {
            return Err(Error::invalid_input(format!(
                "state belongs to {}, not {}",
                document.resource_type,
                K::TYPE_NAME
            )));
        }
        document.decode()
    }
}

fn shape_context(type_name: &str, what: &str, err: Error) -> Error {
    match err {
        Error::UnexpectedShape(msg) => {
            Error::unexpected_shape(format!("{} {}: {}", type_name, what, msg))
        }
        other => other,
    }
}

#[async_trait]
impl<K: Endpoint + Mapper> Resource for ResourceAdapter<K> {
    fn type_name(&self) -> &'static str {
        K::TYPE_NAME
    }

    fn key_layout(&self) -> KeyLayout {
        K::KEY_LAYOUT
    }

    async fn create(&self, document: &mut StateDocument) -> Result<()> {
        let mut state = Self::decode(document)?;
        let outcome = ResourceAdapter::<K>::create(self, &mut state).await;
        // The record exists remotely once an id was assigned, even if the read failed
        *document = StateDocument::encode(K::TYPE_NAME, &state)?;
        outcome
    }

    async fn read(&self, document: &mut StateDocument) -> Result<()> {
        let mut state = Self::decode(document)?;
        ResourceAdapter::<K>::read(self, &mut state).await?;
        *document = StateDocument::encode(K::TYPE_NAME, &state)?;
        Ok(())
    }

    async fn update(&self, document: &mut StateDocument) -> Result<()> {
        let mut state = Self::decode(document)?;
        ResourceAdapter::<K>::update(self, &mut state).await?;
        *document = StateDocument::encode(K::TYPE_NAME, &state)?;
        Ok(())
    }

    async fn delete(&self, document: &mut StateDocument) -> Result<()> {
        let mut state = Self::decode(document)?;
        ResourceAdapter::<K>::delete(self, &mut state).await?;
        *document = StateDocument::encode(K::TYPE_NAME, &state)?;
        Ok(())
    }

    async fn import(&self, key: &str) -> Result<StateDocument> {
        let state = ResourceAdapter::<K>::import(self, key).await?;
        StateDocument::encode(K::TYPE_NAME, &state)
    }
}

/// Factory producing [`ResourceAdapter`]s for one record kind
pub struct AdapterFactory<K> {
    kind: PhantomData<fn() -> K>,
}

impl<K> AdapterFactory<K> {
    /// Create a factory for kind `K`
    pub fn new() -> Self {
        Self { kind: PhantomData }
    }
}

impl<K> Default for AdapterFactory<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Endpoint + Mapper> ResourceFactory for AdapterFactory<K> {
    fn create(&self, client: Arc<dyn ApiClient>) -> Box<dyn Resource> {
        Box::new(ResourceAdapter::<K>::new(client))
    }
}
