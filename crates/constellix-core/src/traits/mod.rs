//! Core traits for the Constellix resource adapters
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`ApiClient`]: Issue requests against the Constellix REST API
//! - [`RecordKind`], [`Endpoint`], [`Mapper`]: Describe one record type
//! - [`Resource`]: Type-erased lifecycle operations
//! - [`StateStore`]: Persistence of resource state between invocations

pub mod api_client;
pub mod record_kind;
pub mod resource;
pub mod state_store;

pub use api_client::{ApiClient, ApiResponse};
pub use record_kind::{Endpoint, ImportKey, KeyLayout, Mapper, RecordKind, Scope};
pub use resource::{Resource, ResourceFactory};
pub use state_store::{ResourceState, StateDocument, StateStore};
