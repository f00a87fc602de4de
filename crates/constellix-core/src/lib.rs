// # constellix-core
//
// Core library for managing Constellix DNS records as declarative resources.
//
// ## Architecture Overview
//
// - **ApiClient**: Trait for issuing requests against the Constellix REST API
// - **RecordKind / Endpoint / Mapper**: Describe one record type (paths,
//   import key shape, payload mapping)
// - **ResourceAdapter**: Generic create/read/update/delete/import over any
//   record kind
// - **ResourceRegistry**: Plugin-based registry of record kinds by type name
// - **StateStore**: Persistence of resource identifiers and attributes
//
// ## Design Principles
//
// 1. **One adapter, many kinds**: lifecycle logic is written once; a record
//    kind only supplies its endpoint and its mapping
// 2. **Typed wire records**: responses decode into per-kind structs; scalars
//    are coerced, structure is checked
// 3. **Plugin-Based**: record kinds are registered by name
// 4. **Library-First**: the binary is a thin host over this crate

pub mod adapter;
pub mod config;
pub mod error;
pub mod mapper;
pub mod registry;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use adapter::{AdapterFactory, ResourceAdapter};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use mapper::PayloadMode;
pub use registry::ResourceRegistry;
pub use state::{FileStateStore, MemoryStateStore};
pub use traits::{
    ApiClient, ApiResponse, Endpoint, Mapper, RecordKind, Resource, ResourceState, StateDocument,
    StateStore,
};
