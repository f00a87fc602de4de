//! Plugin-based resource registry
//!
//! The registry maps resource type names to factories, so hosts can drive any
//! registered record kind by name without hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use constellix_core::registry::ResourceRegistry;
//!
//! // Create a registry
//! let registry = ResourceRegistry::new();
//!
//! // Register record kinds
//! constellix_resources::register(&registry);
//!
//! // Create a resource bound to a client
//! let resource = registry.create_resource("constellix_srv_record", client)?;
//! resource.read(&mut document).await?;
//! ```
//!
//! ## Registration
//!
//! Record kind crates should register themselves during initialization:
//!
//! ```rust,ignore
//! pub fn register(registry: &ResourceRegistry) {
//!     registry.register_resource(
//!         SrvRecordKind::TYPE_NAME,
//!         Box::new(AdapterFactory::<SrvRecordKind>::new()),
//!     );
//! }
//! ```

use crate::error::{Error, Result};
use crate::traits::{ApiClient, Resource, ResourceFactory};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Resource registry for plugin-based resource creation
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ResourceRegistry {
    /// Registered resource factories by type name
    resources: RwLock<HashMap<String, Box<dyn ResourceFactory>>>,
}

impl ResourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource factory
    ///
    /// Registering the same name twice replaces the earlier factory.
    ///
    /// # Parameters
    ///
    /// - `name`: Resource type name (e.g., "constellix_mx_record")
    /// - `factory`: Factory object for creating resource instances
    pub fn register_resource(&self, name: impl Into<String>, factory: Box<dyn ResourceFactory>) {
        let name = name.into();
        let mut resources = self
            .resources
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if resources.insert(name.clone(), factory).is_some() {
            tracing::warn!("Resource type {} registered twice, keeping the latest", name);
        }
    }

    /// Create a resource bound to an API client
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn Resource>)`: Created resource instance
    /// - `Err(Error)`: If the type name is not registered
    pub fn create_resource(
        &self,
        name: &str,
        client: Arc<dyn ApiClient>,
    ) -> Result<Box<dyn Resource>> {
        let resources = self
            .resources
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let factory = resources
            .get(name)
            .ok_or_else(|| Error::config(format!("Unknown resource type: {}", name)))?;

        Ok(factory.create(client))
    }

    /// List all registered resource types, sorted by name
    pub fn list_resources(&self) -> Vec<String> {
        let resources = self
            .resources
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut names: Vec<String> = resources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a resource type is registered
    pub fn has_resource(&self, name: &str) -> bool {
        let resources = self
            .resources
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        resources.contains_key(name)
    }
}
