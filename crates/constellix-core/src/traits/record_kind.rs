// # Record Kind Traits
//
// Describes one Constellix record type to the generic resource adapter.
//
// A record kind is a capability set:
//
// - [`RecordKind`]: the type name and the configuration struct
// - [`Endpoint`]: where the record lives and how its import key is shaped
// - [`Mapper`]: how configuration becomes a write payload and how a read
//   response flows back into configuration
//
// `ResourceAdapter<K>` implements create/read/update/delete/import once for
// every `K: Endpoint + Mapper`.
//
// ## Implementations
//
// - A-record pool, MX record, SRV record: `constellix-resources` crate

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::mapper::PayloadMode;

/// Separator between import key segments
pub const IMPORT_KEY_DELIMITER: char = ':';

/// Identity of a record kind
pub trait RecordKind: Send + Sync + 'static {
    /// Typed configuration for one resource instance
    type Config: Clone
        + Default
        + std::fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Registry type name (e.g. `constellix_srv_record`)
    const TYPE_NAME: &'static str;
}

/// Where a record kind lives in the REST API
pub trait Endpoint: RecordKind {
    /// Shape of the key accepted by import
    const KEY_LAYOUT: KeyLayout;

    /// Collection path records of this kind are created under
    ///
    /// Fails when the configuration lacks the path segments it needs.
    fn collection_path(config: &Self::Config) -> Result<String>;

    /// Path of a single record
    fn item_path(config: &Self::Config, id: &str) -> Result<String> {
        Ok(format!("{}/{}", Self::collection_path(config)?, id))
    }

    /// Copy the scope segments of an import key into configuration
    ///
    /// Only called for kinds whose [`KeyLayout`] is `Scoped`.
    fn apply_scope(_config: &mut Self::Config, _scope: &Scope) {}
}

/// Conversion between configuration and wire records
pub trait Mapper: RecordKind {
    /// Write payload sent on create and update
    type Wire: Serialize;

    /// Read response, decoded leniently
    type Remote: DeserializeOwned;

    /// Build the write payload (ToWire)
    ///
    /// Server-assigned and read-only fields are never included.
    fn to_wire(config: &Self::Config, mode: PayloadMode) -> Result<Self::Wire>;

    /// Overwrite configuration from a read response (FromWire)
    ///
    /// Every persisted field is replaced. Fields that only exist in the import
    /// key or the request path are left alone.
    fn from_wire(config: &mut Self::Config, remote: Self::Remote);
}

/// The `{sourceType}/{domainId}` prefix of child records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// `domains` or `templates`
    pub source_type: String,
    /// Numeric id of the owning domain or template
    pub domain_id: String,
}

impl Scope {
    /// Create a scope, rejecting empty segments
    pub fn new(source_type: impl Into<String>, domain_id: impl Into<String>) -> Result<Self> {
        let source_type = source_type.into();
        let domain_id = domain_id.into();
        if source_type.is_empty() {
            return Err(Error::invalid_input("source_type is required"));
        }
        if domain_id.is_empty() {
            return Err(Error::invalid_input("domain_id is required"));
        }
        Ok(Self {
            source_type,
            domain_id,
        })
    }

    /// Versioned path prefix for records in this scope
    pub fn path_prefix(&self) -> String {
        format!("v1/{}/{}", self.source_type, self.domain_id)
    }
}

/// Import key layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLayout {
    /// A bare record id (top-level pools)
    Bare,
    /// `sourceType:domainId:recordId` (records owned by a domain)
    Scoped,
}

impl KeyLayout {
    /// Number of segments a key of this layout has
    pub fn segments(self) -> usize {
        match self {
            KeyLayout::Bare => 1,
            KeyLayout::Scoped => 3,
        }
    }

    /// Split and validate an import key
    pub fn parse(self, key: &str) -> Result<ImportKey> {
        let parts: Vec<&str> = key.split(IMPORT_KEY_DELIMITER).collect();
        if parts.len() != self.segments() {
            return Err(Error::invalid_import_key(
                key,
                format!(
                    "expected {} segment(s) separated by '{}', got {}",
                    self.segments(),
                    IMPORT_KEY_DELIMITER,
                    parts.len()
                ),
            ));
        }
        if let Some(position) = parts.iter().position(|p| p.is_empty()) {
            return Err(Error::invalid_import_key(
                key,
                format!("segment {} is empty", position + 1),
            ));
        }

        match self {
            KeyLayout::Bare => Ok(ImportKey {
                scope: None,
                record_id: parts[0].to_string(),
            }),
            KeyLayout::Scoped => Ok(ImportKey {
                scope: Some(Scope {
                    source_type: parts[0].to_string(),
                    domain_id: parts[1].to_string(),
                }),
                record_id: parts[2].to_string(),
            }),
        }
    }
}

/// A parsed import key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportKey {
    /// Present for `Scoped` layouts
    pub scope: Option<Scope>,
    /// Identifier of the record to import
    pub record_id: String,
}
