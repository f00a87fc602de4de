//! Wire shapes shared by domain-scoped records (MX, SRV)
//!
//! Both kinds carry the same scalar attributes and differ only in their
//! `roundRobin` entries, so the payload and the response are generic over the
//! entry type.

use constellix_core::Result;
use constellix_core::mapper::lenient;
use constellix_core::traits::Scope;
use serde::{Deserialize, Serialize};

/// Collection path of a record type under `v1/{source_type}/{domain_id}`
pub(crate) fn records_path(source_type: &str, domain_id: &str, record: &str) -> Result<String> {
    let scope = Scope::new(source_type, domain_id)?;
    Ok(format!("{}/records/{}", scope.path_prefix(), record))
}

/// Write payload of a domain-scoped record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPayload<R> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_answer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gtd_region: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_robin: Option<Vec<R>>,
}

/// Read response of a domain-scoped record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "R: Deserialize<'de>"))]
pub struct RecordRemote<R> {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::int")]
    pub ttl: i64,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub no_answer: bool,
    #[serde(default, deserialize_with = "lenient::string")]
    pub note: String,
    #[serde(default, deserialize_with = "lenient::int")]
    pub gtd_region: i64,
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub record_type: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub parent_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub parent: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub source: String,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub round_robin: Vec<R>,
}
