//! A-record pool (`constellix_a_record_pool`)
//!
//! Pools are account-level objects living under `v1/pools/A`. They are
//! imported by their bare identifier.

use std::collections::BTreeSet;

use constellix_core::Result;
use constellix_core::mapper::{self, PayloadMode, lenient};
use constellix_core::traits::{Endpoint, KeyLayout, Mapper, RecordKind};
use serde::{Deserialize, Serialize};

/// Collection path of A-record pools
pub const POOL_COLLECTION_PATH: &str = "v1/pools/A";

/// Configuration of an A-record pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ARecordPool {
    pub name: String,
    /// Number of values returned per query
    pub num_return: i64,
    pub min_available_failover: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// `"true"` or `"false"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_flag: Option<String>,
    /// `"true"` or `"false"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_flag: Option<String>,
    pub values: BTreeSet<PoolValue>,
}

/// One address in a pool
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolValue {
    pub value: String,
    pub weight: i64,
    /// `"true"` or `"false"`; empty is sent as `false` and read back as `"false"`
    pub disable_flag: String,
    pub check_id: i64,
    pub policy: String,
}

/// Record kind descriptor for A-record pools
#[derive(Debug, Clone, Copy, Default)]
pub struct ARecordPoolKind;

impl RecordKind for ARecordPoolKind {
    type Config = ARecordPool;
    const TYPE_NAME: &'static str = "constellix_a_record_pool";
}

impl Endpoint for ARecordPoolKind {
    const KEY_LAYOUT: KeyLayout = KeyLayout::Bare;

    fn collection_path(_config: &ARecordPool) -> Result<String> {
        Ok(POOL_COLLECTION_PATH.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_return: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_available_failover: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failed_flag: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disable_flag: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Vec<PoolValuePayload>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct PoolValuePayload {
    value: String,
    weight: i64,
    disable_flag: bool,
    check_id: i64,
    policy: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRemote {
    #[serde(default, deserialize_with = "lenient::string")]
    name: String,
    #[serde(default, deserialize_with = "lenient::int")]
    num_return: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    min_available_failover: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    note: String,
    #[serde(default, deserialize_with = "lenient::int")]
    version: i64,
    #[serde(default, deserialize_with = "lenient::boolean")]
    failed_flag: bool,
    #[serde(default, deserialize_with = "lenient::boolean")]
    disable_flag: bool,
    #[serde(default, deserialize_with = "lenient::seq")]
    values: Vec<PoolValueRemote>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PoolValueRemote {
    #[serde(default, deserialize_with = "lenient::string")]
    value: String,
    #[serde(default, deserialize_with = "lenient::int")]
    weight: i64,
    #[serde(default, deserialize_with = "lenient::boolean")]
    disable_flag: bool,
    #[serde(default, deserialize_with = "lenient::int")]
    check_id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    policy: String,
}

fn optional_flag(field: &str, raw: Option<&String>) -> Result<Option<bool>> {
    raw.map(|raw| mapper::parse_flag(field, raw)).transpose()
}

impl Mapper for ARecordPoolKind {
    type Wire = PoolPayload;
    type Remote = PoolRemote;

    fn to_wire(config: &ARecordPool, mode: PayloadMode) -> Result<PoolPayload> {
        let failed_flag = optional_flag("failed_flag", config.failed_flag.as_ref())?;
        let disable_flag = optional_flag("disable_flag", config.disable_flag.as_ref())?;

        let values = config
            .values
            .iter()
            .map(|v| {
                Ok(PoolValuePayload {
                    value: v.value.clone(),
                    weight: v.weight,
                    disable_flag: mapper::parse_flag("values.disable_flag", &v.disable_flag)?,
                    check_id: v.check_id,
                    policy: v.policy.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PoolPayload {
            name: mode.forward(Some(&config.name)),
            num_return: mode.forward(Some(&config.num_return)),
            min_available_failover: mode.forward(Some(&config.min_available_failover)),
            note: mode.forward(config.note.as_ref()),
            version: mode.forward(config.version.as_ref()),
            failed_flag: mode.forward(failed_flag.as_ref()),
            disable_flag: mode.forward(disable_flag.as_ref()),
            values: mode.forward_collection(values),
        })
    }

    fn from_wire(config: &mut ARecordPool, remote: PoolRemote) {
        config.name = remote.name;
        config.num_return = remote.num_return;
        config.min_available_failover = remote.min_available_failover;
        config.note = Some(remote.note);
        config.version = Some(remote.version);
        config.failed_flag = Some(mapper::display_flag(remote.failed_flag));
        config.disable_flag = Some(mapper::display_flag(remote.disable_flag));
        config.values = remote
            .values
            .into_iter()
            .map(|v| PoolValue {
                value: v.value,
                weight: v.weight,
                disable_flag: mapper::display_flag(v.disable_flag),
                check_id: v.check_id,
                policy: v.policy,
            })
            .collect();
    }
}
