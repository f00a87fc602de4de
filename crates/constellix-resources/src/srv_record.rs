//! SRV record (`constellix_srv_record`)
//!
//! Same scoping and scalar attributes as MX; each round-robin entry carries a
//! target port, priority and weight.

use std::collections::BTreeSet;

use constellix_core::Result;
use constellix_core::mapper::{PayloadMode, lenient};
use constellix_core::traits::{Endpoint, KeyLayout, Mapper, RecordKind, Scope};
use serde::{Deserialize, Serialize};

use crate::record::{RecordPayload, RecordRemote, records_path};

/// Configuration of an SRV record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SrvRecord {
    pub domain_id: String,
    pub source_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub ttl: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noanswer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gtd_region: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub roundrobin: BTreeSet<SrvRoundRobin>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SrvRoundRobin {
    /// Target host
    pub value: String,
    pub port: i64,
    pub priority: i64,
    pub weight: i64,
    pub disable_flag: bool,
}

/// Record kind descriptor for SRV records
#[derive(Debug, Clone, Copy, Default)]
pub struct SrvRecordKind;

impl RecordKind for SrvRecordKind {
    type Config = SrvRecord;
    const TYPE_NAME: &'static str = "constellix_srv_record";
}

impl Endpoint for SrvRecordKind {
    const KEY_LAYOUT: KeyLayout = KeyLayout::Scoped;

    fn collection_path(config: &SrvRecord) -> Result<String> {
        records_path(&config.source_type, &config.domain_id, "srv")
    }

    fn apply_scope(config: &mut SrvRecord, scope: &Scope) {
        config.source_type = scope.source_type.clone();
        config.domain_id = scope.domain_id.clone();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SrvRoundRobinPayload {
    value: String,
    port: i64,
    priority: i64,
    weight: i64,
    disable_flag: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrvRoundRobinRemote {
    #[serde(default, deserialize_with = "lenient::string")]
    value: String,
    #[serde(default, deserialize_with = "lenient::int")]
    port: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    priority: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    weight: i64,
    #[serde(default, deserialize_with = "lenient::boolean")]
    disable_flag: bool,
}

impl Mapper for SrvRecordKind {
    type Wire = RecordPayload<SrvRoundRobinPayload>;
    type Remote = RecordRemote<SrvRoundRobinRemote>;

    fn to_wire(config: &SrvRecord, mode: PayloadMode) -> Result<Self::Wire> {
        let round_robin = config
            .roundrobin
            .iter()
            .map(|rr| SrvRoundRobinPayload {
                value: rr.value.clone(),
                port: rr.port,
                priority: rr.priority,
                weight: rr.weight,
                disable_flag: rr.disable_flag,
            })
            .collect();

        Ok(RecordPayload {
            name: mode.forward(config.name.as_ref()),
            ttl: mode.forward(Some(&config.ttl)),
            no_answer: mode.forward(config.noanswer.as_ref()),
            note: mode.forward(config.note.as_ref()),
            gtd_region: mode.forward(config.gtd_region.as_ref()),
            record_type: mode.forward(config.record_type.as_ref()),
            round_robin: mode.forward_collection(round_robin),
        })
    }

    fn from_wire(config: &mut SrvRecord, remote: Self::Remote) {
        config.name = Some(remote.name);
        config.ttl = remote.ttl;
        config.noanswer = Some(remote.no_answer);
        config.note = Some(remote.note);
        config.gtd_region = Some(remote.gtd_region);
        config.record_type = Some(remote.record_type);
        config.parent_id = Some(remote.parent_id);
        config.parent = Some(remote.parent);
        config.source = Some(remote.source);
        config.roundrobin = remote
            .round_robin
            .into_iter()
            .map(|rr| SrvRoundRobin {
                value: rr.value,
                port: rr.port,
                priority: rr.priority,
                weight: rr.weight,
                disable_flag: rr.disable_flag,
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn target(value: &str, port: i64) -> SrvRoundRobin {
        SrvRoundRobin {
            value: value.to_string(),
            port,
            priority: 10,
            weight: 5,
            disable_flag: false,
        }
    }

    fn srv() -> SrvRecord {
        SrvRecord {
            domain_id: "555".to_string(),
            source_type: "domains".to_string(),
            name: Some("_sip._tcp".to_string()),
            ttl: 300,
            noanswer: Some(false),
            note: Some(String::new()),
            gtd_region: Some(1),
            record_type: Some("SRV".to_string()),
            roundrobin: BTreeSet::from([target("sip.example.com.", 5060)]),
            ..Default::default()
        }
    }

    #[test]
    fn create_payload_lists_targets() {
        let payload =
            serde_json::to_value(SrvRecordKind::to_wire(&srv(), PayloadMode::Create).unwrap())
                .unwrap();

        assert_eq!(
            payload["roundRobin"],
            json!([{
                "value": "sip.example.com.",
                "port": 5060,
                "priority": 10,
                "weight": 5,
                "disableFlag": false
            }])
        );
        assert!(payload.get("noAnswer").is_none());
    }

    #[test]
    fn update_payload_always_sends_round_robin() {
        let mut config = srv();
        config.roundrobin.clear();

        let payload =
            serde_json::to_value(SrvRecordKind::to_wire(&config, PayloadMode::Update).unwrap())
                .unwrap();
        assert_eq!(payload["roundRobin"], json!([]));

        let payload =
            serde_json::to_value(SrvRecordKind::to_wire(&config, PayloadMode::Create).unwrap())
                .unwrap();
        assert!(payload.get("roundRobin").is_none());
    }

    #[test]
    fn from_wire_coerces_entry_scalars() {
        let remote: RecordRemote<SrvRoundRobinRemote> = serde_json::from_value(json!({
            "id": 42,
            "name": "_sip._tcp",
            "ttl": 300,
            "roundRobin": [
                {"value": "sip.example.com.", "port": "5060", "priority": 10.0, "weight": null, "disableFlag": 1}
            ]
        }))
        .unwrap();

        let mut config = srv();
        SrvRecordKind::from_wire(&mut config, remote);

        let entry = config.roundrobin.iter().next().unwrap();
        assert_eq!(entry.port, 5060);
        assert_eq!(entry.priority, 10);
        assert_eq!(entry.weight, 0);
        assert!(entry.disable_flag);
        assert_eq!(config.note.as_deref(), Some(""));
    }

    #[test]
    fn wire_round_trip_preserves_config() {
        let original = srv();
        let payload =
            serde_json::to_value(SrvRecordKind::to_wire(&original, PayloadMode::Update).unwrap())
                .unwrap();
        let remote: RecordRemote<SrvRoundRobinRemote> = serde_json::from_value(payload).unwrap();

        let mut config = SrvRecord {
            domain_id: original.domain_id.clone(),
            source_type: original.source_type.clone(),
            ..Default::default()
        };
        SrvRecordKind::from_wire(&mut config, remote);

        config.parent_id = None;
        config.parent = None;
        config.source = None;
        assert_eq!(config, original);
    }

    #[test]
    fn srv_paths() {
        assert_eq!(
            SrvRecordKind::collection_path(&srv()).unwrap(),
            "v1/domains/555/records/srv"
        );
        assert_eq!(SrvRecordKind::KEY_LAYOUT, KeyLayout::Scoped);
    }
}
