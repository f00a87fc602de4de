//! MX record (`constellix_mx_record`)
//!
//! MX records belong to a domain or template and live under
//! `v1/{source_type}/{domain_id}/records/mx`. Import keys have the form
//! `sourceType:domainId:recordId`.

use std::collections::BTreeSet;

use constellix_core::Result;
use constellix_core::mapper::{self, PayloadMode, lenient};
use constellix_core::traits::{Endpoint, KeyLayout, Mapper, RecordKind, Scope};
use serde::{Deserialize, Serialize};

use crate::record::{RecordPayload, RecordRemote, records_path};

/// Configuration of an MX record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MxRecord {
    pub domain_id: String,
    /// `domains` or `templates`
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
    /// Read-only, reported by the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Read-only, reported by the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Read-only, reported by the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub roundrobin: BTreeSet<MxRoundRobin>,
}

/// One mail exchanger
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct MxRoundRobin {
    pub value: String,
    /// Preference, as a decimal string
    ///
    /// Empty means unset; it is sent as `0` and read back as `"0"`.
    pub level: String,
    /// `"true"` or `"false"`
    ///
    /// Empty means unset; it is sent as `false` and read back as `"false"`.
    pub disable_flag: String,
}

/// Record kind descriptor for MX records
#[derive(Debug, Clone, Copy, Default)]
pub struct MxRecordKind;

impl RecordKind for MxRecordKind {
    type Config = MxRecord;
    const TYPE_NAME: &'static str = "constellix_mx_record";
}

impl Endpoint for MxRecordKind {
    const KEY_LAYOUT: KeyLayout = KeyLayout::Scoped;

    fn collection_path(config: &MxRecord) -> Result<String> {
        records_path(&config.source_type, &config.domain_id, "mx")
    }

    fn apply_scope(config: &mut MxRecord, scope: &Scope) {
        config.source_type = scope.source_type.clone();
        config.domain_id = scope.domain_id.clone();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MxRoundRobinPayload {
    value: String,
    level: i64,
    disable_flag: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MxRoundRobinRemote {
    #[serde(default, deserialize_with = "lenient::string")]
    value: String,
    #[serde(default, deserialize_with = "lenient::int")]
    level: i64,
    #[serde(default, deserialize_with = "lenient::boolean")]
    disable_flag: bool,
}

impl Mapper for MxRecordKind {
    type Wire = RecordPayload<MxRoundRobinPayload>;
    type Remote = RecordRemote<MxRoundRobinRemote>;

    fn to_wire(config: &MxRecord, mode: PayloadMode) -> Result<Self::Wire> {
        let round_robin = config
            .roundrobin
            .iter()
            .map(|rr| {
                Ok(MxRoundRobinPayload {
                    value: rr.value.clone(),
                    level: mapper::parse_int_field("roundrobin.level", &rr.level)?,
                    disable_flag: mapper::parse_flag("roundrobin.disable_flag", &rr.disable_flag)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

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

    fn from_wire(config: &mut MxRecord, remote: Self::Remote) {
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
            .map(|rr| MxRoundRobin {
                value: rr.value,
                level: rr.level.to_string(),
                disable_flag: mapper::display_flag(rr.disable_flag),
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constellix_core::Error;
    use serde_json::json;

    fn exchanger(value: &str, level: &str) -> MxRoundRobin {
        MxRoundRobin {
            value: value.to_string(),
            level: level.to_string(),
            disable_flag: "false".to_string(),
        }
    }

    fn mx() -> MxRecord {
        MxRecord {
            domain_id: "555".to_string(),
            source_type: "domains".to_string(),
            name: Some("mail".to_string()),
            ttl: 1800,
            noanswer: Some(false),
            note: Some(String::new()),
            gtd_region: Some(1),
            record_type: Some("MX".to_string()),
            roundrobin: BTreeSet::from([
                exchanger("mx1.example.com.", "10"),
                exchanger("mx2.example.com.", "20"),
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn create_payload_converts_level_to_integer() {
        let payload =
            serde_json::to_value(MxRecordKind::to_wire(&mx(), PayloadMode::Create).unwrap())
                .unwrap();

        assert_eq!(
            payload,
            json!({
                "name": "mail",
                "ttl": 1800,
                "gtdRegion": 1,
                "type": "MX",
                "roundRobin": [
                    {"value": "mx1.example.com.", "level": 10, "disableFlag": false},
                    {"value": "mx2.example.com.", "level": 20, "disableFlag": false}
                ]
            })
        );
    }

    #[test]
    fn update_payload_sends_zero_values() {
        let payload =
            serde_json::to_value(MxRecordKind::to_wire(&mx(), PayloadMode::Update).unwrap())
                .unwrap();

        assert_eq!(payload["noAnswer"], json!(false));
        assert_eq!(payload["note"], json!(""));
    }

    #[test]
    fn computed_fields_are_never_written() {
        let mut config = mx();
        config.parent_id = Some("555".to_string());
        config.parent = Some("example.com".to_string());
        config.source = Some("Domain".to_string());

        let payload =
            serde_json::to_value(MxRecordKind::to_wire(&config, PayloadMode::Update).unwrap())
                .unwrap();
        let object = payload.as_object().unwrap();
        assert!(!object.contains_key("parentId"));
        assert!(!object.contains_key("parent"));
        assert!(!object.contains_key("source"));
        assert!(!object.contains_key("domainId"));
    }

    #[test]
    fn invalid_level_is_rejected() {
        let mut config = mx();
        config.roundrobin.insert(exchanger("mx3.example.com.", "high"));
        assert!(matches!(
            MxRecordKind::to_wire(&config, PayloadMode::Create),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn from_wire_keeps_scope_and_fills_computed_fields() {
        let remote: RecordRemote<MxRoundRobinRemote> = serde_json::from_value(json!({
            "id": 42,
            "name": "mail",
            "ttl": 3600,
            "noAnswer": false,
            "gtdRegion": 1,
            "type": "MX",
            "parentId": 999,
            "parent": "other.example",
            "source": "Template",
            "roundRobin": [{"value": "mx1.example.com.", "level": 10.0, "disableFlag": "true"}]
        }))
        .unwrap();

        let mut config = mx();
        MxRecordKind::from_wire(&mut config, remote);

        assert_eq!(config.domain_id, "555");
        assert_eq!(config.source_type, "domains");
        assert_eq!(config.ttl, 3600);
        assert_eq!(config.parent_id.as_deref(), Some("999"));
        assert_eq!(config.source.as_deref(), Some("Template"));
        assert_eq!(
            config.roundrobin,
            BTreeSet::from([MxRoundRobin {
                value: "mx1.example.com.".to_string(),
                level: "10".to_string(),
                disable_flag: "true".to_string(),
            }])
        );
    }

    #[test]
    fn wire_round_trip_preserves_config() {
        let original = mx();
        let payload =
            serde_json::to_value(MxRecordKind::to_wire(&original, PayloadMode::Update).unwrap())
                .unwrap();
        let remote: RecordRemote<MxRoundRobinRemote> = serde_json::from_value(payload).unwrap();

        let mut config = MxRecord {
            domain_id: original.domain_id.clone(),
            source_type: original.source_type.clone(),
            ..Default::default()
        };
        MxRecordKind::from_wire(&mut config, remote);

        // Computed fields come back empty when the payload carried none
        config.parent_id = None;
        config.parent = None;
        config.source = None;
        assert_eq!(config, original);
    }

    #[test]
    fn unset_round_robin_strings_read_back_as_zero_values() {
        let mut original = mx();
        original.roundrobin = BTreeSet::from([MxRoundRobin {
            value: "mx1.example.com.".to_string(),
            level: String::new(),
            disable_flag: String::new(),
        }]);
        let payload =
            serde_json::to_value(MxRecordKind::to_wire(&original, PayloadMode::Update).unwrap())
                .unwrap();
        assert_eq!(
            payload["roundRobin"],
            json!([{"value": "mx1.example.com.", "level": 0, "disableFlag": false}])
        );

        let remote: RecordRemote<MxRoundRobinRemote> = serde_json::from_value(payload).unwrap();
        let mut config = MxRecord::default();
        MxRecordKind::from_wire(&mut config, remote);
        assert_eq!(
            config.roundrobin,
            BTreeSet::from([MxRoundRobin {
                value: "mx1.example.com.".to_string(),
                level: "0".to_string(),
                disable_flag: "false".to_string(),
            }])
        );
    }

    #[test]
    fn paths_need_domain_and_source_type() {
        assert_eq!(
            MxRecordKind::item_path(&mx(), "42").unwrap(),
            "v1/domains/555/records/mx/42"
        );
        assert!(MxRecordKind::collection_path(&MxRecord::default()).is_err());
    }

    #[test]
    fn apply_scope_sets_key_fields() {
        let mut config = MxRecord::default();
        let scope = Scope::new("templates", "9").unwrap();
        MxRecordKind::apply_scope(&mut config, &scope);
        assert_eq!(config.source_type, "templates");
        assert_eq!(config.domain_id, "9");
    }
}
