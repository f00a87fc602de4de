// # constellix-resources
//
// Record kinds managed through the generic resource adapter:
//
// | type name | endpoint | import key |
// |---|---|---|
// | `constellix_a_record_pool` | `v1/pools/A` | `recordId` |
// | `constellix_mx_record` | `v1/{sourceType}/{domainId}/records/mx` | `sourceType:domainId:recordId` |
// | `constellix_srv_record` | `v1/{sourceType}/{domainId}/records/srv` | `sourceType:domainId:recordId` |
//
// ## Usage
//
// ```rust,ignore
// use constellix_core::ResourceRegistry;
//
// let registry = ResourceRegistry::new();
// constellix_resources::register(&registry);
// ```

pub mod a_record_pool;
pub mod mx_record;
pub mod record;
pub mod srv_record;

pub use a_record_pool::{ARecordPool, ARecordPoolKind, PoolValue};
pub use mx_record::{MxRecord, MxRecordKind, MxRoundRobin};
pub use srv_record::{SrvRecord, SrvRecordKind, SrvRoundRobin};

use constellix_core::traits::RecordKind;
use constellix_core::{AdapterFactory, ResourceRegistry};

/// Register every record kind of this crate with a resource registry
pub fn register(registry: &ResourceRegistry) {
    registry.register_resource(
        ARecordPoolKind::TYPE_NAME,
        Box::new(AdapterFactory::<ARecordPoolKind>::new()),
    );
    registry.register_resource(
        MxRecordKind::TYPE_NAME,
        Box::new(AdapterFactory::<MxRecordKind>::new()),
    );
    registry.register_resource(
        SrvRecordKind::TYPE_NAME,
        Box::new(AdapterFactory::<SrvRecordKind>::new()),
    );
    tracing::debug!("Registered A-record pool, MX and SRV record kinds");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_adds_every_kind() {
        let registry = ResourceRegistry::new();
        register(&registry);

        assert_eq!(
            registry.list_resources(),
            vec![
                "constellix_a_record_pool".to_string(),
                "constellix_mx_record".to_string(),
                "constellix_srv_record".to_string(),
            ]
        );
    }
}
