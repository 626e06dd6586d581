//! Dry-run conversion of aggregation snapshots into New Relic metrics.

pub mod snapshot;

use common::config::Configuration;
use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use transform::{Metric, transform_record};

use crate::snapshot::{Snapshot, SnapshotError};

/// Outcome of converting one snapshot.
#[derive(Debug, Default)]
pub struct Conversion {
    pub metrics: Vec<Metric>,
    pub skipped: usize,
}

/// The configured resource, overlaid with the snapshot's own resource attributes.
pub fn snapshot_resource(
    config: &Configuration,
    snapshot: &Snapshot,
) -> Result<Resource, SnapshotError> {
    let configured = config.resource();
    Ok(Resource::builder_empty()
        .with_attributes(
            configured
                .iter()
                .map(|(key, value)| KeyValue::new(key.clone(), value.clone())),
        )
        .with_attributes(snapshot.resource_attributes()?)
        .build())
}

/// Converts every record of `snapshot`. Records that cannot be converted are
/// logged and skipped.
pub fn convert_snapshot(
    config: &Configuration,
    snapshot: &Snapshot,
) -> Result<Conversion, SnapshotError> {
    let resource = snapshot_resource(config, snapshot)?;
    let records = snapshot.prepare()?;
    let service = config.exporter.service_name.as_str();

    let mut conversion = Conversion::default();
    for prepared in &records {
        match transform_record(service, &resource, prepared.record()) {
            Ok(metric) => conversion.metrics.push(metric),
            Err(e) => {
                log::warn!("Skipping metric {}: {e}", prepared.descriptor.name);
                conversion.skipped += 1;
            }
        }
    }

    log::debug!(
        "Converted {} records, skipped {}",
        conversion.metrics.len(),
        conversion.skipped
    );
    Ok(conversion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_resource_overrides_configured_resource() {
        let mut config = Configuration::default();
        config
            .resource
            .insert("host.name".to_string(), "from-config".to_string());
        config
            .resource
            .insert("region".to_string(), "eu-west-1".to_string());
        let snapshot =
            Snapshot::from_json(r#"{"resource": {"host.name": "from-snapshot"}, "records": []}"#)
                .unwrap();

        let resource = snapshot_resource(&config, &snapshot).unwrap();

        let attrs: Vec<(String, String)> = resource
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_string()))
            .collect();
        assert_eq!(resource.len(), 2);
        assert!(attrs.contains(&("host.name".to_string(), "from-snapshot".to_string())));
        assert!(attrs.contains(&("region".to_string(), "eu-west-1".to_string())));
    }
}
