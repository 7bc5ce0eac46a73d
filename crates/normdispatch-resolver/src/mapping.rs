//! Static mapping from destination connectors to normalization settings

use normdispatch_core::{DestinationType, BASE_NORMALIZATION_IMAGE_NAME};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Normalization settings for one destination connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizationMapping {
    /// Normalization image without a tag
    pub image: &'static str,

    /// Dialect the normalization image runs in
    pub destination_type: DestinationType,
}

impl NormalizationMapping {
    const fn new(image: &'static str, destination_type: DestinationType) -> Self {
        Self { image, destination_type }
    }
}

// Destination connectors, alphabetically. Keys never carry a tag.
const ENTRIES: &[(&str, NormalizationMapping)] = &[
    ("airbyte/destination-bigquery", NormalizationMapping::new(BASE_NORMALIZATION_IMAGE_NAME, DestinationType::Bigquery)),
    ("airbyte/destination-bigquery-denormalized", NormalizationMapping::new(BASE_NORMALIZATION_IMAGE_NAME, DestinationType::Bigquery)),
    ("airbyte/destination-clickhouse", NormalizationMapping::new("airbyte/normalization-clickhouse", DestinationType::Clickhouse)),
    ("airbyte/destination-clickhouse-strict-encrypt", NormalizationMapping::new("airbyte/normalization-clickhouse", DestinationType::Clickhouse)),
    ("airbyte/destination-mssql", NormalizationMapping::new("airbyte/normalization-mssql", DestinationType::Mssql)),
    ("airbyte/destination-mssql-strict-encrypt", NormalizationMapping::new("airbyte/normalization-mssql", DestinationType::Mssql)),
    ("airbyte/destination-mysql", NormalizationMapping::new("airbyte/normalization-mysql", DestinationType::Mysql)),
    ("airbyte/destination-mysql-strict-encrypt", NormalizationMapping::new("airbyte/normalization-mysql", DestinationType::Mysql)),
    ("airbyte/destination-oracle", NormalizationMapping::new("airbyte/normalization-oracle", DestinationType::Oracle)),
    ("airbyte/destination-oracle-strict-encrypt", NormalizationMapping::new("airbyte/normalization-oracle", DestinationType::Oracle)),
    ("airbyte/destination-postgres", NormalizationMapping::new(BASE_NORMALIZATION_IMAGE_NAME, DestinationType::Postgres)),
    ("airbyte/destination-postgres-strict-encrypt", NormalizationMapping::new(BASE_NORMALIZATION_IMAGE_NAME, DestinationType::Postgres)),
    ("airbyte/destination-redshift", NormalizationMapping::new("airbyte/normalization-redshift", DestinationType::Redshift)),
    ("airbyte/destination-snowflake", NormalizationMapping::new("airbyte/normalization-snowflake", DestinationType::Snowflake)),
    ("airbyte/destination-tidb", NormalizationMapping::new("airbyte/normalization-tidb", DestinationType::Tidb)),
];

static NORMALIZATION_MAPPING: Lazy<HashMap<&'static str, NormalizationMapping>> =
    Lazy::new(|| ENTRIES.iter().copied().collect());

/// Drop a `:<tag>` suffix, keeping everything before the first colon
pub fn strip_tag(connector_image: &str) -> &str {
    connector_image
        .split_once(':')
        .map_or(connector_image, |(name, _)| name)
}

/// Look up a tag-free connector image
pub(crate) fn lookup(image_name: &str) -> Option<NormalizationMapping> {
    NORMALIZATION_MAPPING.get(image_name).copied()
}

/// All mapped connectors, sorted by connector image
pub fn mappings() -> Vec<(&'static str, NormalizationMapping)> {
    let mut entries: Vec<_> = NORMALIZATION_MAPPING
        .iter()
        .map(|(connector, mapping)| (*connector, *mapping))
        .collect();
    entries.sort_by_key(|(connector, _)| *connector);
    entries
}
