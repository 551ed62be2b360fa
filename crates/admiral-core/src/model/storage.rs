use serde::{Deserialize, Serialize};

/// A physical storage location the engine can place data on.
///
/// Tiers are discoverable through the catalog but cannot be created through
/// statements; the reconciler only detects and reports mismatches. The
/// static configuration renderer consumes the optional sizing knobs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageTier {
    /// Tier name; equals the key in [`ClusterConfig::storage_tiers`](crate::ClusterConfig)
    pub name: String,

    /// Tier kind; `"disk"` is the only kind the catalog exposes
    pub kind: String,

    /// Disk sub-type as reported by the engine (`local`, `s3`, …)
    pub disk_type: String,

    /// Filesystem or object-store path backing the tier
    pub path: String,

    /// Largest part the tier accepts, in bytes
    pub max_data_part_size: Option<u64>,

    /// Fill ceiling as a percentage, for the configuration renderer
    pub max_disk_use_percentage: Option<u32>,
}

impl StorageTier {
    /// Create a disk tier with the given name, sub-type and path
    pub fn disk(
        name: impl Into<String>,
        disk_type: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: "disk".to_string(),
            disk_type: disk_type.into(),
            path: path.into(),
            ..Self::default()
        }
    }
}

/// An ordered set of volumes defining data placement across tiers.
///
/// Like tiers, policies are read-only through the statement surface; the
/// reconciler reports drift and the configuration renderer emits the file
/// the engine actually reads them from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoragePolicy {
    /// Policy name; equals the key in [`ClusterConfig::storage_policies`](crate::ClusterConfig)
    pub name: String,

    /// Volumes in priority order
    pub volumes: Vec<Volume>,
}

impl StoragePolicy {
    /// Create a policy with the given name and no volumes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            volumes: Vec::new(),
        }
    }
}

/// One volume of a storage policy
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Volume {
    /// Volume name, unique within its policy
    pub name: String,

    /// Tier names backing the volume, in placement order (soft references)
    pub disks: Vec<String>,

    /// Largest part the volume accepts, in bytes
    pub max_data_part_size: Option<u64>,

    /// Fill ratio that triggers background moves to the next volume
    pub move_factor: Option<f64>,

    /// Hint that parts on this volume should not be merged
    pub prefer_not_to_merge: bool,
}
