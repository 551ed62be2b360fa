//! Storage tier and storage policy loaders

use std::collections::BTreeMap;

use admiral_client::{CancelToken, CatalogClient, ClientError};
use admiral_core::{StoragePolicy, StorageTier, Volume};

use super::decode;

pub(crate) const STORAGE_TIERS_QUERY: &str =
    "SELECT name, type, path, free_space, total_space FROM system.disks";

/// Load all storage tiers (disks) from the system catalog.
///
/// The disks table is the only introspection surface for tiers, so every
/// loaded tier has kind `"disk"`. Space counters belong to the usage
/// queries, not to the tier record.
pub fn load_storage_tiers(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
) -> Result<BTreeMap<String, StorageTier>, ClientError> {
    let rows = client.query_rows(cancel, STORAGE_TIERS_QUERY)?;

    let mut tiers = BTreeMap::new();
    for row in rows {
        let name = row.get_str(0)?;
        let disk_type = row.get_str(1)?;
        let path = row.get_str(2)?;
        tiers.insert(name.to_string(), StorageTier::disk(name, disk_type, path));
    }

    Ok(tiers)
}

// Ordering is load-bearing: the grouping below requires rows for the same
// policy to be contiguous and volumes to arrive in priority order.
pub(crate) const STORAGE_POLICIES_QUERY: &str = "\
    SELECT policy_name, volume_name, volume_priority, volume_type, disks, \
    max_data_part_size, move_factor, prefer_not_to_merge \
    FROM system.storage_policies \
    ORDER BY policy_name, volume_priority";

/// Load all storage policies, reconstructing each policy's ordered volume
/// list from the flat row stream.
///
/// A current-policy cursor accumulates volumes; when the policy name
/// changes, the finished accumulator is committed and a new one starts. The
/// final accumulator is flushed after the loop.
pub fn load_storage_policies(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
) -> Result<BTreeMap<String, StoragePolicy>, ClientError> {
    let rows = client.query_rows(cancel, STORAGE_POLICIES_QUERY)?;

    let mut policies = BTreeMap::new();
    let mut current: Option<StoragePolicy> = None;

    for row in rows {
        let policy_name = row.get_str(0)?;

        if current.as_ref().map(|p| p.name.as_str()) != Some(policy_name) {
            if let Some(finished) = current.take() {
                policies.insert(finished.name.clone(), finished);
            }
            current = Some(StoragePolicy::new(policy_name));
        }

        let volume = Volume {
            name: row.get_str(1)?.to_string(),
            disks: decode::csv_list(row.opt_str(4)),
            max_data_part_size: row.opt_u64(5),
            move_factor: row.opt_f64(6),
            prefer_not_to_merge: row.opt_bool(7).unwrap_or(false),
        };

        if let Some(policy) = current.as_mut() {
            policy.volumes.push(volume);
        }
    }

    if let Some(finished) = current.take() {
        policies.insert(finished.name.clone(), finished);
    }

    Ok(policies)
}
