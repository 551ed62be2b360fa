//! Storage tier and storage policy appliers
//!
//! Tiers and policies can only be configured through the engine's static
//! configuration files, never through statements. The applier contract is
//! detect-and-report: desired entries missing on the server are logged, and
//! no DDL is ever emitted. The storage-configuration renderer produces the
//! file that closes the gap.

use std::collections::BTreeMap;

use admiral_client::{CancelToken, CatalogClient};
use admiral_core::{StoragePolicy, StorageTier};

use crate::errors::Result;

use super::existing_names;

const EXISTING_TIERS_QUERY: &str = "SELECT name FROM system.disks";
const EXISTING_POLICIES_QUERY: &str =
    "SELECT DISTINCT policy_name FROM system.storage_policies";

/// Report desired storage tiers that are missing on the server
pub fn apply_storage_tiers(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
    tiers: &BTreeMap<String, StorageTier>,
) -> Result<()> {
    let existing = existing_names(client, cancel, EXISTING_TIERS_QUERY)?;

    for tier in tiers.values() {
        if existing.contains(&tier.name) {
            continue;
        }
        tracing::info!(
            tier = %tier.name,
            "storage tier present in configuration but missing on server"
        );
    }

    Ok(())
}

/// Report desired storage policies that are missing on the server
pub fn apply_storage_policies(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
    policies: &BTreeMap<String, StoragePolicy>,
) -> Result<()> {
    let existing = existing_names(client, cancel, EXISTING_POLICIES_QUERY)?;

    for name in policies.keys() {
        if existing.contains(name) {
            continue;
        }
        tracing::info!(
            policy = %name,
            "storage policy present in configuration but missing on server"
        );
    }

    Ok(())
}
