//! Quota loader

use std::collections::BTreeMap;

use admiral_client::{CancelToken, CatalogClient, ClientError};
use admiral_core::Quota;

use super::decode::{self, SubField};

// The keys column is part of the catalog row shape; keyed quotas are not
// modelled.
pub(crate) const QUOTAS_QUERY: &str = "SELECT name, intervals, keys FROM system.quotas";

/// Load all quotas from the system catalog, preserving interval order
pub fn load_quotas(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
) -> Result<BTreeMap<String, Quota>, ClientError> {
    let rows = client.query_rows(cancel, QUOTAS_QUERY)?;

    let mut quotas = BTreeMap::new();
    for row in rows {
        let name = row.get_str(0)?.to_string();
        let mut quota = Quota::new(&name);

        match decode::quota_intervals(row.opt_str(1)) {
            SubField::Parsed(intervals) => quota.intervals = intervals,
            SubField::Malformed => {
                tracing::debug!(quota = %name, "malformed intervals column; treating as empty")
            }
            SubField::Absent => {}
        }

        quotas.insert(name, quota);
    }

    Ok(quotas)
}
