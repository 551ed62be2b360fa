//! Quota applier
//!
//! The engine has no in-place alter for interval limits, so the update path
//! drops the quota and recreates it from desired state.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use admiral_client::{CancelToken, CatalogClient};
use admiral_core::{quote_identifier, Quota};

use crate::errors::{AdminError, Result};

use super::existing_names;

const EXISTING_QUOTAS_QUERY: &str = "SELECT name FROM system.quotas";

/// Reconcile all desired quotas against the cluster
pub fn apply_quotas(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
    quotas: &BTreeMap<String, Quota>,
) -> Result<()> {
    let existing = existing_names(client, cancel, EXISTING_QUOTAS_QUERY)?;

    for quota in quotas.values() {
        if existing.contains(&quota.name) {
            let drop_sql = format!("DROP QUOTA IF EXISTS {}", quote_identifier(&quota.name));
            client
                .execute(cancel, &drop_sql)
                .map_err(|source| AdminError::statement("drop quota", &quota.name, source))?;
        }
        client
            .execute(cancel, &create_quota_sql(quota))
            .map_err(|source| AdminError::statement("create quota", &quota.name, source))?;
    }

    Ok(())
}

pub(crate) fn create_quota_sql(quota: &Quota) -> String {
    let mut sql = format!("CREATE QUOTA IF NOT EXISTS {}", quote_identifier(&quota.name));

    for interval in &quota.intervals {
        let _ = write!(sql, " FOR INTERVAL {} SECOND", interval.duration_secs);

        let mut limits = Vec::new();
        if interval.queries > 0 {
            limits.push(format!("MAX QUERIES {}", interval.queries));
        }
        if interval.errors > 0 {
            limits.push(format!("MAX ERRORS {}", interval.errors));
        }
        if interval.result_rows > 0 {
            limits.push(format!("MAX RESULT ROWS {}", interval.result_rows));
        }
        if interval.read_rows > 0 {
            limits.push(format!("MAX READ ROWS {}", interval.read_rows));
        }
        if interval.execution_time_secs > 0 {
            limits.push(format!("MAX EXECUTION TIME {}", interval.execution_time_secs));
        }

        if !limits.is_empty() {
            let _ = write!(sql, " {}", limits.join(" "));
        }
    }

    sql
}
