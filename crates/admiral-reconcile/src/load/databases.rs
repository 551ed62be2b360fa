//! Database loader

use std::collections::BTreeMap;

use admiral_client::{CancelToken, CatalogClient, ClientError};
use admiral_core::Database;

pub(crate) const DATABASES_QUERY: &str =
    "SELECT name, engine, data_path, metadata_path, uuid FROM system.databases";

/// Databases owned by the engine itself, never part of desired state
const SYSTEM_DATABASES: &[&str] = &["system", "information_schema"];

/// Load all user-facing databases from the system catalog.
///
/// Rows for the engine's own databases are skipped unconditionally.
pub fn load_databases(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
) -> Result<BTreeMap<String, Database>, ClientError> {
    let rows = client.query_rows(cancel, DATABASES_QUERY)?;

    let mut databases = BTreeMap::new();
    for row in rows {
        let name = row.get_str(0)?;
        if SYSTEM_DATABASES.contains(&name) {
            continue;
        }
        let engine = row.get_str(1)?;
        databases.insert(name.to_string(), Database::new(name, engine));
    }

    Ok(databases)
}
