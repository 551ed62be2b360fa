//! Server capability probing
//!
//! Older servers do not expose the roles catalog. Both the role loader and
//! the role applier consult this probe before touching `system.roles`.

use admiral_client::{CancelToken, CatalogClient};

/// Existence lookup in the catalog's table directory
pub(crate) const ROLES_PROBE_QUERY: &str =
    "SELECT 1 FROM system.tables WHERE database = 'system' AND name = 'roles' LIMIT 1";

/// Check whether the connected server exposes the roles catalog.
///
/// Any query error, or a result other than exactly one row with value 1,
/// means "unsupported". Probing must never be fatal to the caller, so errors
/// are swallowed here.
pub fn supports_roles(client: &dyn CatalogClient, cancel: &CancelToken) -> bool {
    match client.query_row(cancel, ROLES_PROBE_QUERY) {
        Ok(Some(row)) => row.opt_i64(0) == Some(1),
        Ok(None) | Err(_) => false,
    }
}
