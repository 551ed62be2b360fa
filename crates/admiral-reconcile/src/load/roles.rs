//! Role loader

use std::collections::BTreeMap;

use admiral_client::{CancelToken, CatalogClient, ClientError};
use admiral_core::Role;

use crate::probe;

use super::decode::{self, SubField};

pub(crate) const ROLES_QUERY: &str = "SELECT name, settings, grants FROM system.roles";

/// Load all roles from the system catalog.
///
/// Servers that predate the roles catalog yield an empty map, not an error:
/// the capability probe gates the query, and an unknown-table failure from
/// the query itself is treated the same way.
pub fn load_roles(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
) -> Result<BTreeMap<String, Role>, ClientError> {
    if !probe::supports_roles(client, cancel) {
        return Ok(BTreeMap::new());
    }

    let rows = match client.query_rows(cancel, ROLES_QUERY) {
        Ok(rows) => rows,
        Err(err) if err.is_unknown_table() => return Ok(BTreeMap::new()),
        Err(err) => return Err(err),
    };

    let mut roles = BTreeMap::new();
    for row in rows {
        let name = row.get_str(0)?.to_string();
        let mut role = Role::new(&name);

        match decode::settings_map(row.opt_str(1)) {
            SubField::Parsed(settings) => role.settings = settings,
            SubField::Malformed => {
                tracing::debug!(role = %name, "malformed settings column; treating as empty")
            }
            SubField::Absent => {}
        }

        match decode::string_list(row.opt_str(2)) {
            SubField::Parsed(grants) => role.grants = grants,
            SubField::Malformed => {
                tracing::debug!(role = %name, "malformed grants column; treating as empty")
            }
            SubField::Absent => {}
        }

        roles.insert(name, role);
    }

    Ok(roles)
}
