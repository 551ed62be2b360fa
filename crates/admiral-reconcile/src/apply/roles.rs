//! Role applier
//!
//! Gated by the capability probe. Updates follow the same
//! revoke-then-reapply strategy as users: revoke everything the role holds,
//! then replay settings and grant fragments from desired state.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use admiral_client::{CancelToken, CatalogClient};
use admiral_core::{quote_identifier, Role};

use crate::errors::{AdminError, Result};
use crate::probe;

use super::existing_names;

const EXISTING_ROLES_QUERY: &str = "SELECT name FROM system.roles";

/// Reconcile all desired roles against the cluster.
///
/// On servers without the roles catalog this is a logged no-op, not an
/// error, regardless of how many roles the snapshot carries.
pub fn apply_roles(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
    roles: &BTreeMap<String, Role>,
) -> Result<()> {
    if !probe::supports_roles(client, cancel) {
        tracing::info!("server does not expose the roles catalog; skipping role reconciliation");
        return Ok(());
    }

    let existing = match existing_names(client, cancel, EXISTING_ROLES_QUERY) {
        Ok(existing) => existing,
        Err(err) if err.is_unknown_table() => return Ok(()),
        Err(err) => return Err(err.into()),
    };

    for role in roles.values() {
        if existing.contains(&role.name) {
            update_role(client, cancel, role)?;
        } else {
            create_role(client, cancel, role)?;
        }
    }

    Ok(())
}

fn role_settings_sql(role: &Role) -> String {
    let mut sql = format!("ALTER ROLE {} SETTINGS ", quote_identifier(&role.name));
    for (i, (key, value)) in role.settings.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        let _ = write!(sql, "{key} = {value}");
    }
    sql
}

/// Settings and grant fragments shared by create and update
fn apply_role_grants(client: &dyn CatalogClient, cancel: &CancelToken, role: &Role) -> Result<()> {
    if !role.settings.is_empty() {
        client
            .execute(cancel, &role_settings_sql(role))
            .map_err(|source| {
                AdminError::statement("set settings for role", &role.name, source)
            })?;
    }

    for grant in &role.grants {
        let sql = format!("GRANT {} TO {}", grant, quote_identifier(&role.name));
        client.execute(cancel, &sql).map_err(|source| {
            AdminError::statement(format!("grant permission '{grant}' to role"), &role.name, source)
        })?;
    }

    Ok(())
}

fn create_role(client: &dyn CatalogClient, cancel: &CancelToken, role: &Role) -> Result<()> {
    let sql = format!("CREATE ROLE IF NOT EXISTS {}", quote_identifier(&role.name));
    client
        .execute(cancel, &sql)
        .map_err(|source| AdminError::statement("create role", &role.name, source))?;

    apply_role_grants(client, cancel, role)
}

fn update_role(client: &dyn CatalogClient, cancel: &CancelToken, role: &Role) -> Result<()> {
    let sql = format!("REVOKE ALL ON *.* FROM {}", quote_identifier(&role.name));
    client.execute(cancel, &sql).map_err(|source| {
        AdminError::statement("revoke permissions from role", &role.name, source)
    })?;

    apply_role_grants(client, cancel, role)
}
