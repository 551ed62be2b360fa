//! Database applier
//!
//! Little about a database can change after creation through statements, so
//! the update path only reconciles permissions: revoke all grants on the
//! database from everyone, then reapply the allowed user and role lists.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use admiral_client::{CancelToken, CatalogClient};
use admiral_core::{escape_string, quote_identifier, quote_identifier_list, Database};

use crate::errors::{AdminError, Result};

use super::existing_names;

const EXISTING_DATABASES_QUERY: &str =
    "SELECT name FROM system.databases WHERE name NOT IN ('system', 'information_schema')";

/// Reconcile all desired databases against the cluster
pub fn apply_databases(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
    databases: &BTreeMap<String, Database>,
) -> Result<()> {
    let existing = existing_names(client, cancel, EXISTING_DATABASES_QUERY)?;

    for database in databases.values() {
        if existing.contains(&database.name) {
            update_database(client, cancel, database)?;
        } else {
            create_database(client, cancel, database)?;
        }
    }

    Ok(())
}

pub(crate) fn create_database_sql(database: &Database) -> String {
    let mut sql = format!(
        "CREATE DATABASE IF NOT EXISTS {}",
        quote_identifier(&database.name)
    );
    if !database.engine.is_empty() {
        let _ = write!(sql, " ENGINE = {}", database.engine);
    }
    if let Some(comment) = database.comment.as_deref().filter(|c| !c.is_empty()) {
        let _ = write!(sql, " COMMENT '{}'", escape_string(comment));
    }
    sql
}

/// Grant ALL on the database to its allowed users and roles
fn apply_database_grants(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
    database: &Database,
) -> Result<()> {
    let id = quote_identifier(&database.name);

    if !database.allowed_users.is_empty() {
        let grantees = quote_identifier_list(&database.allowed_users).join(", ");
        let sql = format!("GRANT ALL ON {id}.* TO {grantees}");
        client.execute(cancel, &sql).map_err(|source| {
            AdminError::statement("grant permissions on database", &database.name, source)
        })?;
    }

    if !database.allowed_roles.is_empty() {
        let grantees = quote_identifier_list(&database.allowed_roles).join(", ");
        let sql = format!("GRANT ALL ON {id}.* TO {grantees}");
        client.execute(cancel, &sql).map_err(|source| {
            AdminError::statement("grant role permissions on database", &database.name, source)
        })?;
    }

    Ok(())
}

fn create_database(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
    database: &Database,
) -> Result<()> {
    client
        .execute(cancel, &create_database_sql(database))
        .map_err(|source| AdminError::statement("create database", &database.name, source))?;

    apply_database_grants(client, cancel, database)
}

fn update_database(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
    database: &Database,
) -> Result<()> {
    let sql = format!(
        "REVOKE ALL ON {}.* FROM ALL",
        quote_identifier(&database.name)
    );
    client.execute(cancel, &sql).map_err(|source| {
        AdminError::statement("revoke permissions on database", &database.name, source)
    })?;

    apply_database_grants(client, cancel, database)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_database_sql() {
        let mut database = Database::new("metrics", "Atomic");
        database.comment = Some("it's ours".to_string());
        assert_eq!(
            create_database_sql(&database),
            "CREATE DATABASE IF NOT EXISTS `metrics` ENGINE = Atomic COMMENT 'it''s ours'"
        );
    }

    #[test]
    fn test_create_database_sql_bare() {
        let database = Database::new("metrics", "");
        assert_eq!(
            create_database_sql(&database),
            "CREATE DATABASE IF NOT EXISTS `metrics`"
        );
    }
}
