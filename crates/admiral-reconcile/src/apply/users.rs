//! User applier
//!
//! Create builds one statement carrying every optional clause, followed by
//! grant statements for database access and roles. Update follows the
//! revoke-then-reapply strategy: alter the account, revoke all database
//! grants and all roles, then reapply from desired state. Convergent but not
//! atomic; re-running the full sequence is safe.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use admiral_client::{CancelToken, CatalogClient};
use admiral_core::{escape_string, quote_identifier, User};

use crate::errors::{AdminError, Result};

use super::existing_names;

const EXISTING_USERS_QUERY: &str = "SELECT name FROM system.users";

/// Reconcile all desired users against the cluster
pub fn apply_users(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
    users: &BTreeMap<String, User>,
) -> Result<()> {
    let existing = existing_names(client, cancel, EXISTING_USERS_QUERY)?;

    for user in users.values() {
        if existing.contains(&user.name) {
            update_user(client, cancel, user)?;
        } else {
            create_user(client, cancel, user)?;
        }
    }

    Ok(())
}

/// Optional clauses shared by the create and alter statements
fn push_user_clauses(sql: &mut String, user: &User) {
    if let Some(password) = user.password.as_deref().filter(|p| !p.is_empty()) {
        let _ = write!(
            sql,
            " IDENTIFIED WITH plaintext_password BY '{}'",
            escape_string(password)
        );
    } else if let Some(hashed) = user.hashed_password.as_deref().filter(|h| !h.is_empty()) {
        let _ = write!(
            sql,
            " IDENTIFIED WITH sha256_password BY '{}'",
            escape_string(hashed)
        );
    }

    if !user.networks.is_empty() {
        sql.push_str(" HOST ");
        for (i, network) in user.networks.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            let _ = write!(sql, "'{}'", escape_string(network));
        }
    }

    if let Some(profile) = user.profile.as_deref().filter(|p| !p.is_empty()) {
        let _ = write!(sql, " DEFAULT ROLE {}", quote_identifier(profile));
    }

    if let Some(quota) = user.quota.as_deref().filter(|q| !q.is_empty()) {
        let _ = write!(sql, " QUOTA {}", quote_identifier(quota));
    }

    if !user.settings.is_empty() {
        sql.push_str(" SETTINGS ");
        for (i, (key, value)) in user.settings.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            let _ = write!(sql, "{} = '{}'", key, escape_string(value));
        }
    }
}

pub(crate) fn create_user_sql(user: &User) -> String {
    let mut sql = format!("CREATE USER IF NOT EXISTS {}", quote_identifier(&user.name));
    push_user_clauses(&mut sql, user);
    sql
}

pub(crate) fn alter_user_sql(user: &User) -> String {
    let mut sql = format!("ALTER USER {}", quote_identifier(&user.name));
    push_user_clauses(&mut sql, user);
    sql
}

/// Grant/revoke statements for database access lists and roles; one
/// statement per database so each grant targets a single `ON` clause
fn apply_user_grants(client: &dyn CatalogClient, cancel: &CancelToken, user: &User) -> Result<()> {
    let id = quote_identifier(&user.name);

    for database in &user.allow_databases {
        let sql = format!(
            "GRANT SHOW, SELECT ON {}.* TO {}",
            quote_identifier(database),
            id
        );
        client.execute(cancel, &sql).map_err(|source| {
            AdminError::statement("grant database permissions to user", &user.name, source)
        })?;
    }

    for database in &user.deny_databases {
        let sql = format!(
            "REVOKE ALL ON {}.* FROM {}",
            quote_identifier(database),
            id
        );
        client.execute(cancel, &sql).map_err(|source| {
            AdminError::statement("revoke database permissions from user", &user.name, source)
        })?;
    }

    if !user.roles.is_empty() {
        let roles = admiral_core::quote_identifier_list(&user.roles).join(", ");
        let sql = format!("GRANT {roles} TO {id}");
        client
            .execute(cancel, &sql)
            .map_err(|source| AdminError::statement("grant roles to user", &user.name, source))?;
    }

    Ok(())
}

/// Create a user and apply its grants
pub(crate) fn create_user(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
    user: &User,
) -> Result<()> {
    client
        .execute(cancel, &create_user_sql(user))
        .map_err(|source| AdminError::statement("create user", &user.name, source))?;

    apply_user_grants(client, cancel, user)
}

/// Update an existing user: alter, revoke everything, reapply
pub(crate) fn update_user(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
    user: &User,
) -> Result<()> {
    client
        .execute(cancel, &alter_user_sql(user))
        .map_err(|source| AdminError::statement("update user", &user.name, source))?;

    let id = quote_identifier(&user.name);

    client
        .execute(cancel, &format!("REVOKE ALL ON *.* FROM {id}"))
        .map_err(|source| {
            AdminError::statement("revoke permissions from user", &user.name, source)
        })?;

    client
        .execute(cancel, &format!("REVOKE ALL ROLES FROM {id}"))
        .map_err(|source| AdminError::statement("revoke roles from user", &user.name, source))?;

    apply_user_grants(client, cancel, user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_sql_minimal() {
        let user = User::new("analyst");
        assert_eq!(create_user_sql(&user), "CREATE USER IF NOT EXISTS `analyst`");
    }

    #[test]
    fn test_create_user_sql_all_clauses() {
        let mut user = User::new("analyst");
        user.password = Some("o'clock".to_string());
        user.networks = vec!["10.0.0.0/8".to_string(), "::1".to_string()];
        user.profile = Some("readonly".to_string());
        user.quota = Some("default".to_string());
        user.settings
            .insert("max_memory_usage".to_string(), "10000000000".to_string());
        user.settings
            .insert("readonly".to_string(), "1".to_string());

        assert_eq!(
            create_user_sql(&user),
            "CREATE USER IF NOT EXISTS `analyst` \
             IDENTIFIED WITH plaintext_password BY 'o''clock' \
             HOST '10.0.0.0/8', '::1' \
             DEFAULT ROLE `readonly` QUOTA `default` \
             SETTINGS max_memory_usage = '10000000000', readonly = '1'"
        );
    }

    #[test]
    fn test_hashed_password_used_when_no_plaintext() {
        let mut user = User::new("svc");
        user.hashed_password = Some("ab12cd".to_string());
        assert_eq!(
            create_user_sql(&user),
            "CREATE USER IF NOT EXISTS `svc` IDENTIFIED WITH sha256_password BY 'ab12cd'"
        );

        // Plaintext wins when both are present
        user.password = Some("pw".to_string());
        assert!(create_user_sql(&user).contains("plaintext_password"));
    }

    #[test]
    fn test_alter_user_sql_shares_clauses() {
        let mut user = User::new("analyst");
        user.quota = Some("default".to_string());
        assert_eq!(alter_user_sql(&user), "ALTER USER `analyst` QUOTA `default`");
    }
}
