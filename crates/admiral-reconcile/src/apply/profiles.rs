//! Settings profile applier
//!
//! The `READONLY` clause is emitted on both the create and the update path,
//! as 1 or 0, so a profile flipped back to writable converges on update.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use admiral_client::{CancelToken, CatalogClient};
use admiral_core::{quote_identifier, Profile};

use crate::errors::{AdminError, Result};

use super::existing_names;

const EXISTING_PROFILES_QUERY: &str = "SELECT name FROM system.profiles";

/// Reconcile all desired settings profiles against the cluster
pub fn apply_profiles(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
    profiles: &BTreeMap<String, Profile>,
) -> Result<()> {
    let existing = existing_names(client, cancel, EXISTING_PROFILES_QUERY)?;

    for profile in profiles.values() {
        let (sql, op) = if existing.contains(&profile.name) {
            (alter_profile_sql(profile), "update profile")
        } else {
            (create_profile_sql(profile), "create profile")
        };
        client
            .execute(cancel, &sql)
            .map_err(|source| AdminError::statement(op, &profile.name, source))?;
    }

    Ok(())
}

// Profile settings values are setting expressions, emitted raw (unlike user
// settings, which are quoted literals).
fn push_profile_clauses(sql: &mut String, profile: &Profile) {
    if !profile.settings.is_empty() {
        sql.push_str(" SETTINGS ");
        for (i, (key, value)) in profile.settings.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            let _ = write!(sql, "{key} = {value}");
        }
    }

    let _ = write!(
        sql,
        " READONLY = {}",
        if profile.read_only { 1 } else { 0 }
    );
}

pub(crate) fn create_profile_sql(profile: &Profile) -> String {
    let mut sql = format!(
        "CREATE SETTINGS PROFILE IF NOT EXISTS {}",
        quote_identifier(&profile.name)
    );
    push_profile_clauses(&mut sql, profile);
    sql
}

pub(crate) fn alter_profile_sql(profile: &Profile) -> String {
    let mut sql = format!("ALTER SETTINGS PROFILE {}", quote_identifier(&profile.name));
    push_profile_clauses(&mut sql, profile);
    sql
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_profile_sql() {
        let mut profile = Profile::new("limits");
        profile
            .settings
            .insert("max_memory_usage".to_string(), "20000000000".to_string());
        profile.read_only = true;

        assert_eq!(
            create_profile_sql(&profile),
            "CREATE SETTINGS PROFILE IF NOT EXISTS `limits` \
             SETTINGS max_memory_usage = 20000000000 READONLY = 1"
        );
    }

    #[test]
    fn test_readonly_clause_is_symmetric() {
        // A writable profile still emits READONLY = 0 on both paths, so an
        // update can clear a previously read-only profile.
        let profile = Profile::new("open");
        assert_eq!(
            create_profile_sql(&profile),
            "CREATE SETTINGS PROFILE IF NOT EXISTS `open` READONLY = 0"
        );
        assert_eq!(
            alter_profile_sql(&profile),
            "ALTER SETTINGS PROFILE `open` READONLY = 0"
        );
    }
}
