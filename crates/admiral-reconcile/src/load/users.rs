//! User loader

use std::collections::BTreeMap;

use admiral_client::{CancelToken, CatalogClient, ClientError};
use admiral_core::User;

use super::decode::{self, SubField};

pub(crate) const USERS_QUERY: &str = "\
    SELECT name, storage_policy, readonly, allow_databases, allow_dictionaries, \
    profile_name, quota_name, networks, settings \
    FROM system.users";

/// Load all user accounts from the system catalog.
///
/// Credential columns are never exposed by the catalog, so loaded users
/// carry no password material. The storage_policy and readonly columns are
/// part of the catalog row shape but not of the user model.
pub fn load_users(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
) -> Result<BTreeMap<String, User>, ClientError> {
    let rows = client.query_rows(cancel, USERS_QUERY)?;

    let mut users = BTreeMap::new();
    for row in rows {
        let name = row.get_str(0)?.to_string();
        let mut user = User::new(&name);

        user.allow_databases = decode::csv_list(row.opt_str(3));
        user.allow_dictionaries = decode::csv_list(row.opt_str(4));
        if let Some(profile) = row.opt_str(5).filter(|s| !s.is_empty()) {
            user.profile = Some(profile.to_string());
        }
        if let Some(quota) = row.opt_str(6).filter(|s| !s.is_empty()) {
            user.quota = Some(quota.to_string());
        }
        user.networks = decode::csv_list(row.opt_str(7));

        match decode::settings_map(row.opt_str(8)) {
            SubField::Parsed(settings) => user.settings = settings,
            SubField::Malformed => {
                tracing::debug!(user = %name, "malformed settings column; treating as empty")
            }
            SubField::Absent => {}
        }

        users.insert(name, user);
    }

    Ok(users)
}
