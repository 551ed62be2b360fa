//! Settings profile loader

use std::collections::BTreeMap;

use admiral_client::{CancelToken, CatalogClient, ClientError};
use admiral_core::Profile;

use super::decode::{self, SubField};

pub(crate) const PROFILES_QUERY: &str =
    "SELECT name, readonly, settings FROM system.profiles";

/// Load all settings profiles from the system catalog
pub fn load_profiles(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
) -> Result<BTreeMap<String, Profile>, ClientError> {
    let rows = client.query_rows(cancel, PROFILES_QUERY)?;

    let mut profiles = BTreeMap::new();
    for row in rows {
        let name = row.get_str(0)?.to_string();
        let mut profile = Profile::new(&name);

        if let Some(readonly) = row.opt_i64(1) {
            profile.read_only = readonly > 0;
        }

        match decode::settings_map(row.opt_str(2)) {
            SubField::Parsed(settings) => profile.settings = settings,
            SubField::Malformed => {
                tracing::debug!(profile = %name, "malformed settings column; treating as empty")
            }
            SubField::Absent => {}
        }

        profiles.insert(name, profile);
    }

    Ok(profiles)
}
