//! Entity appliers
//!
//! One module per entity kind. Each fetches the set of entity names that
//! currently exist, then walks the desired map in order and branches into a
//! create or an update statement sequence per entity. Nothing is ever
//! dropped implicitly: an entity present on the cluster but absent from the
//! snapshot is left alone.
//!
//! Update strategies differ per kind: users and roles revoke everything and
//! reapply (guaranteed convergence of the grant set, not atomic), quotas
//! drop and recreate (no in-place alter for interval limits), storage tiers
//! and policies are detect-and-report only.

use std::collections::BTreeSet;

use admiral_client::{CancelToken, CatalogClient, ClientError};

mod databases;
mod profiles;
mod quotas;
mod roles;
mod storage;
mod users;

pub use databases::apply_databases;
pub use profiles::apply_profiles;
pub use quotas::apply_quotas;
pub use roles::apply_roles;
pub use storage::{apply_storage_policies, apply_storage_tiers};
pub use users::apply_users;

pub(crate) use users::{create_user, update_user};

/// Fetch the existing-name set for an entity kind
pub(crate) fn existing_names(
    client: &dyn CatalogClient,
    cancel: &CancelToken,
    sql: &str,
) -> Result<BTreeSet<String>, ClientError> {
    let rows = client.query_rows(cancel, sql)?;
    rows.iter()
        .map(|row| row.get_str(0).map(str::to_string))
        .collect()
}
