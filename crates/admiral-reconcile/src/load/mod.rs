//! Entity loaders
//!
//! One module per entity kind. Each issues a single catalog query, maps rows
//! into records with nullable-scan semantics, and decodes JSON-encoded
//! sub-columns best-effort through [`decode::SubField`]: a malformed
//! sub-column degrades to the empty value (with a debug note) instead of
//! aborting the row, tolerating catalog schema variance across server
//! versions.

pub mod decode;

mod databases;
mod profiles;
mod quotas;
mod roles;
mod storage;
mod users;

pub use databases::load_databases;
pub use profiles::load_profiles;
pub use quotas::load_quotas;
pub use roles::load_roles;
pub use storage::{load_storage_policies, load_storage_tiers};
pub use users::load_users;
