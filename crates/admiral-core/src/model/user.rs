use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A cluster user account.
///
/// Users soft-reference profiles, quotas and roles by name; the references
/// are not validated against the other entity maps. Credential fields are
/// desired-state only: the catalog never exposes them, so a loaded snapshot
/// carries no secrets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Account name; equals the key in [`ClusterConfig::users`](crate::ClusterConfig)
    pub name: String,

    /// Plaintext credential, applied as `plaintext_password`
    pub password: Option<String>,

    /// Pre-hashed credential, applied as `sha256_password`; ignored when
    /// `password` is set
    pub hashed_password: Option<String>,

    /// Source networks the account may connect from
    pub networks: Vec<String>,

    /// Settings profile name (soft reference)
    pub profile: Option<String>,

    /// Quota name (soft reference)
    pub quota: Option<String>,

    /// Role names granted to the account (soft references)
    pub roles: Vec<String>,

    /// Arbitrary per-user settings
    pub settings: BTreeMap<String, String>,

    /// Databases the account is granted SHOW/SELECT on
    pub allow_databases: Vec<String>,

    /// Databases the account has all grants revoked on
    pub deny_databases: Vec<String>,

    /// Dictionaries visible to the account; preserved through snapshots but
    /// never applied (the engine has no DDL path for them)
    pub allow_dictionaries: Vec<String>,

    /// Dictionaries withheld from the account; preserved, never applied
    pub deny_dictionaries: Vec<String>,
}

impl User {
    /// Create a user with the given name and no other attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// True when the user carries a credential of either form
    pub fn has_credential(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
            || self.hashed_password.as_deref().is_some_and(|h| !h.is_empty())
    }
}
