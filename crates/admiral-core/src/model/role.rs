use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named, grantable bundle of permissions.
///
/// The whole entity kind may be absent on older servers; loaders treat that
/// as an empty map, not an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    /// Role name; equals the key in [`ClusterConfig::roles`](crate::ClusterConfig)
    pub name: String,

    /// Settings applied to sessions holding the role
    pub settings: BTreeMap<String, String>,

    /// Grant-statement fragments (e.g. `SELECT ON metrics.*`), applied in
    /// order as `GRANT <fragment> TO <role>`
    pub grants: Vec<String>,
}

impl Role {
    /// Create a role with the given name and no grants
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
