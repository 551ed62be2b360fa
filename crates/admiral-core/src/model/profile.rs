use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named settings profile assignable to users
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Profile name; equals the key in [`ClusterConfig::profiles`](crate::ClusterConfig)
    pub name: String,

    /// Whether sessions under this profile are read-only
    pub read_only: bool,

    /// Setting key → value; values are emitted raw into generated statements
    pub settings: BTreeMap<String, String>,
}

impl Profile {
    /// Create a profile with the given name and no settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
