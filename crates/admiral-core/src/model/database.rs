use serde::{Deserialize, Serialize};

/// A database and the accounts allowed to use it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    /// Database name; equals the key in [`ClusterConfig::databases`](crate::ClusterConfig)
    pub name: String,

    /// Storage engine identifier (emitted raw as `ENGINE = …`)
    pub engine: String,

    /// Optional comment attached at creation
    pub comment: Option<String>,

    /// User names granted ALL on the database (soft references)
    pub allowed_users: Vec<String>,

    /// Role names granted ALL on the database (soft references)
    pub allowed_roles: Vec<String>,
}

impl Database {
    /// Create a database record with the given name and engine
    pub fn new(name: impl Into<String>, engine: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            engine: engine.into(),
            ..Self::default()
        }
    }
}
