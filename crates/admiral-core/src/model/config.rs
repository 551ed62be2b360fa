use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Database, Profile, Quota, Role, StoragePolicy, StorageTier, User};

/// The cluster-wide administrative snapshot.
///
/// Seven maps from entity name to record; presence in a map is the entity's
/// entire lifecycle state. Ordered maps keep exports and generated statement
/// streams deterministic. The snapshot round-trips losslessly through the
/// JSON file format (top-level keys `Users`, `Profiles`, `Quotas`,
/// `Databases`, `StorageTiers`, `StoragePolicies`, `Roles`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    #[serde(rename = "Users")]
    pub users: BTreeMap<String, User>,

    #[serde(rename = "Profiles")]
    pub profiles: BTreeMap<String, Profile>,

    #[serde(rename = "Quotas")]
    pub quotas: BTreeMap<String, Quota>,

    #[serde(rename = "Databases")]
    pub databases: BTreeMap<String, Database>,

    #[serde(rename = "StorageTiers")]
    pub storage_tiers: BTreeMap<String, StorageTier>,

    #[serde(rename = "StoragePolicies")]
    pub storage_policies: BTreeMap<String, StoragePolicy>,

    #[serde(rename = "Roles")]
    pub roles: BTreeMap<String, Role>,
}

impl ClusterConfig {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no entity of any kind is present
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.profiles.is_empty()
            && self.quotas.is_empty()
            && self.databases.is_empty()
            && self.storage_tiers.is_empty()
            && self.storage_policies.is_empty()
            && self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuotaInterval, Volume};

    fn populated_config() -> ClusterConfig {
        let mut config = ClusterConfig::new();

        let mut user = User::new("analyst");
        user.password = Some("secret".to_string());
        user.profile = Some("readonly".to_string());
        user.networks = vec!["10.0.0.0/8".to_string()];
        user.settings
            .insert("max_memory_usage".to_string(), "10000000000".to_string());
        config.users.insert(user.name.clone(), user);

        let mut profile = Profile::new("readonly");
        profile.read_only = true;
        config.profiles.insert(profile.name.clone(), profile);

        let mut quota = Quota::new("default");
        quota.intervals.push(QuotaInterval {
            duration_secs: 3600,
            queries: 1000,
            ..QuotaInterval::default()
        });
        config.quotas.insert(quota.name.clone(), quota);

        let mut database = Database::new("metrics", "Atomic");
        database.allowed_users = vec!["analyst".to_string()];
        config.databases.insert(database.name.clone(), database);

        let tier = StorageTier::disk("hot", "local", "/var/lib/clickhouse/hot/");
        config.storage_tiers.insert(tier.name.clone(), tier);

        let mut policy = StoragePolicy::new("tiered");
        policy.volumes.push(Volume {
            name: "hot".to_string(),
            disks: vec!["hot".to_string()],
            max_data_part_size: Some(1 << 30),
            ..Volume::default()
        });
        config.storage_policies.insert(policy.name.clone(), policy);

        let mut role = Role::new("reader");
        role.grants.push("SELECT ON metrics.*".to_string());
        config.roles.insert(role.name.clone(), role);

        config
    }

    #[test]
    fn test_empty_config() {
        assert!(ClusterConfig::new().is_empty());
        assert!(!populated_config().is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let config = populated_config();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: ClusterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_top_level_keys() {
        let json = serde_json::to_value(populated_config()).unwrap();
        let object = json.as_object().unwrap();
        for key in [
            "Users",
            "Profiles",
            "Quotas",
            "Databases",
            "StorageTiers",
            "StoragePolicies",
            "Roles",
        ] {
            assert!(object.contains_key(key), "missing top-level key {key}");
        }
    }

    #[test]
    fn test_sparse_import() {
        // Hand-written snapshots may carry only the maps they care about.
        let config: ClusterConfig =
            serde_json::from_str(r#"{"Users": {"ops": {"name": "ops"}}}"#).unwrap();
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users["ops"].name, "ops");
        assert!(config.roles.is_empty());
    }
}
