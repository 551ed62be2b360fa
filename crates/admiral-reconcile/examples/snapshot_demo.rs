//! Snapshot authoring demo
//!
//! Builds a desired-state snapshot programmatically, exports it as JSON, and
//! renders the static storage configuration. Runs against a stub client, so
//! no cluster is needed; swap in a real driver to load and apply.

use admiral_client::{CancelToken, CatalogClient, ClientError, Row};
use admiral_core::{Database, Profile, Quota, QuotaInterval, StoragePolicy, StorageTier, User, Volume};
use admiral_reconcile::Manager;

/// Stand-in driver: answers every query with an empty result
struct OfflineClient;

impl CatalogClient for OfflineClient {
    fn query_rows(&self, _cancel: &CancelToken, _sql: &str) -> Result<Vec<Row>, ClientError> {
        Ok(Vec::new())
    }

    fn query_row(&self, _cancel: &CancelToken, _sql: &str) -> Result<Option<Row>, ClientError> {
        Ok(None)
    }

    fn execute(&self, _cancel: &CancelToken, _sql: &str) -> Result<(), ClientError> {
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = Manager::new(Box::new(OfflineClient));
    let config = manager.config_mut();

    let mut profile = Profile::new("readonly");
    profile.read_only = true;
    profile
        .settings
        .insert("max_memory_usage".to_string(), "10000000000".to_string());
    config.profiles.insert(profile.name.clone(), profile);

    let mut quota = Quota::new("default");
    quota.intervals.push(QuotaInterval {
        duration_secs: 3600,
        queries: 10_000,
        errors: 100,
        ..QuotaInterval::default()
    });
    config.quotas.insert(quota.name.clone(), quota);

    let mut analyst = User::new("analyst");
    analyst.password = Some("change-me".to_string());
    analyst.profile = Some("readonly".to_string());
    analyst.quota = Some("default".to_string());
    analyst.networks = vec!["10.0.0.0/8".to_string()];
    analyst.allow_databases = vec!["metrics".to_string()];
    config.users.insert(analyst.name.clone(), analyst);

    let mut metrics = Database::new("metrics", "Atomic");
    metrics.allowed_users = vec!["analyst".to_string()];
    config.databases.insert(metrics.name.clone(), metrics);

    let hot = StorageTier::disk("hot", "local", "/var/lib/clickhouse/hot/");
    let cold = StorageTier::disk("cold", "s3", "s3://archive/clickhouse/");
    config.storage_tiers.insert(hot.name.clone(), hot);
    config.storage_tiers.insert(cold.name.clone(), cold);

    let mut tiered = StoragePolicy::new("tiered");
    tiered.volumes.push(Volume {
        name: "recent".to_string(),
        disks: vec!["hot".to_string()],
        max_data_part_size: Some(1 << 30),
        ..Volume::default()
    });
    tiered.volumes.push(Volume {
        name: "archive".to_string(),
        disks: vec!["cold".to_string()],
        prefer_not_to_merge: true,
        ..Volume::default()
    });
    config.storage_policies.insert(tiered.name.clone(), tiered);

    println!("── exported snapshot ──────────────────────────────");
    println!("{}", manager.export_config()?);

    println!("── storage configuration ──────────────────────────");
    print!("{}", manager.render_storage_config());

    // Against a real driver this issues the create/alter stream
    manager.apply_config(&CancelToken::new())?;
    println!("── apply completed against the stub client ────────");

    Ok(())
}
