//! Storage tier and policy operations
//!
//! Lookups over the snapshot, usage statistics from the catalog, and the
//! static storage-configuration renderer. Tiers and policies cannot be
//! created through statements, so the rendered configuration file is the
//! write path for them: generate it, ship it to the server's configuration
//! directory, and the engine picks it up.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use admiral_client::{CancelToken, ClientError, ClientErrorKind};
use admiral_core::{escape_string, StoragePolicy, StorageTier};

use crate::errors::{AdminError, Result};
use crate::manager::Manager;

/// Disk space statistics for one storage tier
#[derive(Debug, Clone, PartialEq)]
pub struct TierUsage {
    pub name: String,
    pub path: String,
    pub disk_type: String,
    pub free_space: u64,
    pub total_space: u64,
    pub used_space: u64,
    pub usage_percent: f64,
    pub keep_free_space: u64,
}

/// Part statistics for one database
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseUsage {
    pub database: String,
    pub compressed_bytes: u64,
    pub uncompressed_bytes: u64,
    pub compression_ratio: f64,
    pub total_rows: u64,
    pub total_tables: u64,
}

impl DatabaseUsage {
    /// Usage for a database with no active parts yet
    fn empty(database: &str) -> Self {
        Self {
            database: database.to_string(),
            compressed_bytes: 0,
            uncompressed_bytes: 0,
            compression_ratio: 1.0,
            total_rows: 0,
            total_tables: 0,
        }
    }
}

fn check_name(what: &'static str, name: &str) -> Result<()> {
    admiral_core::validate_name(name).map_err(|source| AdminError::invalid_name(what, source))
}

impl Manager {
    /// Look up a storage tier in the snapshot
    pub fn storage_tier(&self, name: &str) -> Result<&StorageTier> {
        check_name("storage tier", name)?;
        self.config()
            .storage_tiers
            .get(name)
            .ok_or_else(|| AdminError::NotFound {
                what: "storage tier",
                name: name.to_string(),
            })
    }

    /// List all storage tiers in the snapshot
    pub fn list_storage_tiers(&self) -> Vec<&StorageTier> {
        self.config().storage_tiers.values().collect()
    }

    /// Look up a storage policy in the snapshot
    pub fn storage_policy(&self, name: &str) -> Result<&StoragePolicy> {
        check_name("storage policy", name)?;
        self.config()
            .storage_policies
            .get(name)
            .ok_or_else(|| AdminError::NotFound {
                what: "storage policy",
                name: name.to_string(),
            })
    }

    /// List all storage policies in the snapshot
    pub fn list_storage_policies(&self) -> Vec<&StoragePolicy> {
        self.config().storage_policies.values().collect()
    }

    /// Fetch live disk space counters for a tier known to the snapshot
    pub fn tier_usage(&self, cancel: &CancelToken, name: &str) -> Result<TierUsage> {
        let tier = self.storage_tier(name)?;
        let disk_type = tier.disk_type.clone();

        let sql = format!(
            "SELECT name, path, free_space, total_space, keep_free_space \
             FROM system.disks WHERE name = '{}'",
            escape_string(name)
        );
        let row = self
            .client()
            .query_row(cancel, &sql)
            .map_err(|source| {
                AdminError::statement("query usage for storage tier", name, source)
            })?
            .ok_or_else(|| {
                AdminError::statement(
                    "query usage for storage tier",
                    name,
                    ClientError::new(ClientErrorKind::Query, "no matching disk on server"),
                )
            })?;

        let free_space = row.get_u64(2)?;
        let total_space = row.get_u64(3)?;
        let used_space = total_space.saturating_sub(free_space);
        let usage_percent = if total_space > 0 {
            used_space as f64 / total_space as f64 * 100.0
        } else {
            0.0
        };

        Ok(TierUsage {
            name: row.get_str(0)?.to_string(),
            path: row.get_str(1)?.to_string(),
            disk_type,
            free_space,
            total_space,
            used_space,
            usage_percent,
            keep_free_space: row.get_u64(4)?,
        })
    }

    /// Fetch active-part statistics for a database known to the snapshot.
    ///
    /// A database with no active parts yields zeroed statistics, not an
    /// error; so does a statistics query the server cannot answer.
    pub fn database_usage(&self, cancel: &CancelToken, name: &str) -> Result<DatabaseUsage> {
        check_name("database", name)?;
        if !self.config().databases.contains_key(name) {
            return Err(AdminError::NotFound {
                what: "database",
                name: name.to_string(),
            });
        }

        let sql = format!(
            "SELECT database, SUM(data_compressed_bytes), SUM(data_uncompressed_bytes), \
             SUM(rows), COUNT() \
             FROM system.parts WHERE active AND database = '{}' GROUP BY database",
            escape_string(name)
        );

        match self.client().query_row(cancel, &sql) {
            Ok(Some(row)) => {
                let compressed_bytes = row.get_u64(1)?;
                let uncompressed_bytes = row.get_u64(2)?;
                let compression_ratio = if uncompressed_bytes > 0 {
                    compressed_bytes as f64 / uncompressed_bytes as f64
                } else {
                    1.0
                };
                Ok(DatabaseUsage {
                    database: row.get_str(0)?.to_string(),
                    compressed_bytes,
                    uncompressed_bytes,
                    compression_ratio,
                    total_rows: row.get_u64(3)?,
                    total_tables: row.get_u64(4)?,
                })
            }
            Ok(None) | Err(_) => Ok(DatabaseUsage::empty(name)),
        }
    }

    /// Render the engine's static storage configuration for the snapshot's
    /// tiers and policies
    pub fn render_storage_config(&self) -> String {
        let mut xml = String::new();
        xml.push_str("<yandex>\n");
        xml.push_str("  <storage_configuration>\n");

        xml.push_str("    <disks>\n");
        for tier in self.config().storage_tiers.values() {
            if tier.kind != "disk" {
                continue;
            }
            let _ = writeln!(xml, "      <{}>", tier.name);
            let _ = writeln!(xml, "        <type>{}</type>", tier.disk_type);
            let _ = writeln!(xml, "        <path>{}</path>", tier.path);
            if let Some(size) = tier.max_data_part_size {
                let _ = writeln!(
                    xml,
                    "        <max_data_part_size_bytes>{size}</max_data_part_size_bytes>"
                );
            }
            if let Some(percentage) = tier.max_disk_use_percentage {
                let _ = writeln!(
                    xml,
                    "        <max_disk_use_percentage>{percentage}</max_disk_use_percentage>"
                );
            }
            let _ = writeln!(xml, "      </{}>", tier.name);
        }
        xml.push_str("    </disks>\n");

        xml.push_str("    <policies>\n");
        for policy in self.config().storage_policies.values() {
            let _ = writeln!(xml, "      <{}>", policy.name);
            for volume in &policy.volumes {
                let _ = writeln!(xml, "        <{}>", volume.name);
                xml.push_str("          <disks>\n");
                for disk in &volume.disks {
                    let _ = writeln!(xml, "            <disk>{disk}</disk>");
                }
                xml.push_str("          </disks>\n");
                if let Some(size) = volume.max_data_part_size {
                    let _ = writeln!(
                        xml,
                        "          <max_data_part_size_bytes>{size}</max_data_part_size_bytes>"
                    );
                }
                if volume.prefer_not_to_merge {
                    xml.push_str("          <prefer_not_to_merge>true</prefer_not_to_merge>\n");
                }
                let _ = writeln!(xml, "        </{}>", volume.name);
            }
            let _ = writeln!(xml, "      </{}>", policy.name);
        }
        xml.push_str("    </policies>\n");

        xml.push_str("  </storage_configuration>\n");
        xml.push_str("</yandex>\n");
        xml
    }

    /// Write the rendered storage configuration to a file, creating parent
    /// directories as needed
    pub fn write_storage_config(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.render_storage_config())?;
        Ok(())
    }
}
