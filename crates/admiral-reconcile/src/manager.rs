//! The reconciliation manager
//!
//! Owns the snapshot and the client handle. Load and apply run on the
//! caller's thread; there is no internal locking, so a `Manager` shared
//! between threads must be serialized externally. `config_mut` hands out the
//! live snapshot, not a copy.

use admiral_client::{CancelToken, CatalogClient};
use admiral_core::ClusterConfig;

use crate::apply;
use crate::errors::{AdminError, EntityKind, Result};
use crate::load;

/// Loader order. Purely informational for users; each load stage is
/// independent of the others.
pub const LOAD_ORDER: [EntityKind; 7] = [
    EntityKind::Users,
    EntityKind::Profiles,
    EntityKind::Quotas,
    EntityKind::Databases,
    EntityKind::StorageTiers,
    EntityKind::StoragePolicies,
    EntityKind::Roles,
];

/// Apply order. Reflects soft reference dependencies: users reference
/// profiles, quotas and roles, and databases reference users and roles, so
/// those must exist first.
pub const APPLY_ORDER: [EntityKind; 7] = [
    EntityKind::StorageTiers,
    EntityKind::StoragePolicies,
    EntityKind::Profiles,
    EntityKind::Quotas,
    EntityKind::Roles,
    EntityKind::Users,
    EntityKind::Databases,
];

/// Administrative-state manager for one cluster
pub struct Manager {
    client: Box<dyn CatalogClient>,
    config: ClusterConfig,
}

impl Manager {
    /// Create a manager with an empty snapshot
    pub fn new(client: Box<dyn CatalogClient>) -> Self {
        Self {
            client,
            config: ClusterConfig::new(),
        }
    }

    /// Borrow the client handle
    pub(crate) fn client(&self) -> &dyn CatalogClient {
        &*self.client
    }

    /// Borrow the live snapshot
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Mutably borrow the live snapshot
    pub fn config_mut(&mut self) -> &mut ClusterConfig {
        &mut self.config
    }

    /// Replace the snapshot wholesale
    pub fn set_config(&mut self, config: ClusterConfig) {
        self.config = config;
    }

    /// Load the full administrative state from the cluster.
    ///
    /// Loaders run in [`LOAD_ORDER`]; the first failure aborts the load with
    /// a kind-specific wrap and leaves already-loaded maps in place
    /// (fail-fast, non-partial contract: treat the snapshot as undefined
    /// after an error).
    pub fn load_config(&mut self, cancel: &CancelToken) -> Result<()> {
        for kind in LOAD_ORDER {
            self.load_stage(kind, cancel)?;
        }
        Ok(())
    }

    /// Load a single entity kind from the cluster
    pub fn load_stage(&mut self, kind: EntityKind, cancel: &CancelToken) -> Result<()> {
        let wrap = |source| AdminError::Load { kind, source };
        match kind {
            EntityKind::Users => {
                self.config.users = load::load_users(&*self.client, cancel).map_err(wrap)?;
            }
            EntityKind::Profiles => {
                self.config.profiles = load::load_profiles(&*self.client, cancel).map_err(wrap)?;
            }
            EntityKind::Quotas => {
                self.config.quotas = load::load_quotas(&*self.client, cancel).map_err(wrap)?;
            }
            EntityKind::Databases => {
                self.config.databases =
                    load::load_databases(&*self.client, cancel).map_err(wrap)?;
            }
            EntityKind::StorageTiers => {
                self.config.storage_tiers =
                    load::load_storage_tiers(&*self.client, cancel).map_err(wrap)?;
            }
            EntityKind::StoragePolicies => {
                self.config.storage_policies =
                    load::load_storage_policies(&*self.client, cancel).map_err(wrap)?;
            }
            EntityKind::Roles => {
                self.config.roles = load::load_roles(&*self.client, cancel).map_err(wrap)?;
            }
        }
        Ok(())
    }

    /// Serialize the snapshot to indented JSON
    pub fn export_config(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.config).map_err(AdminError::Export)
    }

    /// Replace the snapshot from exported JSON.
    ///
    /// All entity maps are replaced wholesale. On a parse error the current
    /// snapshot is left untouched.
    pub fn import_config(&mut self, data: &[u8]) -> Result<()> {
        self.config = serde_json::from_slice(data).map_err(AdminError::Import)?;
        Ok(())
    }

    /// Apply the snapshot to the cluster.
    ///
    /// Stages run in [`APPLY_ORDER`]; a failing stage stops later stages and
    /// earlier stages' side effects remain applied. There is no rollback;
    /// re-running after fixing the cause converges, because every stage is
    /// create-or-update.
    pub fn apply_config(&self, cancel: &CancelToken) -> Result<()> {
        for kind in APPLY_ORDER {
            self.apply_stage(kind, cancel)?;
        }
        Ok(())
    }

    /// Apply a single entity kind.
    ///
    /// Public so a partially failed [`apply_config`](Self::apply_config) can
    /// be converged stage-by-stage once the underlying cause is fixed.
    pub fn apply_stage(&self, kind: EntityKind, cancel: &CancelToken) -> Result<()> {
        let client = &*self.client;
        let result = match kind {
            EntityKind::StorageTiers => {
                apply::apply_storage_tiers(client, cancel, &self.config.storage_tiers)
            }
            EntityKind::StoragePolicies => {
                apply::apply_storage_policies(client, cancel, &self.config.storage_policies)
            }
            EntityKind::Profiles => apply::apply_profiles(client, cancel, &self.config.profiles),
            EntityKind::Quotas => apply::apply_quotas(client, cancel, &self.config.quotas),
            EntityKind::Roles => apply::apply_roles(client, cancel, &self.config.roles),
            EntityKind::Users => apply::apply_users(client, cancel, &self.config.users),
            EntityKind::Databases => {
                apply::apply_databases(client, cancel, &self.config.databases)
            }
        };
        result.map_err(|source| AdminError::Apply {
            kind,
            source: Box::new(source),
        })
    }
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
