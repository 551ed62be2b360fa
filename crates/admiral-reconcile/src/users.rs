//! User management convenience operations
//!
//! Single-entity operations that keep the snapshot and the cluster in step:
//! each validates its names, mutates the in-memory map, and issues the
//! matching statement(s) immediately. For bulk reconciliation use
//! [`Manager::apply_config`](crate::Manager::apply_config) instead.

use admiral_client::CancelToken;
use admiral_core::{quote_identifier, validate_name, User};

use crate::apply;
use crate::errors::{AdminError, Result};
use crate::manager::Manager;

fn check_name(what: &'static str, name: &str) -> Result<()> {
    validate_name(name).map_err(|source| AdminError::invalid_name(what, source))
}

impl Manager {
    /// Add a new user to the snapshot and create it on the cluster
    pub fn create_user(&mut self, cancel: &CancelToken, user: User) -> Result<()> {
        check_name("user", &user.name)?;
        if self.config().users.contains_key(&user.name) {
            return Err(AdminError::AlreadyExists {
                what: "user",
                name: user.name,
            });
        }

        self.config_mut()
            .users
            .insert(user.name.clone(), user.clone());
        apply::create_user(self.client(), cancel, &user)
    }

    /// Replace an existing user in the snapshot and update it on the cluster
    pub fn update_user(&mut self, cancel: &CancelToken, user: User) -> Result<()> {
        check_name("user", &user.name)?;
        if !self.config().users.contains_key(&user.name) {
            return Err(AdminError::NotFound {
                what: "user",
                name: user.name,
            });
        }

        self.config_mut()
            .users
            .insert(user.name.clone(), user.clone());
        apply::update_user(self.client(), cancel, &user)
    }

    /// Remove a user from the snapshot and drop it on the cluster
    pub fn delete_user(&mut self, cancel: &CancelToken, name: &str) -> Result<()> {
        check_name("user", name)?;
        if self.config_mut().users.remove(name).is_none() {
            return Err(AdminError::NotFound {
                what: "user",
                name: name.to_string(),
            });
        }

        let sql = format!("DROP USER IF EXISTS {}", quote_identifier(name));
        self.client()
            .execute(cancel, &sql)
            .map_err(|source| AdminError::statement("delete user", name, source))
    }

    /// Look up a user in the snapshot
    pub fn user(&self, name: &str) -> Result<&User> {
        check_name("user", name)?;
        self.config().users.get(name).ok_or_else(|| AdminError::NotFound {
            what: "user",
            name: name.to_string(),
        })
    }

    /// List all users in the snapshot
    pub fn list_users(&self) -> Vec<&User> {
        self.config().users.values().collect()
    }

    /// Grant a role to a user; a no-op when already granted
    pub fn add_user_role(
        &mut self,
        cancel: &CancelToken,
        user_name: &str,
        role_name: &str,
    ) -> Result<()> {
        check_name("user", user_name)?;
        check_name("role", role_name)?;

        let user = self.lookup_user_mut(user_name)?;
        if user.roles.iter().any(|role| role == role_name) {
            return Ok(());
        }
        user.roles.push(role_name.to_string());

        let sql = format!(
            "GRANT {} TO {}",
            quote_identifier(role_name),
            quote_identifier(user_name)
        );
        self.client().execute(cancel, &sql).map_err(|source| {
            AdminError::statement(format!("add role {role_name} to user"), user_name, source)
        })
    }

    /// Revoke a role from a user; a no-op when not granted
    pub fn remove_user_role(
        &mut self,
        cancel: &CancelToken,
        user_name: &str,
        role_name: &str,
    ) -> Result<()> {
        check_name("user", user_name)?;
        check_name("role", role_name)?;

        let user = self.lookup_user_mut(user_name)?;
        let before = user.roles.len();
        user.roles.retain(|role| role != role_name);
        if user.roles.len() == before {
            return Ok(());
        }

        let sql = format!(
            "REVOKE {} FROM {}",
            quote_identifier(role_name),
            quote_identifier(user_name)
        );
        self.client().execute(cancel, &sql).map_err(|source| {
            AdminError::statement(
                format!("remove role {role_name} from user"),
                user_name,
                source,
            )
        })
    }

    /// Set a plaintext password, clearing any stored hash
    pub fn set_user_password(
        &mut self,
        cancel: &CancelToken,
        user_name: &str,
        password: &str,
    ) -> Result<()> {
        check_name("user", user_name)?;

        let user = self.lookup_user_mut(user_name)?;
        user.password = Some(password.to_string());
        user.hashed_password = None;

        let sql = format!(
            "ALTER USER {} IDENTIFIED WITH plaintext_password BY '{}'",
            quote_identifier(user_name),
            admiral_core::escape_string(password)
        );
        self.client().execute(cancel, &sql).map_err(|source| {
            AdminError::statement("set password for user", user_name, source)
        })
    }

    /// Assign a quota to a user
    pub fn set_user_quota(
        &mut self,
        cancel: &CancelToken,
        user_name: &str,
        quota_name: &str,
    ) -> Result<()> {
        check_name("user", user_name)?;
        check_name("quota", quota_name)?;

        let user = self.lookup_user_mut(user_name)?;
        user.quota = Some(quota_name.to_string());

        let sql = format!(
            "ALTER USER {} QUOTA {}",
            quote_identifier(user_name),
            quote_identifier(quota_name)
        );
        self.client()
            .execute(cancel, &sql)
            .map_err(|source| AdminError::statement("set quota for user", user_name, source))
    }

    /// Assign a settings profile to a user
    pub fn set_user_profile(
        &mut self,
        cancel: &CancelToken,
        user_name: &str,
        profile_name: &str,
    ) -> Result<()> {
        check_name("user", user_name)?;
        check_name("profile", profile_name)?;

        let user = self.lookup_user_mut(user_name)?;
        user.profile = Some(profile_name.to_string());

        let sql = format!(
            "ALTER USER {} DEFAULT ROLE {}",
            quote_identifier(user_name),
            quote_identifier(profile_name)
        );
        self.client()
            .execute(cancel, &sql)
            .map_err(|source| AdminError::statement("set profile for user", user_name, source))
    }

    /// Grant SHOW/SELECT on a database to a user; a no-op when already allowed
    pub fn add_user_allowed_database(
        &mut self,
        cancel: &CancelToken,
        user_name: &str,
        database_name: &str,
    ) -> Result<()> {
        check_name("user", user_name)?;
        check_name("database", database_name)?;

        let user = self.lookup_user_mut(user_name)?;
        if user.allow_databases.iter().any(|db| db == database_name) {
            return Ok(());
        }
        user.allow_databases.push(database_name.to_string());

        let sql = format!(
            "GRANT SHOW, SELECT ON {}.* TO {}",
            quote_identifier(database_name),
            quote_identifier(user_name)
        );
        self.client().execute(cancel, &sql).map_err(|source| {
            AdminError::statement("grant database permissions to user", user_name, source)
        })
    }

    /// Revoke all grants on a database from a user; a no-op when not allowed
    pub fn remove_user_allowed_database(
        &mut self,
        cancel: &CancelToken,
        user_name: &str,
        database_name: &str,
    ) -> Result<()> {
        check_name("user", user_name)?;
        check_name("database", database_name)?;

        let user = self.lookup_user_mut(user_name)?;
        let before = user.allow_databases.len();
        user.allow_databases.retain(|db| db != database_name);
        if user.allow_databases.len() == before {
            return Ok(());
        }

        let sql = format!(
            "REVOKE ALL ON {}.* FROM {}",
            quote_identifier(database_name),
            quote_identifier(user_name)
        );
        self.client().execute(cancel, &sql).map_err(|source| {
            AdminError::statement("revoke database permissions from user", user_name, source)
        })
    }

    fn lookup_user_mut(&mut self, name: &str) -> Result<&mut User> {
        self.config_mut()
            .users
            .get_mut(name)
            .ok_or_else(|| AdminError::NotFound {
                what: "user",
                name: name.to_string(),
            })
    }
}
