// Applier integration tests: create-vs-update branching, the per-kind
// update strategies, stage ordering and fail-fast behaviour, log-only
// storage kinds, and role-capability absence.

mod common;

use std::rc::Rc;

use admiral_client::{CancelToken, ClientError, ClientErrorKind};
use admiral_core::{ClusterConfig, Database, Profile, Quota, QuotaInterval, Role, StoragePolicy, StorageTier, User, Volume};
use admiral_reconcile::{AdminError, EntityKind, Manager};

use common::{name_rows, set_roles_supported, FakeCatalog};

/// Script every existing-name set as empty and roles as supported
fn empty_cluster() -> FakeCatalog {
    let catalog = FakeCatalog::new();
    catalog.on_query("SELECT name FROM system.users", Vec::new());
    catalog.on_query("SELECT name FROM system.profiles", Vec::new());
    catalog.on_query("SELECT name FROM system.quotas", Vec::new());
    catalog.on_query("SELECT name FROM system.databases", Vec::new());
    catalog.on_query("SELECT name FROM system.disks", Vec::new());
    catalog.on_query("SELECT DISTINCT policy_name", Vec::new());
    catalog.on_query("SELECT name FROM system.roles", Vec::new());
    set_roles_supported(&catalog, true);
    catalog
}

fn desired_config() -> ClusterConfig {
    let mut config = ClusterConfig::new();

    let mut analyst = User::new("analyst");
    analyst.password = Some("secret".to_string());
    analyst.profile = Some("readonly".to_string());
    analyst.allow_databases = vec!["metrics".to_string()];
    analyst.roles = vec!["reader".to_string()];
    config.users.insert(analyst.name.clone(), analyst);

    let mut ops = User::new("ops");
    ops.deny_databases = vec!["metrics".to_string()];
    config.users.insert(ops.name.clone(), ops);

    let mut profile = Profile::new("readonly");
    profile.read_only = true;
    config.profiles.insert(profile.name.clone(), profile);

    let mut quota = Quota::new("default");
    quota.intervals.push(QuotaInterval {
        duration_secs: 3600,
        queries: 10_000,
        ..QuotaInterval::default()
    });
    config.quotas.insert(quota.name.clone(), quota);

    let mut role = Role::new("reader");
    role.grants.push("SELECT ON metrics.*".to_string());
    config.roles.insert(role.name.clone(), role);

    let mut database = Database::new("metrics", "Atomic");
    database.allowed_users = vec!["analyst".to_string()];
    config.databases.insert(database.name.clone(), database);

    config
}

#[test]
fn test_create_on_empty_issues_only_create_sequences() {
    let catalog = Rc::new(empty_cluster());
    let mut manager = Manager::new(Box::new(catalog.clone()));
    manager.set_config(desired_config());

    manager.apply_config(&CancelToken::new()).unwrap();
    let executed = catalog.executed();

    // One create per desired entity, zero update-path statements
    assert_eq!(catalog.executed_matching("CREATE USER IF NOT EXISTS").len(), 2);
    assert_eq!(
        catalog.executed_matching("CREATE SETTINGS PROFILE IF NOT EXISTS").len(),
        1
    );
    assert_eq!(catalog.executed_matching("CREATE QUOTA IF NOT EXISTS").len(), 1);
    assert_eq!(catalog.executed_matching("CREATE ROLE IF NOT EXISTS").len(), 1);
    assert_eq!(
        catalog.executed_matching("CREATE DATABASE IF NOT EXISTS").len(),
        1
    );
    assert!(catalog.executed_matching("ALTER USER").is_empty());
    assert!(catalog.executed_matching("DROP QUOTA").is_empty());
    assert!(catalog.executed_matching("REVOKE ALL ON *.*").is_empty());

    // Follow-up grants ride behind their creates
    assert!(executed.contains(&"GRANT SHOW, SELECT ON `metrics`.* TO `analyst`".to_string()));
    assert!(executed.contains(&"REVOKE ALL ON `metrics`.* FROM `ops`".to_string()));
    assert!(executed.contains(&"GRANT `reader` TO `analyst`".to_string()));
    assert!(executed.contains(&"GRANT SELECT ON metrics.* TO `reader`".to_string()));
    assert!(executed.contains(&"GRANT ALL ON `metrics`.* TO `analyst`".to_string()));
}

#[test]
fn test_apply_respects_dependency_order() {
    let catalog = Rc::new(empty_cluster());
    let mut manager = Manager::new(Box::new(catalog.clone()));
    manager.set_config(desired_config());

    manager.apply_config(&CancelToken::new()).unwrap();
    let executed = catalog.executed();

    let position = |prefix: &str| {
        executed
            .iter()
            .position(|sql| sql.starts_with(prefix))
            .unwrap_or_else(|| panic!("no statement starting with {prefix}"))
    };

    let profile = position("CREATE SETTINGS PROFILE");
    let quota = position("CREATE QUOTA");
    let role = position("CREATE ROLE");
    let user = position("CREATE USER");
    let database = position("CREATE DATABASE");

    assert!(profile < quota && quota < role && role < user && user < database);
}

#[test]
fn test_update_user_revokes_then_reapplies() {
    let catalog = Rc::new(empty_cluster());
    catalog.on_query("SELECT name FROM system.users", name_rows(&["analyst"]));

    let mut manager = Manager::new(Box::new(catalog.clone()));
    let mut config = ClusterConfig::new();
    let mut analyst = User::new("analyst");
    analyst.quota = Some("default".to_string());
    analyst.allow_databases = vec!["metrics".to_string()];
    analyst.roles = vec!["reader".to_string()];
    config.users.insert(analyst.name.clone(), analyst);
    manager.set_config(config);

    manager.apply_stage(EntityKind::Users, &CancelToken::new()).unwrap();

    assert_eq!(
        catalog.executed(),
        vec![
            "ALTER USER `analyst` QUOTA `default`".to_string(),
            "REVOKE ALL ON *.* FROM `analyst`".to_string(),
            "REVOKE ALL ROLES FROM `analyst`".to_string(),
            "GRANT SHOW, SELECT ON `metrics`.* TO `analyst`".to_string(),
            "GRANT `reader` TO `analyst`".to_string(),
        ]
    );
}

#[test]
fn test_update_quota_drops_then_recreates() {
    let catalog = Rc::new(empty_cluster());
    catalog.on_query("SELECT name FROM system.quotas", name_rows(&["default"]));

    let mut manager = Manager::new(Box::new(catalog.clone()));
    let mut config = ClusterConfig::new();
    let mut quota = Quota::new("default");
    quota.intervals.push(QuotaInterval {
        duration_secs: 60,
        queries: 100,
        ..QuotaInterval::default()
    });
    config.quotas.insert(quota.name.clone(), quota);
    manager.set_config(config);

    manager.apply_stage(EntityKind::Quotas, &CancelToken::new()).unwrap();

    assert_eq!(
        catalog.executed(),
        vec![
            "DROP QUOTA IF EXISTS `default`".to_string(),
            "CREATE QUOTA IF NOT EXISTS `default` FOR INTERVAL 60 SECOND MAX QUERIES 100"
                .to_string(),
        ]
    );
}

#[test]
fn test_update_profile_emits_readonly_zero() {
    let catalog = Rc::new(empty_cluster());
    catalog.on_query("SELECT name FROM system.profiles", name_rows(&["open"]));

    let mut manager = Manager::new(Box::new(catalog.clone()));
    let mut config = ClusterConfig::new();
    config.profiles.insert("open".to_string(), Profile::new("open"));
    manager.set_config(config);

    manager.apply_stage(EntityKind::Profiles, &CancelToken::new()).unwrap();

    assert_eq!(
        catalog.executed(),
        vec!["ALTER SETTINGS PROFILE `open` READONLY = 0".to_string()]
    );
}

#[test]
fn test_update_database_revokes_from_all_then_regrants() {
    let catalog = Rc::new(empty_cluster());
    catalog.on_query("SELECT name FROM system.databases", name_rows(&["metrics"]));

    let mut manager = Manager::new(Box::new(catalog.clone()));
    let mut config = ClusterConfig::new();
    let mut database = Database::new("metrics", "Atomic");
    database.allowed_users = vec!["analyst".to_string(), "ops".to_string()];
    database.allowed_roles = vec!["reader".to_string()];
    config.databases.insert(database.name.clone(), database);
    manager.set_config(config);

    manager.apply_stage(EntityKind::Databases, &CancelToken::new()).unwrap();

    assert_eq!(
        catalog.executed(),
        vec![
            "REVOKE ALL ON `metrics`.* FROM ALL".to_string(),
            "GRANT ALL ON `metrics`.* TO `analyst`, `ops`".to_string(),
            "GRANT ALL ON `metrics`.* TO `reader`".to_string(),
        ]
    );
}

#[test]
fn test_update_role_revokes_then_reapplies_grants_in_order() {
    let catalog = Rc::new(empty_cluster());
    catalog.on_query("SELECT name FROM system.roles", name_rows(&["reader"]));

    let mut manager = Manager::new(Box::new(catalog.clone()));
    let mut config = ClusterConfig::new();
    let mut role = Role::new("reader");
    role.settings.insert("readonly".to_string(), "1".to_string());
    role.grants = vec![
        "SELECT ON metrics.*".to_string(),
        "SHOW ON logs.*".to_string(),
    ];
    config.roles.insert(role.name.clone(), role);
    manager.set_config(config);

    manager.apply_stage(EntityKind::Roles, &CancelToken::new()).unwrap();

    assert_eq!(
        catalog.executed(),
        vec![
            "REVOKE ALL ON *.* FROM `reader`".to_string(),
            "ALTER ROLE `reader` SETTINGS readonly = 1".to_string(),
            "GRANT SELECT ON metrics.* TO `reader`".to_string(),
            "GRANT SHOW ON logs.* TO `reader`".to_string(),
        ]
    );
}

#[test]
fn test_storage_kinds_never_emit_statements() {
    let catalog = Rc::new(empty_cluster());
    let mut manager = Manager::new(Box::new(catalog.clone()));

    let mut config = ClusterConfig::new();
    let tier = StorageTier::disk("hot", "local", "/data/hot/");
    config.storage_tiers.insert(tier.name.clone(), tier);
    let mut policy = StoragePolicy::new("tiered");
    policy.volumes.push(Volume {
        name: "hot".to_string(),
        disks: vec!["hot".to_string()],
        ..Volume::default()
    });
    config.storage_policies.insert(policy.name.clone(), policy);
    manager.set_config(config);

    manager.apply_stage(EntityKind::StorageTiers, &CancelToken::new()).unwrap();
    manager.apply_stage(EntityKind::StoragePolicies, &CancelToken::new()).unwrap();

    assert!(
        catalog.executed().is_empty(),
        "tiers and policies are detect-and-report only"
    );
}

#[test]
fn test_roles_unsupported_apply_is_a_noop() {
    let catalog = Rc::new(empty_cluster());
    set_roles_supported(&catalog, false);

    let mut manager = Manager::new(Box::new(catalog.clone()));
    let mut config = ClusterConfig::new();
    let mut role = Role::new("reader");
    role.grants.push("SELECT ON metrics.*".to_string());
    config.roles.insert(role.name.clone(), role);
    manager.set_config(config);

    manager.apply_config(&CancelToken::new()).unwrap();
    assert!(catalog.executed().is_empty(), "no role statements expected");
}

#[test]
fn test_stage_failure_stops_later_stages() {
    let catalog = Rc::new(empty_cluster());
    catalog.fail_query(
        "SELECT name FROM system.profiles",
        ClientError::new(ClientErrorKind::Connection, "connection reset"),
    );

    let mut manager = Manager::new(Box::new(catalog.clone()));
    manager.set_config(desired_config());

    let err = manager.apply_config(&CancelToken::new()).unwrap_err();
    match &err {
        AdminError::Apply { kind, .. } => assert_eq!(*kind, EntityKind::Profiles),
        other => panic!("expected Apply error, got {other}"),
    }
    assert!(
        err.to_string().starts_with("failed to apply profiles:"),
        "got: {err}"
    );

    // Profiles precede quotas, roles, users and databases: nothing may run
    assert!(catalog.executed().is_empty());
}

#[test]
fn test_statement_failure_names_the_entity() {
    let catalog = Rc::new(empty_cluster());
    catalog.fail_execute(
        "CREATE USER IF NOT EXISTS `analyst`",
        ClientError::new(ClientErrorKind::Query, "access denied"),
    );

    let mut manager = Manager::new(Box::new(catalog.clone()));
    let mut config = ClusterConfig::new();
    config.users.insert("analyst".to_string(), User::new("analyst"));
    config.users.insert("zed".to_string(), User::new("zed"));
    manager.set_config(config);

    let err = manager
        .apply_stage(EntityKind::Users, &CancelToken::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "failed to apply users: failed to create user analyst: query error: access denied"
    );

    // The failing user precedes `zed` in map order, so `zed` is never reached
    assert!(catalog.executed_matching("CREATE USER").is_empty());
}

#[test]
fn test_cancelled_apply_aborts_first_stage() {
    let catalog = Rc::new(empty_cluster());
    let mut manager = Manager::new(Box::new(catalog.clone()));
    manager.set_config(desired_config());

    let cancel = CancelToken::new();
    cancel.cancel();

    let err = manager.apply_config(&cancel).unwrap_err();
    match &err {
        AdminError::Apply { kind, .. } => assert_eq!(*kind, EntityKind::StorageTiers),
        other => panic!("expected Apply error, got {other}"),
    }
    assert!(catalog.executed().is_empty());
}
