//! Admiral Core - administrative entity model
//!
//! This crate provides the in-memory model of cluster-wide administrative
//! state for a ClickHouse-style analytical cluster:
//! - Entity records (users, settings profiles, quotas, databases, storage
//!   tiers, storage policies, roles) keyed by name
//! - The [`ClusterConfig`] snapshot aggregate with lossless JSON round-trip
//! - Identifier quoting and literal escaping for generated statements
//! - Name validation rules for the mutation API
//!
//! The model is pure data: loading it from a live cluster and applying it
//! back are the reconciler's job (`admiral-reconcile`).

pub mod model;
pub mod rules;
pub mod sql;

// Re-export commonly used types
pub use model::{
    ClusterConfig, Database, Profile, Quota, QuotaInterval, Role, StoragePolicy, StorageTier, User,
    Volume,
};
pub use rules::{validate_name, NameError};
pub use sql::{escape_string, quote_identifier, quote_identifier_list};
