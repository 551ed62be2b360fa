//! Error taxonomy for load and apply operations
//!
//! Stage failures are wrapped with the entity kind they belong to, so an
//! operator can tell which part of a load or apply failed without inspecting
//! internal state ("failed to load users: …"). Capability absence is never
//! an error; see the role loader and applier.

use admiral_client::ClientError;
use admiral_core::NameError;
use thiserror::Error;

/// Result type alias using AdminError
pub type Result<T> = std::result::Result<T, AdminError>;

/// The seven reconcilable entity kinds.
///
/// Doubles as the stage tag for load and apply: each stage operates on
/// exactly one kind, and stages can be re-run individually after a partial
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Users,
    Profiles,
    Quotas,
    Databases,
    StorageTiers,
    StoragePolicies,
    Roles,
}

impl EntityKind {
    /// Human-readable label used in wrapped error messages
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Users => "users",
            EntityKind::Profiles => "profiles",
            EntityKind::Quotas => "quotas",
            EntityKind::Databases => "databases",
            EntityKind::StorageTiers => "storage tiers",
            EntityKind::StoragePolicies => "storage policies",
            EntityKind::Roles => "roles",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors surfaced by the reconciler
#[derive(Debug, Error)]
pub enum AdminError {
    /// A load stage failed; remaining stages were not attempted
    #[error("failed to load {kind}: {source}")]
    Load {
        kind: EntityKind,
        #[source]
        source: ClientError,
    },

    /// An apply stage failed; later stages were not attempted and earlier
    /// stages' side effects remain applied
    #[error("failed to apply {kind}: {source}")]
    Apply {
        kind: EntityKind,
        #[source]
        source: Box<AdminError>,
    },

    /// A single generated statement failed against the cluster
    #[error("failed to {op} {name}: {source}")]
    Statement {
        op: String,
        name: String,
        #[source]
        source: ClientError,
    },

    /// A raw catalog query failed (existing-name sets, usage statistics)
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Snapshot serialization failed
    #[error("failed to export configuration: {0}")]
    Export(#[source] serde_json::Error),

    /// Snapshot deserialization failed; the current snapshot is unchanged
    #[error("failed to import configuration: {0}")]
    Import(#[source] serde_json::Error),

    /// Writing the rendered storage configuration to disk failed
    #[error("failed to write storage configuration: {0}")]
    Io(#[from] std::io::Error),

    /// A name handed to the mutation API failed validation
    #[error("invalid {what} name: {source}")]
    InvalidName {
        what: &'static str,
        #[source]
        source: NameError,
    },

    /// The mutation API was asked to create an entity that is already present
    #[error("{what} {name} already exists")]
    AlreadyExists { what: &'static str, name: String },

    /// The mutation API referenced an entity that is not present
    #[error("{what} {name} does not exist")]
    NotFound { what: &'static str, name: String },
}

impl AdminError {
    /// Wrap a failed statement with the operation and entity it targeted
    pub(crate) fn statement(
        op: impl Into<String>,
        name: impl Into<String>,
        source: ClientError,
    ) -> Self {
        AdminError::Statement {
            op: op.into(),
            name: name.into(),
            source,
        }
    }

    /// Wrap a name validation failure
    pub(crate) fn invalid_name(what: &'static str, source: NameError) -> Self {
        AdminError::InvalidName { what, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admiral_client::ClientErrorKind;

    #[test]
    fn test_load_wrap_names_the_kind() {
        let err = AdminError::Load {
            kind: EntityKind::Users,
            source: ClientError::new(ClientErrorKind::Connection, "connection refused"),
        };
        assert_eq!(
            err.to_string(),
            "failed to load users: connection error: connection refused"
        );
    }

    #[test]
    fn test_apply_wrap_chains_statement_context() {
        let inner = AdminError::statement(
            "create user",
            "analyst",
            ClientError::new(ClientErrorKind::Query, "access denied"),
        );
        let err = AdminError::Apply {
            kind: EntityKind::Users,
            source: Box::new(inner),
        };
        assert_eq!(
            err.to_string(),
            "failed to apply users: failed to create user analyst: query error: access denied"
        );
    }

    #[test]
    fn test_entity_kind_labels() {
        assert_eq!(EntityKind::StorageTiers.to_string(), "storage tiers");
        assert_eq!(EntityKind::Roles.to_string(), "roles");
    }
}
