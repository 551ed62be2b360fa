//! Driver error surface

use thiserror::Error;

/// Classification of a failed client call.
///
/// Drivers map their native errors onto these kinds once, at the seam, where
/// the driver and server versions are known. The reconciler never inspects
/// error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// Connection-level failure (dial, TLS, pool exhaustion, broken stream)
    Connection,
    /// The server rejected or failed the statement
    Query,
    /// The statement referenced a table the server does not expose
    ///
    /// Capability probing depends on this kind: older servers lack some
    /// `system` tables, and that condition must be distinguishable from a
    /// genuine query failure.
    UnknownTable,
    /// The call was aborted by its [`CancelToken`](crate::CancelToken)
    Cancelled,
    /// A row column could not be read as the requested type
    Decode,
}

impl ClientErrorKind {
    /// Short lowercase label used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            ClientErrorKind::Connection => "connection error",
            ClientErrorKind::Query => "query error",
            ClientErrorKind::UnknownTable => "unknown table",
            ClientErrorKind::Cancelled => "cancelled",
            ClientErrorKind::Decode => "decode error",
        }
    }
}

/// Error returned by [`CatalogClient`](crate::CatalogClient) operations
#[derive(Debug, Clone, Error)]
#[error("{}: {message}", .kind.label())]
pub struct ClientError {
    kind: ClientErrorKind,
    message: String,
}

impl ClientError {
    /// Create an error with the given kind and message
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for a cancellation error
    pub fn cancelled() -> Self {
        Self::new(ClientErrorKind::Cancelled, "statement aborted")
    }

    /// Shorthand for a column decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Decode, message)
    }

    /// Get the error classification
    pub fn kind(&self) -> ClientErrorKind {
        self.kind
    }

    /// Get the driver-supplied message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when the statement referenced a table the server does not expose
    pub fn is_unknown_table(&self) -> bool {
        self.kind == ClientErrorKind::UnknownTable
    }

    /// True when the call was aborted by cancellation
    pub fn is_cancelled(&self) -> bool {
        self.kind == ClientErrorKind::Cancelled
    }
}
