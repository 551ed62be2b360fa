//! Cooperative cancellation for blocking client calls

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cancellation flag shared between a caller and in-flight client calls.
///
/// Clones observe the same flag. Client implementations are expected to check
/// the token before (and, where the driver allows it, during) each statement
/// and abort with [`ClientErrorKind::Cancelled`](crate::ClientErrorKind)
/// once it trips. Cancellation has no compensating action: statements that
/// already executed stay executed.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the flag; every clone observes it
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check whether the flag has been tripped
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
