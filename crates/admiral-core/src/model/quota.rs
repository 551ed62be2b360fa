use serde::{Deserialize, Serialize};

/// A named set of usage limits evaluated over one or more time windows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Quota {
    /// Quota name; equals the key in [`ClusterConfig::quotas`](crate::ClusterConfig)
    pub name: String,

    /// Limit windows in catalog order
    pub intervals: Vec<QuotaInterval>,
}

impl Quota {
    /// Create a quota with the given name and no intervals
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            intervals: Vec::new(),
        }
    }
}

/// One limit window of a quota. A limit of 0 means unlimited.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaInterval {
    /// Window length in seconds
    pub duration_secs: u64,

    /// Maximum queries per window
    pub queries: u64,

    /// Maximum errored queries per window
    pub errors: u64,

    /// Maximum result rows per window
    pub result_rows: u64,

    /// Maximum rows read from tables per window
    pub read_rows: u64,

    /// Maximum total execution time per window, in seconds
    pub execution_time_secs: u64,
}
