//! Best-effort decoding of JSON-encoded catalog sub-columns
//!
//! Settings maps, grant lists and quota intervals arrive as JSON text inside
//! single catalog columns. The contract for these is tolerant: a missing
//! column and a malformed one both yield the empty value, but the two cases
//! are kept distinguishable at this boundary so callers (and tests) can tell
//! "empty because absent" from "empty because malformed".

use std::collections::BTreeMap;

use admiral_core::QuotaInterval;

/// Outcome of decoding an optional JSON sub-column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubField<T> {
    /// The column was NULL or empty
    Absent,
    /// The column held text that did not parse as the expected shape
    Malformed,
    /// The column decoded cleanly
    Parsed(T),
}

impl<T: Default> SubField<T> {
    /// Collapse to the decoded value, or the empty value for `Absent` and
    /// `Malformed`
    pub fn or_empty(self) -> T {
        match self {
            SubField::Parsed(value) => value,
            SubField::Absent | SubField::Malformed => T::default(),
        }
    }
}

impl<T> SubField<T> {
    /// True when the column held undecodable text
    pub fn is_malformed(&self) -> bool {
        matches!(self, SubField::Malformed)
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

/// Decode a JSON object of string keys and values (settings columns)
pub fn settings_map(raw: Option<&str>) -> SubField<BTreeMap<String, String>> {
    let Some(raw) = non_empty(raw) else {
        return SubField::Absent;
    };
    match serde_json::from_str(raw) {
        Ok(map) => SubField::Parsed(map),
        Err(_) => SubField::Malformed,
    }
}

/// Decode a JSON array of strings (grant lists)
pub fn string_list(raw: Option<&str>) -> SubField<Vec<String>> {
    let Some(raw) = non_empty(raw) else {
        return SubField::Absent;
    };
    match serde_json::from_str(raw) {
        Ok(list) => SubField::Parsed(list),
        Err(_) => SubField::Malformed,
    }
}

/// Decode the quota interval array.
///
/// The catalog reports every limit as a JSON number; durations are seconds.
/// Unknown keys are ignored, missing keys default to 0 (unlimited).
pub fn quota_intervals(raw: Option<&str>) -> SubField<Vec<QuotaInterval>> {
    let Some(raw) = non_empty(raw) else {
        return SubField::Absent;
    };
    let parsed: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(_) => return SubField::Malformed,
    };

    let mut intervals = Vec::with_capacity(parsed.len());
    for entry in &parsed {
        if !entry.is_object() {
            return SubField::Malformed;
        }
        intervals.push(QuotaInterval {
            duration_secs: num(entry, "duration"),
            queries: num(entry, "queries"),
            errors: num(entry, "errors"),
            result_rows: num(entry, "result_rows"),
            read_rows: num(entry, "read_rows"),
            execution_time_secs: num(entry, "execution_time"),
        });
    }
    SubField::Parsed(intervals)
}

fn num(entry: &serde_json::Value, key: &str) -> u64 {
    entry
        .get(key)
        .and_then(serde_json::Value::as_f64)
        .map(|f| f as u64)
        .unwrap_or(0)
}

/// Split a comma-separated catalog column into a list; NULL and empty
/// columns yield an empty list
pub fn csv_list(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) if !s.is_empty() => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_map_absent_vs_malformed() {
        assert_eq!(settings_map(None), SubField::Absent);
        assert_eq!(settings_map(Some("")), SubField::Absent);
        assert_eq!(settings_map(Some("not json")), SubField::Malformed);
        assert_eq!(settings_map(Some("[1, 2]")), SubField::Malformed);

        let parsed = settings_map(Some(r#"{"max_memory_usage": "10000000000"}"#));
        let map = parsed.or_empty();
        assert_eq!(map.get("max_memory_usage").unwrap(), "10000000000");
    }

    #[test]
    fn test_or_empty_collapses_both_failure_cases() {
        assert!(settings_map(None).or_empty().is_empty());
        assert!(settings_map(Some("{broken")).or_empty().is_empty());
    }

    #[test]
    fn test_string_list() {
        assert_eq!(string_list(None), SubField::Absent);
        assert_eq!(string_list(Some("{}")), SubField::Malformed);
        assert_eq!(
            string_list(Some(r#"["SELECT ON metrics.*"]"#)),
            SubField::Parsed(vec!["SELECT ON metrics.*".to_string()])
        );
    }

    #[test]
    fn test_quota_intervals() {
        let raw = r#"[{"duration": 3600, "queries": 10000}, {"duration": 86400.0, "execution_time": 7200}]"#;
        let intervals = quota_intervals(Some(raw)).or_empty();
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].duration_secs, 3600);
        assert_eq!(intervals[0].queries, 10_000);
        assert_eq!(intervals[0].errors, 0);
        assert_eq!(intervals[1].duration_secs, 86_400);
        assert_eq!(intervals[1].execution_time_secs, 7200);
    }

    #[test]
    fn test_quota_intervals_malformed() {
        assert!(quota_intervals(Some("3600")).is_malformed());
        assert!(quota_intervals(Some("[42]")).is_malformed());
        assert_eq!(quota_intervals(Some("")), SubField::Absent);
    }

    #[test]
    fn test_csv_list() {
        assert!(csv_list(None).is_empty());
        assert!(csv_list(Some("")).is_empty());
        assert_eq!(csv_list(Some("127.0.0.1")), vec!["127.0.0.1"]);
        assert_eq!(csv_list(Some("127.0.0.1,::1")), vec!["127.0.0.1", "::1"]);
    }
}
