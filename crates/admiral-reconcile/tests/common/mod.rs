//! Shared test double: a scripted catalog client.
//!
//! Queries are matched by substring pattern (last registration wins) and
//! return a cloned canned response on every call; executed statements are
//! recorded verbatim so tests can assert on the exact generated stream.

#![allow(dead_code)]

use std::cell::RefCell;

use admiral_client::{CancelToken, CatalogClient, ClientError, ClientErrorKind, Row, Value};

type CannedResponse = Result<Vec<Row>, ClientError>;

struct Script {
    pattern: String,
    response: CannedResponse,
}

#[derive(Default)]
pub struct FakeCatalog {
    scripts: RefCell<Vec<Script>>,
    execute_failures: RefCell<Vec<(String, ClientError)>>,
    executed: RefCell<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries containing `pattern` with the given rows
    pub fn on_query(&self, pattern: &str, rows: Vec<Row>) {
        self.scripts.borrow_mut().push(Script {
            pattern: pattern.to_string(),
            response: Ok(rows),
        });
    }

    /// Fail queries containing `pattern` with the given error
    pub fn fail_query(&self, pattern: &str, error: ClientError) {
        self.scripts.borrow_mut().push(Script {
            pattern: pattern.to_string(),
            response: Err(error),
        });
    }

    /// Fail executed statements containing `pattern` with the given error
    pub fn fail_execute(&self, pattern: &str, error: ClientError) {
        self.execute_failures
            .borrow_mut()
            .push((pattern.to_string(), error));
    }

    /// Every statement executed so far, in order
    pub fn executed(&self) -> Vec<String> {
        self.executed.borrow().clone()
    }

    /// Executed statements starting with the given prefix
    pub fn executed_matching(&self, prefix: &str) -> Vec<String> {
        self.executed
            .borrow()
            .iter()
            .filter(|sql| sql.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn respond(&self, sql: &str) -> CannedResponse {
        let scripts = self.scripts.borrow();
        match scripts.iter().rev().find(|s| sql.contains(&s.pattern)) {
            Some(script) => script.response.clone(),
            None => Err(ClientError::new(
                ClientErrorKind::Query,
                format!("unexpected query in test: {sql}"),
            )),
        }
    }
}

impl CatalogClient for FakeCatalog {
    fn query_rows(&self, cancel: &CancelToken, sql: &str) -> Result<Vec<Row>, ClientError> {
        if cancel.is_cancelled() {
            return Err(ClientError::cancelled());
        }
        self.respond(sql)
    }

    fn query_row(&self, cancel: &CancelToken, sql: &str) -> Result<Option<Row>, ClientError> {
        if cancel.is_cancelled() {
            return Err(ClientError::cancelled());
        }
        self.respond(sql).map(|rows| rows.into_iter().next())
    }

    fn execute(&self, cancel: &CancelToken, sql: &str) -> Result<(), ClientError> {
        if cancel.is_cancelled() {
            return Err(ClientError::cancelled());
        }
        let failures = self.execute_failures.borrow();
        if let Some((_, error)) = failures.iter().find(|(pattern, _)| sql.contains(pattern)) {
            return Err(error.clone());
        }
        drop(failures);
        self.executed.borrow_mut().push(sql.to_string());
        Ok(())
    }
}

// A manager owns its client, so tests hand it an `Rc` handle and keep a
// clone for assertions on the recorded statement stream. The blanket
// `CatalogClient for Rc<T>` impl lives in `admiral-client` (the orphan rule
// forbids implementing the foreign trait for `Rc` here).

// Row construction shorthand

pub fn row(values: Vec<Value>) -> Row {
    Row::new(values)
}

pub fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

pub fn null() -> Value {
    Value::Null
}

pub fn uint(n: u64) -> Value {
    Value::UInt(n)
}

pub fn int(n: i64) -> Value {
    Value::Int(n)
}

/// One-column name rows, as returned by existing-name-set queries
pub fn name_rows(names: &[&str]) -> Vec<Row> {
    names.iter().map(|name| row(vec![text(name)])).collect()
}

/// Script the roles capability probe
pub fn set_roles_supported(catalog: &FakeCatalog, supported: bool) {
    let rows = if supported {
        vec![row(vec![int(1)])]
    } else {
        Vec::new()
    };
    catalog.on_query("FROM system.tables", rows);
}
