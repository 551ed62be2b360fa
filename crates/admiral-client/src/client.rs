//! The catalog client trait

use crate::cancel::CancelToken;
use crate::error::ClientError;
use crate::value::Row;

/// Blocking client surface against a ClickHouse-speaking backend.
///
/// Every operation takes the statement as finished SQL text (DDL cannot be
/// parameterized on this engine; callers sanitize interpolated names and
/// literals) plus a [`CancelToken`]. Implementations must honour the token:
/// once tripped, in-flight work is aborted and the call returns a
/// `Cancelled` error. Calls are synchronous and run on the caller's thread.
pub trait CatalogClient {
    /// Run a query and return every result row
    fn query_rows(&self, cancel: &CancelToken, sql: &str) -> Result<Vec<Row>, ClientError>;

    /// Run a query expected to produce at most one row
    fn query_row(&self, cancel: &CancelToken, sql: &str) -> Result<Option<Row>, ClientError>;

    /// Run a statement that produces no rows (DDL, GRANT/REVOKE)
    fn execute(&self, cancel: &CancelToken, sql: &str) -> Result<(), ClientError>;
}

impl<T: CatalogClient + ?Sized> CatalogClient for std::rc::Rc<T> {
    fn query_rows(&self, cancel: &CancelToken, sql: &str) -> Result<Vec<Row>, ClientError> {
        (**self).query_rows(cancel, sql)
    }

    fn query_row(&self, cancel: &CancelToken, sql: &str) -> Result<Option<Row>, ClientError> {
        (**self).query_row(cancel, sql)
    }

    fn execute(&self, cancel: &CancelToken, sql: &str) -> Result<(), ClientError> {
        (**self).execute(cancel, sql)
    }
}
