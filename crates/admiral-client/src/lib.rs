//! Client seam between the reconciler and the database driver
//!
//! This crate defines the narrow surface the reconciler needs from a
//! ClickHouse-speaking driver:
//!
//! - **Scan types**: [`Value`] and [`Row`] with strict and nullable accessors
//! - **Cancellation**: [`CancelToken`], threaded into every call
//! - **Errors**: [`ClientError`] with a typed [`ClientErrorKind`]
//! - **The trait**: [`CatalogClient`] (blocking query/execute operations)
//!
//! Concrete drivers (native protocol, HTTP) live outside this workspace and
//! implement [`CatalogClient`]; tests implement it with scripted fakes.

pub mod cancel;
pub mod client;
pub mod error;
pub mod value;

pub use cancel::CancelToken;
pub use client::CatalogClient;
pub use error::{ClientError, ClientErrorKind};
pub use value::{Row, Value};
