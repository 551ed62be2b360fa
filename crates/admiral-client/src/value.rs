//! Row and value scan types
//!
//! Catalog queries come back as positional rows of loosely typed values.
//! `Row` offers two families of accessors: `get_*` for columns the catalog
//! contract declares non-nullable (a NULL or type mismatch is a decode
//! error) and `opt_*` for nullable columns (NULL scans to `None`).

use crate::error::ClientError;

/// A single column value as scanned from the driver
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
        }
    }
}

/// One result row, addressed positionally
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Build a row from scanned values
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Number of columns in the row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the row has no columns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn value(&self, idx: usize) -> Result<&Value, ClientError> {
        self.values
            .get(idx)
            .ok_or_else(|| ClientError::decode(format!("column {idx} out of range")))
    }

    fn mismatch(&self, idx: usize, want: &str) -> ClientError {
        let got = self
            .values
            .get(idx)
            .map(Value::type_name)
            .unwrap_or("missing");
        ClientError::decode(format!("column {idx}: expected {want}, got {got}"))
    }

    /// Read a non-nullable text column
    pub fn get_str(&self, idx: usize) -> Result<&str, ClientError> {
        match self.value(idx)? {
            Value::Text(s) => Ok(s),
            _ => Err(self.mismatch(idx, "text")),
        }
    }

    /// Read a nullable text column; NULL (or a missing column) scans to `None`
    pub fn opt_str(&self, idx: usize) -> Option<&str> {
        match self.values.get(idx) {
            Some(Value::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Read a non-nullable unsigned integer column
    ///
    /// Signed values coerce when non-negative; the catalog reports counters
    /// through both encodings depending on server version.
    pub fn get_u64(&self, idx: usize) -> Result<u64, ClientError> {
        match self.value(idx)? {
            Value::UInt(n) => Ok(*n),
            Value::Int(n) if *n >= 0 => Ok(*n as u64),
            _ => Err(self.mismatch(idx, "uint")),
        }
    }

    /// Read a nullable unsigned integer column
    pub fn opt_u64(&self, idx: usize) -> Option<u64> {
        match self.values.get(idx) {
            Some(Value::UInt(n)) => Some(*n),
            Some(Value::Int(n)) if *n >= 0 => Some(*n as u64),
            _ => None,
        }
    }

    /// Read a nullable signed integer column
    pub fn opt_i64(&self, idx: usize) -> Option<i64> {
        match self.values.get(idx) {
            Some(Value::Int(n)) => Some(*n),
            Some(Value::UInt(n)) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Read a nullable float column; integer values widen
    pub fn opt_f64(&self, idx: usize) -> Option<f64> {
        match self.values.get(idx) {
            Some(Value::Float(f)) => Some(*f),
            Some(Value::Int(n)) => Some(*n as f64),
            Some(Value::UInt(n)) => Some(*n as f64),
            _ => None,
        }
    }

    /// Read a nullable boolean column; integer 0/1 coerces
    pub fn opt_bool(&self, idx: usize) -> Option<bool> {
        match self.values.get(idx) {
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::Int(n)) => Some(*n != 0),
            Some(Value::UInt(n)) => Some(*n != 0),
            _ => None,
        }
    }
}
