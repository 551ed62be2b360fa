//! Name validation rules
//!
//! Entity names reach generated statements as identifiers. Quoting makes any
//! name safe to interpolate, but the mutation API still rejects names that
//! could only be the product of confusion or an injection attempt.

use thiserror::Error;

/// Characters never accepted in an entity name
const FORBIDDEN: &[char] = &['`', ' ', ';', '\'', '"', '\t', '\n', '\r'];

/// Why a name was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name cannot be empty")]
    Empty,

    #[error("name contains invalid characters")]
    InvalidCharacters,
}

/// Check that a name is acceptable as an entity identifier
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.contains(FORBIDDEN) {
        return Err(NameError::InvalidCharacters);
    }
    Ok(())
}
