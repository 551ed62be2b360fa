//! Identifier quoting and literal escaping
//!
//! Generated DDL cannot be parameterized on this engine, so every
//! interpolated name and string literal must pass through these functions.
//! They are the system's only injection defence.

/// Quote an identifier with backticks, doubling embedded backticks
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a list of identifiers
pub fn quote_identifier_list(names: &[String]) -> Vec<String> {
    names.iter().map(|name| quote_identifier(name)).collect()
}

/// Escape a string literal by doubling embedded single quotes
pub fn escape_string(s: &str) -> String {
    s.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("test"), "`test`");
        assert_eq!(quote_identifier("a`b"), "`a``b`");
        assert_eq!(quote_identifier(""), "``");
    }

    #[test]
    fn test_quote_identifier_list() {
        let names = vec!["test".to_string(), "table".to_string()];
        assert_eq!(
            quote_identifier_list(&names),
            vec!["`test`".to_string(), "`table`".to_string()]
        );
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("test"), "test");
        assert_eq!(escape_string("O'Reilly"), "O''Reilly");
        assert_eq!(escape_string("''"), "''''");
    }
}
