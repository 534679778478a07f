//! Database engine dialect descriptors.
//!
//! A [`Dialect`] carries the handful of per-engine constants the assembler
//! needs: string quoting/escaping, the parameter placeholder token, whether
//! placeholders carry a sequence number, and where the result-limit directive
//! sits in a query. The builder treats it as opaque read-only configuration;
//! it derives serde so embedding applications can source it from their own
//! config files.

use serde::{Deserialize, Serialize};

/// Position of the row-limiting directive in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitPosition {
    /// Embedded right after SELECT/DISTINCT, e.g. `SELECT TOP 10 ...`.
    Front,
    /// Appended at the end of the statement, e.g. `... LIMIT 10`.
    Rear,
}

/// Engine-specific constants used during statement assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialect {
    /// Character that encloses a string literal.
    pub quote_char: char,
    /// Character that escapes the enclosing quote inside a string literal.
    pub escape_char: char,
    /// Reserved-word escape characters. One character is used for both
    /// opening and closing; two characters are split into an opening and a
    /// closing character (e.g. `[]` for SQL Server).
    pub reserved_word_escape: String,
    /// Parameter placeholder token for prepared statements.
    pub parameter_token: String,
    /// Whether placeholders are emitted as a numbered sequence
    /// (e.g. `$1, $2` or `@p1, @p2`).
    pub numbered: bool,
    /// Where the result-limit directive is rendered.
    pub limit_position: LimitPosition,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            quote_char: '\'',
            escape_char: '\\',
            reserved_word_escape: "\"".to_string(),
            parameter_token: "?".to_string(),
            numbered: false,
            limit_position: LimitPosition::Rear,
        }
    }
}

impl Dialect {
    /// PostgreSQL: `$1, $2, ...` placeholders, rear `LIMIT`.
    pub fn postgres() -> Self {
        Self {
            quote_char: '\'',
            escape_char: '\'',
            reserved_word_escape: "\"".to_string(),
            parameter_token: "$".to_string(),
            numbered: true,
            limit_position: LimitPosition::Rear,
        }
    }

    /// MySQL / MariaDB: anonymous `?` placeholders, rear `LIMIT`.
    pub fn mysql() -> Self {
        Self {
            quote_char: '\'',
            escape_char: '\\',
            reserved_word_escape: "`".to_string(),
            parameter_token: "?".to_string(),
            numbered: false,
            limit_position: LimitPosition::Rear,
        }
    }

    /// SQL Server: `@p1, @p2, ...` placeholders, front `TOP n`.
    pub fn mssql() -> Self {
        Self {
            quote_char: '\'',
            escape_char: '\'',
            reserved_word_escape: "[]".to_string(),
            parameter_token: "@p".to_string(),
            numbered: true,
            limit_position: LimitPosition::Front,
        }
    }

    /// SQLite: anonymous `?` placeholders, rear `LIMIT`.
    pub fn sqlite() -> Self {
        Self {
            quote_char: '\'',
            escape_char: '\'',
            reserved_word_escape: "\"".to_string(),
            parameter_token: "?".to_string(),
            numbered: false,
            limit_position: LimitPosition::Rear,
        }
    }

    /// Render the placeholder for the given 1-based parameter index.
    ///
    /// Non-numbered dialects ignore the index and emit the bare token.
    pub fn placeholder(&self, index: usize) -> String {
        if self.numbered {
            format!("{}{}", self.parameter_token, index)
        } else {
            self.parameter_token.clone()
        }
    }

    /// Escape a string value for inclusion inside quoted literal text.
    pub fn escape_str(&self, value: &str) -> String {
        if value.is_empty() {
            return String::new();
        }
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            if c == self.quote_char {
                escaped.push(self.escape_char);
            }
            escaped.push(c);
        }
        escaped
    }

    /// Opening and closing reserved-word escape characters.
    ///
    /// A single configured character serves as both; an empty configuration
    /// falls back to double quotes.
    pub fn reserved_pair(&self) -> (String, String) {
        let mut chars = self.reserved_word_escape.chars();
        match (chars.next(), chars.next()) {
            (Some(open), Some(close)) => (open.to_string(), close.to_string()),
            (Some(only), None) => (only.to_string(), only.to_string()),
            (None, _) => ("\"".to_string(), "\"".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_placeholder_carries_index() {
        assert_eq!(Dialect::postgres().placeholder(3), "$3");
        assert_eq!(Dialect::mssql().placeholder(1), "@p1");
    }

    #[test]
    fn anonymous_placeholder_ignores_index() {
        assert_eq!(Dialect::mysql().placeholder(7), "?");
    }

    #[test]
    fn escape_doubles_the_enclosing_quote() {
        let pg = Dialect::postgres();
        assert_eq!(pg.escape_str("it's"), "it''s");

        let my = Dialect::mysql();
        assert_eq!(my.escape_str("it's"), "it\\'s");
    }

    #[test]
    fn reserved_pair_splits_two_characters() {
        assert_eq!(
            Dialect::mssql().reserved_pair(),
            ("[".to_string(), "]".to_string())
        );
        assert_eq!(
            Dialect::mysql().reserved_pair(),
            ("`".to_string(), "`".to_string())
        );
    }

    #[test]
    fn reserved_pair_defaults_to_double_quotes() {
        let d = Dialect {
            reserved_word_escape: String::new(),
            ..Dialect::default()
        };
        assert_eq!(d.reserved_pair(), ("\"".to_string(), "\"".to_string()));
    }
}
