//! Error types for sqlmason

use thiserror::Error;

/// Result type alias for statement building.
pub type BuildResult<T> = Result<T, BuildError>;

/// Validation errors detected before any SQL text is emitted.
///
/// Building a statement is a recoverable, caller-correctable operation, so
/// every failure is reported through this enum and no build path panics. An
/// error result never pairs with partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Source (table or view) name not specified at build time.
    #[error("table or view was not specified")]
    MissingSource,

    /// No columns registered for a non-DELETE command.
    #[error("no columns were specified")]
    MissingColumns,

    /// ORDER BY registered on a non-SELECT statement.
    #[error("ORDER BY is only supported for SELECT statements")]
    OrderByNotAllowed,

    /// GROUP BY registered on a non-SELECT statement.
    #[error("GROUP BY is only supported for SELECT statements")]
    GroupByNotAllowed,

    /// A non-parameter (raw fragment) value resolved to a kind that cannot be
    /// spliced into SQL text.
    #[error("raw fragment value for column '{0}' must be textual")]
    RawFragmentNotText(String),

    /// COUNT(*) wrapping requested for a non-SELECT builder.
    #[error("COUNT wrapping requires a SELECT statement")]
    CountRequiresSelect,
}

impl BuildError {
    /// Check if this is a missing-source error.
    pub fn is_missing_source(&self) -> bool {
        matches!(self, Self::MissingSource)
    }

    /// Check if this is a missing-columns error.
    pub fn is_missing_columns(&self) -> bool {
        matches!(self, Self::MissingColumns)
    }
}
