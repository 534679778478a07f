//! Statement builder.
//!
//! [`QueryBuilder`] accumulates a statement specification (source, command
//! kind, columns and values, filters, ordering, grouping, a result limit)
//! through chained calls, then assembles it into SQL text plus an ordered
//! argument list ([`QueryBuilder::build`]) or a fully literal string
//! ([`QueryBuilder::build_literal`]).
//!
//! ```
//! use sqlmason::{insert, Dialect};
//!
//! let (sql, args) = insert("users")
//!     .dialect(Dialect::postgres())
//!     .value("UserName", "john.doe")
//!     .value("IsActive", true)
//!     .build()?;
//!
//! assert_eq!(sql, "INSERT INTO users (UserName, IsActive) VALUES ($1, $2);");
//! assert_eq!(args.len(), 2);
//! # Ok::<(), sqlmason::BuildError>(())
//! ```

mod build;
mod literal;
#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::value::{Scalar, Value};

/// The kind of statement a builder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandKind {
    /// SELECT statement.
    Select,
    /// INSERT statement.
    Insert,
    /// UPDATE statement.
    Update,
    /// DELETE statement.
    Delete,
}

/// Sort direction for ORDER BY clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// External filter-contribution hook.
///
/// Invoked at most once per build with the current parameter offset, the
/// dialect's placeholder token, and the sequential-numbering flag. Returns
/// extra predicate fragments (joined with `AND` after the built-in filters)
/// and their argument values, appended after all built-in arguments.
pub type FilterHook = Arc<dyn Fn(usize, &str, bool) -> (Vec<String>, Vec<Scalar>) + Send + Sync>;

/// A registered column. The length is advisory metadata, not enforced.
#[derive(Debug, Clone)]
struct Column {
    name: String,
    #[allow(dead_code)]
    length: usize,
}

/// Per-column value plus its rendering policy.
#[derive(Debug, Clone)]
struct ValueEntry {
    column: String,
    value: Value,
    default: Value,
    match_to_null: Value,
    /// True renders a placeholder (or quoted literal); false splices the
    /// value into the SQL verbatim as a raw fragment.
    parameter: bool,
}

/// A WHERE predicate.
#[derive(Debug, Clone)]
struct Filter {
    expression: String,
    value: Value,
    /// The expression is emitted verbatim; no `= value` and no NULL check.
    expression_only: bool,
}

#[derive(Debug, Clone)]
struct OrderClause {
    column: String,
    direction: Direction,
}

/// Rendering options for a column value.
///
/// The default is a quoted-parameter value with no default substitution and
/// no match-to-null sentinel.
#[derive(Debug, Clone)]
pub struct ValueOptions {
    /// Render as a placeholder/quoted literal (true) or raw fragment (false).
    pub parameter: bool,
    /// Substituted when the value normalizes to absent.
    pub default: Value,
    /// When equal to the effective value, forces the column to NULL.
    pub match_to_null: Value,
}

impl Default for ValueOptions {
    fn default() -> Self {
        Self {
            parameter: true,
            default: Value::Null,
            match_to_null: Value::Null,
        }
    }
}

impl ValueOptions {
    /// Options with defaults: parameterized, no default, no sentinel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the value as a raw SQL fragment.
    pub fn raw(mut self) -> Self {
        self.parameter = false;
        self
    }

    /// Substitute `default` when the value is absent.
    pub fn default_to(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    /// Force the column to NULL when the effective value equals `sentinel`.
    pub fn match_to_null(mut self, sentinel: impl Into<Value>) -> Self {
        self.match_to_null = sentinel.into();
        self
    }
}

/// Builder for a single SQL statement.
///
/// Not thread-safe: a builder is a mutable value intended for single-threaded
/// use. `build` does not rewrite stored values, but for numbered dialects it
/// advances the parameter offset so a follow-up statement can continue
/// placeholder numbering.
#[derive(Clone)]
pub struct QueryBuilder {
    source: String,
    kind: CommandKind,
    distinct: bool,
    columns: Vec<Column>,
    entries: Vec<ValueEntry>,
    filters: Vec<Filter>,
    order: Vec<OrderClause>,
    group: Vec<String>,
    result_limit: String,
    dialect: Dialect,
    skip_absent: bool,
    interpolate: bool,
    schema: String,
    reference_mode: bool,
    reference_prefix: String,
    insert_returning: Option<(String, bool)>,
    parameter_offset: usize,
    filter_hook: Option<FilterHook>,
}

impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("source", &self.source)
            .field("kind", &self.kind)
            .field("distinct", &self.distinct)
            .field("columns", &self.columns)
            .field("entries", &self.entries)
            .field("filters", &self.filters)
            .field("order", &self.order)
            .field("group", &self.group)
            .field("result_limit", &self.result_limit)
            .field("dialect", &self.dialect)
            .field("skip_absent", &self.skip_absent)
            .field("interpolate", &self.interpolate)
            .field("schema", &self.schema)
            .field("reference_mode", &self.reference_mode)
            .field("reference_prefix", &self.reference_prefix)
            .field("parameter_offset", &self.parameter_offset)
            .field("filter_hook", &self.filter_hook.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Create a SELECT builder for the given source (table, view, or joined
/// query name).
pub fn select(source: &str) -> QueryBuilder {
    QueryBuilder::new(source, CommandKind::Select)
}

/// Create an INSERT builder for the given table.
pub fn insert(table: &str) -> QueryBuilder {
    QueryBuilder::new(table, CommandKind::Insert)
}

/// Create an UPDATE builder for the given table.
pub fn update(table: &str) -> QueryBuilder {
    QueryBuilder::new(table, CommandKind::Update)
}

/// Create a DELETE builder for the given table.
pub fn delete(table: &str) -> QueryBuilder {
    QueryBuilder::new(table, CommandKind::Delete)
}

impl QueryBuilder {
    /// Create a builder with default policies: skip-absent on, interpolation
    /// on, generic `?` dialect.
    pub fn new(source: &str, kind: CommandKind) -> Self {
        Self {
            source: source.to_string(),
            kind,
            distinct: false,
            columns: Vec::new(),
            entries: Vec::new(),
            filters: Vec::new(),
            order: Vec::new(),
            group: Vec::new(),
            result_limit: String::new(),
            dialect: Dialect::default(),
            skip_absent: true,
            interpolate: true,
            schema: String::new(),
            reference_mode: false,
            reference_prefix: "ref".to_string(),
            insert_returning: None,
            parameter_offset: 0,
            filter_hook: None,
        }
    }

    /// Create a fresh builder carrying over this builder's engine settings
    /// (dialect, policies, schema/reference configuration) with empty
    /// columns, values, filters, ordering, grouping, limit, and a zero
    /// parameter offset.
    pub fn spawn(&self, source: &str, kind: CommandKind) -> Self {
        let mut spawned = Self::new(source, kind);
        spawned.dialect = self.dialect.clone();
        spawned.skip_absent = self.skip_absent;
        spawned.interpolate = self.interpolate;
        spawned.schema = self.schema.clone();
        spawned.reference_mode = self.reference_mode;
        spawned.reference_prefix = self.reference_prefix.clone();
        spawned
    }

    // ==================== Columns and values ====================

    /// Register a column with the default advisory length.
    ///
    /// Ignored for DELETE builders, where columns are meaningless.
    pub fn column(self, name: &str) -> Self {
        self.add_entry(name, 255, Value::Null, ValueOptions::new())
    }

    /// Register a column with an explicit advisory length.
    pub fn column_with_len(self, name: &str, length: usize) -> Self {
        self.add_entry(name, length, Value::Null, ValueOptions::new())
    }

    /// Register a column and its parameterized value.
    ///
    /// Re-adding a column name (case-insensitive) overwrites the stored value
    /// rather than duplicating the column.
    pub fn value(self, name: &str, value: impl Into<Value>) -> Self {
        self.add_entry(name, 8000, value.into(), ValueOptions::new())
    }

    /// Register a column whose value is a raw SQL fragment (e.g. a function
    /// call), spliced into the statement verbatim.
    pub fn value_raw(self, name: &str, value: impl Into<Value>) -> Self {
        self.add_entry(name, 8000, value.into(), ValueOptions::new().raw())
    }

    /// Register a parameterized value with a default used when the value is
    /// absent.
    pub fn value_or(self, name: &str, value: impl Into<Value>, default: impl Into<Value>) -> Self {
        self.add_entry(
            name,
            8000,
            value.into(),
            ValueOptions::new().default_to(default),
        )
    }

    /// Register a parameterized value with a match-to-null sentinel: when the
    /// effective value equals `sentinel`, the column renders as NULL.
    pub fn value_match_null(
        self,
        name: &str,
        value: impl Into<Value>,
        sentinel: impl Into<Value>,
    ) -> Self {
        self.add_entry(
            name,
            8000,
            value.into(),
            ValueOptions::new().match_to_null(sentinel),
        )
    }

    /// Register a value with full rendering options.
    pub fn value_with(self, name: &str, value: impl Into<Value>, options: ValueOptions) -> Self {
        self.add_entry(name, 8000, value.into(), options)
    }

    /// Update the value of an already-registered column (case-insensitive
    /// lookup), resetting its options to parameterized defaults. A no-op when
    /// the column was never added.
    pub fn set_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        if self.kind == CommandKind::Delete {
            return self;
        }
        let value = value.into();
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.column.eq_ignore_ascii_case(name))
        {
            entry.value = value;
            entry.parameter = true;
            entry.default = Value::Null;
            entry.match_to_null = Value::Null;
        }
        self
    }

    fn add_entry(mut self, name: &str, length: usize, value: Value, options: ValueOptions) -> Self {
        if self.kind == CommandKind::Delete {
            return self;
        }
        let index = self.intern_column(name, length);
        let column = self.columns[index].name.clone();
        match self
            .entries
            .iter_mut()
            .find(|e| e.column.eq_ignore_ascii_case(&column))
        {
            Some(entry) => {
                entry.value = value;
                entry.parameter = options.parameter;
                entry.default = options.default;
                entry.match_to_null = options.match_to_null;
            }
            None => self.entries.push(ValueEntry {
                column,
                value,
                default: options.default,
                match_to_null: options.match_to_null,
                parameter: options.parameter,
            }),
        }
        self
    }

    /// Case-insensitive column lookup; appends on first reference.
    fn intern_column(&mut self, name: &str, length: usize) -> usize {
        if let Some(index) = self
            .columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
        {
            return index;
        }
        self.columns.push(Column {
            name: name.to_string(),
            length,
        });
        self.columns.len() - 1
    }

    // ==================== Filters ====================

    /// Add a `column = value` filter. An absent value renders as
    /// `column IS NULL`.
    pub fn filter(mut self, expression: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            expression: expression.to_string(),
            value: value.into(),
            expression_only: false,
        });
        self
    }

    /// Add an opaque filter expression, emitted verbatim with no value and
    /// no NULL check.
    pub fn filter_expr(mut self, expression: &str) -> Self {
        self.filters.push(Filter {
            expression: expression.to_string(),
            value: Value::Null,
            expression_only: true,
        });
        self
    }

    /// Set the external filter-contribution hook.
    pub fn filter_hook(
        mut self,
        hook: impl Fn(usize, &str, bool) -> (Vec<String>, Vec<Scalar>) + Send + Sync + 'static,
    ) -> Self {
        self.filter_hook = Some(Arc::new(hook));
        self
    }

    // ==================== Ordering and grouping ====================

    /// Add an ORDER BY column. Valid only for SELECT; `build` rejects
    /// ordering on other command kinds.
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order.push(OrderClause {
            column: column.to_string(),
            direction,
        });
        self
    }

    /// Add a GROUP BY column or expression. Order-preserving, no dedup.
    pub fn group_by(mut self, column: &str) -> Self {
        self.group.push(column.to_string());
        self
    }

    // ==================== Configuration ====================

    /// Set the engine dialect.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Emit `SELECT DISTINCT`.
    pub fn distinct(mut self, yes: bool) -> Self {
        self.distinct = yes;
        self
    }

    /// Skip absent-valued columns in INSERT/UPDATE instead of writing NULL.
    /// On by default.
    pub fn skip_absent(mut self, skip: bool) -> Self {
        self.skip_absent = skip;
        self
    }

    /// Set the result-limit directive value (rendered as `TOP n` or
    /// `LIMIT n` depending on the dialect's limit position).
    pub fn result_limit(mut self, limit: impl Into<String>) -> Self {
        self.result_limit = limit.into();
        self
    }

    /// Toggle `{Token}` table-name interpolation. On by default.
    pub fn interpolate(mut self, yes: bool) -> Self {
        self.interpolate = yes;
        self
    }

    /// Set the schema used to qualify interpolated table names. An explicit
    /// schema takes precedence over the reference-mode prefix.
    pub fn schema(mut self, schema: &str) -> Self {
        self.schema = schema.to_string();
        self
    }

    /// Qualify interpolated table names with the reference prefix instead of
    /// a schema. Ignored when interpolation is off.
    pub fn reference_mode(mut self, yes: bool) -> Self {
        self.reference_mode = yes;
        self
    }

    /// Change the reference-mode prefix. An empty prefix is ignored.
    pub fn reference_prefix(mut self, prefix: &str) -> Self {
        if !prefix.is_empty() {
            self.reference_prefix = prefix.to_string();
        }
        self
    }

    /// Append a returning fragment to INSERT statements. `inline` places the
    /// fragment before the terminating `;` (e.g. `RETURNING id`); otherwise
    /// it is appended after the `;` as a follow-up statement.
    pub fn insert_returning(mut self, sql: &str, inline: bool) -> Self {
        self.insert_returning = if sql.is_empty() {
            None
        } else {
            Some((sql.to_string(), inline))
        };
        self
    }

    /// Seed the parameter counter, for continuing placeholder numbering from
    /// a previous statement.
    pub fn parameter_offset(mut self, offset: usize) -> Self {
        self.parameter_offset = offset;
        self
    }

    /// The current parameter counter. Each `build` advances it by one per
    /// placeholder when the dialect uses sequential numbering; anonymous
    /// placeholders do not move it.
    pub fn current_offset(&self) -> usize {
        self.parameter_offset
    }
}
