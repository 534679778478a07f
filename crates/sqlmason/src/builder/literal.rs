//! Literal-mode building: all values inlined, no argument list.

use std::fmt::Write as _;

use tracing::debug;

use crate::builder::build::{raw_fragment, resolve};
use crate::builder::{CommandKind, Direction, QueryBuilder};
use crate::dialect::{Dialect, LimitPosition};
use crate::error::{BuildError, BuildResult};
use crate::value::{Scalar, normalize};

/// Timestamps render in this fixed ISO-8601-like form, enclosed in quotes.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Convert a normalized scalar to SQL literal text.
pub(super) fn render_literal(value: &Scalar, dialect: &Dialect) -> String {
    match value {
        Scalar::Text(s) => format!(
            "{q}{}{q}",
            dialect.escape_str(s),
            q = dialect.quote_char
        ),
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Scalar::Timestamp(t) => format!(
            "{q}{}{q}",
            t.format(TIMESTAMP_FORMAT),
            q = dialect.quote_char
        ),
        Scalar::Bytes(bytes) => {
            let mut hex = String::with_capacity(bytes.len() * 2 + 3);
            hex.push_str("X'");
            for b in bytes {
                let _ = write!(hex, "{b:02X}");
            }
            hex.push('\'');
            hex
        }
        Scalar::Decimal(d) => d.to_string(),
    }
}

impl QueryBuilder {
    /// Assemble the statement with every value inlined as a SQL literal.
    ///
    /// Follows the same resolution and emission rules as
    /// [`build`](QueryBuilder::build), with placeholders replaced by literal
    /// text. No arguments are produced and the parameter counter does not
    /// move. The filter hook is not consulted; its contract is
    /// placeholder-shaped.
    pub fn build_literal(&mut self) -> BuildResult<String> {
        self.validate()?;

        let mut sql = String::new();
        let resolved: Vec<_> = self
            .entries
            .iter()
            .map(|e| resolve(e, self.skip_absent))
            .collect();

        match self.kind {
            CommandKind::Select => {
                sql.push_str("SELECT ");
                if self.distinct {
                    sql.push_str("DISTINCT ");
                }
                if !self.result_limit.is_empty()
                    && self.dialect.limit_position == LimitPosition::Front
                {
                    sql.push_str("TOP ");
                    sql.push_str(&self.result_limit);
                    sql.push(' ');
                }
                let mut sep = "";
                for r in &resolved {
                    sql.push_str(sep);
                    sql.push_str(&r.column);
                    sep = ", ";
                }
                sql.push_str(" FROM ");
                sql.push_str(&self.source);
            }
            CommandKind::Insert => {
                sql.push_str("INSERT INTO ");
                sql.push_str(&self.source);
                sql.push_str(" (");
                let mut sep = "";
                for r in resolved.iter().filter(|r| r.rendered()) {
                    sql.push_str(sep);
                    sql.push_str(&r.column);
                    sep = ", ";
                }
                sql.push_str(") VALUES (");
                sep = "";
                for r in resolved.iter().filter(|r| r.rendered()) {
                    sql.push_str(sep);
                    sep = ", ";
                    match &r.effective {
                        None => sql.push_str("NULL"),
                        Some(value) if r.parameter => {
                            sql.push_str(&render_literal(value, &self.dialect));
                        }
                        Some(value) => match value.as_text() {
                            Some(fragment) => sql.push_str(fragment),
                            None => {
                                return Err(BuildError::RawFragmentNotText(r.column.clone()));
                            }
                        },
                    }
                }
                sql.push(')');
            }
            CommandKind::Update => {
                sql.push_str("UPDATE ");
                sql.push_str(&self.source);
                sql.push_str(" SET ");
                let mut sep = "";
                for r in resolved.iter().filter(|r| r.rendered()) {
                    sql.push_str(sep);
                    sep = ", ";
                    sql.push_str(&r.column);
                    sql.push_str(" = ");
                    match &r.effective {
                        None => sql.push_str("NULL"),
                        Some(value) if r.parameter => {
                            sql.push_str(&render_literal(value, &self.dialect));
                        }
                        Some(value) => sql.push_str(&raw_fragment(value, &r.column)?),
                    }
                }
            }
            CommandKind::Delete => {
                sql.push_str("DELETE FROM ");
                sql.push_str(&self.source);
            }
        }

        if self.kind != CommandKind::Insert {
            let mut clauses: Vec<String> = Vec::new();
            for filter in &self.filters {
                match normalize(&filter.value) {
                    Some(value) => clauses.push(format!(
                        "{} = {}",
                        filter.expression,
                        render_literal(&value, &self.dialect)
                    )),
                    None if !filter.expression_only => {
                        clauses.push(format!("{} IS NULL", filter.expression));
                    }
                    None => clauses.push(filter.expression.clone()),
                }
            }
            if !clauses.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&clauses.join(" AND "));
            }
        }

        if !self.order.is_empty() {
            sql.push_str(" ORDER BY ");
            let mut sep = "";
            for clause in &self.order {
                sql.push_str(sep);
                sql.push_str(&clause.column);
                sql.push_str(match clause.direction {
                    Direction::Asc => " ASC",
                    Direction::Desc => " DESC",
                });
                sep = ", ";
            }
        }
        if !self.group.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group.join(", "));
        }
        if !self.result_limit.is_empty() && self.dialect.limit_position == LimitPosition::Rear {
            sql.push_str(" LIMIT ");
            sql.push_str(&self.result_limit);
        }
        sql.push(';');

        let sql = self.apply_interpolation(sql);
        debug!(command = ?self.kind, "literal statement assembled");
        Ok(sql)
    }
}
