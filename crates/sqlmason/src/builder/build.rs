//! The statement assembler.
//!
//! Walks the registered values, filters, ordering and grouping in a fixed
//! per-command sequence, emitting SQL text and collecting arguments next to
//! each placeholder so the two can never drift out of order.

use tracing::debug;

use crate::builder::{CommandKind, Direction, QueryBuilder, ValueEntry};
use crate::dialect::LimitPosition;
use crate::error::{BuildError, BuildResult};
use crate::interpolate::{interpolate_tables, rewrite_tokens};
use crate::value::{Scalar, normalize};

/// A value entry after per-build resolution.
pub(super) struct Resolved {
    pub(super) column: String,
    /// The effective value: input, or default when the input was absent,
    /// or `None` after a match-to-null hit.
    pub(super) effective: Option<Scalar>,
    pub(super) parameter: bool,
    /// Set when the match-to-null sentinel matched; the column renders as an
    /// explicit NULL and is never skipped.
    pub(super) force_null: bool,
    pub(super) skip: bool,
}

impl Resolved {
    /// Whether INSERT/UPDATE render this column at all.
    pub(super) fn rendered(&self) -> bool {
        !self.skip || self.force_null
    }
}

/// Resolve one entry: normalize, substitute the default, apply the
/// match-to-null sentinel, then compute the skip flag. The order matters and
/// is fixed.
pub(super) fn resolve(entry: &ValueEntry, skip_absent: bool) -> Resolved {
    let mut effective = normalize(&entry.value);
    if effective.is_none()
        && let Some(default) = normalize(&entry.default)
    {
        effective = Some(default);
    }

    let mut parameter = entry.parameter;
    let mut force_null = false;
    if let (Some(eff), Some(sentinel)) = (&effective, normalize(&entry.match_to_null))
        && *eff == sentinel
    {
        effective = None;
        force_null = true;
        // A forced-null column always renders parameter-shaped, never as a
        // raw fragment.
        parameter = true;
    }

    let skip = skip_absent && effective.is_none();
    Resolved {
        column: entry.column.clone(),
        effective,
        parameter,
        force_null,
        skip,
    }
}

impl QueryBuilder {
    pub(super) fn validate(&self) -> BuildResult<()> {
        if self.source.is_empty() {
            return Err(BuildError::MissingSource);
        }
        if self.columns.is_empty() && self.kind != CommandKind::Delete {
            return Err(BuildError::MissingColumns);
        }
        if self.kind != CommandKind::Select {
            if !self.order.is_empty() {
                return Err(BuildError::OrderByNotAllowed);
            }
            if !self.group.is_empty() {
                return Err(BuildError::GroupByNotAllowed);
            }
        }
        Ok(())
    }

    /// Assemble the statement, returning the SQL text and the argument list.
    ///
    /// Placeholders appear in the text in exactly the order of the returned
    /// arguments: parameterized column values first (INSERT/UPDATE), then
    /// filter values (SELECT/UPDATE/DELETE), then any hook contributions.
    /// The parameter counter is seeded from the builder's offset and the
    /// final value is written back, so a subsequent build continues
    /// numbering. It only advances when the dialect numbers its placeholders;
    /// anonymous-placeholder dialects leave it untouched. Stored values are
    /// not modified.
    pub fn build(&mut self) -> BuildResult<(String, Vec<Scalar>)> {
        self.validate()?;

        let mut counter = self.parameter_offset;
        let mut args: Vec<Scalar> = Vec::new();
        let mut sql = String::new();

        let resolved: Vec<Resolved> = self
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
                // SELECT never skips: every entry renders as a bare column name.
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
                            if self.dialect.numbered {
                                counter += 1;
                            }
                            sql.push_str(&self.dialect.placeholder(counter));
                            args.push(value.clone());
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
                            if self.dialect.numbered {
                                counter += 1;
                            }
                            sql.push_str(&self.dialect.placeholder(counter));
                            args.push(value.clone());
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

        // WHERE clause: built-in filters, then hook contributions. INSERT
        // never takes filters.
        if self.kind != CommandKind::Insert {
            let mut clauses: Vec<String> = Vec::new();
            for filter in &self.filters {
                match normalize(&filter.value) {
                    Some(value) => {
                        if self.dialect.numbered {
                            counter += 1;
                        }
                        clauses.push(format!(
                            "{} = {}",
                            filter.expression,
                            self.dialect.placeholder(counter)
                        ));
                        args.push(value);
                    }
                    None if !filter.expression_only => {
                        clauses.push(format!("{} IS NULL", filter.expression));
                    }
                    None => clauses.push(filter.expression.clone()),
                }
            }
            if let Some(hook) = &self.filter_hook {
                let (fragments, hook_args) =
                    hook(counter, &self.dialect.parameter_token, self.dialect.numbered);
                clauses.extend(fragments);
                if self.dialect.numbered {
                    counter += hook_args.len();
                }
                args.extend(hook_args);
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

        if self.kind == CommandKind::Insert
            && let Some((returning, inline)) = &self.insert_returning
            && *inline
        {
            sql.push(' ');
            sql.push_str(returning);
        }
        sql.push(';');
        if self.kind == CommandKind::Insert
            && let Some((returning, inline)) = &self.insert_returning
            && !*inline
        {
            sql.push(' ');
            sql.push_str(returning);
        }

        let sql = self.apply_interpolation(sql);

        debug!(
            command = ?self.kind,
            placeholders = args.len(),
            "statement assembled"
        );
        self.parameter_offset = counter;
        Ok((sql, args))
    }

    /// Wrap the built SELECT as `SELECT COUNT(*) FROM (<inner>) AS <alias>;`,
    /// reusing the same arguments. Errors for non-SELECT builders.
    pub fn build_count(&mut self, alias: &str) -> BuildResult<(String, Vec<Scalar>)> {
        if self.kind != CommandKind::Select {
            return Err(BuildError::CountRequiresSelect);
        }
        let (sql, args) = self.build()?;
        let inner = sql.trim_end().trim_end_matches(';').trim_end();
        Ok((format!("SELECT COUNT(*) FROM ({inner}) AS {alias};"), args))
    }

    /// Qualifier precedence: explicit schema, then reference prefix, then
    /// none. A schema is dot-joined; the reference prefix attaches to the
    /// name itself (`ref_users`).
    pub(super) fn apply_interpolation(&self, sql: String) -> String {
        if !self.interpolate {
            return sql;
        }
        if !self.schema.is_empty() {
            return interpolate_tables(&sql, &self.schema);
        }
        if self.reference_mode {
            let mut prefix = self.reference_prefix.clone();
            if !prefix.ends_with('_') {
                prefix.push('_');
            }
            return rewrite_tokens(&sql, &prefix);
        }
        interpolate_tables(&sql, "")
    }
}

/// Render a raw (non-parameter) UPDATE fragment. Text is spliced as-is;
/// integers, floats and booleans take their plain SQL forms; any other kind
/// is rejected.
pub(super) fn raw_fragment(value: &Scalar, column: &str) -> BuildResult<String> {
    match value {
        Scalar::Text(s) => Ok(s.clone()),
        Scalar::Int(n) => Ok(n.to_string()),
        Scalar::Float(f) => Ok(f.to_string()),
        Scalar::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
        _ => Err(BuildError::RawFragmentNotText(column.to_string())),
    }
}
