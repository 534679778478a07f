use crate::builder::{CommandKind, Direction, ValueOptions, delete, insert, select, update};
use crate::dialect::Dialect;
use crate::error::BuildError;
use crate::value::{Scalar, Value};

#[test]
fn column_names_dedup_case_insensitive() {
    let (sql, args) = insert("users")
        .dialect(Dialect::postgres())
        .value("UserName", "first")
        .value("username", "second")
        .build()
        .unwrap();

    assert_eq!(sql, "INSERT INTO users (UserName) VALUES ($1);");
    assert_eq!(args, vec![Scalar::Text("second".into())]);
}

#[test]
fn set_value_updates_only_existing_columns() {
    let (sql, args) = update("users")
        .dialect(Dialect::postgres())
        .value("Alias", "old")
        .set_value("alias", "new")
        .set_value("Missing", "ignored")
        .build()
        .unwrap();

    assert_eq!(sql, "UPDATE users SET Alias = $1;");
    assert_eq!(args, vec![Scalar::Text("new".into())]);
}

#[test]
fn delete_ignores_column_and_value_calls() {
    let (sql, args) = delete("users")
        .dialect(Dialect::postgres())
        .value("UserKey", 5)
        .column("Alias")
        .filter("Id", 123)
        .build()
        .unwrap();

    assert_eq!(sql, "DELETE FROM users WHERE Id = $1;");
    assert_eq!(args, vec![Scalar::Int(123)]);
}

#[test]
fn missing_source_is_rejected() {
    let err = select("").column("a").build().unwrap_err();
    assert_eq!(err, BuildError::MissingSource);
    assert!(err.is_missing_source());
}

#[test]
fn missing_columns_rejected_for_non_delete() {
    assert_eq!(
        select("users").build().unwrap_err(),
        BuildError::MissingColumns
    );
    assert_eq!(
        insert("users").build().unwrap_err(),
        BuildError::MissingColumns
    );
    // DELETE needs no columns.
    assert!(delete("users").build().is_ok());
}

#[test]
fn order_and_group_rejected_outside_select() {
    let err = update("users")
        .value("a", 1)
        .order_by("a", Direction::Asc)
        .build()
        .unwrap_err();
    assert_eq!(err, BuildError::OrderByNotAllowed);

    let err = delete("users").group_by("a").build().unwrap_err();
    assert_eq!(err, BuildError::GroupByNotAllowed);
}

#[test]
fn default_substitutes_for_absent_value() {
    let (sql, args) = insert("users")
        .dialect(Dialect::postgres())
        .value_or("Status", Value::Null, "active")
        .build()
        .unwrap();

    assert_eq!(sql, "INSERT INTO users (Status) VALUES ($1);");
    assert_eq!(args, vec![Scalar::Text("active".into())]);
}

#[test]
fn match_to_null_forces_explicit_null() {
    // Skip-absent is on, but a matched column still renders as NULL.
    let (sql, args) = insert("users")
        .dialect(Dialect::postgres())
        .value("UserName", "john.doe")
        .value_match_null("TraderAddrClassKey", 0, 0)
        .build()
        .unwrap();

    assert_eq!(
        sql,
        "INSERT INTO users (UserName, TraderAddrClassKey) VALUES ($1, NULL);"
    );
    assert_eq!(args, vec![Scalar::Text("john.doe".into())]);
}

#[test]
fn match_to_null_applies_after_default() {
    // Default fills the absent value, then the sentinel matches it.
    let (sql, args) = update("users")
        .dialect(Dialect::postgres())
        .value("Keep", 1)
        .value_with(
            "Zeroed",
            Value::Null,
            ValueOptions::new().default_to(0).match_to_null(0),
        )
        .build()
        .unwrap();

    assert_eq!(sql, "UPDATE users SET Keep = $1, Zeroed = NULL;");
    assert_eq!(args, vec![Scalar::Int(1)]);
}

#[test]
fn skip_absent_omits_columns_entirely() {
    let (sql, args) = insert("users")
        .dialect(Dialect::postgres())
        .value("Gender", Value::Null)
        .value("Active", false)
        .build()
        .unwrap();

    assert_eq!(sql, "INSERT INTO users (Active) VALUES ($1);");
    assert_eq!(args, vec![Scalar::Bool(false)]);
}

#[test]
fn skip_absent_off_writes_null() {
    let (sql, args) = insert("users")
        .dialect(Dialect::postgres())
        .skip_absent(false)
        .value("Gender", Value::Null)
        .value("Active", false)
        .build()
        .unwrap();

    assert_eq!(sql, "INSERT INTO users (Gender, Active) VALUES (NULL, $1);");
    assert_eq!(args, vec![Scalar::Bool(false)]);
}

#[test]
fn raw_fragment_splices_verbatim() {
    let (sql, args) = insert("users")
        .dialect(Dialect::postgres())
        .value("UserName", "john.doe")
        .value_raw("Birthdate", "GETDATE()")
        .build()
        .unwrap();

    assert_eq!(
        sql,
        "INSERT INTO users (UserName, Birthdate) VALUES ($1, GETDATE());"
    );
    assert_eq!(args, vec![Scalar::Text("john.doe".into())]);
}

#[test]
fn update_raw_fragment_formats_plain_kinds() {
    let (sql, args) = update("users")
        .dialect(Dialect::postgres())
        .value_raw("Touched", "NOW()")
        .value_raw("Tries", 3)
        .value_raw("Active", true)
        .build()
        .unwrap();

    assert_eq!(sql, "UPDATE users SET Touched = NOW(), Tries = 3, Active = 1;");
    assert!(args.is_empty());
}

#[test]
fn insert_raw_fragment_must_be_textual() {
    let err = insert("users")
        .value("a", 1)
        .value_raw("b", 2)
        .build()
        .unwrap_err();
    assert_eq!(err, BuildError::RawFragmentNotText("b".into()));
}

#[test]
fn update_raw_fragment_rejects_non_plain_kinds() {
    let err = update("users")
        .value_raw("b", vec![1u8, 2])
        .build()
        .unwrap_err();
    assert_eq!(err, BuildError::RawFragmentNotText("b".into()));
}

#[test]
fn parameter_numbering_resumes_across_builds() {
    let mut qb = update("users")
        .dialect(Dialect::postgres())
        .value("Alias", "a")
        .filter("Id", 1);

    let (first, _) = qb.build().unwrap();
    assert_eq!(first, "UPDATE users SET Alias = $1 WHERE Id = $2;");
    assert_eq!(qb.current_offset(), 2);

    let (second, _) = qb.build().unwrap();
    assert_eq!(second, "UPDATE users SET Alias = $3 WHERE Id = $4;");
    assert_eq!(qb.current_offset(), 4);
}

#[test]
fn parameter_offset_seeds_the_counter() {
    let (sql, _) = select("users")
        .dialect(Dialect::mssql())
        .parameter_offset(5)
        .column("Id")
        .filter("Name", "x")
        .build()
        .unwrap();

    assert_eq!(sql, "SELECT Id FROM users WHERE Name = @p6;");
}

#[test]
fn anonymous_placeholders_leave_the_counter_alone() {
    let mut qb = delete("users").filter("a", 1).filter("b", 2);
    let (sql, args) = qb.build().unwrap();

    assert_eq!(sql, "DELETE FROM users WHERE a = ? AND b = ?;");
    assert_eq!(args.len(), 2);
    assert_eq!(qb.current_offset(), 0);

    // A second build still starts from zero.
    qb.build().unwrap();
    assert_eq!(qb.current_offset(), 0);
}

#[test]
fn spawn_carries_settings_and_resets_state() {
    let mut parent = select("{users}")
        .dialect(Dialect::mssql())
        .schema("app")
        .skip_absent(false)
        .column("Id")
        .filter("Name", "x");
    parent.build().unwrap();

    let (sql, args) = parent
        .spawn("{accounts}", CommandKind::Delete)
        .filter("Id", 7)
        .build()
        .unwrap();

    // Fresh offset, fresh filters, same dialect and schema.
    assert_eq!(sql, "DELETE FROM app.accounts WHERE Id = @p1;");
    assert_eq!(args, vec![Scalar::Int(7)]);
}

#[test]
fn insert_returning_inline_precedes_terminator() {
    let (sql, _) = insert("users")
        .dialect(Dialect::postgres())
        .value("UserName", "a")
        .insert_returning("RETURNING UserKey", true)
        .build()
        .unwrap();

    assert_eq!(
        sql,
        "INSERT INTO users (UserName) VALUES ($1) RETURNING UserKey;"
    );
}

#[test]
fn insert_returning_detached_follows_terminator() {
    let (sql, _) = insert("users")
        .value("UserName", "a")
        .insert_returning("SELECT SCOPE_IDENTITY();", false)
        .build()
        .unwrap();

    assert_eq!(
        sql,
        "INSERT INTO users (UserName) VALUES (?); SELECT SCOPE_IDENTITY();"
    );
}

#[test]
fn front_limit_renders_top_after_select() {
    let (sql, _) = select("users")
        .dialect(Dialect::mssql())
        .distinct(true)
        .column("Id")
        .result_limit("5")
        .build()
        .unwrap();

    assert_eq!(sql, "SELECT DISTINCT TOP 5 Id FROM users;");
}

#[test]
fn boxed_value_reaches_the_argument_list() {
    let (sql, args) = insert("users")
        .dialect(Dialect::postgres())
        .value("Packed", Value::Boxed(Box::new(Value::Bool(true))))
        .build()
        .unwrap();

    assert_eq!(sql, "INSERT INTO users (Packed) VALUES ($1);");
    assert_eq!(args, vec![Scalar::Bool(true)]);
}

#[test]
fn double_boxed_value_is_skipped_as_absent() {
    let (sql, args) = insert("users")
        .dialect(Dialect::postgres())
        .value("Keep", 1)
        .value("Dropped", Value::Boxed(Box::new(Value::Boxed(Box::new(Value::Bool(true))))))
        .build()
        .unwrap();

    assert_eq!(sql, "INSERT INTO users (Keep) VALUES ($1);");
    assert_eq!(args, vec![Scalar::Int(1)]);
}

#[test]
fn reference_mode_prefixes_interpolated_names() {
    let (sql, _) = delete("{users}")
        .reference_mode(true)
        .filter("Id", 1)
        .build()
        .unwrap();
    assert_eq!(sql, "DELETE FROM ref_users WHERE Id = ?;");
}

#[test]
fn schema_outranks_reference_prefix() {
    let (sql, _) = delete("{users}")
        .reference_mode(true)
        .reference_prefix("evt")
        .schema("app")
        .filter("Id", 1)
        .build()
        .unwrap();
    assert_eq!(sql, "DELETE FROM app.users WHERE Id = ?;");
}

#[test]
fn interpolation_off_leaves_tokens() {
    let (sql, _) = delete("{users}")
        .interpolate(false)
        .schema("app")
        .build()
        .unwrap();
    assert_eq!(sql, "DELETE FROM {users};");
}
