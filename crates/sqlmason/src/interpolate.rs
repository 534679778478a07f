//! Table-name interpolation.
//!
//! Finished SQL text may carry `{Token}` markers around table names. This
//! pass rewrites each marker with a schema- or prefix-qualified form:
//! `{users}` becomes `sales.users` for qualifier `sales`, or bare `users`
//! when no qualifier applies.

use std::sync::LazyLock;

use regex::Regex;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{([A-Za-z0-9\[\]"_-]*)\}"#).expect("valid token pattern"));

/// Rewrite `{Token}` markers in `sql`, prepending `prefix` verbatim to each
/// name. The prefix carries its own separator (`sales.`, `ref_`); an empty
/// prefix just strips the braces.
pub(crate) fn rewrite_tokens(sql: &str, prefix: &str) -> String {
    TOKEN
        .replace_all(sql, |caps: &regex::Captures| {
            format!("{prefix}{}", &caps[1])
        })
        .into_owned()
}

/// Rewrite `{Token}` markers in `sql`.
///
/// With a non-empty qualifier each token becomes `qualifier.Token`; with an
/// empty qualifier the braces are stripped and the name is left bare. Text
/// without markers passes through unchanged.
///
/// ```
/// use sqlmason::interpolate_tables;
///
/// assert_eq!(
///     interpolate_tables("SELECT * FROM {users};", "sales"),
///     "SELECT * FROM sales.users;"
/// );
/// assert_eq!(interpolate_tables("SELECT * FROM {users};", ""), "SELECT * FROM users;");
/// ```
pub fn interpolate_tables(sql: &str, qualifier: &str) -> String {
    if qualifier.is_empty() {
        rewrite_tokens(sql, "")
    } else {
        rewrite_tokens(sql, &format!("{qualifier}."))
    }
}
