//! # sqlmason
//!
//! A programmatic SQL statement assembler.
//!
//! Given a target table or view, a command kind (SELECT/INSERT/UPDATE/DELETE),
//! columns and values, filters, ordering, grouping and a result limit,
//! sqlmason produces either a parameterized SQL string plus an ordered
//! argument list, or a fully literal string with values inlined.
//!
//! ## Features
//!
//! - **Placeholder/argument alignment**: arguments are collected next to each
//!   emitted placeholder, so the two can never drift out of order
//! - **Value normalization**: loosely typed inputs (optionals, wrapped
//!   values, database string wrappers) reduce to a closed scalar set or to
//!   absent; absent columns can be skipped, defaulted, or forced to NULL via
//!   a match-to-null sentinel
//! - **Dialect-aware**: quoting, escaping, placeholder tokens, sequential
//!   numbering, and front (`TOP n`) vs. rear (`LIMIT n`) result limits per
//!   engine
//! - **Table-name interpolation**: `{Token}` markers rewritten with a schema
//!   or reference prefix
//! - **No database surface**: pure computation; nothing here parses SQL,
//!   validates it, or talks to a server
//!
//! ## Example
//!
//! ```
//! use sqlmason::{select, Dialect, Direction, Scalar};
//!
//! let (sql, args) = select("users")
//!     .dialect(Dialect::postgres())
//!     .column("Id")
//!     .column("UserName")
//!     .filter("IsActive", true)
//!     .order_by("UserName", Direction::Asc)
//!     .result_limit("10")
//!     .build()?;
//!
//! assert_eq!(
//!     sql,
//!     "SELECT Id, UserName FROM users WHERE IsActive = $1 ORDER BY UserName ASC LIMIT 10;"
//! );
//! assert_eq!(args, vec![Scalar::Bool(true)]);
//! # Ok::<(), sqlmason::BuildError>(())
//! ```

pub mod builder;
pub mod dialect;
pub mod error;
pub mod interpolate;
pub mod value;

pub use builder::{
    CommandKind, Direction, FilterHook, QueryBuilder, ValueOptions, delete, insert, select, update,
};
pub use dialect::{Dialect, LimitPosition};
pub use error::{BuildError, BuildResult};
pub use interpolate::interpolate_tables;
pub use value::{Scalar, Value, normalize};
