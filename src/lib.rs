//! Parse SQL templates that mix positional `?` and named `:identifier` placeholders.
//!
//! [`parse`] rewrites every named placeholder to `?` (skipping single-quoted literals) and
//! records each placeholder occurrence in order. A [`Binder`] then collects values by name
//! and/or position and resolves them into one parameter list aligned with the `?` markers of
//! the normalized SQL.
//!
//! ```rust
//! use sql_template::prelude::*;
//!
//! let qp = Binder::parse("SELECT * FROM t WHERE a < ? AND b = :name LIMIT ?")
//!     .set("name", "Adam")
//!     .with([1, 10])?
//!     .into_query_and_params()?;
//! assert_eq!(qp.query, "SELECT * FROM t WHERE a < ? AND b = ? LIMIT ?");
//! assert_eq!(
//!     qp.params,
//!     vec![RowValues::Int(1), RowValues::Text("Adam".into()), RowValues::Int(10)]
//! );
//! # Ok::<(), SqlTemplateError>(())
//! ```

pub mod binder;
pub mod cache;
pub mod error;
pub mod prelude;
pub mod query;
pub mod template;
pub mod types;

pub use binder::{BindState, Binder, ResolvedParameters};
pub use cache::TemplateCache;
pub use error::SqlTemplateError;
pub use query::QueryAndParams;
pub use template::{
    ColonPolicy, LiteralSpan, ParseOptions, ParsedTemplate, Placeholder, PlaceholderKind,
    find_literal_spans, parse, parse_with,
};
pub use types::RowValues;
