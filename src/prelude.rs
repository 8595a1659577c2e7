//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::binder::{BindState, Binder, ResolvedParameters};
pub use crate::cache::TemplateCache;
pub use crate::error::SqlTemplateError;
pub use crate::query::QueryAndParams;
pub use crate::template::{
    ColonPolicy, LiteralSpan, ParseOptions, ParsedTemplate, Placeholder, PlaceholderKind, parse,
    parse_with,
};
pub use crate::types::RowValues;
