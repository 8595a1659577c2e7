use serde::Serialize;

use crate::types::RowValues;

/// Normalized SQL and its resolved parameters bundled together.
///
/// This is what a statement executor consumes: `query` uses only `?` markers and `params[i]`
/// belongs to the `i`-th marker.
/// ```rust
/// use sql_template::prelude::*;
///
/// let qp = Binder::parse("INSERT INTO t (id, name) VALUES (:id, :name)")
///     .set("id", 1)
///     .set("name", "alice")
///     .into_query_and_params()?;
/// assert_eq!(qp.query, "INSERT INTO t (id, name) VALUES (?, ?)");
/// assert_eq!(qp.params.len(), 2);
/// # Ok::<(), SqlTemplateError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAndParams {
    /// The SQL query string
    #[serde(rename = "sql")]
    pub query: String,
    /// The parameters to be bound to the query
    pub params: Vec<RowValues>,
}

impl QueryAndParams {
    /// Create a new `QueryAndParams` with the given query string and parameters
    pub fn new(query: impl Into<String>, params: Vec<RowValues>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }

    /// Number of `?` markers the parameters are meant for.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}
