use std::collections::HashMap;
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use crate::error::SqlTemplateError;
use crate::query::QueryAndParams;
use crate::template::{ParsedTemplate, PlaceholderKind, parse};
use crate::types::RowValues;

/// Where a binder stands relative to its template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindState {
    /// Nothing has been bound yet.
    Unbound,
    /// Some values are bound but `resolve` would still fail.
    PartiallyBound,
    /// Every placeholder has a value; `resolve` succeeds.
    Resolved,
}

/// Parameter values aligned one-to-one with the `?` markers of the normalized SQL.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedParameters(Vec<RowValues>);

impl ResolvedParameters {
    #[must_use]
    pub fn into_vec(self) -> Vec<RowValues> {
        self.0
    }
}

impl Deref for ResolvedParameters {
    type Target = [RowValues];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<ResolvedParameters> for Vec<RowValues> {
    fn from(params: ResolvedParameters) -> Self {
        params.0
    }
}

impl PartialEq<Vec<RowValues>> for ResolvedParameters {
    fn eq(&self, other: &Vec<RowValues>) -> bool {
        &self.0 == other
    }
}

/// How the stored positional values line up with the template.
#[derive(Debug, Clone)]
enum Positional {
    /// One value per placeholder occurrence, named ones included.
    ByOccurrence(Vec<RowValues>),
    /// One value per `?` placeholder only.
    BySlot(Vec<RowValues>),
}

/// Accumulates named and positional values for one parsed template.
///
/// A binder is a builder: values can be added or replaced at any time, and every call to
/// [`Binder::resolve`] reflects the current bindings. The template itself is shared, so many
/// binders can work from one cached parse.
///
/// ```rust
/// use sql_template::prelude::*;
///
/// let sql = "SELECT * FROM c WHERE a < :now AND b < :now LIMIT :limit";
/// let params = Binder::parse(sql)
///     .set("now", "1")
///     .set("limit", 10)
///     .merged_parameters()?;
/// assert_eq!(
///     params,
///     vec![RowValues::from("1"), RowValues::from("1"), RowValues::Int(10)]
/// );
/// # Ok::<(), SqlTemplateError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Binder {
    template: Arc<ParsedTemplate>,
    named: HashMap<String, RowValues>,
    positional: Option<Positional>,
}

impl Binder {
    #[must_use]
    pub fn new(template: Arc<ParsedTemplate>) -> Self {
        Self {
            template,
            named: HashMap::new(),
            positional: None,
        }
    }

    /// Parse `sql` with default options and wrap it in a fresh binder.
    #[must_use]
    pub fn parse(sql: &str) -> Self {
        Self::new(Arc::new(parse(sql)))
    }

    /// Read a UTF-8 SQL file, parse it with default options, and wrap it in a fresh binder.
    ///
    /// # Errors
    ///
    /// Returns `SqlTemplateError::Io` if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SqlTemplateError> {
        let sql = std::fs::read_to_string(path)?;
        Ok(Self::parse(&sql))
    }

    #[must_use]
    pub fn template(&self) -> &Arc<ParsedTemplate> {
        &self.template
    }

    /// The normalized SQL; unaffected by bindings.
    #[must_use]
    pub fn normalized_sql(&self) -> &str {
        self.template.normalized_sql()
    }

    /// Alias for [`Binder::normalized_sql`].
    #[must_use]
    pub fn get_sql(&self) -> &str {
        self.normalized_sql()
    }

    /// Bind `value` to every occurrence of `:name`. Rebinding a name replaces its value.
    pub fn bind_named(
        &mut self,
        name: impl Into<String>,
        value: impl Into<RowValues>,
    ) -> &mut Self {
        self.named.insert(name.into(), value.into());
        self
    }

    /// Owned, chainable form of [`Binder::bind_named`].
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.bind_named(name, value);
        self
    }

    /// Bind values by position, replacing any earlier positional values.
    ///
    /// With one value per placeholder occurrence, `values[i]` goes to occurrence `i` whatever its
    /// kind. In a template mixing `?` and `:name`, one value per `?` placeholder is also accepted:
    /// the values fill only the positional slots and named placeholders are left to
    /// [`Binder::bind_named`]. On error the binder keeps its earlier bindings.
    ///
    /// # Errors
    ///
    /// Returns `SqlTemplateError::ArityMismatch` for any other number of values; `expected` is
    /// the placeholder count.
    pub fn bind_positional<I, V>(&mut self, values: I) -> Result<&mut Self, SqlTemplateError>
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        let values: Vec<RowValues> = values.into_iter().map(Into::into).collect();
        let occurrences = self.template.len();
        let slots = self.template.positional_count();
        let mixed = slots > 0 && self.template.named_count() > 0;

        self.positional = Some(if values.len() == occurrences {
            Positional::ByOccurrence(values)
        } else if mixed && values.len() == slots {
            Positional::BySlot(values)
        } else {
            return Err(SqlTemplateError::ArityMismatch {
                expected: occurrences,
                actual: values.len(),
            });
        });
        Ok(self)
    }

    /// Owned, chainable form of [`Binder::bind_positional`].
    ///
    /// The binder is consumed, so on error the values bound so far are dropped with it; use
    /// [`Binder::bind_positional`] to keep them.
    ///
    /// # Errors
    ///
    /// Same as [`Binder::bind_positional`].
    pub fn with<I, V>(mut self, values: I) -> Result<Self, SqlTemplateError>
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        self.bind_positional(values)?;
        Ok(self)
    }

    /// Compute the parameter list for the normalized SQL from the current bindings.
    ///
    /// A value bound by name wins over a positional value for the same occurrence.
    ///
    /// # Errors
    ///
    /// Returns `SqlTemplateError::UnboundPlaceholder` for the first named occurrence with no
    /// value, or `SqlTemplateError::ArityMismatch` when a `?` placeholder has no positional value.
    pub fn resolve(&self) -> Result<ResolvedParameters, SqlTemplateError> {
        let mut resolved = Vec::with_capacity(self.template.len());
        let mut slot = 0;

        for placeholder in self.template.placeholders() {
            let value = match &placeholder.kind {
                PlaceholderKind::Named(name) => self
                    .named
                    .get(name)
                    .or_else(|| self.occurrence_value(placeholder.occurrence))
                    .ok_or_else(|| SqlTemplateError::UnboundPlaceholder {
                        name: name.clone(),
                        occurrence: placeholder.occurrence,
                    })?,
                PlaceholderKind::Positional => {
                    let value = match &self.positional {
                        Some(Positional::BySlot(values)) => values.get(slot),
                        _ => self.occurrence_value(placeholder.occurrence),
                    };
                    slot += 1;
                    value.ok_or_else(|| SqlTemplateError::ArityMismatch {
                        expected: self.template.positional_count(),
                        actual: self.positional_len(),
                    })?
                }
            };
            resolved.push(value.clone());
        }

        tracing::trace!(params = resolved.len(), "resolved template parameters");
        Ok(ResolvedParameters(resolved))
    }

    /// Alias for [`Binder::resolve`].
    ///
    /// # Errors
    ///
    /// Same as [`Binder::resolve`].
    pub fn merged_parameters(&self) -> Result<ResolvedParameters, SqlTemplateError> {
        self.resolve()
    }

    /// Resolve and pair the parameters with the normalized SQL.
    ///
    /// # Errors
    ///
    /// Same as [`Binder::resolve`].
    pub fn into_query_and_params(self) -> Result<QueryAndParams, SqlTemplateError> {
        let params = self.resolve()?;
        Ok(QueryAndParams::new(
            self.template.normalized_sql(),
            params.into_vec(),
        ))
    }

    #[must_use]
    pub fn state(&self) -> BindState {
        if self.named.is_empty() && self.positional.is_none() {
            if self.template.is_empty() {
                BindState::Resolved
            } else {
                BindState::Unbound
            }
        } else if self.resolve().is_ok() {
            BindState::Resolved
        } else {
            BindState::PartiallyBound
        }
    }

    fn occurrence_value(&self, occurrence: usize) -> Option<&RowValues> {
        match &self.positional {
            Some(Positional::ByOccurrence(values)) => values.get(occurrence),
            _ => None,
        }
    }

    fn positional_len(&self) -> usize {
        match &self.positional {
            Some(Positional::ByOccurrence(values) | Positional::BySlot(values)) => values.len(),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<RowValues> {
        values.iter().map(|v| RowValues::from(*v)).collect()
    }

    #[test]
    fn positional_by_occurrence_covers_named() {
        let binder = Binder::parse("a < ? AND b < :now LIMIT ? OFFSET ?")
            .with(["1", "2", "3", "4"])
            .unwrap();
        assert_eq!(binder.resolve().unwrap(), texts(&["1", "2", "3", "4"]));
    }

    #[test]
    fn named_fans_out_to_repeats() {
        let params = Binder::parse("x < :now AND y < :now LIMIT :limit OFFSET :offset")
            .set("now", "1")
            .set("limit", "10")
            .set("offset", "100")
            .merged_parameters()
            .unwrap();
        assert_eq!(params, texts(&["1", "1", "10", "100"]));
    }

    #[test]
    fn mixed_slots_skip_named() {
        let params = Binder::parse(":a = ? AND :b = ?")
            .set("a", 1)
            .set("b", 2)
            .with([10, 20])
            .unwrap()
            .resolve()
            .unwrap();
        assert_eq!(
            params.into_vec(),
            vec![
                RowValues::Int(1),
                RowValues::Int(10),
                RowValues::Int(2),
                RowValues::Int(20)
            ]
        );
    }

    #[test]
    fn named_wins_over_occurrence_value() {
        let params = Binder::parse("? :a")
            .with(["p", "q"])
            .unwrap()
            .set("a", "named")
            .resolve()
            .unwrap();
        assert_eq!(params, texts(&["p", "named"]));
    }

    #[test]
    fn last_named_write_wins() {
        let params = Binder::parse(":a").set("a", 1).set("a", 2).resolve().unwrap();
        assert_eq!(params, vec![RowValues::Int(2)]);
    }

    #[test]
    fn arity_mismatch_on_bind() {
        let mut binder = Binder::parse(":a ? ?");
        match binder.bind_positional([1]) {
            Err(SqlTemplateError::ArityMismatch { expected, actual }) => {
                assert_eq!((expected, actual), (3, 1));
            }
            other => panic!("expected ArityMismatch, got {other:?}"),
        }
        assert_eq!(binder.state(), BindState::Unbound);
    }

    #[test]
    fn all_named_template_needs_every_value() {
        assert!(matches!(
            Binder::parse(":a").with(Vec::<i64>::new()),
            Err(SqlTemplateError::ArityMismatch {
                expected: 1,
                actual: 0
            })
        ));
        let err = Binder::parse(":a :b").with([1]).unwrap_err();
        assert_eq!(err.to_string(), "Arity mismatch: expected 2 value(s), got 1");
    }

    #[test]
    fn all_positional_template_needs_every_value() {
        assert!(Binder::parse("? ?").with([1]).is_err());
        assert!(Binder::parse("SELECT 1").with(Vec::<i64>::new()).is_ok());
    }

    #[test]
    fn failed_positional_bind_keeps_named_values() {
        let mut binder = Binder::parse(":a ?").set("a", 1);
        assert!(binder.bind_positional([1, 2, 3]).is_err());
        binder.bind_positional([2]).unwrap();
        assert_eq!(
            binder.resolve().unwrap(),
            vec![RowValues::Int(1), RowValues::Int(2)]
        );
    }

    #[test]
    fn missing_positional_is_arity_mismatch() {
        let binder = Binder::parse("? :a").set("a", 1);
        assert!(matches!(
            binder.resolve(),
            Err(SqlTemplateError::ArityMismatch {
                expected: 1,
                actual: 0
            })
        ));
    }

    #[test]
    fn unbound_named_reports_first_occurrence() {
        let binder = Binder::parse("? :a :b :b").set("a", 1).with([0]).unwrap();
        match binder.resolve() {
            Err(SqlTemplateError::UnboundPlaceholder { name, occurrence }) => {
                assert_eq!(name, "b");
                assert_eq!(occurrence, 2);
            }
            other => panic!("expected UnboundPlaceholder, got {other:?}"),
        }
    }

    #[test]
    fn state_transitions() {
        let mut binder = Binder::parse(":a AND :b");
        assert_eq!(binder.state(), BindState::Unbound);
        binder.bind_named("a", 1);
        assert_eq!(binder.state(), BindState::PartiallyBound);
        binder.bind_named("b", 2);
        assert_eq!(binder.state(), BindState::Resolved);
        assert_eq!(binder.resolve().unwrap(), binder.resolve().unwrap());
        binder.bind_named("b", 3);
        assert_eq!(binder.resolve().unwrap()[1], RowValues::Int(3));
        assert_eq!(Binder::parse("SELECT 1").state(), BindState::Resolved);
    }

    #[test]
    fn sql_is_unaffected_by_bindings() {
        let binder = Binder::parse("SELECT :a");
        assert_eq!(binder.get_sql(), "SELECT ?");
        let binder = binder.set("a", 1);
        assert_eq!(binder.normalized_sql(), "SELECT ?");
        let qp = binder.into_query_and_params().unwrap();
        assert_eq!(qp.query, "SELECT ?");
        assert_eq!(qp.params, vec![RowValues::Int(1)]);
    }
}
