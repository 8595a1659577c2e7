use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::binder::Binder;
use crate::error::SqlTemplateError;
use crate::template::{ParseOptions, ParsedTemplate, parse_or_offset};

/// Outcome of parsing one text: the template, or the offset of a rejected `:`.
type Slot = Arc<OnceLock<Result<Arc<ParsedTemplate>, usize>>>;

/// Parsed templates keyed by their exact source text.
///
/// Owned by the caller (there is no process-wide instance). Each text gets its own slot, so a
/// text is parsed at most once even when many threads ask for it together, and only callers
/// waiting on that same text block while it is parsed. The map lock is held just long enough
/// to find or insert a slot.
/// ```rust
/// use std::sync::Arc;
/// use sql_template::prelude::*;
///
/// let cache = TemplateCache::default();
/// let a = cache.get_or_parse("SELECT * FROM t WHERE id = :id")?;
/// let b = cache.get_or_parse("SELECT * FROM t WHERE id = :id")?;
/// assert!(Arc::ptr_eq(&a, &b));
/// # Ok::<(), SqlTemplateError>(())
/// ```
#[derive(Debug, Default)]
pub struct TemplateCache {
    options: ParseOptions,
    templates: RwLock<HashMap<String, Slot>>,
}

impl TemplateCache {
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            templates: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Return the cached parse of `sql`, parsing it on first use.
    ///
    /// # Errors
    ///
    /// Returns `SqlTemplateError::MalformedPlaceholder` if the cache uses strict options and
    /// `sql` is rejected. The rejection is remembered, so the text is not parsed again, but it
    /// does not count toward [`TemplateCache::len`].
    pub fn get_or_parse(&self, sql: &str) -> Result<Arc<ParsedTemplate>, SqlTemplateError> {
        let slot = self.slot(sql);
        let outcome = slot.get_or_init(|| {
            let outcome = parse_or_offset(sql, self.options).map(Arc::new);
            match &outcome {
                Ok(parsed) => tracing::debug!(placeholders = parsed.len(), "cached sql template"),
                Err(offset) => tracing::debug!(offset, "cached rejection of sql template"),
            }
            outcome
        });
        outcome
            .clone()
            .map_err(|offset| SqlTemplateError::MalformedPlaceholder { offset })
    }

    fn slot(&self, sql: &str) -> Slot {
        if let Some(slot) = self
            .templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(sql)
        {
            return Arc::clone(slot);
        }

        let mut templates = self
            .templates
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // another thread may have added the slot between the two locks
        Arc::clone(templates.entry(sql.to_string()).or_default())
    }

    /// Read a UTF-8 SQL file and return its cached parse.
    ///
    /// The key is the file's content, so two files with identical text share one entry.
    ///
    /// # Errors
    ///
    /// Returns `SqlTemplateError::Io` if the file cannot be read, or the errors of
    /// [`TemplateCache::get_or_parse`].
    pub fn get_or_load(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Arc<ParsedTemplate>, SqlTemplateError> {
        let sql = std::fs::read_to_string(path)?;
        self.get_or_parse(&sql)
    }

    /// A fresh binder over the cached parse of `sql`.
    ///
    /// # Errors
    ///
    /// Same as [`TemplateCache::get_or_parse`].
    pub fn binder(&self, sql: &str) -> Result<Binder, SqlTemplateError> {
        self.get_or_parse(sql).map(Binder::new)
    }

    /// Number of successfully parsed templates held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| matches!(slot.get(), Some(Ok(_))))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.templates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
