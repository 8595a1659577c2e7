mod parsers;
mod scanner;

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::error::SqlTemplateError;
use parsers::{scan_cast_operator, scan_identifier};

pub use scanner::{LiteralSpan, find_literal_spans};

/// What to do with a `:` that does not start a named placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ColonPolicy {
    /// Copy the colon through as an ordinary character.
    #[default]
    Lenient,
    /// Reject the template with `SqlTemplateError::MalformedPlaceholder`.
    Strict,
}

/// Options for [`parse_with`].
///
/// # Examples
/// ```rust
/// use sql_template::prelude::*;
///
/// let options = ParseOptions::default().with_colon_policy(ColonPolicy::Strict);
/// assert!(parse_with("SELECT a FROM t WHERE b = : c", options).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub colon_policy: ColonPolicy,
    /// Treat `::` (and longer colon runs) as a cast operator, never as a placeholder.
    pub double_colon_cast: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            colon_policy: ColonPolicy::default(),
            double_colon_cast: true,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn with_colon_policy(mut self, colon_policy: ColonPolicy) -> Self {
        self.colon_policy = colon_policy;
        self
    }

    #[must_use]
    pub fn with_double_colon_cast(mut self, double_colon_cast: bool) -> Self {
        self.double_colon_cast = double_colon_cast;
        self
    }
}

/// Placeholder flavor; a named placeholder carries its name without the leading colon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceholderKind {
    Positional,
    Named(String),
}

/// One placeholder occurrence in a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    /// Rank in left-to-right order; also the index of this `?` in the normalized SQL.
    pub occurrence: usize,
    /// Byte offset of the `?` or `:` in the original text.
    pub offset: usize,
}

impl Placeholder {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            PlaceholderKind::Named(name) => Some(name),
            PlaceholderKind::Positional => None,
        }
    }

    #[must_use]
    pub fn is_positional(&self) -> bool {
        matches!(self.kind, PlaceholderKind::Positional)
    }
}

/// A SQL template with every placeholder rewritten to `?`.
///
/// Immutable once parsed, so it can be cached per source text and shared across threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTemplate {
    normalized_sql: String,
    placeholders: Vec<Placeholder>,
}

impl ParsedTemplate {
    #[must_use]
    pub fn normalized_sql(&self) -> &str {
        &self.normalized_sql
    }

    #[must_use]
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.placeholders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placeholders.is_empty()
    }

    #[must_use]
    pub fn positional_count(&self) -> usize {
        self.placeholders.iter().filter(|p| p.is_positional()).count()
    }

    #[must_use]
    pub fn named_count(&self) -> usize {
        self.len() - self.positional_count()
    }

    /// Distinct placeholder names in order of first occurrence.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.placeholders.iter().filter_map(Placeholder::name) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// Parse `sql` with the default (lenient) options.
///
/// Named placeholders (`:identifier`) are replaced by `?`; everything else, including quoted
/// literals, is copied byte-for-byte.
///
/// ```rust
/// use sql_template::prelude::*;
///
/// let parsed = parse("SELECT * FROM t WHERE a = :a AND b = ? AND c = ':not_me'");
/// assert_eq!(parsed.normalized_sql(), "SELECT * FROM t WHERE a = ? AND b = ? AND c = ':not_me'");
/// assert_eq!(parsed.placeholders()[0].name(), Some("a"));
/// assert!(parsed.placeholders()[1].is_positional());
/// ```
#[must_use]
pub fn parse(sql: &str) -> ParsedTemplate {
    let cast = ParseOptions::default().double_colon_cast;
    let Ok(parsed) = scan(sql, cast, |_| Ok::<(), Infallible>(()));
    parsed
}

/// Parse `sql` with explicit options.
///
/// # Errors
///
/// Returns `SqlTemplateError::MalformedPlaceholder` under `ColonPolicy::Strict` when a `:` is
/// not followed by an identifier start (and is not part of a `::` cast when casts are enabled).
pub fn parse_with(sql: &str, options: ParseOptions) -> Result<ParsedTemplate, SqlTemplateError> {
    parse_or_offset(sql, options).map_err(|offset| {
        tracing::debug!(offset, "rejecting malformed ':' placeholder");
        SqlTemplateError::MalformedPlaceholder { offset }
    })
}

/// [`parse_with`], reporting a rejected colon by its byte offset only.
pub(crate) fn parse_or_offset(sql: &str, options: ParseOptions) -> Result<ParsedTemplate, usize> {
    match options.colon_policy {
        ColonPolicy::Lenient => {
            let Ok(parsed) = scan(sql, options.double_colon_cast, |_| Ok::<(), Infallible>(()));
            Ok(parsed)
        }
        ColonPolicy::Strict => scan(sql, options.double_colon_cast, Err),
    }
}

/// Single pass over `sql`; `stray_colon` decides what a `:` that starts nothing means.
fn scan<E>(
    sql: &str,
    double_colon_cast: bool,
    mut stray_colon: impl FnMut(usize) -> Result<(), E>,
) -> Result<ParsedTemplate, E> {
    let spans = find_literal_spans(sql);
    let bytes = sql.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut placeholders = Vec::new();
    let mut next_span = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        if let Some(span) = spans.get(next_span)
            && span.start == idx
        {
            idx = span.end;
            next_span += 1;
            continue;
        }

        match bytes[idx] {
            b'?' => {
                placeholders.push(Placeholder {
                    kind: PlaceholderKind::Positional,
                    occurrence: placeholders.len(),
                    offset: idx,
                });
                idx += 1;
            }
            b':' => {
                if double_colon_cast
                    && let Some(end) = scan_cast_operator(bytes, idx)
                {
                    idx = end;
                } else if let Some(end) = scan_identifier(bytes, idx + 1) {
                    let buf = out.get_or_insert_with(|| String::with_capacity(sql.len()));
                    buf.push_str(&sql[copied..idx]);
                    buf.push('?');
                    copied = end;
                    placeholders.push(Placeholder {
                        kind: PlaceholderKind::Named(sql[idx + 1..end].to_string()),
                        occurrence: placeholders.len(),
                        offset: idx,
                    });
                    idx = end;
                } else {
                    stray_colon(idx)?;
                    idx += 1;
                }
            }
            _ => idx += 1,
        }
    }

    let normalized_sql = match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied..]);
            buf
        }
        None => sql.to_string(),
    };

    tracing::trace!(
        placeholders = placeholders.len(),
        literals = spans.len(),
        "parsed sql template"
    );

    Ok(ParsedTemplate {
        normalized_sql,
        placeholders,
    })
}
