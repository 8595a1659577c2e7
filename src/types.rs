use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Values that can be bound to a template placeholder.
///
/// Most callers never name a variant directly; the `From` impls let binder calls take plain
/// Rust values:
/// ```rust
/// use sql_template::prelude::*;
///
/// let params = Binder::parse("SELECT * FROM t WHERE name = :name LIMIT :limit")
///     .set("name", "alice")
///     .set("limit", 10)
///     .merged_parameters()
///     .unwrap();
/// assert_eq!(params[0], RowValues::Text("alice".into()));
/// assert_eq!(params[1], RowValues::Int(10));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Infer a value from untyped text, as typed on a command line.
    ///
    /// `null`, `true` and `false` (any case) map to their variants, then integers, then floats;
    /// everything else is kept as text.
    #[must_use]
    pub fn infer(raw: &str) -> RowValues {
        if raw.eq_ignore_ascii_case("null") {
            RowValues::Null
        } else if raw.eq_ignore_ascii_case("true") {
            RowValues::Bool(true)
        } else if raw.eq_ignore_ascii_case("false") {
            RowValues::Bool(false)
        } else if let Ok(i) = raw.parse::<i64>() {
            RowValues::Int(i)
        } else if let Ok(f) = raw.parse::<f64>()
            && f.is_finite()
        {
            RowValues::Float(f)
        } else {
            RowValues::Text(raw.to_string())
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        RowValues::JSON(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}
