use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlTemplateError {
    /// A `:` not followed by an identifier start, surfaced only under `ColonPolicy::Strict`.
    #[error("Malformed placeholder: ':' at byte {offset} does not start a named placeholder")]
    MalformedPlaceholder { offset: usize },

    #[error("Arity mismatch: expected {expected} value(s), got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("Unbound placeholder: ':{name}' (occurrence {occurrence}) was never given a value")]
    UnboundPlaceholder { name: String, occurrence: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
