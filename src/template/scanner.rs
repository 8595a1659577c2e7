use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` of a single-quoted literal, quotes included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiteralSpan {
    pub start: usize,
    pub end: usize,
}

impl LiteralSpan {
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when `offset` lies inside the span, delimiting quotes included.
    #[must_use]
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Find every single-quoted literal in `sql`, in scan order.
///
/// A doubled apostrophe inside a literal is an escaped quote and does not close it. A literal
/// that is still open at the end of the text is closed there.
#[must_use]
pub fn find_literal_spans(sql: &str) -> Vec<LiteralSpan> {
    let bytes = sql.as_bytes();
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    let mut idx = 0;

    while idx < bytes.len() {
        if bytes[idx] == b'\'' {
            match open {
                None => open = Some(idx),
                Some(start) => {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        spans.push(LiteralSpan {
                            start,
                            end: idx + 1,
                        });
                        open = None;
                    }
                }
            }
        }
        idx += 1;
    }

    if let Some(start) = open {
        spans.push(LiteralSpan {
            start,
            end: bytes.len(),
        });
    }

    spans
}
