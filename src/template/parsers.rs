pub(super) fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

pub(super) fn is_identifier_part(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// End offset of the identifier starting at `start`, or `None` if no identifier starts there.
pub(super) fn scan_identifier(bytes: &[u8], start: usize) -> Option<usize> {
    if !bytes.get(start).is_some_and(|&b| is_identifier_start(b)) {
        return None;
    }
    let mut idx = start + 1;
    while idx < bytes.len() && is_identifier_part(bytes[idx]) {
        idx += 1;
    }
    Some(idx)
}

/// End offset of the colon run starting at `idx` when it is a `::` cast, else `None`.
pub(super) fn scan_cast_operator(bytes: &[u8], idx: usize) -> Option<usize> {
    if bytes.get(idx + 1) != Some(&b':') {
        return None;
    }
    let mut end = idx + 2;
    while bytes.get(end) == Some(&b':') {
        end += 1;
    }
    Some(end)
}
