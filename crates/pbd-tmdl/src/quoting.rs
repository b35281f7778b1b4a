//! Single-quote handling for declared names.
//!
//! Names containing spaces or reserved characters are wrapped in single
//! quotes, and a literal quote inside such a name is written twice (`''`).
//! The extractor reports names in their *raw inner* form: surrounding quotes
//! removed, doubled quotes kept, so `'new''s measure'` becomes
//! `new''s measure`.

/// Strip one pair of surrounding single quotes. Doubled quotes inside are kept.
pub fn unquote(raw: &str) -> &str {
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

/// Collapse doubled quotes to the conceptual name (`new''s` -> `new's`).
pub fn unescape(name: &str) -> String {
    name.replace("''", "'")
}

/// Whether a name can be written without quotes
pub fn is_bare_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Source representation of a name: bare when possible, otherwise quoted.
///
/// Lone quotes are doubled; quotes that are already doubled are kept as-is,
/// so both `new's` and `new''s` render as `'new''s'`.
pub fn quote_if_needed(name: &str) -> String {
    if is_bare_name(name) {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    out.push('\'');
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
            }
            out.push_str("''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// Whether a mapping key refers to a declared (raw inner) name.
///
/// Keys match either the raw form (`new''s measure`) or its unescaped form
/// (`new's measure`).
pub fn names_match(key: &str, declared: &str) -> bool {
    key == declared || (declared.contains("''") && key == unescape(declared))
}

/// Byte index of the quote closing a quoted name that starts at index 0.
///
/// Doubled quotes are skipped. Returns `None` when the name is unterminated.
pub(crate) fn closing_quote(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'\'') {
        return None;
    }
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return Some(i);
        }
        i += 1;
    }
    None
}
