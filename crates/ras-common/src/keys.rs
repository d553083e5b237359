//! Helpers for object-store keys.
//!
//! Keys always use `/` as the separator regardless of platform, so these
//! operate on strings rather than `std::path::Path`.

/// Final component of a key (`models/a/a.g01` -> `a.g01`).
pub fn file_name(key: &str) -> &str {
    let trimmed = key.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}

/// Extension of the final component including the dot (`.g01`), or an empty
/// string when the name has none.
pub fn file_extension(key: &str) -> &str {
    let name = file_name(key);
    match name.rfind('.') {
        Some(pos) => &name[pos..],
        None => "",
    }
}

/// Key with the extension removed (`models/a/a.prj` -> `models/a/a`).
pub fn file_stem_key(key: &str) -> &str {
    let ext = file_extension(key);
    &key[..key.len() - ext.len()]
}

/// Key in the form object stores list it: no leading, trailing or repeated
/// separators (`/models//a/a.prj` -> `models/a/a.prj`).
pub fn normalize_key(key: &str) -> String {
    key.split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Directory prefix of a key including the trailing separator
/// (`models/a/a.prj` -> `models/a/`). Top-level keys yield an empty prefix.
pub fn parent_prefix(key: &str) -> &str {
    match key.rfind('/') {
        Some(pos) => &key[..=pos],
        None => "",
    }
}
