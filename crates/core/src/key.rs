//! Object key derivation
//!
//! Keys always use `/` as separator regardless of the host path convention.
//! An optional prefix is joined with a single slash.

use std::path::Path;

/// Convert a path relative to the source root into an object key
pub fn relative_key(relative: &Path) -> String {
    relative.to_string_lossy().replace('\\', "/")
}

/// Build the full object key for a file
///
/// One trailing slash on the prefix is dropped so that `docs` and `docs/`
/// produce the same key.
pub fn object_key(prefix: Option<&str>, relative: &Path) -> String {
    let key = relative_key(relative);
    match prefix {
        Some(prefix) if !prefix.is_empty() => {
            let prefix = prefix.strip_suffix('/').unwrap_or(prefix);
            format!("{prefix}/{key}")
        }
        _ => key,
    }
}
