//! Identity signals used to decide whether two raw records describe the same
//! underlying content.
//!
//! Three signals are consulted, strongest first: normalized url, normalized
//! file path, then the `(file_name, kind, file_size)` triple.

use crate::item::{Item, ItemKind};

/// Identity key consulted only when neither locator matches.
pub type IdentityTriple = (String, ItemKind, Option<u64>);

/// Normalize a url-shaped locator for comparison.
///
/// Lower-cases and converts `\` separators to `/`. Returns `None` for
/// missing or empty input.
pub fn normalize_url(url: Option<&str>) -> Option<String> {
    normalize_locator(url)
}

/// Normalize a file-path-shaped locator for comparison.
pub fn normalize_path(path: Option<&str>) -> Option<String> {
    normalize_locator(path)
}

/// Extract the `(file_name, kind, file_size)` identity triple.
pub fn identity_triple(item: &Item) -> IdentityTriple {
    (item.file_name.clone(), item.kind, item.file_size)
}

fn normalize_locator(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }
    Some(raw.replace('\\', "/").to_lowercase())
}
