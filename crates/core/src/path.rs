// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property path helpers.

/// The channel root.
pub const ROOT: &str = "/";

/// Prefix `path` with the property base, if there is one.
pub fn resolve(base: Option<&str>, path: &str) -> String {
    match base {
        Some(base) => format!("{base}{path}"),
        None => path.to_string(),
    }
}

/// Re-scope an absolute path to a property base.
///
/// Returns `None` when the path lies outside the base. A path equal to the
/// base becomes the root `/`.
pub fn strip_base<'a>(base: Option<&str>, absolute: &'a str) -> Option<&'a str> {
    let Some(base) = base else {
        return Some(absolute);
    };
    let rest = absolute.strip_prefix(base)?;
    Some(if rest.is_empty() { ROOT } else { rest })
}

/// True for `""` and `"/"`.
pub fn is_root(path: &str) -> bool {
    path.is_empty() || path == ROOT
}

/// True if `path` is `base` or lies under it (`base` followed by `/`).
pub fn is_under(base: &str, path: &str) -> bool {
    if is_root(base) {
        return true;
    }
    match path.strip_prefix(base) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || base.ends_with('/'),
        None => false,
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
