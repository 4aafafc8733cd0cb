//! Path utilities for turning request paths into routable paths
//!
//! Route patterns are written without a leading slash (`products/{id}`), so
//! request paths are normalised the same way: the `~` application marker and
//! surrounding slashes are removed, and empty segments collapse.

use std::borrow::Cow;

/// Checks whether a path is already in routable form
///
/// # Rules
///
/// - Must not start with `~` or `/`
/// - Must not end with `/`
/// - Must not contain `//` or `\`
///
/// # Examples
///
/// ```
/// use mvc_router::path::is_route_path;
///
/// assert!(is_route_path(""));
/// assert!(is_route_path("products/5"));
///
/// assert!(!is_route_path("~/products"));
/// assert!(!is_route_path("/products"));
/// assert!(!is_route_path("products/"));
/// assert!(!is_route_path("products//5"));
/// assert!(!is_route_path("products\\5"));
/// ```
pub fn is_route_path(path: &str) -> bool {
    !(path.starts_with('~')
        || path.starts_with('/')
        || path.ends_with('/')
        || path.contains("//")
        || path.contains('\\'))
}

/// Normalises an app-relative path into the form route patterns match
///
/// Returns `Cow::Borrowed` when the input is already routable.
///
/// # Examples
///
/// ```
/// use mvc_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("products/5"), Cow::Borrowed("products/5")));
///
/// assert_eq!(normalize_path("~/"), "");
/// assert_eq!(normalize_path("~/products/5/"), "products/5");
/// assert_eq!(normalize_path("/products//5"), "products/5");
/// assert_eq!(normalize_path("~\\products\\5"), "products/5");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_route_path(path) {
        return Cow::Borrowed(path);
    }

    let without_marker = path.strip_prefix('~').unwrap_or(path);

    let normalized = without_marker
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    Cow::Owned(normalized)
}

/// Builds the routable path for a request from its app-relative path and path info
pub fn request_path<'a>(app_relative_path: &'a str, path_info: &str) -> Cow<'a, str> {
    if path_info.is_empty() {
        normalize_path(app_relative_path)
    } else {
        Cow::Owned(normalize_path(&format!("{}{}", app_relative_path, path_info)).into_owned())
    }
}

/// Percent-decodes one path segment, keeping the raw text if it is not valid UTF-8
pub fn decode_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
}
