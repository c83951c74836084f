//! Route path canonicalization.
//!
//! Registration and dispatch both run paths through [`normalize_route`] so
//! table keys and request paths compare in one representation:
//! a leading `/`, a trailing `/`, and the inner text untouched.

/// Canonicalize a route pattern or request path.
///
/// Empty input becomes `/`. Otherwise a `/` is prepended and appended when
/// missing. Duplicate slashes inside the path are left alone.
pub fn normalize_route(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut normalized = String::with_capacity(path.len() + 2);
    if !path.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(path);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// Iterate the non-empty `/`-separated segments of a path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
