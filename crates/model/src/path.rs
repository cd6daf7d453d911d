//! Dot-path helpers used when flattening nested objects

/// Separator between path segments
pub const SEPARATOR: char = '.';

/// Join a parent path and a child name.
///
/// An empty parent yields the child unchanged, so top-level fields have no
/// leading separator.
pub fn join(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}{SEPARATOR}{child}")
    }
}

/// Parent of a dot-path, or `None` for a top-level name
pub fn parent(path: &str) -> Option<&str> {
    path.rfind(SEPARATOR).map(|idx| &path[..idx])
}

/// Last segment of a dot-path
pub fn leaf(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Number of segments in a path
pub fn depth(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.matches(SEPARATOR).count() + 1
    }
}

/// Whether `path` lies strictly below `ancestor`
pub fn is_descendant(path: &str, ancestor: &str) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path[ancestor.len()..].starts_with(SEPARATOR)
}
