//! Removal of the leading title node.

/// Drop the first child (the document's H1).
///
/// Absent or empty input yields an empty list. The first child is removed
/// unconditionally; it is not checked to be a heading.
pub fn strip_first_title<T>(children: Option<Vec<T>>) -> Vec<T> {
    match children {
        Some(mut children) if !children.is_empty() => {
            children.remove(0);
            children
        }
        _ => Vec::new(),
    }
}
