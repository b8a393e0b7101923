//! Candidate narrowing through structural lookups

use tracing::trace;

use crate::selector::SelectorNode;
use crate::tree::Indexable;

/// Coarse candidate set for `node` below each of `roots`.
///
/// Lookup priority is id, then the first class, then tag name, then every
/// descendant element. The node's other filters are left to the matcher.
/// Results are concatenated across roots without deduplication.
pub fn resolve_context<T: Indexable>(
    tree: &T,
    node: &SelectorNode,
    roots: &[T::Handle],
) -> Vec<T::Handle> {
    let mut out = Vec::new();
    for &root in roots {
        if let Some(id) = node.id.as_deref() {
            out.extend(tree.element_by_id(root, id));
        } else if let Some(class) = node.classes.first() {
            out.extend(tree.elements_by_class_name(root, class));
        } else if let Some(tag) = node.tag.as_deref() {
            if tag.contains('|') {
                // Keep tree order across alternatives
                out.extend(
                    tree.descendants(root)
                        .into_iter()
                        .filter(|&e| node.tag_matches(tree.tag_name(e))),
                );
            } else {
                out.extend(tree.elements_by_tag_name(root, tag));
            }
        } else {
            out.extend(tree.descendants(root));
        }
    }
    trace!(roots = roots.len(), candidates = out.len(), "resolved context");
    out
}
