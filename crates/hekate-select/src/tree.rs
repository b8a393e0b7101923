//! Capability traits the engine needs from a tree
//!
//! The engine only reads. `Tree` covers per-element accessors and structural
//! links; `Indexable` adds the lookups the context resolver uses as fast
//! paths. Every `Indexable` method has a default built on `Tree`, so any tree
//! can be queried; trees with real indexes override the defaults.

use std::fmt::Debug;
use std::hash::Hash;

/// Read access to a labeled tree
pub trait Tree {
    /// Cheap node reference
    type Handle: Copy + Eq + Hash + Debug;

    /// Elements are the only nodes selectors can match
    fn is_element(&self, node: Self::Handle) -> bool;

    /// Tag name of an element
    fn tag_name(&self, element: Self::Handle) -> &str;

    /// Identifier of an element, if any
    fn element_id(&self, element: Self::Handle) -> Option<&str>;

    /// Class membership test
    fn has_class(&self, element: Self::Handle, class: &str) -> bool;

    /// Attribute value by name
    fn attribute(&self, element: Self::Handle, name: &str) -> Option<&str>;

    /// Parent node, which need not be an element
    fn parent(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Element children in order
    fn element_children(&self, node: Self::Handle) -> Vec<Self::Handle>;

    /// Following element sibling
    fn next_element_sibling(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Preceding element sibling
    fn previous_element_sibling(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// True if the node has children of any kind, text included
    fn has_child_nodes(&self, node: Self::Handle) -> bool;

    /// Concatenated descendant text
    fn text_content(&self, node: Self::Handle) -> String;
}

/// Structural lookups used to narrow candidates before matching.
///
/// All lookups are scoped to the descendants of `root`, never `root` itself,
/// and return elements in tree order.
pub trait Indexable: Tree {
    /// Every element below `root`
    fn descendants(&self, root: Self::Handle) -> Vec<Self::Handle> {
        let mut out = Vec::new();
        let mut stack: Vec<Self::Handle> = self.element_children(root).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.element_children(node).into_iter().rev());
        }
        out
    }

    /// First element below `root` with the given identifier
    fn element_by_id(&self, root: Self::Handle, id: &str) -> Option<Self::Handle> {
        self.descendants(root)
            .into_iter()
            .find(|&e| self.element_id(e) == Some(id))
    }

    /// Elements below `root` carrying `class`
    fn elements_by_class_name(&self, root: Self::Handle, class: &str) -> Vec<Self::Handle> {
        self.descendants(root)
            .into_iter()
            .filter(|&e| self.has_class(e, class))
            .collect()
    }

    /// Elements below `root` named `tag` (ASCII case-insensitive), `*` for all
    fn elements_by_tag_name(&self, root: Self::Handle, tag: &str) -> Vec<Self::Handle> {
        let all = self.descendants(root);
        if tag == "*" {
            return all;
        }
        all.into_iter()
            .filter(|&e| self.tag_name(e).eq_ignore_ascii_case(tag))
            .collect()
    }
}
