//! Selector-driven traversal helpers

use std::collections::HashSet;
use std::hash::Hash;

use crate::context::resolve_context;
use crate::engine::SelectorEngine;
use crate::selector::SelectorNode;
use crate::tree::Indexable;

fn dedup<H: Copy + Eq + Hash>(items: impl IntoIterator<Item = H>) -> Vec<H> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|&h| seen.insert(h)).collect()
}

impl<T: Indexable> SelectorEngine<T> {
    /// Keep the elements matched by any clause of `selector`.
    /// Chained clauses yield the elements reached at the end of the chain.
    pub fn filter(&self, tree: &T, selector: &str, elements: &[T::Handle]) -> Vec<T::Handle> {
        let list = self.parse(selector);
        if list.is_blank() {
            return Vec::new();
        }
        let matcher = self.matcher(tree);
        dedup(
            list.query
                .iter()
                .flat_map(|node| matcher.filter(node, elements)),
        )
    }

    /// True if `element` is among the results of `selector` queried from
    /// the element's topmost ancestor
    pub fn is(&self, tree: &T, element: T::Handle, selector: &str) -> bool {
        self.scoped(tree, selector, topmost(tree, element))
            .contains(&element)
    }

    /// Nearest inclusive ancestor of `element` for which [`is`](Self::is)
    /// holds
    pub fn closest(&self, tree: &T, element: T::Handle, selector: &str) -> Option<T::Handle> {
        let found = self.scoped(tree, selector, topmost(tree, element));
        std::iter::successors(Some(element), |&node| tree.parent(node)).find(|n| found.contains(n))
    }

    /// Element children of `elements`, or every descendant element when
    /// `deep`, filtered by `selector` when one is given
    pub fn children(
        &self,
        tree: &T,
        elements: &[T::Handle],
        selector: Option<&str>,
        deep: bool,
    ) -> Vec<T::Handle> {
        let context = if deep {
            resolve_context(tree, &SelectorNode::default(), elements)
        } else {
            elements
                .iter()
                .flat_map(|&el| tree.element_children(el))
                .collect()
        };
        match selector {
            Some(selector) => self.filter(tree, selector, &context),
            None => dedup(context),
        }
    }

    /// Results of `selector` below `top`, plus `top` itself when it is an
    /// element and heads a matching chain
    fn scoped(&self, tree: &T, selector: &str, top: T::Handle) -> HashSet<T::Handle> {
        let mut found: HashSet<T::Handle> =
            self.query(tree, selector, &[top]).elements.into_iter().collect();
        if tree.is_element(top) {
            found.extend(self.filter(tree, selector, &[top]));
        }
        found
    }

    /// Parent element of each of `elements`, or every ancestor element when
    /// `deep`, filtered by `selector` when one is given
    pub fn parents(
        &self,
        tree: &T,
        elements: &[T::Handle],
        selector: Option<&str>,
        deep: bool,
    ) -> Vec<T::Handle> {
        let context: Vec<T::Handle> = elements
            .iter()
            .flat_map(|&el| {
                let ancestors = std::iter::successors(tree.parent(el), |&p| tree.parent(p));
                ancestors.take(if deep { usize::MAX } else { 1 })
            })
            .filter(|&node| tree.is_element(node))
            .collect();
        match selector {
            Some(selector) => self.filter(tree, selector, &context),
            None => dedup(context),
        }
    }
}

fn topmost<T: Indexable>(tree: &T, node: T::Handle) -> T::Handle {
    let mut top = node;
    while let Some(parent) = tree.parent(top) {
        top = parent;
    }
    top
}

#[cfg(test)]
mod tests {
    use super::*;
    use hekate_dom::{DomTree, NodeId};

    /// `<section><div class="a"><p><b/></p></div><div/></section>`
    fn fixture() -> (DomTree, [NodeId; 5]) {
        let mut tree = DomTree::new();
        let root = tree.root();
        let section = tree.create_element("section");
        let div = tree.create_element("div");
        let p = tree.create_element("p");
        let b = tree.create_element("b");
        let div2 = tree.create_element("div");
        tree.set_attribute(div, "class", "a").unwrap();
        tree.append_child(root, section).unwrap();
        tree.append_child(section, div).unwrap();
        tree.append_child(div, p).unwrap();
        tree.append_child(p, b).unwrap();
        tree.append_child(section, div2).unwrap();
        (tree, [section, div, p, b, div2])
    }

    #[test]
    fn test_filter() {
        let (tree, [section, div, p, _, div2]) = fixture();
        let engine = SelectorEngine::new();
        assert_eq!(engine.filter(&tree, "div", &[section, div, p, div2]), vec![div, div2]);
        assert_eq!(engine.filter(&tree, ".a, div", &[div2, div]), vec![div, div2]);
        assert!(engine.filter(&tree, "", &[div]).is_empty());
    }

    #[test]
    fn test_is() {
        let (tree, [section, div, p, ..]) = fixture();
        let engine = SelectorEngine::new();
        assert!(engine.is(&tree, p, "div > p"));
        assert!(!engine.is(&tree, p, "section > p"));
        assert!(engine.is(&tree, section, "section"));
        assert!(engine.is(&tree, div, ".a"));
    }

    #[test]
    fn test_is_on_detached_subtree() {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        let li = tree.create_element("li");
        tree.append_child(ul, li).unwrap();
        let engine = SelectorEngine::new();
        assert!(engine.is(&tree, ul, "ul"));
        assert!(engine.is(&tree, li, "ul > li"));
    }

    #[test]
    fn test_closest() {
        let (tree, [section, div, _, b, _]) = fixture();
        let engine = SelectorEngine::new();
        assert_eq!(engine.closest(&tree, b, "div"), Some(div));
        assert_eq!(engine.closest(&tree, b, "b"), Some(b));
        assert_eq!(engine.closest(&tree, b, "section"), Some(section));
        assert_eq!(engine.closest(&tree, b, "table"), None);
    }

    #[test]
    fn test_children() {
        let (tree, [section, div, p, b, div2]) = fixture();
        let engine = SelectorEngine::new();
        assert_eq!(engine.children(&tree, &[section], None, false), vec![div, div2]);
        assert_eq!(engine.children(&tree, &[section], Some(".a"), false), vec![div]);
        assert_eq!(
            engine.children(&tree, &[section], None, true),
            vec![div, p, b, div2]
        );
        assert_eq!(engine.children(&tree, &[section, div], Some("p"), true), vec![p]);
    }

    #[test]
    fn test_parents() {
        let (tree, [section, div, p, b, _]) = fixture();
        let engine = SelectorEngine::new();
        assert_eq!(engine.parents(&tree, &[b], None, false), vec![p]);
        assert_eq!(engine.parents(&tree, &[b], None, true), vec![p, div, section]);
        assert_eq!(engine.parents(&tree, &[b, p], Some("div"), true), vec![div]);
        assert!(engine.parents(&tree, &[section], None, false).is_empty());
    }
}
