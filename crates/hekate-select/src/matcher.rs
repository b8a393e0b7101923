//! Candidate filtering and combinator walking

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::cache::{SelectorCache, parse_shared};
use crate::context::resolve_context;
use crate::pseudo::{MatchContext, PseudoRegistry};
use crate::selector::{CombinatorKind, SelectorNode};
use crate::tokenizer::{SelectorList, tokenize};
use crate::tree::Indexable;

/// Evaluates parsed selector nodes against a tree
pub struct Matcher<'a, T: Indexable> {
    tree: &'a T,
    registry: &'a PseudoRegistry<T>,
    cache: Option<&'a Mutex<SelectorCache>>,
}

impl<T: Indexable> Clone for Matcher<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Indexable> Copy for Matcher<'_, T> {}

impl<'a, T: Indexable> Matcher<'a, T> {
    pub fn new(tree: &'a T, registry: &'a PseudoRegistry<T>) -> Self {
        Self {
            tree,
            registry,
            cache: None,
        }
    }

    /// Parse nested selector arguments through `cache`
    pub(crate) fn with_cache(self, cache: &'a Mutex<SelectorCache>) -> Self {
        Self {
            cache: Some(cache),
            ..self
        }
    }

    /// Tokenize a selector met while matching, such as a `:not()` argument
    pub fn parse(&self, selector: &str) -> Arc<SelectorList> {
        match self.cache {
            Some(cache) => parse_shared(cache, selector),
            None => Arc::new(tokenize(selector)),
        }
    }

    pub fn tree(&self) -> &'a T {
        self.tree
    }

    pub fn registry(&self) -> &'a PseudoRegistry<T> {
        self.registry
    }

    /// Every element below `roots` that satisfies the whole chain of `node`
    pub fn select(&self, node: &SelectorNode, roots: &[T::Handle]) -> Vec<T::Handle> {
        self.filter(node, &resolve_context(self.tree, node, roots))
    }

    /// Map [`match_element`](Self::match_element) over `candidates`
    pub fn filter(&self, node: &SelectorNode, candidates: &[T::Handle]) -> Vec<T::Handle> {
        candidates
            .iter()
            .flat_map(|&el| self.match_element(node, el))
            .collect()
    }

    /// Match `element` against the first link of `node`.
    ///
    /// Without a combinator the result is `[element]` or nothing. With one,
    /// the result is whatever the rest of the chain matches along the
    /// combinator's axis, so only elements satisfying the entire chain are
    /// returned.
    pub fn match_element(&self, node: &SelectorNode, element: T::Handle) -> Vec<T::Handle> {
        if !self.matches_compound(node, element) {
            return Vec::new();
        }
        match node.combinator.as_deref() {
            None => vec![element],
            Some(combinator) => {
                let next = &combinator.next;
                let axis = match combinator.kind {
                    CombinatorKind::Descendant => resolve_context(self.tree, next, &[element]),
                    CombinatorKind::Child => self.tree.element_children(element),
                    CombinatorKind::NextSibling => {
                        self.tree.next_element_sibling(element).into_iter().collect()
                    }
                    CombinatorKind::SubsequentSiblings => self.subsequent_siblings(element),
                };
                self.filter(next, &axis)
            }
        }
    }

    /// Check tag, id, classes, attributes and pseudo-classes, ignoring any
    /// combinator
    pub fn matches_compound(&self, node: &SelectorNode, element: T::Handle) -> bool {
        let tree = self.tree;
        if node.malformed || !tree.is_element(element) {
            return false;
        }
        if !node.tag_matches(tree.tag_name(element)) {
            return false;
        }
        if let Some(id) = node.id.as_deref()
            && tree.element_id(element) != Some(id)
        {
            return false;
        }
        if !node.classes.iter().all(|c| tree.has_class(element, c)) {
            return false;
        }
        if !node
            .attributes
            .iter()
            .all(|a| a.matches(tree.attribute(element, &a.name)))
        {
            return false;
        }

        let cx = MatchContext::new(*self, element);
        node.pseudos.iter().all(|pseudo| {
            match self.registry.resolve(&pseudo.name) {
                Some(predicate) => predicate(&cx, pseudo.argument.as_deref()),
                None => {
                    debug!(name = %pseudo.name, "unknown pseudo-class, treating as always true");
                    true
                }
            }
        })
    }

    /// Element siblings after `element`; empty without a parent
    fn subsequent_siblings(&self, element: T::Handle) -> Vec<T::Handle> {
        if self.tree.parent(element).is_none() {
            return Vec::new();
        }
        std::iter::successors(self.tree.next_element_sibling(element), |&sib| {
            self.tree.next_element_sibling(sib)
        })
        .collect()
    }
}
