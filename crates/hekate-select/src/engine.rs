//! Query entry points

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, trace};

use crate::cache::{self, CacheStats, SelectorCache};
use crate::config::EngineConfig;
use crate::error::{Result, SelectorError};
use crate::matcher::Matcher;
use crate::pseudo::{MatchContext, PseudoRegistry};
use crate::tokenizer::{SelectorList, tokenize_strict};
use crate::tree::Indexable;

/// Result of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult<H> {
    /// Canonical selector text
    pub selector: String,
    /// Matches in first-seen order, without duplicates
    pub elements: Vec<H>,
}

impl<H: Copy> QueryResult<H> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn first(&self) -> Option<H> {
        self.elements.first().copied()
    }
}

/// Selector engine bound to one tree type.
///
/// Owns the pseudo-class registry and a cache of parsed selectors. Queries
/// take `&self`, so one engine can serve many threads once registration is
/// done.
pub struct SelectorEngine<T: Indexable> {
    registry: PseudoRegistry<T>,
    config: EngineConfig,
    cache: Mutex<SelectorCache>,
}

impl<T: Indexable> SelectorEngine<T> {
    /// Engine with built-in pseudo-classes and default config
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_registry(PseudoRegistry::with_builtins(), config)
    }

    pub fn with_registry(registry: PseudoRegistry<T>, config: EngineConfig) -> Self {
        let cache = Mutex::new(SelectorCache::new(config.cache_capacity));
        Self {
            registry,
            config,
            cache,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &PseudoRegistry<T> {
        &self.registry
    }

    /// Register a pseudo-class, replacing any predicate under the same name
    pub fn register_pseudo<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&MatchContext<'_, T>, Option<&str>) -> bool + Send + Sync + 'static,
    {
        self.registry.register(name, predicate);
    }

    /// Tokenize `selector`, reusing a cached parse when present
    pub fn parse(&self, selector: &str) -> Arc<SelectorList> {
        cache::parse_shared(&self.cache, selector)
    }

    /// Matcher over `tree` sharing this engine's registry and parse cache
    pub(crate) fn matcher<'a>(&'a self, tree: &'a T) -> Matcher<'a, T> {
        Matcher::new(tree, &self.registry).with_cache(&self.cache)
    }

    /// Run `selector` below `roots`. Never fails; defective clauses match
    /// nothing and a blank selector returns no elements.
    pub fn query(&self, tree: &T, selector: &str, roots: &[T::Handle]) -> QueryResult<T::Handle> {
        let list = self.parse(selector);
        self.query_list(tree, &list, roots)
    }

    /// Like [`query`](Self::query) but reports selector defects and, when
    /// configured, pseudo-classes missing from the registry
    pub fn try_query(
        &self,
        tree: &T,
        selector: &str,
        roots: &[T::Handle],
    ) -> Result<QueryResult<T::Handle>> {
        let list = tokenize_strict(selector)?;
        if self.config.report_unknown_pseudos {
            let unknown = list
                .query
                .iter()
                .flat_map(|node| node.chain())
                .flat_map(|node| &node.pseudos)
                .find(|pseudo| !self.registry.contains(&pseudo.name));
            if let Some(pseudo) = unknown {
                return Err(SelectorError::UnknownPseudo(pseudo.name.clone()));
            }
        }
        Ok(self.query_list(tree, &list, roots))
    }

    /// Run a pre-tokenized list
    pub fn query_list(
        &self,
        tree: &T,
        list: &SelectorList,
        roots: &[T::Handle],
    ) -> QueryResult<T::Handle> {
        if list.is_blank() {
            return QueryResult {
                selector: String::new(),
                elements: Vec::new(),
            };
        }

        let matcher = self.matcher(tree);
        let mut seen = HashSet::new();
        let mut elements = Vec::new();
        for (index, node) in list.query.iter().enumerate() {
            let found = matcher.select(node, roots);
            trace!(clause = index, matched = found.len(), "clause done");
            elements.extend(found.into_iter().filter(|&el| seen.insert(el)));
        }

        debug!(
            selector = %list.selector,
            clauses = list.query.len(),
            results = elements.len(),
            "query"
        );
        QueryResult {
            selector: list.selector.clone(),
            elements,
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.lock_cache().stats()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> MutexGuard<'_, SelectorCache> {
        cache::lock(&self.cache)
    }
}

impl<T: Indexable> Default for SelectorEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hekate_dom::{DomTree, NodeId};

    fn tree_with(tags: &[&str]) -> (DomTree, Vec<NodeId>) {
        let mut tree = DomTree::new();
        let root = tree.root();
        let ids = tags
            .iter()
            .map(|tag| {
                let el = tree.create_element(tag);
                tree.append_child(root, el).unwrap();
                el
            })
            .collect();
        (tree, ids)
    }

    #[test]
    fn test_parse_is_cached() {
        let engine: SelectorEngine<DomTree> = SelectorEngine::new();
        let a = engine.parse("div > p");
        let b = engine.parse("div > p");
        assert!(Arc::ptr_eq(&a, &b));
        let stats = engine.cache_stats();
        assert_eq!((stats.entries, stats.hits, stats.misses), (1, 1, 1));
        engine.clear_cache();
        assert_eq!(engine.cache_stats().entries, 0);
    }

    #[test]
    fn test_negation_argument_parsed_once() {
        let (tree, ids) = tree_with(&["a", "a", "b"]);
        let engine = SelectorEngine::new();
        let result = engine.query(&tree, ":not(b)", &[tree.root()]);
        assert_eq!(result.elements, ids[..2]);
        let stats = engine.cache_stats();
        // ":not(b)" and "b" each parsed once, "b" reused for later candidates
        assert_eq!((stats.entries, stats.hits, stats.misses), (2, 2, 2));
    }

    #[test]
    fn test_union_dedups_in_first_seen_order() {
        let (tree, ids) = tree_with(&["a", "b", "c"]);
        let engine = SelectorEngine::new();
        let result = engine.query(&tree, "c, a, c, *", &[tree.root()]);
        assert_eq!(result.selector, "c, a, *");
        assert_eq!(result.elements, vec![ids[2], ids[0], ids[1]]);
        assert_eq!(result.first(), Some(ids[2]));
    }

    #[test]
    fn test_blank_selector_returns_nothing() {
        let (tree, _) = tree_with(&["a"]);
        let engine = SelectorEngine::new();
        let result = engine.query(&tree, "  ", &[tree.root()]);
        assert!(result.is_empty());
        assert_eq!(result.selector, "");
    }

    #[test]
    fn test_try_query_reports() {
        let (tree, _) = tree_with(&["a"]);
        let engine = SelectorEngine::new();
        let root = [tree.root()];
        assert_eq!(
            engine.try_query(&tree, "a >", &root),
            Err(SelectorError::DanglingCombinator { combinator: '>' })
        );
        assert_eq!(
            engine.try_query(&tree, "a > b:frobnicate", &root),
            Err(SelectorError::UnknownPseudo("frobnicate".to_string()))
        );
        assert_eq!(engine.try_query(&tree, "a", &root).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_pseudos_allowed_when_configured() {
        let (tree, _) = tree_with(&["a"]);
        let engine = SelectorEngine::with_config(EngineConfig {
            report_unknown_pseudos: false,
            ..Default::default()
        });
        let result = engine.try_query(&tree, "a:frobnicate", &[tree.root()]).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_register_pseudo_overwrites() {
        let (tree, _) = tree_with(&["a", "b"]);
        let mut engine = SelectorEngine::new();
        engine.register_pseudo("empty", |_, _| false);
        assert!(engine.query(&tree, ":empty", &[tree.root()]).is_empty());
        engine.register_pseudo("empty", |_, _| true);
        assert_eq!(engine.query(&tree, ":empty", &[tree.root()]).len(), 2);
    }

    #[test]
    fn test_zero_capacity_still_queries() {
        let (tree, _) = tree_with(&["a"]);
        let engine = SelectorEngine::with_config(EngineConfig {
            cache_capacity: 0,
            ..Default::default()
        });
        assert_eq!(engine.query(&tree, "a", &[tree.root()]).len(), 1);
        assert_eq!(engine.cache_stats().entries, 0);
    }
}
