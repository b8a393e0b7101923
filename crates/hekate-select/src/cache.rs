//! Parsed selector cache
//!
//! Memoizes tokenized selector lists by raw selector text. Parsed lists hold
//! no element references, so one entry serves every tree.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::tokenizer::{SelectorList, tokenize};

/// Bounded FIFO cache of parsed selector lists
#[derive(Debug, Default)]
pub struct SelectorCache {
    /// Cached lists by raw selector text
    entries: HashMap<String, Arc<SelectorList>>,
    /// Insertion order, oldest first
    order: VecDeque<String>,
    /// Maximum entries; zero disables caching
    max_entries: usize,
    hits: u64,
    misses: u64,
}

impl SelectorCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Default::default()
        }
    }

    /// Look up a selector, counting the hit or miss
    pub fn get(&mut self, selector: &str) -> Option<Arc<SelectorList>> {
        match self.entries.get(selector) {
            Some(list) => {
                self.hits += 1;
                Some(Arc::clone(list))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a parsed list
    pub fn insert(&mut self, selector: &str, list: Arc<SelectorList>) {
        if self.max_entries == 0 {
            return;
        }
        if self.entries.contains_key(selector) {
            self.entries.insert(selector.to_string(), list);
            return;
        }
        // Evict if at capacity
        while self.entries.len() >= self.max_entries {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.order.push_back(selector.to_string());
        self.entries.insert(selector.to_string(), list);
    }

    /// Drop every entry; counters are kept
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stats
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

/// Lock a shared cache. The cache holds no invariant a panic could break,
/// so a poisoned lock is taken over.
pub(crate) fn lock(cache: &Mutex<SelectorCache>) -> MutexGuard<'_, SelectorCache> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Tokenize `selector`, reusing a cached parse when present
pub(crate) fn parse_shared(cache: &Mutex<SelectorCache>, selector: &str) -> Arc<SelectorList> {
    let mut guard = lock(cache);
    if let Some(list) = guard.get(selector) {
        return list;
    }
    let list = Arc::new(tokenize(selector));
    guard.insert(selector, Arc::clone(&list));
    list
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}
