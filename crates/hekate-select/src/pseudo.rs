//! Pseudo-class registry
//!
//! Maps names to predicates evaluated against a candidate element. Lookup
//! tries the name verbatim, then lowercased, then camel-cased
//! (`first-child` → `firstChild`). Names that resolve to nothing are
//! treated as always true by the matcher.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::matcher::Matcher;
use crate::nth::NthExpression;
use crate::tree::Indexable;

/// Predicate invoked with the candidate element and the raw argument text
pub type PseudoFn<T> = Arc<dyn Fn(&MatchContext<'_, T>, Option<&str>) -> bool + Send + Sync>;

/// The element under test, plus the matcher evaluating it
pub struct MatchContext<'a, T: Indexable> {
    matcher: Matcher<'a, T>,
    element: T::Handle,
}

impl<'a, T: Indexable> MatchContext<'a, T> {
    pub(crate) fn new(matcher: Matcher<'a, T>, element: T::Handle) -> Self {
        Self { matcher, element }
    }

    pub fn tree(&self) -> &'a T {
        self.matcher.tree()
    }

    pub fn element(&self) -> T::Handle {
        self.element
    }

    /// True if the element satisfies any clause of `selector`, evaluated
    /// with the element as the first link of each chain
    pub fn matches(&self, selector: &str) -> bool {
        let list = self.matcher.parse(selector);
        if list.is_blank() {
            return false;
        }
        list.query
            .iter()
            .any(|node| !self.matcher.match_element(node, self.element).is_empty())
    }

    /// 1-based position among element siblings
    pub fn position(&self) -> i32 {
        let tree = self.tree();
        std::iter::successors(tree.previous_element_sibling(self.element), |&prev| {
            tree.previous_element_sibling(prev)
        })
        .count() as i32
            + 1
    }

    /// 1-based position counted from the last element sibling
    pub fn position_from_end(&self) -> i32 {
        let tree = self.tree();
        std::iter::successors(tree.next_element_sibling(self.element), |&next| {
            tree.next_element_sibling(next)
        })
        .count() as i32
            + 1
    }

    fn attribute(&self, name: &str) -> Option<&'a str> {
        self.tree().attribute(self.element, name)
    }

    fn has_parent(&self) -> bool {
        self.tree().parent(self.element).is_some()
    }
}

/// Named pseudo-class predicates
pub struct PseudoRegistry<T: Indexable> {
    entries: HashMap<String, PseudoFn<T>>,
}

impl<T: Indexable> PseudoRegistry<T> {
    /// Registry with no entries; every pseudo-class is permissive
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry holding the built-in pseudo-classes
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry);
        registry
    }

    /// Add or replace a predicate
    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&MatchContext<'_, T>, Option<&str>) -> bool + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Arc::new(predicate));
    }

    /// Remove a predicate, returning it if present
    pub fn unregister(&mut self, name: &str) -> Option<PseudoFn<T>> {
        self.entries.remove(name)
    }

    /// Find the predicate for `name`
    pub fn resolve(&self, name: &str) -> Option<&PseudoFn<T>> {
        if let Some(f) = self.entries.get(name) {
            return Some(f);
        }
        let lower = name.to_ascii_lowercase();
        if let Some(f) = self.entries.get(&lower) {
            return Some(f);
        }
        self.entries.get(&camel_case(&lower))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Indexable> Default for PseudoRegistry<T> {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl<T: Indexable> Clone for PseudoRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T: Indexable> fmt::Debug for PseudoRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PseudoRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// `first-child` → `firstChild`
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn is_form_control(tag: &str) -> bool {
    ["button", "input", "select", "textarea"]
        .iter()
        .any(|t| t.eq_ignore_ascii_case(tag))
}

fn type_is<T: Indexable>(cx: &MatchContext<'_, T>, kind: &str) -> bool {
    cx.attribute("type")
        .is_some_and(|t| t.eq_ignore_ascii_case(kind))
}

/// Strip one pair of matching outer quotes
fn unquote(arg: &str) -> &str {
    let arg = arg.trim();
    for q in ['"', '\''] {
        if let Some(inner) = arg.strip_prefix(q).and_then(|a| a.strip_suffix(q)) {
            return inner;
        }
    }
    arg
}

fn register_builtins<T: Indexable>(r: &mut PseudoRegistry<T>) {
    r.register("button", |cx, _| {
        cx.tree().tag_name(cx.element()).eq_ignore_ascii_case("button") || type_is(cx, "button")
    });
    r.register("checked", |cx, _| cx.attribute("checked").is_some());
    r.register("checkbox", |cx, _| type_is(cx, "checkbox"));
    r.register("radio", |cx, _| type_is(cx, "radio"));
    r.register("contains", |cx, arg| {
        let needle = unquote(arg.unwrap_or(""));
        match cx.attribute("value").filter(|v| !v.is_empty()) {
            Some(value) => value.contains(needle),
            None => cx.tree().text_content(cx.element()).contains(needle),
        }
    });
    r.register("data", |cx, arg| {
        let Some(name) = arg.map(unquote).filter(|n| !n.is_empty()) else {
            return false;
        };
        cx.attribute(&format!("data-{name}"))
            .is_some_and(|v| !v.is_empty())
    });
    r.register("disabled", |cx, _| cx.attribute("disabled").is_some());
    r.register("enabled", |cx, _| {
        is_form_control(cx.tree().tag_name(cx.element())) && cx.attribute("disabled").is_none()
    });
    r.register("empty", |cx, _| !cx.tree().has_child_nodes(cx.element()));
    r.register("input", |cx, _| {
        is_form_control(cx.tree().tag_name(cx.element()))
    });
    r.register("first-child", |cx, _| {
        cx.has_parent() && cx.tree().previous_element_sibling(cx.element()).is_none()
    });
    r.register("last-child", |cx, _| {
        cx.has_parent() && cx.tree().next_element_sibling(cx.element()).is_none()
    });
    r.register("only-child", |cx, _| {
        let tree = cx.tree();
        cx.has_parent()
            && tree.previous_element_sibling(cx.element()).is_none()
            && tree.next_element_sibling(cx.element()).is_none()
    });
    r.register("nth-child", |cx, arg| {
        cx.has_parent()
            && arg
                .and_then(NthExpression::parse)
                .is_some_and(|nth| nth.matches(cx.position()))
    });
    r.register("nth-last-child", |cx, arg| {
        cx.has_parent()
            && arg
                .and_then(NthExpression::parse)
                .is_some_and(|nth| nth.matches(cx.position_from_end()))
    });
    r.register("not", |cx, arg| !arg.is_some_and(|list| cx.matches(list)));
    r.register("root", |cx, _| {
        let tree = cx.tree();
        tree.parent(cx.element())
            .is_some_and(|parent| !tree.is_element(parent))
    });
}
