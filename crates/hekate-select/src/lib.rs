//! Hekate selector engine
//!
//! Resolves CSS-subset selector strings against any labeled tree: tag, id,
//! class, attribute operators, pseudo-classes, the four combinators and
//! comma-separated selector lists.
//!
//! Pipeline, leaf to root:
//! - [`escape`] hides metacharacters nested in `(...)` / `[...]` blocks
//! - [`tokenize`] splits and normalizes a selector list
//! - the grammar parser turns each clause into a [`SelectorNode`] chain
//! - the context resolver narrows candidates through id/class/tag lookups
//! - the [`Matcher`] filters candidates and walks combinators
//! - the [`PseudoRegistry`] evaluates named pseudo-class predicates
//!
//! [`SelectorEngine`] ties these together and adds the traversal helpers
//! `filter`, `is`, `closest`, `children` and `parents`.
//!
//! Parsing never fails on the default path: malformed input yields
//! selectors that match nothing. [`tokenize_strict`] and
//! [`SelectorEngine::try_query`] report the defect instead.
//!
//! # Example
//! ```rust,ignore
//! use hekate_select::SelectorEngine;
//!
//! let doc = hekate_html::parse("<ul><li>a</li><li>b</li></ul>")?;
//! let engine = SelectorEngine::new();
//! let found = engine.query(doc.tree(), "ul > li + li", &[doc.tree().root()]);
//! assert_eq!(found.elements.len(), 1);
//! ```

mod cache;
mod config;
mod context;
mod dom;
mod engine;
mod error;
pub mod escape;
mod matcher;
mod nth;
mod parser;
mod pseudo;
mod selector;
mod tokenizer;
mod traverse;
mod tree;

pub use cache::{CacheStats, SelectorCache};
pub use config::EngineConfig;
pub use context::resolve_context;
pub use engine::{QueryResult, SelectorEngine};
pub use error::SelectorError;
pub use matcher::Matcher;
pub use nth::NthExpression;
pub use parser::ParseMode;
pub use pseudo::{MatchContext, PseudoFn, PseudoRegistry};
pub use selector::{
    AttributeFilter, AttributeOperator, Combinator, CombinatorKind, PseudoFilter, SelectorNode,
};
pub use tokenizer::{SelectorList, tokenize, tokenize_strict, tokenize_with};
pub use tree::{Indexable, Tree};
