//! Selector list tokenizer
//!
//! Splits a raw selector string into clauses at top-level commas,
//! normalizes whitespace around combinators, drops repeated clauses and
//! hands each clause to the grammar parser.

use crate::error::{Result, SelectorError};
use crate::escape::{Glyph, hide};
use crate::parser::{ParseMode, parse_clause};
use crate::selector::SelectorNode;

/// A tokenized selector string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorList {
    /// Canonical form: clauses joined by `", "`, combinators spaced, usable
    /// as a cache or display key
    pub selector: String,
    /// One node per distinct clause, in first-seen order
    pub query: Vec<SelectorNode>,
}

impl SelectorList {
    /// True when the input held no selector text at all
    pub fn is_blank(&self) -> bool {
        self.selector.is_empty()
    }
}

/// Tokenize and parse a selector list. Never fails: defective clauses
/// become nodes that match nothing.
pub fn tokenize(selector: &str) -> SelectorList {
    tokenize_with(selector, ParseMode::Lenient).unwrap_or_default()
}

/// Tokenize and parse a selector list, reporting the first defect
pub fn tokenize_strict(selector: &str) -> Result<SelectorList> {
    tokenize_with(selector, ParseMode::Strict)
}

/// Tokenize with an explicit [`ParseMode`]. Only [`ParseMode::Strict`] can
/// return an error.
pub fn tokenize_with(selector: &str, mode: ParseMode) -> Result<SelectorList> {
    if selector.trim().is_empty() {
        return match mode {
            ParseMode::Strict => Err(SelectorError::Empty),
            ParseMode::Lenient => Ok(SelectorList {
                selector: String::new(),
                query: vec![SelectorNode::default()],
            }),
        };
    }

    let glyphs = hide(selector);
    let mut clauses: Vec<Vec<Glyph>> = Vec::new();
    for (position, raw) in glyphs.split(|g| g.is(',')).enumerate() {
        let clause = normalize(raw);
        if clause.is_empty() {
            if mode == ParseMode::Strict {
                return Err(SelectorError::EmptyClause { position });
            }
            continue;
        }
        if !clauses.contains(&clause) {
            clauses.push(clause);
        }
    }

    let rendered: Vec<String> = clauses.iter().map(|c| render(c)).collect();
    let query = clauses
        .iter()
        .map(|c| parse_clause(c, mode))
        .collect::<Result<Vec<_>>>()?;

    Ok(SelectorList {
        selector: rendered.join(", "),
        query,
    })
}

fn is_combinator(glyph: Glyph) -> bool {
    matches!(glyph, Glyph::Plain('>' | '+' | '~'))
}

/// Collapse top-level whitespace to one descendant space, dropping it at
/// the edges and next to explicit combinators
fn normalize(clause: &[Glyph]) -> Vec<Glyph> {
    let mut out: Vec<Glyph> = Vec::with_capacity(clause.len());
    let mut pending_space = false;

    for &glyph in clause {
        match glyph {
            Glyph::Plain(c) if c.is_whitespace() => pending_space = true,
            g if is_combinator(g) => {
                pending_space = false;
                out.push(g);
            }
            g => {
                if pending_space && out.last().is_some_and(|&last| !is_combinator(last)) {
                    out.push(Glyph::Plain(' '));
                }
                pending_space = false;
                out.push(g);
            }
        }
    }
    out
}

/// Canonical text of a normalized clause: explicit combinators get one
/// space on each side
fn render(clause: &[Glyph]) -> String {
    let mut out = String::with_capacity(clause.len() + 4);
    for &glyph in clause {
        if is_combinator(glyph) {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            out.push(glyph.as_char());
            out.push(' ');
        } else {
            out.push(glyph.as_char());
        }
    }
    out.truncate(out.trim_end().len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_spacing() {
        assert_eq!(tokenize("ul>li  +li").selector, "ul > li + li");
        assert_eq!(tokenize("  div \n\t p ").selector, "div p");
        assert_eq!(tokenize("a ~ b,c>d").selector, "a ~ b, c > d");
    }

    #[test]
    fn test_nested_text_untouched() {
        let list = tokenize("a:not(b  >c, d) , [title='x,  y']");
        assert_eq!(list.selector, "a:not(b  >c, d), [title='x,  y']");
        assert_eq!(list.query.len(), 2);
    }

    #[test]
    fn test_dedup_after_normalization() {
        let list = tokenize("a > b, a>b,a  >  b, c");
        assert_eq!(list.selector, "a > b, c");
        assert_eq!(list.query.len(), 2);
    }

    #[test]
    fn test_blank_is_single_wildcard() {
        for blank in ["", "   ", "\n"] {
            let list = tokenize(blank);
            assert!(list.is_blank());
            assert_eq!(list.query, vec![SelectorNode::default()]);
            assert!(list.query[0].is_wildcard());
        }
    }

    #[test]
    fn test_empty_clauses_dropped() {
        let list = tokenize("a,, b,");
        assert_eq!(list.selector, "a, b");
        assert_eq!(list.query.len(), 2);
    }

    #[test]
    fn test_leading_combinator_rendering() {
        let list = tokenize(">p");
        assert_eq!(list.selector, "> p");
        assert!(list.query[0].malformed);
    }

    #[test]
    fn test_strict_reports() {
        assert_eq!(tokenize_strict(" "), Err(SelectorError::Empty));
        assert_eq!(
            tokenize_strict("a,,b"),
            Err(SelectorError::EmptyClause { position: 1 })
        );
        assert_eq!(
            tokenize_strict("a >"),
            Err(SelectorError::DanglingCombinator { combinator: '>' })
        );
        assert!(tokenize_strict("div.x > p:first-child, #y").is_ok());
    }

    #[test]
    fn test_unknown_pseudo_is_not_a_syntax_error() {
        let list = tokenize_strict(":frobnicate").unwrap();
        assert_eq!(list.query[0].pseudos[0].name, "frobnicate");
    }

    #[test]
    fn test_idempotent() {
        for s in ["a>b , c", " x  y ", "a:not(b,c)+d", ">p", "a > > b", "[x] ~ y"] {
            let once = tokenize(s).selector;
            assert_eq!(tokenize(&once).selector, once, "{s:?}");
        }
    }
}
