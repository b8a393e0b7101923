//! Clause grammar
//!
//! ```text
//! clause   := compound (combinator compound)*
//! compound := tag? (#id | .class | [attribute] | :pseudo | :pseudo(arg))*
//! ```
//!
//! Input is one normalized clause: blocks already hidden, top-level
//! whitespace collapsed to a single descendant space and no spaces around
//! `>`, `+` or `~`.

use tracing::debug;

use crate::error::{Result, SelectorError};
use crate::escape::{Glyph, reveal};
use crate::selector::{
    AttributeFilter, AttributeOperator, Combinator, CombinatorKind, PseudoFilter, SelectorNode,
};

/// How defects in selector text are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Defective clauses become nodes that match nothing
    #[default]
    Lenient,
    /// The first defect is returned as an error
    Strict,
}

/// Parse one clause
pub(crate) fn parse_clause(clause: &[Glyph], mode: ParseMode) -> Result<SelectorNode> {
    match parse_chain(clause) {
        Ok(node) => Ok(node),
        Err(err) if mode == ParseMode::Lenient => {
            debug!(clause = %reveal(clause), %err, "malformed selector clause");
            Ok(SelectorNode {
                malformed: true,
                ..Default::default()
            })
        }
        Err(err) => Err(err),
    }
}

fn parse_chain(clause: &[Glyph]) -> Result<SelectorNode> {
    // Split at top-level combinators: compound (kind compound)*
    let mut compounds = Vec::new();
    let mut kinds = Vec::new();
    let mut start = 0;
    for (i, glyph) in clause.iter().enumerate() {
        if let Glyph::Plain(c) = *glyph
            && let Some(kind) = CombinatorKind::from_char(c)
        {
            compounds.push(&clause[start..i]);
            kinds.push(kind);
            start = i + 1;
        }
    }
    compounds.push(&clause[start..]);

    for (i, kind) in kinds.iter().enumerate() {
        if compounds[i].is_empty() || compounds[i + 1].is_empty() {
            return Err(SelectorError::DanglingCombinator {
                combinator: kind.as_char(),
            });
        }
    }

    // Fold from the right so each node links to the one after it
    let mut next: Option<SelectorNode> = None;
    for (i, compound) in compounds.iter().enumerate().rev() {
        let mut node = parse_compound(compound)?;
        if let Some(following) = next.take() {
            node.combinator = Some(Box::new(Combinator {
                kind: kinds[i],
                next: following,
            }));
        }
        next = Some(node);
    }
    next.ok_or(SelectorError::EmptyClause { position: 0 })
}

/// Characters that end a tag, id or class name
fn is_marker(glyph: Glyph) -> bool {
    matches!(
        glyph,
        Glyph::Plain('#' | '.' | '[' | ']' | ':' | '(' | ')')
    )
}

fn is_pseudo_name_char(glyph: Glyph) -> bool {
    matches!(glyph, Glyph::Plain(c) if c.is_alphanumeric() || c == '-' || c == '_')
}

/// Index of the closer of a hidden block opened at `open`.
/// A balanced block holds no plain glyphs, so the first plain one decides.
fn block_end(compound: &[Glyph], open: usize, closer: char) -> Option<usize> {
    compound[open + 1..]
        .iter()
        .position(|g| matches!(g, Glyph::Plain(_)))
        .map(|offset| open + 1 + offset)
        .filter(|&end| compound[end].is(closer))
}

fn name_end(compound: &[Glyph], from: usize, accept: impl Fn(Glyph) -> bool) -> usize {
    compound[from..]
        .iter()
        .position(|&g| !accept(g))
        .map_or(compound.len(), |offset| from + offset)
}

fn parse_compound(compound: &[Glyph]) -> Result<SelectorNode> {
    let mut node = SelectorNode::default();

    let mut i = name_end(compound, 0, |g| !is_marker(g));
    if i > 0 {
        node.tag = Some(reveal(&compound[..i]));
    }

    while i < compound.len() {
        match compound[i] {
            Glyph::Plain(marker @ ('#' | '.')) => {
                let end = name_end(compound, i + 1, |g| !is_marker(g));
                if end == i + 1 {
                    return Err(SelectorError::EmptyName { marker });
                }
                let name = reveal(&compound[i + 1..end]);
                if marker == '#' {
                    // A later id replaces an earlier one
                    node.id = Some(name);
                } else {
                    node.classes.push(name);
                }
                i = end;
            }
            Glyph::Plain('[') => {
                let end = block_end(compound, i, ']')
                    .ok_or(SelectorError::Unbalanced { delimiter: '[' })?;
                node.attributes
                    .push(parse_attribute(&reveal(&compound[i + 1..end]))?);
                i = end + 1;
            }
            Glyph::Plain(':') => {
                let end = name_end(compound, i + 1, is_pseudo_name_char);
                if end == i + 1 {
                    return Err(SelectorError::EmptyName { marker: ':' });
                }
                let name = reveal(&compound[i + 1..end]);
                let mut argument = None;
                i = end;
                if compound.get(i).is_some_and(|g| g.is('(')) {
                    let close = block_end(compound, i, ')')
                        .ok_or(SelectorError::Unbalanced { delimiter: '(' })?;
                    argument = Some(reveal(&compound[i + 1..close]));
                    i = close + 1;
                }
                node.pseudos.push(PseudoFilter { name, argument });
            }
            Glyph::Plain(c @ ('(' | ')' | ']')) => {
                return Err(SelectorError::UnexpectedToken {
                    token: c.to_string(),
                    selector: reveal(compound),
                });
            }
            _ => return Err(SelectorError::InvalidTag(reveal(compound))),
        }
    }

    Ok(node)
}

/// `name`, `name=value`, `name op= value`, with optional `i`/`s` flag.
/// Values may be bare or quoted with `'` or `"`.
pub(crate) fn parse_attribute(body: &str) -> Result<AttributeFilter> {
    let malformed = || SelectorError::MalformedAttribute(body.to_string());
    let text = body.trim();

    let name_len = text
        .find(|c: char| c.is_whitespace() || "\"'|~!$^*>/=".contains(c))
        .unwrap_or(text.len());
    if name_len == 0 {
        return Err(malformed());
    }
    let name = &text[..name_len];
    let rest = text[name_len..].trim_start();
    if rest.is_empty() {
        return Ok(AttributeFilter::exists(name));
    }

    let (operator, rest) = if let Some(rest) = rest.strip_prefix('=') {
        (AttributeOperator::Exact, rest)
    } else {
        let mut chars = rest.chars();
        let op = chars
            .next()
            .and_then(AttributeOperator::from_char)
            .ok_or_else(malformed)?;
        let rest = chars.as_str().strip_prefix('=').ok_or_else(malformed)?;
        (op, rest)
    };

    let rest = rest.trim_start();
    let (value, rest) = match rest.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let inner = &rest[1..];
            let end = inner.find(quote).ok_or_else(malformed)?;
            (&inner[..end], &inner[end + 1..])
        }
        Some(_) => {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            (&rest[..end], &rest[end..])
        }
        None => return Err(malformed()),
    };

    let case_sensitive = match rest.trim() {
        "" | "s" | "S" => true,
        "i" | "I" => false,
        _ => return Err(malformed()),
    };

    Ok(AttributeFilter {
        name: name.to_string(),
        operator,
        value: value.to_string(),
        case_sensitive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::hide;

    fn parse(clause: &str) -> Result<SelectorNode> {
        parse_clause(&hide(clause), ParseMode::Strict)
    }

    #[test]
    fn test_compound() {
        let node = parse("a#top.x.y[href]:first-child").unwrap();
        assert_eq!(node.tag.as_deref(), Some("a"));
        assert_eq!(node.id.as_deref(), Some("top"));
        assert_eq!(node.classes, vec!["x", "y"]);
        assert_eq!(node.attributes, vec![AttributeFilter::exists("href")]);
        assert_eq!(node.pseudos[0].name, "first-child");
        assert_eq!(node.pseudos[0].argument, None);
        assert!(node.combinator.is_none());
    }

    #[test]
    fn test_last_id_wins() {
        let node = parse("#a#b").unwrap();
        assert_eq!(node.id.as_deref(), Some("b"));
    }

    #[test]
    fn test_chain_links_rightward() {
        let node = parse("ul>li+li").unwrap();
        assert_eq!(node.tag.as_deref(), Some("ul"));
        let child = node.combinator.as_ref().unwrap();
        assert_eq!(child.kind, CombinatorKind::Child);
        assert_eq!(child.next.tag.as_deref(), Some("li"));
        let sibling = child.next.combinator.as_ref().unwrap();
        assert_eq!(sibling.kind, CombinatorKind::NextSibling);
        assert!(sibling.next.combinator.is_none());
        assert_eq!(node.chain().count(), 3);
    }

    #[test]
    fn test_descendant_and_subsequent() {
        let node = parse("div p~span").unwrap();
        let kinds: Vec<_> = node
            .chain()
            .filter_map(|n| n.combinator.as_ref().map(|c| c.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![CombinatorKind::Descendant, CombinatorKind::SubsequentSiblings]
        );
    }

    #[test]
    fn test_pseudo_argument_verbatim() {
        let node = parse(":not(.a > b, c)").unwrap();
        assert_eq!(node.pseudos[0].name, "not");
        assert_eq!(node.pseudos[0].argument.as_deref(), Some(".a > b, c"));
        assert!(node.combinator.is_none());
    }

    #[test]
    fn test_tag_alternatives_kept() {
        let node = parse("h1|h2").unwrap();
        assert_eq!(node.tag.as_deref(), Some("h1|h2"));
    }

    #[test]
    fn test_attribute_grammar() {
        let f = parse_attribute(r#"data-state^="active""#).unwrap();
        assert_eq!(f.name, "data-state");
        assert_eq!(f.operator, AttributeOperator::Prefix);
        assert_eq!(f.value, "active");
        assert!(f.case_sensitive);

        let f = parse_attribute("type = text i").unwrap();
        assert_eq!(f.operator, AttributeOperator::Exact);
        assert_eq!(f.value, "text");
        assert!(!f.case_sensitive);

        let f = parse_attribute("lang|='en's").unwrap();
        assert_eq!(f.operator, AttributeOperator::LangPrefix);
        assert_eq!(f.value, "en");
        assert!(f.case_sensitive);

        let f = parse_attribute(r#"title="a b]c""#).unwrap();
        assert_eq!(f.value, "a b]c");

        let f = parse_attribute(r#"alt="""#).unwrap();
        assert_eq!(f.operator, AttributeOperator::Exact);
        assert_eq!(f.value, "");
    }

    #[test]
    fn test_malformed_attributes() {
        for body in ["", "=x", "a=", "a~b", "a='b", "a=b c d", "a=b x"] {
            assert!(
                matches!(
                    parse_attribute(body),
                    Err(SelectorError::MalformedAttribute(_))
                ),
                "{body:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_strict_defects() {
        assert_eq!(
            parse("div>").unwrap_err(),
            SelectorError::DanglingCombinator { combinator: '>' }
        );
        assert_eq!(
            parse(">p").unwrap_err(),
            SelectorError::DanglingCombinator { combinator: '>' }
        );
        assert_eq!(
            parse("a+~b").unwrap_err(),
            SelectorError::DanglingCombinator { combinator: '+' }
        );
        assert_eq!(parse("a.").unwrap_err(), SelectorError::EmptyName { marker: '.' });
        assert_eq!(parse("#").unwrap_err(), SelectorError::EmptyName { marker: '#' });
        assert_eq!(parse(":(x)").unwrap_err(), SelectorError::EmptyName { marker: ':' });
        assert_eq!(
            parse("a:not(b").unwrap_err(),
            SelectorError::Unbalanced { delimiter: '(' }
        );
        assert_eq!(
            parse("[a").unwrap_err(),
            SelectorError::Unbalanced { delimiter: '[' }
        );
        assert!(matches!(
            parse("[a]div").unwrap_err(),
            SelectorError::InvalidTag(_)
        ));
        assert!(matches!(
            parse("div)").unwrap_err(),
            SelectorError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn test_lenient_marks_malformed() {
        let node = parse_clause(&hide("div>"), ParseMode::Lenient).unwrap();
        assert!(node.malformed);
        assert!(node.combinator.is_none());
    }
}
