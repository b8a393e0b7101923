//! Parsed selector data model

/// One clause of a selector list, possibly chained through a combinator.
///
/// A node with no filters and no combinator matches every element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorNode {
    /// `*` or `|`-separated alternatives
    pub tag: Option<String>,
    pub id: Option<String>,
    /// All must be present
    pub classes: Vec<String>,
    /// All must match
    pub attributes: Vec<AttributeFilter>,
    /// All must hold
    pub pseudos: Vec<PseudoFilter>,
    pub combinator: Option<Box<Combinator>>,
    /// Set when the clause text was defective; such a node matches nothing
    pub malformed: bool,
}

impl SelectorNode {
    /// True if this node places no constraint at all
    pub fn is_wildcard(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.pseudos.is_empty()
            && self.combinator.is_none()
            && !self.malformed
    }

    /// Tag filter check, ASCII case-insensitive
    pub fn tag_matches(&self, tag_name: &str) -> bool {
        match self.tag.as_deref() {
            None | Some("*") => true,
            Some(tags) => tags
                .split('|')
                .any(|t| t == "*" || t.eq_ignore_ascii_case(tag_name)),
        }
    }

    /// Iterate over this node and every node chained after it
    pub fn chain(&self) -> impl Iterator<Item = &SelectorNode> {
        std::iter::successors(Some(self), |node| node.combinator.as_deref().map(|c| &c.next))
    }
}

/// Structural relation between two chained nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combinator {
    pub kind: CombinatorKind,
    pub next: SelectorNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombinatorKind {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSiblings,
}

impl CombinatorKind {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' => Some(Self::Descendant),
            '>' => Some(Self::Child),
            '+' => Some(Self::NextSibling),
            '~' => Some(Self::SubsequentSiblings),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Descendant => ' ',
            Self::Child => '>',
            Self::NextSibling => '+',
            Self::SubsequentSiblings => '~',
        }
    }
}

/// Attribute selector `[name op value flag]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    pub name: String,
    pub operator: AttributeOperator,
    /// Empty for [`AttributeOperator::Exists`]
    pub value: String,
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeOperator {
    /// `[attr]`
    Exists,
    /// `[attr=value]`
    Exact,
    /// `[attr~=value]` - whitespace-separated list contains
    WordMatch,
    /// `[attr!=value]` - present and different
    Negate,
    /// `[attr^=value]`
    Prefix,
    /// `[attr$=value]`
    Suffix,
    /// `[attr*=value]`
    Substring,
    /// `[attr|=value]` - exact or prefix with hyphen
    LangPrefix,
}

impl AttributeOperator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '~' => Some(Self::WordMatch),
            '!' => Some(Self::Negate),
            '^' => Some(Self::Prefix),
            '$' => Some(Self::Suffix),
            '*' => Some(Self::Substring),
            '|' => Some(Self::LangPrefix),
            _ => None,
        }
    }
}

impl AttributeFilter {
    /// Presence-only filter
    pub fn exists(name: &str) -> Self {
        Self {
            name: name.to_string(),
            operator: AttributeOperator::Exists,
            value: String::new(),
            case_sensitive: true,
        }
    }

    /// Check an attribute value (`None` when the attribute is absent)
    pub fn matches(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        if self.operator == AttributeOperator::Exists {
            return true;
        }

        let (actual, expected) = if self.case_sensitive {
            (actual.into(), self.value.as_str().into())
        } else {
            (actual.to_lowercase(), self.value.to_lowercase())
        };
        let (actual, expected): (String, String) = (actual, expected);

        match self.operator {
            AttributeOperator::Exists => true,
            AttributeOperator::Exact => actual == expected,
            AttributeOperator::Negate => actual != expected,
            AttributeOperator::WordMatch => actual.split_ascii_whitespace().any(|w| w == expected),
            AttributeOperator::LangPrefix => {
                actual == expected
                    || actual
                        .strip_prefix(expected.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            // An empty needle matches nothing for the substring family
            AttributeOperator::Prefix => !expected.is_empty() && actual.starts_with(&expected),
            AttributeOperator::Suffix => !expected.is_empty() && actual.ends_with(&expected),
            AttributeOperator::Substring => !expected.is_empty() && actual.contains(&expected),
        }
    }
}

/// Pseudo-class reference, resolved against the registry at match time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoFilter {
    pub name: String,
    /// Raw text between the parentheses, if any
    pub argument: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(op: AttributeOperator, value: &str) -> AttributeFilter {
        AttributeFilter {
            name: "data-state".to_string(),
            operator: op,
            value: value.to_string(),
            case_sensitive: true,
        }
    }

    #[test]
    fn test_attribute_operators() {
        let v = Some("active-now");
        assert!(filter(AttributeOperator::Prefix, "active").matches(v));
        assert!(filter(AttributeOperator::Suffix, "now").matches(v));
        assert!(filter(AttributeOperator::Substring, "tive-n").matches(v));
        assert!(!filter(AttributeOperator::Exact, "active").matches(v));
        assert!(filter(AttributeOperator::Negate, "active").matches(v));
        assert!(!filter(AttributeOperator::Negate, "active").matches(None));
        assert!(filter(AttributeOperator::LangPrefix, "active").matches(v));
        assert!(!filter(AttributeOperator::LangPrefix, "act").matches(v));
    }

    #[test]
    fn test_word_match() {
        let f = filter(AttributeOperator::WordMatch, "b");
        assert!(f.matches(Some("a b c")));
        assert!(!f.matches(Some("abc")));
        assert!(!f.matches(Some("")));
    }

    #[test]
    fn test_case_flag() {
        let mut f = filter(AttributeOperator::Exact, "TEXT");
        assert!(!f.matches(Some("text")));
        f.case_sensitive = false;
        assert!(f.matches(Some("text")));
    }

    #[test]
    fn test_exists_and_empty_needle() {
        assert!(AttributeFilter::exists("disabled").matches(Some("")));
        assert!(!AttributeFilter::exists("disabled").matches(None));
        assert!(!filter(AttributeOperator::Prefix, "").matches(Some("x")));
        assert!(filter(AttributeOperator::Exact, "").matches(Some("")));
    }

    #[test]
    fn test_tag_alternatives() {
        let node = SelectorNode {
            tag: Some("h1|H2".to_string()),
            ..Default::default()
        };
        assert!(node.tag_matches("h2"));
        assert!(node.tag_matches("H1"));
        assert!(!node.tag_matches("h3"));
        assert!(SelectorNode::default().tag_matches("anything"));
    }

    #[test]
    fn test_wildcard() {
        assert!(SelectorNode::default().is_wildcard());
        let broken = SelectorNode {
            malformed: true,
            ..Default::default()
        };
        assert!(!broken.is_wildcard());
    }
}
