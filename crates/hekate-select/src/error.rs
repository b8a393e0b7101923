//! Selector errors
//!
//! Only strict parsing produces these; the default query path degrades
//! defects into selectors that match nothing.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("empty clause at position {position}")]
    EmptyClause { position: usize },

    #[error("combinator '{combinator}' has no selector on one side")]
    DanglingCombinator { combinator: char },

    #[error("unbalanced '{delimiter}'")]
    Unbalanced { delimiter: char },

    #[error("'{marker}' is not followed by a name")]
    EmptyName { marker: char },

    #[error("malformed attribute selector: [{0}]")]
    MalformedAttribute(String),

    #[error("unexpected '{token}' in '{selector}'")]
    UnexpectedToken { token: String, selector: String },

    #[error("tag name must come first: '{0}'")]
    InvalidTag(String),

    #[error("unknown pseudo-class ':{0}'")]
    UnknownPseudo(String),
}

pub type Result<T> = std::result::Result<T, SelectorError>;
