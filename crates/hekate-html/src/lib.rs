//! Hekate HTML front end
//!
//! HTML5 parsing built on html5ever, producing `hekate-dom` documents that
//! the selector engine can query.

mod parser;

pub use hekate_dom::Document;
pub use parser::HtmlParser;

/// Parse an HTML string into a document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// HTML front end error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build document tree: {0}")]
    Tree(#[from] hekate_dom::DomError),
}
