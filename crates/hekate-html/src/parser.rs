//! html5ever front end
//!
//! html5ever builds an `RcDom`; the nodes are then copied into a
//! `hekate-dom` arena, dropping whitespace-only text.

use hekate_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use tracing::{debug, trace};

use crate::ParseError;

/// HTML5 parser
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse `html`, recording `url` on the document
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        debug!(url, bytes = html.len(), "parsing html");

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut document = Document::empty(url);
        let root = document.tree().root();
        copy_tree(&dom.document, document.tree_mut(), root)?;
        document.finalize();

        debug!(url, nodes = document.tree().len(), "html parsed");
        Ok(document)
    }
}

/// Copy the descendants of `source` under `target`, one parent at a time.
/// Template contents are copied as ordinary children of the template.
fn copy_tree(source: &Handle, tree: &mut DomTree, target: NodeId) -> Result<(), ParseError> {
    let mut pending: Vec<(Handle, NodeId)> = vec![(source.clone(), target)];

    while let Some((handle, parent)) = pending.pop() {
        for child in handle.children.borrow().iter() {
            let Some(copied) = copy_node(child, tree)? else {
                continue;
            };
            tree.append_child(parent, copied)?;
            pending.push((child.clone(), copied));

            if let RcNodeData::Element {
                template_contents, ..
            } = &child.data
                && let Some(contents) = template_contents.borrow().as_ref()
            {
                pending.push((contents.clone(), copied));
            }
        }
    }
    Ok(())
}

/// Detached copy of one node, `None` for nodes the arena does not keep
fn copy_node(handle: &Handle, tree: &mut DomTree) -> Result<Option<NodeId>, ParseError> {
    let id = match &handle.data {
        RcNodeData::Doctype { name, .. } => tree.create_doctype(name),
        RcNodeData::Text { contents } => {
            let text = contents.borrow();
            if text.trim().is_empty() {
                return Ok(None);
            }
            tree.create_text(&text)
        }
        RcNodeData::Comment { contents } => tree.create_comment(contents),
        RcNodeData::Element { name, attrs, .. } => {
            let el = tree.create_element(&name.local);
            for attr in attrs.borrow().iter() {
                tree.set_attribute(el, &attr.name.local, &attr.value)?;
            }
            el
        }
        RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => {
            trace!("skipping non-content node");
            return Ok(None);
        }
    };
    Ok(Some(id))
}
