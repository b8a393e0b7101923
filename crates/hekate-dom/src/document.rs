//! A tree plus the landmarks every page query starts from

use crate::{DomError, DomTree, NodeId};

/// Parsed page.
///
/// Landmarks are `NodeId::NONE` when the source had no such element.
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    url: String,
    html: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Document {
    /// `<html><head/><body/></html>`
    pub fn new(url: &str) -> Result<Self, DomError> {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html)?;
        tree.append_child(html, head)?;
        tree.append_child(html, body)?;

        Ok(Self {
            tree,
            url: url.to_string(),
            html,
            head,
            body,
        })
    }

    /// Document node only; fill it through [`tree_mut`](Self::tree_mut)
    /// and call [`finalize`](Self::finalize)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html: NodeId::NONE,
            head: NodeId::NONE,
            body: NodeId::NONE,
        }
    }

    /// Locate html, head and body after the tree was filled externally
    pub fn finalize(&mut self) {
        self.html = self.child_tagged(self.tree.root(), "html");
        self.head = self.child_tagged(self.html, "head");
        self.body = self.child_tagged(self.html, "body");
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Trimmed text of `<head><title>`, empty without one
    pub fn title(&self) -> String {
        let title = self.child_tagged(self.head, "title");
        if !title.is_valid() {
            return String::new();
        }
        self.tree.text_content(title).trim().to_string()
    }

    fn child_tagged(&self, parent: NodeId, tag: &str) -> NodeId {
        if !parent.is_valid() {
            return NodeId::NONE;
        }
        self.tree
            .element_children(parent)
            .find(|&n| self.tree.tag_name(n) == Some(tag))
            .unwrap_or(NodeId::NONE)
    }

    /// The `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// First element in tree order whose id is `id`
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.element_by_id(self.tree.root(), id)
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}
