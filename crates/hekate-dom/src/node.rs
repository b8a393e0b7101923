//! Arena nodes
//!
//! Nodes link to each other by `NodeId`; `NodeId::NONE` marks a missing link.

use crate::{InternedString, NodeId};

/// One slot of the tree arena
#[derive(Debug)]
pub struct Node {
    /// NONE when detached or for the document node
    pub parent: NodeId,
    pub first_child: NodeId,
    /// Kept so appends are O(1)
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    pub fn element(name: InternedString) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(name)))
    }

    pub fn text(content: String) -> Self {
        Self::with_data(NodeData::Text(TextData { content }))
    }

    pub fn comment(content: String) -> Self {
        Self::with_data(NodeData::Comment(content))
    }

    pub fn doctype(name: String) -> Self {
        Self::with_data(NodeData::Doctype { name })
    }

    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// What a node is
#[derive(Debug)]
pub enum NodeData {
    Document,
    Doctype { name: String },
    Element(ElementData),
    Text(TextData),
    Comment(String),
}

/// Labels of an element node.
///
/// `id` and `classes` mirror the `id` and `class` attributes; `DomTree` keeps
/// them in sync so selector fast paths never re-split the class string.
#[derive(Debug)]
pub struct ElementData {
    /// ASCII lowercase
    pub name: InternedString,
    /// Insertion order, names interned lowercase
    pub attrs: Vec<Attribute>,
    pub id: Option<String>,
    pub classes: Vec<InternedString>,
}

impl ElementData {
    pub fn new(name: InternedString) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            id: None,
            classes: Vec::new(),
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: InternedString) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Returns the replaced value
    pub(crate) fn set_attr(&mut self, name: InternedString, value: String) -> Option<String> {
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => Some(std::mem::replace(&mut attr.value, value)),
            None => {
                self.attrs.push(Attribute { name, value });
                None
            }
        }
    }

    /// Remove an attribute, returning its value
    pub(crate) fn remove_attr(&mut self, name: InternedString) -> Option<String> {
        let pos = self.attrs.iter().position(|a| a.name == name)?;
        Some(self.attrs.remove(pos).value)
    }

    /// Check the cached class list
    #[inline]
    pub fn has_class(&self, class: InternedString) -> bool {
        self.classes.contains(&class)
    }
}

/// Text node data
#[derive(Debug)]
pub struct TextData {
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: InternedString,
    pub value: String,
}
