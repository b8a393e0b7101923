//! Hekate DOM - labeled element tree
//!
//! Arena-backed tree of elements, text and comments. Nodes carry tag names,
//! identifiers, class sets and attributes, which is everything the selector
//! engine needs to query them.

mod document;
mod interner;
mod node;
mod tree;

pub use document::Document;
pub use interner::{InternedString, StringInterner};
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use tree::{Children, Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Null link
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this is not the null link
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena slot of this node
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

/// Tree mutation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node {0:?} does not exist")]
    InvalidNode(NodeId),

    #[error("Cannot insert {child:?} under {parent:?}: would create a cycle")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),
}
