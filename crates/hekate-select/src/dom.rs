//! `hekate-dom` adapter

use hekate_dom::{DomTree, Node, NodeId};

use crate::{Indexable, Tree};

impl Tree for DomTree {
    type Handle = NodeId;

    fn is_element(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(Node::is_element)
    }

    fn tag_name(&self, element: NodeId) -> &str {
        DomTree::tag_name(self, element).unwrap_or("")
    }

    fn element_id(&self, element: NodeId) -> Option<&str> {
        DomTree::element_id(self, element)
    }

    fn has_class(&self, element: NodeId, class: &str) -> bool {
        DomTree::has_class(self, element, class)
    }

    fn attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        DomTree::attribute(self, element, name)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        DomTree::parent(self, node)
    }

    fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        DomTree::element_children(self, node).collect()
    }

    fn next_element_sibling(&self, element: NodeId) -> Option<NodeId> {
        DomTree::next_element_sibling(self, element)
    }

    fn previous_element_sibling(&self, element: NodeId) -> Option<NodeId> {
        DomTree::previous_element_sibling(self, element)
    }

    fn has_child_nodes(&self, node: NodeId) -> bool {
        self.children(node).next().is_some()
    }

    fn text_content(&self, node: NodeId) -> String {
        DomTree::text_content(self, node)
    }
}

impl Indexable for DomTree {
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        DomTree::descendants(self, root)
            .filter(|&n| self.get(n).is_some_and(Node::is_element))
            .collect()
    }

    fn element_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        DomTree::element_by_id(self, root, id)
    }

    fn elements_by_class_name(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        DomTree::elements_by_class_name(self, root, class)
    }

    fn elements_by_tag_name(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        DomTree::elements_by_tag_name(self, root, tag)
    }
}
