//! DOM Tree (arena-based allocation)

use std::borrow::Cow;
use std::collections::HashMap;

use crate::{DomError, InternedString, Node, NodeId, StringInterner};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    interner: StringInterner,
    /// id attribute value -> elements carrying it, in assignment order
    ids: HashMap<String, Vec<NodeId>>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            interner: StringInterner::new(),
            ids: HashMap::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the tree, document node included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Name interner shared by every node of this tree
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Resolve an interned name
    #[inline]
    pub fn resolve(&self, s: InternedString) -> &str {
        self.interner.get(s)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element. Tag names are stored ASCII lowercase.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = self.interner.intern(&tag.to_ascii_lowercase());
        self.push(Node::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::text(text.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::comment(text.to_string()))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.push(Node::doctype(name.to_string()))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.get(parent).is_none() {
            return Err(DomError::InvalidNode(parent));
        }
        if self.get(child).is_none() {
            return Err(DomError::InvalidNode(child));
        }
        if child == NodeId::ROOT || child == parent || self.is_ancestor_of(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if let Some(last) = last.option() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        Ok(())
    }

    /// Unlink a node from its parent. The subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        let Some(parent) = parent.option() else { return };

        match prev.option() {
            Some(prev) => self.nodes[prev.index()].next_sibling = next,
            None => self.nodes[parent.index()].first_child = next,
        }
        match next.option() {
            Some(next) => self.nodes[next.index()].prev_sibling = prev,
            None => self.nodes[parent.index()].last_child = prev,
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Set an attribute, keeping the id and class caches in sync
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let name = name.to_ascii_lowercase();
        let key = self.interner.intern(&name);
        let classes: Vec<InternedString> = if name == "class" {
            value
                .split_ascii_whitespace()
                .map(|c| self.interner.intern(c))
                .collect()
        } else {
            Vec::new()
        };

        let elem = self
            .get_mut(id)
            .ok_or(DomError::InvalidNode(id))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))?;
        elem.set_attr(key, value.to_string());

        match name.as_str() {
            "class" => elem.classes = classes,
            "id" => {
                let previous = elem.id.replace(value.to_string());
                if let Some(previous) = previous {
                    self.unindex_id(&previous, id);
                }
                self.index_id(value, id);
            }
            _ => {}
        }
        Ok(())
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>, DomError> {
        let name = name.to_ascii_lowercase();
        let Some(key) = self.interner.lookup(&name) else {
            return Ok(None);
        };
        let elem = self
            .get_mut(id)
            .ok_or(DomError::InvalidNode(id))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))?;
        let removed = elem.remove_attr(key);

        match name.as_str() {
            "class" => elem.classes.clear(),
            "id" => {
                if let Some(previous) = elem.id.take() {
                    self.unindex_id(&previous, id);
                }
            }
            _ => {}
        }
        Ok(removed)
    }

    fn index_id(&mut self, value: &str, id: NodeId) {
        let entry = self.ids.entry(value.to_string()).or_default();
        if !entry.contains(&id) {
            entry.push(id);
        }
        if entry.len() > 1 {
            tracing::debug!("Duplicate id {:?} on {} elements", value, entry.len());
        }
    }

    fn unindex_id(&mut self, value: &str, id: NodeId) {
        if let Some(entry) = self.ids.get_mut(value) {
            entry.retain(|&n| n != id);
            if entry.is_empty() {
                self.ids.remove(value);
            }
        }
    }

    /// Tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| self.resolve(e.name))
    }

    /// Cached id attribute of an element
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element()?.id.as_deref()
    }

    /// Attribute value by name (ASCII case-insensitive name)
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let name: Cow<'_, str> = if name.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(name.to_ascii_lowercase())
        } else {
            Cow::Borrowed(name)
        };
        let key = self.interner.lookup(&name)?;
        self.get(id)?.as_element()?.get_attr(key)
    }

    /// Class membership test
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        let Some(class) = self.interner.lookup(class) else {
            return false;
        };
        self.get(id)
            .and_then(Node::as_element)
            .is_some_and(|e| e.has_class(class))
    }

    /// Parent node, the document node included
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent.option()
    }

    /// Iterate over all child nodes
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let first = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Children { tree: self, next: first }
    }

    /// Iterate over child elements only
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(|(_, node)| node.is_element())
            .map(|(child, _)| child)
    }

    /// Pre-order iterator over every node below `id` (excluding `id`)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let first = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Descendants {
            tree: self,
            root: id,
            next: first,
        }
    }

    /// Following sibling that is an element
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.get(id)?.next_sibling;
        while let Some(node) = self.get(cur) {
            if node.is_element() {
                return Some(cur);
            }
            cur = node.next_sibling;
        }
        None
    }

    /// Preceding sibling that is an element
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.get(id)?.prev_sibling;
        while let Some(node) = self.get(cur) {
            if node.is_element() {
                return Some(cur);
            }
            cur = node.prev_sibling;
        }
        None
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|n| self.get(n).and_then(Node::as_text))
            .collect()
    }

    /// True if `ancestor` is a proper ancestor of `id`
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = self.parent(id);
        while let Some(node) = cur {
            if node == ancestor {
                return true;
            }
            cur = self.parent(node);
        }
        false
    }

    /// First element below `root`, in tree order, whose id equals `value`
    pub fn element_by_id(&self, root: NodeId, value: &str) -> Option<NodeId> {
        let candidates = self.ids.get(value)?;
        let mut inside = candidates
            .iter()
            .copied()
            .filter(|&c| self.is_ancestor_of(root, c));

        let first = inside.next()?;
        if inside.next().is_none() {
            return Some(first);
        }
        // Duplicate ids: assignment order says nothing about tree order
        self.descendants(root)
            .find(|&n| self.element_id(n) == Some(value))
    }

    /// Elements below `root` carrying `class`, in tree order
    pub fn elements_by_class_name(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        let Some(class) = self.interner.lookup(class) else {
            return Vec::new();
        };
        self.descendants(root)
            .filter(|&n| {
                self.get(n)
                    .and_then(Node::as_element)
                    .is_some_and(|e| e.has_class(class))
            })
            .collect()
    }

    /// Elements below `root` with the given tag name (`*` for all), in tree order
    pub fn elements_by_tag_name(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        if tag == "*" {
            return self
                .descendants(root)
                .filter(|&n| self.get(n).is_some_and(Node::is_element))
                .collect();
        }
        let Some(name) = self.interner.lookup(&tag.to_ascii_lowercase()) else {
            return Vec::new();
        };
        self.descendants(root)
            .filter(|&n| {
                self.get(n)
                    .and_then(Node::as_element)
                    .is_some_and(|e| e.name == name)
            })
            .collect()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Child node iterator
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Pre-order descendant iterator
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next;
        let node = self.tree.get(id)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut cur = id;
            loop {
                if cur == self.root {
                    break NodeId::NONE;
                }
                let Some(n) = self.tree.get(cur) else {
                    break NodeId::NONE;
                };
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                cur = n.parent;
                if !cur.is_valid() || cur == self.root {
                    break NodeId::NONE;
                }
            }
        };
        Some(id)
    }
}
