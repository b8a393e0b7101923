//! Name table
//!
//! Tag, class and attribute names are stored once per tree and referred to by
//! a 4-byte id, so the selector engine compares names as integers.

use std::collections::HashMap;

/// Id of an interned name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct InternedString(pub u32);

impl InternedString {
    pub const EMPTY: InternedString = InternedString(0);

    #[inline]
    fn slot(self) -> usize {
        self.0 as usize
    }
}

/// Names seeded before any document is built; the engine's fast paths and
/// form pseudo-classes look these up constantly.
const PRESEEDED: &[&str] = &[
    "", "html", "head", "body", "title", "div", "span", "p", "a", "ul", "ol", "li",
    "table", "tr", "td", "form", "input", "button", "select", "textarea", "label",
    "id", "class", "type", "name", "value", "disabled", "checked", "lang", "href",
];

/// Bidirectional map between names and ids
#[derive(Debug)]
pub struct StringInterner {
    names: Vec<Box<str>>,
    ids: HashMap<Box<str>, InternedString>,
}

impl StringInterner {
    pub fn new() -> Self {
        let mut table = Self {
            names: Vec::with_capacity(64),
            ids: HashMap::with_capacity(64),
        };
        PRESEEDED.iter().for_each(|name| {
            table.intern(name);
        });
        table
    }

    /// Id for `name`, adding it on first sight
    pub fn intern(&mut self, name: &str) -> InternedString {
        if let Some(id) = self.lookup(name) {
            return id;
        }
        let id = InternedString(self.names.len() as u32);
        self.names.push(name.into());
        self.ids.insert(name.into(), id);
        id
    }

    /// Id for `name` if some node has used it.
    ///
    /// `None` proves no node in the tree carries this name.
    pub fn lookup(&self, name: &str) -> Option<InternedString> {
        self.ids.get(name).copied()
    }

    /// Name behind `id`; unknown ids read as the empty name
    #[inline]
    pub fn get(&self, id: InternedString) -> &str {
        self.names.get(id.slot()).map_or("", |name| &**name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_same_id() {
        let mut table = StringInterner::new();
        let first = table.intern("data-role");
        assert_eq!(table.intern("data-role"), first);
        assert_eq!(table.get(first), "data-role");
    }

    #[test]
    fn test_lookup_does_not_intern() {
        let table = StringInterner::new();
        let before = table.len();
        assert_eq!(table.lookup("never-seen"), None);
        assert_eq!(table.len(), before);
        assert!(table.lookup("div").is_some());
    }

    #[test]
    fn test_empty_name_is_slot_zero() {
        let table = StringInterner::new();
        assert_eq!(table.lookup(""), Some(InternedString::EMPTY));
        assert_eq!(table.get(InternedString(u32::MAX)), "");
    }
}
