//! Owned element tree plus a small native query interface: attribute and
//! child access by name, and select-by-predicate in document order. This
//! replaces string path expressions so the same selection semantics are
//! checked by the compiler instead of parsed at runtime.

/// One element node. Leaf values live in `text`; nested structure in
/// `children`. Attributes keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets or replaces an attribute, keeping first-set position on replace.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// First child with the given tag name, if any.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// Removes and returns the first child with the given tag name.
    pub fn remove_child(&mut self, name: &str) -> Option<Element> {
        let pos = self.children.iter().position(|c| c.name == name)?;
        Some(self.children.remove(pos))
    }

    /// All descendants (self excluded) matching the predicate, in document
    /// order: depth-first from the root, left to right.
    pub fn select<'a>(&'a self, pred: &dyn Fn(&Element) -> bool) -> Vec<&'a Element> {
        let mut hits = Vec::new();
        self.collect_into(pred, &mut hits);
        hits
    }

    fn collect_into<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, hits: &mut Vec<&'a Element>) {
        for child in &self.children {
            if pred(child) {
                hits.push(child);
            }
            child.collect_into(pred, hits);
        }
    }
}
