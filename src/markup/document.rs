use generational_arena::{Arena, Index};
use tracing::{instrument, warn};

use crate::domain::Attach;

/// Kind and payload of a markup node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root, parent of the exported top-level nodes
    Root,
    Element { name: String },
    Attribute { name: String, value: String },
    Text(String),
    Comment(String),
    CData(String),
    ProcessingInstruction { target: String, data: String },
}

/// How a node relates to the parent it gets attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Positional child, kept in order
    Ordinary,
    /// Keyed property of an element, replaced by name
    NamedProperty,
}

impl NodeKind {
    pub fn role(&self) -> NodeRole {
        match self {
            NodeKind::Attribute { .. } => NodeRole::NamedProperty,
            _ => NodeRole::Ordinary,
        }
    }

    /// Short name of the kind, for reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Element { .. } => "element",
            NodeKind::Attribute { .. } => "attribute",
            NodeKind::Text(_) => "text",
            NodeKind::Comment(_) => "comment",
            NodeKind::CData(_) => "cdata",
            NodeKind::ProcessingInstruction { .. } => "pi",
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, NodeKind::Element { .. })
    }

    /// Element or attribute name.
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeKind::Element { name } | NodeKind::Attribute { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Node stored in the document arena.
#[derive(Debug, Clone)]
pub struct MarkupNode {
    pub kind: NodeKind,
    /// Owning node, None while unattached
    pub parent: Option<Index>,
    /// Ordered child nodes
    pub children: Vec<Index>,
    /// Attribute nodes, elements only
    pub attributes: Vec<Index>,
}

/// Arena owning every markup node created for one build.
///
/// Handles are generational indices, so a handle from a dropped or reset
/// document never resolves to an unrelated node.
#[derive(Debug, Default)]
pub struct Document {
    arena: Arena<MarkupNode>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, kind: NodeKind) -> Index {
        self.arena.insert(MarkupNode {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: Vec::new(),
        })
    }

    pub fn create_root(&mut self) -> Index {
        self.insert(NodeKind::Root)
    }

    pub fn create_element(&mut self, name: impl Into<String>) -> Index {
        self.insert(NodeKind::Element { name: name.into() })
    }

    pub fn create_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> Index {
        self.insert(NodeKind::Attribute {
            name: name.into(),
            value: value.into(),
        })
    }

    pub fn create_text(&mut self, data: impl Into<String>) -> Index {
        self.insert(NodeKind::Text(data.into()))
    }

    pub fn create_comment(&mut self, data: impl Into<String>) -> Index {
        self.insert(NodeKind::Comment(data.into()))
    }

    pub fn create_cdata(&mut self, data: impl Into<String>) -> Index {
        self.insert(NodeKind::CData(data.into()))
    }

    pub fn create_pi(&mut self, target: impl Into<String>, data: impl Into<String>) -> Index {
        self.insert(NodeKind::ProcessingInstruction {
            target: target.into(),
            data: data.into(),
        })
    }

    pub fn get(&self, idx: Index) -> Option<&MarkupNode> {
        self.arena.get(idx)
    }

    pub fn kind(&self, idx: Index) -> Option<&NodeKind> {
        self.get(idx).map(|node| &node.kind)
    }

    pub fn parent(&self, idx: Index) -> Option<Index> {
        self.get(idx).and_then(|node| node.parent)
    }

    pub fn children(&self, idx: Index) -> &[Index] {
        self.get(idx).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    pub fn attributes(&self, idx: Index) -> &[Index] {
        self.get(idx).map(|node| node.attributes.as_slice()).unwrap_or(&[])
    }

    /// Value of the attribute `name` on element `idx`.
    pub fn attribute(&self, idx: Index, name: &str) -> Option<&str> {
        self.attributes(idx)
            .iter()
            .filter_map(|&attr| self.kind(attr))
            .find_map(|kind| match kind {
                NodeKind::Attribute { name: n, value } if n == name => Some(value.as_str()),
                _ => None,
            })
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Unlink `child` from its current parent, if any.
    fn detach(&mut self, child: Index) {
        let Some(old_parent) = self.parent(child) else {
            return;
        };
        if let Some(parent) = self.arena.get_mut(old_parent) {
            parent.children.retain(|&c| c != child);
            parent.attributes.retain(|&a| a != child);
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = None;
        }
    }

    fn append_child(&mut self, parent: Index, child: Index) {
        self.detach(child);
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Set `attr` on `element`, replacing an attribute of the same name.
    fn set_attribute(&mut self, element: Index, attr: Index) {
        self.detach(attr);
        let name = self.kind(attr).and_then(NodeKind::name).map(str::to_owned);
        let replaced: Vec<Index> = self
            .attributes(element)
            .iter()
            .copied()
            .filter(|&a| self.kind(a).and_then(NodeKind::name) == name.as_deref())
            .collect();
        for old in replaced {
            self.detach(old);
        }
        if let Some(node) = self.arena.get_mut(element) {
            node.attributes.push(attr);
        }
        if let Some(node) = self.arena.get_mut(attr) {
            node.parent = Some(element);
        }
    }

    /// Deep copy the subtree at `idx` of `source` into this document.
    ///
    /// The copy is unattached; the returned handle belongs to `self`.
    #[instrument(level = "debug", skip(self, source))]
    pub fn import(&mut self, source: &Document, idx: Index) -> Option<Index> {
        let mut copy_root = None;
        let mut stack = vec![(idx, None)];

        while let Some((current, parent)) = stack.pop() {
            let Some(node) = source.get(current) else {
                continue;
            };
            let copy = self.insert(node.kind.clone());
            match parent {
                Some(parent) => self.attach(&parent, &copy),
                None => copy_root = Some(copy),
            }
            // Popped in reverse: attributes first, then children left to right
            for &child in node.children.iter().rev() {
                stack.push((child, Some(copy)));
            }
            for &attr in node.attributes.iter().rev() {
                stack.push((attr, Some(copy)));
            }
        }

        copy_root
    }

    /// `idx` followed by its parent chain up to the topmost node.
    pub fn ancestors(&self, idx: Index) -> impl Iterator<Item = Index> + '_ {
        std::iter::successors(Some(idx), move |&current| self.parent(current))
    }

    /// Pre-order walk over `idx` and its descendants (attributes excluded).
    pub fn descendants(&self, idx: Index) -> Descendants<'_> {
        Descendants {
            document: self,
            stack: vec![idx],
        }
    }

    /// Concatenated text and CDATA below `idx`.
    pub fn text_content(&self, idx: Index) -> String {
        self.descendants(idx)
            .filter_map(|(_, node)| match &node.kind {
                NodeKind::Text(data) | NodeKind::CData(data) => Some(data.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Attach<Index> for Document {
    fn attach(&mut self, parent: &Index, child: &Index) {
        if self.ancestors(*parent).any(|a| a == *child) {
            warn!(?parent, ?child, "attach: child is the parent or one of its ancestors");
            return;
        }
        let parent_is_element = self.kind(*parent).is_some_and(NodeKind::is_element);
        match self.kind(*child).map(NodeKind::role) {
            Some(NodeRole::NamedProperty) if parent_is_element => {
                self.set_attribute(*parent, *child)
            }
            Some(_) => self.append_child(*parent, *child),
            None => warn!(?child, "attach: node does not belong to this document"),
        }
    }
}

pub struct Descendants<'a> {
    document: &'a Document,
    stack: Vec<Index>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (Index, &'a MarkupNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.document.get(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_attribute_child_when_attaching_to_element_then_becomes_attribute() {
        let mut doc = Document::new();
        let staff = doc.create_element("staff");
        let id = doc.create_attribute("id", "1");

        doc.attach(&staff, &id);

        assert!(doc.children(staff).is_empty());
        assert_eq!(doc.attribute(staff, "id"), Some("1"));
        assert_eq!(doc.parent(id), Some(staff));
    }

    #[test]
    fn given_same_attribute_name_when_attaching_then_replaces_previous() {
        let mut doc = Document::new();
        let el = doc.create_element("order");
        let first = doc.create_attribute("id", "1");
        let second = doc.create_attribute("id", "2");

        doc.attach(&el, &first);
        doc.attach(&el, &second);

        assert_eq!(doc.attributes(el), &[second]);
        assert_eq!(doc.attribute(el, "id"), Some("2"));
        assert_eq!(doc.parent(first), None);
    }

    #[test]
    fn given_attribute_under_non_element_when_attaching_then_appended_as_child() {
        let mut doc = Document::new();
        let root = doc.create_root();
        let attr = doc.create_attribute("lang", "en");

        doc.attach(&root, &attr);

        assert_eq!(doc.children(root), &[attr]);
    }

    #[test]
    fn given_attached_node_when_reattaching_then_moves_to_new_parent() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let t = doc.create_text("x");

        doc.attach(&a, &t);
        doc.attach(&b, &t);

        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[t]);
    }

    #[test]
    fn given_subtree_when_importing_then_copies_structure_in_order() {
        let mut source = Document::new();
        let name = source.create_element("name");
        let id = source.create_attribute("id", "7");
        let first = source.create_element("first");
        let last = source.create_element("last");
        let text = source.create_text("Paula");
        source.attach(&name, &id);
        source.attach(&name, &first);
        source.attach(&name, &last);
        source.attach(&first, &text);

        let mut target = Document::new();
        let copy = target.import(&source, name).unwrap();

        let kids: Vec<_> = target
            .children(copy)
            .iter()
            .filter_map(|&c| target.kind(c).and_then(NodeKind::name))
            .collect();
        assert_eq!(kids, vec!["first", "last"]);
        assert_eq!(target.attribute(copy, "id"), Some("7"));
        assert_eq!(target.text_content(copy), "Paula");
        assert_eq!(target.len(), source.len());
    }

    #[test]
    fn given_node_when_attaching_under_itself_or_descendant_then_skips() {
        let mut doc = Document::new();
        let x = doc.create_element("x");
        let y = doc.create_element("y");
        doc.attach(&x, &y);

        doc.attach(&x, &x);
        doc.attach(&y, &x);

        assert_eq!(doc.parent(x), None);
        assert_eq!(doc.children(x), &[y]);
        assert!(doc.children(y).is_empty());
        assert_eq!(doc.descendants(x).count(), 2);
    }
}
