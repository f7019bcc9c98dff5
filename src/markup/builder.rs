//! Markup facade over the depth tree builder.

use std::fmt::Display;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::{Arg, Attach, DepthTreeBuilder, DomainResult, BASE_DEPTH};
use crate::markup::document::{Document, NodeKind};

/// Entry of a markup add call: raw values are strings, nodes are arena handles.
pub type MarkupArg = Arg<Index, String>;

impl From<&str> for MarkupArg {
    fn from(value: &str) -> Self {
        Arg::Value(value.to_string())
    }
}

impl From<String> for MarkupArg {
    fn from(value: String) -> Self {
        Arg::Value(value)
    }
}

impl From<Index> for MarkupArg {
    fn from(node: Index) -> Self {
        Arg::Node(node)
    }
}

/// What a raw string turns into at a call site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuePolicy {
    /// Element with that name
    #[default]
    Element,
    /// Text node with that content
    Text,
    /// Comment with that content
    Comment,
}

impl ValuePolicy {
    fn make(self, document: &mut Document, value: String) -> Index {
        match self {
            ValuePolicy::Element => document.create_element(value),
            ValuePolicy::Text => document.create_text(value),
            ValuePolicy::Comment => document.create_comment(value),
        }
    }
}

/// Builds markup trees visually.
///
/// Each add call lists nodes to place at one depth; [`Arg::Indent`] markers
/// push them one level deeper. Attributes added at a deeper level land on the
/// element above them instead of becoming children. The builder has no root,
/// so the nodes of the first level are the result ([`Markup::children`]).
#[derive(Debug)]
pub struct Markup {
    builder: DepthTreeBuilder<Index, Document>,
    base_depth: usize,
}

impl Default for Markup {
    fn default() -> Self {
        Self::new()
    }
}

impl Markup {
    pub fn new() -> Self {
        Self::with_base_depth(BASE_DEPTH)
    }

    /// Markup whose bare add calls target `base_depth`.
    pub fn with_base_depth(base_depth: usize) -> Self {
        Self {
            builder: DepthTreeBuilder::with_policy(Document::new()),
            base_depth,
        }
    }

    /// Add nodes, turning raw strings into nodes per `policy`.
    #[instrument(level = "debug", skip(self, args))]
    pub fn add<T>(&mut self, policy: ValuePolicy, args: impl IntoIterator<Item = T>) -> DomainResult<usize>
    where
        T: Into<MarkupArg>,
    {
        self.builder.add_args_at(
            args.into_iter().map(Into::into),
            self.base_depth,
            |document, value| policy.make(document, value),
        )
    }

    /// Add nodes where strings become elements.
    pub fn add_elements<T: Into<MarkupArg>>(&mut self, args: impl IntoIterator<Item = T>) -> DomainResult<usize> {
        self.add(ValuePolicy::Element, args)
    }

    /// Add nodes where strings become text nodes.
    pub fn add_texts<T: Into<MarkupArg>>(&mut self, args: impl IntoIterator<Item = T>) -> DomainResult<usize> {
        self.add(ValuePolicy::Text, args)
    }

    /// Add nodes where strings become comments.
    pub fn add_comments<T: Into<MarkupArg>>(&mut self, args: impl IntoIterator<Item = T>) -> DomainResult<usize> {
        self.add(ValuePolicy::Comment, args)
    }

    /// Element with the given children; attribute nodes become its attributes.
    pub fn element(&mut self, name: impl Into<String>, children: impl IntoIterator<Item = Index>) -> Index {
        let document = self.document_mut();
        let element = document.create_element(name);
        for child in children {
            document.attach(&element, &child);
        }
        element
    }

    /// Element whose first child is a text node.
    pub fn element_with_text(
        &mut self,
        name: impl Into<String>,
        text: impl Display,
        children: impl IntoIterator<Item = Index>,
    ) -> Index {
        let text = self.text(text);
        self.element(name, std::iter::once(text).chain(children))
    }

    pub fn attr(&mut self, name: impl Into<String>, value: impl Display) -> Index {
        self.document_mut().create_attribute(name, value.to_string())
    }

    pub fn text(&mut self, data: impl Display) -> Index {
        self.document_mut().create_text(data.to_string())
    }

    pub fn comment(&mut self, data: impl Display) -> Index {
        self.document_mut().create_comment(data.to_string())
    }

    pub fn cdata(&mut self, data: impl Display) -> Index {
        self.document_mut().create_cdata(data.to_string())
    }

    pub fn pi(&mut self, target: impl Into<String>, data: impl Into<String>) -> Index {
        self.document_mut().create_pi(target, data)
    }

    pub fn id(&mut self, value: impl Display) -> Index {
        self.attr("id", value)
    }

    pub fn name(&mut self, value: impl Display) -> Index {
        self.attr("name", value)
    }

    /// The first top-level node.
    pub fn get(&self) -> Option<Index> {
        self.builder.get().copied()
    }

    /// All top-level nodes, in insertion order.
    pub fn children(&self) -> &[Index] {
        self.builder.first_children()
    }

    /// Nodes added through add calls.
    pub fn len(&self) -> usize {
        self.builder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builder.is_empty()
    }

    pub fn document(&self) -> &Document {
        self.builder.policy()
    }

    fn document_mut(&mut self) -> &mut Document {
        self.builder.policy_mut()
    }

    /// Start over with an empty document.
    pub fn reset(&mut self) {
        self.builder = DepthTreeBuilder::with_policy(Document::new());
    }

    /// Copy the top-level nodes into a fresh document under a root node.
    pub fn export(&self) -> (Document, Index) {
        let mut target = Document::new();
        let root = target.create_root();
        self.export_into(&mut target, root);
        (target, root)
    }

    /// Copy the top-level nodes under `parent` in `target`.
    #[instrument(level = "debug", skip(self, target))]
    pub fn export_into(&self, target: &mut Document, parent: Index) {
        for &child in self.children() {
            if let Some(copy) = target.import(self.document(), child) {
                target.attach(&parent, &copy);
            }
        }
    }

    /// Kind of a node built by this markup.
    pub fn kind(&self, idx: Index) -> Option<&NodeKind> {
        self.document().kind(idx)
    }
}
