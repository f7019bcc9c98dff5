use generational_arena::Index;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use termtree::Tree;
use tracing::instrument;

use crate::markup::builder::Markup;
use crate::markup::document::{Document, NodeKind};

/// How trees are rendered as outlines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayOptions {
    /// Show attributes inline on element labels
    pub show_attributes: bool,
    /// Truncate text-like payloads to this many characters (0: no limit)
    pub max_text_width: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_attributes: true,
            max_text_width: 40,
        }
    }
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self, options: &DisplayOptions) -> Tree<String>;
}

impl TreeNodeConvert for Markup {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, options: &DisplayOptions) -> Tree<String> {
        let document = self.document();
        match self.children() {
            [] => Tree::new("(empty)".to_string()),
            [single] => document.subtree(*single, options),
            many => Tree::new("(fragment)".to_string())
                .with_leaves(many.iter().map(|&idx| document.subtree(idx, options))),
        }
    }
}

impl Document {
    /// Outline of the subtree at `idx`.
    pub fn subtree(&self, idx: Index, options: &DisplayOptions) -> Tree<String> {
        // Each frame is a partially built tree and the children still to visit
        let mut stack: Vec<(Tree<String>, &[Index])> =
            vec![(Tree::new(self.label(idx, options)), self.children(idx))];
        let mut finished = None;

        while let Some((tree, pending)) = stack.pop() {
            if let Some((&child, rest)) = pending.split_first() {
                stack.push((tree, rest));
                stack.push((Tree::new(self.label(child, options)), self.children(child)));
                continue;
            }
            match stack.last_mut() {
                Some((parent, _)) => {
                    parent.push(tree);
                }
                None => finished = Some(tree),
            }
        }

        finished.unwrap_or_else(|| Tree::new(self.label(idx, options)))
    }

    /// One-line label of the node at `idx`.
    pub fn label(&self, idx: Index, options: &DisplayOptions) -> String {
        let Some(kind) = self.kind(idx) else {
            return "(missing)".to_string();
        };
        let clip = |s: &str| truncate(s, options.max_text_width);
        match kind {
            NodeKind::Root => "#document".to_string(),
            NodeKind::Element { name } => {
                let attrs = self.attributes(idx);
                if options.show_attributes && !attrs.is_empty() {
                    let rendered = attrs.iter().map(|&a| self.label(a, options)).join(" ");
                    format!("<{} {}>", name, rendered)
                } else {
                    format!("<{}>", name)
                }
            }
            NodeKind::Attribute { name, value } => format!("{}=\"{}\"", name, clip(value)),
            NodeKind::Text(data) => format!("\"{}\"", clip(data)),
            NodeKind::Comment(data) => format!("<!--{}-->", clip(data)),
            NodeKind::CData(data) => format!("<![CDATA[{}]]>", clip(data)),
            NodeKind::ProcessingInstruction { target, data } => {
                format!("<?{} {}?>", target, clip(data))
            }
        }
    }
}

fn truncate(s: &str, width: usize) -> String {
    if width == 0 || s.chars().count() <= width {
        s.to_string()
    } else {
        let head: String = s.chars().take(width).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::builder::MarkupArg;

    #[test]
    fn given_long_text_when_truncating_then_appends_ellipsis() {
        assert_eq!(truncate("abcdef", 3), "abc…");
        assert_eq!(truncate("abc", 3), "abc");
        assert_eq!(truncate("abcdef", 0), "abcdef");
    }

    #[test]
    fn given_element_with_attributes_when_labeling_then_inlines_them() {
        let mut markup = Markup::new();
        let id = markup.id(553);
        let order = markup.element("order", [id]);
        let doc = markup.document();

        assert_eq!(doc.label(order, &DisplayOptions::default()), "<order id=\"553\">");

        let hidden = DisplayOptions {
            show_attributes: false,
            ..DisplayOptions::default()
        };
        assert_eq!(doc.label(order, &hidden), "<order>");
    }

    #[test]
    fn given_nested_markup_when_rendering_then_outline_has_all_levels() {
        let mut markup = Markup::new();
        markup.add_elements(["orders"]).unwrap();
        markup
            .add_comments(vec![MarkupArg::Indent, "good choice".into()])
            .unwrap();

        let rendered = markup.to_tree_string(&DisplayOptions::default()).to_string();

        assert!(rendered.starts_with("<orders>"));
        assert!(rendered.contains("<!--good choice-->"));
    }

    #[test]
    fn given_very_deep_chain_when_rendering_then_keeps_every_level() {
        let mut markup = Markup::new();
        let depth = 5_000;
        let args: Vec<MarkupArg> = (0..depth)
            .flat_map(|i| [MarkupArg::Indent, format!("n{}", i).into()])
            .collect();
        markup.add_elements(args).unwrap();

        let tree = markup
            .document()
            .subtree(markup.get().unwrap(), &DisplayOptions::default());

        let mut levels = 1;
        let mut current = &tree;
        while let Some(next) = current.leaves.first() {
            levels += 1;
            current = next;
        }
        assert_eq!(levels, depth);
        assert_eq!(current.root, format!("<n{}>", depth - 1));
    }

    #[test]
    fn given_siblings_when_rendering_subtree_then_keeps_document_order() {
        let mut markup = Markup::new();
        markup.add_elements(["name"]).unwrap();
        markup
            .add_elements(vec![MarkupArg::Indent, "first".into(), "last".into()])
            .unwrap();

        let tree = markup
            .document()
            .subtree(markup.get().unwrap(), &DisplayOptions::default());

        let leaves: Vec<&str> = tree.leaves.iter().map(|t| t.root.as_str()).collect();
        assert_eq!(leaves, vec!["<first>", "<last>"]);
    }
}
