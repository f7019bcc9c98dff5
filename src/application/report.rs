//! Summary of a built markup tree.

use std::collections::BTreeMap;
use std::fmt;

use tracing::instrument;

use crate::markup::Markup;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Nodes at the first level
    pub top_level: usize,
    /// Nodes registered through add calls
    pub added: usize,
    /// Reachable nodes per kind, attributes included
    pub by_kind: BTreeMap<&'static str, usize>,
    /// Levels of the tallest top-level tree
    pub height: usize,
}

impl BuildReport {
    #[instrument(level = "debug", skip(markup))]
    pub fn from_markup(markup: &Markup) -> Self {
        let document = markup.document();
        let mut report = BuildReport {
            top_level: markup.children().len(),
            added: markup.len(),
            ..Default::default()
        };

        for &top in markup.children() {
            let mut stack = vec![(top, 1)];
            while let Some((idx, level)) = stack.pop() {
                let Some(node) = document.get(idx) else {
                    continue;
                };
                report.height = report.height.max(level);
                *report.by_kind.entry(node.kind.kind_name()).or_default() += 1;
                for &attr in &node.attributes {
                    if let Some(kind) = document.kind(attr) {
                        *report.by_kind.entry(kind.kind_name()).or_default() += 1;
                    }
                }
                for &child in &node.children {
                    stack.push((child, level + 1));
                }
            }
        }

        report
    }

    pub fn total(&self) -> usize {
        self.by_kind.values().sum()
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "top-level nodes: {}", self.top_level)?;
        writeln!(f, "added nodes:     {}", self.added)?;
        writeln!(f, "height:          {}", self.height)?;
        for (kind, count) in &self.by_kind {
            writeln!(f, "  {:<10} {}", kind, count)?;
        }
        Ok(())
    }
}
