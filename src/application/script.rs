//! Build scripts: add calls stored as TOML and replayed against [`Markup`].
//!
//! ```toml
//! [[add]]
//! args = ["company"]
//!
//! [[add]]
//! indent = 1
//! args = [{ kind = "element", name = "staff", attrs = { id = 1 } }]
//!
//! [[add]]
//! as = "text"
//! indent = 2
//! args = ["yong"]
//! ```
//!
//! Each `[[add]]` table is one add call. `indent` prepends that many indent
//! markers; `args` holds strings (converted per `as`), nested arrays (groups)
//! and inline node tables tagged by `kind`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use generational_arena::Index;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::markup::{Markup, MarkupArg, ValuePolicy};

/// A parsed build script.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Overrides the configured base depth
    #[serde(default)]
    pub base_depth: Option<usize>,
    #[serde(default, rename = "add")]
    pub calls: Vec<AddCall>,
    /// Where the script came from, for error messages
    #[serde(skip)]
    pub source: PathBuf,
}

/// One add call.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AddCall {
    #[serde(default, rename = "as")]
    pub policy: ValuePolicy,
    #[serde(default)]
    pub indent: usize,
    #[serde(default)]
    pub args: Vec<ArgSpec>,
}

/// Entry of an add call as written in the script.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ArgSpec {
    Value(String),
    Group(Vec<ArgSpec>),
    Node(NodeSpec),
}

/// Inline node table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeSpec {
    Indent,
    Element {
        name: String,
        #[serde(default)]
        text: Option<String>,
        /// Attributes, applied in name order
        #[serde(default)]
        attrs: BTreeMap<String, toml::Value>,
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
    Attr {
        name: String,
        value: toml::Value,
    },
    Text {
        data: String,
    },
    Comment {
        data: String,
    },
    Cdata {
        data: String,
    },
    Pi {
        target: String,
        #[serde(default)]
        data: String,
    },
}

/// Scalars render bare; strings without quotes.
fn scalar(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Script {
    /// Parse script text; `source` is only used in error messages.
    pub fn parse(content: &str, source: impl Into<PathBuf>) -> ApplicationResult<Self> {
        let source = source.into();
        let mut script: Script =
            toml::from_str(content).map_err(|e| ApplicationError::Script {
                path: source.clone(),
                message: e.to_string(),
            })?;
        script.source = source;
        Ok(script)
    }

    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let content = std::fs::read_to_string(path).with_path_context("read build script", path)?;
        Self::parse(&content, path)
    }

    /// Replay every add call against a fresh [`Markup`].
    #[instrument(level = "debug", skip(self, settings), fields(source = %self.source.display()))]
    pub fn run(&self, settings: &Settings) -> ApplicationResult<Markup> {
        let base_depth = self.base_depth.unwrap_or(settings.base_depth);
        let mut markup = Markup::with_base_depth(base_depth);

        for (i, call) in self.calls.iter().enumerate() {
            let mut args = vec![MarkupArg::indents(call.indent)];
            for spec in &call.args {
                args.push(self.lower(&mut markup, spec)?);
            }
            markup
                .add(call.policy, args)
                .map_err(|source| ApplicationError::AddCall { call: i + 1, source })?;
        }

        debug!(calls = self.calls.len(), nodes = markup.len(), "script replayed");
        Ok(markup)
    }

    fn lower(&self, markup: &mut Markup, spec: &ArgSpec) -> ApplicationResult<MarkupArg> {
        Ok(match spec {
            ArgSpec::Value(value) => MarkupArg::Value(value.clone()),
            ArgSpec::Group(specs) => MarkupArg::Group(
                specs
                    .iter()
                    .map(|s| self.lower(markup, s))
                    .collect::<ApplicationResult<_>>()?,
            ),
            ArgSpec::Node(NodeSpec::Indent) => MarkupArg::Indent,
            ArgSpec::Node(node) => MarkupArg::Node(self.build_node(markup, node)?),
        })
    }

    fn build_node(&self, markup: &mut Markup, spec: &NodeSpec) -> ApplicationResult<Index> {
        Ok(match spec {
            NodeSpec::Indent => {
                return Err(ApplicationError::Script {
                    path: self.source.clone(),
                    message: "indent marker is only allowed in add call arguments".to_string(),
                })
            }
            NodeSpec::Element {
                name,
                text,
                attrs,
                children,
            } => {
                let mut nodes = Vec::with_capacity(attrs.len() + children.len());
                for (attr_name, value) in attrs {
                    nodes.push(markup.attr(attr_name.as_str(), scalar(value)));
                }
                for child in children {
                    nodes.push(self.build_node(markup, child)?);
                }
                match text {
                    Some(text) => markup.element_with_text(name.as_str(), text, nodes),
                    None => markup.element(name.as_str(), nodes),
                }
            }
            NodeSpec::Attr { name, value } => markup.attr(name.as_str(), scalar(value)),
            NodeSpec::Text { data } => markup.text(data),
            NodeSpec::Comment { data } => markup.comment(data),
            NodeSpec::Cdata { data } => markup.cdata(data),
            NodeSpec::Pi { target, data } => markup.pi(target.as_str(), data.as_str()),
        })
    }
}
