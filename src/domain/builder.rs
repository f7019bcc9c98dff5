//! Depth tree builder: infers each node's parent from the depth it is added at.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{instrument, trace};

use crate::domain::error::{DomainError, DomainResult};

/// Links a child to its inferred parent.
///
/// The builder never inspects nodes itself. Whatever "being a child" means
/// for a node type (ordered child, named property, ...) is decided here.
pub trait Attach<N> {
    fn attach(&mut self, parent: &N, child: &N);
}

impl<N, F> Attach<N> for F
where
    F: FnMut(&N, &N),
{
    fn attach(&mut self, parent: &N, child: &N) {
        self(parent, child)
    }
}

/// Builds one tree from a sequence of "add at depth" calls.
///
/// Depth 0 holds the root (possibly absent). The parent of a node added at
/// depth `d` is the most recently added node at the largest populated depth
/// strictly below `d`. Lookups go by depth key, so moving back up to a
/// shallower depth needs no stack bookkeeping, and skipped depths are fine.
pub struct DepthTreeBuilder<N, A> {
    /// Nodes per depth, in insertion order
    nodes: BTreeMap<usize, Vec<N>>,
    /// Node registered at depth 0 when the tree was (re)started
    root: Option<N>,
    /// Attachment policy
    policy: A,
}

impl<N, A> DepthTreeBuilder<N, A>
where
    N: Clone,
    A: Attach<N>,
{
    pub fn new(root: Option<N>, policy: A) -> Self {
        let mut builder = Self {
            nodes: BTreeMap::new(),
            root: None,
            policy,
        };
        builder.reset(root);
        builder
    }

    /// Builder without a root: top-level nodes stay unattached.
    pub fn with_policy(policy: A) -> Self {
        Self::new(None, policy)
    }

    /// Discard everything built so far and start a new tree.
    #[instrument(level = "debug", skip_all)]
    pub fn reset(&mut self, root: Option<N>) {
        self.nodes.clear();
        let bucket = self.nodes.entry(0).or_default();
        if let Some(node) = &root {
            bucket.push(node.clone());
        }
        self.root = root;
    }

    /// Add `node` at `depth` and attach it to its inferred parent.
    ///
    /// A node without any shallower populated depth stays unattached.
    #[instrument(level = "trace", skip(self, node))]
    pub fn add(&mut self, node: N, depth: isize) -> DomainResult<()> {
        let depth = usize::try_from(depth).map_err(|_| DomainError::InvalidDepth(depth))?;
        self.register(node, depth);
        Ok(())
    }

    pub(crate) fn register(&mut self, node: N, depth: usize) {
        self.nodes.entry(depth).or_default().push(node.clone());

        match self.find_parent(depth) {
            Some(parent) => {
                let parent = parent.clone();
                self.policy.attach(&parent, &node);
            }
            None => trace!(depth, "no parent available, node left unattached"),
        }
    }

    /// Last node at the nearest populated depth above `depth`.
    fn find_parent(&self, depth: usize) -> Option<&N> {
        self.nodes
            .range(..depth)
            .next_back()
            .and_then(|(_, bucket)| bucket.last())
    }

    pub fn root(&self) -> Option<&N> {
        self.root.as_ref()
    }

    /// Nodes at the shallowest populated depth below the root, in insertion order.
    pub fn first_children(&self) -> &[N] {
        self.nodes
            .range(1..)
            .find(|(_, bucket)| !bucket.is_empty())
            .map(|(_, bucket)| bucket.as_slice())
            .unwrap_or(&[])
    }

    /// The first top-level node, which represents the tree being built.
    pub fn get(&self) -> Option<&N> {
        self.first_children().first()
    }

    /// Populated depths, ascending.
    pub fn depths(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(&depth, _)| depth)
    }

    /// Number of nodes added below depth 0.
    pub fn len(&self) -> usize {
        self.nodes.range(1..).map(|(_, bucket)| bucket.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn policy(&self) -> &A {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut A {
        &mut self.policy
    }

    pub fn into_policy(self) -> A {
        self.policy
    }
}

impl<N, A> Default for DepthTreeBuilder<N, A>
where
    N: Clone,
    A: Attach<N> + Default,
{
    fn default() -> Self {
        Self::with_policy(A::default())
    }
}

impl<'a, N, A> IntoIterator for &'a DepthTreeBuilder<N, A>
where
    N: Clone,
    A: Attach<N>,
{
    type Item = &'a N;
    type IntoIter = std::slice::Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.first_children().iter()
    }
}

impl<N: fmt::Debug, A> fmt::Debug for DepthTreeBuilder<N, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepthTreeBuilder")
            .field("nodes", &self.nodes)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
