//! Argument flattening: turns one mixed add call into (depth, node) additions.
//!
//! An add call carries plain values, pre-built nodes, indent markers and
//! nested groups of those. Groups only group; they never change depth.
//! Every marker bumps the depth for everything that follows it in the call,
//! including items after the group the marker was written in.

use tracing::{debug, instrument};

use crate::domain::builder::{Attach, DepthTreeBuilder};
use crate::domain::error::{DomainError, DomainResult};

/// Depth of a bare add call: a child of the implicit root.
pub const BASE_DEPTH: usize = 1;

/// One entry of an add call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg<N, V> {
    /// Raw value, turned into a node by the call site's conversion
    Value(V),
    /// Already constructed node
    Node(N),
    /// Entries flattened inline at this position
    Group(Vec<Arg<N, V>>),
    /// Indent marker: one level deeper from here on
    Indent,
    /// Hole in the stream; always rejected
    Absent,
}

impl<N, V> Arg<N, V> {
    pub fn value(value: V) -> Self {
        Self::Value(value)
    }

    pub fn node(node: N) -> Self {
        Self::Node(node)
    }

    pub fn group(args: impl IntoIterator<Item = impl Into<Arg<N, V>>>) -> Self {
        Self::Group(args.into_iter().map(Into::into).collect())
    }

    /// `n` consecutive indent markers.
    pub fn indents(n: usize) -> Self {
        Self::Group(std::iter::repeat_with(|| Self::Indent).take(n).collect())
    }

    /// Lift an optional value; `None` becomes [`Arg::Absent`].
    pub fn from_option(value: Option<V>) -> Self {
        value.map_or(Self::Absent, Self::Value)
    }
}

impl<N, V> From<Vec<Arg<N, V>>> for Arg<N, V> {
    fn from(args: Vec<Arg<N, V>>) -> Self {
        Self::Group(args)
    }
}

/// A flattened entry waiting to become a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item<N, V> {
    Value(V),
    Node(N),
}

/// Flatten `args` into `(depth, item)` pairs, left to right.
///
/// Nesting is walked with an explicit worklist, so arbitrarily deep groups
/// cannot overflow the call stack. Fails on the first [`Arg::Absent`];
/// `position` counts the leaf entries (markers included) seen before it.
pub fn flatten<N, V>(
    args: impl IntoIterator<Item = Arg<N, V>>,
    base_depth: usize,
) -> DomainResult<Vec<(usize, Item<N, V>)>> {
    let mut depth = base_depth;
    let mut position = 0;
    let mut items = Vec::new();
    let mut pending: Vec<std::vec::IntoIter<Arg<N, V>>> =
        vec![args.into_iter().collect::<Vec<_>>().into_iter()];

    while let Some(top) = pending.last_mut() {
        let Some(arg) = top.next() else {
            pending.pop();
            continue;
        };
        match arg {
            Arg::Group(inner) => {
                pending.push(inner.into_iter());
                continue;
            }
            Arg::Indent => depth += 1,
            Arg::Absent => {
                return Err(DomainError::invalid_argument(
                    position,
                    "found absent value in add call",
                ))
            }
            Arg::Value(value) => items.push((depth, Item::Value(value))),
            Arg::Node(node) => items.push((depth, Item::Node(node))),
        }
        position += 1;
    }

    Ok(items)
}

impl<N, A> DepthTreeBuilder<N, A>
where
    N: Clone,
    A: Attach<N>,
{
    /// Add the nodes of one call, starting at [`BASE_DEPTH`].
    pub fn add_args<V, F>(
        &mut self,
        args: impl IntoIterator<Item = Arg<N, V>>,
        to_node: F,
    ) -> DomainResult<usize>
    where
        F: FnMut(&mut A, V) -> N,
    {
        self.add_args_at(args, BASE_DEPTH, to_node)
    }

    /// Add the nodes of one call, starting at `base_depth`.
    ///
    /// The whole call is flattened and checked before anything is converted
    /// or registered, so a rejected call leaves the tree untouched.
    /// Returns the number of nodes added.
    #[instrument(level = "debug", skip(self, args, to_node))]
    pub fn add_args_at<V, F>(
        &mut self,
        args: impl IntoIterator<Item = Arg<N, V>>,
        base_depth: usize,
        mut to_node: F,
    ) -> DomainResult<usize>
    where
        F: FnMut(&mut A, V) -> N,
    {
        let items = flatten(args, base_depth)?;
        let count = items.len();

        for (depth, item) in items {
            let node = match item {
                Item::Value(value) => to_node(self.policy_mut(), value),
                Item::Node(node) => node,
            };
            self.register(node, depth);
        }

        debug!(count, "registered nodes");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type A = Arg<u32, &'static str>;

    #[test]
    fn given_plain_values_when_flattening_then_all_at_base_depth() {
        let items = flatten(vec![A::value("a"), A::value("b")], 1).unwrap();
        assert_eq!(items, vec![(1, Item::Value("a")), (1, Item::Value("b"))]);
    }

    #[test]
    fn given_interleaved_markers_when_flattening_then_depth_increases_within_call() {
        let items = flatten(
            vec![A::value("a"), A::Indent, A::value("b"), A::Indent, A::node(7)],
            1,
        )
        .unwrap();
        assert_eq!(
            items,
            vec![(1, Item::Value("a")), (2, Item::Value("b")), (3, Item::Node(7))]
        );
    }

    #[test]
    fn given_marker_inside_group_when_flattening_then_later_siblings_are_deeper() {
        let items = flatten(
            vec![A::group([A::Indent, A::value("a")]), A::value("b")],
            1,
        )
        .unwrap();
        assert_eq!(items, vec![(2, Item::Value("a")), (2, Item::Value("b"))]);
    }

    #[test]
    fn given_absent_after_values_when_flattening_then_reports_position() {
        let err = flatten(
            vec![A::value("a"), A::group([A::Indent, A::Absent])],
            1,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument { position: 2, .. }));
    }

    #[test]
    fn given_deeply_nested_groups_when_flattening_then_no_stack_overflow() {
        let mut arg = A::value("leaf");
        for _ in 0..100_000 {
            arg = A::Group(vec![arg]);
        }
        let items = flatten(vec![arg], 1).unwrap();
        assert_eq!(items, vec![(1, Item::Value("leaf"))]);
    }

    #[test]
    fn given_indents_helper_when_flattening_then_counts_markers() {
        let items = flatten(vec![A::indents(3), A::value("x")], 0).unwrap();
        assert_eq!(items, vec![(3, Item::Value("x"))]);
    }

    #[test]
    fn given_none_when_lifting_option_then_absent() {
        assert_eq!(A::from_option(None), A::Absent);
        assert_eq!(A::from_option(Some("v")), A::Value("v"));
    }
}
