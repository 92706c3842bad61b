use std::fmt;

use crate::errors::{MinerError, Result};
use crate::tree::arena::{NodeData, Tree};
use crate::tree::label::{first_segment, last_segment, BackendLabel};
use crate::tree::raw::RawNode;

/// A borrowed handle to one node of a [`Tree`].
///
/// Handles are `Copy` and only valid for the lifetime of the tree they point into.
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t Tree,
    index: usize,
}

impl<'t> Node<'t> {
    pub(crate) fn new(tree: &'t Tree, index: usize) -> Self {
        Self { tree, index }
    }

    fn data(&self) -> &'t NodeData {
        self.tree.data(self.index)
    }

    /// The tree this node belongs to.
    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    /// Position of this node in the arena (pre-order index for trees built from raw input).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Full label, possibly a collapsed chain such as `a|b`.
    pub fn label(&self) -> &'t str {
        &self.data().label
    }

    /// First segment of the label.
    pub fn first_label(&self) -> &'t str {
        first_segment(self.label())
    }

    /// Last segment of the label.
    pub fn last_label(&self) -> &'t str {
        last_segment(self.label())
    }

    /// Children in source order.
    pub fn children(&self) -> impl ExactSizeIterator<Item = Node<'t>> + DoubleEndedIterator + 't {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&index| Node::new(tree, index))
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// Non-owning link to the parent node.
    pub fn parent(&self) -> Option<Node<'t>> {
        self.data().parent.map(|index| Node::new(self.tree, index))
    }

    pub fn is_leaf(&self) -> bool {
        self.data().children.is_empty()
    }

    /// Original text of a leaf.
    pub fn token(&self) -> Result<&'t str> {
        match (&self.data().token, self.is_leaf()) {
            (Some(token), true) => Ok(token.as_str()),
            _ => Err(MinerError::NotALeaf {
                label: self.label().to_string(),
            }),
        }
    }

    /// First direct child whose first label segment equals `label`.
    pub fn first_child_of_label<L: BackendLabel>(&self, label: L) -> Option<Node<'t>> {
        self.children().find(|c| c.first_label() == label.as_str())
    }

    /// All direct children whose first label segment equals `label`.
    pub fn children_of_label<L: BackendLabel>(
        &self,
        label: L,
    ) -> impl Iterator<Item = Node<'t>> + 't {
        self.children()
            .filter(move |c| c.first_label() == label.as_str())
    }

    /// Pre-order traversal of this subtree, starting with the node itself.
    ///
    /// Every call returns a fresh, independent iterator.
    pub fn pre_order(&self) -> PreOrder<'t> {
        PreOrder {
            tree: self.tree,
            stack: vec![self.index],
        }
    }

    /// Proper ancestors, nearest first.
    pub fn ancestors(&self) -> Ancestors<'t> {
        Ancestors {
            tree: self.tree,
            next: self.data().parent,
        }
    }

    /// Walks upward starting at this node and returns the first node matching `pred`.
    pub fn find_ancestor_or_self<F>(&self, mut pred: F) -> Option<Node<'t>>
    where
        F: FnMut(&Node<'t>) -> bool,
    {
        std::iter::once(*self)
            .chain(self.ancestors())
            .find(|n| pred(n))
    }

    /// Whole label equals one of `set`.
    pub fn label_is_one_of<L: BackendLabel>(&self, set: &[L]) -> bool {
        set.iter().any(|l| l.as_str() == self.label())
    }

    /// First label segment is one of `set`.
    pub fn first_label_in<L: BackendLabel>(&self, set: &[L]) -> bool {
        set.iter().any(|l| l.as_str() == self.first_label())
    }

    /// Last label segment is one of `set`.
    pub fn last_label_in<L: BackendLabel>(&self, set: &[L]) -> bool {
        set.iter().any(|l| l.as_str() == self.last_label())
    }

    pub fn has_last_label<L: BackendLabel>(&self, label: L) -> bool {
        self.last_label() == label.as_str()
    }

    /// Interprets the last label segment in the vocabulary `L`.
    pub fn kind<L: BackendLabel>(&self) -> Option<L> {
        L::from_label(self.last_label())
    }

    /// Number of nodes in this subtree, including the node itself.
    pub fn size(&self) -> usize {
        self.pre_order().count()
    }

    /// Tokens of every leaf in the subtree, in pre-order.
    pub fn leaf_tokens(&self) -> Vec<&'t str> {
        self.pre_order().filter_map(|n| n.token().ok()).collect()
    }

    /// Concatenation of all leaf tokens with no separator.
    pub fn subtree_text(&self) -> String {
        self.leaf_tokens().concat()
    }

    /// Owned, serializable copy of this subtree.
    pub fn to_raw(&self) -> RawNode {
        // Post-order with an explicit stack; finished children sit at the end
        // of `done` in source order when their parent is assembled.
        let mut done: Vec<RawNode> = Vec::new();
        let mut stack = vec![(*self, false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                let children = done.split_off(done.len() - node.child_count());
                done.push(RawNode {
                    label: node.label().to_string(),
                    token: node.data().token.clone(),
                    children,
                });
            } else {
                stack.push((node, true));
                stack.extend(node.children().rev().map(|c| (c, false)));
            }
        }
        done.pop()
            .unwrap_or_else(|| RawNode::inner(self.label(), Vec::new()))
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Node");
        s.field("index", &self.index).field("label", &self.label());
        if let Some(token) = &self.data().token {
            s.field("token", token);
        }
        s.finish()
    }
}

/// Lazy pre-order iterator over a subtree.
#[derive(Debug, Clone)]
pub struct PreOrder<'t> {
    tree: &'t Tree,
    stack: Vec<usize>,
}

impl<'t> Iterator for PreOrder<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        self.stack
            .extend(self.tree.data(index).children.iter().rev().copied());
        Some(Node::new(self.tree, index))
    }
}

/// Iterator over the ancestors of a node, nearest first.
#[derive(Debug, Clone)]
pub struct Ancestors<'t> {
    tree: &'t Tree,
    next: Option<usize>,
}

impl<'t> Iterator for Ancestors<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        self.next = self.tree.data(index).parent;
        Some(Node::new(self.tree, index))
    }
}
