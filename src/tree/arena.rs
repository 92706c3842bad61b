use crate::errors::{MinerError, Result};
use crate::tree::node::Node;
use crate::tree::raw::RawNode;

/// Storage for a single node inside a [`Tree`].
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) label: String,
    pub(crate) token: Option<String>,
    /// Non-owning back-reference; the root has none.
    pub(crate) parent: Option<usize>,
    /// Child indices in source order.
    pub(crate) children: Vec<usize>,
}

/// A parse tree stored as an arena of nodes.
///
/// The tree owns every node. Parent links are plain indices, so walking
/// upward never implies ownership. The root always lives at index 0.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    /// Builds a tree from its serialized form, validating the leaf/token invariant.
    pub fn from_raw(raw: &RawNode) -> Result<Self> {
        let mut builder = TreeBuilder::new();
        let mut stack: Vec<(&RawNode, Option<usize>)> = vec![(raw, None)];
        // Depth-first with an explicit stack; children are pushed reversed so
        // that indices are assigned in pre-order.
        while let Some((node, parent)) = stack.pop() {
            let id = builder.push(parent, node.label.clone(), node.token.clone())?;
            for child in node.children.iter().rev() {
                stack.push((child, Some(id)));
            }
        }
        builder.finish()
    }

    /// Returns the root node.
    pub fn root(&self) -> Node<'_> {
        Node::new(self, 0)
    }

    /// Returns the node stored at `index`, if any.
    pub fn node(&self, index: usize) -> Option<Node<'_>> {
        (index < self.nodes.len()).then(|| Node::new(self, index))
    }

    /// Total number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A finished tree always has a root, so this is never `true`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn data(&self, index: usize) -> &NodeData {
        &self.nodes[index]
    }
}

/// Incremental construction of a [`Tree`], used by backends that walk a
/// foreign syntax tree.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node under `parent` (or as the root when `parent` is `None`)
    /// and returns its index.
    ///
    /// Only the first node may be a root, and `parent` must already exist.
    pub fn push(
        &mut self,
        parent: Option<usize>,
        label: impl Into<String>,
        token: Option<String>,
    ) -> Result<usize> {
        let label = label.into();
        let id = self.nodes.len();
        match parent {
            None if id != 0 => {
                return Err(MinerError::MalformedTree {
                    message: "tree already has a root".to_string(),
                    label,
                });
            }
            Some(p) if p >= id => {
                return Err(MinerError::MalformedTree {
                    message: format!("parent index {p} does not exist"),
                    label,
                });
            }
            Some(p) => self.nodes[p].children.push(id),
            None => {}
        }
        self.nodes.push(NodeData {
            label,
            token,
            parent,
            children: Vec::new(),
        });
        Ok(id)
    }

    /// Sets (or replaces) the token of an already pushed node.
    pub fn set_token(&mut self, id: usize, token: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.token = Some(token.into());
        }
    }

    /// Returns `true` if the node at `id` has at least one child.
    pub fn has_children(&self, id: usize) -> bool {
        self.nodes.get(id).is_some_and(|n| !n.children.is_empty())
    }

    /// Validates the leaf/token invariant and returns the finished tree.
    pub fn finish(self) -> Result<Tree> {
        if self.nodes.is_empty() {
            return Err(MinerError::MalformedTree {
                message: "tree has no nodes".to_string(),
                label: String::new(),
            });
        }
        for node in &self.nodes {
            let is_leaf = node.children.is_empty();
            if is_leaf && node.token.is_none() {
                return Err(MinerError::MalformedTree {
                    message: "leaf without a token".to_string(),
                    label: node.label.clone(),
                });
            }
            if !is_leaf && node.token.is_some() {
                return Err(MinerError::MalformedTree {
                    message: "inner node carries a token".to_string(),
                    label: node.label.clone(),
                });
            }
        }
        Ok(Tree { nodes: self.nodes })
    }
}
