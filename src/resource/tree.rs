//! Arena holding every resource node of an application.
//!
//! Nodes are added bottom-up: a [`NodeId`] only exists once its node has been
//! added, so a parent can only reference children that already exist. A node
//! referenced from two parents (e.g. a folder's default that is also a named
//! child) is shared, not duplicated.

use std::fmt;

use crate::mapping::error::MappingError;
use crate::resource::Resource;

/// Index of a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Collects nodes before the root is known.
#[derive(Default)]
pub struct TreeBuilder {
    nodes: Vec<Box<dyn Resource>>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id.
    pub fn add<R: Resource>(&mut self, resource: R) -> NodeId {
        self.nodes.push(Box::new(resource));
        NodeId(self.nodes.len() - 1)
    }

    /// Freeze the arena with the given root.
    pub fn build(self, root: NodeId) -> Result<Tree, MappingError> {
        if root.0 >= self.nodes.len() {
            return Err(MappingError::UnknownNode {
                resource: "<root>".to_string(),
                node: root.0,
            });
        }
        Ok(Tree {
            nodes: self.nodes,
            root,
        })
    }
}

/// An immutable resource tree.
///
/// Resources hold no per-request state, so one tree can serve any number of
/// concurrent dispatches.
pub struct Tree {
    nodes: Vec<Box<dyn Resource>>,
    root: NodeId,
}

impl Tree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, node: NodeId) -> Option<&dyn Resource> {
        self.nodes.get(node.0).map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &dyn Resource)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, r)| (NodeId(i), r.as_ref()))
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .finish()
    }
}
