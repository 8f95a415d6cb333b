//! Static enumeration of every path a resource tree serves.
//!
//! The enumerator asks each node, once, to declare its shape through a
//! [`Declaration`], then walks the declared branches depth-first while
//! accumulating path segments and optional parameters. Its output is the
//! single source both the URL templates and the matching regexes are built
//! from.

use crate::mapping::error::{MappingError, Result};
use crate::mapping::segment::{Segment, Variable};
use crate::resource::tree::{NodeId, Tree};

/// One way a node delegates to another.
#[derive(Debug, Clone)]
pub enum Branch {
    /// Forward without consuming a component.
    Anonymous(NodeId),
    /// Consume a literal component.
    Fixed(String, NodeId),
    /// Consume one variable component.
    Var(Variable, NodeId),
}

impl Branch {
    pub fn target(&self) -> NodeId {
        match self {
            Branch::Anonymous(node) | Branch::Fixed(_, node) | Branch::Var(_, node) => *node,
        }
    }
}

/// Visitor handed to `DeclareBranches::declare`.
#[derive(Debug)]
pub struct Declaration {
    resource: String,
    leaf: Option<Option<Variable>>,
    branches: Vec<Branch>,
    optional: Vec<Variable>,
}

impl Declaration {
    pub(crate) fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            leaf: None,
            branches: Vec::new(),
            optional: Vec::new(),
        }
    }

    /// Declare that the node can serve content at this point of the path.
    pub fn serve(&mut self) -> Result<()> {
        self.set_leaf(None)
    }

    /// Declare that the node serves content after consuming one more
    /// variable component.
    pub fn serve_var(&mut self, variable: Variable) -> Result<()> {
        self.set_leaf(Some(variable))
    }

    /// Declare a query-style optional parameter.
    pub fn optional_param(&mut self, variable: Variable) {
        self.optional.push(variable);
    }

    pub fn branch_anonymous(&mut self, node: NodeId) {
        self.branches.push(Branch::Anonymous(node));
    }

    pub fn branch_fixed(&mut self, component: impl Into<String>, node: NodeId) {
        self.branches.push(Branch::Fixed(component.into(), node));
    }

    pub fn branch_var(&mut self, variable: Variable, node: NodeId) {
        self.branches.push(Branch::Var(variable, node));
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf.is_some()
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    fn set_leaf(&mut self, trailing: Option<Variable>) -> Result<()> {
        if self.is_leaf() {
            return Err(MappingError::DuplicateLeaf {
                resource: self.resource.clone(),
            });
        }
        self.leaf = Some(trailing);
        Ok(())
    }
}

/// A complete path shape ending at a servable node.
#[derive(Debug, Clone, PartialEq)]
pub struct PathDescriptor {
    pub node: NodeId,
    pub segments: Vec<Segment>,
    pub optional: Vec<Variable>,
    /// The node also has further branches, so its URL ends with `/`.
    pub non_terminal: bool,
}

/// Depth-first tree walker.
pub struct Enumerator<'t> {
    tree: &'t Tree,
    paths: Vec<PathDescriptor>,
}

impl<'t> Enumerator<'t> {
    pub fn new(tree: &'t Tree) -> Self {
        Self {
            tree,
            paths: Vec::new(),
        }
    }

    /// Walk from the root and return every servable path.
    pub fn run(mut self) -> Result<Vec<PathDescriptor>> {
        let root = self.tree.root();
        self.visit("<root>", root, Vec::new(), Vec::new())?;
        Ok(self.paths)
    }

    fn visit(
        &mut self,
        parent: &str,
        node: NodeId,
        segments: Vec<Segment>,
        mut optional: Vec<Variable>,
    ) -> Result<()> {
        let resource = self
            .tree
            .get(node)
            .ok_or_else(|| MappingError::UnknownNode {
                resource: parent.to_string(),
                node: node.index(),
            })?;
        let name = resource.identity().type_name().to_string();

        let mut decl = Declaration::new(name.clone());
        resource.declare(&mut decl)?;
        let Declaration {
            leaf,
            branches,
            optional: declared,
            ..
        } = decl;
        optional.extend(declared);

        if let Some(trailing) = leaf {
            let mut leaf_segments = segments.clone();
            leaf_segments.extend(trailing.map(Segment::Var));
            tracing::trace!(resource = %name, depth = leaf_segments.len(), "leaf declared");
            self.paths.push(PathDescriptor {
                node,
                segments: leaf_segments,
                optional: optional.clone(),
                non_terminal: !branches.is_empty(),
            });
        }

        for branch in branches {
            let mut child = segments.clone();
            let target = branch.target();
            match branch {
                Branch::Anonymous(_) => {}
                Branch::Fixed(literal, _) => child.push(Segment::Fixed(literal)),
                Branch::Var(variable, _) => child.push(Segment::Var(variable)),
            }
            self.visit(&name, target, child, optional.clone())?;
        }
        Ok(())
    }
}

/// Enumerate all servable paths of `tree`.
pub fn enumerate(tree: &Tree) -> Result<Vec<PathDescriptor>> {
    Enumerator::new(tree).run()
}
