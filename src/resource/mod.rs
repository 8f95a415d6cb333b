//! Resource subsystem.
//!
//! # Data Flow
//! ```text
//! Application wiring:
//!     TreeBuilder::add(Leaf / Folder / VarDelegator / ...)
//!     → Tree (arena, immutable)
//!
//! Initialization:
//!     Enumerator → DeclareBranches::declare (per node, once)
//!
//! Request time:
//!     Dispatcher → Context::delegate(root)
//!     → HandleRequest::handle (per node on the path)
//!     → Outcome
//! ```
//!
//! # Design Decisions
//! - Capabilities are small traits; variants compose helper structs
//!   (`SegmentConsumer`, `Forward`, `MethodTable`) instead of inheriting
//! - Per-request data lives in `Context`, never in resources
//! - Internal redirects are an `Outcome` value, not an unwinding signal

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::dispatch::DispatchError;
use crate::mapping::enumerator::Declaration;
use crate::mapping::error::MappingError;

pub mod context;
pub mod delegate;
pub mod folder;
pub mod leaf;
pub mod locator;
pub mod method;
pub mod misc;
pub mod response;
pub mod tree;
pub mod var;

pub use context::Context;
pub use delegate::{Delegator, Forward};
pub use folder::{Fallback, Folder};
pub use leaf::Leaf;
pub use locator::PathLocator;
pub use method::{Guard, Handler, MethodTable};
pub use misc::{LogRequests, Redirect, RemoveBase, TableResource};
pub use response::{BufferedResponse, Response};
pub use tree::{NodeId, Tree, TreeBuilder};
pub use var::{SegmentConsumer, VarDelegator, VarLeaf};

/// Request arguments (query or form values), passed through untouched.
pub type Args = BTreeMap<String, String>;

/// Result of handling a request at one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A response was produced.
    Handled,
    /// Restart dispatch with a new URI and arguments.
    Redirect { uri: String, args: Args },
    NotFound,
    Forbidden,
}

impl Outcome {
    /// Internal redirect to `uri` with no arguments.
    pub fn redirect(uri: impl Into<String>) -> Self {
        Outcome::Redirect {
            uri: uri.into(),
            args: Args::new(),
        }
    }

    pub fn redirect_with(uri: impl Into<String>, args: Args) -> Self {
        Outcome::Redirect {
            uri: uri.into(),
            args,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Handled => "handled",
            Outcome::Redirect { .. } => "redirect",
            Outcome::NotFound => "not_found",
            Outcome::Forbidden => "forbidden",
        }
    }
}

/// Naming data of a resource: an explicit id, or a type name from which the
/// mapper derives one.
#[derive(Debug, Clone)]
pub struct Identity {
    type_name: Cow<'static, str>,
    explicit: Option<String>,
}

impl Identity {
    pub fn new(type_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            type_name: type_name.into(),
            explicit: None,
        }
    }

    /// Identity named after a Rust type, without its module path.
    pub fn of<T: ?Sized>() -> Self {
        let full = std::any::type_name::<T>();
        let base = full.split('<').next().unwrap_or(full);
        let short = base.rsplit("::").next().unwrap_or(base);
        Self::new(short.to_string())
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.explicit = Some(id.into());
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn explicit_id(&self) -> Option<&str> {
        self.explicit.as_deref()
    }

    pub fn has_explicit_id(&self) -> bool {
        self.explicit.is_some()
    }
}

/// Declares how a node can be reached. Called once per tree initialization.
pub trait DeclareBranches {
    fn declare(&self, decl: &mut Declaration) -> Result<(), MappingError>;
}

/// Handles a request once dispatch reaches the node.
pub trait HandleRequest {
    fn handle(&self, ctx: &mut Context<'_>) -> Result<Outcome, DispatchError>;
}

/// A node of the resource tree.
pub trait Resource: DeclareBranches + HandleRequest + Send + Sync + 'static {
    fn identity(&self) -> &Identity;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PrintName;

    #[test]
    fn test_identity_of_type() {
        let identity = Identity::of::<PrintName>();
        assert_eq!(identity.type_name(), "PrintName");
        assert!(!identity.has_explicit_id());
    }

    #[test]
    fn test_explicit_id() {
        let identity = Identity::new("Folder").with_id("@@Root");
        assert_eq!(identity.explicit_id(), Some("@@Root"));
    }
}
