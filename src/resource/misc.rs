//! Small general-purpose resources.

use std::ops::ControlFlow;

use crate::dispatch::DispatchError;
use crate::mapping::enumerator::Declaration;
use crate::mapping::error::MappingError;
use crate::mapping::params::Params;
use crate::mapping::table::TableOrder;
use crate::resource::context::Context;
use crate::resource::delegate::Forward;
use crate::resource::tree::NodeId;
use crate::resource::{DeclareBranches, HandleRequest, Identity, Outcome, Resource};

/// Leaf answering with an external redirect to another resource's URL.
#[derive(Debug)]
pub struct Redirect {
    identity: Identity,
    target: String,
}

impl Redirect {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            identity: Identity::new("Redirect"),
            target: target.into(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.identity = self.identity.with_id(id);
        self
    }
}

impl DeclareBranches for Redirect {
    fn declare(&self, decl: &mut Declaration) -> Result<(), MappingError> {
        decl.serve()
    }
}

impl HandleRequest for Redirect {
    fn handle(&self, ctx: &mut Context<'_>) -> Result<Outcome, DispatchError> {
        if !ctx.locator().is_leaf() {
            return Ok(Outcome::NotFound);
        }
        let target = ctx.url(&self.target, Params::new())?;
        ctx.response().redirect(&target);
        Ok(Outcome::Handled)
    }
}

impl Resource for Redirect {
    fn identity(&self) -> &Identity {
        &self.identity
    }
}

/// Logs the request URI to the response log, then forwards.
#[derive(Debug)]
pub struct LogRequests {
    identity: Identity,
    forward: Forward,
}

impl LogRequests {
    pub fn new(next: NodeId) -> Self {
        Self {
            identity: Identity::new("LogRequests"),
            forward: Forward::new(next).with_guard(|ctx| {
                let line = format!("----------------------------- {}", ctx.locator().uri(None));
                ctx.response().log(&line);
                Ok(ControlFlow::Continue(()))
            }),
        }
    }
}

impl DeclareBranches for LogRequests {
    fn declare(&self, decl: &mut Declaration) -> Result<(), MappingError> {
        decl.branch_anonymous(self.forward.next());
        Ok(())
    }
}

impl HandleRequest for LogRequests {
    fn handle(&self, ctx: &mut Context<'_>) -> Result<Outcome, DispatchError> {
        self.forward.forward(ctx)
    }
}

impl Resource for LogRequests {
    fn identity(&self) -> &Identity {
        &self.identity
    }
}

/// Skips a fixed number of leading components, then forwards.
///
/// The skipped components are invisible to enumeration, so rendered URLs
/// for resources below do not include them.
#[derive(Debug)]
pub struct RemoveBase {
    identity: Identity,
    forward: Forward,
}

impl RemoveBase {
    pub fn new(count: usize, next: NodeId) -> Self {
        Self {
            identity: Identity::new("RemoveBase"),
            forward: Forward::new(next).with_guard(move |ctx| {
                for _ in 0..count {
                    ctx.locator_mut().advance();
                }
                Ok(ControlFlow::Continue(()))
            }),
        }
    }
}

impl DeclareBranches for RemoveBase {
    fn declare(&self, decl: &mut Declaration) -> Result<(), MappingError> {
        decl.branch_anonymous(self.forward.next());
        Ok(())
    }
}

impl HandleRequest for RemoveBase {
    fn handle(&self, ctx: &mut Context<'_>) -> Result<Outcome, DispatchError> {
        self.forward.forward(ctx)
    }
}

impl Resource for RemoveBase {
    fn identity(&self) -> &Identity {
        &self.identity
    }
}

/// Leaf serving the serialized mapping table as plain text.
#[derive(Debug)]
pub struct TableResource {
    identity: Identity,
    order: TableOrder,
}

impl TableResource {
    pub fn new(order: TableOrder) -> Self {
        Self {
            identity: Identity::new("TableResource"),
            order,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.identity = self.identity.with_id(id);
        self
    }
}

impl DeclareBranches for TableResource {
    fn declare(&self, decl: &mut Declaration) -> Result<(), MappingError> {
        decl.serve()
    }
}

impl HandleRequest for TableResource {
    fn handle(&self, ctx: &mut Context<'_>) -> Result<Outcome, DispatchError> {
        if !ctx.locator().is_leaf() {
            return Ok(Outcome::NotFound);
        }
        let mut body = ctx.mapper().serialize_table(self.order).join("\n");
        body.push('\n');
        let response = ctx.response();
        response.set_content_type("text/plain");
        response.write(&body);
        Ok(Outcome::Handled)
    }
}

impl Resource for TableResource {
    fn identity(&self) -> &Identity {
        &self.identity
    }
}
