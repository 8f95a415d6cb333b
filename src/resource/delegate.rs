//! Anonymous forwarding.

use std::borrow::Cow;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

use crate::dispatch::DispatchError;
use crate::mapping::enumerator::Declaration;
use crate::mapping::error::MappingError;
use crate::resource::context::Context;
use crate::resource::method::Guard;
use crate::resource::tree::NodeId;
use crate::resource::{DeclareBranches, HandleRequest, Identity, Outcome, Resource};

/// Forwarding half of a delegating resource: optional local work, then
/// hand-off to `next`.
#[derive(Clone)]
pub struct Forward {
    next: NodeId,
    guard: Option<Guard>,
}

impl Forward {
    pub fn new(next: NodeId) -> Self {
        Self { next, guard: None }
    }

    pub fn with_guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<ControlFlow<Outcome>, DispatchError>
            + Send
            + Sync
            + 'static,
    {
        self.guard = Some(Arc::new(guard));
        self
    }

    pub fn next(&self) -> NodeId {
        self.next
    }

    /// Run the guard, then delegate unless it stopped the chain.
    pub fn forward(&self, ctx: &mut Context<'_>) -> Result<Outcome, DispatchError> {
        if let Some(guard) = &self.guard {
            if let ControlFlow::Break(outcome) = guard(ctx)? {
                return Ok(outcome);
            }
        }
        ctx.delegate(self.next)
    }
}

impl fmt::Debug for Forward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forward")
            .field("next", &self.next)
            .field("guard", &self.guard.is_some())
            .finish()
    }
}

/// Does some local work, then forwards without consuming a component.
#[derive(Debug)]
pub struct Delegator {
    identity: Identity,
    forward: Forward,
}

impl Delegator {
    pub fn new(type_name: impl Into<Cow<'static, str>>, next: NodeId) -> Self {
        Self {
            identity: Identity::new(type_name),
            forward: Forward::new(next),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.identity = self.identity.with_id(id);
        self
    }

    /// Local work; returning `Break` stops forwarding.
    pub fn guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<ControlFlow<Outcome>, DispatchError>
            + Send
            + Sync
            + 'static,
    {
        self.forward = self.forward.with_guard(guard);
        self
    }
}

impl DeclareBranches for Delegator {
    fn declare(&self, decl: &mut Declaration) -> Result<(), MappingError> {
        decl.branch_anonymous(self.forward.next());
        Ok(())
    }
}

impl HandleRequest for Delegator {
    fn handle(&self, ctx: &mut Context<'_>) -> Result<Outcome, DispatchError> {
        self.forward.forward(ctx)
    }
}

impl Resource for Delegator {
    fn identity(&self) -> &Identity {
        &self.identity
    }
}
