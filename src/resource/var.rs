//! Resources that consume one variable path component.

use std::borrow::Cow;
use std::ops::ControlFlow;

use http::Method;

use crate::dispatch::DispatchError;
use crate::mapping::enumerator::Declaration;
use crate::mapping::error::MappingError;
use crate::mapping::segment::Variable;
use crate::resource::context::Context;
use crate::resource::delegate::Forward;
use crate::resource::method::MethodTable;
use crate::resource::tree::NodeId;
use crate::resource::{DeclareBranches, HandleRequest, Identity, Outcome, Resource};

/// Takes the current component and stores it in the context under the
/// variable's name, coerced per its format. A component the format rejects
/// is not found.
#[derive(Debug, Clone)]
pub struct SegmentConsumer {
    variable: Variable,
}

impl SegmentConsumer {
    pub fn new(variable: Variable) -> Self {
        Self { variable }
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    /// `Break(NotFound)` if no component is left or it does not fit the format.
    pub fn consume(&self, ctx: &mut Context<'_>) -> Result<ControlFlow<Outcome>, DispatchError> {
        let Some(component) = ctx.locator().current().map(str::to_owned) else {
            tracing::debug!(variable = %self.variable.name(), "no component left to consume");
            return Ok(ControlFlow::Break(Outcome::NotFound));
        };
        let Some(value) = self.variable.try_coerce(&component) else {
            tracing::debug!(variable = %self.variable.name(), %component, "component rejected by format");
            return Ok(ControlFlow::Break(Outcome::NotFound));
        };
        tracing::debug!(variable = %self.variable.name(), %value, "component consumed");
        ctx.set_slot(self.variable.name(), value)?;
        ctx.locator_mut().advance();
        Ok(ControlFlow::Continue(()))
    }
}

/// Consumes one component, then serves.
#[derive(Debug)]
pub struct VarLeaf {
    identity: Identity,
    consumer: SegmentConsumer,
    methods: MethodTable,
    optional: Vec<Variable>,
}

impl VarLeaf {
    pub fn new(type_name: impl Into<Cow<'static, str>>, variable: Variable) -> Self {
        Self {
            identity: Identity::new(type_name),
            consumer: SegmentConsumer::new(variable),
            methods: MethodTable::new(),
            optional: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.identity = self.identity.with_id(id);
        self
    }

    pub fn on<F>(mut self, method: Method, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<Outcome, DispatchError> + Send + Sync + 'static,
    {
        self.methods.insert(method, handler);
        self
    }

    pub fn any<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<Outcome, DispatchError> + Send + Sync + 'static,
    {
        self.methods.set_any(handler);
        self
    }

    pub fn optional(mut self, variable: Variable) -> Self {
        self.optional.push(variable);
        self
    }
}

impl DeclareBranches for VarLeaf {
    fn declare(&self, decl: &mut Declaration) -> Result<(), MappingError> {
        decl.serve_var(self.consumer.variable().clone())?;
        for variable in &self.optional {
            decl.optional_param(variable.clone());
        }
        Ok(())
    }
}

impl HandleRequest for VarLeaf {
    fn handle(&self, ctx: &mut Context<'_>) -> Result<Outcome, DispatchError> {
        if let ControlFlow::Break(outcome) = self.consumer.consume(ctx)? {
            return Ok(outcome);
        }
        if !ctx.locator().is_leaf() {
            return Ok(Outcome::NotFound);
        }
        self.methods.dispatch(ctx)
    }
}

impl Resource for VarLeaf {
    fn identity(&self) -> &Identity {
        &self.identity
    }
}

/// Consumes one component, then forwards.
///
/// Validation of the consumed value belongs in the guard, which sees it in
/// the context and can stop the chain with `NotFound`.
#[derive(Debug)]
pub struct VarDelegator {
    identity: Identity,
    consumer: SegmentConsumer,
    forward: Forward,
}

impl VarDelegator {
    pub fn new(type_name: impl Into<Cow<'static, str>>, variable: Variable, next: NodeId) -> Self {
        Self {
            identity: Identity::new(type_name),
            consumer: SegmentConsumer::new(variable),
            forward: Forward::new(next),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.identity = self.identity.with_id(id);
        self
    }

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

impl DeclareBranches for VarDelegator {
    fn declare(&self, decl: &mut Declaration) -> Result<(), MappingError> {
        decl.branch_var(self.consumer.variable().clone(), self.forward.next());
        Ok(())
    }
}

impl HandleRequest for VarDelegator {
    fn handle(&self, ctx: &mut Context<'_>) -> Result<Outcome, DispatchError> {
        if let ControlFlow::Break(outcome) = self.consumer.consume(ctx)? {
            return Ok(outcome);
        }
        self.forward.forward(ctx)
    }
}

impl Resource for VarDelegator {
    fn identity(&self) -> &Identity {
        &self.identity
    }
}
