//! Leaf resources: serve content, reject unconsumed path components.

use std::borrow::Cow;

use http::Method;

use crate::dispatch::DispatchError;
use crate::mapping::enumerator::Declaration;
use crate::mapping::error::MappingError;
use crate::mapping::segment::Variable;
use crate::resource::context::Context;
use crate::resource::method::MethodTable;
use crate::resource::{DeclareBranches, HandleRequest, Identity, Outcome, Resource};

/// A resource that only serves at the end of the path.
#[derive(Debug)]
pub struct Leaf {
    identity: Identity,
    methods: MethodTable,
    optional: Vec<Variable>,
}

impl Leaf {
    pub fn new(type_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            identity: Identity::new(type_name),
            methods: MethodTable::new(),
            optional: Vec::new(),
        }
    }

    /// Set an explicit resource-id.
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

    /// Handler for methods without a specific one.
    pub fn any<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<Outcome, DispatchError> + Send + Sync + 'static,
    {
        self.methods.set_any(handler);
        self
    }

    /// Declare an optional query parameter.
    pub fn optional(mut self, variable: Variable) -> Self {
        self.optional.push(variable);
        self
    }
}

impl DeclareBranches for Leaf {
    fn declare(&self, decl: &mut Declaration) -> Result<(), MappingError> {
        decl.serve()?;
        for variable in &self.optional {
            decl.optional_param(variable.clone());
        }
        Ok(())
    }
}

impl HandleRequest for Leaf {
    fn handle(&self, ctx: &mut Context<'_>) -> Result<Outcome, DispatchError> {
        if !ctx.locator().is_leaf() {
            tracing::debug!(remaining = ?ctx.locator().remaining(), "leaf reached with components left");
            return Ok(Outcome::NotFound);
        }
        self.methods.dispatch(ctx)
    }
}

impl Resource for Leaf {
    fn identity(&self) -> &Identity {
        &self.identity
    }
}
