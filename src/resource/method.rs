//! Per-resource handler table keyed by request method.

use std::collections::HashMap;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

use http::Method;

use crate::dispatch::DispatchError;
use crate::resource::context::Context;
use crate::resource::Outcome;

/// A request handler.
pub type Handler = Arc<dyn Fn(&mut Context<'_>) -> Result<Outcome, DispatchError> + Send + Sync>;

/// Local work run before forwarding. `Break` stops the chain with that outcome.
pub type Guard =
    Arc<dyn Fn(&mut Context<'_>) -> Result<ControlFlow<Outcome>, DispatchError> + Send + Sync>;

/// Handlers by method, with an optional catch-all.
#[derive(Clone, Default)]
pub struct MethodTable {
    handlers: HashMap<Method, Handler>,
    any: Option<Handler>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<F>(&mut self, method: Method, handler: F)
    where
        F: Fn(&mut Context<'_>) -> Result<Outcome, DispatchError> + Send + Sync + 'static,
    {
        self.handlers.insert(method, Arc::new(handler));
    }

    pub fn set_any<F>(&mut self, handler: F)
    where
        F: Fn(&mut Context<'_>) -> Result<Outcome, DispatchError> + Send + Sync + 'static,
    {
        self.any = Some(Arc::new(handler));
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty() && self.any.is_none()
    }

    fn lookup(&self, method: &Method) -> Option<Handler> {
        self.handlers.get(method).or(self.any.as_ref()).cloned()
    }

    /// Run the handler for the request method; NotFound when there is none.
    pub fn dispatch(&self, ctx: &mut Context<'_>) -> Result<Outcome, DispatchError> {
        Ok(self.run(ctx)?.unwrap_or(Outcome::NotFound))
    }

    /// Run the handler for the request method, if any.
    pub fn run(&self, ctx: &mut Context<'_>) -> Result<Option<Outcome>, DispatchError> {
        match self.lookup(ctx.method()) {
            Some(handler) => handler(ctx).map(Some),
            None => {
                tracing::debug!(method = %ctx.method(), "no handler for method");
                Ok(None)
            }
        }
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("methods", &self.handlers.keys().collect::<Vec<_>>())
            .field("any", &self.any.is_some())
            .finish()
    }
}
