//! Per-request state handed from resource to resource.

use std::collections::BTreeMap;
use std::sync::Arc;

use http::{Extensions, Method};
use uuid::Uuid;

use crate::dispatch::observer::{Observer, Trace};
use crate::dispatch::DispatchError;
use crate::mapping::mapper::Mapper;
use crate::mapping::params::Params;
use crate::mapping::value::Value;
use crate::resource::locator::PathLocator;
use crate::resource::response::Response;
use crate::resource::tree::{NodeId, Tree};
use crate::resource::{Args, Outcome};

/// Request context.
///
/// Created by the dispatcher for each pass through the tree and dropped
/// when the pass ends; an internal redirect starts over with a fresh one.
pub struct Context<'a> {
    request_id: Uuid,
    method: Method,
    locator: PathLocator,
    args: Args,
    slots: BTreeMap<String, Value>,
    extensions: Extensions,
    resource_id: Option<String>,
    node: Option<NodeId>,
    mapper: &'a Mapper,
    tree: &'a Tree,
    response: &'a mut dyn Response,
    observers: &'a [Arc<dyn Observer>],
    trace: &'a mut Trace,
}

impl<'a> Context<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        request_id: Uuid,
        method: Method,
        locator: PathLocator,
        args: Args,
        mapper: &'a Mapper,
        tree: &'a Tree,
        response: &'a mut dyn Response,
        observers: &'a [Arc<dyn Observer>],
        trace: &'a mut Trace,
    ) -> Self {
        Self {
            request_id,
            method,
            locator,
            args,
            slots: BTreeMap::new(),
            extensions: Extensions::new(),
            resource_id: None,
            node: None,
            mapper,
            tree,
            response,
            observers,
            trace,
        }
    }

    /// Hand the request to `node`.
    pub fn delegate(&mut self, node: NodeId) -> Result<Outcome, DispatchError> {
        let tree = self.tree;
        let resource = tree.get(node).ok_or(DispatchError::UnknownNode {
            node: node.index(),
        })?;

        let resource_id = match self.mapper.resource_id(node) {
            Some(id) => id.to_string(),
            None => {
                let identity = resource.identity();
                identity
                    .explicit_id()
                    .map(str::to_owned)
                    .unwrap_or_else(|| self.mapper.options().naming.resource_id(identity.type_name()))
            }
        };

        tracing::debug!(
            resource_id = %resource_id,
            remaining = ?self.locator.remaining(),
            "delegating"
        );
        self.trace.push_handled(&resource_id);
        for observer in self.observers {
            observer.handled(self.request_id, &resource_id);
        }
        self.resource_id = Some(resource_id);
        self.node = Some(node);

        resource.handle(self)
    }

    /// Render the URL of `id`, reporting it to the observers.
    pub fn url(&mut self, id: &str, params: Params<'_>) -> Result<String, DispatchError> {
        let url = self.mapper.render(id, params)?;
        let from = self.resource_id.as_deref();
        self.trace.push_rendered(from, id);
        for observer in self.observers {
            observer.rendered(self.request_id, from, id);
        }
        Ok(url)
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn locator(&self) -> &PathLocator {
        &self.locator
    }

    pub fn locator_mut(&mut self) -> &mut PathLocator {
        &mut self.locator
    }

    /// Request arguments, untouched.
    pub fn args(&self) -> &Args {
        &self.args
    }

    /// Store a value consumed from the path.
    pub fn set_slot(&mut self, name: &str, value: Value) -> Result<(), DispatchError> {
        if self.slots.contains_key(name) {
            return Err(DispatchError::SlotOccupied {
                name: name.to_string(),
            });
        }
        self.slots.insert(name.to_string(), value);
        Ok(())
    }

    pub fn slot(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)
    }

    pub fn slots(&self) -> &BTreeMap<String, Value> {
        &self.slots
    }

    /// Typed storage for application data, e.g. an authenticated user.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Id of the resource currently handling the request.
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn mapper(&self) -> &'a Mapper {
        self.mapper
    }

    pub fn response(&mut self) -> &mut dyn Response {
        &mut *self.response
    }
}
