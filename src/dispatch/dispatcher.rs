//! Request dispatch loop.

use std::sync::Arc;

use arc_swap::ArcSwap;
use http::Method;
use uuid::Uuid;

use crate::config::schema::DispatchConfig;
use crate::dispatch::error::DispatchError;
use crate::dispatch::observer::{Observer, Trace};
use crate::mapping::mapper::Mapper;
use crate::observability::metrics;
use crate::resource::context::Context;
use crate::resource::locator::PathLocator;
use crate::resource::response::Response;
use crate::resource::tree::Tree;
use crate::resource::{Args, Outcome};

/// An incoming request, as far as the tree cares.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Path, including the root location if one is configured.
    pub uri: String,
    pub args: Args,
}

impl Request {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            args: Args::new(),
        }
    }

    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }
}

/// Forward mapper: walks the resource tree of the published mapper.
pub struct Dispatcher {
    mapper: ArcSwap<Mapper>,
    observers: Vec<Arc<dyn Observer>>,
    max_redirects: Option<usize>,
}

impl Dispatcher {
    /// `mapper` must have been initialized from a tree.
    pub fn new(mapper: Mapper) -> Self {
        Self {
            mapper: ArcSwap::from_pointee(mapper),
            observers: Vec::new(),
            max_redirects: None,
        }
    }

    pub fn from_config(mapper: Mapper, config: &DispatchConfig) -> Self {
        Self::new(mapper).with_max_redirects(config.max_internal_redirects)
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Ceiling on internal redirects per request; `None` is unbounded.
    pub fn with_max_redirects(mut self, limit: Option<usize>) -> Self {
        self.max_redirects = limit;
        self
    }

    /// Swap in a new mapper. Requests already running keep the old one.
    pub fn publish(&self, mapper: Mapper) {
        tracing::info!(mappings = mapper.len(), "publishing mapper");
        self.mapper.store(Arc::new(mapper));
    }

    /// Current mapper snapshot.
    pub fn mapper(&self) -> Arc<Mapper> {
        self.mapper.load_full()
    }

    /// Resolve `request` through the tree.
    ///
    /// NotFound and Forbidden are also signalled on `response`.
    pub fn dispatch(
        &self,
        request: Request,
        response: &mut dyn Response,
    ) -> Result<Outcome, DispatchError> {
        let mapper = self.mapper.load_full();
        let tree = mapper.tree().ok_or(DispatchError::NoTree)?.clone();

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "dispatch",
            %request_id,
            method = %request.method,
            uri = %request.uri
        );
        let _enter = span.enter();

        for observer in &self.observers {
            observer.begin(request_id, &request.uri);
        }

        let mut trace = Trace::default();
        let result = self.run(request_id, &mapper, &tree, request, response, &mut trace);

        match &result {
            Ok(Outcome::NotFound) => response.not_found(),
            Ok(Outcome::Forbidden) => response.forbidden(),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "dispatch failed"),
        }
        let label = result.as_ref().ok().map(Outcome::label);
        metrics::record_outcome(label.unwrap_or("error"));
        trace.finish(label);

        for observer in &self.observers {
            observer.end(request_id, &trace);
        }
        result
    }

    fn run(
        &self,
        request_id: Uuid,
        mapper: &Mapper,
        tree: &Tree,
        request: Request,
        response: &mut dyn Response,
        trace: &mut Trace,
    ) -> Result<Outcome, DispatchError> {
        let Request {
            method,
            mut uri,
            mut args,
        } = request;
        let root = mapper.root_location().unwrap_or("");

        loop {
            let path = strip_root(root, &uri)?;
            let locator = PathLocator::with_root(root, path);
            let mut ctx = Context::new(
                request_id,
                method.clone(),
                locator,
                args,
                mapper,
                tree,
                &mut *response,
                &self.observers,
                &mut *trace,
            );

            match ctx.delegate(tree.root())? {
                Outcome::Redirect {
                    uri: next,
                    args: next_args,
                } => {
                    drop(ctx);
                    let count = trace.count_redirect();
                    if let Some(limit) = self.max_redirects {
                        if count > limit {
                            return Err(DispatchError::RedirectLimit { limit });
                        }
                    }
                    tracing::debug!(from = %uri, to = %next, "internal redirect");
                    metrics::record_redirect();
                    uri = next;
                    args = next_args;
                }
                outcome => return Ok(outcome),
            }
        }
    }
}

/// Remove `root` from the front of `uri`, along with any query or fragment.
fn strip_root<'u>(root: &str, uri: &'u str) -> Result<&'u str, DispatchError> {
    let end = uri.find(['?', '#']).unwrap_or(uri.len());
    let path = &uri[..end];
    if root.is_empty() {
        return Ok(path);
    }
    match path.strip_prefix(root) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => Ok(rest),
        _ => Err(DispatchError::RootMismatch {
            root: root.to_string(),
            uri: uri.to_string(),
        }),
    }
}
