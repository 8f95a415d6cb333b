//! Dispatch observers.
//!
//! Observers see every top-level request, every hand-off from one resource
//! to the next, and every URL rendered while handling. That is enough to
//! build a call graph or a handled/rendered coverage table after the fact.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::observability::metrics;

/// What happened during one top-level request, across internal redirects.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    handled: Vec<String>,
    rendered: Vec<(Option<String>, String)>,
    redirects: usize,
    outcome: Option<&'static str>,
}

impl Trace {
    /// Resource-ids in the order they handled the request.
    pub fn handled(&self) -> &[String] {
        &self.handled
    }

    /// `(rendering resource, rendered resource)` pairs.
    pub fn rendered(&self) -> &[(Option<String>, String)] {
        &self.rendered
    }

    pub fn redirects(&self) -> usize {
        self.redirects
    }

    /// Outcome label; `None` if the dispatch failed with an error.
    pub fn outcome(&self) -> Option<&'static str> {
        self.outcome
    }

    pub(crate) fn push_handled(&mut self, resource_id: &str) {
        self.handled.push(resource_id.to_string());
    }

    pub(crate) fn push_rendered(&mut self, from: Option<&str>, resource_id: &str) {
        self.rendered
            .push((from.map(str::to_owned), resource_id.to_string()));
    }

    pub(crate) fn count_redirect(&mut self) -> usize {
        self.redirects += 1;
        self.redirects
    }

    pub(crate) fn finish(&mut self, outcome: Option<&'static str>) {
        self.outcome = outcome;
    }
}

/// Receives dispatch events. Every method defaults to a no-op.
///
/// Observers are shared across concurrent dispatches, so per-request state
/// must be keyed by `request_id`.
pub trait Observer: Send + Sync {
    fn begin(&self, _request_id: Uuid, _uri: &str) {}

    /// `resource_id` is about to handle the request.
    fn handled(&self, _request_id: Uuid, _resource_id: &str) {}

    /// `from` rendered a URL for `resource_id`.
    fn rendered(&self, _request_id: Uuid, _from: Option<&str>, _resource_id: &str) {}

    fn end(&self, _request_id: Uuid, _trace: &Trace) {}
}

/// Logs the handling chain of each request when it ends.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn end(&self, request_id: Uuid, trace: &Trace) {
        tracing::info!(
            %request_id,
            chain = %trace.handled().join(" -> "),
            rendered = trace.rendered().len(),
            redirects = trace.redirects(),
            outcome = trace.outcome().unwrap_or("error"),
            "request finished"
        );
    }
}

/// Kind of call-graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// One resource handed the request to the next.
    Delegate,
    /// A resource rendered a URL for another.
    Render,
}

/// Edge between two resource-ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// Call graph accumulated across requests.
#[derive(Debug, Default)]
pub struct CallGraph {
    edges: DashMap<Edge, u64>,
    last: DashMap<Uuid, String>,
}

impl CallGraph {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn bump(&self, from: &str, to: &str, kind: EdgeKind) {
        let edge = Edge {
            from: from.to_string(),
            to: to.to_string(),
            kind,
        };
        *self.edges.entry(edge).or_insert(0) += 1;
    }

    pub fn count(&self, from: &str, to: &str, kind: EdgeKind) -> u64 {
        let edge = Edge {
            from: from.to_string(),
            to: to.to_string(),
            kind,
        };
        self.edges.get(&edge).map(|n| *n).unwrap_or(0)
    }

    /// Snapshot of every edge, sorted.
    pub fn edges(&self) -> Vec<(Edge, u64)> {
        let mut edges: Vec<_> = self
            .edges
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        edges.sort();
        edges
    }
}

impl Observer for CallGraph {
    fn handled(&self, request_id: Uuid, resource_id: &str) {
        if let Some(prev) = self.last.insert(request_id, resource_id.to_string()) {
            self.bump(&prev, resource_id, EdgeKind::Delegate);
        }
    }

    fn rendered(&self, _request_id: Uuid, from: Option<&str>, resource_id: &str) {
        if let Some(from) = from {
            self.bump(from, resource_id, EdgeKind::Render);
        }
    }

    fn end(&self, request_id: Uuid, _trace: &Trace) {
        self.last.remove(&request_id);
    }
}

/// Forwards handled/rendered events to the metrics facade.
#[derive(Debug, Default)]
pub struct MetricsObserver;

impl Observer for MetricsObserver {
    fn handled(&self, _request_id: Uuid, resource_id: &str) {
        metrics::record_handled(resource_id);
    }

    fn rendered(&self, _request_id: Uuid, _from: Option<&str>, resource_id: &str) {
        metrics::record_rendered(resource_id);
    }
}
