//! Metrics collection.
//!
//! # Metrics
//! - `urlmap_handled_total` (counter): requests handled, by resource-id
//! - `urlmap_rendered_total` (counter): URLs rendered, by resource-id
//! - `urlmap_dispatch_total` (counter): finished dispatches, by outcome
//! - `urlmap_internal_redirects_total` (counter)
//!
//! # Design Decisions
//! - Thin wrappers so call sites never spell metric names
//! - Labels are resource-ids, a set bounded by the tree

use metrics::counter;

pub fn record_handled(resource_id: &str) {
    counter!("urlmap_handled_total", "resource_id" => resource_id.to_string()).increment(1);
}

pub fn record_rendered(resource_id: &str) {
    counter!("urlmap_rendered_total", "resource_id" => resource_id.to_string()).increment(1);
}

pub fn record_outcome(outcome: &'static str) {
    counter!("urlmap_dispatch_total", "outcome" => outcome).increment(1);
}

pub fn record_redirect() {
    counter!("urlmap_internal_redirects_total").increment(1);
}
