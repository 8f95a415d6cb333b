//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! mapping / resource / dispatch:
//!     → tracing events (table built, resolver steps, redirects)
//!     → logging.rs (subscriber: env filter + pretty or JSON output)
//!
//! dispatch::observer::MetricsObserver, Dispatcher:
//!     → metrics.rs (counters per resource-id and outcome)
//!     → whatever recorder the host installed
//! ```
//!
//! # Design Decisions
//! - Every dispatch runs in a span carrying its request id
//! - The library never installs a metrics exporter; counters are no-ops
//!   until the host sets a recorder

pub mod logging;
pub mod metrics;
