//! Dispatch subsystem (forward mapping).
//!
//! # Data Flow
//! ```text
//! Request (method, uri, args)
//!     → dispatcher.rs (strip root location, build PathLocator + Context)
//!     → Context::delegate(root) → resource handlers
//!     → Outcome
//!         Handled / NotFound / Forbidden → response, done
//!         Redirect { uri, args } → start over with the new request
//!
//! Every hand-off and every render → observer.rs
//! ```
//!
//! # Design Decisions
//! - The mapper is published through an `ArcSwap`; a dispatch keeps the
//!   snapshot it started with
//! - Internal redirects are unbounded unless a ceiling is configured

pub mod dispatcher;
pub mod error;
pub mod observer;

pub use dispatcher::{Dispatcher, Request};
pub use error::DispatchError;
pub use observer::{CallGraph, Edge, EdgeKind, MetricsObserver, Observer, Trace, TracingObserver};
