//! Dispatch error types.

use thiserror::Error;

use crate::mapping::error::RenderError;

/// Failures that abort a dispatch.
///
/// NotFound and Forbidden are not errors: they travel as
/// [`Outcome`](crate::resource::Outcome) values and become a response.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The mapper was built from a table, not from a resource tree.
    #[error("mapper has no resource tree to dispatch into")]
    NoTree,

    /// The request URI is outside the configured root location.
    #[error("request '{uri}' is not under root location '{root}'")]
    RootMismatch { root: String, uri: String },

    /// Two resources on one path stored a value under the same name.
    #[error("request context already holds a value for '{name}'")]
    SlotOccupied { name: String },

    /// A folder default names a child that does not exist.
    #[error("folder default child '{name}' not found")]
    MissingDefaultChild { name: String },

    /// Internal redirects exceeded the configured ceiling.
    #[error("more than {limit} internal redirects")]
    RedirectLimit { limit: usize },

    #[error("no resource at node #{node}")]
    UnknownNode { node: usize },

    /// Rendering a URL from inside a handler failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Application handler failure.
    #[error("handler failed: {0}")]
    Handler(#[from] Box<dyn std::error::Error + Send + Sync>),
}
