//! Bidirectional URL mapping.
//!
//! A tree of resources is enumerated once into a table of resource-id ↔ URL
//! shapes. The same tree then resolves incoming paths (forward mapping) while
//! the table renders canonical URLs for any resource-id (backward mapping).

pub mod config;
pub mod dispatch;
pub mod mapping;
pub mod observability;
pub mod resource;

pub use config::schema::UrlmapConfig;
pub use dispatch::{DispatchError, Dispatcher, Request};
pub use mapping::{Mapper, MapperOptions, MappingError, Params, RenderError, TableOrder, Value, Variable};
pub use resource::{
    BufferedResponse, Context, Folder, Leaf, NodeId, Outcome, Response, Tree, TreeBuilder,
    VarDelegator, VarLeaf,
};
