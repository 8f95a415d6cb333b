//! Mapping subsystem.
//!
//! # Data Flow
//! ```text
//! Table construction (at startup):
//!     Tree
//!     → enumerator.rs (one PathDescriptor per servable path)
//!     → mapping.rs (compile: templates + matching regex)
//!     → mapper.rs (register by resource-id)
//!
//!     "/users/(name)/home"
//!     → pattern.rs (parse_pattern)
//!     → mapping.rs → mapper.rs (add_static / add_alias)
//!
//! Backward mapping (any time after construction):
//!     resource-id + Params → mapper.rs (render) → URL string
//!
//! Matching:
//!     resource-id + URL → mapper.rs (match_url) → variable values
//! ```
//!
//! # Design Decisions
//! - The table is built once and read-only afterward
//! - Render formats and match classes come from the same `Format`
//! - Every construction error surfaces before the first request
//! - Rendered values are percent-encoded per component; matching runs on
//!   the canonical encoding and decodes captures before coercion

pub mod enumerator;
pub mod error;
pub mod escape;
pub mod format;
pub mod mapper;
#[allow(clippy::module_inception)]
pub mod mapping;
pub mod naming;
pub mod params;
pub mod pattern;
pub mod segment;
pub mod table;
pub mod value;

pub use enumerator::{enumerate, Branch, Declaration, PathDescriptor};
pub use error::{MappingError, RenderError};
pub use escape::{decode_component, encode_component};
pub use format::{Conversion, Format};
pub use mapper::{Mapper, MapperOptions};
pub use mapping::Mapping;
pub use naming::NamingTransform;
pub use params::{ParamSource, Params};
pub use pattern::parse_pattern;
pub use segment::{Segment, Variable};
pub use table::TableOrder;
pub use value::Value;
