//! constat type descriptors
//!
//! Registration-time type metadata and the recursive constancy check.
//!
//! # Core Concepts
//!
//! - [`TypeName`]: Cheap, cloneable runtime type identifier
//! - [`TypeDesc`]: Runtime type descriptor (primitives, sequences, named types)
//! - [`TypeRegistry`]: The introspection capability — declared fields,
//!   read-only flags and parent types, registered once per type
//! - [`is_constant`]: Recursive predicate: is a type structurally constant?
//!
//! # Example
//!
//! ```
//! use constat_desc::{is_constant, TypeDesc, TypeInfo, TypeKind, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! registry
//!     .register(TypeInfo::constant("Day", TypeKind::Aggregate).field("name", TypeDesc::Text))
//!     .unwrap();
//!
//! assert!(is_constant(&TypeDesc::named("Day"), &registry));
//! ```

#![warn(unreachable_pub)]

mod desc;
mod registry;
mod validator;

pub use desc::{TypeDesc, TypeName};
pub use registry::{FieldInfo, RegistryError, TypeInfo, TypeKind, TypeRegistry};
pub use validator::is_constant;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
