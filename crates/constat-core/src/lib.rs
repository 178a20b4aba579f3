//! constat core value model
//!
//! Provably-immutable value types and their decomposition contract.
//!
//! # Core Concepts
//!
//! - [`Constant`]: The decomposition contract — ordered arguments
//!   (`serial`), canonical parameter list, factory reference
//! - [`Value`]: Uniform runtime representation of a decomposed argument
//! - [`ConstArray`]: Fixed-length, read-only container of constant values
//! - [`Aggregate`] + [`structural_constant!`]: Automatic, declaration-driven
//!   decomposition for record-like types
//! - [`Canonical`] + [`InternPool`]: Unique interned representatives and
//!   named-factory reconstruction
//!
//! # Example
//!
//! ```
//! use constat_core::{Constant, Value, ValueConstant};
//!
//! let greeting = ValueConstant::new("Hello there");
//! assert_eq!(greeting.serial().unwrap(), vec![Value::from("Hello there")]);
//! ```

#![warn(unreachable_pub)]

mod aggregate;
mod array;
mod canonical;
mod constant;
mod error;
mod value;

pub use aggregate::{
    component_parameters, register_aggregate, serial_components, Aggregate, Component,
    ComponentValue,
};
pub use array::ConstArray;
pub use canonical::{Canonical, InternPool, DEFAULT_FACTORY_NAME};
pub use constant::{downcast_eq, Constant, Constantive, FactoryKind, ValueConstant};
pub use error::{ConstError, ConstructionError, DeconstructionError, MutationError};
pub use value::Value;

// Re-exported so one `use constat_core::...` covers the contract vocabulary
// (and so the derive macros can name them via `$crate`).
pub use constat_desc::{TypeDesc, TypeName};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
