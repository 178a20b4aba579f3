//! constat reconstruction recipes
//!
//! The deferred-reconstruction half of the constant protocol: build a
//! detached [`Recipe`] from any constant value, serialize it, and later
//! replay it against a [`FactoryRegistry`] to rebuild an equal value.
//!
//! # Core Concepts
//!
//! - [`Recipe`] / [`RecipeArg`] / [`Leaf`]: The serializable recipe tree
//! - [`describe`] / [`assemble`]: Decompose a constant into its recipe
//! - [`FactoryRegistry`] + [`bootstrap`] / [`bootstrap_named`] /
//!   [`bootstrap_array`]: The three replay strategies
//! - [`resolve`]: Replay a whole recipe tree bottom-up
//! - [`validate`]: Can this value's recipes actually be replayed here?
//!
//! # Example
//!
//! ```
//! use constat_core::{ConstArray, Value};
//! use constat_recipe::{describe, resolve, FactoryRegistry};
//!
//! let array = ConstArray::new(vec![Value::from(1i64), Value::from(2i64)]);
//! let recipe = describe(&array).unwrap();
//!
//! let registry = FactoryRegistry::new();
//! let rebuilt = resolve(&recipe, &registry).unwrap();
//! assert_eq!(rebuilt.as_array(), Some(&array));
//! ```

#![warn(unreachable_pub)]

mod builder;
mod recipe;
mod resolve;

pub use builder::{assemble, describe};
pub use recipe::{Leaf, Recipe, RecipeArg};
pub use resolve::{
    bootstrap, bootstrap_array, bootstrap_named, resolve, signatures_match, validate, Factory,
    FactoryFn, FactoryRegistry,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
