//! The decomposition contract
//!
//! Defines the [`Constant`] trait every constant-value type implements:
//! produce the ordered argument sequence (`serial`), the canonical parameter
//! list, and the factory reference a resolver should replay. The trait is
//! object-safe so constants can nest, compare and intern behind `dyn`.

use crate::error::DeconstructionError;
use crate::value::Value;
use constat_desc::{TypeDesc, TypeName};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Which replay strategy rebuilds a value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactoryKind {
    /// Invoke the type's canonical constructor
    Constructor,

    /// Invoke a named static factory on the type (canonical constants)
    Named(String),

    /// Invoke the array container's element-sequence constructor
    Array,
}

impl Display for FactoryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructor => f.write_str("constructor"),
            Self::Named(name) => write!(f, "factory `{name}`"),
            Self::Array => f.write_str("array constructor"),
        }
    }
}

/// A structurally constant value
///
/// A type is constant iff every reachable field is read-only and itself of
/// constant type, and every instance can be expressed as a definite series of
/// constant arguments.
///
/// # Contract
/// - `serial()` and `canonical_parameters()` produce the same length, in the
///   same order, derived from the same declaration
/// - `serial()` never mutates the value and never exposes mutable state
/// - `canonical_parameters()` is pure and total
///
/// The `as_any`/`dyn_eq`/`dyn_hash` methods are mechanical plumbing so
/// constants work behind `dyn`; implement them with [`downcast_eq`] and a
/// forward to `Hash`.
pub trait Constant: Debug + Send + Sync + 'static {
    /// The name this type registered its metadata and factories under
    fn type_name(&self) -> TypeName;

    /// Decompose into the ordered argument sequence
    ///
    /// # Errors
    /// Returns a deconstruction error if a component's current value is not
    /// expressible as a constant.
    fn serial(&self) -> Result<Vec<Value>, DeconstructionError>;

    /// The ordered parameter types the reconstruction factory accepts
    fn canonical_parameters(&self) -> Vec<TypeDesc>;

    /// The replay strategy for this type's recipes
    ///
    /// Canonical types override this to route through their named factory.
    fn factory(&self) -> FactoryKind {
        FactoryKind::Constructor
    }

    /// Whether decomposition is derived structurally from declared components
    fn is_structural(&self) -> bool {
        false
    }

    /// Upcast for downcasting in dynamic equality
    fn as_any(&self) -> &dyn Any;

    /// Dynamic equality against another constant
    fn dyn_eq(&self, other: &dyn Constant) -> bool;

    /// Dynamic hashing, consistent with `dyn_eq`
    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl PartialEq for dyn Constant {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other)
    }
}

impl Eq for dyn Constant {}

impl Hash for dyn Constant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dyn_hash(state);
    }
}

/// Standard `dyn_eq` body: downcast and compare
#[inline]
#[must_use]
pub fn downcast_eq<T: Constant + PartialEq>(value: &T, other: &dyn Constant) -> bool {
    other
        .as_any()
        .downcast_ref::<T>()
        .is_some_and(|concrete| value == concrete)
}

/// A type with the potential to be represented as a constant
///
/// A mutable type (say, a growable list) may still have a faithful constant
/// form. Every constant type is trivially constantive: its constant form is
/// itself.
pub trait Constantive {
    /// The constant representation of this value
    fn to_constant(&self) -> Arc<dyn Constant>;
}

impl<T: Constant + Clone> Constantive for T {
    fn to_constant(&self) -> Arc<dyn Constant> {
        Arc::new(self.clone())
    }
}

/// A single leaf value promoted to a full constant
///
/// The convenience for carrying a bare leaf (text, number, ...) through
/// machinery that expects the full contract. Reconstructs through a one-slot
/// constructor taking the broad value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueConstant {
    value: Value,
}

impl ValueConstant {
    /// Registration name for this wrapper
    pub const TYPE_NAME: &'static str = "constat.value";

    /// Wrap a leaf value
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The wrapped value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Constant for ValueConstant {
    fn type_name(&self) -> TypeName {
        TypeName::from(Self::TYPE_NAME)
    }

    fn serial(&self) -> Result<Vec<Value>, DeconstructionError> {
        Ok(vec![self.value.clone()])
    }

    fn canonical_parameters(&self) -> Vec<TypeDesc> {
        vec![TypeDesc::Value]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Constant) -> bool {
        downcast_eq(self, other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }
}

/// Implement [`Constant`] for a unit type: one value, no information
///
/// A unit type has no possible constructor arguments and decomposes to an
/// empty argument sequence.
///
/// ```
/// use constat_core::{unit_constant, Constant};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Origin;
/// unit_constant!(Origin, "Origin");
///
/// assert!(Origin.serial().unwrap().is_empty());
/// assert!(Origin.canonical_parameters().is_empty());
/// ```
#[macro_export]
macro_rules! unit_constant {
    ($ty:ty, $name:expr) => {
        impl $crate::Constant for $ty {
            fn type_name(&self) -> $crate::TypeName {
                $crate::TypeName::from($name)
            }

            fn serial(
                &self,
            ) -> ::std::result::Result<::std::vec::Vec<$crate::Value>, $crate::DeconstructionError>
            {
                ::std::result::Result::Ok(::std::vec::Vec::new())
            }

            fn canonical_parameters(&self) -> ::std::vec::Vec<$crate::TypeDesc> {
                ::std::vec::Vec::new()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn dyn_eq(&self, other: &dyn $crate::Constant) -> bool {
                other.as_any().downcast_ref::<$ty>().is_some()
            }

            fn dyn_hash(&self, state: &mut dyn ::std::hash::Hasher) {
                state.write($name.as_bytes());
            }
        }
    };
}
