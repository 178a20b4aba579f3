//! Type names and runtime type descriptors
//!
//! Provides [`TypeName`] and [`TypeDesc`], the vocabulary every other part of
//! the workspace uses to talk about runtime types without reflection.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Runtime type identifier
///
/// A cheap, cloneable name under which a type registers its metadata and its
/// factories. Equality is by name, so two registries sharing type names agree
/// on identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName(Arc<str>);

impl TypeName {
    /// Create a type name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Name as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self(name.into())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name.into())
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Serialized as a bare string so recipes stay self-describing.
impl Serialize for TypeName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TypeName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self(name.into()))
    }
}

/// Runtime type descriptor
///
/// Describes the declared type of a field, component or reconstruction
/// parameter. The primitive variants plus [`TypeDesc::Text`] form the
/// pre-declared "always constant" base set; [`TypeDesc::Value`] is the broad
/// "any constant value" type used where a declaration is deliberately wide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TypeDesc {
    /// Boolean primitive
    Bool,

    /// Integer primitive (covers all widths)
    Int,

    /// Floating-point primitive (covers all widths)
    Float,

    /// Character primitive
    Char,

    /// Immutable text
    Text,

    /// Fixed-length sequence of the element type
    Sequence(Box<TypeDesc>),

    /// A registered named type
    Named(TypeName),

    /// Any constant value (the broadest constant-capable declaration)
    Value,
}

impl TypeDesc {
    /// Descriptor for a registered named type
    #[inline]
    #[must_use]
    pub fn named(name: impl Into<TypeName>) -> Self {
        Self::Named(name.into())
    }

    /// Descriptor for a sequence of `element`
    #[inline]
    #[must_use]
    pub fn sequence(element: TypeDesc) -> Self {
        Self::Sequence(Box::new(element))
    }

    /// Whether this descriptor is a primitive or base type
    ///
    /// Base types are constant by definition and never consult the registry.
    #[inline]
    #[must_use]
    pub fn is_base(&self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Int | Self::Float | Self::Char | Self::Text | Self::Value
        )
    }

    /// Assignability: can a value of type `other` fill a slot declared `self`?
    ///
    /// Exact match always passes. [`TypeDesc::Value`] accepts any type, and
    /// sequences are covariant in their element type.
    #[must_use]
    pub fn accepts(&self, other: &TypeDesc) -> bool {
        match (self, other) {
            (Self::Value, _) => true,
            (Self::Sequence(a), Self::Sequence(b)) => a.accepts(b),
            (a, b) => a == b,
        }
    }
}

impl Display for TypeDesc {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Char => f.write_str("char"),
            Self::Text => f.write_str("text"),
            Self::Sequence(element) => write!(f, "[{element}]"),
            Self::Named(name) => write!(f, "{name}"),
            Self::Value => f.write_str("value"),
        }
    }
}
