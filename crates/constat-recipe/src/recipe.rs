//! The reconstruction recipe tree
//!
//! A recipe is a pure, detached description of how to rebuild a value: which
//! factory to invoke on which target type, the reconstruction signature, and
//! the resolved arguments — nested constants replaced by their own recipes.
//! It owns no reference to the original value and serializes to a bit-stable,
//! self-describing form.

use constat_core::{FactoryKind, Value};
use constat_desc::{TypeDesc, TypeName};
use serde::{Deserialize, Serialize};

/// A primitive leaf descriptor inside a recipe
///
/// [`Leaf::Null`] is the designated null marker: a decomposed null argument
/// is embedded as this leaf, never silently dropped. Float leaves compare
/// and serialize by IEEE-754 bit pattern, consistent with [`Value`], so
/// NaN and infinite leaves survive detachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Leaf {
    /// The designated null marker
    Null,

    /// Boolean leaf
    Bool(bool),

    /// Integer leaf
    Int(i64),

    /// Floating-point leaf, carried as its bit pattern on the wire
    Float(#[serde(with = "float_bits")] f64),

    /// Character leaf
    Char(char),

    /// Text leaf
    Text(String),
}

/// Float leaves as raw bits: JSON has no NaN/infinity literals.
mod float_bits {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.to_bits())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        u64::deserialize(deserializer).map(f64::from_bits)
    }
}

impl Leaf {
    /// Rehydrate the leaf into a runtime value
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(v) => Value::Bool(*v),
            Self::Int(v) => Value::Int(*v),
            Self::Float(v) => Value::Float(*v),
            Self::Char(v) => Value::Char(*v),
            Self::Text(v) => Value::from(v.as_str()),
        }
    }

    /// Embed a leaf value; `None` for arrays and nested constants
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(v) => Some(Self::Bool(*v)),
            Value::Int(v) => Some(Self::Int(*v)),
            Value::Float(v) => Some(Self::Float(*v)),
            Value::Char(v) => Some(Self::Char(*v)),
            Value::Text(v) => Some(Self::Text(v.to_string())),
            Value::Array(_) | Value::Const(_) => None,
        }
    }
}

impl PartialEq for Leaf {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Leaf {}

/// One argument slot of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecipeArg {
    /// A primitive leaf descriptor, embedded directly
    Leaf(Leaf),

    /// A nested constant, replaced by its own recipe
    Recipe(Box<Recipe>),
}

/// A resolver-executable reconstruction recipe
///
/// The reconstruction signature is carried ahead of the arguments so a
/// resolver can pick the correct factory overload before touching any
/// argument. Nesting depth is bounded by the decomposed object graph's depth,
/// which is finite because cycles cannot satisfy the constancy contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    target: TypeName,
    factory: FactoryKind,
    signature: Vec<TypeDesc>,
    arguments: Vec<RecipeArg>,
}

impl Recipe {
    /// Assemble a recipe from its parts
    #[inline]
    #[must_use]
    pub fn new(
        target: TypeName,
        factory: FactoryKind,
        signature: Vec<TypeDesc>,
        arguments: Vec<RecipeArg>,
    ) -> Self {
        Self {
            target,
            factory,
            signature,
            arguments,
        }
    }

    /// The reconstruction target type
    #[inline]
    #[must_use]
    pub fn target(&self) -> &TypeName {
        &self.target
    }

    /// The designated replay strategy
    #[inline]
    #[must_use]
    pub fn factory(&self) -> &FactoryKind {
        &self.factory
    }

    /// The reconstruction-signature descriptor
    #[inline]
    #[must_use]
    pub fn signature(&self) -> &[TypeDesc] {
        &self.signature
    }

    /// The argument slots, in canonical order
    #[inline]
    #[must_use]
    pub fn arguments(&self) -> &[RecipeArg] {
        &self.arguments
    }

    /// Tree depth: 1 for a flat recipe, plus the deepest nested recipe
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self
            .arguments
            .iter()
            .map(|argument| match argument {
                RecipeArg::Leaf(_) => 0,
                RecipeArg::Recipe(nested) => nested.depth(),
            })
            .max()
            .unwrap_or(0)
    }
}
