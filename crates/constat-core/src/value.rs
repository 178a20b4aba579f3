//! Runtime argument values
//!
//! [`Value`] is the uniform representation of a decomposed argument: a
//! primitive leaf, null, a constant array, or a nested constant value. It is
//! what `serial()` produces and what factories consume.

use crate::array::ConstArray;
use crate::constant::Constant;
use constat_desc::TypeDesc;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A decomposed argument value
///
/// Equality and hashing are structural and total: floats compare by IEEE-754
/// bit pattern (so `NaN == NaN` here), which lets values key the intern pool.
/// Nested constants compare through their dynamic equality.
#[derive(Debug, Clone)]
pub enum Value {
    /// The null argument
    Null,

    /// Boolean leaf
    Bool(bool),

    /// Integer leaf
    Int(i64),

    /// Floating-point leaf
    Float(f64),

    /// Character leaf
    Char(char),

    /// Text leaf
    Text(Arc<str>),

    /// Constant array container
    Array(ConstArray),

    /// Nested constant value
    Const(Arc<dyn Constant>),
}

impl Value {
    /// Wrap a constant value
    #[inline]
    #[must_use]
    pub fn constant<T: Constant>(value: T) -> Self {
        Self::Const(Arc::new(value))
    }

    /// Whether this is the null argument
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this is a primitive/text leaf (including null)
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Array(_) | Self::Const(_))
    }

    /// Borrow the nested constant, if this is one
    #[inline]
    #[must_use]
    pub fn as_constant(&self) -> Option<&Arc<dyn Constant>> {
        match self {
            Self::Const(inner) => Some(inner),
            _ => None,
        }
    }

    /// Downcast a nested constant to a concrete type
    #[must_use]
    pub fn downcast_ref<T: Constant>(&self) -> Option<&T> {
        match self {
            Self::Const(inner) => inner.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Borrow the text content, if this is a text leaf
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow the array container, if this is one
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&ConstArray> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Is this value assignable to a slot declared as `declared`?
    ///
    /// Null is assignable to any non-primitive slot; the broad
    /// [`TypeDesc::Value`] accepts everything.
    #[must_use]
    pub fn assignable_to(&self, declared: &TypeDesc) -> bool {
        match (self, declared) {
            (_, TypeDesc::Value) => true,
            (Self::Null, d) => !matches!(
                d,
                TypeDesc::Bool | TypeDesc::Int | TypeDesc::Float | TypeDesc::Char
            ),
            (Self::Bool(_), TypeDesc::Bool)
            | (Self::Int(_), TypeDesc::Int)
            | (Self::Float(_), TypeDesc::Float)
            | (Self::Char(_), TypeDesc::Char)
            | (Self::Text(_), TypeDesc::Text) => true,
            (Self::Array(array), TypeDesc::Sequence(element)) => {
                array.iter().all(|value| value.assignable_to(element))
            }
            (Self::Const(inner), TypeDesc::Named(name)) => &inner.type_name() == name,
            _ => false,
        }
    }

    /// A short name of this value's runtime type, for diagnostics
    #[must_use]
    pub fn runtime_name(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(_) => "bool".to_string(),
            Self::Int(_) => "int".to_string(),
            Self::Float(_) => "float".to_string(),
            Self::Char(_) => "char".to_string(),
            Self::Text(_) => "text".to_string(),
            Self::Array(_) => "array".to_string(),
            Self::Const(inner) => inner.type_name().to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Const(a), Self::Const(b)) => a.dyn_eq(b.as_ref()),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(v) => v.hash(state),
            Self::Int(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Char(v) => v.hash(state),
            Self::Text(v) => v.hash(state),
            Self::Array(v) => v.hash(state),
            Self::Const(v) => v.dyn_hash(state),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value.into())
    }
}

impl From<ConstArray> for Value {
    fn from(value: ConstArray) -> Self {
        Self::Array(value)
    }
}

impl From<Arc<dyn Constant>> for Value {
    fn from(value: Arc<dyn Constant>) -> Self {
        Self::Const(value)
    }
}
