//! Constant array container
//!
//! A fixed-length, order-preserving, read-only sequence of constant values,
//! itself a constant. Reads hand out copies; mutation attempts fail loudly.

use crate::constant::{downcast_eq, Constant, FactoryKind};
use crate::error::{DeconstructionError, MutationError};
use crate::value::Value;
use constat_desc::{TypeDesc, TypeName};
use std::any::Any;
use std::hash::{Hash, Hasher};

/// Immutable fixed-length sequence of constant values
///
/// Equality and hashing are element-wise and order-sensitive. The backing
/// storage is never handed out by reference-to-owned: `serial()` and
/// [`ConstArray::to_vec`] copy, so no caller can mutate the contents from
/// outside.
///
/// Every mutating operation returns [`MutationError`] immediately rather than
/// silently doing nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ConstArray {
    serial: Box<[Value]>,
}

impl ConstArray {
    /// Registration name for the container
    pub const TYPE_NAME: &'static str = "constat.array";

    /// Create from an owned element sequence
    #[inline]
    #[must_use]
    pub fn new(values: impl Into<Vec<Value>>) -> Self {
        Self {
            serial: values.into().into_boxed_slice(),
        }
    }

    /// Create by copying a borrowed element sequence
    #[inline]
    #[must_use]
    pub fn from_slice(values: &[Value]) -> Self {
        Self {
            serial: values.to_vec().into_boxed_slice(),
        }
    }

    /// Number of elements
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.serial.len()
    }

    /// Whether the container holds no elements
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.serial.is_empty()
    }

    /// Borrow the element at `index`
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.serial.get(index)
    }

    /// Iterate over the elements in order
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.serial.iter()
    }

    /// Membership test
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.serial.contains(value)
    }

    /// Copy the elements out as a vector
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.serial.to_vec()
    }

    /// Rejected: the container is constant
    ///
    /// # Errors
    /// Always fails with [`MutationError`]; contents are untouched.
    pub fn push(&self, _value: Value) -> Result<(), MutationError> {
        Err(MutationError::new("push"))
    }

    /// Rejected: the container is constant
    ///
    /// # Errors
    /// Always fails with [`MutationError`]; contents are untouched.
    pub fn insert(&self, _index: usize, _value: Value) -> Result<(), MutationError> {
        Err(MutationError::new("insert"))
    }

    /// Rejected: the container is constant
    ///
    /// # Errors
    /// Always fails with [`MutationError`]; contents are untouched.
    pub fn remove(&self, _index: usize) -> Result<Value, MutationError> {
        Err(MutationError::new("remove"))
    }

    /// Rejected: the container is constant
    ///
    /// # Errors
    /// Always fails with [`MutationError`]; contents are untouched.
    pub fn clear(&self) -> Result<(), MutationError> {
        Err(MutationError::new("clear"))
    }

    /// Rejected: the container is constant
    ///
    /// # Errors
    /// Always fails with [`MutationError`]; contents are untouched.
    pub fn extend_from(&self, _values: &[Value]) -> Result<(), MutationError> {
        Err(MutationError::new("extend_from"))
    }
}

impl Constant for ConstArray {
    fn type_name(&self) -> TypeName {
        TypeName::from(Self::TYPE_NAME)
    }

    /// The whole element sequence is the argument list
    fn serial(&self) -> Result<Vec<Value>, DeconstructionError> {
        Ok(self.to_vec())
    }

    fn canonical_parameters(&self) -> Vec<TypeDesc> {
        vec![TypeDesc::sequence(TypeDesc::Value)]
    }

    fn factory(&self) -> FactoryKind {
        FactoryKind::Array
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

impl From<Vec<Value>> for ConstArray {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<Value> for ConstArray {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a ConstArray {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
