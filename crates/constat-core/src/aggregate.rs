//! Automatic structural decomposition
//!
//! Plain aggregate types (fixed, ordered, named components) get the whole
//! decomposition contract derived from a single component declaration:
//! implement [`Aggregate`] once, invoke [`structural_constant!`], and
//! `serial()`/`canonical_parameters()` follow the declaration in order.
//! Runtime reflection is replaced by this registration-time declaration, so
//! the parameter list and the argument order cannot diverge — both come from
//! [`Aggregate::components`].
//!
//! [`structural_constant!`]: crate::structural_constant

use crate::array::ConstArray;
use crate::error::DeconstructionError;
use crate::value::Value;
use constat_desc::{RegistryError, TypeDesc, TypeInfo, TypeKind, TypeName, TypeRegistry};

/// A declared component of an aggregate type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Component name, used in diagnostics
    pub name: &'static str,

    /// Declared component type
    pub declared: TypeDesc,
}

impl Component {
    /// Declare a component
    #[inline]
    #[must_use]
    pub fn new(name: &'static str, declared: TypeDesc) -> Self {
        Self { name, declared }
    }
}

/// What a component accessor produced
///
/// Decomposition classifies each accessor result: a constant value passes
/// through, an element sequence is wrapped in a [`ConstArray`], null is
/// preserved, and anything else is a deconstruction error naming the
/// component (never a silent wrap).
#[derive(Debug)]
pub enum ComponentValue {
    /// A constant value
    Value(Value),

    /// A sequence of constant elements, to be wrapped in an array container
    Sequence(Vec<Value>),

    /// The null component
    Null,

    /// A runtime value that cannot be expressed as a constant
    ///
    /// Carries the unexpected runtime type's name for the error message.
    Opaque(&'static str),
}

/// A plain aggregate value type with derivable decomposition
///
/// # Contract
/// - `components()` lists the declared components in declaration order
/// - `component(i)` is the accessor for the `i`-th declared component
///
/// Pair with [`structural_constant!`] to derive the [`Constant`] impl, and
/// [`register_aggregate`] to derive the validator metadata, all from this one
/// declaration.
///
/// [`structural_constant!`]: crate::structural_constant
/// [`Constant`]: crate::Constant
///
/// # Example
/// ```
/// use constat_core::{structural_constant, Aggregate, Component, ComponentValue, Constant, Value};
/// use constat_desc::TypeDesc;
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct Weekday { name: String }
///
/// impl Aggregate for Weekday {
///     const TYPE_NAME: &'static str = "Weekday";
///
///     fn components() -> Vec<Component> {
///         vec![Component::new("name", TypeDesc::Text)]
///     }
///
///     fn component(&self, index: usize) -> ComponentValue {
///         match index {
///             0 => ComponentValue::Value(Value::from(self.name.clone())),
///             _ => unreachable!(),
///         }
///     }
/// }
/// structural_constant!(Weekday);
///
/// let tuesday = Weekday { name: "Tuesday".into() };
/// assert_eq!(tuesday.serial().unwrap(), vec![Value::from("Tuesday")]);
/// assert_eq!(tuesday.canonical_parameters(), vec![TypeDesc::Text]);
/// ```
pub trait Aggregate: Send + Sync + 'static {
    /// The name this type registers under
    const TYPE_NAME: &'static str;

    /// Declared components, in declaration order
    fn components() -> Vec<Component>;

    /// Accessor for the component at `index`
    fn component(&self, index: usize) -> ComponentValue;
}

/// Decompose an aggregate by its declared components, in order
///
/// # Errors
/// Returns a deconstruction error naming the offending component if an
/// accessor produces an inexpressible runtime value.
pub fn serial_components<T: Aggregate>(value: &T) -> Result<Vec<Value>, DeconstructionError> {
    let components = T::components();
    let mut arguments = Vec::with_capacity(components.len());
    for (index, component) in components.iter().enumerate() {
        match value.component(index) {
            ComponentValue::Value(value) => arguments.push(value),
            ComponentValue::Sequence(elements) => {
                arguments.push(Value::Array(ConstArray::new(elements)));
            }
            ComponentValue::Null => arguments.push(Value::Null),
            ComponentValue::Opaque(found) => {
                return Err(DeconstructionError::NonConstantComponent {
                    type_name: TypeName::from(T::TYPE_NAME),
                    component: component.name.to_string(),
                    found: found.to_string(),
                });
            }
        }
    }
    Ok(arguments)
}

/// The canonical parameter list of an aggregate: each declared component type
#[must_use]
pub fn component_parameters<T: Aggregate>() -> Vec<TypeDesc> {
    T::components()
        .into_iter()
        .map(|component| component.declared)
        .collect()
}

/// Derive the [`Constant`](crate::Constant) impl from an [`Aggregate`]
/// declaration
///
/// The type must be `PartialEq + Hash + Debug`.
#[macro_export]
macro_rules! structural_constant {
    ($ty:ty) => {
        impl $crate::Constant for $ty {
            fn type_name(&self) -> $crate::TypeName {
                $crate::TypeName::from(<$ty as $crate::Aggregate>::TYPE_NAME)
            }

            fn serial(
                &self,
            ) -> ::std::result::Result<::std::vec::Vec<$crate::Value>, $crate::DeconstructionError>
            {
                $crate::serial_components(self)
            }

            fn canonical_parameters(&self) -> ::std::vec::Vec<$crate::TypeDesc> {
                $crate::component_parameters::<$ty>()
            }

            fn is_structural(&self) -> bool {
                true
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn dyn_eq(&self, other: &dyn $crate::Constant) -> bool {
                $crate::downcast_eq(self, other)
            }

            fn dyn_hash(&self, mut state: &mut dyn ::std::hash::Hasher) {
                ::std::hash::Hash::hash(self, &mut state);
            }
        }
    };
}

/// Register an aggregate's type metadata, derived from its components
///
/// All components are recorded as read-only fields of an `Aggregate`-kind
/// type, so the validator and the decomposition read the same declaration.
///
/// # Errors
/// Returns [`RegistryError::Duplicate`] if the name is already registered.
pub fn register_aggregate<T: Aggregate>(registry: &TypeRegistry) -> Result<(), RegistryError> {
    let mut info = TypeInfo::constant(T::TYPE_NAME, TypeKind::Aggregate);
    for component in T::components() {
        info = info.field(component.name, component.declared);
    }
    registry.register(info)
}
