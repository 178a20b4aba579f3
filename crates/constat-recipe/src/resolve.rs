//! Recipe resolution
//!
//! The replay side of the protocol: a [`FactoryRegistry`] maps reconstruction
//! targets to registered factory functions, the three bootstrap strategies
//! invoke them, and [`resolve`] replays a whole recipe tree bottom-up into a
//! live value.

use crate::recipe::{Recipe, RecipeArg};
use constat_core::{ConstError, Constant, ConstructionError, FactoryKind, Value};
use constat_desc::{is_constant, RegistryError, TypeDesc, TypeKind, TypeName, TypeRegistry};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use tracing::debug;

/// A registered reconstruction function
///
/// Takes the resolved arguments in canonical order, returns the rebuilt
/// value. Failures inside the function surface as construction errors
/// wrapping the cause.
pub type FactoryFn = Arc<dyn Fn(Vec<Value>) -> Result<Value, ConstError> + Send + Sync>;

/// A factory together with the parameter signature it accepts
#[derive(Clone)]
pub struct Factory {
    signature: Vec<TypeDesc>,
    call: FactoryFn,
}

impl Factory {
    /// Wrap a reconstruction function with its parameter signature
    #[must_use]
    pub fn new<F>(signature: Vec<TypeDesc>, call: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, ConstError> + Send + Sync + 'static,
    {
        Self {
            signature,
            call: Arc::new(call),
        }
    }

    /// The parameter types this factory accepts, in order
    #[inline]
    #[must_use]
    pub fn signature(&self) -> &[TypeDesc] {
        &self.signature
    }
}

impl Debug for Factory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Registry of reconstruction factories
///
/// Keyed by target type name; named factories additionally by factory name,
/// so a type can expose a constructor and any number of named factories side
/// by side. Thread-safe, like the type metadata registry.
#[derive(Debug, Default)]
pub struct FactoryRegistry {
    constructors: DashMap<TypeName, Factory>,
    named: DashMap<(TypeName, String), Factory>,
}

impl FactoryRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the canonical constructor for a target type
    ///
    /// # Errors
    /// Returns [`RegistryError::Duplicate`] if the target already has one.
    pub fn register_constructor(
        &self,
        target: impl Into<TypeName>,
        factory: Factory,
    ) -> Result<(), RegistryError> {
        // Entry keeps check-then-insert atomic under concurrent registration.
        match self.constructors.entry(target.into()) {
            Entry::Occupied(occupied) => Err(RegistryError::Duplicate {
                name: occupied.key().clone(),
            }),
            Entry::Vacant(vacant) => {
                vacant.insert(factory);
                Ok(())
            }
        }
    }

    /// Register a named static factory for a target type
    ///
    /// # Errors
    /// Returns [`RegistryError::Duplicate`] if the target already has a
    /// factory under this name.
    pub fn register_factory(
        &self,
        target: impl Into<TypeName>,
        name: impl Into<String>,
        factory: Factory,
    ) -> Result<(), RegistryError> {
        match self.named.entry((target.into(), name.into())) {
            Entry::Occupied(occupied) => Err(RegistryError::Duplicate {
                name: occupied.key().0.clone(),
            }),
            Entry::Vacant(vacant) => {
                vacant.insert(factory);
                Ok(())
            }
        }
    }

    /// Look up a target's canonical constructor
    #[must_use]
    pub fn find_constructor(&self, target: &TypeName) -> Option<Factory> {
        self.constructors
            .get(target)
            .map(|entry| entry.value().clone())
    }

    /// Look up a target's named factory
    #[must_use]
    pub fn find_named(&self, target: &TypeName, name: &str) -> Option<Factory> {
        self.named
            .get(&(target.clone(), name.to_string()))
            .map(|entry| entry.value().clone())
    }
}

/// Replay through a target's canonical constructor
///
/// # Errors
/// Fails if no constructor is registered for the target, if the signatures
/// disagree, if an argument is not assignable to its slot, or if the
/// constructor itself fails.
pub fn bootstrap(
    registry: &FactoryRegistry,
    target: &TypeName,
    signature: &[TypeDesc],
    arguments: Vec<Value>,
) -> Result<Value, ConstructionError> {
    let factory =
        registry
            .find_constructor(target)
            .ok_or_else(|| ConstructionError::NoSuchFactory {
                target: target.clone(),
                kind: FactoryKind::Constructor,
            })?;
    invoke(target, FactoryKind::Constructor, &factory, signature, arguments)
}

/// Replay through a target's named static factory
///
/// # Errors
/// Same failure modes as [`bootstrap`], against the named factory.
pub fn bootstrap_named(
    registry: &FactoryRegistry,
    target: &TypeName,
    name: &str,
    signature: &[TypeDesc],
    arguments: Vec<Value>,
) -> Result<Value, ConstructionError> {
    let kind = FactoryKind::Named(name.to_string());
    let factory = registry
        .find_named(target, name)
        .ok_or_else(|| ConstructionError::NoSuchFactory {
            target: target.clone(),
            kind: kind.clone(),
        })?;
    invoke(target, kind, &factory, signature, arguments)
}

/// Replay through the array container's element-sequence constructor
///
/// Total: any sequence of constant values forms a constant array.
#[must_use]
pub fn bootstrap_array(arguments: Vec<Value>) -> Value {
    Value::Array(arguments.into())
}

fn invoke(
    target: &TypeName,
    kind: FactoryKind,
    factory: &Factory,
    signature: &[TypeDesc],
    arguments: Vec<Value>,
) -> Result<Value, ConstructionError> {
    if factory.signature.len() != signature.len() {
        return Err(ConstructionError::SignatureMismatch {
            target: target.clone(),
            expected: factory.signature.len(),
            found: signature.len(),
        });
    }
    // A recipe signature the registered factory cannot accept means the
    // recipe designates a different overload than the one registered.
    if !signatures_match(&factory.signature, signature) {
        return Err(ConstructionError::NoSuchFactory {
            target: target.clone(),
            kind,
        });
    }
    for (index, (argument, expected)) in arguments.iter().zip(&factory.signature).enumerate() {
        if !argument.assignable_to(expected) {
            return Err(ConstructionError::ArgumentType {
                target: target.clone(),
                index,
                expected: expected.clone(),
            });
        }
    }
    (factory.call)(arguments).map_err(|source| ConstructionError::Invocation {
        target: target.clone(),
        source: Box::new(source),
    })
}

/// Does a registered factory signature accept a recipe's signature, slot by
/// slot?
#[must_use]
pub fn signatures_match(registered: &[TypeDesc], designated: &[TypeDesc]) -> bool {
    registered.len() == designated.len()
        && registered
            .iter()
            .zip(designated)
            .all(|(reg, des)| reg.accepts(des))
}

/// Replay a recipe tree into a live value
///
/// Arguments resolve bottom-up: leaves rehydrate directly, nested recipes
/// resolve recursively, then the recipe's designated strategy fires against
/// the registry.
///
/// # Errors
/// Fails with a construction error from the first factory that is missing,
/// mismatched or failing; nested failures wrap inside the enclosing
/// invocation error.
pub fn resolve(recipe: &Recipe, registry: &FactoryRegistry) -> Result<Value, ConstError> {
    debug!(target = %recipe.target(), factory = %recipe.factory(), "resolving recipe");
    let mut arguments = Vec::with_capacity(recipe.arguments().len());
    for argument in recipe.arguments() {
        arguments.push(match argument {
            RecipeArg::Leaf(leaf) => leaf.to_value(),
            RecipeArg::Recipe(nested) => resolve(nested, registry)?,
        });
    }
    let value = match recipe.factory() {
        FactoryKind::Constructor => {
            bootstrap(registry, recipe.target(), recipe.signature(), arguments)?
        }
        FactoryKind::Named(name) => {
            bootstrap_named(registry, recipe.target(), name, recipe.signature(), arguments)?
        }
        FactoryKind::Array => bootstrap_array(arguments),
    };
    Ok(value)
}

/// Can this value's recipes actually be replayed?
///
/// True iff the type passes the constancy check, a structurally decomposed
/// type is registered as an aggregate declaration, and a factory of the
/// designated kind with an accepting signature is registered. Array-strategy
/// values need no registration: the container constructor is built in.
#[must_use]
pub fn validate(value: &dyn Constant, types: &TypeRegistry, factories: &FactoryRegistry) -> bool {
    if value.factory() == FactoryKind::Array {
        return true;
    }
    let name = value.type_name();
    if !is_constant(&TypeDesc::Named(name.clone()), types) {
        return false;
    }
    if value.is_structural() {
        let registered_as_aggregate = types
            .get(&name)
            .is_some_and(|info| info.kind() == TypeKind::Aggregate);
        if !registered_as_aggregate {
            return false;
        }
    }
    let factory = match value.factory() {
        FactoryKind::Constructor => factories.find_constructor(&name),
        FactoryKind::Named(factory_name) => factories.find_named(&name, &factory_name),
        FactoryKind::Array => return true,
    };
    factory.is_some_and(|factory| {
        signatures_match(factory.signature(), &value.canonical_parameters())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::describe;
    use crate::recipe::Leaf;
    use constat_core::{downcast_eq, ConstArray, DeconstructionError};
    use constat_desc::TypeInfo;
    use std::any::Any;
    use std::hash::{Hash, Hasher};

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Day {
        name: String,
    }

    impl Day {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
            }
        }
    }

    impl Constant for Day {
        fn type_name(&self) -> TypeName {
            TypeName::from("Day")
        }

        fn serial(&self) -> Result<Vec<Value>, DeconstructionError> {
            Ok(vec![Value::from(self.name.clone())])
        }

        fn canonical_parameters(&self) -> Vec<TypeDesc> {
            vec![TypeDesc::Text]
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

    fn day_constructor() -> Factory {
        Factory::new(vec![TypeDesc::Text], |mut arguments| {
            let name = arguments
                .remove(0)
                .as_text()
                .map(str::to_string)
                .ok_or_else(|| {
                    ConstError::from(DeconstructionError::NotConstant {
                        type_name: TypeName::from("Day"),
                    })
                })?;
            Ok(Value::constant(Day { name }))
        })
    }

    fn wired() -> FactoryRegistry {
        let registry = FactoryRegistry::new();
        registry
            .register_constructor("Day", day_constructor())
            .unwrap();
        registry
    }

    #[test]
    fn bootstrap_rebuilds_the_value() {
        let registry = wired();
        let rebuilt = bootstrap(
            &registry,
            &TypeName::from("Day"),
            &[TypeDesc::Text],
            vec![Value::from("Tuesday")],
        )
        .unwrap();
        assert_eq!(rebuilt.downcast_ref::<Day>(), Some(&Day::new("Tuesday")));
    }

    #[test]
    fn missing_constructor_is_reported() {
        let registry = FactoryRegistry::new();
        let err = bootstrap(
            &registry,
            &TypeName::from("Day"),
            &[TypeDesc::Text],
            vec![Value::from("Tuesday")],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConstructionError::NoSuchFactory {
                kind: FactoryKind::Constructor,
                ..
            }
        ));
    }

    #[test]
    fn signature_length_mismatch_is_reported() {
        let registry = wired();
        let err = bootstrap(
            &registry,
            &TypeName::from("Day"),
            &[TypeDesc::Text, TypeDesc::Int],
            vec![Value::from("Tuesday"), Value::from(2i64)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConstructionError::SignatureMismatch {
                expected: 1,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn unassignable_argument_is_reported() {
        let registry = wired();
        let err = bootstrap(
            &registry,
            &TypeName::from("Day"),
            &[TypeDesc::Text],
            vec![Value::from(9i64)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConstructionError::ArgumentType {
                index: 0,
                expected: TypeDesc::Text,
                ..
            }
        ));
    }

    #[test]
    fn named_factory_bootstrap() {
        let registry = FactoryRegistry::new();
        registry
            .register_factory("Day", "value_of", day_constructor())
            .unwrap();
        let rebuilt = bootstrap_named(
            &registry,
            &TypeName::from("Day"),
            "value_of",
            &[TypeDesc::Text],
            vec![Value::from("Friday")],
        )
        .unwrap();
        assert_eq!(rebuilt.downcast_ref::<Day>(), Some(&Day::new("Friday")));

        let err = bootstrap_named(
            &registry,
            &TypeName::from("Day"),
            "parse",
            &[TypeDesc::Text],
            vec![Value::from("Friday")],
        )
        .unwrap_err();
        assert!(matches!(err, ConstructionError::NoSuchFactory { .. }));
    }

    #[test]
    fn array_bootstrap_needs_no_registration() {
        let value = bootstrap_array(vec![Value::from(1i64), Value::from(2i64)]);
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = wired();
        assert!(matches!(
            registry.register_constructor("Day", day_constructor()),
            Err(RegistryError::Duplicate { .. })
        ));
    }

    #[test]
    fn concurrent_registration_has_one_winner() {
        let registry = FactoryRegistry::new();
        let outcomes: Vec<bool> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        registry
                            .register_factory("Day", "value_of", day_constructor())
                            .is_ok()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(outcomes.iter().filter(|won| **won).count(), 1);
        assert!(registry.find_named(&TypeName::from("Day"), "value_of").is_some());
    }

    #[test]
    fn resolve_round_trips_a_flat_recipe() {
        let registry = wired();
        let recipe = describe(&Day::new("Tuesday")).unwrap();
        let rebuilt = resolve(&recipe, &registry).unwrap();
        assert_eq!(rebuilt.downcast_ref::<Day>(), Some(&Day::new("Tuesday")));
    }

    #[test]
    fn resolve_round_trips_an_array_of_constants() {
        let registry = wired();
        let array = ConstArray::new(vec![
            Value::constant(Day::new("Saturday")),
            Value::constant(Day::new("Sunday")),
        ]);
        let recipe = describe(&array).unwrap();
        let rebuilt = resolve(&recipe, &registry).unwrap();
        assert_eq!(rebuilt.as_array(), Some(&array));
    }

    #[test]
    fn resolve_propagates_nested_failure() {
        let registry = FactoryRegistry::new();
        let array = ConstArray::new(vec![Value::constant(Day::new("Monday"))]);
        let recipe = describe(&array).unwrap();
        let err = resolve(&recipe, &registry).unwrap_err();
        assert!(matches!(
            err,
            ConstError::Construction(ConstructionError::NoSuchFactory { .. })
        ));
    }

    #[test]
    fn resolve_rehydrates_leaves() {
        let registry = FactoryRegistry::new();
        let recipe = Recipe::new(
            TypeName::from(ConstArray::TYPE_NAME),
            FactoryKind::Array,
            vec![TypeDesc::sequence(TypeDesc::Value)],
            vec![RecipeArg::Leaf(Leaf::Null), RecipeArg::Leaf(Leaf::Int(7))],
        );
        let value = resolve(&recipe, &registry).unwrap();
        let array = value.as_array().unwrap();
        assert!(array.get(0).unwrap().is_null());
        assert_eq!(array.get(1), Some(&Value::from(7i64)));
    }

    #[test]
    fn validate_requires_constancy_and_factory() {
        let types = TypeRegistry::new();
        let factories = wired();
        let tuesday = Day::new("Tuesday");

        // Not registered in the type registry yet.
        assert!(!validate(&tuesday, &types, &factories));

        types
            .register(
                TypeInfo::constant("Day", TypeKind::Other).field("name", TypeDesc::Text),
            )
            .unwrap();
        assert!(validate(&tuesday, &types, &factories));

        // Constant type, but no factory registered.
        assert!(!validate(&tuesday, &types, &FactoryRegistry::new()));
    }

    #[test]
    fn validate_accepts_arrays_unconditionally() {
        let types = TypeRegistry::new();
        let factories = FactoryRegistry::new();
        let array = ConstArray::new(vec![Value::from(1i64)]);
        assert!(validate(&array, &types, &factories));
    }

    #[test]
    fn validate_checks_factory_signature() {
        let types = TypeRegistry::new();
        types
            .register(TypeInfo::constant("Day", TypeKind::Other).field("name", TypeDesc::Text))
            .unwrap();
        let factories = FactoryRegistry::new();
        factories
            .register_constructor(
                "Day",
                Factory::new(vec![TypeDesc::Int], |_| Ok(Value::Null)),
            )
            .unwrap();
        assert!(!validate(&Day::new("Tuesday"), &types, &factories));
    }

    #[test]
    fn broad_value_slot_accepts_any_designation() {
        assert!(signatures_match(&[TypeDesc::Value], &[TypeDesc::Text]));
        assert!(!signatures_match(&[TypeDesc::Text], &[TypeDesc::Value]));
        assert!(!signatures_match(&[TypeDesc::Text], &[]));
    }
}
