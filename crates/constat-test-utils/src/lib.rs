//! Testing utilities for the constat workspace
//!
//! Shared fixture types and pre-wired registries.

#![allow(missing_docs)]

use constat_core::{
    downcast_eq, register_aggregate, Aggregate, Canonical, Component, ComponentValue, ConstError,
    Constant, ConstructionError, DeconstructionError, FactoryKind, InternPool, TypeDesc, TypeName,
    Value, ValueConstant,
};
use constat_desc::{TypeInfo, TypeKind, TypeRegistry};
use constat_recipe::{Factory, FactoryRegistry};
use once_cell::sync::Lazy;
use std::any::Any;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A hand-written constant: one read-only text component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Day {
    pub name: String,
}

impl Day {
    pub fn new(name: &str) -> Self {
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

/// A structurally decomposed aggregate: name plus ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Weekday {
    pub name: String,
    pub ordinal: i64,
}

impl Weekday {
    pub fn new(name: &str, ordinal: i64) -> Self {
        Self {
            name: name.to_string(),
            ordinal,
        }
    }
}

impl Aggregate for Weekday {
    const TYPE_NAME: &'static str = "Weekday";

    fn components() -> Vec<Component> {
        vec![
            Component::new("name", TypeDesc::Text),
            Component::new("ordinal", TypeDesc::Int),
        ]
    }

    fn component(&self, index: usize) -> ComponentValue {
        match index {
            0 => ComponentValue::Value(Value::from(self.name.clone())),
            1 => ComponentValue::Value(Value::from(self.ordinal)),
            _ => unreachable!("Weekday has two components"),
        }
    }
}
constat_core::structural_constant!(Weekday);

/// An aggregate with a sequence component and a nullable one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Roster {
    pub names: Vec<String>,
    pub note: Option<String>,
}

impl Aggregate for Roster {
    const TYPE_NAME: &'static str = "Roster";

    fn components() -> Vec<Component> {
        vec![
            Component::new("names", TypeDesc::sequence(TypeDesc::Text)),
            Component::new("note", TypeDesc::Text),
        ]
    }

    fn component(&self, index: usize) -> ComponentValue {
        match index {
            0 => ComponentValue::Sequence(self.names.iter().cloned().map(Value::from).collect()),
            1 => match &self.note {
                Some(note) => ComponentValue::Value(Value::from(note.clone())),
                None => ComponentValue::Null,
            },
            _ => unreachable!("Roster has two components"),
        }
    }
}
constat_core::structural_constant!(Roster);

/// One component of every leaf kind.
#[derive(Debug, Clone, PartialEq)]
pub struct All {
    pub flag: bool,
    pub count: i64,
    pub ratio: f64,
    pub initial: char,
    pub label: String,
}

impl All {
    pub fn sample() -> Self {
        Self {
            flag: true,
            count: 42,
            ratio: 1.5,
            initial: 'c',
            label: "sample".to_string(),
        }
    }
}

impl Eq for All {}

impl Hash for All {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.flag.hash(state);
        self.count.hash(state);
        self.ratio.to_bits().hash(state);
        self.initial.hash(state);
        self.label.hash(state);
    }
}

impl Aggregate for All {
    const TYPE_NAME: &'static str = "All";

    fn components() -> Vec<Component> {
        vec![
            Component::new("flag", TypeDesc::Bool),
            Component::new("count", TypeDesc::Int),
            Component::new("ratio", TypeDesc::Float),
            Component::new("initial", TypeDesc::Char),
            Component::new("label", TypeDesc::Text),
        ]
    }

    fn component(&self, index: usize) -> ComponentValue {
        match index {
            0 => ComponentValue::Value(Value::from(self.flag)),
            1 => ComponentValue::Value(Value::from(self.count)),
            2 => ComponentValue::Value(Value::from(self.ratio)),
            3 => ComponentValue::Value(Value::from(self.initial)),
            4 => ComponentValue::Value(Value::from(self.label.clone())),
            _ => unreachable!("All has five components"),
        }
    }
}
constat_core::structural_constant!(All);

/// Declared constant, but one accessor yields an inexpressible runtime value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sketchy;

impl Aggregate for Sketchy {
    const TYPE_NAME: &'static str = "Sketchy";

    fn components() -> Vec<Component> {
        vec![
            Component::new("label", TypeDesc::Text),
            Component::new("cell", TypeDesc::Value),
        ]
    }

    fn component(&self, index: usize) -> ComponentValue {
        match index {
            0 => ComponentValue::Value(Value::from("fine")),
            1 => ComponentValue::Opaque("RefCell<String>"),
            _ => unreachable!(),
        }
    }
}
constat_core::structural_constant!(Sketchy);

/// A canonical constant replaying through its `value_of` factory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Holiday {
    pub name: String,
}

impl Holiday {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
        })
    }

    /// The public static factory: returns the interned representative.
    pub fn value_of(name: &str) -> Arc<dyn Constant> {
        Self::new(name).intern(holiday_pool())
    }
}

impl Constant for Holiday {
    fn type_name(&self) -> TypeName {
        TypeName::from("Holiday")
    }

    fn serial(&self) -> Result<Vec<Value>, DeconstructionError> {
        Ok(vec![Value::from(self.name.clone())])
    }

    fn canonical_parameters(&self) -> Vec<TypeDesc> {
        vec![TypeDesc::Text]
    }

    fn factory(&self) -> FactoryKind {
        self.canonical_factory()
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

impl Canonical for Holiday {}

/// The pool `Holiday::value_of` interns into.
pub fn holiday_pool() -> &'static InternPool {
    static POOL: Lazy<InternPool> = Lazy::new(InternPool::new);
    &POOL
}

fn argument_error(target: &str, index: usize, expected: TypeDesc) -> ConstError {
    ConstructionError::ArgumentType {
        target: TypeName::from(target),
        index,
        expected,
    }
    .into()
}

fn take_text(value: Value, target: &str, index: usize) -> Result<String, ConstError> {
    value
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| argument_error(target, index, TypeDesc::Text))
}

fn take_int(value: &Value, target: &str, index: usize) -> Result<i64, ConstError> {
    match value {
        Value::Int(v) => Ok(*v),
        _ => Err(argument_error(target, index, TypeDesc::Int)),
    }
}

/// Type and factory registries with every fixture wired up.
pub fn wired_registries() -> (TypeRegistry, FactoryRegistry) {
    let types = TypeRegistry::new();
    types
        .register(TypeInfo::constant("Day", TypeKind::Other).field("name", TypeDesc::Text))
        .unwrap();
    types
        .register(TypeInfo::constant("Holiday", TypeKind::Other).field("name", TypeDesc::Text))
        .unwrap();
    types
        .register(
            TypeInfo::constant(ValueConstant::TYPE_NAME, TypeKind::Other)
                .field("value", TypeDesc::Value),
        )
        .unwrap();
    register_aggregate::<Weekday>(&types).unwrap();
    register_aggregate::<Roster>(&types).unwrap();
    register_aggregate::<All>(&types).unwrap();
    register_aggregate::<Sketchy>(&types).unwrap();

    let factories = FactoryRegistry::new();
    factories
        .register_constructor(
            "Day",
            Factory::new(vec![TypeDesc::Text], |mut arguments| {
                let name = take_text(arguments.remove(0), "Day", 0)?;
                Ok(Value::constant(Day { name }))
            }),
        )
        .unwrap();
    factories
        .register_constructor(
            "Weekday",
            Factory::new(vec![TypeDesc::Text, TypeDesc::Int], |mut arguments| {
                let ordinal = take_int(&arguments[1], "Weekday", 1)?;
                let name = take_text(arguments.remove(0), "Weekday", 0)?;
                Ok(Value::constant(Weekday { name, ordinal }))
            }),
        )
        .unwrap();
    factories
        .register_constructor(
            "Roster",
            Factory::new(
                vec![TypeDesc::sequence(TypeDesc::Text), TypeDesc::Text],
                |mut arguments| {
                    let note = match arguments.remove(1) {
                        Value::Null => None,
                        other => Some(take_text(other, "Roster", 1)?),
                    };
                    let names = arguments
                        .remove(0)
                        .as_array()
                        .ok_or_else(|| {
                            argument_error("Roster", 0, TypeDesc::sequence(TypeDesc::Text))
                        })?
                        .iter()
                        .cloned()
                        .enumerate()
                        .map(|(i, element)| take_text(element, "Roster", i))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Value::constant(Roster { names, note }))
                },
            ),
        )
        .unwrap();
    factories
        .register_constructor(
            "All",
            Factory::new(
                vec![
                    TypeDesc::Bool,
                    TypeDesc::Int,
                    TypeDesc::Float,
                    TypeDesc::Char,
                    TypeDesc::Text,
                ],
                |arguments| match <[Value; 5]>::try_from(arguments) {
                    Ok(
                        [Value::Bool(flag), Value::Int(count), Value::Float(ratio), Value::Char(initial), Value::Text(label)],
                    ) => Ok(Value::constant(All {
                        flag,
                        count,
                        ratio,
                        initial,
                        label: label.to_string(),
                    })),
                    _ => Err(argument_error("All", 0, TypeDesc::Value)),
                },
            ),
        )
        .unwrap();
    factories
        .register_factory(
            "Holiday",
            "value_of",
            Factory::new(vec![TypeDesc::Text], |mut arguments| {
                let name = take_text(arguments.remove(0), "Holiday", 0)?;
                Ok(Value::Const(Holiday::value_of(&name)))
            }),
        )
        .unwrap();
    factories
        .register_constructor(
            ValueConstant::TYPE_NAME,
            Factory::new(vec![TypeDesc::Value], |mut arguments| {
                Ok(Value::constant(ValueConstant::new(arguments.remove(0))))
            }),
        )
        .unwrap();

    (types, factories)
}
