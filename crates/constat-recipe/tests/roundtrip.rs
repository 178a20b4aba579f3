//! End-to-end decomposition and replay

use constat_core::{ConstArray, ConstError, Constant, DeconstructionError, Value, ValueConstant};
use constat_recipe::{describe, resolve, validate, Recipe};
use constat_test_utils::{wired_registries, All, Day, Holiday, Roster, Sketchy, Weekday};
use std::sync::Arc;

#[test]
fn weekday_round_trips_through_its_recipe() {
    let (_, factories) = wired_registries();
    let tuesday = Weekday::new("Tuesday", 2);

    let recipe = describe(&tuesday).unwrap();
    let rebuilt = resolve(&recipe, &factories).unwrap();

    assert_eq!(rebuilt.downcast_ref::<Weekday>(), Some(&tuesday));
}

#[test]
fn recipe_survives_serialization() {
    let (_, factories) = wired_registries();
    let tuesday = Weekday::new("Tuesday", 2);

    let recipe = describe(&tuesday).unwrap();
    let json = serde_json::to_string(&recipe).unwrap();
    let detached: Recipe = serde_json::from_str(&json).unwrap();
    let rebuilt = resolve(&detached, &factories).unwrap();

    assert_eq!(rebuilt.downcast_ref::<Weekday>(), Some(&tuesday));
}

#[test]
fn array_of_constants_round_trips() {
    let (_, factories) = wired_registries();
    let week = ConstArray::new(vec![
        Value::constant(Day::new("Saturday")),
        Value::constant(Day::new("Sunday")),
    ]);

    let recipe = describe(&week).unwrap();
    let rebuilt = resolve(&recipe, &factories).unwrap();

    assert_eq!(rebuilt.as_array(), Some(&week));
}

#[test]
fn nested_aggregate_with_sequence_and_null_round_trips() {
    let (_, factories) = wired_registries();
    let roster = Roster {
        names: vec!["ada".to_string(), "grace".to_string()],
        note: None,
    };

    let recipe = describe(&roster).unwrap();
    let rebuilt = resolve(&recipe, &factories).unwrap();

    assert_eq!(rebuilt.downcast_ref::<Roster>(), Some(&roster));
}

#[test]
fn all_leaf_kinds_round_trip() {
    let (_, factories) = wired_registries();
    let sample = All::sample();

    let recipe = describe(&sample).unwrap();
    let json = serde_json::to_string(&recipe).unwrap();
    let detached: Recipe = serde_json::from_str(&json).unwrap();
    let rebuilt = resolve(&detached, &factories).unwrap();

    assert_eq!(rebuilt.downcast_ref::<All>(), Some(&sample));
}

#[test]
fn value_constant_round_trips() {
    let (_, factories) = wired_registries();
    let wrapped = ValueConstant::new("Hello there");

    let recipe = describe(&wrapped).unwrap();
    let rebuilt = resolve(&recipe, &factories).unwrap();

    assert_eq!(rebuilt.downcast_ref::<ValueConstant>(), Some(&wrapped));
}

#[test]
fn canonical_replay_returns_the_interned_representative() {
    let (_, factories) = wired_registries();
    let yule = Holiday::value_of("Yule");

    let recipe = describe(yule.as_ref()).unwrap();
    let first = resolve(&recipe, &factories).unwrap();
    let second = resolve(&recipe, &factories).unwrap();

    let first: Arc<dyn Constant> = first.as_constant().unwrap().clone();
    let second: Arc<dyn Constant> = second.as_constant().unwrap().clone();
    assert!(first.dyn_eq(yule.as_ref()));
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &yule));
}

#[test]
fn inexpressible_component_fails_decomposition() {
    let err = describe(&Sketchy).unwrap_err();
    match err {
        ConstError::Deconstruction(DeconstructionError::NonConstantComponent {
            component, ..
        }) => assert_eq!(component, "cell"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn validate_reflects_registration_state() {
    let (types, factories) = wired_registries();

    assert!(validate(&Weekday::new("Tuesday", 2), &types, &factories));
    assert!(validate(&Day::new("Monday"), &types, &factories));
    assert!(validate(Holiday::new("Yule").as_ref(), &types, &factories));
    assert!(validate(&ValueConstant::new(7i64), &types, &factories));

    // Registered and structurally constant, but no factory wired.
    assert!(!validate(&Sketchy, &types, &factories));

    // Arrays replay through the built-in container constructor.
    let array = ConstArray::new(vec![Value::from(1i64)]);
    assert!(validate(&array, &types, &factories));
}

#[test]
fn equal_values_produce_equal_recipes() {
    let a = describe(&Weekday::new("Tuesday", 2)).unwrap();
    let b = describe(&Weekday::new("Tuesday", 2)).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn deeply_nested_arrays_round_trip() {
    let (_, factories) = wired_registries();
    let inner = ConstArray::new(vec![Value::from(1i64), Value::from(2i64)]);
    let middle = ConstArray::new(vec![Value::from(inner), Value::from("x")]);
    let outer = ConstArray::new(vec![Value::from(middle), Value::Null]);

    let recipe = describe(&outer).unwrap();
    assert_eq!(recipe.depth(), 3);
    let rebuilt = resolve(&recipe, &factories).unwrap();
    assert_eq!(rebuilt.as_array(), Some(&outer));
}
