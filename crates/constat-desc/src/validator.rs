//! Constancy validator
//!
//! The recursive predicate deciding whether a runtime type is structurally
//! constant: every reachable field read-only and itself of constant type, up
//! to the pre-declared base set.

use crate::desc::{TypeDesc, TypeName};
use crate::registry::{TypeKind, TypeRegistry};
use std::collections::HashSet;
use tracing::trace;

/// Is this type structurally constant?
///
/// Pure and side-effect-free apart from the registry's memo cache. The check
/// terminates even for self-referential type declarations: a type currently
/// under examination is assumed constant pending the outer verdict, since a
/// declaration cycle among read-only fields of constant types is itself
/// constant.
///
/// Rules, in order:
/// 1. Base types (primitives, text, the broad value type) are constant.
/// 2. A sequence is constant iff its element type is.
/// 3. An unregistered named type, or one that never opted into the contract,
///    is not constant. Enumerated types are constant by definition.
/// 4. Otherwise every declared field must be read-only and of constant type,
///    and the declared parent type (if any) must be constant too.
#[must_use]
pub fn is_constant(desc: &TypeDesc, registry: &TypeRegistry) -> bool {
    check(desc, registry, &mut HashSet::new(), true)
}

fn check(
    desc: &TypeDesc,
    registry: &TypeRegistry,
    visiting: &mut HashSet<TypeName>,
    memoize: bool,
) -> bool {
    match desc {
        TypeDesc::Bool
        | TypeDesc::Int
        | TypeDesc::Float
        | TypeDesc::Char
        | TypeDesc::Text
        | TypeDesc::Value => true,
        TypeDesc::Sequence(element) => check(element, registry, visiting, false),
        TypeDesc::Named(name) => check_named(name, registry, visiting, memoize),
    }
}

fn check_named(
    name: &TypeName,
    registry: &TypeRegistry,
    visiting: &mut HashSet<TypeName>,
    memoize: bool,
) -> bool {
    if let Some(verdict) = registry.memo_get(name) {
        return verdict;
    }
    if !visiting.insert(name.clone()) {
        // Already somewhere up the walk; assume constant pending the outer
        // verdict (constancy is coinductive over declarations).
        return true;
    }
    let verdict = check_declaration(name, registry, visiting);
    visiting.remove(name);
    trace!(type_name = %name, verdict, "constancy check");
    // Inner verdicts can rest on the coinductive assumption, so only the
    // top-level result is safe to cache.
    if memoize && visiting.is_empty() {
        registry.memo_put(name.clone(), verdict);
    }
    verdict
}

fn check_declaration(
    name: &TypeName,
    registry: &TypeRegistry,
    visiting: &mut HashSet<TypeName>,
) -> bool {
    let Some(info) = registry.get(name) else {
        return false;
    };
    if info.kind() == TypeKind::Enum {
        return true;
    }
    if !info.constant_capable() {
        return false;
    }
    for field in info.fields() {
        if !field.read_only {
            return false;
        }
        if !check(&field.declared, registry, visiting, false) {
            return false;
        }
    }
    match info.parent() {
        Some(parent) => check_named(parent, registry, visiting, false),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeInfo;

    fn registry() -> TypeRegistry {
        TypeRegistry::new()
    }

    #[test]
    fn base_types_are_constant() {
        let reg = registry();
        for desc in [
            TypeDesc::Bool,
            TypeDesc::Int,
            TypeDesc::Float,
            TypeDesc::Char,
            TypeDesc::Text,
            TypeDesc::Value,
        ] {
            assert!(is_constant(&desc, &reg), "{desc} should be constant");
        }
    }

    #[test]
    fn sequence_recurses_on_element() {
        let reg = registry();
        assert!(is_constant(&TypeDesc::sequence(TypeDesc::Text), &reg));
        assert!(is_constant(
            &TypeDesc::sequence(TypeDesc::sequence(TypeDesc::Int)),
            &reg
        ));
        assert!(!is_constant(
            &TypeDesc::sequence(TypeDesc::named("Unregistered")),
            &reg
        ));
    }

    #[test]
    fn unregistered_type_is_not_constant() {
        let reg = registry();
        assert!(!is_constant(&TypeDesc::named("Ghost"), &reg));
    }

    #[test]
    fn non_capable_type_is_not_constant() {
        let reg = registry();
        reg.register(TypeInfo::opaque("Mutex")).unwrap();
        assert!(!is_constant(&TypeDesc::named("Mutex"), &reg));
    }

    #[test]
    fn enum_type_is_constant() {
        let reg = registry();
        reg.register(TypeInfo::constant("Color", TypeKind::Enum))
            .unwrap();
        assert!(is_constant(&TypeDesc::named("Color"), &reg));
    }

    #[test]
    fn read_only_fields_of_constant_types_pass() {
        let reg = registry();
        reg.register(
            TypeInfo::constant("Day", TypeKind::Aggregate).field("name", TypeDesc::Text),
        )
        .unwrap();
        reg.register(
            TypeInfo::constant("Week", TypeKind::Aggregate)
                .field("days", TypeDesc::sequence(TypeDesc::named("Day"))),
        )
        .unwrap();
        assert!(is_constant(&TypeDesc::named("Week"), &reg));
    }

    #[test]
    fn mutable_field_fails() {
        let reg = registry();
        reg.register(
            TypeInfo::constant("Counter", TypeKind::Other).mutable_field("count", TypeDesc::Int),
        )
        .unwrap();
        assert!(!is_constant(&TypeDesc::named("Counter"), &reg));
    }

    #[test]
    fn non_constant_field_type_fails() {
        let reg = registry();
        reg.register(TypeInfo::opaque("Mutex")).unwrap();
        reg.register(
            TypeInfo::constant("Holder", TypeKind::Aggregate)
                .field("inner", TypeDesc::named("Mutex")),
        )
        .unwrap();
        assert!(!is_constant(&TypeDesc::named("Holder"), &reg));
    }

    #[test]
    fn parent_must_be_constant() {
        let reg = registry();
        reg.register(
            TypeInfo::constant("Base", TypeKind::Other).mutable_field("state", TypeDesc::Int),
        )
        .unwrap();
        reg.register(
            TypeInfo::constant("Child", TypeKind::Aggregate)
                .field("name", TypeDesc::Text)
                .with_parent("Base"),
        )
        .unwrap();
        assert!(!is_constant(&TypeDesc::named("Child"), &reg));
    }

    #[test]
    fn constant_parent_passes() {
        let reg = registry();
        reg.register(TypeInfo::constant("Base", TypeKind::Other).field("id", TypeDesc::Int))
            .unwrap();
        reg.register(
            TypeInfo::constant("Child", TypeKind::Aggregate)
                .field("name", TypeDesc::Text)
                .with_parent("Base"),
        )
        .unwrap();
        assert!(is_constant(&TypeDesc::named("Child"), &reg));
    }

    #[test]
    fn self_referential_declaration_terminates() {
        let reg = registry();
        reg.register(
            TypeInfo::constant("Node", TypeKind::Aggregate)
                .field("value", TypeDesc::Int)
                .field("next", TypeDesc::named("Node")),
        )
        .unwrap();
        assert!(is_constant(&TypeDesc::named("Node"), &reg));
    }

    #[test]
    fn self_referential_with_mutable_field_fails() {
        let reg = registry();
        reg.register(
            TypeInfo::constant("Node", TypeKind::Aggregate)
                .field("next", TypeDesc::named("Node"))
                .mutable_field("value", TypeDesc::Int),
        )
        .unwrap();
        assert!(!is_constant(&TypeDesc::named("Node"), &reg));
    }

    #[test]
    fn mutual_recursion_does_not_poison_memo() {
        // A references B, B references A; A fails on a later mutable field.
        // B's verdict rested on assuming A constant, so it must not be cached
        // as true.
        let reg = registry();
        reg.register(
            TypeInfo::constant("A", TypeKind::Aggregate)
                .field("b", TypeDesc::named("B"))
                .mutable_field("state", TypeDesc::Int),
        )
        .unwrap();
        reg.register(TypeInfo::constant("B", TypeKind::Aggregate).field("a", TypeDesc::named("A")))
            .unwrap();

        assert!(!is_constant(&TypeDesc::named("A"), &reg));
        assert!(!is_constant(&TypeDesc::named("B"), &reg));
    }

    #[test]
    fn memoized_verdict_is_stable() {
        let reg = registry();
        reg.register(TypeInfo::constant("Day", TypeKind::Aggregate).field("name", TypeDesc::Text))
            .unwrap();
        assert!(is_constant(&TypeDesc::named("Day"), &reg));
        assert!(is_constant(&TypeDesc::named("Day"), &reg));
    }
}
