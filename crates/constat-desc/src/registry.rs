//! Type metadata registry
//!
//! Provides [`TypeRegistry`], the registration-time introspection capability:
//! for each named type, its declared fields with read-only flags, its parent
//! type and whether it opted into the constancy contract at all.

use crate::desc::{TypeDesc, TypeName};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Classification of a registered type's declaration shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Fixed, ordered, named components (record-like declaration)
    Aggregate,

    /// Enumerated type — constant by definition
    Enum,

    /// Anything else (hand-written contract, or no contract at all)
    Other,
}

/// A declared instance field of a registered type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Field name, used in diagnostics
    pub name: String,

    /// Declared type of the field
    pub declared: TypeDesc,

    /// Whether the field is read-only after construction
    pub read_only: bool,
}

/// Registered metadata for a named type
///
/// Built once at registration time; the validator walks these declarations
/// instead of reflecting over live values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    name: TypeName,
    kind: TypeKind,
    constant_capable: bool,
    parent: Option<TypeName>,
    fields: Vec<FieldInfo>,
}

impl TypeInfo {
    /// Metadata for a type that implements the constancy contract
    #[inline]
    #[must_use]
    pub fn constant(name: impl Into<TypeName>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            constant_capable: true,
            parent: None,
            fields: Vec::new(),
        }
    }

    /// Metadata for a type that does not implement the contract
    ///
    /// Opaque types always fail the constancy check; registering them lets
    /// diagnostics name them instead of reporting "unknown type".
    #[inline]
    #[must_use]
    pub fn opaque(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Other,
            constant_capable: false,
            parent: None,
            fields: Vec::new(),
        }
    }

    /// Add a read-only field
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, declared: TypeDesc) -> Self {
        self.fields.push(FieldInfo {
            name: name.into(),
            declared,
            read_only: true,
        });
        self
    }

    /// Add a mutable field
    ///
    /// A mutable field disqualifies the type from being constant; this exists
    /// so the validator can prove the negative.
    #[must_use]
    pub fn mutable_field(mut self, name: impl Into<String>, declared: TypeDesc) -> Self {
        self.fields.push(FieldInfo {
            name: name.into(),
            declared,
            read_only: false,
        });
        self
    }

    /// Set the declared parent type
    #[inline]
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<TypeName>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Type name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// Declaration kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Whether the type implements the constancy contract
    #[inline]
    #[must_use]
    pub fn constant_capable(&self) -> bool {
        self.constant_capable
    }

    /// Declared parent type, if any
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<&TypeName> {
        self.parent.as_ref()
    }

    /// Declared fields, in declaration order
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }
}

/// Errors for registry operations
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Type already registered under this name
    #[error("type already registered: {name}")]
    Duplicate {
        /// The conflicting type name
        name: TypeName,
    },
}

/// Concurrent registry of type metadata
///
/// Thread-safe; registration and lookup may race freely. The registry also
/// owns the validator's memo cache, which is invalidated on every
/// registration since a new entry can change the verdict for types that
/// reference it.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: DashMap<TypeName, Arc<TypeInfo>>,
    memo: DashMap<TypeName, bool>,
}

impl TypeRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register type metadata
    ///
    /// # Errors
    /// Returns [`RegistryError::Duplicate`] if the name is already taken.
    pub fn register(&self, info: TypeInfo) -> Result<(), RegistryError> {
        // Entry keeps check-then-insert atomic under concurrent registration.
        match self.types.entry(info.name().clone()) {
            Entry::Occupied(occupied) => Err(RegistryError::Duplicate {
                name: occupied.key().clone(),
            }),
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::new(info));
                self.memo.clear();
                Ok(())
            }
        }
    }

    /// Look up metadata by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &TypeName) -> Option<Arc<TypeInfo>> {
        self.types.get(name).map(|entry| entry.value().clone())
    }

    /// Whether a type is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &TypeName) -> bool {
        self.types.contains_key(name)
    }

    /// Number of registered types
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub(crate) fn memo_get(&self, name: &TypeName) -> Option<bool> {
        self.memo.get(name).map(|entry| *entry.value())
    }

    pub(crate) fn memo_put(&self, name: TypeName, verdict: bool) {
        self.memo.insert(name, verdict);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_register_and_get() {
        let registry = TypeRegistry::new();
        registry
            .register(TypeInfo::constant("Day", TypeKind::Aggregate).field("name", TypeDesc::Text))
            .unwrap();

        let info = registry.get(&TypeName::from("Day")).unwrap();
        assert_eq!(info.kind(), TypeKind::Aggregate);
        assert_eq!(info.fields().len(), 1);
        assert!(info.fields()[0].read_only);
    }

    #[test]
    fn registry_rejects_duplicate() {
        let registry = TypeRegistry::new();
        registry
            .register(TypeInfo::constant("Day", TypeKind::Aggregate))
            .unwrap();
        let result = registry.register(TypeInfo::constant("Day", TypeKind::Other));
        assert!(matches!(result, Err(RegistryError::Duplicate { .. })));
    }

    #[test]
    fn registry_len_and_contains() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());

        registry
            .register(TypeInfo::constant("Day", TypeKind::Aggregate))
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&TypeName::from("Day")));
        assert!(!registry.contains(&TypeName::from("Night")));
    }

    #[test]
    fn opaque_type_is_not_capable() {
        let info = TypeInfo::opaque("Mutex");
        assert!(!info.constant_capable());
        assert_eq!(info.kind(), TypeKind::Other);
    }

    #[test]
    fn type_info_parent() {
        let info = TypeInfo::constant("Weekday", TypeKind::Aggregate).with_parent("Day");
        assert_eq!(info.parent(), Some(&TypeName::from("Day")));
    }

    #[test]
    fn concurrent_registration_has_one_winner() {
        let registry = TypeRegistry::new();
        let outcomes: Vec<bool> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        registry
                            .register(TypeInfo::constant("Day", TypeKind::Aggregate))
                            .is_ok()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(outcomes.iter().filter(|won| **won).count(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registration_clears_memo() {
        let registry = TypeRegistry::new();
        registry.memo_put(TypeName::from("Day"), false);
        registry
            .register(TypeInfo::constant("Day", TypeKind::Aggregate))
            .unwrap();
        assert_eq!(registry.memo_get(&TypeName::from("Day")), None);
    }
}
