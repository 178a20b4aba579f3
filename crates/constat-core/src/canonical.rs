//! Canonical constants and interning
//!
//! A canonical constant has a universal set of unique, interned
//! representatives: one instance per equal value, like interned strings.
//! Canonical types declare a public named factory for producing instances
//! from their constituent parts, and their recipes replay through that
//! factory instead of a constructor — ideally returning the interned
//! representative.

use crate::constant::{Constant, FactoryKind};
use dashmap::DashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

/// Conventional name for the canonical factory
pub const DEFAULT_FACTORY_NAME: &str = "value_of";

/// A constant with interned canonical representatives
///
/// # Interning invariants
/// For any equal canonical values `a` and `b`:
/// 1. `a == a.intern(pool)`
/// 2. `a == b.intern(pool)`
/// 3. `a.intern(pool)` and `a.intern(pool)` are the same instance
/// 4. `a.intern(pool)` and `b.intern(pool)` are the same instance
///
/// A value may be its own interned representative:
/// `intern(intern(x))` is `intern(x)`.
///
/// Implementors must return [`FactoryKind::Named`] with their factory name
/// from [`Constant::factory`], so recipe replay routes through the factory.
pub trait Canonical: Constant {
    /// Name of the public static factory producing an instance from parts
    ///
    /// Conventionally [`DEFAULT_FACTORY_NAME`]; override per type if needed.
    fn factory_name(&self) -> &'static str {
        DEFAULT_FACTORY_NAME
    }

    /// The replay strategy canonical recipes must designate
    #[must_use]
    fn canonical_factory(&self) -> FactoryKind {
        FactoryKind::Named(self.factory_name().to_string())
    }

    /// The interned canonical representative of this value
    ///
    /// Idempotent; equal values from any thread converge on one instance.
    fn intern(self: Arc<Self>, pool: &InternPool) -> Arc<dyn Constant>
    where
        Self: Sized,
    {
        pool.register_or_get(self)
    }
}

/// Key wrapper giving the pool map dynamic equality and hashing
#[derive(Debug, Clone)]
struct PoolKey(Arc<dyn Constant>);

impl PartialEq for PoolKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.type_name() == other.0.type_name() && self.0.dyn_eq(other.0.as_ref())
    }
}

impl Eq for PoolKey {}

impl Hash for PoolKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.type_name().hash(state);
        self.0.dyn_hash(state);
    }
}

/// The interning registry: one representative instance per equal value
///
/// An injected service with an explicit lifetime, not ambient global state.
/// Internally synchronized; `register_or_get` is an atomic insert-if-absent,
/// so concurrent interning of equal values from different threads converges
/// on a single instance.
#[derive(Debug, Default)]
pub struct InternPool {
    entries: DashMap<PoolKey, Arc<dyn Constant>>,
}

impl InternPool {
    /// Create an empty pool
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the representative for `value`, registering it if absent
    #[must_use]
    pub fn register_or_get(&self, value: Arc<dyn Constant>) -> Arc<dyn Constant> {
        let representative = self
            .entries
            .entry(PoolKey(value.clone()))
            .or_insert_with(|| {
                debug!(type_name = %value.type_name(), "interning new representative");
                value
            })
            .value()
            .clone();
        representative
    }

    /// Whether an equal value is already interned
    #[must_use]
    pub fn contains(&self, value: &Arc<dyn Constant>) -> bool {
        self.entries.contains_key(&PoolKey(value.clone()))
    }

    /// Number of interned representatives
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool holds no representatives
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
