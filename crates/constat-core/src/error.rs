//! Error types for constant decomposition and reconstruction
//!
//! Two fatal-to-the-operation kinds, both carrying the offending type name:
//! - [`DeconstructionError`]: a constant value could not be decomposed
//! - [`ConstructionError`]: a recipe could not be replayed
//!
//! Failures always surface to the caller; a swallowed deconstruction failure
//! would be a silent data-corruption source. There is no retry policy: every
//! operation is deterministic given identical inputs.

use crate::constant::FactoryKind;
use constat_desc::{TypeDesc, TypeName};

/// Top-level constant protocol error
#[derive(Debug, thiserror::Error)]
pub enum ConstError {
    /// Decomposition failed
    #[error("deconstruction failed: {0}")]
    Deconstruction(#[from] DeconstructionError),

    /// Recipe replay failed
    #[error("construction failed: {0}")]
    Construction(#[from] ConstructionError),
}

impl ConstError {
    /// Name of the type the failure originates from
    #[must_use]
    pub fn type_name(&self) -> &TypeName {
        match self {
            Self::Deconstruction(e) => e.type_name(),
            Self::Construction(e) => e.target(),
        }
    }
}

/// A constant value could not be decomposed into canonical arguments
#[derive(Debug, thiserror::Error)]
pub enum DeconstructionError {
    /// A component's runtime value is not expressible as a constant
    #[error("component `{component}` of {type_name} holds non-constant runtime type {found}")]
    NonConstantComponent {
        /// The declaring type
        type_name: TypeName,
        /// The offending component
        component: String,
        /// The unexpected runtime type
        found: String,
    },

    /// The type itself fails the constancy check
    #[error("{type_name} is not a constant type")]
    NotConstant {
        /// The offending type
        type_name: TypeName,
    },

    /// Argument count disagrees with the canonical parameter list
    #[error("{type_name} produced {arguments} arguments for {parameters} canonical parameters")]
    CountMismatch {
        /// The declaring type
        type_name: TypeName,
        /// Arguments produced by decomposition
        arguments: usize,
        /// Declared canonical parameters
        parameters: usize,
    },

    /// A nested value's own recipe could not be built
    #[error("nested value of {type_name} could not be described: {source}")]
    Nested {
        /// The enclosing type
        type_name: TypeName,
        /// The nested failure
        #[source]
        source: Box<DeconstructionError>,
    },

    /// Decomposition recursed past any plausible tree depth
    #[error("cycle suspected while decomposing {type_name}")]
    CycleDetected {
        /// The type at which the depth guard tripped
        type_name: TypeName,
    },
}

impl DeconstructionError {
    /// The offending type
    #[must_use]
    pub fn type_name(&self) -> &TypeName {
        match self {
            Self::NonConstantComponent { type_name, .. }
            | Self::NotConstant { type_name }
            | Self::CountMismatch { type_name, .. }
            | Self::Nested { type_name, .. }
            | Self::CycleDetected { type_name } => type_name,
        }
    }
}

/// A reconstruction recipe could not be replayed
#[derive(Debug, thiserror::Error)]
pub enum ConstructionError {
    /// No factory of the designated kind is registered for the target
    #[error("no {kind} registered for {target}")]
    NoSuchFactory {
        /// The reconstruction target
        target: TypeName,
        /// The factory kind the recipe designated
        kind: FactoryKind,
    },

    /// The registered factory's signature disagrees with the recipe's
    #[error("signature mismatch for {target}: expected {expected} parameters, recipe carries {found}")]
    SignatureMismatch {
        /// The reconstruction target
        target: TypeName,
        /// Parameter count the registered factory accepts
        expected: usize,
        /// Parameter count the recipe carries
        found: usize,
    },

    /// A resolved argument is not assignable to its parameter slot
    #[error("argument {index} for {target} is not assignable to {expected}")]
    ArgumentType {
        /// The reconstruction target
        target: TypeName,
        /// Zero-based argument position
        index: usize,
        /// The declared parameter type
        expected: TypeDesc,
    },

    /// The factory itself failed; wraps the underlying cause
    #[error("factory for {target} failed")]
    Invocation {
        /// The reconstruction target
        target: TypeName,
        /// The factory's failure
        #[source]
        source: Box<ConstError>,
    },
}

impl ConstructionError {
    /// The reconstruction target
    #[must_use]
    pub fn target(&self) -> &TypeName {
        match self {
            Self::NoSuchFactory { target, .. }
            | Self::SignatureMismatch { target, .. }
            | Self::ArgumentType { target, .. }
            | Self::Invocation { target, .. } => target,
        }
    }
}

/// Attempted mutation of the constant array container
///
/// The container fails loudly instead of ignoring the call, to make misuse
/// visible at the call site.
#[derive(Debug, thiserror::Error)]
#[error("constant array does not support {op}")]
pub struct MutationError {
    op: &'static str,
}

impl MutationError {
    #[inline]
    pub(crate) fn new(op: &'static str) -> Self {
        Self { op }
    }

    /// The rejected operation
    #[inline]
    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.op
    }
}
