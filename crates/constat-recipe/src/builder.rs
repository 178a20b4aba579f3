//! Recipe builder
//!
//! Turns a decomposed constant value into a resolver-executable recipe,
//! recursing into nested constant values. The shared argument-assembly step
//! converts the decomposed argument sequence into recipe-ready descriptors
//! alongside the reconstruction-signature descriptor; the constructor path
//! and the canonical (named-factory) path both go through it.

use crate::recipe::{Leaf, Recipe, RecipeArg};
use constat_core::{ConstError, Constant, DeconstructionError, FactoryKind, Value};
use constat_desc::TypeDesc;
use tracing::trace;

/// Decomposition deeper than this is assumed to be a cycle that slipped past
/// the type-level checks. Legitimate constant graphs are trees and stay flat.
const MAX_DEPTH: usize = 128;

/// Build the reconstruction recipe for a constant value
///
/// Arguments that are primitive leaves are embedded directly; a null argument
/// becomes the designated null marker; nested constants and arrays are
/// recursively replaced by their own recipes. The recipe is tagged with the
/// value's designated replay strategy.
///
/// # Errors
/// Fails with a deconstruction error if `serial()` fails, if the argument
/// count disagrees with the canonical parameter list, or if a nested value
/// cannot produce a descriptor.
pub fn describe(value: &dyn Constant) -> Result<Recipe, ConstError> {
    describe_at(value, 0).map_err(ConstError::from)
}

/// Assemble a value's reconstruction signature and recipe-ready arguments
///
/// The shared helper behind [`describe`]: everything a recipe needs except
/// the target/factory tag. Exposed for resolvers that lay out recipes
/// themselves.
///
/// # Errors
/// Same failure modes as [`describe`].
pub fn assemble(value: &dyn Constant) -> Result<(Vec<TypeDesc>, Vec<RecipeArg>), ConstError> {
    assemble_at(value, 0).map_err(ConstError::from)
}

fn describe_at(value: &dyn Constant, depth: usize) -> Result<Recipe, DeconstructionError> {
    if depth > MAX_DEPTH {
        return Err(DeconstructionError::CycleDetected {
            type_name: value.type_name(),
        });
    }
    trace!(type_name = %value.type_name(), depth, "describing constant");
    let (signature, arguments) = assemble_at(value, depth)?;
    Ok(Recipe::new(
        value.type_name(),
        value.factory(),
        signature,
        arguments,
    ))
}

fn assemble_at(
    value: &dyn Constant,
    depth: usize,
) -> Result<(Vec<TypeDesc>, Vec<RecipeArg>), DeconstructionError> {
    let serial = value.serial()?;
    let signature = value.canonical_parameters();

    // The array strategy takes the whole element sequence as one parameter,
    // so only constructor/factory recipes get the per-slot count check.
    if value.factory() != FactoryKind::Array && serial.len() != signature.len() {
        return Err(DeconstructionError::CountMismatch {
            type_name: value.type_name(),
            arguments: serial.len(),
            parameters: signature.len(),
        });
    }

    let mut arguments = Vec::with_capacity(serial.len());
    for argument in serial {
        arguments.push(lower(value, argument, depth)?);
    }
    Ok((signature, arguments))
}

fn lower(
    parent: &dyn Constant,
    argument: Value,
    depth: usize,
) -> Result<RecipeArg, DeconstructionError> {
    match argument {
        Value::Array(array) => nest(parent, &array, depth),
        Value::Const(constant) => nest(parent, constant.as_ref(), depth),
        Value::Null => Ok(RecipeArg::Leaf(Leaf::Null)),
        Value::Bool(v) => Ok(RecipeArg::Leaf(Leaf::Bool(v))),
        Value::Int(v) => Ok(RecipeArg::Leaf(Leaf::Int(v))),
        Value::Float(v) => Ok(RecipeArg::Leaf(Leaf::Float(v))),
        Value::Char(v) => Ok(RecipeArg::Leaf(Leaf::Char(v))),
        Value::Text(v) => Ok(RecipeArg::Leaf(Leaf::Text(v.to_string()))),
    }
}

fn nest(
    parent: &dyn Constant,
    constant: &dyn Constant,
    depth: usize,
) -> Result<RecipeArg, DeconstructionError> {
    describe_at(constant, depth + 1)
        .map(|recipe| RecipeArg::Recipe(Box::new(recipe)))
        .map_err(|source| DeconstructionError::Nested {
            type_name: parent.type_name(),
            source: Box::new(source),
        })
}
