//! Enumeration of the applicable groundings of a schema in a state.
//!
//! Object-parameterized schemas are grounded against every injective
//! assignment of state objects to parameters whose class matches.
//! Parameters that share an order group are interchangeable (for example
//! the two operands of a symmetric relation), so only the assignment that
//! lists them in ascending name order is produced.

use std::sync::Arc;

use groundwork_types::{ObjectName, State};
use tracing::debug;

use crate::grounded::GroundedAction;
use crate::parameters::{ParameterShape, Parameters};
use crate::schema::ActionSchema;

/// All groundings of `schema` that are applicable in `state`.
pub fn applicable_groundings(schema: &Arc<dyn ActionSchema>, state: &State) -> Vec<GroundedAction> {
    let shape = schema.parameter_shape();
    let candidates: Vec<Parameters> = match &shape {
        ParameterShape::None => vec![Parameters::Unparameterized],
        ParameterShape::Objects { classes, .. } => object_bindings(&shape, classes, state)
            .into_iter()
            .map(Parameters::Objects)
            .collect(),
        ParameterShape::Values { arity } => schema
            .value_bindings(state)
            .into_iter()
            .filter(|binding| binding.len() == *arity)
            .map(Parameters::Values)
            .collect(),
    };

    let considered = candidates.len();
    let groundings: Vec<GroundedAction> = candidates
        .into_iter()
        .filter_map(|parameters| {
            GroundedAction::with_parameters(Arc::clone(schema), parameters).ok()
        })
        .filter(|action| action.applicable_in(state))
        .collect();

    debug!(
        action = schema.name(),
        considered,
        applicable = groundings.len(),
        "Enumerated groundings"
    );
    groundings
}

/// All applicable groundings of every schema, in schema order.
pub fn all_applicable_groundings(
    schemas: &[Arc<dyn ActionSchema>],
    state: &State,
) -> Vec<GroundedAction> {
    schemas
        .iter()
        .flat_map(|schema| applicable_groundings(schema, state))
        .collect()
}

fn object_bindings(shape: &ParameterShape, classes: &[String], state: &State) -> Vec<Vec<ObjectName>> {
    let mut bindings = Vec::new();
    let mut partial = Vec::with_capacity(classes.len());
    extend_binding(shape, classes, state, &mut partial, &mut bindings);
    bindings
}

fn extend_binding(
    shape: &ParameterShape,
    classes: &[String],
    state: &State,
    partial: &mut Vec<ObjectName>,
    bindings: &mut Vec<Vec<ObjectName>>,
) {
    let index = partial.len();
    let Some(class) = classes.get(index) else {
        bindings.push(partial.clone());
        return;
    };

    let group = shape.order_group(index);
    let floor = partial
        .iter()
        .enumerate()
        .rev()
        .find(|(i, _)| shape.order_group(*i) == group)
        .map(|(_, name)| name.clone());

    for object in state.objects_of_class(class) {
        if partial.contains(&object.name) {
            continue;
        }
        if floor.as_ref().is_some_and(|floor| object.name <= *floor) {
            continue;
        }
        partial.push(object.name.clone());
        extend_binding(shape, classes, state, partial, bindings);
        partial.pop();
    }
}
