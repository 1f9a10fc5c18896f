//! Action schemas: the declarative side of an action.
//!
//! An [`ActionSchema`] defines an action's name, parameter shape,
//! applicability condition, and effect. It never stores a parameter
//! assignment itself; every method receives the [`GroundedAction`] whose
//! parameters it should use.
//!
//! Enumerating the full outcome distribution is an optional capability.
//! Schemas that can do it implement [`FullActionModel`] and expose it
//! through [`ActionSchema::full_model`]; callers query for the
//! capability instead of downcasting.

use groundwork_types::{State, TransitionProbability};

use crate::environment::{Environment, EnvironmentOutcome};
use crate::error::GroundingError;
use crate::grounded::GroundedAction;
use crate::parameters::ParameterShape;

/// The definition of an action, shared by all of its groundings.
pub trait ActionSchema: Send + Sync {
    /// Identifying name, unique within a domain.
    fn name(&self) -> &str;

    /// The parameters this schema takes. Defaults to none.
    fn parameter_shape(&self) -> ParameterShape {
        ParameterShape::None
    }

    /// Whether the schema declares parameters.
    fn is_parameterized(&self) -> bool {
        self.parameter_shape().is_parameterized()
    }

    /// Whether `action` may be applied in `state`.
    fn applicable(&self, state: &State, action: &GroundedAction) -> bool;

    /// The state produced by applying `action` in `state`.
    ///
    /// Stochastic schemas return their most likely outcome here and
    /// publish the full distribution through [`FullActionModel`].
    fn apply(&self, state: &State, action: &GroundedAction) -> State;

    /// Execute `action` against a live environment.
    ///
    /// The default hands the action to the environment unchanged.
    fn execute_in_environment(
        &self,
        env: &mut dyn Environment,
        action: &GroundedAction,
    ) -> Result<EnvironmentOutcome, GroundingError> {
        env.execute_action(action)
    }

    /// The full transition model, if this schema can enumerate outcomes.
    fn full_model(&self) -> Option<&dyn FullActionModel> {
        None
    }

    /// Whether object parameters can be reused across states without
    /// renaming. When `true`, translation returns the grounding unchanged.
    fn parameters_are_object_identifier_independent(&self) -> bool {
        false
    }

    /// Candidate value bindings for [`ParameterShape::Values`] schemas.
    ///
    /// Consulted by grounding enumeration; other shapes ignore it.
    fn value_bindings(&self, _state: &State) -> Vec<Vec<String>> {
        Vec::new()
    }
}

/// Capability: enumerate every outcome of an action with its probability.
pub trait FullActionModel {
    /// All outcomes of applying `action` in `state`.
    ///
    /// Probabilities must sum to 1.
    fn transitions(&self, state: &State, action: &GroundedAction) -> Vec<TransitionProbability>;
}

/// The single certain outcome of a deterministic schema.
///
/// Deterministic schemas can implement [`FullActionModel`] by returning this.
pub fn deterministic_transition(
    schema: &dyn ActionSchema,
    state: &State,
    action: &GroundedAction,
) -> Vec<TransitionProbability> {
    vec![TransitionProbability::certain(schema.apply(state, action))]
}
