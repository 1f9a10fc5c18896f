//! Grounded actions: a schema bound to a parameter assignment.
//!
//! A [`GroundedAction`] is what planners enumerate, compare, store in
//! policies, and hand to environments. It owns nothing but its binding;
//! the schema is shared through an [`Arc`] and every behavioral question
//! (is it applicable, what does it do, what can happen) is forwarded to
//! the schema with the grounding itself as the parameter context.
//!
//! # Identity
//!
//! Equality and hashing consider **only the schema name**. Two groundings
//! of `stack` with different blocks compare equal and hash identically.
//! Collections keyed by grounded actions therefore hold at most one
//! grounding per schema. Compare [`GroundedAction::parameters`] explicitly
//! when parameter-sensitive distinctness matters.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use groundwork_types::{State, TransitionProbability};
use tracing::debug;

use crate::environment::{Environment, EnvironmentOutcome};
use crate::error::GroundingError;
use crate::parameters::{ParameterShape, Parameters};
use crate::schema::ActionSchema;
use crate::translate::{IsomorphismTranslator, ParameterTranslator};

/// An action schema bound to concrete parameter values.
#[derive(Clone)]
pub struct GroundedAction {
    schema: Arc<dyn ActionSchema>,
    parameters: Parameters,
}

impl GroundedAction {
    /// Ground a schema with no parameters bound.
    ///
    /// This is the complete grounding of a parameter-less schema.
    pub fn new(schema: Arc<dyn ActionSchema>) -> Self {
        Self {
            schema,
            parameters: Parameters::Unparameterized,
        }
    }

    /// Ground a schema with an explicit binding.
    ///
    /// Fails with [`GroundingError::MalformedParameterEncoding`] when the
    /// binding does not fit the schema's parameter shape.
    pub fn with_parameters(
        schema: Arc<dyn ActionSchema>,
        parameters: Parameters,
    ) -> Result<Self, GroundingError> {
        let shape = schema.parameter_shape();
        if !parameters.conforms_to(&shape) {
            return Err(GroundingError::MalformedParameterEncoding {
                schema: schema.name().to_owned(),
                reason: format!(
                    "binding {:?} does not fit a shape of arity {}",
                    parameters.as_strings(),
                    shape.arity()
                ),
            });
        }
        Ok(Self { schema, parameters })
    }

    /// Ground a schema from a flat string encoding of its parameters.
    pub fn from_string_parameters<S: AsRef<str>>(
        schema: Arc<dyn ActionSchema>,
        values: &[S],
    ) -> Result<Self, GroundingError> {
        let mut action = Self::new(schema);
        action.initialize_from_string_parameters(values)?;
        Ok(action)
    }

    /// The bound schema's name.
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// The bound schema.
    pub const fn schema(&self) -> &Arc<dyn ActionSchema> {
        &self.schema
    }

    /// The current parameter binding.
    pub const fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// A copy of this grounding with a different binding, checked
    /// against the schema's parameter shape.
    pub fn rebind(&self, parameters: Parameters) -> Result<Self, GroundingError> {
        Self::with_parameters(Arc::clone(&self.schema), parameters)
    }

    /// Whether the schema declares parameters, regardless of what is bound.
    pub fn is_parameterized(&self) -> bool {
        self.schema.is_parameterized()
    }

    /// Populate the binding from a flat string encoding.
    ///
    /// Parameter-less schemas ignore the input entirely. On error the
    /// existing binding is left untouched.
    pub fn initialize_from_string_parameters<S: AsRef<str>>(
        &mut self,
        values: &[S],
    ) -> Result<(), GroundingError> {
        self.parameters =
            Parameters::parse(self.schema.name(), &self.schema.parameter_shape(), values)?;
        Ok(())
    }

    /// The flat string encoding of the binding. Empty when unparameterized.
    pub fn parameters_as_strings(&self) -> Vec<String> {
        self.parameters.as_strings()
    }

    /// Whether this grounding may be applied in `state`.
    pub fn applicable_in(&self, state: &State) -> bool {
        self.schema.applicable(state, self)
    }

    /// The state produced by applying this grounding in `state`.
    pub fn execute_in(&self, state: &State) -> State {
        self.schema.apply(state, self)
    }

    /// Execute this grounding against a live environment.
    pub fn execute_in_environment(
        &self,
        env: &mut dyn Environment,
    ) -> Result<EnvironmentOutcome, GroundingError> {
        self.schema.execute_in_environment(env, self)
    }

    /// Every outcome of applying this grounding in `state` with non-zero
    /// probability.
    ///
    /// Fails with [`GroundingError::UnsupportedCapability`] if the schema
    /// does not provide a full transition model.
    pub fn transitions(&self, state: &State) -> Result<Vec<TransitionProbability>, GroundingError> {
        let Some(model) = self.schema.full_model() else {
            debug!(action = self.name(), "Full transition model unavailable");
            return Err(GroundingError::UnsupportedCapability {
                schema: self.name().to_owned(),
                capability: "full transition enumeration",
            });
        };
        let mut outcomes = model.transitions(state, self);
        outcomes.retain(|tp| tp.probability > 0.0);
        Ok(outcomes)
    }

    /// Re-bind object parameters from `source`'s object names to the
    /// corresponding objects of `target`, using state isomorphism.
    pub fn translate(&self, source: &State, target: &State) -> Result<Self, GroundingError> {
        self.translate_with(&IsomorphismTranslator, source, target)
    }

    /// Re-bind object parameters using the given translator.
    ///
    /// Groundings of schemas that declare no object parameters, and of
    /// schemas whose parameters are object-identifier independent, are
    /// returned as equivalent copies.
    pub fn translate_with(
        &self,
        translator: &dyn ParameterTranslator,
        source: &State,
        target: &State,
    ) -> Result<Self, GroundingError> {
        let object_parameterized = matches!(
            self.schema.parameter_shape(),
            ParameterShape::Objects { ref classes, .. } if !classes.is_empty()
        );
        if !object_parameterized || self.schema.parameters_are_object_identifier_independent() {
            return Ok(self.clone());
        }

        let parameters = translator.translate(self, source, target)?;
        debug!(
            action = self.name(),
            from = ?self.parameters.as_strings(),
            to = ?parameters.as_strings(),
            "Translated parameters"
        );
        self.rebind(parameters)
    }
}

impl PartialEq for GroundedAction {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for GroundedAction {}

impl Hash for GroundedAction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl core::fmt::Display for GroundedAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl core::fmt::Debug for GroundedAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GroundedAction")
            .field("schema", &self.name())
            .field("parameters", &self.parameters)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use groundwork_types::{ObjectInstance, ObjectName, distribution_total};

    use super::*;
    use crate::schema::FullActionModel;

    /// Parameter-less schema: increments the agent's `y`. Applicable only
    /// while an agent object exists.
    struct MoveNorth;

    impl ActionSchema for MoveNorth {
        fn name(&self) -> &str {
            "move-north"
        }

        fn applicable(&self, state: &State, _action: &GroundedAction) -> bool {
            state.first_of_class("agent").is_some()
        }

        fn apply(&self, state: &State, _action: &GroundedAction) -> State {
            let mut next = state.clone();
            let agent = state.first_of_class("agent").map(|a| a.name.clone());
            if let Some(agent) = agent.and_then(|name| next.object_mut(&name)) {
                let y = agent.int("y").unwrap_or(0);
                agent.set("y", y.saturating_add(1));
            }
            next
        }
    }

    /// Same effect as [`MoveNorth`], but slips (no movement) 30% of the time.
    struct SlipperyNorth;

    impl ActionSchema for SlipperyNorth {
        fn name(&self) -> &str {
            "slippery-north"
        }

        fn applicable(&self, _state: &State, _action: &GroundedAction) -> bool {
            true
        }

        fn apply(&self, state: &State, action: &GroundedAction) -> State {
            MoveNorth.apply(state, action)
        }

        fn full_model(&self) -> Option<&dyn FullActionModel> {
            Some(self)
        }
    }

    impl FullActionModel for SlipperyNorth {
        fn transitions(&self, state: &State, action: &GroundedAction) -> Vec<TransitionProbability> {
            vec![
                TransitionProbability::new(self.apply(state, action), 0.7),
                TransitionProbability::new(state.clone(), 0.3),
                TransitionProbability::new(State::new(), 0.0),
            ]
        }
    }

    /// Object-parameterized schema moving `params[0]` onto `params[1]`.
    struct Stack;

    impl ActionSchema for Stack {
        fn name(&self) -> &str {
            "stack"
        }

        fn parameter_shape(&self) -> ParameterShape {
            ParameterShape::objects(["block", "block"])
        }

        fn applicable(&self, state: &State, action: &GroundedAction) -> bool {
            action
                .parameters()
                .object_names()
                .is_some_and(|names| names.iter().all(|n| state.object(n).is_some()))
        }

        fn apply(&self, state: &State, action: &GroundedAction) -> State {
            let mut next = state.clone();
            if let Some([top, bottom]) = action.parameters().object_names() {
                if let Some(block) = next.object_mut(top) {
                    block.set("on", bottom.as_str());
                }
            }
            next
        }
    }

    fn agent_state(y: i64) -> State {
        State::new().with_object(ObjectInstance::new("agent0", "agent").with("x", 0).with("y", y))
    }

    fn blocks(names: &[&str]) -> State {
        names
            .iter()
            .map(|n| ObjectInstance::new(*n, "block").with("on", "table"))
            .collect()
    }

    fn hash_of(action: &GroundedAction) -> u64 {
        let mut hasher = DefaultHasher::new();
        action.hash(&mut hasher);
        hasher.finish()
    }

    fn stack(params: &[&str]) -> GroundedAction {
        GroundedAction::from_string_parameters(Arc::new(Stack), params).unwrap()
    }

    #[test]
    fn move_north_identity_and_applicability() {
        let action = GroundedAction::new(Arc::new(MoveNorth));
        assert_eq!(action.to_string(), "move-north");
        assert_eq!(action.name(), "move-north");
        assert!(!action.is_parameterized());
        assert!(action.applicable_in(&agent_state(0)));
        assert!(!action.applicable_in(&State::new()));
    }

    #[test]
    fn execute_in_dispatches_to_schema() {
        let action = GroundedAction::new(Arc::new(MoveNorth));
        let next = action.execute_in(&agent_state(2));
        let agent = next.object(&ObjectName::from("agent0")).unwrap();
        assert_eq!(agent.int("y"), Some(3));
    }

    #[test]
    fn unparameterized_string_contract() {
        let mut action = GroundedAction::new(Arc::new(MoveNorth));
        assert!(action.parameters_as_strings().is_empty());

        let empty: [&str; 0] = [];
        action.initialize_from_string_parameters(&empty).unwrap();
        assert_eq!(action.parameters(), &Parameters::Unparameterized);

        action.initialize_from_string_parameters(&["ignored"]).unwrap();
        assert_eq!(action.parameters(), &Parameters::Unparameterized);
        assert!(action.parameters_as_strings().is_empty());
    }

    #[test]
    fn equality_ignores_parameters() {
        let ab = stack(&["a", "b"]);
        let ba = stack(&["b", "a"]);
        assert_ne!(ab.parameters(), ba.parameters());
        assert_eq!(ab, ba);
        assert_eq!(hash_of(&ab), hash_of(&ba));

        let north = GroundedAction::new(Arc::new(MoveNorth));
        assert_ne!(ab, north);
    }

    #[test]
    fn parameterized_reflects_schema_not_binding() {
        let unbound = GroundedAction::new(Arc::new(Stack));
        assert!(unbound.is_parameterized());
        assert!(unbound.parameters().is_empty());
    }

    #[test]
    fn malformed_encoding_keeps_previous_binding() {
        let mut action = stack(&["a", "b"]);
        let err = action.initialize_from_string_parameters(&["c"]).unwrap_err();
        assert!(matches!(err, GroundingError::MalformedParameterEncoding { .. }));
        assert_eq!(action.parameters_as_strings(), vec!["a", "b"]);
    }

    #[test]
    fn clone_is_deep() {
        let original = stack(&["a", "b"]);
        let mut copy = original.clone();
        assert_eq!(copy, original);

        copy.initialize_from_string_parameters(&["c", "d"]).unwrap();
        assert_eq!(original.parameters_as_strings(), vec!["a", "b"]);
        assert_eq!(copy.parameters_as_strings(), vec!["c", "d"]);
    }

    #[test]
    fn transitions_require_full_model() {
        let action = GroundedAction::new(Arc::new(MoveNorth));
        let err = action.transitions(&agent_state(0)).unwrap_err();
        assert!(matches!(
            err,
            GroundingError::UnsupportedCapability { ref schema, .. } if schema == "move-north"
        ));
        assert!(err.to_string().contains("move-north"));
    }

    #[test]
    fn transitions_drop_zero_probability_outcomes() {
        let action = GroundedAction::new(Arc::new(SlipperyNorth));
        let outcomes = action.transitions(&agent_state(0)).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!((distribution_total(&outcomes) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn translate_identity_is_equivalent() {
        let state = blocks(&["a", "b", "c"]);
        let action = stack(&["a", "b"]);
        let translated = action.translate(&state, &state).unwrap();
        let twice = translated.translate(&state, &state).unwrap();
        assert_eq!(twice.parameters(), action.parameters());
        assert_eq!(twice.execute_in(&state), action.execute_in(&state));
    }

    #[test]
    fn translate_renames_objects() {
        let source = blocks(&["a", "b"]);
        let target = blocks(&["x", "y"]);
        let translated = stack(&["a", "b"]).translate(&source, &target).unwrap();
        assert_eq!(translated.parameters_as_strings(), vec!["x", "y"]);
        assert!(translated.applicable_in(&target));
    }

    #[test]
    fn translate_without_object_parameters_copies() {
        let action = GroundedAction::new(Arc::new(MoveNorth));
        let translated = action
            .translate(&agent_state(0), &State::new())
            .unwrap();
        assert_eq!(translated, action);
        assert_eq!(translated.parameters(), &Parameters::Unparameterized);
    }

    #[test]
    fn translate_propagates_failure() {
        let source = blocks(&["a", "b"]);
        let target = blocks(&["x"]);
        let err = stack(&["a", "b"]).translate(&source, &target).unwrap_err();
        assert!(matches!(err, GroundingError::TranslationFailure { .. }));
    }

    #[test]
    fn debug_shows_schema_and_binding() {
        let rendered = format!("{:?}", stack(&["a", "b"]));
        assert!(rendered.contains("stack"));
        assert!(rendered.contains("Objects"));
    }

    /// Object-shaped schema with no parameters.
    struct Noop;

    impl ActionSchema for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn parameter_shape(&self) -> ParameterShape {
            ParameterShape::objects(Vec::<String>::new())
        }

        fn applicable(&self, _state: &State, _action: &GroundedAction) -> bool {
            true
        }

        fn apply(&self, state: &State, _action: &GroundedAction) -> State {
            state.clone()
        }
    }

    #[test]
    fn with_parameters_rejects_mismatched_binding() {
        let err = GroundedAction::with_parameters(
            Arc::new(MoveNorth),
            Parameters::Objects(vec!["agent0".into()]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GroundingError::MalformedParameterEncoding { ref schema, .. } if schema == "move-north"
        ));

        let err = GroundedAction::with_parameters(
            Arc::new(Stack),
            Parameters::Values(vec!["a".into(), "b".into()]),
        );
        assert!(err.is_err());

        let ok = GroundedAction::with_parameters(
            Arc::new(Stack),
            Parameters::Objects(vec!["a".into(), "b".into()]),
        )
        .unwrap();
        assert_eq!(ok.parameters_as_strings(), vec!["a", "b"]);
    }

    #[test]
    fn rebind_checks_shape() {
        let action = stack(&["a", "b"]);
        assert!(action.rebind(Parameters::Objects(vec!["c".into()])).is_err());
        let rebound = action
            .rebind(Parameters::Objects(vec!["c".into(), "d".into()]))
            .unwrap();
        assert_eq!(rebound.parameters_as_strings(), vec!["c", "d"]);
        assert_eq!(action.parameters_as_strings(), vec!["a", "b"]);
    }

    #[test]
    fn translate_nullary_object_schema_copies() {
        let action =
            GroundedAction::with_parameters(Arc::new(Noop), Parameters::Objects(Vec::new())).unwrap();
        assert!(!action.is_parameterized());
        assert!(action.parameters_as_strings().is_empty());

        // Source and target are not isomorphic; no mapping is attempted.
        let translated = action.translate(&blocks(&["a", "b"]), &blocks(&["x"])).unwrap();
        assert_eq!(translated.parameters(), &Parameters::Objects(Vec::new()));
    }
}
