//! Name-indexed collection of a domain's action schemas.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::GroundingError;
use crate::grounded::GroundedAction;
use crate::schema::ActionSchema;

/// The action schemas of one domain, keyed by name.
#[derive(Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Arc<dyn ActionSchema>>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            schemas: BTreeMap::new(),
        }
    }

    /// Register a schema under its own name.
    pub fn register(&mut self, schema: Arc<dyn ActionSchema>) -> Result<(), GroundingError> {
        let name = schema.name().to_owned();
        if self.schemas.contains_key(&name) {
            return Err(GroundingError::DuplicateAction { name });
        }
        self.schemas.insert(name, schema);
        Ok(())
    }

    /// Look up a schema by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ActionSchema>> {
        self.schemas.get(name)
    }

    /// All registered schemas, in name order.
    pub fn schemas(&self) -> Vec<Arc<dyn ActionSchema>> {
        self.schemas.values().cloned().collect()
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Ground the named schema from a flat string encoding of its parameters.
    pub fn ground<S: AsRef<str>>(
        &self,
        name: &str,
        parameters: &[S],
    ) -> Result<GroundedAction, GroundingError> {
        let schema = self
            .get(name)
            .ok_or_else(|| GroundingError::UnknownAction {
                name: name.to_owned(),
            })?;
        GroundedAction::from_string_parameters(Arc::clone(schema), parameters)
    }
}

impl core::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.schemas.keys()).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use groundwork_types::State;

    use super::*;
    use crate::parameters::ParameterShape;

    struct Named(&'static str, usize);

    impl ActionSchema for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn parameter_shape(&self) -> ParameterShape {
            if self.1 == 0 {
                ParameterShape::None
            } else {
                ParameterShape::Values { arity: self.1 }
            }
        }

        fn applicable(&self, _state: &State, _action: &GroundedAction) -> bool {
            true
        }

        fn apply(&self, state: &State, _action: &GroundedAction) -> State {
            state.clone()
        }
    }

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register(Arc::new(Named("wait", 0))).unwrap();
        registry.register(Arc::new(Named("say", 1))).unwrap();
        registry
    }

    #[test]
    fn ground_by_name() {
        let registry = registry();
        let action = registry.ground("say", &["hello"]).unwrap();
        assert_eq!(action.name(), "say");
        assert_eq!(action.parameters_as_strings(), vec!["hello"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = registry().ground("fly", &["x"]).unwrap_err();
        assert!(matches!(err, GroundingError::UnknownAction { ref name } if name == "fly"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = registry();
        let err = registry.register(Arc::new(Named("wait", 0))).unwrap_err();
        assert!(matches!(err, GroundingError::DuplicateAction { .. }));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn malformed_parameters_propagate() {
        let err = registry().ground("say", &["a", "b"]).unwrap_err();
        assert!(matches!(err, GroundingError::MalformedParameterEncoding { .. }));
    }
}
