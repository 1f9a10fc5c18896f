//! Cross-state parameter translation.
//!
//! Object parameters name objects of one particular state. To reuse a
//! grounding in a structurally similar state whose objects are labeled
//! differently, each bound object name must be mapped to its counterpart
//! in the target state. A [`ParameterTranslator`] establishes that
//! correspondence.
//!
//! Two strategies are provided:
//!
//! - [`IsomorphismTranslator`] -- pairs objects of the same class with
//!   identical attribute values. Strict: the states must be isomorphic.
//! - [`ClassOrderTranslator`] -- pairs the k-th object of a class (in name
//!   order) with the k-th object of that class in the target. Lenient:
//!   attribute values are ignored.

use groundwork_types::{ObjectName, State};
use serde::Deserialize;

use crate::error::GroundingError;
use crate::grounded::GroundedAction;
use crate::parameters::Parameters;

/// Maps a grounding's object parameters from one state's naming to another's.
pub trait ParameterTranslator {
    /// The binding `action` should carry in `target`.
    ///
    /// Fails with [`GroundingError::TranslationFailure`] when no valid
    /// mapping exists.
    fn translate(
        &self,
        action: &GroundedAction,
        source: &State,
        target: &State,
    ) -> Result<Parameters, GroundingError>;
}

/// Translation by state isomorphism (see [`State::object_matches_to`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct IsomorphismTranslator;

impl ParameterTranslator for IsomorphismTranslator {
    fn translate(
        &self,
        action: &GroundedAction,
        source: &State,
        target: &State,
    ) -> Result<Parameters, GroundingError> {
        let Some(names) = action.parameters().object_names() else {
            return Ok(action.parameters().clone());
        };

        let matching = source
            .object_matches_to(target)
            .ok_or_else(|| failure(action, "source and target states are not isomorphic"))?;

        let mapped = names
            .iter()
            .map(|name| {
                matching.get(name).cloned().ok_or_else(|| {
                    failure(action, &format!("object {name} does not exist in the source state"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Parameters::Objects(mapped))
    }
}

/// Translation by object class and name-order position.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassOrderTranslator;

impl ClassOrderTranslator {
    fn counterpart(
        action: &GroundedAction,
        name: &ObjectName,
        source: &State,
        target: &State,
    ) -> Result<ObjectName, GroundingError> {
        let object = source.object(name).ok_or_else(|| {
            failure(action, &format!("object {name} does not exist in the source state"))
        })?;
        let position = source
            .objects_of_class(&object.class)
            .position(|o| &o.name == name)
            .ok_or_else(|| failure(action, &format!("object {name} lost its class")))?;
        target
            .objects_of_class(&object.class)
            .nth(position)
            .map(|o| o.name.clone())
            .ok_or_else(|| {
                failure(
                    action,
                    &format!(
                        "target state has no {} object at position {position}",
                        object.class
                    ),
                )
            })
    }
}

impl ParameterTranslator for ClassOrderTranslator {
    fn translate(
        &self,
        action: &GroundedAction,
        source: &State,
        target: &State,
    ) -> Result<Parameters, GroundingError> {
        let Some(names) = action.parameters().object_names() else {
            return Ok(action.parameters().clone());
        };

        let mapped = names
            .iter()
            .map(|name| Self::counterpart(action, name, source, target))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Parameters::Objects(mapped))
    }
}

/// Configurable choice of translator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationStrategy {
    /// Use [`IsomorphismTranslator`].
    #[default]
    Isomorphism,
    /// Use [`ClassOrderTranslator`].
    ClassOrder,
}

impl TranslationStrategy {
    /// The translator implementing this strategy.
    pub const fn translator(self) -> &'static dyn ParameterTranslator {
        match self {
            Self::Isomorphism => &IsomorphismTranslator,
            Self::ClassOrder => &ClassOrderTranslator,
        }
    }
}

fn failure(action: &GroundedAction, reason: &str) -> GroundingError {
    GroundingError::TranslationFailure {
        schema: action.name().to_owned(),
        reason: reason.to_owned(),
    }
}
