//! Parameter bindings and their flat string encoding.
//!
//! Every schema declares a [`ParameterShape`]; every grounded action
//! carries a [`Parameters`] binding. Bindings are a closed set of shapes,
//! so copying a grounded action always copies its full binding.
//!
//! The string encoding is positional: one string per parameter, in
//! declaration order. Object parameters encode as object names.

use groundwork_types::ObjectName;
use serde::{Deserialize, Serialize};

use crate::error::GroundingError;

/// The parameter signature a schema declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterShape {
    /// The schema takes no parameters.
    None,
    /// The schema is parameterized by objects of the listed classes.
    Objects {
        /// Required object class of each parameter, in order.
        classes: Vec<String>,
        /// Order group of each parameter. Parameters sharing a group are
        /// interchangeable, so only one ordering of them is enumerated.
        /// Empty means every parameter is its own group.
        order_groups: Vec<String>,
    },
    /// The schema is parameterized by free-form string values.
    Values {
        /// Number of values.
        arity: usize,
    },
}

impl ParameterShape {
    /// An object-parameterized shape where every parameter is its own order group.
    pub fn objects<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Objects {
            classes: classes.into_iter().map(Into::into).collect(),
            order_groups: Vec::new(),
        }
    }

    /// Whether the shape declares any parameters.
    pub fn is_parameterized(&self) -> bool {
        self.arity() > 0
    }

    /// Number of parameters the shape declares.
    pub fn arity(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Objects { classes, .. } => classes.len(),
            Self::Values { arity } => *arity,
        }
    }

    /// Order group label for parameter `index`.
    ///
    /// Defaults to the parameter's own index when no groups are declared.
    pub fn order_group(&self, index: usize) -> String {
        match self {
            Self::Objects { order_groups, .. } => order_groups
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("#{index}")),
            Self::None | Self::Values { .. } => format!("#{index}"),
        }
    }
}

/// A concrete parameter assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameters {
    /// No parameters are bound.
    #[default]
    Unparameterized,
    /// Parameters bound to objects of a particular state.
    Objects(Vec<ObjectName>),
    /// Parameters bound to free-form string values.
    Values(Vec<String>),
}

impl Parameters {
    /// Parse a flat string encoding against a schema's parameter shape.
    ///
    /// For [`ParameterShape::None`] any input is accepted and ignored.
    /// Otherwise the number of values must equal the declared arity and
    /// no value may be blank.
    pub fn parse<S: AsRef<str>>(
        schema: &str,
        shape: &ParameterShape,
        values: &[S],
    ) -> Result<Self, GroundingError> {
        if matches!(shape, ParameterShape::None) {
            return Ok(Self::Unparameterized);
        }

        let expected = shape.arity();
        if values.len() != expected {
            return Err(GroundingError::MalformedParameterEncoding {
                schema: schema.to_owned(),
                reason: format!("expected {expected} parameters, got {}", values.len()),
            });
        }
        if let Some(position) = values.iter().position(|v| v.as_ref().trim().is_empty()) {
            return Err(GroundingError::MalformedParameterEncoding {
                schema: schema.to_owned(),
                reason: format!("parameter {position} is blank"),
            });
        }

        let owned = values.iter().map(|v| v.as_ref().to_owned());
        Ok(match shape {
            ParameterShape::Objects { .. } => Self::Objects(owned.map(ObjectName::from).collect()),
            ParameterShape::Values { .. } | ParameterShape::None => Self::Values(owned.collect()),
        })
    }

    /// The flat string encoding of this binding.
    pub fn as_strings(&self) -> Vec<String> {
        match self {
            Self::Unparameterized => Vec::new(),
            Self::Objects(names) => names.iter().map(ToString::to_string).collect(),
            Self::Values(values) => values.clone(),
        }
    }

    /// The bound object names, if this binding references objects.
    pub fn object_names(&self) -> Option<&[ObjectName]> {
        match self {
            Self::Objects(names) => Some(names),
            Self::Unparameterized | Self::Values(_) => None,
        }
    }

    /// Number of bound values.
    pub fn len(&self) -> usize {
        match self {
            Self::Unparameterized => 0,
            Self::Objects(names) => names.len(),
            Self::Values(values) => values.len(),
        }
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this binding fits `shape`.
    ///
    /// An empty binding fits any shape of arity zero. Otherwise the
    /// binding kind must match the shape kind and the lengths must agree.
    pub fn conforms_to(&self, shape: &ParameterShape) -> bool {
        if self.is_empty() && shape.arity() == 0 {
            return true;
        }
        match (self, shape) {
            (Self::Objects(names), ParameterShape::Objects { classes, .. }) => {
                names.len() == classes.len()
            }
            (Self::Values(values), ParameterShape::Values { arity }) => values.len() == *arity,
            _ => false,
        }
    }
}
