//! Grounded actions and their collaborators for the Groundwork planning framework.
//!
//! An action schema is declarative ("stack a block on another block"); a
//! [`GroundedAction`] binds a schema to a concrete parameter assignment
//! ("stack b2 on b0") so it can be compared, applied to a state, executed
//! in an environment, enumerated into outcomes, and carried across states
//! that label their objects differently.
//!
//! # Modules
//!
//! - [`grounded`] -- [`GroundedAction`]: identity, dispatch, translation
//! - [`parameters`] -- [`Parameters`] bindings and [`ParameterShape`]s
//! - [`schema`] -- [`ActionSchema`] and the [`FullActionModel`] capability
//! - [`enumerate`] -- Applicable groundings of a schema in a state
//! - [`translate`] -- [`ParameterTranslator`] strategies
//! - [`environment`] -- [`Environment`] trait and [`SimulatedEnvironment`]
//! - [`episode`] -- Rollouts, policies, and serializable transcripts
//! - [`registry`] -- [`SchemaRegistry`] for grounding actions by name
//! - [`config`] -- Configuration loading from `groundwork-config.yaml`
//! - [`error`] -- [`GroundingError`]

pub mod config;
pub mod enumerate;
pub mod environment;
pub mod episode;
pub mod error;
pub mod grounded;
pub mod parameters;
pub mod registry;
pub mod schema;
pub mod translate;

// Re-export primary types at crate root for convenience.
pub use config::{ConfigError, GroundworkConfig};
pub use enumerate::{all_applicable_groundings, applicable_groundings};
pub use environment::{
    Environment, EnvironmentOutcome, RewardFunction, SimulatedEnvironment, TerminalFunction,
};
pub use episode::{ActionRecord, Episode, EpisodeTranscript, Policy, RandomPolicy, rollout};
pub use error::GroundingError;
pub use grounded::GroundedAction;
pub use parameters::{ParameterShape, Parameters};
pub use registry::SchemaRegistry;
pub use schema::{ActionSchema, FullActionModel, deterministic_transition};
pub use translate::{
    ClassOrderTranslator, IsomorphismTranslator, ParameterTranslator, TranslationStrategy,
};
