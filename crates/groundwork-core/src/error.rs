//! Error types for the groundwork-core crate.
//!
//! Grounded actions are thin dispatchers, so very little can fail
//! locally. Most variants here are raised by collaborators (parameter
//! parsers, translators, environments) and propagate to the caller
//! unchanged; nothing in this crate retries or recovers.

/// Errors that can occur while grounding, dispatching, or translating actions.
#[derive(Debug, thiserror::Error)]
pub enum GroundingError {
    /// The bound schema lacks a capability the operation requires.
    #[error("action {schema} does not support {capability}")]
    UnsupportedCapability {
        /// Name of the schema that lacks the capability.
        schema: String,
        /// Human-readable name of the missing capability.
        capability: &'static str,
    },

    /// A flat string parameter encoding did not fit the schema's parameter shape.
    #[error("malformed parameters for action {schema}: {reason}")]
    MalformedParameterEncoding {
        /// Name of the schema whose parameters were being parsed.
        schema: String,
        /// Description of the mismatch.
        reason: String,
    },

    /// No consistent object mapping exists between the source and target states.
    #[error("cannot translate parameters of action {schema}: {reason}")]
    TranslationFailure {
        /// Name of the schema whose parameters were being translated.
        schema: String,
        /// Description of why no mapping exists.
        reason: String,
    },

    /// An environment refused to execute an action whose preconditions do not hold.
    #[error("action {action} is not applicable in the current state")]
    NotApplicable {
        /// Display form of the rejected grounded action.
        action: String,
    },

    /// An environment refused to execute an action after reaching a terminal state.
    #[error("episode has terminated; reset the environment before executing actions")]
    EpisodeTerminated,

    /// A stored episode transcript violates the episode shape.
    #[error("malformed episode transcript: {reason}")]
    MalformedTranscript {
        /// Description of the inconsistency.
        reason: String,
    },

    /// A schema name was not found in the registry.
    #[error("unknown action: {name}")]
    UnknownAction {
        /// The requested schema name.
        name: String,
    },

    /// A schema with the same name is already registered.
    #[error("duplicate action: {name}")]
    DuplicateAction {
        /// The conflicting schema name.
        name: String,
    },
}
