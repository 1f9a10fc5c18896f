//! Shared OO-MDP type definitions for the Groundwork planning framework.
//!
//! This crate is the data model every other Groundwork crate builds on.
//! It knows nothing about actions: it only describes what a world state
//! looks like and what a probabilistic transition between states is.
//!
//! # Modules
//!
//! - [`ids`] -- Object identifiers ([`ObjectName`])
//! - [`value`] -- Attribute values carried by objects ([`Value`])
//! - [`state`] -- Object instances, states, and cross-state object matching
//! - [`transition`] -- Outcome distributions ([`TransitionProbability`])

pub mod ids;
pub mod state;
pub mod transition;
pub mod value;

// Re-export all public types at crate root for convenience.
pub use ids::ObjectName;
pub use state::{ObjectInstance, State};
pub use transition::{TransitionProbability, distribution_total};
pub use value::Value;
