//! Reference planning domains for Groundwork.
//!
//! These domains exercise the two grounding shapes end to end and back
//! the runner binary and the integration tests.
//!
//! # Modules
//!
//! - [`grid_world`] -- Stochastic navigation with parameter-less
//!   `move-north` / `move-south` / `move-east` / `move-west` schemas that
//!   publish a full transition model.
//! - [`blocks_world`] -- Object-parameterized `stack` and `unstack`
//!   schemas over named blocks.

pub mod blocks_world;
pub mod grid_world;

// Re-export primary types at crate root.
pub use blocks_world::{BlocksWorld, Stack, Unstack};
pub use grid_world::{Direction, GridLayout, GridMove, GridWorld};
