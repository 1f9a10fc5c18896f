//! Blocks world with object-parameterized actions.
//!
//! Every block has an `on` attribute naming the block beneath it (or
//! `table`) and a `clear` flag that is set when nothing rests on it.
//!
//! - `stack(top, bottom)` -- put clear block `top` onto clear block `bottom`.
//! - `unstack(block)` -- move clear block `block` from another block onto
//!   the table.
//!
//! Both schemas are deterministic and publish their single outcome as a
//! full transition model.
//!
//! The `on` attribute references blocks by name, so isomorphism matching
//! only pairs stacked blocks whose supports share a name. Use the
//! class-order translator to move groundings between towers whose blocks
//! are named differently.

use std::sync::Arc;

use groundwork_core::{
    ActionSchema, FullActionModel, GroundedAction, GroundingError, ParameterShape,
    SchemaRegistry, deterministic_transition,
};
use groundwork_types::{ObjectInstance, ObjectName, State, TransitionProbability};

/// Object class of blocks.
pub const CLASS_BLOCK: &str = "block";

/// Attribute naming what a block rests on.
pub const ATTR_ON: &str = "on";

/// Attribute set when nothing rests on a block.
pub const ATTR_CLEAR: &str = "clear";

/// Value of [`ATTR_ON`] for blocks resting on the table.
pub const TABLE: &str = "table";

/// `stack(top, bottom)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stack;

impl ActionSchema for Stack {
    fn name(&self) -> &str {
        "stack"
    }

    fn parameter_shape(&self) -> ParameterShape {
        ParameterShape::objects([CLASS_BLOCK, CLASS_BLOCK])
    }

    fn applicable(&self, state: &State, action: &GroundedAction) -> bool {
        let Some([top, bottom]) = action.parameters().object_names() else {
            return false;
        };
        top != bottom && is_clear(state, top) && is_clear(state, bottom)
    }

    fn apply(&self, state: &State, action: &GroundedAction) -> State {
        let mut next = state.clone();
        let Some([top, bottom]) = action.parameters().object_names() else {
            return next;
        };
        lift(&mut next, top);
        if let Some(block) = next.object_mut(top) {
            block.set(ATTR_ON, bottom.as_str());
        }
        if let Some(block) = next.object_mut(bottom) {
            block.set(ATTR_CLEAR, false);
        }
        next
    }

    fn full_model(&self) -> Option<&dyn FullActionModel> {
        Some(self)
    }
}

impl FullActionModel for Stack {
    fn transitions(&self, state: &State, action: &GroundedAction) -> Vec<TransitionProbability> {
        deterministic_transition(self, state, action)
    }
}

/// `unstack(block)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unstack;

impl ActionSchema for Unstack {
    fn name(&self) -> &str {
        "unstack"
    }

    fn parameter_shape(&self) -> ParameterShape {
        ParameterShape::objects([CLASS_BLOCK])
    }

    fn applicable(&self, state: &State, action: &GroundedAction) -> bool {
        let Some([block]) = action.parameters().object_names() else {
            return false;
        };
        is_clear(state, block) && support_of(state, block).is_some_and(|on| on != TABLE)
    }

    fn apply(&self, state: &State, action: &GroundedAction) -> State {
        let mut next = state.clone();
        let Some([block]) = action.parameters().object_names() else {
            return next;
        };
        lift(&mut next, block);
        if let Some(object) = next.object_mut(block) {
            object.set(ATTR_ON, TABLE);
        }
        next
    }

    fn full_model(&self) -> Option<&dyn FullActionModel> {
        Some(self)
    }
}

impl FullActionModel for Unstack {
    fn transitions(&self, state: &State, action: &GroundedAction) -> Vec<TransitionProbability> {
        deterministic_transition(self, state, action)
    }
}

/// The blocks world domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlocksWorld;

impl BlocksWorld {
    /// The `stack` and `unstack` schemas.
    pub fn schemas() -> Vec<Arc<dyn ActionSchema>> {
        vec![Arc::new(Stack), Arc::new(Unstack)]
    }

    /// A registry holding both schemas.
    pub fn registry() -> Result<SchemaRegistry, GroundingError> {
        let mut registry = SchemaRegistry::new();
        for schema in Self::schemas() {
            registry.register(schema)?;
        }
        Ok(registry)
    }

    /// Build a state from towers listed bottom to top.
    pub fn state(towers: &[&[&str]]) -> State {
        let mut state = State::new();
        for tower in towers {
            let mut below = TABLE;
            for (position, name) in tower.iter().enumerate() {
                let clear = position.saturating_add(1) == tower.len();
                state.insert(
                    ObjectInstance::new(*name, CLASS_BLOCK)
                        .with(ATTR_ON, below)
                        .with(ATTR_CLEAR, clear),
                );
                below = *name;
            }
        }
        state
    }
}

/// Whether the blocks form one tower in the given bottom-to-top order.
pub fn is_tower(state: &State, order: &[&str]) -> bool {
    let mut below = TABLE;
    for name in order {
        if support_of(state, &ObjectName::from(*name)) != Some(below) {
            return false;
        }
        below = *name;
    }
    true
}

fn is_clear(state: &State, block: &ObjectName) -> bool {
    state
        .object(block)
        .and_then(|o| o.flag(ATTR_CLEAR))
        .unwrap_or(false)
}

fn support_of<'a>(state: &'a State, block: &ObjectName) -> Option<&'a str> {
    state.object(block).and_then(|o| o.text(ATTR_ON))
}

/// Mark whatever `block` currently rests on as clear.
fn lift(state: &mut State, block: &ObjectName) {
    let support = support_of(state, block)
        .filter(|on| *on != TABLE)
        .map(ObjectName::from);
    if let Some(support) = support.and_then(|name| state.object_mut(&name)) {
        support.set(ATTR_CLEAR, true);
    }
}
