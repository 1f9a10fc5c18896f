//! Stochastic grid world navigation.
//!
//! A single agent moves on a rectangular grid with walls. Each of the
//! four movement schemas succeeds with `success_probability`; otherwise
//! the agent slips in one of the other three directions with equal odds.
//! Moving into a wall or off the grid leaves the agent in place.
//!
//! States contain one `agent` object and any number of `location`
//! objects, each with integer `x` and `y` attributes. An episode ends
//! when the agent stands on a location.

use std::collections::BTreeSet;
use std::sync::Arc;

use groundwork_core::{
    ActionSchema, FullActionModel, GroundedAction, GroundingError, SchemaRegistry,
};
use groundwork_types::{ObjectInstance, State, TransitionProbability};
use tracing::warn;

/// Object class of the navigating agent.
pub const CLASS_AGENT: &str = "agent";

/// Object class of goal locations.
pub const CLASS_LOCATION: &str = "location";

/// Horizontal position attribute.
pub const ATTR_X: &str = "x";

/// Vertical position attribute.
pub const ATTR_Y: &str = "y";

/// Compass direction of a movement schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    /// Increase `y`.
    North,
    /// Decrease `y`.
    South,
    /// Increase `x`.
    East,
    /// Decrease `x`.
    West,
}

impl Direction {
    /// All directions, in schema order.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Position change for one step.
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    /// Name of the schema moving in this direction.
    pub const fn action_name(self) -> &'static str {
        match self {
            Self::North => "move-north",
            Self::South => "move-south",
            Self::East => "move-east",
            Self::West => "move-west",
        }
    }
}

/// Grid dimensions and wall cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridLayout {
    width: i64,
    height: i64,
    walls: BTreeSet<(i64, i64)>,
}

impl GridLayout {
    /// An open grid of the given size.
    pub const fn new(width: i64, height: i64) -> Self {
        Self {
            width,
            height,
            walls: BTreeSet::new(),
        }
    }

    /// Builder-style wall placement.
    #[must_use]
    pub fn with_wall(mut self, x: i64, y: i64) -> Self {
        self.walls.insert((x, y));
        self
    }

    /// Grid width.
    pub const fn width(&self) -> i64 {
        self.width
    }

    /// Grid height.
    pub const fn height(&self) -> i64 {
        self.height
    }

    /// Whether `(x, y)` is on the grid and not a wall.
    pub fn is_open(&self, x: i64, y: i64) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y) && !self.walls.contains(&(x, y))
    }

    /// The cell reached by one step from `(x, y)` in `direction`.
    pub fn step(&self, (x, y): (i64, i64), direction: Direction) -> (i64, i64) {
        let (dx, dy) = direction.delta();
        let next = (x.saturating_add(dx), y.saturating_add(dy));
        if self.is_open(next.0, next.1) { next } else { (x, y) }
    }
}

/// A movement schema for one direction.
#[derive(Debug, Clone)]
pub struct GridMove {
    direction: Direction,
    layout: Arc<GridLayout>,
    success_probability: f64,
}

impl GridMove {
    /// Create a movement schema.
    pub const fn new(direction: Direction, layout: Arc<GridLayout>, success_probability: f64) -> Self {
        Self {
            direction,
            layout,
            success_probability,
        }
    }

    /// The direction this schema moves in.
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    fn moved(&self, state: &State, direction: Direction) -> State {
        let mut next = state.clone();
        let Some(agent) = state.first_of_class(CLASS_AGENT) else {
            return next;
        };
        let Some(position) = position_of(agent) else {
            return next;
        };
        let (x, y) = self.layout.step(position, direction);
        if let Some(agent) = next.object_mut(&agent.name) {
            agent.set(ATTR_X, x);
            agent.set(ATTR_Y, y);
        }
        next
    }
}

impl ActionSchema for GridMove {
    fn name(&self) -> &str {
        self.direction.action_name()
    }

    fn applicable(&self, state: &State, _action: &GroundedAction) -> bool {
        state
            .first_of_class(CLASS_AGENT)
            .and_then(position_of)
            .is_some()
    }

    fn apply(&self, state: &State, _action: &GroundedAction) -> State {
        self.moved(state, self.direction)
    }

    fn full_model(&self) -> Option<&dyn FullActionModel> {
        Some(self)
    }
}

impl FullActionModel for GridMove {
    fn transitions(&self, state: &State, _action: &GroundedAction) -> Vec<TransitionProbability> {
        let slip = (1.0 - self.success_probability) / 3.0;
        let mut outcomes: Vec<TransitionProbability> = Vec::with_capacity(4);

        for direction in Direction::ALL {
            let probability = if direction == self.direction {
                self.success_probability
            } else {
                slip
            };
            if probability <= 0.0 {
                continue;
            }
            let next = self.moved(state, direction);
            // Blocked moves in different directions collapse into one outcome.
            if let Some(existing) = outcomes.iter_mut().find(|tp| tp.state == next) {
                existing.probability += probability;
            } else {
                outcomes.push(TransitionProbability::new(next, probability));
            }
        }

        outcomes
    }
}

/// The grid world domain: a layout plus movement noise.
#[derive(Debug, Clone)]
pub struct GridWorld {
    layout: Arc<GridLayout>,
    success_probability: f64,
}

impl GridWorld {
    /// Create a grid world.
    ///
    /// `success_probability` is clamped to `[0, 1]`. NaN is replaced by 1,
    /// making every move deterministic.
    pub fn new(layout: GridLayout, success_probability: f64) -> Self {
        let used = if success_probability.is_nan() {
            warn!("Success probability is NaN; moves will be deterministic");
            1.0
        } else {
            let clamped = success_probability.clamp(0.0, 1.0);
            if (clamped - success_probability).abs() > f64::EPSILON {
                warn!(
                    requested = success_probability,
                    used = clamped,
                    "Success probability out of range; clamped"
                );
            }
            clamped
        };
        Self {
            layout: Arc::new(layout),
            success_probability: used,
        }
    }

    /// Probability that a move goes in the intended direction.
    pub const fn success_probability(&self) -> f64 {
        self.success_probability
    }

    /// An 11x11 grid split into four rooms joined by doorways.
    pub fn four_rooms(success_probability: f64) -> Self {
        let mut layout = GridLayout::new(11, 11);
        for i in 0..11 {
            if i != 2 && i != 8 {
                layout = layout.with_wall(5, i);
            }
            if i != 1 && i != 8 {
                layout = layout.with_wall(i, 5);
            }
        }
        Self::new(layout, success_probability)
    }

    /// The layout.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// The four movement schemas, in [`Direction::ALL`] order.
    pub fn schemas(&self) -> Vec<Arc<dyn ActionSchema>> {
        Direction::ALL
            .into_iter()
            .map(|direction| {
                Arc::new(GridMove::new(
                    direction,
                    Arc::clone(&self.layout),
                    self.success_probability,
                )) as Arc<dyn ActionSchema>
            })
            .collect()
    }

    /// A registry holding the movement schemas.
    pub fn registry(&self) -> Result<SchemaRegistry, GroundingError> {
        let mut registry = SchemaRegistry::new();
        for schema in self.schemas() {
            registry.register(schema)?;
        }
        Ok(registry)
    }

    /// A state with the agent at `agent` and a single goal location at `goal`.
    pub fn state(agent: (i64, i64), goal: (i64, i64)) -> State {
        State::new()
            .with_object(
                ObjectInstance::new("agent0", CLASS_AGENT)
                    .with(ATTR_X, agent.0)
                    .with(ATTR_Y, agent.1),
            )
            .with_object(
                ObjectInstance::new("location0", CLASS_LOCATION)
                    .with(ATTR_X, goal.0)
                    .with(ATTR_Y, goal.1),
            )
    }
}

/// The agent's position, if the state has a positioned agent.
pub fn agent_position(state: &State) -> Option<(i64, i64)> {
    state.first_of_class(CLASS_AGENT).and_then(position_of)
}

/// Whether the agent stands on any location. Usable as a terminal function.
pub fn at_location(state: &State) -> bool {
    agent_position(state).is_some_and(|position| {
        state
            .objects_of_class(CLASS_LOCATION)
            .filter_map(position_of)
            .any(|location| location == position)
    })
}

/// Reward function: `-1` per step, `goal_reward` for the step that reaches
/// a location.
pub fn step_reward(goal_reward: f64) -> impl Fn(&State, &GroundedAction, &State) -> f64 + Send + Sync {
    move |_state: &State, _action: &GroundedAction, next: &State| {
        if at_location(next) { goal_reward } else { -1.0 }
    }
}

fn position_of(object: &ObjectInstance) -> Option<(i64, i64)> {
    Some((object.int(ATTR_X)?, object.int(ATTR_Y)?))
}
