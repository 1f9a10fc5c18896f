//! Environments: stateful executors of grounded actions.
//!
//! The pure path ([`GroundedAction::execute_in`]) maps a state to a state.
//! An [`Environment`] instead owns a current state, executes actions
//! against it, and reports what happened as an [`EnvironmentOutcome`].
//! Real systems (robots, simulators behind an API) implement the trait
//! directly; [`SimulatedEnvironment`] implements it on top of the
//! schemas' own models.
//!
//! # Sampling
//!
//! [`SimulatedEnvironment`] samples the next state from the schema's
//! full transition model when one is available, and otherwise applies the
//! schema's effect. The RNG is seeded, so runs are reproducible.

use groundwork_types::{State, TransitionProbability};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::GroundingError;
use crate::grounded::GroundedAction;

/// The observable result of executing one action in an environment.
#[derive(Debug, Clone)]
pub struct EnvironmentOutcome {
    /// Observation before the action.
    pub observation: State,
    /// The action that was executed.
    pub action: GroundedAction,
    /// Observation after the action.
    pub next_observation: State,
    /// Reward received for the transition.
    pub reward: f64,
    /// Whether the environment reached a terminal state.
    pub terminated: bool,
}

/// A stateful executor of grounded actions.
pub trait Environment {
    /// The environment's current observation.
    fn current_observation(&self) -> State;

    /// Execute `action` and advance the environment.
    fn execute_action(
        &mut self,
        action: &GroundedAction,
    ) -> Result<EnvironmentOutcome, GroundingError>;

    /// Reward received for the most recent transition (0 before any).
    fn last_reward(&self) -> f64;

    /// Whether the current state is terminal.
    fn is_terminal(&self) -> bool;

    /// Return to the initial state.
    fn reset(&mut self);
}

/// Reward for a `(state, action, next_state)` transition.
pub trait RewardFunction: Send + Sync {
    /// The reward for moving from `state` to `next` via `action`.
    fn reward(&self, state: &State, action: &GroundedAction, next: &State) -> f64;
}

impl<F> RewardFunction for F
where
    F: Fn(&State, &GroundedAction, &State) -> f64 + Send + Sync,
{
    fn reward(&self, state: &State, action: &GroundedAction, next: &State) -> f64 {
        self(state, action, next)
    }
}

/// Decides whether a state ends an episode.
pub trait TerminalFunction: Send + Sync {
    /// Whether `state` is terminal.
    fn is_terminal(&self, state: &State) -> bool;
}

impl<F> TerminalFunction for F
where
    F: Fn(&State) -> bool + Send + Sync,
{
    fn is_terminal(&self, state: &State) -> bool {
        self(state)
    }
}

/// An environment simulated from the schemas' own models.
pub struct SimulatedEnvironment {
    initial: State,
    current: State,
    reward_fn: Box<dyn RewardFunction>,
    terminal_fn: Box<dyn TerminalFunction>,
    last_reward: f64,
    rng: StdRng,
}

impl SimulatedEnvironment {
    /// Create a simulated environment starting in `initial`.
    pub fn new(
        initial: State,
        reward_fn: impl RewardFunction + 'static,
        terminal_fn: impl TerminalFunction + 'static,
        seed: u64,
    ) -> Self {
        Self {
            current: initial.clone(),
            initial,
            reward_fn: Box::new(reward_fn),
            terminal_fn: Box::new(terminal_fn),
            last_reward: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Replace the state episodes start from. Takes effect immediately.
    pub fn set_initial_state(&mut self, initial: State) {
        self.current = initial.clone();
        self.initial = initial;
        self.last_reward = 0.0;
    }

    fn next_state(&mut self, action: &GroundedAction) -> State {
        match action.transitions(&self.current) {
            Ok(outcomes) if !outcomes.is_empty() => {
                let roll: f64 = self.rng.random();
                sample(outcomes, roll)
            }
            _ => action.execute_in(&self.current),
        }
    }
}

impl core::fmt::Debug for SimulatedEnvironment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimulatedEnvironment")
            .field("current", &self.current)
            .field("last_reward", &self.last_reward)
            .finish_non_exhaustive()
    }
}

impl Environment for SimulatedEnvironment {
    fn current_observation(&self) -> State {
        self.current.clone()
    }

    fn execute_action(
        &mut self,
        action: &GroundedAction,
    ) -> Result<EnvironmentOutcome, GroundingError> {
        if self.is_terminal() {
            return Err(GroundingError::EpisodeTerminated);
        }
        if !action.applicable_in(&self.current) {
            debug!(%action, params = ?action.parameters_as_strings(), "Action rejected");
            return Err(GroundingError::NotApplicable {
                action: action.to_string(),
            });
        }

        let next = self.next_state(action);
        let reward = self.reward_fn.reward(&self.current, action, &next);
        let terminated = self.terminal_fn.is_terminal(&next);
        let observation = std::mem::replace(&mut self.current, next);
        self.last_reward = reward;

        Ok(EnvironmentOutcome {
            observation,
            action: action.clone(),
            next_observation: self.current.clone(),
            reward,
            terminated,
        })
    }

    fn last_reward(&self) -> f64 {
        self.last_reward
    }

    fn is_terminal(&self) -> bool {
        self.terminal_fn.is_terminal(&self.current)
    }

    fn reset(&mut self) {
        self.current = self.initial.clone();
        self.last_reward = 0.0;
    }
}

/// Pick the outcome whose cumulative probability band contains `roll`.
///
/// Falls back to the last outcome when rounding leaves `roll` past the
/// final band.
fn sample(outcomes: Vec<TransitionProbability>, roll: f64) -> State {
    let mut cumulative = 0.0;
    let mut last = None;
    for outcome in outcomes {
        cumulative += outcome.probability;
        if roll < cumulative {
            return outcome.state;
        }
        last = Some(outcome.state);
    }
    last.unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use groundwork_types::{ObjectInstance, ObjectName};

    use super::*;
    use crate::schema::{ActionSchema, FullActionModel};

    /// Increments `counter.n`; stochastic variant adds 1 or 2 with equal odds.
    struct Increment {
        stochastic: bool,
    }

    impl ActionSchema for Increment {
        fn name(&self) -> &str {
            "increment"
        }

        fn applicable(&self, state: &State, _action: &GroundedAction) -> bool {
            counter(state) < 100
        }

        fn apply(&self, state: &State, _action: &GroundedAction) -> State {
            with_counter(counter(state).saturating_add(1))
        }

        fn full_model(&self) -> Option<&dyn FullActionModel> {
            if self.stochastic { Some(self) } else { None }
        }
    }

    impl FullActionModel for Increment {
        fn transitions(&self, state: &State, _action: &GroundedAction) -> Vec<TransitionProbability> {
            let n = counter(state);
            vec![
                TransitionProbability::new(with_counter(n.saturating_add(1)), 0.5),
                TransitionProbability::new(with_counter(n.saturating_add(2)), 0.5),
            ]
        }
    }

    fn counter(state: &State) -> i64 {
        state
            .object(&ObjectName::from("counter"))
            .and_then(|o| o.int("n"))
            .unwrap_or(0)
    }

    fn with_counter(n: i64) -> State {
        State::new().with_object(ObjectInstance::new("counter", "counter").with("n", n))
    }

    fn env(stochastic: bool, limit: i64) -> (SimulatedEnvironment, GroundedAction) {
        let action = GroundedAction::new(Arc::new(Increment { stochastic }));
        #[allow(clippy::cast_precision_loss)]
        let reward = |_: &State, _: &GroundedAction, next: &State| counter(next) as f64;
        let terminal = move |s: &State| counter(s) >= limit;
        (
            SimulatedEnvironment::new(with_counter(0), reward, terminal, 7),
            action,
        )
    }

    #[test]
    fn deterministic_execution_reports_outcome() {
        let (mut env, action) = env(false, 10);
        let outcome = action.execute_in_environment(&mut env).unwrap();
        assert_eq!(counter(&outcome.observation), 0);
        assert_eq!(counter(&outcome.next_observation), 1);
        assert!((outcome.reward - 1.0).abs() < f64::EPSILON);
        assert!(!outcome.terminated);
        assert_eq!(outcome.action, action);
        assert_eq!(counter(&env.current_observation()), 1);
        assert!((env.last_reward() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stochastic_execution_stays_in_support() {
        let (mut env, action) = env(true, 1000);
        let outcome = env.execute_action(&action).unwrap();
        let n = counter(&outcome.next_observation);
        assert!(n == 1 || n == 2);
    }

    #[test]
    fn same_seed_same_trajectory() {
        let run = || {
            let (mut env, action) = env(true, 1000);
            (0..10)
                .map(|_| counter(&env.execute_action(&action).unwrap().next_observation))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn terminal_state_blocks_execution_until_reset() {
        let (mut env, action) = env(false, 1);
        let outcome = env.execute_action(&action).unwrap();
        assert!(outcome.terminated);
        assert!(env.is_terminal());
        assert!(matches!(
            env.execute_action(&action),
            Err(GroundingError::EpisodeTerminated)
        ));

        env.reset();
        assert!(!env.is_terminal());
        assert_eq!(counter(&env.current_observation()), 0);
        assert!(env.last_reward().abs() < f64::EPSILON);
    }

    #[test]
    fn inapplicable_action_is_rejected() {
        let (mut env, action) = env(false, 1000);
        env.set_initial_state(with_counter(100));
        let err = env.execute_action(&action).unwrap_err();
        assert!(matches!(err, GroundingError::NotApplicable { ref action } if action == "increment"));
    }

    #[test]
    fn sample_falls_back_to_last_outcome() {
        let outcomes = vec![
            TransitionProbability::new(with_counter(1), 0.5),
            TransitionProbability::new(with_counter(2), 0.49),
        ];
        assert_eq!(counter(&sample(outcomes, 0.999)), 2);
    }
}
