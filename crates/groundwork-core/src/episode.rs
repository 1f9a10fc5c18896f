//! Episodes: recorded trajectories of grounded actions.
//!
//! An [`Episode`] is the state/action/reward sequence produced by running
//! a [`Policy`] in an [`Environment`]. An [`EpisodeTranscript`] is its
//! serializable form: actions are stored by name plus their flat string
//! parameters and restored through a [`SchemaRegistry`].

use std::sync::Arc;

use groundwork_types::State;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enumerate::all_applicable_groundings;
use crate::environment::{Environment, EnvironmentOutcome};
use crate::error::GroundingError;
use crate::grounded::GroundedAction;
use crate::registry::SchemaRegistry;
use crate::schema::ActionSchema;

/// A recorded trajectory.
///
/// `states` always holds one more entry than `actions`; `rewards[i]` is
/// the reward for taking `actions[i]` in `states[i]`.
#[derive(Debug, Clone)]
pub struct Episode {
    /// Visited states, starting with the initial state.
    pub states: Vec<State>,
    /// Actions taken.
    pub actions: Vec<GroundedAction>,
    /// Rewards received.
    pub rewards: Vec<f64>,
}

impl Episode {
    /// Start an episode in `initial`.
    pub fn new(initial: State) -> Self {
        Self {
            states: vec![initial],
            actions: Vec::new(),
            rewards: Vec::new(),
        }
    }

    /// Append one environment step.
    pub fn record(&mut self, outcome: EnvironmentOutcome) {
        self.actions.push(outcome.action);
        self.rewards.push(outcome.reward);
        self.states.push(outcome.next_observation);
    }

    /// Number of actions taken.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no action has been taken.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Sum of all rewards.
    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().sum()
    }

    /// The most recent state.
    pub fn last_state(&self) -> Option<&State> {
        self.states.last()
    }
}

/// Chooses the next action for a state.
pub trait Policy {
    /// The action to take in `state`, or `None` if nothing is applicable.
    fn select(&mut self, state: &State) -> Option<GroundedAction>;
}

/// Picks uniformly among all applicable groundings of a schema set.
pub struct RandomPolicy {
    schemas: Vec<Arc<dyn ActionSchema>>,
    rng: StdRng,
}

impl RandomPolicy {
    /// Create a seeded random policy over `schemas`.
    pub fn new(schemas: Vec<Arc<dyn ActionSchema>>, seed: u64) -> Self {
        Self {
            schemas,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl core::fmt::Debug for RandomPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RandomPolicy")
            .field("schemas", &self.schemas.iter().map(|s| s.name()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Policy for RandomPolicy {
    fn select(&mut self, state: &State) -> Option<GroundedAction> {
        let mut candidates = all_applicable_groundings(&self.schemas, state);
        if candidates.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..candidates.len());
        Some(candidates.swap_remove(index))
    }
}

/// Run `policy` in `env` from its current state for at most `max_steps`
/// actions, stopping early at a terminal state or when no action applies.
pub fn rollout(
    env: &mut dyn Environment,
    policy: &mut dyn Policy,
    max_steps: usize,
) -> Result<Episode, GroundingError> {
    let mut episode = Episode::new(env.current_observation());

    while episode.len() < max_steps && !env.is_terminal() {
        let state = env.current_observation();
        let Some(action) = policy.select(&state) else {
            debug!(step = episode.len(), "No applicable action; ending rollout");
            break;
        };
        let outcome = action.execute_in_environment(env)?;
        episode.record(outcome);
    }

    Ok(episode)
}

/// An action as stored in a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Schema name.
    pub name: String,
    /// Flat string encoding of the parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
}

impl From<&GroundedAction> for ActionRecord {
    fn from(action: &GroundedAction) -> Self {
        Self {
            name: action.name().to_owned(),
            parameters: action.parameters_as_strings(),
        }
    }
}

/// Serializable form of an [`Episode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeTranscript {
    /// Visited states.
    pub states: Vec<State>,
    /// Actions taken.
    pub actions: Vec<ActionRecord>,
    /// Rewards received.
    pub rewards: Vec<f64>,
}

impl From<&Episode> for EpisodeTranscript {
    fn from(episode: &Episode) -> Self {
        Self {
            states: episode.states.clone(),
            actions: episode.actions.iter().map(ActionRecord::from).collect(),
            rewards: episode.rewards.clone(),
        }
    }
}

impl EpisodeTranscript {
    /// Restore the episode, re-grounding each action through `registry`.
    ///
    /// Fails with [`GroundingError::MalformedTranscript`] unless there is
    /// one more state than actions and one reward per action.
    pub fn to_episode(&self, registry: &SchemaRegistry) -> Result<Episode, GroundingError> {
        let steps = self.actions.len();
        if self.states.len() != steps.saturating_add(1) {
            return Err(GroundingError::MalformedTranscript {
                reason: format!("{} states for {steps} actions", self.states.len()),
            });
        }
        if self.rewards.len() != steps {
            return Err(GroundingError::MalformedTranscript {
                reason: format!("{} rewards for {steps} actions", self.rewards.len()),
            });
        }

        let actions = self
            .actions
            .iter()
            .map(|record| registry.ground(&record.name, &record.parameters))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Episode {
            states: self.states.clone(),
            actions,
            rewards: self.rewards.clone(),
        })
    }
}
