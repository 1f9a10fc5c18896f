//! Command-line runner for Groundwork.
//!
//! Loads configuration, checks the reference domains' transition models,
//! carries a blocks-world grounding across renamed states with the
//! configured translation strategy, and rolls out random policies in the
//! four-rooms grid world.
//!
//! # Usage
//!
//! ```text
//! groundwork-runner [CONFIG] [TRANSCRIPT]
//! ```
//!
//! `CONFIG` defaults to `groundwork-config.yaml`; when that file does not
//! exist the built-in defaults are used. When `TRANSCRIPT` is given, every
//! episode is written there as JSON.

mod error;

use std::path::{Path, PathBuf};

use groundwork_core::config::LoggingConfig;
use groundwork_core::{
    Environment, EpisodeTranscript, GroundedAction, GroundworkConfig, RandomPolicy,
    SimulatedEnvironment, rollout,
};
use groundwork_domains::grid_world::{at_location, step_reward};
use groundwork_domains::{BlocksWorld, GridWorld};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::RunnerError;

/// Probability that a grid move goes in the intended direction.
const SUCCESS_PROBABILITY: f64 = 0.8;

/// Reward for the step that reaches the goal.
const GOAL_REWARD: f64 = 10.0;

/// Agent start cell in the four-rooms layout.
const START: (i64, i64) = (0, 0);

/// Goal cell in the four-rooms layout.
const GOAL: (i64, i64) = (10, 10);

fn main() -> Result<(), RunnerError> {
    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .map_or_else(|| PathBuf::from("groundwork-config.yaml"), PathBuf::from);
    let transcript_path = args.next().map(PathBuf::from);

    let (config, loaded) = load_config(&config_path)?;
    init_logging(&config.logging);

    info!("groundwork-runner starting");
    if loaded {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        seed = config.environment.seed,
        episodes = config.environment.episodes,
        max_steps = config.environment.max_steps,
        strategy = ?config.translation.strategy,
        "Run parameters"
    );

    let world = GridWorld::four_rooms(SUCCESS_PROBABILITY);
    check_transitions(&config, &world)?;
    check_translation(&config)?;

    let transcripts = run_episodes(&config, &world)?;

    if let Some(path) = transcript_path {
        let json = serde_json::to_string_pretty(&transcripts)?;
        std::fs::write(&path, json).map_err(|source| RunnerError::Write {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), episodes = transcripts.len(), "Transcripts written");
    }

    info!("groundwork-runner finished");
    Ok(())
}

/// Load configuration, returning whether a file was actually read.
fn load_config(path: &Path) -> Result<(GroundworkConfig, bool), RunnerError> {
    if path.exists() {
        Ok((GroundworkConfig::from_file(path)?, true))
    } else {
        Ok((GroundworkConfig::parse("")?, false))
    }
}

/// Install the tracing subscriber. `RUST_LOG` takes precedence over the
/// configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Verify every movement schema's distribution at the start cell.
fn check_transitions(config: &GroundworkConfig, world: &GridWorld) -> Result<(), RunnerError> {
    let state = GridWorld::state(START, GOAL);
    for schema in world.schemas() {
        let action = GroundedAction::new(schema);
        let outcomes = action.transitions(&state)?;
        if config.transitions.is_normalized(&outcomes) {
            info!(action = %action, outcomes = outcomes.len(), "Transition model normalized");
        } else {
            warn!(
                action = %action,
                total = groundwork_types::distribution_total(&outcomes),
                tolerance = config.transitions.probability_tolerance,
                "Transition model does not sum to 1"
            );
        }
    }
    Ok(())
}

/// Carry a `stack` grounding from one set of blocks to a renamed copy.
fn check_translation(config: &GroundworkConfig) -> Result<(), RunnerError> {
    let registry = BlocksWorld::registry()?;
    let source = BlocksWorld::state(&[&["a"], &["b"], &["c"]]);
    let target = BlocksWorld::state(&[&["x"], &["y"], &["z"]]);

    let action = registry.ground("stack", &["a", "b"])?;
    let translated =
        action.translate_with(config.translation.strategy.translator(), &source, &target)?;

    info!(
        action = %action,
        from = ?action.parameters_as_strings(),
        to = ?translated.parameters_as_strings(),
        applicable = translated.applicable_in(&target),
        "Translated grounding"
    );
    Ok(())
}

/// Roll out one random-policy episode per configured episode count.
fn run_episodes(
    config: &GroundworkConfig,
    world: &GridWorld,
) -> Result<Vec<EpisodeTranscript>, RunnerError> {
    let mut env = SimulatedEnvironment::new(
        GridWorld::state(START, GOAL),
        step_reward(GOAL_REWARD),
        at_location,
        config.environment.seed,
    );
    let mut seed = config.environment.seed;
    let mut transcripts = Vec::with_capacity(config.environment.episodes);

    for episode_index in 0..config.environment.episodes {
        env.reset();
        let mut policy = RandomPolicy::new(world.schemas(), seed);
        seed = seed.wrapping_add(1);

        let episode = rollout(&mut env, &mut policy, config.environment.max_steps)?;
        let reached_goal = episode.last_state().is_some_and(at_location);
        info!(
            episode = episode_index,
            steps = episode.len(),
            total_reward = episode.total_reward(),
            reached_goal,
            "Episode complete"
        );
        transcripts.push(EpisodeTranscript::from(&episode));
    }

    Ok(transcripts)
}
