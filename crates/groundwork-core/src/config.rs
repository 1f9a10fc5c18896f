//! Configuration loading and typed config structures for Groundwork.
//!
//! The canonical configuration lives in `groundwork-config.yaml` at the
//! project root. Every field has a default, so an empty file (or no file
//! at all) yields a usable configuration.

use std::path::Path;

use groundwork_types::{TransitionProbability, distribution_total};
use serde::Deserialize;

use crate::translate::TranslationStrategy;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Environment variable overriding `environment.seed`.
pub const SEED_ENV_VAR: &str = "GROUNDWORK_SEED";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GroundworkConfig {
    /// Transition-model checks.
    #[serde(default)]
    pub transitions: TransitionConfig,

    /// Parameter translation settings.
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Simulated environment and rollout settings.
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GroundworkConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `GROUNDWORK_SEED` environment variable, when set to an
    /// integer, overrides `environment.seed`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.environment.apply_env_overrides();
        Ok(config)
    }
}

/// Transition-model settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransitionConfig {
    /// Maximum allowed deviation of a distribution's total from 1.
    #[serde(default = "default_probability_tolerance")]
    pub probability_tolerance: f64,
}

impl TransitionConfig {
    /// Whether `outcomes` sums to 1 within the configured tolerance.
    pub fn is_normalized(&self, outcomes: &[TransitionProbability]) -> bool {
        (distribution_total(outcomes) - 1.0).abs() <= self.probability_tolerance
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            probability_tolerance: default_probability_tolerance(),
        }
    }
}

/// Parameter translation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TranslationConfig {
    /// Which translator maps object parameters across states.
    #[serde(default)]
    pub strategy: TranslationStrategy,
}

/// Simulated environment and rollout settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnvironmentConfig {
    /// Seed for environment sampling and random policies.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Maximum actions per episode.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Number of episodes to roll out.
    #[serde(default = "default_episodes")]
    pub episodes: usize,
}

impl EnvironmentConfig {
    /// Override the seed from `GROUNDWORK_SEED` when it parses as an integer.
    pub fn apply_env_overrides(&mut self) {
        self.override_seed(std::env::var(SEED_ENV_VAR).ok().as_deref());
    }

    /// Replace the seed with `raw` when it parses as an integer.
    fn override_seed(&mut self, raw: Option<&str>) {
        if let Some(seed) = raw.and_then(|val| val.trim().parse().ok()) {
            self.seed = seed;
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            max_steps: default_max_steps(),
            episodes: default_episodes(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_probability_tolerance() -> f64 {
    1e-9
}

const fn default_seed() -> u64 {
    42
}

const fn default_max_steps() -> usize {
    100
}

const fn default_episodes() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_owned()
}
