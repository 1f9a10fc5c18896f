//! Error types for the runner binary.

use std::path::PathBuf;

/// Top-level error for the runner binary.
///
/// Each variant wraps a subsystem error so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: groundwork_core::ConfigError,
    },

    /// Grounding, execution, or translation failed.
    #[error("grounding error: {source}")]
    Grounding {
        /// The underlying grounding error.
        #[from]
        source: groundwork_core::GroundingError,
    },

    /// Transcript serialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Writing the transcript file failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
