//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup and the query
//! run so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: wayfarer_core::ConfigError,
    },

    /// Starting world construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: wayfarer_world::WorldError,
    },

    /// A configured route query failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: wayfarer_core::SessionError,
    },

    /// The world failed its id and reference audit.
    #[error("world failed validation with {errors} error(s)")]
    InvalidWorld {
        /// Number of integrity errors found.
        errors: usize,
    },
}
