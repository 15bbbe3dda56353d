//! Configuration and orchestration for the Wayfarer terrain graph.
//!
//! This crate sits between a host simulation and the graph core. It loads
//! the typed configuration and wraps the [`Terrain`] in a session that
//! applies it.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `wayfarer-config.yaml` into
//!   strongly-typed structs.
//! - [`session`] -- [`WorldSession`]: route queries under the configured
//!   dwell policy, post-edit self-healing, validation, and persistence
//!   checkpoints.
//!
//! [`Terrain`]: wayfarer_world::Terrain
//! [`WorldSession`]: session::WorldSession

pub mod config;
pub mod session;

pub use config::{ConfigError, WayfarerConfig};
pub use session::{Checkpoint, QueryOutcome, SessionError, WorldSession};
