//! Headless harness for the Wayfarer terrain graph.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `wayfarer-config.yaml` (or `$WAYFARER_CONFIG`)
//! 2. Initialize structured logging (tracing); `RUST_LOG` overrides the
//!    configured level
//! 3. Create the starting world (3 regions, 4 region edges)
//! 4. Run the self-healing pass and the id/reference audit
//! 5. Answer every configured route query
//! 6. Take a checkpoint and log what would be persisted

mod error;

use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wayfarer_core::{WayfarerConfig, WorldSession};
use wayfarer_world::PathResult;

use crate::error::EngineError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, world construction, validation, or a
/// configured query fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so remember where it
    //    came from and report it afterwards.
    let (config, source) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("wayfarer-engine starting");
    match &source {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        world_name = config.world.name,
        dwell_at_goal = config.pathfinding.dwell_at_goal,
        queries = config.queries.len(),
        "Configuration"
    );

    // 3. Create the starting world.
    let (terrain, ids) = wayfarer_world::create_starting_world()?;
    info!(
        regions = terrain.region_count(),
        region_edges = terrain.region_edge_count(),
        town_gate = %ids.town_gate,
        "Starting world created"
    );
    let mut session = WorldSession::new(terrain, config);

    // 4. Heal and audit.
    let removed = session.after_bulk_edit();
    if !removed.is_empty() {
        warn!(removed = removed.len(), "Starting world had dangling region edges");
    }
    let report = session.validate();
    if report.has_errors() {
        return Err(EngineError::InvalidWorld {
            errors: report.errors().len(),
        }
        .into());
    }
    info!(warnings = report.warnings().len(), "World validated");

    // 5. Answer configured queries.
    let outcomes = session.run_configured_queries().map_err(EngineError::from)?;
    for outcome in &outcomes {
        info!(
            from = %outcome.from,
            to = %outcome.to,
            route = describe(&outcome.result),
            "Query answered"
        );
    }

    // 6. Checkpoint.
    let checkpoint = session.checkpoint();
    info!(
        changed_regions = checkpoint.changed_regions.len(),
        region_edges_changed = checkpoint.region_edges_changed,
        "Checkpoint"
    );

    info!("wayfarer-engine finished");
    Ok(())
}

/// Load configuration from the configured path, falling back to defaults
/// when the file does not exist.
fn load_config() -> Result<(WayfarerConfig, Option<PathBuf>), EngineError> {
    let config_path = WayfarerConfig::default_path();
    if config_path.exists() {
        let config = WayfarerConfig::from_file(&config_path)?;
        Ok((config, Some(config_path)))
    } else {
        Ok((WayfarerConfig::default(), None))
    }
}

/// One-line human-readable route summary.
fn describe(result: &PathResult) -> String {
    if !result.found {
        return "no route".to_owned();
    }
    let stops: Vec<String> = result.path.iter().map(ToString::to_string).collect();
    format!("{} ({} min)", stops.join(" -> "), result.total_time)
}
