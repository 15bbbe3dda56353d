//! The host-facing world session.
//!
//! A [`WorldSession`] owns the [`Terrain`] and applies the configured
//! policies around it: route queries use the configured dwell policy, bulk
//! edits are followed by the self-healing region-edge pass, and checkpoints
//! hand the persistence layer exactly what changed before clearing the
//! dirty flags.
//!
//! The host is single-threaded and step-driven. Every mutation made through
//! [`WorldSession::terrain_mut`] is visible to the next query.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};
use wayfarer_types::{LocalId, LocationRef, RegionId, TraversalContext};
use wayfarer_world::{
    Edge, PathFinder, PathResult, RegionEdge, RemovedRegionEdge, Terrain, ValidationReport,
    WorldError,
};

use crate::config::WayfarerConfig;

/// Errors that can occur while driving a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A graph operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// A configured query names a location that does not exist.
    #[error("query {index}: {source}")]
    Query {
        /// Position of the query in the configuration.
        index: usize,
        /// The underlying world error.
        source: WorldError,
    },
}

/// What the persistence layer must re-serialize since the last checkpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkpoint {
    /// Regions with unsaved edits (removed regions included).
    pub changed_regions: BTreeSet<RegionId>,
    /// Regions removed since the last checkpoint.
    pub removed_regions: BTreeSet<RegionId>,
    /// Whether the region edge collection changed.
    pub region_edges_changed: bool,
}

impl Checkpoint {
    /// Whether nothing needs saving.
    pub fn is_empty(&self) -> bool {
        self.changed_regions.is_empty() && !self.region_edges_changed
    }
}

/// Outcome of one configured route query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    /// Start location.
    pub from: LocationRef,
    /// Goal location.
    pub to: LocationRef,
    /// The route, or the "not found" result.
    pub result: PathResult,
}

/// A terrain plus the policies configured for it.
#[derive(Debug, Clone)]
pub struct WorldSession {
    terrain: Terrain,
    config: WayfarerConfig,
}

impl WorldSession {
    /// Wrap a terrain with the given configuration.
    pub const fn new(terrain: Terrain, config: WayfarerConfig) -> Self {
        Self { terrain, config }
    }

    /// The configuration in effect.
    pub const fn config(&self) -> &WayfarerConfig {
        &self.config
    }

    /// Read-only view of the terrain.
    pub const fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Mutable access for authoring and scripted edits.
    ///
    /// Call [`after_bulk_edit`](Self::after_bulk_edit) once a batch of
    /// structural edits is complete.
    pub const fn terrain_mut(&mut self) -> &mut Terrain {
        &mut self.terrain
    }

    /// Give the terrain back, e.g. on world reset.
    pub fn into_terrain(self) -> Terrain {
        self.terrain
    }

    // -------------------------------------------------------------------
    // Queries for movement systems
    // -------------------------------------------------------------------

    /// Minimum-time route under the configured dwell policy.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::World`] if either endpoint does not exist or
    /// the route cost overflows.
    pub fn find_path(
        &self,
        from: LocationRef,
        to: LocationRef,
        context: &TraversalContext,
    ) -> Result<PathResult, SessionError> {
        let finder = PathFinder::with_options(&self.terrain, self.config.pathfinding.options());
        Ok(finder.find_path(from, to, context)?)
    }

    /// The intra-region edge between two locations, for re-deriving the
    /// time of one hop.
    pub fn edge_between(&self, region: RegionId, a: LocalId, b: LocalId) -> Option<&Edge> {
        self.terrain.edge_between(region, a, b)
    }

    /// Region edges anchored at `location`.
    pub fn region_edges_from(&self, location: LocationRef) -> Vec<&RegionEdge> {
        self.terrain.region_edges_from(location)
    }

    /// Answer every query listed in the configuration, in order.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Query`] for the first query naming a
    /// location that does not exist.
    pub fn run_configured_queries(&self) -> Result<Vec<QueryOutcome>, SessionError> {
        let mut outcomes = Vec::with_capacity(self.config.queries.len());
        for (index, query) in self.config.queries.iter().enumerate() {
            let result = self
                .find_path(query.from, query.to, &query.tags)
                .map_err(|err| match err {
                    SessionError::World { source } | SessionError::Query { source, .. } => {
                        SessionError::Query { index, source }
                    }
                })?;
            if result.found {
                info!(
                    index,
                    from = %query.from,
                    to = %query.to,
                    hops = result.hops.len(),
                    total_time = result.total_time,
                    "Route"
                );
            } else {
                info!(index, from = %query.from, to = %query.to, "No route");
            }
            outcomes.push(QueryOutcome {
                from: query.from,
                to: query.to,
                result,
            });
        }
        Ok(outcomes)
    }

    // -------------------------------------------------------------------
    // Maintenance
    // -------------------------------------------------------------------

    /// Run the self-healing region-edge pass if the configuration enables
    /// it. Returns whatever was removed.
    pub fn after_bulk_edit(&mut self) -> Vec<RemovedRegionEdge> {
        if !self.config.validation.clean_region_edges_after_edit {
            return Vec::new();
        }
        let removed = self.terrain.validate_and_clean_region_edges();
        if !removed.is_empty() {
            warn!(removed = removed.len(), "Dangling region edges removed after bulk edit");
        }
        removed
    }

    /// Full id and reference audit, with empty-slot listing as configured.
    pub fn validate(&self) -> ValidationReport {
        let report = self
            .terrain
            .validate_all_ids(self.config.validation.check_empty_slots);
        for error in report.errors() {
            warn!(%error, "Validation error");
        }
        for warning in report.warnings() {
            debug!(%warning, "Validation warning");
        }
        report
    }

    /// Collect what changed since the last checkpoint and clear every
    /// dirty flag.
    pub fn checkpoint(&mut self) -> Checkpoint {
        let checkpoint = Checkpoint {
            changed_regions: self.terrain.changed_regions(),
            removed_regions: self.terrain.removed_regions().clone(),
            region_edges_changed: self.terrain.region_edges_changed(),
        };
        self.terrain.clear_changed_flags();
        debug!(
            regions = checkpoint.changed_regions.len(),
            region_edges = checkpoint.region_edges_changed,
            "Checkpoint taken"
        );
        checkpoint
    }
}
