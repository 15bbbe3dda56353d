//! The Wayfarer terrain graph and its router.
//!
//! The world is a two-level graph: regions hold location nodes joined by
//! two-way edges, and region edges join locations across regions. Each
//! direction of a link has its own travel time and capability conditions,
//! and a block flag can sever both at once. On top sits a uniform-cost
//! path finder that charges travel time plus the dwell time of every node
//! passed through.
//!
//! # Modules
//!
//! - [`error`] -- Error types for single-entity graph operations.
//! - [`location`] -- [`LocationNode`] and its dirty-tracking mutation handle.
//! - [`link`] -- The shared two-way [`Link`] used by both edge kinds, and
//!   [`LinkMut`] for dirty-tracked edits.
//! - [`region`] -- [`Region`]: nodes, edges, adjacency, id audits.
//! - [`region_edge`] -- [`RegionEdge`]: links between regions.
//! - [`terrain`] -- [`Terrain`]: all regions and region edges, global
//!   lookup, cross-region validation, aggregated dirty tracking.
//! - [`pathfinder`] -- [`PathFinder`]: minimum-time routes under a
//!   [`TraversalContext`](wayfarer_types::TraversalContext).
//! - [`builder`] -- [`RegionBuilder`]: regions from a travel-time matrix.
//! - [`validation`] -- [`ValidationReport`] and its entries.
//! - [`starting_world`] -- A small three-region demo terrain.
//!
//! [`LocationNode`]: location::LocationNode
//! [`Link`]: link::Link
//! [`LinkMut`]: link::LinkMut

pub mod builder;
pub mod error;
pub mod link;
pub mod location;
pub mod pathfinder;
pub mod region;
pub mod region_edge;
pub mod starting_world;
pub mod terrain;
pub mod validation;

// Re-export primary types at crate root.
pub use builder::RegionBuilder;
pub use error::WorldError;
pub use link::{Edge, IMPASSABLE, Leg, Link, LinkMut};
pub use location::{LocationMut, LocationNode};
pub use pathfinder::{DwellPolicy, LinkKind, PathFinder, PathHop, PathResult, PathfinderOptions};
pub use region::{Neighbor, Region};
pub use region_edge::RegionEdge;
pub use starting_world::{StartingLocations, create_starting_world};
pub use terrain::{RegionExit, RemovedRegionEdge, Terrain};
pub use validation::{ValidationError, ValidationReport, ValidationWarning};
