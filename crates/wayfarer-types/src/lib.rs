//! Shared type definitions for the Wayfarer terrain graph.
//!
//! This crate holds the vocabulary every other crate speaks: stable integer
//! identifiers, the opaque external handle, capability-tag maps, and link
//! direction selectors. It has no graph logic of its own.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe integer wrappers for regions, locations, and
//!   region edges, plus the global [`LocationRef`] address
//! - [`enums`] -- Link direction selector
//! - [`tags`] -- [`TraversalContext`] and [`ConditionSet`] sparse tag maps

pub mod enums;
pub mod ids;
pub mod tags;

// Re-export all public types at crate root for convenience.
pub use enums::Direction;
pub use ids::{ExternalRef, LocalId, LocationRef, RegionEdgeId, RegionId};
pub use tags::{ConditionSet, TraversalContext};
