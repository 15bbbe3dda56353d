//! Error types for the `wayfarer-world` crate.
//!
//! All fallible single-entity operations in this crate return
//! [`WorldError`]. Bulk validation never fails; it produces a
//! [`ValidationReport`](crate::validation::ValidationReport) instead.

use wayfarer_types::{LocalId, LocationRef, RegionEdgeId, RegionId};

/// Errors that can occur during terrain-graph operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// A location id below zero was supplied.
    #[error("negative location id {local} in region {region}")]
    NegativeLocalId {
        /// Region the insertion targeted.
        region: RegionId,
        /// The rejected id.
        local: LocalId,
    },

    /// A location with this id already exists (strict insertion only).
    #[error("duplicate location id: {0}")]
    DuplicateLocation(LocationRef),

    /// A location node was handed to a region it does not belong to.
    #[error("location belongs to region {found}, not region {expected}")]
    RegionMismatch {
        /// The region performing the insertion.
        expected: RegionId,
        /// The region recorded on the node.
        found: RegionId,
    },

    /// An edge was requested from a location to itself.
    #[error("edge from location {0} to itself")]
    SelfLoop(LocationRef),

    /// An edge already connects this unordered pair.
    #[error("edge already exists between {a} and {b} in region {region}")]
    EdgeExists {
        /// Owning region.
        region: RegionId,
        /// First endpoint.
        a: LocalId,
        /// Second endpoint.
        b: LocalId,
    },

    /// A region with this id already exists.
    #[error("duplicate region id: {0}")]
    DuplicateRegion(RegionId),

    /// A region was not found in the terrain.
    #[error("region not found: {0}")]
    RegionNotFound(RegionId),

    /// A location was not found.
    #[error("location not found: {0}")]
    LocationNotFound(LocationRef),

    /// A region edge with this id already exists.
    #[error("duplicate region edge id: {0}")]
    DuplicateRegionEdge(RegionEdgeId),

    /// A region edge was not found in the terrain.
    #[error("region edge not found: {0}")]
    RegionEdgeNotFound(RegionEdgeId),

    /// A direction was resolved from a location that is not on the link.
    #[error("location {0} is not an endpoint of this link")]
    NotAnEndpoint(String),

    /// A builder matrix row does not match the matrix height.
    #[error("travel-time matrix is not square: {rows} rows but row {row} has {len} columns")]
    NonSquareMatrix {
        /// Number of rows.
        rows: usize,
        /// Offending row index.
        row: usize,
        /// Length of the offending row.
        len: usize,
    },

    /// A builder cell or location index lies outside the matrix.
    #[error("builder index {index} out of range for size {size}")]
    BuilderIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Matrix dimension.
        size: usize,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in terrain calculation")]
    ArithmeticOverflow,
}
