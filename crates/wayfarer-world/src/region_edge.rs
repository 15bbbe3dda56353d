//! Inter-region links.
//!
//! A [`RegionEdge`] has the same traversal, condition, and blocking rules as
//! an intra-region [`Edge`](crate::link::Edge), but its endpoints are global
//! [`LocationRef`]s that may sit in different regions. Its id lives in the
//! terrain's own id space, independent of any region's local ids.
//!
//! Endpoint existence is not enforced here: the
//! [`Terrain`](crate::terrain::Terrain) checks it when an edge is added
//! through the normal API and re-validates lazily after bulk edits.

use serde::{Deserialize, Serialize};
use wayfarer_types::{LocationRef, RegionEdgeId, RegionId, TraversalContext};

use crate::error::WorldError;
use crate::link::Link;

/// A two-way link between locations that may belong to different regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEdge {
    id: RegionEdgeId,
    link: Link<LocationRef>,
}

impl RegionEdge {
    /// Create an unblocked region edge with no conditions.
    pub const fn new(
        id: RegionEdgeId,
        a: LocationRef,
        b: LocationRef,
        time_a_to_b: i32,
        time_b_to_a: i32,
    ) -> Self {
        Self {
            id,
            link: Link::new(a, b, time_a_to_b, time_b_to_a),
        }
    }

    /// Terrain-wide id.
    pub const fn id(&self) -> RegionEdgeId {
        self.id
    }

    /// The underlying two-way link (times, conditions, block flag).
    pub const fn link(&self) -> &Link<LocationRef> {
        &self.link
    }

    pub(crate) const fn link_mut(&mut self) -> &mut Link<LocationRef> {
        &mut self.link
    }

    /// First endpoint.
    pub const fn a(&self) -> LocationRef {
        self.link.a()
    }

    /// Second endpoint.
    pub const fn b(&self) -> LocationRef {
        self.link.b()
    }

    /// Whether either endpoint lies in `region`.
    pub fn connects_region(&self, region: RegionId) -> bool {
        self.a().region == region || self.b().region == region
    }

    /// The endpoint inside `region`, preferring `a` when both are.
    pub fn location_in_region(&self, region: RegionId) -> Option<LocationRef> {
        [self.a(), self.b()].into_iter().find(|l| l.region == region)
    }

    /// Whether both endpoints lie in the same region.
    pub fn is_intra_region(&self) -> bool {
        self.a().region == self.b().region
    }

    /// Whether `location` is one of the endpoints.
    pub fn connects(&self, location: LocationRef) -> bool {
        self.link.connects(location)
    }

    /// Whether the edge is severed in both directions.
    pub const fn is_blocked(&self) -> bool {
        self.link.is_blocked()
    }

    /// Signed travel time departing from `from`; `None` if not an endpoint.
    pub fn travel_time(&self, from: LocationRef) -> Option<i32> {
        self.link.travel_time(from)
    }

    /// Whether an actor at `from` may take this edge right now.
    pub fn can_traverse(&self, from: LocationRef, context: Option<&TraversalContext>) -> bool {
        self.link.can_traverse(from, context)
    }

    /// The endpoint opposite `from`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NotAnEndpoint`] if `from` is neither endpoint.
    pub fn other_endpoint(&self, from: LocationRef) -> Result<LocationRef, WorldError> {
        self.link.other_endpoint(from)
    }
}
