//! Minimum-time routing across the whole terrain.
//!
//! The search treats every region-local edge and every region edge as one
//! combined directed graph. Weights are always resolved from the node being
//! departed, so asymmetric and one-way links are handled exactly.
//!
//! Cost of a hop = directional travel time + dwell time of the node entered.
//! The goal's own dwell time is only charged under [`DwellPolicy::Always`];
//! the start's dwell time is never charged.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use wayfarer_types::{LocationRef, RegionEdgeId, TraversalContext};

use crate::error::WorldError;
use crate::terrain::Terrain;

/// When a node's dwell time counts toward the route cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DwellPolicy {
    /// Dwell is charged for intermediate nodes only, not on arrival at the goal.
    #[default]
    PassThrough,
    /// Dwell is charged for every node entered, the goal included.
    Always,
}

/// Tunables for a [`PathFinder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathfinderOptions {
    /// Dwell-time accounting.
    pub dwell_policy: DwellPolicy,
}

/// Which kind of link a hop used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    /// An edge inside one region.
    Edge,
    /// A region edge with this id.
    RegionEdge(RegionEdgeId),
}

/// One step of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathHop {
    /// Node departed.
    pub from: LocationRef,
    /// Node entered.
    pub to: LocationRef,
    /// Link taken.
    pub link: LinkKind,
    /// Directional travel time of the link, in minutes.
    pub travel_time: u32,
    /// Dwell time charged at `to`, in minutes.
    pub dwell_time: u32,
}

impl PathHop {
    /// Travel time plus dwell time, saturating.
    pub fn cost(&self) -> u64 {
        u64::from(self.travel_time).saturating_add(u64::from(self.dwell_time))
    }
}

/// Outcome of a route query. An unreachable goal is `found == false`, not
/// an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    /// Whether a route exists under the query's context.
    pub found: bool,
    /// Nodes from start to goal inclusive; empty when not found.
    pub path: Vec<LocationRef>,
    /// One entry per link taken; `hops.len() == path.len() - 1` when found.
    pub hops: Vec<PathHop>,
    /// Sum of every hop's cost.
    pub total_time: u64,
}

impl PathResult {
    /// The "no route" result.
    pub const fn not_found() -> Self {
        Self {
            found: false,
            path: Vec::new(),
            hops: Vec::new(),
            total_time: 0,
        }
    }

    fn trivial(at: LocationRef) -> Self {
        Self {
            found: true,
            path: vec![at],
            hops: Vec::new(),
            total_time: 0,
        }
    }
}

/// Uniform-cost search over a borrowed [`Terrain`].
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'a> {
    terrain: &'a Terrain,
    options: PathfinderOptions,
}

/// A candidate transition out of the node being expanded.
struct Step {
    to: LocationRef,
    link: LinkKind,
    time: u32,
}

impl<'a> PathFinder<'a> {
    /// Create a path finder with default options.
    pub fn new(terrain: &'a Terrain) -> Self {
        Self::with_options(terrain, PathfinderOptions::default())
    }

    /// Create a path finder with explicit options.
    pub const fn with_options(terrain: &'a Terrain, options: PathfinderOptions) -> Self {
        Self { terrain, options }
    }

    /// Options in effect.
    pub const fn options(&self) -> PathfinderOptions {
        self.options
    }

    /// Find the minimum-time route from `from` to `to` for an actor holding
    /// `context`.
    ///
    /// Among equal-cost routes the one discovered first wins: a node's
    /// recorded predecessor is only replaced by a strictly cheaper one, and
    /// equal-cost frontier entries pop in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LocationNotFound`] if either endpoint does not
    /// exist, or [`WorldError::ArithmeticOverflow`] if a route cost
    /// overflows.
    pub fn find_path(
        &self,
        from: LocationRef,
        to: LocationRef,
        context: &TraversalContext,
    ) -> Result<PathResult, WorldError> {
        for endpoint in [from, to] {
            if !self.terrain.contains_location(endpoint) {
                return Err(WorldError::LocationNotFound(endpoint));
            }
        }
        if from == to {
            return Ok(PathResult::trivial(from));
        }

        // Best known (cost, discovery sequence) per node.
        let mut best: BTreeMap<LocationRef, (u64, u64)> = BTreeMap::new();
        // Hop used to reach each node at its best cost.
        let mut prev: BTreeMap<LocationRef, PathHop> = BTreeMap::new();
        let mut queue: BTreeSet<(u64, u64, LocationRef)> = BTreeSet::new();
        let mut settled: BTreeSet<LocationRef> = BTreeSet::new();
        let mut sequence: u64 = 0;

        best.insert(from, (0, sequence));
        queue.insert((0, sequence, from));

        while let Some((cost, _, current)) = queue.pop_first() {
            if !settled.insert(current) {
                continue;
            }
            if current == to {
                let result = Self::reconstruct(from, to, &prev, cost);
                tracing::debug!(
                    %from, %to,
                    hops = result.hops.len(),
                    total_time = result.total_time,
                    "Route found"
                );
                return Ok(result);
            }
            tracing::trace!(node = %current, cost, "Expanding");

            for step in self.steps_from(current, context) {
                if settled.contains(&step.to) {
                    continue;
                }
                let Some(dwell_time) = self.dwell_on_entry(step.to, to) else {
                    continue;
                };
                let candidate = cost
                    .checked_add(u64::from(step.time))
                    .and_then(|c| c.checked_add(u64::from(dwell_time)))
                    .ok_or(WorldError::ArithmeticOverflow)?;

                let is_shorter = best
                    .get(&step.to)
                    .is_none_or(|&(existing, _)| candidate < existing);
                if is_shorter {
                    if let Some(&(old_cost, old_seq)) = best.get(&step.to) {
                        queue.remove(&(old_cost, old_seq, step.to));
                    }
                    sequence = sequence.saturating_add(1);
                    best.insert(step.to, (candidate, sequence));
                    prev.insert(
                        step.to,
                        PathHop {
                            from: current,
                            to: step.to,
                            link: step.link,
                            travel_time: step.time,
                            dwell_time,
                        },
                    );
                    queue.insert((candidate, sequence, step.to));
                }
            }
        }

        tracing::debug!(%from, %to, explored = settled.len(), "No route");
        Ok(PathResult::not_found())
    }

    /// Every link an actor at `node` can take right now: intra-region
    /// edges first, then region edges.
    fn steps_from(&self, node: LocationRef, context: &TraversalContext) -> Vec<Step> {
        let local = self
            .terrain
            .region(node.region)
            .map(|region| region.traversable_neighbors(node.local, Some(context)))
            .unwrap_or_default()
            .into_iter()
            .map(|n| Step {
                to: LocationRef::new(node.region, n.location),
                link: LinkKind::Edge,
                time: n.time,
            });
        let exits = self
            .terrain
            .region_exits(node, Some(context))
            .into_iter()
            .map(|exit| Step {
                to: exit.destination,
                link: LinkKind::RegionEdge(exit.edge.id()),
                time: exit.time,
            });
        local.chain(exits).collect()
    }

    /// Dwell charged on entering `node`; `None` if the node does not exist
    /// (a dangling region edge), which makes the link unusable.
    fn dwell_on_entry(&self, node: LocationRef, goal: LocationRef) -> Option<u32> {
        let dwell = self.terrain.location(node)?.dwell_time();
        if node == goal && self.options.dwell_policy == DwellPolicy::PassThrough {
            Some(0)
        } else {
            Some(dwell)
        }
    }

    fn reconstruct(
        from: LocationRef,
        to: LocationRef,
        prev: &BTreeMap<LocationRef, PathHop>,
        total_time: u64,
    ) -> PathResult {
        let mut hops = VecDeque::new();
        let mut current = to;
        while current != from {
            let Some(hop) = prev.get(&current) else {
                break;
            };
            hops.push_front(*hop);
            current = hop.from;
        }
        let path = std::iter::once(from).chain(hops.iter().map(|h| h.to)).collect();
        PathResult {
            found: true,
            path,
            hops: hops.into_iter().collect(),
            total_time,
        }
    }
}
