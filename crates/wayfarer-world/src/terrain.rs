//! The terrain: every region plus the region edges joining them.
//!
//! [`Terrain`] is the sole mutable owner of all graph state. Regions are
//! stored by id; region edges live in a flat list with a secondary index
//! `RegionId -> positions of edges touching that region`. The index is
//! extended on every insert and rebuilt on every removal, so it never goes
//! stale.
//!
//! Dirty tracking is aggregated here for the persistence layer: each region
//! carries its own changed flag, removed regions are remembered until the
//! next checkpoint, and a single flag covers the region-edge collection.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use wayfarer_types::{LocalId, LocationRef, RegionEdgeId, RegionId, TraversalContext};

use crate::error::WorldError;
use crate::link::{Edge, LinkMut};
use crate::location::LocationNode;
use crate::pathfinder::{PathFinder, PathResult};
use crate::region::Region;
use crate::region_edge::RegionEdge;
use crate::validation::{ValidationError, ValidationReport, ValidationWarning};

/// A region edge that can be taken from a given location right now.
#[derive(Debug, Clone, Copy)]
pub struct RegionExit<'a> {
    /// The edge taken.
    pub edge: &'a RegionEdge,
    /// The endpoint on the far side.
    pub destination: LocationRef,
    /// Directional travel time in minutes, resolved from the departing node.
    pub time: u32,
}

/// A region edge dropped by [`Terrain::validate_and_clean_region_edges`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedRegionEdge {
    /// The edge as it was stored.
    pub edge: RegionEdge,
    /// Why it was dropped.
    pub reason: ValidationError,
}

/// The whole navigable world.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(into = "TerrainRecord", try_from = "TerrainRecord")]
pub struct Terrain {
    regions: BTreeMap<RegionId, Region>,
    region_edges: Vec<RegionEdge>,
    region_edge_index: BTreeMap<RegionId, Vec<usize>>,
    next_region_edge_id: i32,
    removed_regions: BTreeSet<RegionId>,
    region_edges_changed: bool,
}

impl Terrain {
    /// Create an empty terrain.
    pub const fn new() -> Self {
        Self {
            regions: BTreeMap::new(),
            region_edges: Vec::new(),
            region_edge_index: BTreeMap::new(),
            next_region_edge_id: 0,
            removed_regions: BTreeSet::new(),
            region_edges_changed: false,
        }
    }

    // -------------------------------------------------------------------
    // Region operations
    // -------------------------------------------------------------------

    /// Add a region. The new region counts as changed.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateRegion`] if the id is taken.
    pub fn add_region(&mut self, mut region: Region) -> Result<(), WorldError> {
        let id = region.id();
        if self.regions.contains_key(&id) {
            return Err(WorldError::DuplicateRegion(id));
        }
        region.mark_changed();
        self.regions.insert(id, region);
        self.removed_regions.remove(&id);
        Ok(())
    }

    /// Return the region with this id, creating an empty one if missing.
    pub fn get_or_create_region(&mut self, id: RegionId) -> &mut Region {
        if !self.regions.contains_key(&id) {
            self.removed_regions.remove(&id);
        }
        self.regions.entry(id).or_insert_with(|| {
            let mut region = Region::new(id);
            region.mark_changed();
            region
        })
    }

    /// Remove a region and every region edge touching it.
    ///
    /// Returns the removed region, or `None` if it did not exist (in which
    /// case nothing changes).
    pub fn remove_region(&mut self, id: RegionId) -> Option<Region> {
        let region = self.regions.remove(&id)?;
        let before = self.region_edges.len();
        self.region_edges.retain(|edge| !edge.connects_region(id));
        let removed_edges = before.saturating_sub(self.region_edges.len());
        if removed_edges > 0 {
            self.region_edges_changed = true;
        }
        self.rebuild_region_edge_index();
        self.removed_regions.insert(id);
        tracing::debug!(region = %id, removed_edges, "Region removed");
        Some(region)
    }

    /// Look up a region.
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(&id)
    }

    /// Mutable access to a region. The region tracks its own changes.
    pub fn region_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.get_mut(&id)
    }

    /// Number of regions.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// All region ids in ascending order.
    pub fn region_ids(&self) -> Vec<RegionId> {
        self.regions.keys().copied().collect()
    }

    /// Iterate over all regions in id order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    // -------------------------------------------------------------------
    // Global lookup
    // -------------------------------------------------------------------

    /// Look up a location by its global address.
    pub fn location(&self, location: LocationRef) -> Option<&LocationNode> {
        self.regions.get(&location.region)?.location(location.local)
    }

    /// Whether the region exists and contains the location.
    pub fn contains_location(&self, location: LocationRef) -> bool {
        self.location(location).is_some()
    }

    /// The intra-region edge between two locations of one region.
    pub fn edge_between(&self, region: RegionId, a: LocalId, b: LocalId) -> Option<&Edge> {
        self.regions.get(&region)?.edge_between(a, b)
    }

    // -------------------------------------------------------------------
    // Region edge operations
    // -------------------------------------------------------------------

    /// Number of region edges.
    pub fn region_edge_count(&self) -> usize {
        self.region_edges.len()
    }

    /// Every region edge in insertion order.
    pub fn region_edges(&self) -> &[RegionEdge] {
        &self.region_edges
    }

    /// Look up a region edge by id.
    pub fn region_edge(&self, id: RegionEdgeId) -> Option<&RegionEdge> {
        self.region_edges.iter().find(|edge| edge.id() == id)
    }

    /// Mutable, dirty-tracking access to a region edge.
    pub fn region_edge_mut(&mut self, id: RegionEdgeId) -> Option<LinkMut<'_, LocationRef>> {
        let edge = self.region_edges.iter_mut().find(|edge| edge.id() == id)?;
        Some(LinkMut::new(edge.link_mut(), &mut self.region_edges_changed))
    }

    /// The id the next auto-assigned region edge will get.
    pub const fn next_region_edge_id(&self) -> RegionEdgeId {
        RegionEdgeId(self.next_region_edge_id)
    }

    /// Add a region edge after checking both endpoints exist.
    ///
    /// With `id = None` the next free id is assigned from a counter that
    /// only ever moves forward (seeded past the highest id ever inserted).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] or
    /// [`WorldError::LocationNotFound`] for a missing endpoint,
    /// [`WorldError::SelfLoop`] if both endpoints are the same location,
    /// [`WorldError::DuplicateRegionEdge`] if an explicit id is taken, or
    /// [`WorldError::ArithmeticOverflow`] if the id counter is exhausted.
    pub fn add_region_edge(
        &mut self,
        id: Option<RegionEdgeId>,
        a: LocationRef,
        b: LocationRef,
        time_a_to_b: i32,
        time_b_to_a: i32,
    ) -> Result<RegionEdgeId, WorldError> {
        self.require_location(a)?;
        self.require_location(b)?;
        if a == b {
            return Err(WorldError::SelfLoop(a));
        }
        let id = match id {
            Some(explicit) => {
                if self.region_edge(explicit).is_some() {
                    return Err(WorldError::DuplicateRegionEdge(explicit));
                }
                explicit
            }
            None => RegionEdgeId(self.next_region_edge_id),
        };
        self.push_region_edge(RegionEdge::new(id, a, b, time_a_to_b, time_b_to_a))?;
        tracing::debug!(edge = %id, %a, %b, time_a_to_b, time_b_to_a, "Region edge added");
        Ok(id)
    }

    /// Add a region edge with the same time in both directions and an
    /// auto-assigned id.
    ///
    /// # Errors
    ///
    /// Same as [`add_region_edge`](Self::add_region_edge).
    pub fn connect(
        &mut self,
        a: LocationRef,
        b: LocationRef,
        time: i32,
    ) -> Result<RegionEdgeId, WorldError> {
        self.add_region_edge(None, a, b, time, time)
    }

    /// Insert a region edge exactly as given, without endpoint or id checks.
    ///
    /// Used to restore persisted state where regions and edges arrive in no
    /// particular order. Run [`validate_all_ids`](Self::validate_all_ids) or
    /// [`validate_and_clean_region_edges`](Self::validate_and_clean_region_edges)
    /// once loading is complete.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if the id counter is exhausted.
    pub fn load_region_edge(&mut self, edge: RegionEdge) -> Result<(), WorldError> {
        self.push_region_edge(edge)
    }

    /// Remove a region edge by id. Returns `None` if no edge has that id.
    pub fn remove_region_edge(&mut self, id: RegionEdgeId) -> Option<RegionEdge> {
        let position = self.region_edges.iter().position(|edge| edge.id() == id)?;
        let edge = self.region_edges.remove(position);
        self.rebuild_region_edge_index();
        self.region_edges_changed = true;
        tracing::debug!(edge = %id, "Region edge removed");
        Some(edge)
    }

    /// Every region edge with at least one endpoint in `region`.
    pub fn region_edges_of(&self, region: RegionId) -> Vec<&RegionEdge> {
        self.region_edge_index
            .get(&region)
            .map(|positions| {
                positions
                    .iter()
                    .filter_map(|p| self.region_edges.get(*p))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every region edge anchored at `location`, regardless of traversability.
    pub fn region_edges_from(&self, location: LocationRef) -> Vec<&RegionEdge> {
        self.region_edges_of(location.region)
            .into_iter()
            .filter(|edge| edge.connects(location))
            .collect()
    }

    /// Region edges anchored at `from` that `context` can take right now.
    pub fn region_exits(
        &self,
        from: LocationRef,
        context: Option<&TraversalContext>,
    ) -> Vec<RegionExit<'_>> {
        self.region_edges_from(from)
            .into_iter()
            .filter_map(|edge| {
                let time = edge.link().traversal_time(from, context)?;
                let destination = edge.other_endpoint(from).ok()?;
                Some(RegionExit {
                    edge,
                    destination,
                    time,
                })
            })
            .collect()
    }

    fn require_location(&self, location: LocationRef) -> Result<(), WorldError> {
        let region = self
            .regions
            .get(&location.region)
            .ok_or(WorldError::RegionNotFound(location.region))?;
        if region.contains_location(location.local) {
            Ok(())
        } else {
            Err(WorldError::LocationNotFound(location))
        }
    }

    fn push_region_edge(&mut self, edge: RegionEdge) -> Result<(), WorldError> {
        let following = edge
            .id()
            .into_inner()
            .checked_add(1)
            .ok_or(WorldError::ArithmeticOverflow)?;
        self.next_region_edge_id = self.next_region_edge_id.max(following);

        let position = self.region_edges.len();
        self.index_region_edge(&edge, position);
        self.region_edges.push(edge);
        self.region_edges_changed = true;
        Ok(())
    }

    fn index_region_edge(&mut self, edge: &RegionEdge, position: usize) {
        let (ra, rb) = (edge.a().region, edge.b().region);
        self.region_edge_index.entry(ra).or_default().push(position);
        if rb != ra {
            self.region_edge_index.entry(rb).or_default().push(position);
        }
    }

    fn rebuild_region_edge_index(&mut self) {
        self.region_edge_index.clear();
        let edges = std::mem::take(&mut self.region_edges);
        for (position, edge) in edges.iter().enumerate() {
            self.index_region_edge(edge, position);
        }
        self.region_edges = edges;
    }

    // -------------------------------------------------------------------
    // Pathfinding
    // -------------------------------------------------------------------

    /// Minimum-time route with default [`PathfinderOptions`](crate::pathfinder::PathfinderOptions).
    ///
    /// # Errors
    ///
    /// See [`PathFinder::find_path`].
    pub fn find_path(
        &self,
        from: LocationRef,
        to: LocationRef,
        context: &TraversalContext,
    ) -> Result<PathResult, WorldError> {
        PathFinder::new(self).find_path(from, to, context)
    }

    // -------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------

    /// Whether anything in the terrain changed since the last checkpoint.
    pub fn is_changed(&self) -> bool {
        self.region_edges_changed
            || !self.removed_regions.is_empty()
            || self.regions.values().any(Region::is_changed)
    }

    /// Regions needing re-serialization: changed ones plus removed ones.
    pub fn changed_regions(&self) -> BTreeSet<RegionId> {
        self.regions
            .values()
            .filter(|region| region.is_changed())
            .map(Region::id)
            .chain(self.removed_regions.iter().copied())
            .collect()
    }

    /// Regions removed since the last checkpoint.
    pub const fn removed_regions(&self) -> &BTreeSet<RegionId> {
        &self.removed_regions
    }

    /// Whether any region edge was added, removed, or edited.
    pub const fn region_edges_changed(&self) -> bool {
        self.region_edges_changed
    }

    /// Clear every changed flag after a full checkpoint.
    pub fn clear_changed_flags(&mut self) {
        for region in self.regions.values_mut() {
            region.clear_changed_flag();
        }
        self.removed_regions.clear();
        self.region_edges_changed = false;
    }

    /// Clear the changed state of one region after saving it alone.
    pub fn clear_region_changed(&mut self, id: RegionId) {
        if let Some(region) = self.regions.get_mut(&id) {
            region.clear_changed_flag();
        }
        self.removed_regions.remove(&id);
    }

    /// Clear the region-edge changed flag after saving the edge collection.
    pub const fn clear_region_edges_changed(&mut self) {
        self.region_edges_changed = false;
    }

    // -------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------

    /// Check that every region is stored under its own id.
    pub fn validate_region_ids(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        for (key, region) in &self.regions {
            if region.id() != *key {
                report.push_error(ValidationError::RegionKeyMismatch {
                    key: *key,
                    recorded: region.id(),
                });
            }
        }
        report
    }

    /// Report every region edge id used more than once (one error per id).
    pub fn validate_region_edge_ids(&self) -> ValidationReport {
        let mut counts: BTreeMap<RegionEdgeId, usize> = BTreeMap::new();
        for edge in &self.region_edges {
            let count = counts.entry(edge.id()).or_insert(0);
            *count = count.saturating_add(1);
        }
        let mut report = ValidationReport::new();
        for (id, count) in counts {
            if count > 1 {
                report.push_error(ValidationError::DuplicateRegionEdgeId { id, count });
            }
        }
        report
    }

    /// Report every region edge endpoint that names a missing region or
    /// location.
    pub fn validate_region_edge_references(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        for edge in &self.region_edges {
            if let Some(problem) = self.dangling_reference(edge) {
                report.push_error(problem);
            }
        }
        report
    }

    /// First dangling endpoint of `edge`, if any.
    fn dangling_reference(&self, edge: &RegionEdge) -> Option<ValidationError> {
        [edge.a(), edge.b()].into_iter().find_map(|endpoint| {
            match self.regions.get(&endpoint.region) {
                None => Some(ValidationError::MissingRegion {
                    edge: edge.id(),
                    region: endpoint.region,
                }),
                Some(region) if !region.contains_location(endpoint.local) => {
                    Some(ValidationError::MissingLocation {
                        edge: edge.id(),
                        location: endpoint,
                    })
                }
                Some(_) => None,
            }
        })
    }

    /// Remove every region edge whose region or location no longer exists.
    ///
    /// Run after bulk structural edits so dangling cross-region references
    /// never reach pathfinding. Returns what was removed and why.
    pub fn validate_and_clean_region_edges(&mut self) -> Vec<RemovedRegionEdge> {
        let edges = std::mem::take(&mut self.region_edges);
        let mut kept = Vec::with_capacity(edges.len());
        let mut removed = Vec::new();
        for edge in edges {
            match self.dangling_reference(&edge) {
                Some(reason) => {
                    tracing::warn!(edge = %edge.id(), %reason, "Removing dangling region edge");
                    removed.push(RemovedRegionEdge { edge, reason });
                }
                None => kept.push(edge),
            }
        }
        self.region_edges = kept;
        if !removed.is_empty() {
            self.region_edges_changed = true;
        }
        self.rebuild_region_edge_index();
        removed
    }

    /// Run every id and reference check and merge the results.
    ///
    /// With `check_empty_slots`, each region with unused ids below its
    /// highest id also gets an [`ValidationWarning::EmptyLocationSlots`]
    /// warning listing them.
    pub fn validate_all_ids(&self, check_empty_slots: bool) -> ValidationReport {
        let mut report = self.validate_region_ids();
        for region in self.regions.values() {
            report.merge(region.validate_location_ids());
            if check_empty_slots {
                let slots = region.find_empty_location_ids(None);
                if !slots.is_empty() {
                    report.push_warning(ValidationWarning::EmptyLocationSlots {
                        region: region.id(),
                        slots,
                    });
                }
            }
        }
        report.merge(self.validate_region_edge_ids());
        report.merge(self.validate_region_edge_references());
        report
    }
}

/// Flat on-disk shape of a terrain. Loading rejects duplicate region ids;
/// region edges are kept as stored and audited by the validation passes.
#[derive(Serialize, Deserialize)]
struct TerrainRecord {
    regions: Vec<Region>,
    region_edges: Vec<RegionEdge>,
    next_region_edge_id: i32,
}

impl From<Terrain> for TerrainRecord {
    fn from(terrain: Terrain) -> Self {
        Self {
            regions: terrain.regions.into_values().collect(),
            region_edges: terrain.region_edges,
            next_region_edge_id: terrain.next_region_edge_id,
        }
    }
}

impl TryFrom<TerrainRecord> for Terrain {
    type Error = WorldError;

    fn try_from(record: TerrainRecord) -> Result<Self, Self::Error> {
        let mut terrain = Self::new();
        for region in record.regions {
            let id = region.id();
            if terrain.regions.insert(id, region).is_some() {
                return Err(WorldError::DuplicateRegion(id));
            }
        }
        terrain.region_edges = record.region_edges;
        terrain.rebuild_region_edge_index();
        let highest = terrain
            .region_edges
            .iter()
            .filter_map(|edge| edge.id().into_inner().checked_add(1))
            .max()
            .unwrap_or(0);
        terrain.next_region_edge_id = record.next_region_edge_id.max(highest);
        Ok(terrain)
    }
}

#[cfg(test)]
mod tests {
    use wayfarer_types::Direction;

    use super::*;

    /// Two regions of three nodes each, joined 1:2 <-> 2:0.
    fn two_region_terrain() -> Terrain {
        let mut terrain = Terrain::new();
        for id in [1, 2] {
            let region = terrain.get_or_create_region(RegionId(id));
            let _ = region.add_edge(LocalId(0), LocalId(1), 5);
            let _ = region.add_edge(LocalId(1), LocalId(2), 5);
        }
        let _ = terrain.connect(LocationRef::of(1, 2), LocationRef::of(2, 0), 10);
        terrain.clear_changed_flags();
        terrain
    }

    #[test]
    fn add_region_rejects_duplicates() {
        let mut terrain = Terrain::new();
        assert!(terrain.add_region(Region::new(RegionId(1))).is_ok());
        assert!(matches!(
            terrain.add_region(Region::new(RegionId(1))),
            Err(WorldError::DuplicateRegion(_))
        ));
    }

    #[test]
    fn global_location_lookup() {
        let terrain = two_region_terrain();
        assert!(terrain.contains_location(LocationRef::of(2, 2)));
        assert!(!terrain.contains_location(LocationRef::of(2, 7)));
        assert!(!terrain.contains_location(LocationRef::of(5, 0)));
        assert!(terrain.edge_between(RegionId(1), LocalId(1), LocalId(0)).is_some());
    }

    #[test]
    fn add_region_edge_validates_endpoints() {
        let mut terrain = two_region_terrain();
        let missing_region =
            terrain.add_region_edge(None, LocationRef::of(1, 0), LocationRef::of(9, 0), 3, 3);
        assert!(matches!(missing_region, Err(WorldError::RegionNotFound(_))));

        let missing_location =
            terrain.add_region_edge(None, LocationRef::of(1, 0), LocationRef::of(2, 9), 3, 3);
        assert!(matches!(missing_location, Err(WorldError::LocationNotFound(_))));
        assert_eq!(terrain.region_edge_count(), 1);
    }

    #[test]
    fn auto_ids_advance_past_explicit_ids() {
        let mut terrain = two_region_terrain();
        let explicit = terrain.add_region_edge(
            Some(RegionEdgeId(40)),
            LocationRef::of(1, 0),
            LocationRef::of(2, 2),
            3,
            3,
        );
        assert_eq!(explicit.ok(), Some(RegionEdgeId(40)));
        let auto = terrain.connect(LocationRef::of(1, 1), LocationRef::of(2, 1), 3);
        assert_eq!(auto.ok(), Some(RegionEdgeId(41)));
    }

    #[test]
    fn counter_never_moves_backwards() {
        let mut terrain = two_region_terrain();
        let _ = terrain.add_region_edge(
            Some(RegionEdgeId(10)),
            LocationRef::of(1, 0),
            LocationRef::of(2, 2),
            3,
            3,
        );
        let _ = terrain.remove_region_edge(RegionEdgeId(10));
        assert_eq!(terrain.next_region_edge_id(), RegionEdgeId(11));
    }

    #[test]
    fn explicit_duplicate_id_rejected() {
        let mut terrain = two_region_terrain();
        let result = terrain.add_region_edge(
            Some(RegionEdgeId(0)),
            LocationRef::of(1, 0),
            LocationRef::of(2, 2),
            3,
            3,
        );
        assert!(matches!(result, Err(WorldError::DuplicateRegionEdge(_))));
    }

    #[test]
    fn index_lists_edges_for_both_regions() {
        let terrain = two_region_terrain();
        assert_eq!(terrain.region_edges_of(RegionId(1)).len(), 1);
        assert_eq!(terrain.region_edges_of(RegionId(2)).len(), 1);
        assert_eq!(terrain.region_edges_from(LocationRef::of(1, 2)).len(), 1);
        assert!(terrain.region_edges_from(LocationRef::of(1, 0)).is_empty());
    }

    #[test]
    fn remove_region_cascades_region_edges() {
        let mut terrain = two_region_terrain();
        let removed = terrain.remove_region(RegionId(2));
        assert!(removed.is_some());
        assert_eq!(terrain.region_edge_count(), 0);
        assert!(terrain.region_edges_of(RegionId(2)).is_empty());
        assert!(terrain.region_edges_of(RegionId(1)).is_empty());
        assert!(terrain.region_edges_changed());
        assert!(terrain.changed_regions().contains(&RegionId(2)));
    }

    #[test]
    fn region_exits_filter_by_context() {
        let mut terrain = two_region_terrain();
        if let Some(mut edge) = terrain.region_edge_mut(RegionEdgeId(0)) {
            edge.add_condition(Direction::AToB, "visa", 1);
        }
        let from = LocationRef::of(1, 2);
        let without = TraversalContext::new();
        let with = TraversalContext::new().with_tag("visa", 1);
        assert!(terrain.region_exits(from, Some(&without)).is_empty());
        let exits = terrain.region_exits(from, Some(&with));
        assert_eq!(exits.len(), 1);
        assert_eq!(exits.first().map(|e| e.destination), Some(LocationRef::of(2, 0)));
        assert_eq!(exits.first().map(|e| e.time), Some(10));
        // The reverse direction carries no condition.
        assert_eq!(terrain.region_exits(LocationRef::of(2, 0), None).len(), 1);
    }

    #[test]
    fn dirty_tracking_aggregates_regions_and_edges() {
        let mut terrain = two_region_terrain();
        assert!(!terrain.is_changed());

        if let Some(region) = terrain.region_mut(RegionId(1)) {
            let _ = region.remove_edge(LocalId(0), LocalId(1));
        }
        assert!(terrain.is_changed());
        assert_eq!(terrain.changed_regions().into_iter().collect::<Vec<_>>(), vec![RegionId(1)]);
        assert!(!terrain.region_edges_changed());

        if let Some(mut edge) = terrain.region_edge_mut(RegionEdgeId(0)) {
            edge.set_blocked(true);
        }
        assert!(terrain.region_edges_changed());

        terrain.clear_changed_flags();
        assert!(!terrain.is_changed());
    }

    #[test]
    fn clear_single_region() {
        let mut terrain = two_region_terrain();
        if let Some(region) = terrain.region_mut(RegionId(1)) {
            region.set_name("Renamed");
        }
        if let Some(region) = terrain.region_mut(RegionId(2)) {
            region.set_name("Also renamed");
        }
        terrain.clear_region_changed(RegionId(1));
        assert_eq!(terrain.changed_regions().into_iter().collect::<Vec<_>>(), vec![RegionId(2)]);
    }

    #[test]
    fn loaded_duplicate_ids_surface_once() {
        let mut terrain = two_region_terrain();
        let _ = terrain.load_region_edge(RegionEdge::new(
            RegionEdgeId(0),
            LocationRef::of(1, 0),
            LocationRef::of(2, 1),
            4,
            4,
        ));
        let report = terrain.validate_region_edge_ids();
        assert_eq!(report.errors().len(), 1);
        assert!(matches!(
            report.errors().first(),
            Some(ValidationError::DuplicateRegionEdgeId { count: 2, .. })
        ));
    }

    #[test]
    fn dangling_region_reported_once() {
        let mut terrain = two_region_terrain();
        let _ = terrain.load_region_edge(RegionEdge::new(
            RegionEdgeId(7),
            LocationRef::of(1, 0),
            LocationRef::of(9, 0),
            4,
            4,
        ));
        let report = terrain.validate_region_edge_references();
        assert_eq!(report.errors().len(), 1);
        assert!(matches!(
            report.errors().first(),
            Some(ValidationError::MissingRegion { region, .. }) if *region == RegionId(9)
        ));
    }

    #[test]
    fn clean_pass_removes_dangling_edges() {
        let mut terrain = two_region_terrain();
        let _ = terrain.load_region_edge(RegionEdge::new(
            RegionEdgeId(7),
            LocationRef::of(1, 0),
            LocationRef::of(2, 9),
            4,
            4,
        ));
        terrain.clear_changed_flags();

        let removed = terrain.validate_and_clean_region_edges();
        assert_eq!(removed.len(), 1);
        assert!(matches!(
            removed.first().map(|r| &r.reason),
            Some(ValidationError::MissingLocation { .. })
        ));
        assert_eq!(terrain.region_edge_count(), 1);
        assert!(terrain.region_edge(RegionEdgeId(0)).is_some());
        assert!(terrain.region_edges_changed());
        assert!(terrain.validate_region_edge_references().errors().is_empty());
    }

    #[test]
    fn validate_all_ids_optionally_lists_empty_slots() {
        let mut terrain = two_region_terrain();
        if let Some(region) = terrain.region_mut(RegionId(1)) {
            let _ = region.add_location(LocalId(5), "Far", false);
        }
        let basic = terrain.validate_all_ids(false);
        assert!(basic.errors().is_empty());
        assert!(basic.warnings().iter().any(|w| matches!(
            w,
            ValidationWarning::LocationIdGaps { missing: 2, .. }
        )));
        assert!(
            !basic
                .warnings()
                .iter()
                .any(|w| matches!(w, ValidationWarning::EmptyLocationSlots { .. }))
        );

        let detailed = terrain.validate_all_ids(true);
        assert!(detailed.warnings().iter().any(|w| matches!(
            w,
            ValidationWarning::EmptyLocationSlots { slots, .. } if *slots == vec![LocalId(3), LocalId(4)]
        )));
    }

    #[test]
    fn serde_roundtrip_keeps_ids_and_counter() {
        let mut terrain = two_region_terrain();
        let _ = terrain.add_region_edge(
            Some(RegionEdgeId(20)),
            LocationRef::of(1, 0),
            LocationRef::of(2, 2),
            3,
            -1,
        );
        let json = serde_json::to_string(&terrain).unwrap_or_default();
        let restored: Option<Terrain> = serde_json::from_str(&json).ok();
        assert!(restored.is_some());
        if let Some(restored) = restored {
            assert_eq!(restored.region_count(), 2);
            assert_eq!(restored.region_edges_of(RegionId(2)).len(), 2);
            assert_eq!(restored.next_region_edge_id(), RegionEdgeId(21));
            assert!(!restored.is_changed());
        }
    }

    #[test]
    fn load_rejects_duplicate_region() {
        let mut json = serde_json::to_value(two_region_terrain()).unwrap_or_default();
        if let Some(regions) = json
            .get_mut("regions")
            .and_then(serde_json::Value::as_array_mut)
            && let Some(mut copy) = regions.first().cloned()
        {
            if let Some(fields) = copy.as_object_mut() {
                fields.insert("name".to_owned(), "B".into());
                fields.insert("locations".to_owned(), serde_json::Value::Array(Vec::new()));
                fields.insert("edges".to_owned(), serde_json::Value::Array(Vec::new()));
            }
            regions.push(copy);
        }
        let result = serde_json::from_value::<Terrain>(json);
        assert!(result.is_err_and(|e| e.to_string().contains("duplicate region id: 1")));
    }
}
