//! Regions: local graphs of location nodes joined by two-way edges.
//!
//! A [`Region`] owns its [`LocationNode`]s and [`Edge`]s. Internally it keeps
//! three indexes in sync:
//!
//! - `locations`: `BTreeMap<LocalId, LocationNode>`
//! - `edges`: one [`Edge`] per unordered endpoint pair, keyed by the pair
//!   normalized to `(min, max)`
//! - `adjacency`: `BTreeMap<LocalId, Vec<LocalId>>`, one entry per existing
//!   location (possibly empty), listing neighbors in edge-insertion order
//!
//! Every edge appears in the adjacency lists of both of its endpoints.
//!
//! Any mutation of observable state sets the region's `changed` flag. The
//! persistence layer reads it through [`Region::is_changed`] and resets it
//! with [`Region::clear_changed_flag`] after a checkpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wayfarer_types::{LocalId, LocationRef, RegionId, TraversalContext};

use crate::error::WorldError;
use crate::link::{Edge, LinkMut};
use crate::location::{LocationMut, LocationNode};
use crate::validation::{ValidationError, ValidationReport, ValidationWarning};

type EdgeKey = (LocalId, LocalId);

const fn edge_key(a: LocalId, b: LocalId) -> EdgeKey {
    if a.0 <= b.0 { (a, b) } else { (b, a) }
}

/// A neighbor reachable from a location right now, as seen by one actor.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'a> {
    /// The location on the far side of the edge.
    pub location: LocalId,
    /// The edge taken.
    pub edge: &'a Edge,
    /// Directional travel time in minutes, resolved from the departing node.
    pub time: u32,
}

/// A bounded area holding location nodes and the edges between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "RegionRecord", try_from = "RegionRecord")]
pub struct Region {
    id: RegionId,
    name: String,
    locations: BTreeMap<LocalId, LocationNode>,
    edges: BTreeMap<EdgeKey, Edge>,
    adjacency: BTreeMap<LocalId, Vec<LocalId>>,
    changed: bool,
}

impl Region {
    /// Create an empty region.
    pub const fn new(id: RegionId) -> Self {
        Self {
            id,
            name: String::new(),
            locations: BTreeMap::new(),
            edges: BTreeMap::new(),
            adjacency: BTreeMap::new(),
            changed: false,
        }
    }

    /// Builder-style setter for the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Region id.
    pub const fn id(&self) -> RegionId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the region.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.name != name {
            self.name = name;
            self.changed = true;
        }
    }

    // -------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------

    /// Whether anything changed since the last checkpoint.
    pub const fn is_changed(&self) -> bool {
        self.changed
    }

    /// Reset the changed flag after the region has been persisted.
    pub const fn clear_changed_flag(&mut self) {
        self.changed = false;
    }

    pub(crate) const fn mark_changed(&mut self) {
        self.changed = true;
    }

    // -------------------------------------------------------------------
    // Location operations
    // -------------------------------------------------------------------

    /// Number of locations.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// All location ids in ascending order.
    pub fn location_ids(&self) -> Vec<LocalId> {
        self.locations.keys().copied().collect()
    }

    /// Iterate over all locations in id order.
    pub fn locations(&self) -> impl Iterator<Item = &LocationNode> {
        self.locations.values()
    }

    /// Whether a location with this id exists.
    pub fn contains_location(&self, local: LocalId) -> bool {
        self.locations.contains_key(&local)
    }

    /// Look up a location.
    pub fn location(&self, local: LocalId) -> Option<&LocationNode> {
        self.locations.get(&local)
    }

    /// Mutable, dirty-tracking access to a location.
    pub fn location_mut(&mut self, local: LocalId) -> Option<LocationMut<'_>> {
        let node = self.locations.get_mut(&local)?;
        Some(LocationMut::new(node, &mut self.changed))
    }

    /// Add a location with the given id and name.
    ///
    /// If the id is already taken, the existing node is returned unchanged,
    /// unless `throw_on_duplicate` is set.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NegativeLocalId`] for ids below zero, or
    /// [`WorldError::DuplicateLocation`] if the id exists and
    /// `throw_on_duplicate` is set.
    pub fn add_location(
        &mut self,
        local: LocalId,
        name: impl Into<String>,
        throw_on_duplicate: bool,
    ) -> Result<LocationMut<'_>, WorldError> {
        let node = LocationNode::new(self.id, local, name);
        self.insert_location(node, throw_on_duplicate)
    }

    /// Add a pre-built location node.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionMismatch`] if the node belongs to another
    /// region, plus the errors of [`add_location`](Self::add_location).
    pub fn insert_location(
        &mut self,
        node: LocationNode,
        throw_on_duplicate: bool,
    ) -> Result<LocationMut<'_>, WorldError> {
        if node.region() != self.id {
            return Err(WorldError::RegionMismatch {
                expected: self.id,
                found: node.region(),
            });
        }
        let local = node.local_id();
        if local.is_negative() {
            return Err(WorldError::NegativeLocalId {
                region: self.id,
                local,
            });
        }
        if self.locations.contains_key(&local) {
            if throw_on_duplicate {
                return Err(WorldError::DuplicateLocation(LocationRef::new(self.id, local)));
            }
        } else {
            self.adjacency.entry(local).or_default();
            self.changed = true;
        }
        let stored = self.locations.entry(local).or_insert(node);
        Ok(LocationMut::new(stored, &mut self.changed))
    }

    /// Return the location with this id, creating it with a default name if
    /// it does not exist yet.
    ///
    /// Edge creation relies on this to materialize missing endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NegativeLocalId`] for ids below zero.
    pub fn get_or_create_location(&mut self, local: LocalId) -> Result<LocationMut<'_>, WorldError> {
        self.add_location(local, format!("Location {local}"), false)
    }

    // -------------------------------------------------------------------
    // Edge operations
    // -------------------------------------------------------------------

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterate over all edges, ordered by their normalized endpoint pair.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// The edge between two locations, in either orientation.
    pub fn edge_between(&self, a: LocalId, b: LocalId) -> Option<&Edge> {
        self.edges.get(&edge_key(a, b))
    }

    /// Mutable, dirty-tracking access to the edge between two locations.
    pub fn edge_mut(&mut self, a: LocalId, b: LocalId) -> Option<LinkMut<'_, LocalId>> {
        let edge = self.edges.get_mut(&edge_key(a, b))?;
        Some(LinkMut::new(edge, &mut self.changed))
    }

    /// Every edge touching `local`, in insertion order.
    pub fn edges_of(&self, local: LocalId) -> Vec<&Edge> {
        self.adjacency
            .get(&local)
            .map(|neighbors| {
                neighbors
                    .iter()
                    .filter_map(|n| self.edges.get(&edge_key(local, *n)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Connect two locations with the same travel time in both directions.
    ///
    /// See [`add_directed_edge`](Self::add_directed_edge).
    ///
    /// # Errors
    ///
    /// Same as [`add_directed_edge`](Self::add_directed_edge).
    pub fn add_edge(
        &mut self,
        a: LocalId,
        b: LocalId,
        time: i32,
    ) -> Result<LinkMut<'_, LocalId>, WorldError> {
        self.add_directed_edge(a, b, time, time)
    }

    /// Connect two locations with independent per-direction travel times.
    ///
    /// Missing endpoints are created through
    /// [`get_or_create_location`](Self::get_or_create_location). At most one
    /// edge may exist per unordered pair: remove the old one first to
    /// replace it.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::SelfLoop`] if `a == b`,
    /// [`WorldError::EdgeExists`] if the pair is already connected, or
    /// [`WorldError::NegativeLocalId`] for a negative endpoint id.
    pub fn add_directed_edge(
        &mut self,
        a: LocalId,
        b: LocalId,
        time_a_to_b: i32,
        time_b_to_a: i32,
    ) -> Result<LinkMut<'_, LocalId>, WorldError> {
        if a == b {
            return Err(WorldError::SelfLoop(LocationRef::new(self.id, a)));
        }
        if let Some(local) = [a, b].into_iter().find(|id| id.is_negative()) {
            return Err(WorldError::NegativeLocalId {
                region: self.id,
                local,
            });
        }
        let key = edge_key(a, b);
        if self.edges.contains_key(&key) {
            return Err(WorldError::EdgeExists {
                region: self.id,
                a,
                b,
            });
        }
        self.get_or_create_location(a)?;
        self.get_or_create_location(b)?;

        self.adjacency.entry(a).or_default().push(b);
        self.adjacency.entry(b).or_default().push(a);
        self.changed = true;
        tracing::debug!(region = %self.id, %a, %b, time_a_to_b, time_b_to_a, "Edge added");

        let edge = self
            .edges
            .entry(key)
            .or_insert_with(|| Edge::new(a, b, time_a_to_b, time_b_to_a));
        Ok(LinkMut::new(edge, &mut self.changed))
    }

    /// Remove the edge between two locations.
    ///
    /// Returns `None` (not an error) if the pair is not connected.
    pub fn remove_edge(&mut self, a: LocalId, b: LocalId) -> Option<Edge> {
        let edge = self.edges.remove(&edge_key(a, b))?;
        if let Some(list) = self.adjacency.get_mut(&a) {
            list.retain(|n| *n != b);
        }
        if let Some(list) = self.adjacency.get_mut(&b) {
            list.retain(|n| *n != a);
        }
        self.changed = true;
        tracing::debug!(region = %self.id, %a, %b, "Edge removed");
        Some(edge)
    }

    /// Remove every location and edge.
    pub fn clear(&mut self) {
        if self.locations.is_empty() && self.edges.is_empty() {
            return;
        }
        self.locations.clear();
        self.edges.clear();
        self.adjacency.clear();
        self.changed = true;
    }

    // -------------------------------------------------------------------
    // Graph queries
    // -------------------------------------------------------------------

    /// Every location connected to `local` by any edge, regardless of
    /// whether the edge can currently be traversed.
    ///
    /// Intended for authoring tools; pathfinding uses
    /// [`traversable_neighbors`](Self::traversable_neighbors).
    pub fn neighbors(&self, local: LocalId) -> Vec<LocalId> {
        self.adjacency.get(&local).cloned().unwrap_or_default()
    }

    /// Neighbors reachable from `local` under `context`, with the
    /// directional travel time of each edge.
    pub fn traversable_neighbors(
        &self,
        local: LocalId,
        context: Option<&TraversalContext>,
    ) -> Vec<Neighbor<'_>> {
        let Some(neighbors) = self.adjacency.get(&local) else {
            return Vec::new();
        };
        neighbors
            .iter()
            .filter_map(|n| {
                let edge = self.edges.get(&edge_key(local, *n))?;
                let time = edge.traversal_time(local, context)?;
                Some(Neighbor {
                    location: *n,
                    edge,
                    time,
                })
            })
            .collect()
    }

    // -------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------

    /// Advisory id audit for authoring tools.
    ///
    /// Errors: a stored node whose recorded id differs from its key, or a
    /// negative id that slipped in through deserialization. Warnings: ids
    /// that do not start at zero, and gaps in the `0..=max` range. Sparse
    /// ids are legal; the warnings only point at reusable slots.
    pub fn validate_location_ids(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        for (key, node) in &self.locations {
            if node.local_id() != *key || node.region() != self.id {
                report.push_error(ValidationError::LocationKeyMismatch {
                    region: self.id,
                    key: *key,
                    recorded: node.location_ref(),
                });
            }
            if key.is_negative() {
                report.push_error(ValidationError::NegativeLocationId {
                    region: self.id,
                    local: *key,
                });
            }
        }

        let Some(first) = self.locations.keys().copied().find(|id| !id.is_negative()) else {
            return report;
        };
        if first.0 != 0 {
            report.push_warning(ValidationWarning::LocationIdsDoNotStartAtZero {
                region: self.id,
                first,
            });
        }
        let missing = self.find_empty_location_ids(None).len();
        if missing > 0 {
            report.push_warning(ValidationWarning::LocationIdGaps {
                region: self.id,
                missing,
            });
        }
        report
    }

    /// Ids in `[0, max_id]` that no location uses.
    ///
    /// `max_id` defaults to the highest existing id; an empty region with no
    /// explicit bound has no empty slots.
    pub fn find_empty_location_ids(&self, max_id: Option<LocalId>) -> Vec<LocalId> {
        let Some(upper) = max_id.or_else(|| self.locations.keys().next_back().copied()) else {
            return Vec::new();
        };
        (0..=upper.0)
            .map(LocalId)
            .filter(|id| !self.locations.contains_key(id))
            .collect()
    }
}

/// Flat on-disk shape of a region. Loading rebuilds the indexes and
/// rejects duplicate ids, duplicate edge pairs and dangling edge endpoints.
#[derive(Serialize, Deserialize)]
struct RegionRecord {
    id: RegionId,
    #[serde(default)]
    name: String,
    locations: Vec<LocationNode>,
    edges: Vec<Edge>,
}

impl From<Region> for RegionRecord {
    fn from(region: Region) -> Self {
        Self {
            id: region.id,
            name: region.name,
            locations: region.locations.into_values().collect(),
            edges: region.edges.into_values().collect(),
        }
    }
}

impl TryFrom<RegionRecord> for Region {
    type Error = WorldError;

    fn try_from(record: RegionRecord) -> Result<Self, Self::Error> {
        let mut region = Self::new(record.id).with_name(record.name);
        for node in record.locations {
            let local = node.local_id();
            if node.region() != region.id {
                return Err(WorldError::RegionMismatch {
                    expected: region.id,
                    found: node.region(),
                });
            }
            if local.is_negative() {
                return Err(WorldError::NegativeLocalId {
                    region: region.id,
                    local,
                });
            }
            if region.locations.contains_key(&local) {
                return Err(WorldError::DuplicateLocation(node.location_ref()));
            }
            region.adjacency.insert(local, Vec::new());
            region.locations.insert(local, node);
        }
        for edge in record.edges {
            let (a, b) = (edge.a(), edge.b());
            if a == b {
                return Err(WorldError::SelfLoop(LocationRef::new(region.id, a)));
            }
            if let Some(missing) = [a, b]
                .into_iter()
                .find(|id| !region.locations.contains_key(id))
            {
                return Err(WorldError::LocationNotFound(LocationRef::new(
                    region.id, missing,
                )));
            }
            let key = edge_key(a, b);
            if region.edges.contains_key(&key) {
                return Err(WorldError::EdgeExists {
                    region: region.id,
                    a,
                    b,
                });
            }
            region.adjacency.entry(a).or_default().push(b);
            region.adjacency.entry(b).or_default().push(a);
            region.edges.insert(key, edge);
        }
        Ok(region)
    }
}

#[cfg(test)]
mod tests {
    use wayfarer_types::Direction;

    use super::*;

    fn region_with_line() -> Region {
        // 0 --4-- 1 --6-- 2
        let mut region = Region::new(RegionId(1));
        let _ = region.add_edge(LocalId(0), LocalId(1), 4);
        let _ = region.add_edge(LocalId(1), LocalId(2), 6);
        region
    }

    #[test]
    fn add_location_rejects_negative_id() {
        let mut region = Region::new(RegionId(1));
        let result = region.add_location(LocalId(-3), "Nowhere", false);
        assert!(matches!(result, Err(WorldError::NegativeLocalId { .. })));
        assert_eq!(region.location_count(), 0);
    }

    #[test]
    fn add_location_duplicate_is_idempotent_by_default() {
        let mut region = Region::new(RegionId(1));
        let _ = region.add_location(LocalId(0), "Gate", false);
        let existing = region
            .add_location(LocalId(0), "Other", false)
            .map(|handle| handle.get().name().to_string());
        assert_eq!(existing.ok().as_deref(), Some("Gate"));
        assert_eq!(region.location_count(), 1);
    }

    #[test]
    fn add_location_duplicate_strict_mode_errors() {
        let mut region = Region::new(RegionId(1));
        let _ = region.add_location(LocalId(0), "Gate", false);
        let result = region.add_location(LocalId(0), "Gate", true);
        assert!(matches!(result, Err(WorldError::DuplicateLocation(_))));
    }

    #[test]
    fn insert_location_rejects_foreign_node() {
        let mut region = Region::new(RegionId(1));
        let node = LocationNode::new(RegionId(2), LocalId(0), "Elsewhere");
        let result = region.insert_location(node, false);
        assert!(matches!(result, Err(WorldError::RegionMismatch { .. })));
    }

    #[test]
    fn add_edge_materializes_missing_locations() {
        let region = region_with_line();
        assert_eq!(region.location_count(), 3);
        assert_eq!(region.edge_count(), 2);
        assert_eq!(
            region.location(LocalId(2)).map(LocationNode::name),
            Some("Location 2")
        );
    }

    #[test]
    fn edge_registered_in_both_adjacency_lists() {
        let region = region_with_line();
        assert_eq!(region.neighbors(LocalId(1)), vec![LocalId(0), LocalId(2)]);
        assert_eq!(region.neighbors(LocalId(0)), vec![LocalId(1)]);
        assert!(region.edge_between(LocalId(2), LocalId(1)).is_some());
    }

    #[test]
    fn second_edge_on_same_pair_rejected() {
        let mut region = region_with_line();
        let result = region.add_edge(LocalId(1), LocalId(0), 9);
        assert!(matches!(result, Err(WorldError::EdgeExists { .. })));
        assert_eq!(region.edge_count(), 2);
    }

    #[test]
    fn self_loop_rejected() {
        let mut region = Region::new(RegionId(1));
        let result = region.add_edge(LocalId(0), LocalId(0), 1);
        assert!(matches!(result, Err(WorldError::SelfLoop(_))));
    }

    #[test]
    fn remove_edge_detaches_both_sides() {
        let mut region = region_with_line();
        region.clear_changed_flag();
        let removed = region.remove_edge(LocalId(1), LocalId(0));
        assert!(removed.is_some());
        assert!(region.is_changed());
        assert!(region.neighbors(LocalId(0)).is_empty());
        assert_eq!(region.neighbors(LocalId(1)), vec![LocalId(2)]);
        // Locations outlive their edges.
        assert_eq!(region.location_count(), 3);
    }

    #[test]
    fn remove_missing_edge_is_not_found() {
        let mut region = region_with_line();
        region.clear_changed_flag();
        assert!(region.remove_edge(LocalId(0), LocalId(2)).is_none());
        assert!(!region.is_changed());
    }

    #[test]
    fn edge_mutation_marks_region_dirty() {
        let mut region = region_with_line();
        region.clear_changed_flag();

        if let Some(mut edge) = region.edge_mut(LocalId(0), LocalId(1)) {
            assert!(!edge.set_travel_time(4));
        }
        assert!(!region.is_changed());

        if let Some(mut edge) = region.edge_mut(LocalId(0), LocalId(1)) {
            assert!(edge.add_condition(Direction::AToB, "key", 1));
        }
        assert!(region.is_changed());
    }

    #[test]
    fn location_mutation_marks_region_dirty() {
        let mut region = region_with_line();
        region.clear_changed_flag();
        if let Some(mut loc) = region.location_mut(LocalId(1)) {
            loc.set_dwell_time(30);
        }
        assert!(region.is_changed());
        assert_eq!(region.location(LocalId(1)).map(LocationNode::dwell_time), Some(30));
    }

    #[test]
    fn neighbors_ignore_traversability() {
        let mut region = region_with_line();
        if let Some(mut edge) = region.edge_mut(LocalId(0), LocalId(1)) {
            edge.set_blocked(true);
        }
        assert_eq!(region.neighbors(LocalId(0)), vec![LocalId(1)]);
        assert!(region.traversable_neighbors(LocalId(0), None).is_empty());
    }

    #[test]
    fn traversable_neighbors_resolve_direction() {
        let mut region = Region::new(RegionId(1));
        let _ = region.add_directed_edge(LocalId(0), LocalId(1), 5, -1);
        let _ = region.add_directed_edge(LocalId(2), LocalId(1), 7, 3);

        let from_one: Vec<(LocalId, u32)> = region
            .traversable_neighbors(LocalId(1), None)
            .iter()
            .map(|n| (n.location, n.time))
            .collect();
        // 1 -> 0 is impassable, 1 -> 2 uses the b-to-a time.
        assert_eq!(from_one, vec![(LocalId(2), 3)]);

        let from_zero: Vec<(LocalId, u32)> = region
            .traversable_neighbors(LocalId(0), None)
            .iter()
            .map(|n| (n.location, n.time))
            .collect();
        assert_eq!(from_zero, vec![(LocalId(1), 5)]);
    }

    #[test]
    fn traversable_neighbors_respect_conditions() {
        let mut region = region_with_line();
        if let Some(mut edge) = region.edge_mut(LocalId(1), LocalId(2)) {
            edge.add_condition(Direction::Both, "torch", 1);
        }
        let dark = TraversalContext::new();
        let lit = TraversalContext::new().with_tag("torch", 1);
        assert_eq!(region.traversable_neighbors(LocalId(1), Some(&dark)).len(), 1);
        assert_eq!(region.traversable_neighbors(LocalId(1), Some(&lit)).len(), 2);
    }

    #[test]
    fn find_empty_location_ids_complement() {
        let mut region = Region::new(RegionId(1));
        for id in [0, 2, 5] {
            let _ = region.add_location(LocalId(id), "x", false);
        }
        assert_eq!(
            region.find_empty_location_ids(None),
            vec![LocalId(1), LocalId(3), LocalId(4)]
        );
        assert_eq!(
            region.find_empty_location_ids(Some(LocalId(7))),
            vec![LocalId(1), LocalId(3), LocalId(4), LocalId(6), LocalId(7)]
        );
        assert!(Region::new(RegionId(2)).find_empty_location_ids(None).is_empty());
    }

    #[test]
    fn validate_location_ids_warns_on_gaps_and_offset_start() {
        let mut region = Region::new(RegionId(1));
        for id in [2, 3, 6] {
            let _ = region.add_location(LocalId(id), "x", false);
        }
        let report = region.validate_location_ids();
        assert!(report.errors().is_empty());
        assert!(report.warnings().iter().any(|w| matches!(
            w,
            ValidationWarning::LocationIdsDoNotStartAtZero { first, .. } if *first == LocalId(2)
        )));
        assert!(report.warnings().iter().any(|w| matches!(
            w,
            ValidationWarning::LocationIdGaps { missing: 4, .. }
        )));
    }

    #[test]
    fn validate_location_ids_clean_for_contiguous_range() {
        let region = region_with_line();
        assert!(region.validate_location_ids().is_clean());
    }

    #[test]
    fn clear_removes_everything() {
        let mut region = region_with_line();
        region.clear_changed_flag();
        region.clear();
        assert_eq!(region.location_count(), 0);
        assert_eq!(region.edge_count(), 0);
        assert!(region.neighbors(LocalId(1)).is_empty());
        assert!(region.is_changed());
    }

    #[test]
    fn serde_roundtrip_rebuilds_adjacency() {
        let mut region = region_with_line().with_name("Town");
        if let Some(mut edge) = region.edge_mut(LocalId(0), LocalId(1)) {
            edge.set_directed_travel_time(4, -1);
        }
        let json = serde_json::to_string(&region).unwrap_or_default();
        let restored: Option<Region> = serde_json::from_str(&json).ok();
        assert!(restored.is_some());
        if let Some(restored) = restored {
            assert_eq!(restored.name(), "Town");
            assert!(!restored.is_changed());
            assert_eq!(restored.neighbors(LocalId(1)).len(), 2);
            assert_eq!(
                restored
                    .edge_between(LocalId(0), LocalId(1))
                    .and_then(|e| e.travel_time(LocalId(1))),
                Some(-1)
            );
        }
    }

    #[test]
    fn failed_add_edge_leaves_region_untouched() {
        let mut region = Region::new(RegionId(1));
        let forward = region.add_edge(LocalId(0), LocalId(-1), 5);
        assert!(matches!(
            forward,
            Err(WorldError::NegativeLocalId { local: LocalId(-1), .. })
        ));
        let backward = region.add_edge(LocalId(-1), LocalId(0), 5);
        assert!(matches!(
            backward,
            Err(WorldError::NegativeLocalId { local: LocalId(-1), .. })
        ));
        assert!(region.location_ids().is_empty());
        assert!(region.neighbors(LocalId(0)).is_empty());
        assert!(!region.is_changed());
    }

    fn line_json() -> serde_json::Value {
        serde_json::to_value(region_with_line()).unwrap_or_default()
    }

    fn records<'a>(json: &'a mut serde_json::Value, field: &str) -> &'a mut Vec<serde_json::Value> {
        let Some(list) = json.get_mut(field).and_then(serde_json::Value::as_array_mut) else {
            panic!("region record has no {field} list");
        };
        list
    }

    #[test]
    fn load_rejects_duplicate_location() {
        let mut json = line_json();
        let nodes = records(&mut json, "locations");
        let first = nodes.first().cloned();
        nodes.extend(first);
        let result = serde_json::from_value::<Region>(json);
        assert!(result.is_err_and(|e| e.to_string().contains("duplicate location id: 1:0")));
    }

    #[test]
    fn load_rejects_duplicate_edge_pair() {
        let mut json = line_json();
        let edges = records(&mut json, "edges");
        let first = edges.first().cloned();
        edges.extend(first);
        let result = serde_json::from_value::<Region>(json);
        assert!(result.is_err_and(|e| e.to_string().contains("edge already exists")));
    }

    #[test]
    fn load_rejects_edge_to_missing_location() {
        let mut json = line_json();
        records(&mut json, "locations").pop();
        let result = serde_json::from_value::<Region>(json);
        assert!(result.is_err_and(|e| e.to_string().contains("location not found: 1:2")));
    }
}
