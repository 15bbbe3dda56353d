//! Bulk region construction from a square travel-time matrix.
//!
//! Cell `(i, j)` holds the time from location `i` to location `j`. A value
//! `<= 0` means "no link in that direction". When only one of `(i, j)` and
//! `(j, i)` is positive the resulting edge is one-way: the other direction
//! gets [`IMPASSABLE`].
//!
//! Index errors are recorded on the first bad call and reported by
//! [`RegionBuilder::build`], so a long chain of setters stays readable.

use std::collections::BTreeMap;

use wayfarer_types::{Direction, LocalId, RegionId};

use crate::error::WorldError;
use crate::link::IMPASSABLE;
use crate::region::Region;

#[derive(Debug, Clone, Default)]
struct NodeSettings {
    name: Option<String>,
    dwell_time: u32,
    indoor: bool,
}

/// Builds a [`Region`] from an `N x N` matrix of travel times.
#[derive(Debug, Clone)]
pub struct RegionBuilder {
    id: RegionId,
    name: Option<String>,
    matrix: Vec<Vec<i32>>,
    nodes: Vec<NodeSettings>,
    conditions: BTreeMap<(usize, usize), Vec<(String, i32)>>,
    error: Option<WorldError>,
}

impl RegionBuilder {
    /// Start a builder for `size` locations with no links.
    pub fn new(id: RegionId, size: usize) -> Self {
        Self {
            id,
            name: None,
            matrix: vec![vec![0; size]; size],
            nodes: vec![NodeSettings::default(); size],
            conditions: BTreeMap::new(),
            error: None,
        }
    }

    /// Start a builder from an existing matrix.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NonSquareMatrix`] if any row length differs
    /// from the number of rows.
    pub fn from_matrix(id: RegionId, rows: Vec<Vec<i32>>) -> Result<Self, WorldError> {
        let size = rows.len();
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(WorldError::NonSquareMatrix {
                rows: size,
                row,
                len: cells.len(),
            });
        }
        let mut builder = Self::new(id, size);
        builder.matrix = rows;
        Ok(builder)
    }

    /// Matrix dimension.
    pub fn size(&self) -> usize {
        self.matrix.len()
    }

    /// Region display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name one location.
    #[must_use]
    pub fn location_name(mut self, index: usize, name: impl Into<String>) -> Self {
        if let Some(node) = self.node_settings(index) {
            node.name = Some(name.into());
        }
        self
    }

    /// Pass-through dwell time of one location.
    #[must_use]
    pub fn dwell_time(mut self, index: usize, minutes: u32) -> Self {
        if let Some(node) = self.node_settings(index) {
            node.dwell_time = minutes;
        }
        self
    }

    /// Mark one location as indoors.
    #[must_use]
    pub fn indoor(mut self, index: usize, indoor: bool) -> Self {
        if let Some(node) = self.node_settings(index) {
            node.indoor = indoor;
        }
        self
    }

    /// Set the same travel time in both directions between `a` and `b`.
    #[must_use]
    pub fn travel_time(self, a: usize, b: usize, time: i32) -> Self {
        self.directed_time(a, b, time).directed_time(b, a, time)
    }

    /// Set the travel time from `from` to `to` only.
    #[must_use]
    pub fn directed_time(mut self, from: usize, to: usize, time: i32) -> Self {
        if let Some(cell) = self.cell(from, to) {
            *cell = time;
        }
        self
    }

    /// Require `tag >= value` to travel from `from` to `to`.
    ///
    /// Ignored by [`build`](Self::build) if that pair ends up with no link.
    #[must_use]
    pub fn condition(mut self, from: usize, to: usize, tag: impl Into<String>, value: i32) -> Self {
        if self.cell(from, to).is_some() {
            self.conditions
                .entry((from, to))
                .or_default()
                .push((tag.into(), value));
        }
        self
    }

    /// Produce the region.
    ///
    /// Every index `0..size` becomes a location, linked or not.
    ///
    /// # Errors
    ///
    /// Returns the first [`WorldError::BuilderIndexOutOfRange`] recorded by
    /// a setter, or [`WorldError::ArithmeticOverflow`] if `size` exceeds the
    /// location id range.
    pub fn build(self) -> Result<Region, WorldError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let mut region = Region::new(self.id);
        if let Some(name) = self.name {
            region.set_name(name);
        }

        for (index, settings) in self.nodes.into_iter().enumerate() {
            let local = local_id(index)?;
            let mut node = region.get_or_create_location(local)?;
            if let Some(name) = settings.name {
                node.set_name(name);
            }
            node.set_dwell_time(settings.dwell_time).set_indoor(settings.indoor);
        }

        for (i, row) in self.matrix.iter().enumerate() {
            for (j, &forward) in row.iter().enumerate().skip(i.saturating_add(1)) {
                let backward = self
                    .matrix
                    .get(j)
                    .and_then(|r| r.get(i))
                    .copied()
                    .unwrap_or(0);
                if forward <= 0 && backward <= 0 {
                    continue;
                }
                let mut edge = region.add_directed_edge(
                    local_id(i)?,
                    local_id(j)?,
                    passable_or_impassable(forward),
                    passable_or_impassable(backward),
                )?;
                for (cell, direction) in [((i, j), Direction::AToB), ((j, i), Direction::BToA)] {
                    for (tag, value) in self.conditions.get(&cell).into_iter().flatten() {
                        edge.add_condition(direction, tag, *value);
                    }
                }
            }
        }

        tracing::debug!(
            region = %region.id(),
            locations = region.location_count(),
            edges = region.edge_count(),
            "Region built"
        );
        Ok(region)
    }

    fn record_out_of_range(&mut self, index: usize) {
        if self.error.is_none() {
            self.error = Some(WorldError::BuilderIndexOutOfRange {
                index,
                size: self.matrix.len(),
            });
        }
    }

    fn node_settings(&mut self, index: usize) -> Option<&mut NodeSettings> {
        if index >= self.nodes.len() {
            self.record_out_of_range(index);
            return None;
        }
        self.nodes.get_mut(index)
    }

    fn cell(&mut self, from: usize, to: usize) -> Option<&mut i32> {
        let size = self.matrix.len();
        if let Some(bad) = [from, to].into_iter().find(|&i| i >= size) {
            self.record_out_of_range(bad);
            return None;
        }
        self.matrix.get_mut(from).and_then(|row| row.get_mut(to))
    }
}

const fn passable_or_impassable(time: i32) -> i32 {
    if time > 0 { time } else { IMPASSABLE }
}

fn local_id(index: usize) -> Result<LocalId, WorldError> {
    i32::try_from(index)
        .map(LocalId)
        .map_err(|_conversion| WorldError::ArithmeticOverflow)
}

#[cfg(test)]
mod tests {
    use wayfarer_types::{LocalId, TraversalContext};

    use super::*;

    #[test]
    fn single_symmetric_edge() {
        let region = RegionBuilder::new(RegionId(3), 4)
            .travel_time(0, 1, 10)
            .build();
        assert!(region.is_ok());
        if let Ok(region) = region {
            assert_eq!(region.edge_count(), 1);
            assert_eq!(region.location_count(), 4);
            let edge = region.edge_between(LocalId(0), LocalId(1));
            assert!(edge.is_some_and(|e| e.time_a_to_b() == 10 && e.time_b_to_a() == 10));
        }
    }

    #[test]
    fn one_sided_cell_makes_one_way_edge() {
        let region = RegionBuilder::new(RegionId(1), 2)
            .directed_time(1, 0, 7)
            .build()
            .ok();
        let edge = region.as_ref().and_then(|r| r.edge_between(LocalId(0), LocalId(1)));
        assert!(edge.is_some_and(|e| e.time_a_to_b() == IMPASSABLE && e.time_b_to_a() == 7));
        assert!(edge.is_some_and(|e| e.can_traverse(LocalId(1), None)));
        assert!(edge.is_some_and(|e| !e.can_traverse(LocalId(0), None)));
    }

    #[test]
    fn from_matrix_rejects_ragged_rows() {
        let result = RegionBuilder::from_matrix(RegionId(1), vec![vec![0, 1], vec![1]]);
        assert!(matches!(
            result,
            Err(WorldError::NonSquareMatrix { rows: 2, row: 1, len: 1 })
        ));
    }

    #[test]
    fn from_matrix_builds_every_positive_pair() {
        let region = RegionBuilder::from_matrix(
            RegionId(1),
            vec![vec![0, 4, 0], vec![4, 0, -1], vec![0, 9, 0]],
        )
        .and_then(RegionBuilder::build)
        .ok();
        assert_eq!(region.as_ref().map(Region::edge_count), Some(2));
        let bc = region.as_ref().and_then(|r| r.edge_between(LocalId(1), LocalId(2)));
        assert!(bc.is_some_and(|e| e.time_a_to_b() == IMPASSABLE && e.time_b_to_a() == 9));
    }

    #[test]
    fn conditions_attach_to_the_right_direction() {
        let region = RegionBuilder::new(RegionId(1), 2)
            .travel_time(0, 1, 5)
            .condition(1, 0, "key", 1)
            .build()
            .ok();
        let edge = region.as_ref().and_then(|r| r.edge_between(LocalId(0), LocalId(1)));
        let holder = TraversalContext::new().with_tag("key", 1);
        let empty = TraversalContext::new();
        assert!(edge.is_some_and(|e| e.can_traverse(LocalId(0), Some(&empty))));
        assert!(edge.is_some_and(|e| !e.can_traverse(LocalId(1), Some(&empty))));
        assert!(edge.is_some_and(|e| e.can_traverse(LocalId(1), Some(&holder))));
    }

    #[test]
    fn node_attributes_applied() {
        let region = RegionBuilder::new(RegionId(1), 2)
            .name("Harbor")
            .location_name(0, "Dock")
            .dwell_time(1, 30)
            .indoor(1, true)
            .build()
            .ok();
        assert_eq!(region.as_ref().map(Region::name), Some("Harbor"));
        let dock = region.as_ref().and_then(|r| r.location(LocalId(0)));
        assert_eq!(dock.map(|n| n.name()), Some("Dock"));
        let warehouse = region.as_ref().and_then(|r| r.location(LocalId(1)));
        assert!(warehouse.is_some_and(|n| n.dwell_time() == 30 && n.is_indoor()));
    }

    #[test]
    fn out_of_range_reported_by_build() {
        let result = RegionBuilder::new(RegionId(1), 2)
            .travel_time(0, 5, 3)
            .location_name(9, "Nowhere")
            .build();
        assert!(matches!(
            result,
            Err(WorldError::BuilderIndexOutOfRange { index: 5, size: 2 })
        ));
    }
}
