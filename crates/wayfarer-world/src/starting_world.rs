//! Default starting terrain.
//!
//! Three regions (Millbrook town, Thornwood forest, Greyhold Keep) joined by
//! four region edges. The map deliberately contains one of everything the
//! router has to handle: an asymmetric climb, a one-way descent, a keyed
//! door, a blocked road, and a shortcut that needs a capability tag.

use wayfarer_types::{Direction, LocationRef, RegionEdgeId, RegionId};

use crate::builder::RegionBuilder;
use crate::error::WorldError;
use crate::terrain::Terrain;

/// Region id of Millbrook.
pub const TOWN: RegionId = RegionId(1);
/// Region id of Thornwood.
pub const FOREST: RegionId = RegionId(2);
/// Region id of Greyhold Keep.
pub const KEEP: RegionId = RegionId(3);

/// Addresses of the starting locations, so callers can place actors and
/// issue queries without hard-coding ids.
#[derive(Debug, Clone, Copy)]
pub struct StartingLocations {
    // --- Millbrook ---
    /// Town Gate: where the forest road begins.
    pub town_gate: LocationRef,
    /// Market Square: crowded, slow to cross.
    pub market: LocationRef,
    /// The Inn.
    pub inn: LocationRef,
    /// The Smithy.
    pub smithy: LocationRef,
    /// Watchtower: a steep climb from the gate, guards only.
    pub watchtower: LocationRef,

    // --- Thornwood ---
    /// Forest Edge.
    pub forest_edge: LocationRef,
    /// Clearing: a large glade that takes time to cross.
    pub clearing: LocationRef,
    /// Ravine Lip: top of a one-way scramble down.
    pub ravine_lip: LocationRef,
    /// Ravine Floor: foot of the keep's cliff.
    pub ravine_floor: LocationRef,
    /// Hunter's Lodge.
    pub lodge: LocationRef,

    // --- Greyhold Keep ---
    /// Drawbridge.
    pub drawbridge: LocationRef,
    /// Courtyard.
    pub courtyard: LocationRef,
    /// Great Hall.
    pub great_hall: LocationRef,
    /// Vault: behind a locked door.
    pub vault: LocationRef,
}

/// The forest road between the town gate and the forest edge.
pub const FOREST_ROAD: RegionEdgeId = RegionEdgeId(0);
/// The lodge-to-drawbridge trail; slower going back.
pub const KEEP_TRAIL: RegionEdgeId = RegionEdgeId(1);
/// The ridge road from the watchtower, closed by a landslide.
pub const RIDGE_ROAD: RegionEdgeId = RegionEdgeId(2);
/// The cliff climb from the ravine floor into the courtyard.
pub const CLIFF_CLIMB: RegionEdgeId = RegionEdgeId(3);

/// Create the default starting terrain.
///
/// Every changed flag is cleared before returning, so the first checkpoint
/// only reports edits made afterwards.
///
/// # Errors
///
/// Returns [`WorldError`] if construction fails (should not happen with the
/// hard-coded data).
pub fn create_starting_world() -> Result<(Terrain, StartingLocations), WorldError> {
    let mut terrain = Terrain::new();

    // ---------------------------------------------------------------
    // Region: Millbrook
    // ---------------------------------------------------------------

    let town = RegionBuilder::new(TOWN, 5)
        .name("Millbrook")
        .location_name(0, "Town Gate")
        .location_name(1, "Market Square")
        .location_name(2, "The Inn")
        .location_name(3, "The Smithy")
        .location_name(4, "Watchtower")
        .dwell_time(1, 10)
        .indoor(2, true)
        .indoor(3, true)
        .travel_time(0, 1, 5)
        .travel_time(1, 2, 3)
        .travel_time(1, 3, 4)
        .directed_time(0, 4, 8)
        .directed_time(4, 0, 3)
        .condition(0, 4, "guard_rank", 1)
        .build()?;
    terrain.add_region(town)?;

    // ---------------------------------------------------------------
    // Region: Thornwood
    // ---------------------------------------------------------------

    let forest = RegionBuilder::new(FOREST, 5)
        .name("Thornwood")
        .location_name(0, "Forest Edge")
        .location_name(1, "Clearing")
        .location_name(2, "Ravine Lip")
        .location_name(3, "Ravine Floor")
        .location_name(4, "Hunter's Lodge")
        .dwell_time(1, 15)
        .indoor(4, true)
        .travel_time(0, 1, 20)
        .travel_time(1, 4, 10)
        .travel_time(1, 2, 12)
        .directed_time(2, 3, 4)
        .travel_time(3, 4, 25)
        .build()?;
    terrain.add_region(forest)?;

    // ---------------------------------------------------------------
    // Region: Greyhold Keep
    // ---------------------------------------------------------------

    let keep = RegionBuilder::new(KEEP, 4)
        .name("Greyhold Keep")
        .location_name(0, "Drawbridge")
        .location_name(1, "Courtyard")
        .location_name(2, "Great Hall")
        .location_name(3, "Vault")
        .dwell_time(2, 5)
        .indoor(2, true)
        .indoor(3, true)
        .travel_time(0, 1, 2)
        .travel_time(1, 2, 3)
        .travel_time(2, 3, 2)
        .condition(2, 3, "vault_key", 1)
        .condition(3, 2, "vault_key", 1)
        .build()?;
    terrain.add_region(keep)?;

    let ids = StartingLocations {
        town_gate: LocationRef::of(1, 0),
        market: LocationRef::of(1, 1),
        inn: LocationRef::of(1, 2),
        smithy: LocationRef::of(1, 3),
        watchtower: LocationRef::of(1, 4),
        forest_edge: LocationRef::of(2, 0),
        clearing: LocationRef::of(2, 1),
        ravine_lip: LocationRef::of(2, 2),
        ravine_floor: LocationRef::of(2, 3),
        lodge: LocationRef::of(2, 4),
        drawbridge: LocationRef::of(3, 0),
        courtyard: LocationRef::of(3, 1),
        great_hall: LocationRef::of(3, 2),
        vault: LocationRef::of(3, 3),
    };

    // ---------------------------------------------------------------
    // Region edges
    // ---------------------------------------------------------------

    terrain.add_region_edge(Some(FOREST_ROAD), ids.town_gate, ids.forest_edge, 30, 30)?;
    terrain.add_region_edge(Some(KEEP_TRAIL), ids.lodge, ids.drawbridge, 45, 60)?;
    terrain.add_region_edge(Some(RIDGE_ROAD), ids.watchtower, ids.drawbridge, 90, 90)?;
    terrain.add_region_edge(Some(CLIFF_CLIMB), ids.ravine_floor, ids.courtyard, 25, 25)?;

    if let Some(mut ridge) = terrain.region_edge_mut(RIDGE_ROAD) {
        ridge.set_blocked(true);
    }
    if let Some(mut cliff) = terrain.region_edge_mut(CLIFF_CLIMB) {
        cliff.add_condition(Direction::AToB, "climbing", 2);
    }

    terrain.clear_changed_flags();
    tracing::debug!(
        regions = terrain.region_count(),
        region_edges = terrain.region_edge_count(),
        "Starting world created"
    );
    Ok((terrain, ids))
}
