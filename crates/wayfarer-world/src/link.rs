//! Two-way links with independent per-direction weights and conditions.
//!
//! A [`Link`] connects an ordered endpoint pair `(a, b)`. Each direction
//! carries its own signed travel time (negative means impassable that way)
//! and its own [`ConditionSet`]. A single `blocked` flag severs both
//! directions regardless of time or conditions.
//!
//! The same type backs both link kinds in the terrain:
//!
//! - [`Edge`] = `Link<LocalId>`: two nodes of one region.
//! - [`RegionEdge`](crate::region_edge::RegionEdge) wraps a
//!   `Link<LocationRef>`: two nodes anywhere in the terrain.
//!
//! Every lookup resolves the direction from the endpoint being *departed*.
//! Nothing here assumes symmetric weights.

use core::fmt::Display;

use serde::{Deserialize, Serialize};
use wayfarer_types::{ConditionSet, Direction, ExternalRef, LocalId, TraversalContext};

use crate::error::WorldError;

/// Travel time used for "no link in this direction".
pub const IMPASSABLE: i32 = -1;

/// One direction of a link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    /// Signed travel time in minutes; negative is impassable.
    pub time: i32,
    /// Tags an actor must carry to take this direction.
    pub conditions: ConditionSet,
}

impl Leg {
    const fn with_time(time: i32) -> Self {
        Self {
            time,
            conditions: ConditionSet::new(),
        }
    }

    /// Whether the time alone allows travel.
    pub const fn is_passable(&self) -> bool {
        self.time >= 0
    }
}

/// A two-way link between endpoints of type `P`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link<P> {
    a: P,
    b: P,
    a_to_b: Leg,
    b_to_a: Leg,
    blocked: bool,
    external: Option<ExternalRef>,
}

/// A link between two locations of the same region.
pub type Edge = Link<LocalId>;

impl<P: Copy + Eq + Display> Link<P> {
    /// Create an unblocked link with no conditions.
    pub const fn new(a: P, b: P, time_a_to_b: i32, time_b_to_a: i32) -> Self {
        Self {
            a,
            b,
            a_to_b: Leg::with_time(time_a_to_b),
            b_to_a: Leg::with_time(time_b_to_a),
            blocked: false,
            external: None,
        }
    }

    /// First endpoint.
    pub const fn a(&self) -> P {
        self.a
    }

    /// Second endpoint.
    pub const fn b(&self) -> P {
        self.b
    }

    /// Whether `location` is one of the two endpoints.
    pub fn connects(&self, location: P) -> bool {
        self.a == location || self.b == location
    }

    /// Resolve which direction departing from `from` travels.
    ///
    /// Returns `None` if `from` is not an endpoint.
    pub fn direction_from(&self, from: P) -> Option<Direction> {
        if from == self.a {
            Some(Direction::AToB)
        } else if from == self.b {
            Some(Direction::BToA)
        } else {
            None
        }
    }

    /// The leg for a single direction. `Both` resolves to `a -> b`.
    pub const fn leg(&self, direction: Direction) -> &Leg {
        match direction {
            Direction::AToB | Direction::Both => &self.a_to_b,
            Direction::BToA => &self.b_to_a,
        }
    }

    /// The leg taken when departing from `from`.
    pub fn leg_from(&self, from: P) -> Option<&Leg> {
        self.direction_from(from).map(|d| self.leg(d))
    }

    /// Travel time from `a` to `b`.
    pub const fn time_a_to_b(&self) -> i32 {
        self.a_to_b.time
    }

    /// Travel time from `b` to `a`.
    pub const fn time_b_to_a(&self) -> i32 {
        self.b_to_a.time
    }

    /// Signed travel time departing from `from`.
    ///
    /// `None` means `from` is not an endpoint at all, which is distinct
    /// from `Some(negative)`: a valid endpoint whose direction is
    /// impassable.
    pub fn travel_time(&self, from: P) -> Option<i32> {
        self.leg_from(from).map(|leg| leg.time)
    }

    /// Conditions required when departing from `from`.
    pub fn conditions_from(&self, from: P) -> Option<&ConditionSet> {
        self.leg_from(from).map(|leg| &leg.conditions)
    }

    /// Whether the link is severed in both directions.
    pub const fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Opaque external handle, if one is attached.
    pub const fn external(&self) -> Option<ExternalRef> {
        self.external
    }

    /// The endpoint opposite `from`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NotAnEndpoint`] if `from` is neither endpoint.
    pub fn other_endpoint(&self, from: P) -> Result<P, WorldError> {
        match self.direction_from(from) {
            Some(Direction::AToB) => Ok(self.b),
            Some(Direction::BToA) => Ok(self.a),
            _ => Err(WorldError::NotAnEndpoint(from.to_string())),
        }
    }

    /// Whether an actor at `from` may take this link right now.
    ///
    /// Evaluation order:
    /// 1. A blocked link is never traversable.
    /// 2. `from` must be an endpoint.
    /// 3. The departing direction's time must be non-negative.
    /// 4. Every condition on that direction must be met by `context`;
    ///    a missing context fails any non-empty condition set.
    pub fn can_traverse(&self, from: P, context: Option<&TraversalContext>) -> bool {
        if self.blocked {
            return false;
        }
        let Some(leg) = self.leg_from(from) else {
            return false;
        };
        leg.is_passable() && leg.conditions.is_satisfied_by(context)
    }

    /// Traversable travel time departing from `from`, if the link can be taken.
    pub(crate) fn traversal_time(&self, from: P, context: Option<&TraversalContext>) -> Option<u32> {
        if !self.can_traverse(from, context) {
            return None;
        }
        self.travel_time(from).and_then(|t| u32::try_from(t).ok())
    }

    fn legs_mut(&mut self, direction: Direction) -> impl Iterator<Item = &mut Leg> {
        let (first, second) = (&mut self.a_to_b, &mut self.b_to_a);
        let take_a = direction.includes_a_to_b();
        let take_b = direction.includes_b_to_a();
        [(take_a, first), (take_b, second)]
            .into_iter()
            .filter_map(|(take, leg)| take.then_some(leg))
    }

    pub(crate) fn set_times(&mut self, time_a_to_b: i32, time_b_to_a: i32) -> bool {
        let changed = self.a_to_b.time != time_a_to_b || self.b_to_a.time != time_b_to_a;
        self.a_to_b.time = time_a_to_b;
        self.b_to_a.time = time_b_to_a;
        changed
    }

    pub(crate) fn add_condition(&mut self, direction: Direction, tag: &str, value: i32) -> bool {
        let mut changed = false;
        for leg in self.legs_mut(direction) {
            changed |= leg.conditions.insert(tag, value);
        }
        changed
    }

    pub(crate) fn remove_condition(&mut self, direction: Direction, tag: &str) -> bool {
        let mut changed = false;
        for leg in self.legs_mut(direction) {
            changed |= leg.conditions.remove(tag);
        }
        changed
    }

    pub(crate) fn clear_conditions(&mut self, direction: Direction) -> bool {
        let mut changed = false;
        for leg in self.legs_mut(direction) {
            changed |= leg.conditions.clear();
        }
        changed
    }

    pub(crate) fn set_blocked(&mut self, blocked: bool) -> bool {
        let changed = self.blocked != blocked;
        self.blocked = blocked;
        changed
    }

    pub(crate) fn set_external(&mut self, external: Option<ExternalRef>) -> bool {
        let changed = self.external != external;
        self.external = external;
        changed
    }
}

/// Mutable access to a [`Link`] that records changes on its owner's dirty flag.
///
/// Obtained from [`Region::edge_mut`](crate::region::Region::edge_mut) or
/// [`Terrain::region_edge_mut`](crate::terrain::Terrain::region_edge_mut).
/// Every setter returns whether observable state changed; the owner is
/// marked dirty only in that case.
#[derive(Debug)]
pub struct LinkMut<'a, P> {
    link: &'a mut Link<P>,
    changed: &'a mut bool,
}

impl<'a, P: Copy + Eq + Display> LinkMut<'a, P> {
    pub(crate) const fn new(link: &'a mut Link<P>, changed: &'a mut bool) -> Self {
        Self { link, changed }
    }

    const fn record(&mut self, changed: bool) -> bool {
        if changed {
            *self.changed = true;
        }
        changed
    }

    /// Read-only view of the link.
    pub const fn get(&self) -> &Link<P> {
        &*self.link
    }

    /// Set both directions to the same travel time.
    pub fn set_travel_time(&mut self, time: i32) -> bool {
        let changed = self.link.set_times(time, time);
        self.record(changed)
    }

    /// Set each direction's travel time independently.
    pub fn set_directed_travel_time(&mut self, time_a_to_b: i32, time_b_to_a: i32) -> bool {
        let changed = self.link.set_times(time_a_to_b, time_b_to_a);
        self.record(changed)
    }

    /// Require `tag >= value` on the selected direction(s).
    pub fn add_condition(&mut self, direction: Direction, tag: &str, value: i32) -> bool {
        let changed = self.link.add_condition(direction, tag, value);
        self.record(changed)
    }

    /// Drop the requirement on `tag` from both directions.
    ///
    /// A tag absent from both directions is a no-op.
    pub fn remove_condition(&mut self, tag: &str) -> bool {
        let changed = self.link.remove_condition(Direction::Both, tag);
        self.record(changed)
    }

    /// Drop the requirement on `tag` from the selected direction(s) only.
    pub fn remove_condition_in(&mut self, direction: Direction, tag: &str) -> bool {
        let changed = self.link.remove_condition(direction, tag);
        self.record(changed)
    }

    /// Drop every requirement on the selected direction(s).
    pub fn clear_conditions(&mut self, direction: Direction) -> bool {
        let changed = self.link.clear_conditions(direction);
        self.record(changed)
    }

    /// Sever or restore the link in both directions.
    pub fn set_blocked(&mut self, blocked: bool) -> bool {
        let changed = self.link.set_blocked(blocked);
        self.record(changed)
    }

    /// Attach or clear the opaque external handle.
    pub fn set_external(&mut self, external: Option<ExternalRef>) -> bool {
        let changed = self.link.set_external(external);
        self.record(changed)
    }
}
