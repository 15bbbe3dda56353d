//! Location nodes: the points of interest inside a Region.
//!
//! A [`LocationNode`] never moves between regions. Its identity is the pair
//! `(region, local)`; everything else is mutable through
//! [`LocationMut`], which records the change on the owning region's dirty
//! flag only when a value actually differs.

use serde::{Deserialize, Serialize};
use wayfarer_types::{ExternalRef, LocalId, LocationRef, RegionId};

/// A point of interest inside one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationNode {
    region: RegionId,
    local: LocalId,
    /// Display name.
    pub(crate) name: String,
    /// Whether the location is indoors.
    pub(crate) indoor: bool,
    /// Minutes an actor is forced to spend when passing through.
    pub(crate) dwell_time: u32,
    /// Opaque metadata owned by an external system.
    pub(crate) external: Option<ExternalRef>,
}

impl LocationNode {
    /// Create an outdoor node with no dwell time.
    ///
    /// Id validation (non-negative, unique) is the owning region's job;
    /// see [`Region::add_location`](crate::region::Region::add_location).
    pub fn new(region: RegionId, local: LocalId, name: impl Into<String>) -> Self {
        Self {
            region,
            local,
            name: name.into(),
            indoor: false,
            dwell_time: 0,
            external: None,
        }
    }

    /// Builder-style setter for the dwell time.
    #[must_use]
    pub const fn with_dwell_time(mut self, minutes: u32) -> Self {
        self.dwell_time = minutes;
        self
    }

    /// Builder-style setter for the indoor flag.
    #[must_use]
    pub const fn with_indoor(mut self, indoor: bool) -> Self {
        self.indoor = indoor;
        self
    }

    /// Owning region id.
    pub const fn region(&self) -> RegionId {
        self.region
    }

    /// Id inside the owning region.
    pub const fn local_id(&self) -> LocalId {
        self.local
    }

    /// Global address of this node.
    pub const fn location_ref(&self) -> LocationRef {
        LocationRef::new(self.region, self.local)
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the location is indoors.
    pub const fn is_indoor(&self) -> bool {
        self.indoor
    }

    /// Minutes spent when passing through.
    pub const fn dwell_time(&self) -> u32 {
        self.dwell_time
    }

    /// Opaque external handle, if one is attached.
    pub const fn external(&self) -> Option<ExternalRef> {
        self.external
    }
}

/// Mutable access to a [`LocationNode`] that marks its region dirty on change.
#[derive(Debug)]
pub struct LocationMut<'a> {
    node: &'a mut LocationNode,
    changed: &'a mut bool,
}

impl<'a> LocationMut<'a> {
    pub(crate) const fn new(node: &'a mut LocationNode, changed: &'a mut bool) -> Self {
        Self { node, changed }
    }

    /// Read-only view of the node.
    pub const fn get(&self) -> &LocationNode {
        &*self.node
    }

    /// Rename the location.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if self.node.name != name {
            self.node.name = name;
            *self.changed = true;
        }
        self
    }

    /// Set the indoor flag.
    pub fn set_indoor(&mut self, indoor: bool) -> &mut Self {
        if self.node.indoor != indoor {
            self.node.indoor = indoor;
            *self.changed = true;
        }
        self
    }

    /// Set the pass-through dwell time in minutes.
    pub fn set_dwell_time(&mut self, minutes: u32) -> &mut Self {
        if self.node.dwell_time != minutes {
            self.node.dwell_time = minutes;
            *self.changed = true;
        }
        self
    }

    /// Attach or clear the opaque external handle.
    pub fn set_external(&mut self, external: Option<ExternalRef>) -> &mut Self {
        if self.node.external != external {
            self.node.external = external;
            *self.changed = true;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> LocationNode {
        LocationNode::new(RegionId(1), LocalId(4), "Market")
    }

    #[test]
    fn new_node_defaults() {
        let n = node();
        assert_eq!(n.location_ref(), LocationRef::of(1, 4));
        assert_eq!(n.name(), "Market");
        assert!(!n.is_indoor());
        assert_eq!(n.dwell_time(), 0);
        assert!(n.external().is_none());
    }

    #[test]
    fn setters_mark_dirty_only_on_change() {
        let mut n = node();
        let mut changed = false;
        {
            let mut handle = LocationMut::new(&mut n, &mut changed);
            handle.set_name("Market").set_dwell_time(0).set_indoor(false);
        }
        assert!(!changed);

        {
            let mut handle = LocationMut::new(&mut n, &mut changed);
            handle.set_dwell_time(15);
        }
        assert!(changed);
        assert_eq!(n.dwell_time(), 15);
    }

    #[test]
    fn external_handle_roundtrip() {
        let mut n = node();
        let mut changed = false;
        LocationMut::new(&mut n, &mut changed).set_external(Some(ExternalRef(99)));
        assert!(changed);
        assert_eq!(n.external(), Some(ExternalRef(99)));
    }
}
