//! Type-safe integer identifier wrappers.
//!
//! Every node and link in the terrain graph has a stable integer identity so
//! that an external persistence layer can address it without knowing the
//! graph's in-memory layout. Each kind of id gets its own newtype to prevent
//! accidental mixing at compile time: a Region's local location id and a
//! Terrain-wide region edge id are both plain integers on disk, but never
//! interchangeable in code.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `i32` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Wrap a raw integer id.
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            /// Return the inner integer value.
            pub const fn into_inner(self) -> i32 {
                self.0
            }

            /// Whether the raw value is negative (never a valid stored id).
            pub const fn is_negative(self) -> bool {
                self.0 < 0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(raw: i32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a Region, unique within a Terrain.
    RegionId
}

define_id! {
    /// Identifier of a location node, unique only within its owning Region.
    LocalId
}

define_id! {
    /// Identifier of an inter-region link, unique within a Terrain and
    /// independent of every Region's local id space.
    RegionEdgeId
}

/// Globally unique address of a location node: `(region, local)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationRef {
    /// Owning region.
    pub region: RegionId,
    /// Id of the node inside that region.
    pub local: LocalId,
}

impl LocationRef {
    /// Build a reference from raw region and local ids.
    pub const fn new(region: RegionId, local: LocalId) -> Self {
        Self { region, local }
    }

    /// Shorthand for tests and scripted world-building.
    pub const fn of(region: i32, local: i32) -> Self {
        Self {
            region: RegionId(region),
            local: LocalId(local),
        }
    }
}

impl core::fmt::Display for LocationRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.region, self.local)
    }
}

/// Opaque handle that external systems attach to nodes and links.
///
/// The graph core stores and returns it but never inspects it; callers map
/// it to whatever metadata they own (NPC ids, script objects, asset keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalRef(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_ref_orders_by_region_then_local() {
        let a = LocationRef::of(1, 9);
        let b = LocationRef::of(2, 0);
        let c = LocationRef::of(2, 3);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn location_ref_display() {
        assert_eq!(LocationRef::of(4, 17).to_string(), "4:17");
    }

    #[test]
    fn negative_ids_are_detectable() {
        assert!(LocalId(-1).is_negative());
        assert!(!LocalId(0).is_negative());
    }

    #[test]
    fn ids_serialize_as_plain_integers() {
        let json = serde_json::to_string(&RegionEdgeId(42)).ok();
        assert_eq!(json.as_deref(), Some("42"));
        let restored: Option<LocalId> = serde_json::from_str("7").ok();
        assert_eq!(restored, Some(LocalId(7)));
    }
}
