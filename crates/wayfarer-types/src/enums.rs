//! Enumeration types shared across the terrain graph.

use serde::{Deserialize, Serialize};

/// Which direction(s) of a two-way link an operation applies to.
///
/// Links are stored as an ordered endpoint pair `(a, b)`, so `AToB` means
/// "departing from the first endpoint".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Departing from endpoint `a` towards `b`.
    AToB,
    /// Departing from endpoint `b` towards `a`.
    BToA,
    /// Both directions at once.
    Both,
}

impl Direction {
    /// Whether this selector covers travel from `a` to `b`.
    pub const fn includes_a_to_b(self) -> bool {
        matches!(self, Self::AToB | Self::Both)
    }

    /// Whether this selector covers travel from `b` to `a`.
    pub const fn includes_b_to_a(self) -> bool {
        matches!(self, Self::BToA | Self::Both)
    }

    /// The opposite single direction. `Both` maps to itself.
    pub const fn reversed(self) -> Self {
        match self {
            Self::AToB => Self::BToA,
            Self::BToA => Self::AToB,
            Self::Both => Self::Both,
        }
    }
}
