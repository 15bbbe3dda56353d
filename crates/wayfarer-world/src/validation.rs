//! Aggregated validation reports.
//!
//! Validation passes never fail: they collect every problem they find into a
//! [`ValidationReport`] so import and authoring tools can show a complete
//! list in one pass. Errors are integrity problems that would corrupt
//! pathfinding; warnings are advisory (sparse ids, reusable slots).

use wayfarer_types::{LocalId, LocationRef, RegionEdgeId, RegionId};

/// An integrity problem found by a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A location is stored under a key that differs from its own id.
    #[error("region {region}: location stored as {key} records itself as {recorded}")]
    LocationKeyMismatch {
        /// Region holding the node.
        region: RegionId,
        /// Key the node is stored under.
        key: LocalId,
        /// Address recorded on the node.
        recorded: LocationRef,
    },

    /// A negative location id is present.
    #[error("region {region}: negative location id {local}")]
    NegativeLocationId {
        /// Region holding the node.
        region: RegionId,
        /// The offending id.
        local: LocalId,
    },

    /// A region is stored under a key that differs from its own id.
    #[error("region stored as {key} records itself as {recorded}")]
    RegionKeyMismatch {
        /// Key the region is stored under.
        key: RegionId,
        /// Id recorded on the region.
        recorded: RegionId,
    },

    /// More than one region edge shares an id.
    #[error("duplicate RegionEdge id {id} ({count} edges)")]
    DuplicateRegionEdgeId {
        /// The shared id.
        id: RegionEdgeId,
        /// How many edges carry it.
        count: usize,
    },

    /// A region edge endpoint names a region that does not exist.
    #[error("RegionEdge {edge} references non-existent Region {region}")]
    MissingRegion {
        /// The dangling edge.
        edge: RegionEdgeId,
        /// The missing region.
        region: RegionId,
    },

    /// A region edge endpoint names a location that does not exist.
    #[error("RegionEdge {edge} references non-existent Location {location}")]
    MissingLocation {
        /// The dangling edge.
        edge: RegionEdgeId,
        /// The missing location.
        location: LocationRef,
    },
}

/// An advisory finding from a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationWarning {
    /// The lowest location id is not zero.
    #[error("region {region}: location ids start at {first}, not 0")]
    LocationIdsDoNotStartAtZero {
        /// Region checked.
        region: RegionId,
        /// Lowest id present.
        first: LocalId,
    },

    /// The `0..=max` id range has holes.
    #[error("region {region}: {missing} unused location ids below the highest id")]
    LocationIdGaps {
        /// Region checked.
        region: RegionId,
        /// Number of unused ids in the range.
        missing: usize,
    },

    /// The exact unused ids, reported when empty-slot checks are requested.
    #[error("region {region}: empty location slots {slots:?}")]
    EmptyLocationSlots {
        /// Region checked.
        region: RegionId,
        /// Unused ids in ascending order.
        slots: Vec<LocalId>,
    },
}

/// Errors and warnings collected by one or more validation passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Create an empty report.
    pub const fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record an integrity problem.
    pub fn push_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Record an advisory finding.
    pub fn push_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Append everything from another report.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Collected errors.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Collected warnings.
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// Whether any integrity problem was found.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether the report has neither errors nor warnings.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}
