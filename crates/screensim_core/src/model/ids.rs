//! Unique identifiers for simulation entities
//!
//! Each entity type has its own ID type to provide type safety and prevent
//! mixing up different kinds of identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a health state (row/column of the rate matrix)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(pub u16);

impl StateId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state #{}", self.0)
    }
}

/// Unique identifier for a Cohort within a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CohortId(pub u32);

impl fmt::Display for CohortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cohort {}", self.0)
    }
}

/// Unique identifier for a simulated individual.
///
/// The id doubles as the seed of the individual's random stream. Ids are
/// scoped to their cohort: the upper 32 bits carry the cohort id and the
/// lower 32 bits the position within the cohort, so two cohorts never share
/// a seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatientId(pub u64);

impl PatientId {
    #[must_use]
    pub fn new(cohort: CohortId, index: u32) -> Self {
        Self((u64::from(cohort.0) << 32) | u64::from(index))
    }

    /// Seed for this patient's private random stream
    #[inline]
    pub fn seed(self) -> u64 {
        self.0
    }

    pub fn cohort(self) -> CohortId {
        CohortId((self.0 >> 32) as u32)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "patient {}", self.0)
    }
}
