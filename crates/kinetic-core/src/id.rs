//! Strongly-typed species handle.

use std::fmt;

/// Identifies an atom species within an [`AtomicState`](crate::AtomicState).
///
/// Issued sequentially when a species is first seen during
/// [`AtomicState::add`](crate::AtomicState::add), so the handles of a
/// populated state are exactly `0..num_species`. Force kernels use
/// `SpeciesId(n).index()` to address flattened `T x T` tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpeciesId(pub u32);

impl SpeciesId {
    /// The handle as a table index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SpeciesId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
