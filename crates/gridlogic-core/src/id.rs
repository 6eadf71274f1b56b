//! Strongly-typed identifiers.

use std::fmt;

/// Identifies one gate slot in a net list.
///
/// Ids are dense indices into the slot table. They stay stable across
/// structural edits and are only renumbered by an explicit compaction,
/// which bumps the net list's [`CompactionEpoch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateId(pub u32);

impl GateId {
    /// The slot index this id refers to.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for GateId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a circuit definition (the thing a sub-circuit instance
/// elaborates).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CircuitId(pub u32);

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CircuitId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Counts id-renumbering compactions of a net list.
///
/// Incremented each time a compaction actually moves a gate, enabling
/// id-keyed caches to detect that they missed a remap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompactionEpoch(pub u64);

impl CompactionEpoch {
    /// The epoch following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for CompactionEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CompactionEpoch {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
