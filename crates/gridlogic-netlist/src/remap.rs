//! Old → new id table produced by compaction.

use gridlogic_core::{CompactionEpoch, GateId};

/// Result of [`NetList::compress_gates`](crate::NetList::compress_gates).
///
/// Indexed by old id. `None` marks a slot that was vacant and therefore
/// has no new id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateRemap {
    table: Vec<Option<GateId>>,
    epoch: CompactionEpoch,
}

impl GateRemap {
    pub(crate) fn new(table: Vec<Option<GateId>>, epoch: CompactionEpoch) -> Self {
        Self { table, epoch }
    }

    /// New id of `old`, or `None` if `old` was vacant or out of range.
    pub fn get(&self, old: GateId) -> Option<GateId> {
        self.table.get(old.index()).copied().flatten()
    }

    /// Net list epoch after the compaction.
    pub fn epoch(&self) -> CompactionEpoch {
        self.epoch
    }

    /// Number of old slots covered.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table covers no slots.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Whether every surviving gate kept its id.
    pub fn is_identity(&self) -> bool {
        self.moved().next().is_none()
    }

    /// `(old, new)` for every gate whose id changed.
    pub fn moved(&self) -> impl Iterator<Item = (GateId, GateId)> + '_ {
        self.table.iter().enumerate().filter_map(|(old, new)| {
            let new = (*new)?;
            (new.index() != old).then_some((GateId(old as u32), new))
        })
    }

    /// Number of vacant slots dropped.
    pub fn removed_count(&self) -> usize {
        self.table.iter().filter(|n| n.is_none()).count()
    }
}
