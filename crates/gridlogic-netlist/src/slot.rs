//! One entry of the slot table.

use gridlogic_core::{GateId, GateKind};
use smallvec::SmallVec;

/// Inline capacity of per-gate edge lists. Most gates have a fan-in and
/// fan-out of four or fewer.
pub type EdgeList = SmallVec<[GateId; 4]>;

/// A gate slot: kind plus wiring.
///
/// State is not stored here; it lives in the net list's
/// [`StateBuffers`](crate::StateBuffers) so that it can be read and written
/// through a shared reference.
#[derive(Clone, Debug)]
pub struct GateSlot {
    pub(crate) kind: GateKind,
    pub(crate) inputs: EdgeList,
    pub(crate) outputs: EdgeList,
    pub(crate) occupied: bool,
}

impl GateSlot {
    pub(crate) fn new(kind: GateKind) -> Self {
        Self {
            kind,
            inputs: SmallVec::new(),
            outputs: SmallVec::new(),
            occupied: true,
        }
    }

    /// Reinitialise a vacant slot for a new gate.
    pub(crate) fn reoccupy(&mut self, kind: GateKind) {
        self.kind = kind;
        self.inputs.clear();
        self.outputs.clear();
        self.occupied = true;
    }

    /// Gate kind. Meaningless for a vacant slot.
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Driving gates, in connection order.
    pub fn inputs(&self) -> &[GateId] {
        &self.inputs
    }

    /// Driven gates. Order carries no meaning.
    pub fn outputs(&self) -> &[GateId] {
        &self.outputs
    }

    /// Whether the slot holds a live gate.
    pub fn is_occupied(&self) -> bool {
        self.occupied
    }
}
