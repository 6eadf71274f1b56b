//! Double-buffered gate state.
//!
//! Two `Vec<AtomicBool>` buffers alternate between the *current* role
//! (read by evaluation and by external callers) and the *next* role
//! (written by evaluation). Flipping roles is a single `fetch_xor` on the
//! front index, so a swap costs O(1) regardless of gate count.
//!
//! Individual state bits use `Relaxed` ordering. Cross-thread visibility
//! of a whole tick is established by the `AcqRel` swap of the front index
//! and by the worker pool's completion counter.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use gridlogic_core::GateId;

/// Two alternating state buffers plus per-gate powered flags.
pub struct StateBuffers {
    buffers: [Vec<AtomicBool>; 2],
    front: AtomicUsize,
    powered: Vec<AtomicBool>,
    powered_dirty: AtomicBool,
}

impl StateBuffers {
    /// Empty buffers.
    pub fn new() -> Self {
        Self {
            buffers: [Vec::new(), Vec::new()],
            front: AtomicUsize::new(0),
            powered: Vec::new(),
            powered_dirty: AtomicBool::new(false),
        }
    }

    /// Number of gate entries.
    pub fn len(&self) -> usize {
        self.powered.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.powered.is_empty()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        for buf in &mut self.buffers {
            buf.reserve(additional);
        }
        self.powered.reserve(additional);
    }

    /// Append an entry whose current and next state are both `state`.
    pub(crate) fn push(&mut self, state: bool) {
        for buf in &mut self.buffers {
            buf.push(AtomicBool::new(state));
        }
        self.powered.push(AtomicBool::new(false));
        self.mark_powered_dirty();
    }

    pub(crate) fn clear(&mut self) {
        for buf in &mut self.buffers {
            buf.clear();
        }
        self.powered.clear();
        *self.front.get_mut() = 0;
        *self.powered_dirty.get_mut() = false;
    }

    #[inline]
    fn front_index(&self) -> usize {
        self.front.load(Ordering::Acquire) & 1
    }

    /// The buffer currently holding the *current* state.
    #[inline]
    pub(crate) fn current_buffer(&self) -> &[AtomicBool] {
        &self.buffers[self.front_index()]
    }

    /// The buffer currently receiving the *next* state.
    #[inline]
    pub(crate) fn next_buffer(&self) -> &[AtomicBool] {
        &self.buffers[self.front_index() ^ 1]
    }

    /// Current state of entry `index`, or `false` when out of range.
    #[inline]
    pub fn current(&self, index: usize) -> bool {
        self.current_buffer()
            .get(index)
            .is_some_and(|b| b.load(Ordering::Relaxed))
    }

    /// Next state of entry `index`, or `false` when out of range.
    #[inline]
    pub fn next(&self, index: usize) -> bool {
        self.next_buffer()
            .get(index)
            .is_some_and(|b| b.load(Ordering::Relaxed))
    }

    /// Write `state` into both buffers.
    ///
    /// A write that lands between evaluation and the swap survives the
    /// swap, so a held source never loses an external write.
    pub(crate) fn set_both(&self, index: usize, state: bool) {
        for buf in &self.buffers {
            if let Some(b) = buf.get(index) {
                b.store(state, Ordering::Relaxed);
            }
        }
    }

    /// Flip the current and next roles.
    pub(crate) fn swap(&self) {
        self.front.fetch_xor(1, Ordering::AcqRel);
    }

    /// Powered flag of entry `index`.
    #[inline]
    pub fn powered(&self, index: usize) -> bool {
        self.powered
            .get(index)
            .is_some_and(|b| b.load(Ordering::Relaxed))
    }

    pub(crate) fn set_powered(&self, index: usize, powered: bool) {
        if let Some(b) = self.powered.get(index) {
            b.store(powered, Ordering::Relaxed);
        }
    }

    /// Request a full powered-flag recompute on the next propagation.
    pub(crate) fn mark_powered_dirty(&self) {
        self.powered_dirty.store(true, Ordering::Release);
    }

    /// Consume the dirty bit.
    pub(crate) fn take_powered_dirty(&self) -> bool {
        self.powered_dirty.swap(false, Ordering::AcqRel)
    }

    /// Rebuild both buffers in the new id order given by `table`
    /// (old index → new id). Both buffers receive the current state.
    pub(crate) fn compact(&mut self, table: &[Option<GateId>], new_len: usize) {
        let front = *self.front.get_mut() & 1;
        let mut states = vec![false; new_len];
        let mut powered = vec![false; new_len];
        for (old, new) in table.iter().enumerate() {
            if let Some(new) = new {
                states[new.index()] = *self.buffers[front][old].get_mut();
                powered[new.index()] = *self.powered[old].get_mut();
            }
        }
        let build = |v: &[bool]| v.iter().map(|&s| AtomicBool::new(s)).collect::<Vec<_>>();
        self.buffers = [build(&states), build(&states)];
        self.powered = build(&powered);
        *self.front.get_mut() = 0;
    }
}

impl Default for StateBuffers {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateBuffers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateBuffers")
            .field("len", &self.len())
            .field("front", &self.front_index())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_flips_roles() {
        let mut s = StateBuffers::new();
        s.push(false);
        s.next_buffer()[0].store(true, Ordering::Relaxed);
        assert!(!s.current(0));
        assert!(s.next(0));
        s.swap();
        assert!(s.current(0));
        assert!(!s.next(0));
    }

    #[test]
    fn set_both_survives_swap() {
        let mut s = StateBuffers::new();
        s.push(false);
        s.set_both(0, true);
        s.swap();
        assert!(s.current(0));
        s.swap();
        assert!(s.current(0));
    }

    #[test]
    fn out_of_range_reads_low() {
        let s = StateBuffers::new();
        assert!(!s.current(3));
        assert!(!s.next(3));
        assert!(!s.powered(3));
        s.set_both(3, true);
    }

    #[test]
    fn compact_moves_current_state() {
        let mut s = StateBuffers::new();
        for v in [true, false, false, true] {
            s.push(v);
        }
        s.swap();
        s.swap();
        let table = [Some(GateId(0)), None, None, Some(GateId(1))];
        s.compact(&table, 2);
        assert_eq!(s.len(), 2);
        assert!(s.current(0));
        assert!(s.current(1));
        assert!(s.next(1));
    }

    #[test]
    fn dirty_bit_is_consumed_once() {
        let mut s = StateBuffers::new();
        s.push(false);
        assert!(s.take_powered_dirty());
        assert!(!s.take_powered_dirty());
        s.mark_powered_dirty();
        assert!(s.take_powered_dirty());
    }
}
