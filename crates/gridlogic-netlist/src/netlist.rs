//! The slot table, free list and tick passes.

use std::ops::Range;

use gridlogic_core::{CompactionEpoch, GateId, GateKind, NetListError};

use crate::remap::GateRemap;
use crate::slot::GateSlot;
use crate::state::StateBuffers;

/// A flat network of gates.
///
/// Ids are dense slot indices. Decommissioned slots stay in the table as
/// holes and their ids go onto a LIFO free list until either a
/// reuse-preferring [`add_gate`](Self::add_gate) takes them back or
/// [`compress_gates`](Self::compress_gates) renumbers the table.
///
/// # Invariants
///
/// - Every id in the edge lists of an occupied slot refers to an occupied
///   slot.
/// - `outputs[a]` contains `b` iff `inputs[b]` contains `a`, and neither
///   list holds duplicates.
/// - A slot is vacant iff its id is on the free list.
#[derive(Debug, Default)]
pub struct NetList {
    slots: Vec<GateSlot>,
    free: Vec<GateId>,
    state: StateBuffers,
    epoch: CompactionEpoch,
    occupied: usize,
}

impl NetList {
    /// An empty net list.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty net list with room for `capacity` gates.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut netlist = Self::new();
        netlist.reserve(capacity);
        netlist
    }

    // ── Structure ──────────────────────────────────────────────

    /// Reserve room for `additional` more gates.
    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
        self.state.reserve(additional);
    }

    /// Add a gate of `kind` and return its id.
    ///
    /// With `prefer_reuse` and a non-empty free list, the most recently
    /// freed id is reinitialised and returned. Otherwise a new slot is
    /// appended. The gate starts in [`GateKind::reset_state`].
    pub fn add_gate(&mut self, kind: GateKind, prefer_reuse: bool) -> GateId {
        let initial = kind.reset_state();
        let reused = if prefer_reuse { self.free.pop() } else { None };
        let id = match reused {
            Some(id) => {
                self.slots[id.index()].reoccupy(kind);
                self.state.set_both(id.index(), initial);
                self.state.mark_powered_dirty();
                id
            }
            None => {
                let id = GateId(self.slots.len() as u32);
                self.slots.push(GateSlot::new(kind));
                self.state.push(initial);
                id
            }
        };
        self.occupied += 1;
        id
    }

    /// The id the next [`add_gate`](Self::add_gate) with the same
    /// `prefer_reuse` will return.
    pub fn next_gate_id(&self, prefer_reuse: bool) -> GateId {
        match self.free.last() {
            Some(&id) if prefer_reuse => id,
            _ => GateId(self.slots.len() as u32),
        }
    }

    /// Wire `src` as an input of `dst`.
    ///
    /// Self loops are allowed. Fails without side effects when either id
    /// is unknown or vacant, or the edge already exists.
    pub fn connect_gates(&mut self, src: GateId, dst: GateId) -> Result<(), NetListError> {
        self.check(src)?;
        self.check(dst)?;
        if self.slots[src.index()].outputs.contains(&dst) {
            return Err(NetListError::EdgeExists { src, dst });
        }
        self.slots[src.index()].outputs.push(dst);
        self.slots[dst.index()].inputs.push(src);
        self.state.mark_powered_dirty();
        Ok(())
    }

    /// Remove the edge `src → dst`.
    ///
    /// The remaining inputs of `dst` keep their relative order. Fails
    /// without side effects when either id is unknown or vacant, or the
    /// edge does not exist.
    pub fn disconnect_gates(&mut self, src: GateId, dst: GateId) -> Result<(), NetListError> {
        self.check(src)?;
        self.check(dst)?;
        let outputs = &mut self.slots[src.index()].outputs;
        let Some(pos) = outputs.iter().position(|&g| g == dst) else {
            return Err(NetListError::EdgeMissing { src, dst });
        };
        outputs.remove(pos);
        self.slots[dst.index()].inputs.retain(|g| *g != src);
        self.state.mark_powered_dirty();
        Ok(())
    }

    /// Remove a gate: unwire it from every neighbour, clear its state and
    /// push its id onto the free list.
    pub fn decommission_gate(&mut self, id: GateId) -> Result<(), NetListError> {
        self.check(id)?;
        let slot = &mut self.slots[id.index()];
        let inputs = std::mem::take(&mut slot.inputs);
        let outputs = std::mem::take(&mut slot.outputs);
        slot.occupied = false;

        for src in inputs {
            self.slots[src.index()].outputs.retain(|g| *g != id);
        }
        for dst in outputs {
            self.slots[dst.index()].inputs.retain(|g| *g != id);
        }

        self.state.set_both(id.index(), false);
        self.state.set_powered(id.index(), false);
        self.state.mark_powered_dirty();
        self.free.push(id);
        self.occupied -= 1;
        Ok(())
    }

    /// Renumber occupied slots densely, preserving their relative order.
    ///
    /// Rewrites every edge list and moves state with its gate. Empties the
    /// free list. The compaction epoch is bumped only when some id
    /// actually changed. Runs in O(slots + edges).
    pub fn compress_gates(&mut self) -> GateRemap {
        let mut table = Vec::with_capacity(self.slots.len());
        let mut next = 0u32;
        let mut moved = false;
        for (old, slot) in self.slots.iter().enumerate() {
            if slot.occupied {
                moved |= next as usize != old;
                table.push(Some(GateId(next)));
                next += 1;
            } else {
                table.push(None);
            }
        }

        let old_slots = std::mem::take(&mut self.slots);
        self.slots = old_slots
            .into_iter()
            .filter(|s| s.occupied)
            .map(|mut s| {
                for g in s.inputs.iter_mut().chain(s.outputs.iter_mut()) {
                    // Edges only reference occupied slots, which all have a new id.
                    if let Some(new) = table[g.index()] {
                        *g = new;
                    }
                }
                s
            })
            .collect();

        self.state.compact(&table, self.slots.len());
        self.free.clear();
        if moved {
            self.epoch = self.epoch.next();
        }
        GateRemap::new(table, self.epoch)
    }

    /// Drop every gate. Bumps the compaction epoch, since every cached id
    /// is now invalid.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.state.clear();
        self.occupied = 0;
        self.epoch = self.epoch.next();
    }

    fn check(&self, id: GateId) -> Result<&GateSlot, NetListError> {
        match self.slots.get(id.index()) {
            None => Err(NetListError::UnknownGate { id }),
            Some(slot) if !slot.occupied => Err(NetListError::VacantGate { id }),
            Some(slot) => Ok(slot),
        }
    }

    // ── Accessors ──────────────────────────────────────────────

    /// Slot `id`, occupied or not.
    pub fn slot(&self, id: GateId) -> Option<&GateSlot> {
        self.slots.get(id.index())
    }

    /// Kind of an occupied gate.
    pub fn kind(&self, id: GateId) -> Option<GateKind> {
        self.check(id).ok().map(|s| s.kind)
    }

    /// Inputs of `id`. Empty for unknown or vacant ids.
    pub fn inputs(&self, id: GateId) -> &[GateId] {
        self.check(id).map(|s| s.inputs()).unwrap_or(&[])
    }

    /// Outputs of `id`. Empty for unknown or vacant ids.
    pub fn outputs(&self, id: GateId) -> &[GateId] {
        self.check(id).map(|s| s.outputs()).unwrap_or(&[])
    }

    /// Whether `id` names an occupied slot.
    pub fn is_occupied(&self, id: GateId) -> bool {
        self.check(id).is_ok()
    }

    /// Number of occupied slots.
    pub fn gate_count(&self) -> usize {
        self.occupied
    }

    /// Number of slots, holes included.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of ids on the free list.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Current compaction epoch.
    pub fn epoch(&self) -> CompactionEpoch {
        self.epoch
    }

    /// Ids of all occupied slots, ascending.
    pub fn gate_ids(&self) -> impl Iterator<Item = GateId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.occupied)
            .map(|(i, _)| GateId(i as u32))
    }

    /// The underlying state buffers.
    pub fn state(&self) -> &StateBuffers {
        &self.state
    }

    // ── State ──────────────────────────────────────────────────

    /// Current state of `id`. Unknown and vacant ids read LOW.
    pub fn get_state(&self, id: GateId) -> bool {
        self.state.current(id.index())
    }

    /// Overwrite the state of an occupied gate in both buffers.
    ///
    /// Allowed on every kind. Evaluated kinds are overwritten again by the
    /// next tick; `Switch` holds the value.
    pub fn set_state(&self, id: GateId, state: bool) -> Result<(), NetListError> {
        self.check(id)?;
        self.state.set_both(id.index(), state);
        self.state.mark_powered_dirty();
        Ok(())
    }

    /// Current states of `ids`, in order. Unknown and vacant ids read LOW.
    pub fn get_bulk_states(&self, ids: &[GateId]) -> Vec<bool> {
        let current = self.state.current_buffer();
        ids.iter()
            .map(|id| self.is_occupied(*id) && current[id.index()].load_relaxed())
            .collect()
    }

    /// Snapshot of every slot's current state; `None` for holes.
    pub fn current_states(&self) -> Vec<Option<bool>> {
        let current = self.state.current_buffer();
        self.slots
            .iter()
            .zip(current)
            .map(|(slot, s)| slot.occupied.then(|| s.load_relaxed()))
            .collect()
    }

    /// Whether `id` is powered, i.e. driven high (or high itself, for
    /// gates without inputs).
    pub fn is_powered(&self, id: GateId) -> bool {
        self.state.powered(id.index())
    }

    /// Return every occupied gate to its kind's reset state.
    pub fn reset_states(&self) {
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.occupied {
                self.state.set_both(i, slot.kind.reset_state());
            }
        }
        self.state.mark_powered_dirty();
    }

    // ── Tick passes ────────────────────────────────────────────

    /// Settle every junction from the current buffer, before the gates are
    /// evaluated.
    ///
    /// A junction is high iff a chain of junctions links it to a high
    /// non-junction gate. The result goes into both buffers, so gates
    /// evaluated later in the same tick already see it. Junctions whose
    /// state changed are appended to `changed`.
    ///
    /// Must not overlap [`compute_range`](Self::compute_range).
    pub fn resolve_junctions(&self, changed: &mut Vec<GateId>) {
        let current = self.state.current_buffer();
        let mut high = vec![false; self.slots.len()];
        let mut stack = Vec::new();
        for (i, slot) in self.slots.iter().enumerate() {
            if !slot.occupied || slot.kind == GateKind::Junction || !current[i].load_relaxed() {
                continue;
            }
            stack.extend(slot.outputs.iter().map(|g| g.index()));
        }
        while let Some(i) = stack.pop() {
            let slot = &self.slots[i];
            if high[i] || slot.kind != GateKind::Junction {
                continue;
            }
            high[i] = true;
            stack.extend(slot.outputs.iter().map(|g| g.index()));
        }

        for (i, slot) in self.slots.iter().enumerate() {
            if !slot.occupied || slot.kind != GateKind::Junction {
                continue;
            }
            if high[i] != current[i].load_relaxed() {
                changed.push(GateId(i as u32));
            }
            self.state.set_both(i, high[i]);
        }
    }

    /// Evaluate every occupied gate whose index falls in `range`, writing
    /// the next buffer. Gates whose next state differs from their current
    /// state are appended to `changed`.
    ///
    /// Disjoint ranges may run concurrently.
    pub fn compute_range(&self, range: Range<usize>, changed: &mut Vec<GateId>) {
        let end = range.end.min(self.slots.len());
        let start = range.start.min(end);
        let current = self.state.current_buffer();
        let next = self.state.next_buffer();
        for (offset, slot) in self.slots[start..end].iter().enumerate() {
            if !slot.occupied || matches!(slot.kind, GateKind::Switch | GateKind::Junction) {
                // Both already hold their state in both buffers.
                continue;
            }
            let i = start + offset;
            let cur = current[i].load_relaxed();
            let new = slot.kind.evaluate(
                cur,
                slot.inputs.iter().map(|g| current[g.index()].load_relaxed()),
            );
            next[i].store_relaxed(new);
            if new != cur {
                changed.push(GateId(i as u32));
            }
        }
    }

    /// Settle junctions, then evaluate the whole table on the calling
    /// thread.
    pub fn compute_next_state(&self) -> Vec<GateId> {
        let mut changed = Vec::new();
        self.resolve_junctions(&mut changed);
        self.compute_range(0..self.slots.len(), &mut changed);
        changed
    }

    /// Update powered flags from the next buffer.
    ///
    /// Walks only the outputs of `changed` gates, unless a structural edit
    /// or an external write requested a full recompute.
    pub fn propagate_powered(&self, changed: &[GateId]) {
        if self.state.take_powered_dirty() {
            for i in 0..self.slots.len() {
                self.refresh_powered(i);
            }
            return;
        }
        for id in changed {
            let Some(slot) = self.slots.get(id.index()) else {
                continue;
            };
            if slot.inputs.is_empty() {
                self.refresh_powered(id.index());
            }
            for out in &slot.outputs {
                self.refresh_powered(out.index());
            }
        }
    }

    fn refresh_powered(&self, i: usize) {
        let slot = &self.slots[i];
        let powered = slot.occupied
            && if slot.inputs.is_empty() {
                self.state.next(i)
            } else {
                slot.inputs.iter().any(|g| self.state.next(g.index()))
            };
        self.state.set_powered(i, powered);
    }

    /// Make the next buffer current.
    pub fn swap_states(&self) {
        self.state.swap();
    }

    /// One full tick on the calling thread. Returns the number of gates
    /// that changed state.
    pub fn tick(&self) -> usize {
        let changed = self.compute_next_state();
        self.propagate_powered(&changed);
        self.swap_states();
        changed.len()
    }
}

/// Relaxed load/store shorthands for state bits.
trait RelaxedBit {
    fn load_relaxed(&self) -> bool;
    fn store_relaxed(&self, v: bool);
}

impl RelaxedBit for std::sync::atomic::AtomicBool {
    #[inline]
    fn load_relaxed(&self) -> bool {
        self.load(std::sync::atomic::Ordering::Relaxed)
    }

    #[inline]
    fn store_relaxed(&self, v: bool) {
        self.store(v, std::sync::atomic::Ordering::Relaxed)
    }
}
