//! The instance tree and its resolution rules.

use gridlogic_core::{Address, AddressError, CircuitId, CompactionEpoch, GateId, Position};
use gridlogic_netlist::GateRemap;
use indexmap::IndexMap;

/// One elaborated circuit instance.
///
/// `values` maps the positions of leaf gates placed directly in this
/// instance to their flat ids. `branches` maps the positions of nested
/// instances to their own nodes. A position is in at most one of the two.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceNode {
    circuit: CircuitId,
    values: IndexMap<Position, GateId>,
    branches: IndexMap<Position, InstanceNode>,
}

impl InstanceNode {
    /// An empty instance of `circuit`.
    pub fn new(circuit: CircuitId) -> Self {
        Self {
            circuit,
            values: IndexMap::new(),
            branches: IndexMap::new(),
        }
    }

    /// Circuit definition elaborated by this instance.
    pub fn circuit(&self) -> CircuitId {
        self.circuit
    }

    /// Gate placed directly at `position`.
    pub fn value(&self, position: Position) -> Option<GateId> {
        self.values.get(&position).copied()
    }

    /// Nested instance placed at `position`.
    pub fn branch(&self, position: Position) -> Option<&InstanceNode> {
        self.branches.get(&position)
    }

    /// Leaf gates of this instance, in insertion order.
    pub fn values(&self) -> impl Iterator<Item = (Position, GateId)> + '_ {
        self.values.iter().map(|(p, g)| (*p, *g))
    }

    /// Nested instances, in insertion order.
    pub fn branches(&self) -> impl Iterator<Item = (Position, &InstanceNode)> + '_ {
        self.branches.iter().map(|(p, b)| (*p, b))
    }

    fn occupied(&self, position: Position) -> bool {
        self.values.contains_key(&position) || self.branches.contains_key(&position)
    }

    fn miss(&self, position: Position) -> AddressError {
        if self.values.contains_key(&position) {
            AddressError::NotABranch
        } else {
            AddressError::NotFound
        }
    }

    fn descend(&self, path: &[Position]) -> Result<&InstanceNode, AddressError> {
        let mut node = self;
        for &pos in path {
            node = node.branches.get(&pos).ok_or_else(|| node.miss(pos))?;
        }
        Ok(node)
    }

    fn descend_mut(&mut self, path: &[Position]) -> Result<&mut InstanceNode, AddressError> {
        let mut node = self;
        for &pos in path {
            let err = node.miss(pos);
            node = node.branches.get_mut(&pos).ok_or(err)?;
        }
        Ok(node)
    }

    fn count(&self) -> usize {
        self.values.len() + self.branches.values().map(InstanceNode::count).sum::<usize>()
    }

    fn collect_values(&self, out: &mut Vec<GateId>) {
        out.extend(self.values.values().copied());
        for branch in self.branches.values() {
            branch.collect_values(out);
        }
    }

    fn collect_entries(&self, prefix: &Address, out: &mut Vec<(Address, GateId)>) {
        for (&pos, &id) in &self.values {
            let mut addr = prefix.clone();
            addr.push(pos);
            out.push((addr, id));
        }
        for (&pos, branch) in &self.branches {
            let mut nested = prefix.clone();
            nested.push(pos);
            branch.collect_entries(&nested, out);
        }
    }

    fn collect_instances(&self, circuit: CircuitId, prefix: &Address, out: &mut Vec<Address>) {
        if self.circuit == circuit {
            out.push(prefix.clone());
        }
        for (&pos, branch) in &self.branches {
            let mut nested = prefix.clone();
            nested.push(pos);
            branch.collect_instances(circuit, &nested, out);
        }
    }

    fn forget(&mut self, id: GateId) -> usize {
        let before = self.values.len();
        self.values.retain(|_, g| *g != id);
        let nested: usize = self.branches.values_mut().map(|b| b.forget(id)).sum();
        before - self.values.len() + nested
    }

    fn remap(&mut self, remap: &GateRemap) {
        self.values.retain(|_, id| match remap.get(*id) {
            Some(new) => {
                *id = new;
                true
            }
            None => false,
        });
        for branch in self.branches.values_mut() {
            branch.remap(remap);
        }
    }
}

/// Maps hierarchical addresses to flat gate ids.
///
/// Resolution costs one hash lookup per address segment. Maps are
/// `IndexMap`s so that iteration order (and therefore every bulk result)
/// is deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressTree {
    root: InstanceNode,
    epoch: CompactionEpoch,
}

impl AddressTree {
    /// An empty tree whose root elaborates `circuit`.
    pub fn new(circuit: CircuitId) -> Self {
        Self {
            root: InstanceNode::new(circuit),
            epoch: CompactionEpoch::default(),
        }
    }

    /// The root instance.
    pub fn root(&self) -> &InstanceNode {
        &self.root
    }

    /// Net list compaction epoch the cached ids belong to.
    pub fn epoch(&self) -> CompactionEpoch {
        self.epoch
    }

    /// Number of leaf gates across all instances.
    pub fn len(&self) -> usize {
        self.root.count()
    }

    /// Whether the tree holds no leaf gates.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry and adopt `epoch`.
    pub fn clear(&mut self, epoch: CompactionEpoch) {
        self.root = InstanceNode::new(self.root.circuit);
        self.epoch = epoch;
    }

    // ── Resolution ─────────────────────────────────────────────

    /// The gate at `address`, if any.
    pub fn resolve(&self, address: &Address) -> Option<GateId> {
        let leaf = address.last()?;
        self.root.descend(address.parent_path()).ok()?.value(leaf)
    }

    /// The gate at `relative`, resolved inside the instance at `origin`.
    pub fn resolve_from(&self, origin: &Address, relative: &Address) -> Option<GateId> {
        let leaf = relative.last()?;
        self.root
            .descend(origin.segments())
            .and_then(|inst| inst.descend(relative.parent_path()))
            .ok()?
            .value(leaf)
    }

    /// The instance at `address`. The empty address names the root.
    pub fn instance(&self, address: &Address) -> Result<&InstanceNode, AddressError> {
        self.root.descend(address.segments())
    }

    // ── Maintenance ────────────────────────────────────────────

    /// Record that `address` names gate `id`.
    pub fn insert(&mut self, address: &Address, id: GateId) -> Result<(), AddressError> {
        let leaf = address.last().ok_or(AddressError::EmptyAddress)?;
        let parent = self.root.descend_mut(address.parent_path())?;
        if parent.occupied(leaf) {
            return Err(AddressError::PositionOccupied);
        }
        parent.values.insert(leaf, id);
        Ok(())
    }

    /// Forget the gate at `address` and return its id.
    pub fn remove(&mut self, address: &Address) -> Result<GateId, AddressError> {
        let leaf = address.last().ok_or(AddressError::EmptyAddress)?;
        let parent = self.root.descend_mut(address.parent_path())?;
        parent
            .values
            .shift_remove(&leaf)
            .ok_or(AddressError::NotFound)
    }

    /// Place a new, empty instance of `circuit` at `address`.
    pub fn make_branch(&mut self, address: &Address, circuit: CircuitId) -> Result<(), AddressError> {
        let leaf = address.last().ok_or(AddressError::EmptyAddress)?;
        let parent = self.root.descend_mut(address.parent_path())?;
        if parent.occupied(leaf) {
            return Err(AddressError::PositionOccupied);
        }
        parent.branches.insert(leaf, InstanceNode::new(circuit));
        Ok(())
    }

    /// Remove the instance at `address` with everything nested in it.
    ///
    /// Returns every gate id the instance contained so the caller can
    /// decommission them.
    pub fn remove_branch(&mut self, address: &Address) -> Result<Vec<GateId>, AddressError> {
        let leaf = address.last().ok_or(AddressError::EmptyAddress)?;
        let parent = self.root.descend_mut(address.parent_path())?;
        let err = parent.miss(leaf);
        let branch = parent.branches.shift_remove(&leaf).ok_or(err)?;
        let mut ids = Vec::new();
        branch.collect_values(&mut ids);
        Ok(ids)
    }

    /// Move the gate or instance at `from` to `to` within the same parent
    /// instance.
    pub fn move_entry(&mut self, from: &Address, to: Position) -> Result<(), AddressError> {
        let leaf = from.last().ok_or(AddressError::EmptyAddress)?;
        let parent = self.root.descend_mut(from.parent_path())?;
        if leaf == to {
            return if parent.occupied(leaf) {
                Ok(())
            } else {
                Err(AddressError::NotFound)
            };
        }
        if parent.occupied(to) {
            return Err(AddressError::PositionOccupied);
        }
        if let Some(id) = parent.values.shift_remove(&leaf) {
            parent.values.insert(to, id);
        } else if let Some(branch) = parent.branches.shift_remove(&leaf) {
            parent.branches.insert(to, branch);
        } else {
            return Err(AddressError::NotFound);
        }
        Ok(())
    }

    /// Drop every leaf entry that points at `id`, wherever it sits.
    /// Returns how many were dropped. Empty instances stay in place.
    pub fn forget(&mut self, id: GateId) -> usize {
        self.root.forget(id)
    }

    // ── Queries ────────────────────────────────────────────────

    /// Every gate id in the tree, depth first.
    pub fn all_values(&self) -> Vec<GateId> {
        let mut out = Vec::with_capacity(self.len());
        self.root.collect_values(&mut out);
        out
    }

    /// Every `(address, id)` pair in the tree, depth first.
    pub fn entries(&self) -> Vec<(Address, GateId)> {
        let mut out = Vec::new();
        self.root.collect_entries(&Address::new(), &mut out);
        out
    }

    /// Addresses of every instance elaborating `circuit`. The root, if it
    /// matches, is reported as the empty address.
    pub fn instances_of(&self, circuit: CircuitId) -> Vec<Address> {
        let mut out = Vec::new();
        self.root.collect_instances(circuit, &Address::new(), &mut out);
        out
    }

    /// Every address at which a gate placed at `position` of `circuit`
    /// appears once flattened.
    pub fn addresses_of(&self, circuit: CircuitId, position: Position) -> Vec<Address> {
        self.instances_of(circuit)
            .into_iter()
            .map(|mut a| {
                a.push(position);
                a
            })
            .collect()
    }

    // ── Compaction ─────────────────────────────────────────────

    /// Rewrite every cached id through `remap` and adopt its epoch.
    ///
    /// Entries whose gate no longer exists are dropped.
    pub fn on_compress(&mut self, remap: &GateRemap) {
        self.root.remap(remap);
        self.epoch = remap.epoch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlogic_core::GateKind;
    use gridlogic_netlist::NetList;
    use proptest::prelude::*;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn addr(ps: &[(i32, i32)]) -> Address {
        ps.iter().map(|&(x, y)| p(x, y)).collect()
    }

    const ROOT: CircuitId = CircuitId(0);
    const ADDER: CircuitId = CircuitId(1);
    const HALF: CircuitId = CircuitId(2);

    /// Root with one adder at (5,0); the adder holds a half adder at (1,1).
    fn nested() -> AddressTree {
        let mut t = AddressTree::new(ROOT);
        t.insert(&addr(&[(0, 0)]), GateId(0)).unwrap();
        t.make_branch(&addr(&[(5, 0)]), ADDER).unwrap();
        t.insert(&addr(&[(5, 0), (0, 0)]), GateId(1)).unwrap();
        t.make_branch(&addr(&[(5, 0), (1, 1)]), HALF).unwrap();
        t.insert(&addr(&[(5, 0), (1, 1), (2, 2)]), GateId(2)).unwrap();
        t
    }

    #[test]
    fn resolves_through_nested_instances() {
        let t = nested();
        assert_eq!(t.resolve(&addr(&[(0, 0)])), Some(GateId(0)));
        assert_eq!(t.resolve(&addr(&[(5, 0), (0, 0)])), Some(GateId(1)));
        assert_eq!(t.resolve(&addr(&[(5, 0), (1, 1), (2, 2)])), Some(GateId(2)));
        assert_eq!(t.resolve(&addr(&[(5, 0), (9, 9)])), None);
        assert_eq!(t.resolve(&Address::new()), None);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn resolve_from_origin() {
        let t = nested();
        let origin = addr(&[(5, 0)]);
        assert_eq!(t.resolve_from(&origin, &addr(&[(1, 1), (2, 2)])), Some(GateId(2)));
        assert_eq!(t.resolve_from(&origin, &addr(&[(0, 0)])), Some(GateId(1)));
        assert_eq!(t.resolve_from(&addr(&[(7, 7)]), &addr(&[(0, 0)])), None);
    }

    #[test]
    fn descending_through_a_leaf_is_not_a_branch() {
        let mut t = nested();
        assert_eq!(
            t.insert(&addr(&[(0, 0), (1, 1)]), GateId(9)),
            Err(AddressError::NotABranch)
        );
        assert_eq!(
            t.insert(&addr(&[(3, 3), (1, 1)]), GateId(9)),
            Err(AddressError::NotFound)
        );
        assert_eq!(
            t.insert(&Address::new(), GateId(9)),
            Err(AddressError::EmptyAddress)
        );
    }

    #[test]
    fn positions_hold_one_entry() {
        let mut t = nested();
        assert_eq!(
            t.insert(&addr(&[(5, 0)]), GateId(9)),
            Err(AddressError::PositionOccupied)
        );
        assert_eq!(
            t.make_branch(&addr(&[(0, 0)]), ADDER),
            Err(AddressError::PositionOccupied)
        );
    }

    #[test]
    fn remove_branch_returns_contained_ids() {
        let mut t = nested();
        let mut ids = t.remove_branch(&addr(&[(5, 0)])).unwrap();
        ids.sort();
        assert_eq!(ids, vec![GateId(1), GateId(2)]);
        assert_eq!(t.all_values(), vec![GateId(0)]);
        assert_eq!(
            t.remove_branch(&addr(&[(0, 0)])),
            Err(AddressError::NotABranch)
        );
    }

    #[test]
    fn remove_leaf() {
        let mut t = nested();
        assert_eq!(t.remove(&addr(&[(5, 0), (0, 0)])), Ok(GateId(1)));
        assert_eq!(t.remove(&addr(&[(5, 0), (0, 0)])), Err(AddressError::NotFound));
    }

    #[test]
    fn forget_drops_every_entry_for_an_id() {
        let mut t = nested();
        t.insert(&addr(&[(7, 7)]), GateId(2)).unwrap();
        assert_eq!(t.forget(GateId(2)), 2);
        assert_eq!(t.resolve(&addr(&[(7, 7)])), None);
        assert_eq!(t.resolve(&addr(&[(5, 0), (1, 1), (2, 2)])), None);
        let half = t.instance(&addr(&[(5, 0), (1, 1)])).unwrap();
        assert_eq!(half.values().count(), 0);
        assert_eq!(half.circuit(), HALF);
        assert_eq!(t.forget(GateId(2)), 0);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn move_entry_relocates_leaf_and_branch() {
        let mut t = nested();
        t.move_entry(&addr(&[(0, 0)]), p(4, 4)).unwrap();
        assert_eq!(t.resolve(&addr(&[(4, 4)])), Some(GateId(0)));
        assert_eq!(t.resolve(&addr(&[(0, 0)])), None);

        t.move_entry(&addr(&[(5, 0)]), p(6, 0)).unwrap();
        assert_eq!(t.resolve(&addr(&[(6, 0), (1, 1), (2, 2)])), Some(GateId(2)));

        assert_eq!(
            t.move_entry(&addr(&[(4, 4)]), p(6, 0)),
            Err(AddressError::PositionOccupied)
        );
        assert_eq!(
            t.move_entry(&addr(&[(8, 8)]), p(9, 9)),
            Err(AddressError::NotFound)
        );
    }

    #[test]
    fn instances_and_addresses_of_a_circuit() {
        let mut t = nested();
        t.make_branch(&addr(&[(9, 0)]), ADDER).unwrap();
        assert_eq!(t.instances_of(ADDER), vec![addr(&[(5, 0)]), addr(&[(9, 0)])]);
        assert_eq!(t.instances_of(ROOT), vec![Address::new()]);
        assert_eq!(
            t.addresses_of(HALF, p(2, 2)),
            vec![addr(&[(5, 0), (1, 1), (2, 2)])]
        );
    }

    #[test]
    fn entries_carry_full_addresses() {
        let t = nested();
        let entries = t.entries();
        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&(addr(&[(5, 0), (1, 1), (2, 2)]), GateId(2))));
    }

    #[test]
    fn compaction_rewrites_and_drops() {
        let mut n = NetList::new();
        let ids: Vec<_> = (0..5).map(|_| n.add_gate(GateKind::Or, true)).collect();
        let mut t = AddressTree::new(ROOT);
        for (i, id) in ids.iter().enumerate() {
            t.insert(&addr(&[(i as i32, 0)]), *id).unwrap();
        }
        n.decommission_gate(ids[1]).unwrap();
        n.decommission_gate(ids[3]).unwrap();
        let remap = n.compress_gates();
        t.on_compress(&remap);

        assert_eq!(t.epoch(), n.epoch());
        assert_eq!(t.resolve(&addr(&[(0, 0)])), Some(GateId(0)));
        assert_eq!(t.resolve(&addr(&[(1, 0)])), None);
        assert_eq!(t.resolve(&addr(&[(2, 0)])), Some(GateId(1)));
        assert_eq!(t.resolve(&addr(&[(4, 0)])), Some(GateId(2)));
        assert_eq!(t.len(), 3);
    }

    proptest! {
        #[test]
        fn inserted_leaves_resolve(
            points in proptest::collection::hash_set((-20i32..20, -20i32..20), 1..30),
        ) {
            let mut t = AddressTree::new(ROOT);
            t.make_branch(&addr(&[(100, 100)]), ADDER).unwrap();
            for (i, &(x, y)) in points.iter().enumerate() {
                t.insert(&addr(&[(100, 100), (x, y)]), GateId(i as u32)).unwrap();
            }
            for (i, &(x, y)) in points.iter().enumerate() {
                prop_assert_eq!(
                    t.resolve(&addr(&[(100, 100), (x, y)])),
                    Some(GateId(i as u32))
                );
            }
            prop_assert_eq!(t.len(), points.len());
        }
    }
}
