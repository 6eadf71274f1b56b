//! Reusable circuit fixtures.
//!
//! - [`junction_chain`]: a switch feeding `len` junctions in series.
//! - [`and_chain`]: `len` AND gates in series, each with its own switch.
//! - [`ring_oscillator`]: a ring of inverters.
//! - [`random_netlist`]: a seeded random graph over every gate kind.

use gridlogic_core::{GateId, GateKind, NetListError};
use gridlogic_netlist::NetList;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A switch followed by `len` junctions. Returns `(switch, last)`.
///
/// Junctions add no delay, so a change at the switch reaches `last` on
/// the next tick whatever `len` is.
pub fn junction_chain(
    netlist: &mut NetList,
    len: usize,
) -> Result<(GateId, GateId), NetListError> {
    let head = netlist.add_gate(GateKind::Switch, false);
    let mut prev = head;
    for _ in 0..len {
        let j = netlist.add_gate(GateKind::Junction, false);
        netlist.connect_gates(prev, j)?;
        prev = j;
    }
    Ok((head, prev))
}

/// Gates of an [`and_chain`].
#[derive(Clone, Debug)]
pub struct AndChain {
    /// One switch per stage; stage `i` ANDs `switches[i]` with stage `i - 1`.
    pub switches: Vec<GateId>,
    /// The AND gates, in order.
    pub stages: Vec<GateId>,
}

impl AndChain {
    /// The final stage, if the chain has any.
    pub fn output(&self) -> Option<GateId> {
        self.stages.last().copied()
    }
}

/// `len` AND gates in series. Stage 0 takes only its own switch; every
/// later stage takes its switch and the previous stage.
///
/// With every switch high, the output goes high after `len` ticks.
pub fn and_chain(netlist: &mut NetList, len: usize) -> Result<AndChain, NetListError> {
    let mut chain = AndChain {
        switches: Vec::with_capacity(len),
        stages: Vec::with_capacity(len),
    };
    for _ in 0..len {
        let sw = netlist.add_gate(GateKind::Switch, false);
        let gate = netlist.add_gate(GateKind::And, false);
        netlist.connect_gates(sw, gate)?;
        if let Some(&prev) = chain.stages.last() {
            netlist.connect_gates(prev, gate)?;
        }
        chain.switches.push(sw);
        chain.stages.push(gate);
    }
    Ok(chain)
}

/// `len` single-input NOR gates wired in a ring. Starting from all LOW,
/// every gate toggles on every tick.
pub fn ring_oscillator(netlist: &mut NetList, len: usize) -> Result<Vec<GateId>, NetListError> {
    let ids: Vec<GateId> = (0..len)
        .map(|_| netlist.add_gate(GateKind::Nor, false))
        .collect();
    for (i, &id) in ids.iter().enumerate() {
        netlist.connect_gates(id, ids[(i + 1) % len])?;
    }
    Ok(ids)
}

/// A random net list of `gates` gates and up to `edges` edges, reproducible
/// from `seed`. Duplicate edges drawn by the generator are skipped; roughly
/// one gate in eight is decommissioned afterwards to leave holes.
pub fn random_netlist(seed: u64, gates: usize, edges: usize) -> NetList {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut netlist = NetList::with_capacity(gates);
    for _ in 0..gates {
        let kind = GateKind::ALL[rng.random_range(0..GateKind::ALL.len())];
        netlist.add_gate(kind, false);
    }
    if gates == 0 {
        return netlist;
    }
    for _ in 0..edges {
        let src = GateId(rng.random_range(0..gates) as u32);
        let dst = GateId(rng.random_range(0..gates) as u32);
        let _ = netlist.connect_gates(src, dst);
    }
    for i in 0..gates {
        if rng.random_range(0..8) == 0 {
            let _ = netlist.decommission_gate(GateId(i as u32));
        }
    }
    for id in netlist.gate_ids().collect::<Vec<_>>() {
        let _ = netlist.set_state(id, rng.random::<bool>());
    }
    netlist
}
