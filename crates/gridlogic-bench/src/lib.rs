//! Benchmark profiles and utilities for the gridlogic engine.
//!
//! - [`reference_profile`]: engine config used by every tick benchmark
//! - [`build_lattice`]: an XOR lattice of `width × height` gates fed by a
//!   column of switches
//! - [`input_pattern`]: deterministic switch values via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use gridlogic_core::{Address, GateKind, Position};
use gridlogic_engine::{EditSession, EngineConfig, EngineError};

/// Paused, unpaced, auto-sized worker pool. Benchmarks drive ticks with
/// [`Evaluator::step`](gridlogic_engine::Evaluator::step).
pub fn reference_profile() -> EngineConfig {
    EngineConfig {
        use_tickrate: false,
        start_paused: true,
        ..Default::default()
    }
}

/// Address of the switch feeding row `y`.
pub fn input_address(y: i32) -> Address {
    Address::leaf(Position::new(-1, y))
}

/// Address of lattice cell `(x, y)`.
pub fn cell_address(x: i32, y: i32) -> Address {
    Address::leaf(Position::new(x, y))
}

/// Build a `width × height` XOR lattice.
///
/// Cell `(x, y)` XORs its left neighbour (or the row switch when `x == 0`)
/// with the cell above it. Returns the number of gates added, which is
/// `width * height + height`.
pub fn build_lattice(
    session: &mut EditSession<'_>,
    width: i32,
    height: i32,
) -> Result<usize, EngineError> {
    let total = (width.max(0) as usize + 1) * height.max(0) as usize;
    session.reserve(total);
    for y in 0..height {
        session.add_gate_at(&input_address(y), GateKind::Switch, false)?;
        for x in 0..width {
            let here = cell_address(x, y);
            session.add_gate_at(&here, GateKind::Xor, false)?;
            let left = if x == 0 {
                input_address(y)
            } else {
                cell_address(x - 1, y)
            };
            session.connect_at(&left, &here)?;
            if y > 0 {
                session.connect_at(&cell_address(x, y - 1), &here)?;
            }
        }
    }
    Ok(total)
}

/// Deterministic switch addresses and values for a lattice of `height`
/// rows.
pub fn input_pattern(height: i32, seed: u64) -> (Vec<Address>, Vec<bool>) {
    let addresses = (0..height).map(input_address).collect();
    let values = (0..height as u64)
        .map(|i| {
            let h = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(i.wrapping_mul(1442695040888963407));
            (h >> 33) & 1 == 1
        })
        .collect();
    (addresses, values)
}
