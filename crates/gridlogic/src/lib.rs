//! gridlogic: a parallel, tick-driven logic gate simulation engine.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all gridlogic sub-crates. For most users, adding `gridlogic` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use gridlogic::prelude::*;
//! use std::sync::Arc;
//!
//! let ev = Evaluator::new(EngineConfig::default(), Arc::new(NullSink)).unwrap();
//! let (a, b, out) = (
//!     Address::leaf(Position::new(0, 0)),
//!     Address::leaf(Position::new(0, 1)),
//!     Address::leaf(Position::new(1, 0)),
//! );
//! ev.edit(|s| {
//!     s.add_gate_at(&a, GateKind::Switch, true)?;
//!     s.add_gate_at(&b, GateKind::Switch, true)?;
//!     s.add_gate_at(&out, GateKind::Xor, true)?;
//!     s.connect_at(&a, &out)?;
//!     s.connect_at(&b, &out)
//! })
//! .unwrap();
//!
//! ev.set_bulk_states(&[a, b], &[true, false]).unwrap();
//! ev.step(1).unwrap();
//! assert!(ev.get_state(&out));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `gridlogic-core` | IDs, addresses, gate kinds, errors |
//! | [`netlist`] | `gridlogic-netlist` | Gate storage, double-buffered state, compaction |
//! | [`address`] | `gridlogic-address` | Hierarchical address tree |
//! | [`engine`] | `gridlogic-engine` | Evaluator, worker pool, tick-rate governor, log sinks |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs and errors (`gridlogic-core`).
pub use gridlogic_core as types;

/// Gate storage and tick passes (`gridlogic-netlist`).
///
/// [`netlist::NetList`] can be ticked directly on one thread, without an
/// evaluator, which is handy for tests and offline analysis.
pub use gridlogic_netlist as netlist;

/// Hierarchical address tree (`gridlogic-address`).
pub use gridlogic_address as address;

/// Evaluator and its supporting pieces (`gridlogic-engine`).
pub use gridlogic_engine as engine;

/// Common imports for typical gridlogic usage.
///
/// ```rust
/// use gridlogic::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use gridlogic_core::{Address, CircuitId, GateId, GateKind, Position};

    // Errors
    pub use gridlogic_core::{AddressError, NetListError};
    pub use gridlogic_engine::{ConfigError, EngineError};

    // Storage
    pub use gridlogic_address::AddressTree;
    pub use gridlogic_netlist::{GateRemap, NetList};

    // Engine
    pub use gridlogic_engine::{
        EditSession, EngineConfig, Evaluator, LogSink, NullSink, TickMetrics, TracingSink,
    };
}
