//! Parallel tick evaluator for gridlogic net lists.
//!
//! An [`Evaluator`] owns a [`NetList`](gridlogic_netlist::NetList), the
//! [`AddressTree`](gridlogic_address::AddressTree) that names its gates, a
//! persistent [`WorkerPool`] and a tick thread. Each tick settles
//! junctions, computes every other gate's next state in parallel from the
//! current buffer, updates powered flags, then swaps buffers. The tick thread paces itself to a target rate
//! and reports the rate it actually achieves.
//!
//! ```no_run
//! use gridlogic_core::{Address, GateKind, Position};
//! use gridlogic_engine::{EngineConfig, Evaluator};
//!
//! let ev = Evaluator::with_tracing(EngineConfig::default()).unwrap();
//! let input = Address::leaf(Position::new(0, 0));
//! let lamp = Address::leaf(Position::new(1, 0));
//! ev.edit(|s| {
//!     s.add_gate_at(&input, GateKind::Switch, true)?;
//!     s.add_gate_at(&lamp, GateKind::Junction, true)?;
//!     s.connect_at(&input, &lamp)
//! })
//! .unwrap();
//! ev.set_state(&input, true).unwrap();
//! ev.step(1).unwrap();
//! assert!(ev.get_state(&lamp));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod evaluator;
pub mod log;
pub mod metrics;
pub mod pool;
pub mod rate;
mod round;
mod tick_thread;

pub use config::{ConfigError, EngineConfig};
pub use error::EngineError;
pub use evaluator::{EditSession, Evaluator};
pub use log::{ChannelSink, Level, LogRecord, LogSink, NullSink, TracingSink};
pub use metrics::TickMetrics;
pub use pool::{Job, WorkerPool};
pub use rate::TickrateMeter;
