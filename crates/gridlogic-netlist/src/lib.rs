//! Flat gate net list for the gridlogic simulation engine.
//!
//! # Architecture
//!
//! ```text
//! NetList
//! ├── slots: Vec<GateSlot>      kind + ordered inputs + output set
//! ├── free:  Vec<GateId>        LIFO stack of vacant ids
//! ├── state: StateBuffers
//! │   ├── buffers × 2           Vec<AtomicBool>, front index flipped per tick
//! │   └── powered               presentation flags + dirty bit
//! └── epoch: CompactionEpoch    bumped by every renumbering compaction
//! ```
//!
//! Structural edits take `&mut NetList`. Every tick pass
//! ([`NetList::resolve_junctions`], [`NetList::compute_range`],
//! [`NetList::propagate_powered`], [`NetList::swap_states`]) and every state read or write takes `&self`,
//! so a `RwLock<NetList>` read guard is enough to share the table across
//! worker threads while external callers read and write gate state.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod netlist;
pub mod remap;
pub mod slot;
pub mod state;

pub use netlist::NetList;
pub use remap::GateRemap;
pub use slot::GateSlot;
pub use state::StateBuffers;
