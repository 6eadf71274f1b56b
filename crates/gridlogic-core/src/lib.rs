//! Core types for the gridlogic simulation engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: gate and circuit
//! ids, hierarchical addresses, the closed set of gate kinds with their
//! evaluation function, and the error enums.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod address;
pub mod error;
pub mod gate;
pub mod id;

pub use address::{Address, Position};
pub use error::{AddressError, NetListError};
pub use gate::GateKind;
pub use id::{CircuitId, CompactionEpoch, GateId};
