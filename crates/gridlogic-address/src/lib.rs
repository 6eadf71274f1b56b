//! Hierarchical address resolution for the gridlogic simulation engine.
//!
//! A circuit may contain instances of other circuits, nested to any
//! depth. After flattening, every leaf gate of every instance owns one
//! slot in the net list. The [`AddressTree`] mirrors the instance
//! hierarchy and maps each [`Address`](gridlogic_core::Address) to that
//! slot's [`GateId`](gridlogic_core::GateId).
//!
//! The tree is kept in sync with net list compaction through
//! [`AddressTree::on_compress`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod tree;

pub use tree::{AddressTree, InstanceNode};
