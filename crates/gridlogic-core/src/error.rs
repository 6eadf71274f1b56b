//! Error types shared across the workspace.
//!
//! Structural net list edits and address-tree maintenance each get their
//! own enum. None of these are fatal: every failing operation leaves the
//! data it was asked to modify untouched.

use crate::id::GateId;
use std::error::Error;
use std::fmt;

/// Errors from structural net list operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetListError {
    /// The id is past the end of the slot table.
    UnknownGate {
        /// The offending id.
        id: GateId,
    },
    /// The id refers to a slot that is currently on the free list.
    VacantGate {
        /// The offending id.
        id: GateId,
    },
    /// `connect_gates` on an edge that already exists.
    EdgeExists {
        /// Driving gate.
        src: GateId,
        /// Driven gate.
        dst: GateId,
    },
    /// `disconnect_gates` on an edge that does not exist.
    EdgeMissing {
        /// Driving gate.
        src: GateId,
        /// Driven gate.
        dst: GateId,
    },
}

impl fmt::Display for NetListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGate { id } => write!(f, "gate {id} does not exist"),
            Self::VacantGate { id } => write!(f, "gate {id} is not occupied"),
            Self::EdgeExists { src, dst } => write!(f, "edge {src} -> {dst} already exists"),
            Self::EdgeMissing { src, dst } => write!(f, "edge {src} -> {dst} does not exist"),
        }
    }
}

impl Error for NetListError {}

/// Errors from address resolution and address-tree maintenance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressError {
    /// The address has no segments.
    EmptyAddress,
    /// No entry exists at the address.
    NotFound,
    /// The final position is already taken by a gate or an instance.
    PositionOccupied,
    /// A non-final segment names a position that is not a circuit instance.
    NotABranch,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAddress => write!(f, "address is empty"),
            Self::NotFound => write!(f, "nothing at address"),
            Self::PositionOccupied => write!(f, "position already occupied"),
            Self::NotABranch => write!(f, "address segment is not a circuit instance"),
        }
    }
}

impl Error for AddressError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn netlist_error_messages_name_the_gates() {
        let e = NetListError::EdgeExists {
            src: GateId(2),
            dst: GateId(5),
        };
        assert_eq!(e.to_string(), "edge 2 -> 5 already exists");
        let e = NetListError::VacantGate { id: GateId(9) };
        assert_eq!(e.to_string(), "gate 9 is not occupied");
    }

    #[test]
    fn errors_are_std_errors() {
        fn takes_error(_: &dyn Error) {}
        takes_error(&NetListError::UnknownGate { id: GateId(0) });
        takes_error(&AddressError::NotFound);
    }
}
