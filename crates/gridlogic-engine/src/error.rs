//! Engine-level error type.

use std::error::Error;
use std::fmt;

use gridlogic_core::{AddressError, NetListError};

use crate::config::ConfigError;

/// Errors returned by [`Evaluator`](crate::Evaluator) operations.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineError {
    /// The operation needs the simulation to be paused.
    NotPaused,
    /// A worker or tick thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed, and why.
        reason: String,
    },
    /// The evaluator has been shut down.
    ShutDown,
    /// Invalid engine configuration.
    Config(ConfigError),
    /// Address resolution or address-tree maintenance failed.
    Address(AddressError),
    /// A structural net list edit failed.
    NetList(NetListError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPaused => write!(f, "simulation must be paused"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
            Self::ShutDown => write!(f, "evaluator is shut down"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Address(e) => write!(f, "address: {e}"),
            Self::NetList(e) => write!(f, "netlist: {e}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Address(e) => Some(e),
            Self::NetList(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<AddressError> for EngineError {
    fn from(e: AddressError) -> Self {
        Self::Address(e)
    }
}

impl From<NetListError> for EngineError {
    fn from(e: NetListError) -> Self {
        Self::NetList(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlogic_core::GateId;

    #[test]
    fn wraps_and_exposes_source() {
        let e: EngineError = NetListError::VacantGate { id: GateId(3) }.into();
        assert_eq!(e.to_string(), "netlist: gate 3 is not occupied");
        assert!(e.source().is_some());
        assert!(EngineError::NotPaused.source().is_none());
    }
}
