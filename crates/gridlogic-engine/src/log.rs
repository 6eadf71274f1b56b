//! Injected log sinks.
//!
//! The evaluator never logs through a global. Every message goes to the
//! [`LogSink`] handed to [`Evaluator::new`](crate::Evaluator::new), which
//! lives exactly as long as the engine.

use crossbeam_channel::{Receiver, Sender};
pub use tracing::Level;

/// Destination for engine log messages.
pub trait LogSink: Send + Sync {
    /// Record one message.
    fn log(&self, level: Level, message: &str);
}

/// Forwards to `tracing` events under the `gridlogic::engine` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "gridlogic::engine", "{message}"),
            Level::WARN => tracing::warn!(target: "gridlogic::engine", "{message}"),
            Level::INFO => tracing::info!(target: "gridlogic::engine", "{message}"),
            Level::DEBUG => tracing::debug!(target: "gridlogic::engine", "{message}"),
            _ => tracing::trace!(target: "gridlogic::engine", "{message}"),
        }
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _level: Level, _message: &str) {}
}

/// One message captured by a [`ChannelSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    /// Severity.
    pub level: Level,
    /// Formatted message.
    pub message: String,
}

/// Sends every message as a [`LogRecord`] over an unbounded channel, for a
/// log view running on another thread.
///
/// Messages sent after the receiver is dropped are discarded.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: Sender<LogRecord>,
}

impl ChannelSink {
    /// A sink and the receiving end of its channel.
    pub fn new() -> (Self, Receiver<LogRecord>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl LogSink for ChannelSink {
    fn log(&self, level: Level, message: &str) {
        let _ = self.tx.send(LogRecord {
            level,
            message: message.to_owned(),
        });
    }
}
