//! Channel-backed progress delivery for operations.

use fencebox_core::{LogLevel, OpError, ProgressSink};
use tokio::sync::mpsc;

use crate::request::{OperationFailure, OperationReply};
use crate::OPERATION_CHANNEL_SIZE;

/// Event sent through the channel while an operation runs.
#[derive(Debug)]
pub enum OperationEvent {
    /// Progress update, `current` out of `total`.
    Progress { current: u64, total: u64 },
    /// Leveled text message.
    Log { level: LogLevel, message: String },
    /// The operation completed. Always the final event.
    Complete(Result<OperationReply, OperationFailure>),
}

/// A [`ProgressSink`] backed by a bounded tokio channel.
///
/// Delivery is fire-and-forget: a full or closed channel drops the event
/// and the producing operation continues. Progress can never exert
/// backpressure on the work it reports.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<OperationEvent>,
}

impl ChannelSink {
    /// Wrap an existing sender.
    pub fn new(tx: mpsc::Sender<OperationEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with the receiver for its events.
    pub fn channel() -> (Self, mpsc::Receiver<OperationEvent>) {
        let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);
        (Self::new(tx), rx)
    }
}

impl ProgressSink for ChannelSink {
    fn tick(&self, current: u64, total: u64) {
        let _ = self.tx.try_send(OperationEvent::Progress { current, total });
    }

    fn log(&self, level: LogLevel, message: &str) {
        let _ = self.tx.try_send(OperationEvent::Log {
            level,
            message: message.to_string(),
        });
    }
}

/// Report a failure through the sink before returning it.
pub(crate) fn fail(sink: &dyn ProgressSink, err: OpError) -> OpError {
    sink.log(LogLevel::Error, &err.to_string());
    err
}
