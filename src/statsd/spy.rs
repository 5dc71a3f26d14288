use crossbeam::channel::{bounded, unbounded, Receiver, Sender};

use super::transport::Transport;
use crate::{MetricResult, MetricsError};

/// One transport call captured by a [`SpyTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpyFlush {
    /// Destination host the client resolved.
    pub host: String,
    /// Destination port the client resolved.
    pub port: u16,
    /// Serialized lines, in send order.
    pub lines: Vec<String>,
}

/// `Transport` that forwards every call to the `Sender` half of a channel
/// while callers keep the `Receiver` half.
///
/// This is not a general purpose transport, rather one meant for verifying
/// what a client transmits in integration tests. No network I/O happens.
#[derive(Debug, Clone)]
pub struct SpyTransport {
    sender: Sender<SpyFlush>,
}

impl SpyTransport {
    /// Creates a spy backed by an unbounded channel.
    #[must_use]
    pub fn new() -> (Receiver<SpyFlush>, Self) {
        let (sender, receiver) = unbounded();
        (receiver, Self { sender })
    }

    /// Creates a spy backed by a channel holding at most `capacity` calls.
    /// Calls made while the channel is full fail like a full socket buffer.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> (Receiver<SpyFlush>, Self) {
        let (sender, receiver) = bounded(capacity);
        (receiver, Self { sender })
    }
}

impl Transport for SpyTransport {
    fn send(&self, lines: &[String], host: &str, port: u16) -> MetricResult<usize> {
        let written = lines.iter().map(String::len).sum();
        self.sender
            .try_send(SpyFlush {
                host: host.to_string(),
                port,
                lines: lines.to_vec(),
            })
            .map_err(|err| MetricsError::Custom(format!("spy channel: {err}")))?;
        Ok(written)
    }
}
