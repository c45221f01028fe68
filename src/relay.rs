//! Readiness-gated command relay.
//!
//! Commands for the capture surface are held in a FIFO until it reports
//! ready, then drained in order. After that they pass straight through.
//! The transition is one-way; nothing is coalesced, reordered or cancelled.

use crate::{messages::Command, Error, Result};
use std::collections::VecDeque;
use tokio::sync::mpsc;

/// Downstream end of the relay
pub trait CommandSink {
    /// Deliver one command, preserving call order
    ///
    /// # Errors
    ///
    /// Returns an error if the receiver is gone
    fn deliver(&mut self, command: Command) -> Result<()>;
}

impl CommandSink for mpsc::UnboundedSender<Command> {
    fn deliver(&mut self, command: Command) -> Result<()> {
        self.send(command)
            .map_err(|e| Error::ChannelClosed(format!("capture surface dropped {} command", e.0.kind())))
    }
}

impl CommandSink for Vec<Command> {
    fn deliver(&mut self, command: Command) -> Result<()> {
        self.push(command);
        Ok(())
    }
}

/// Gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    NotReady,
    Ready,
}

/// Order-preserving command queue in front of a [`CommandSink`]
#[derive(Debug)]
pub struct CommandRelay<S: CommandSink> {
    sink: S,
    state: RelayState,
    pending: VecDeque<Command>,
}

impl<S: CommandSink> CommandRelay<S> {
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            state: RelayState::NotReady,
            pending: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> RelayState {
        self.state
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state == RelayState::Ready
    }

    /// Commands waiting for readiness
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Send now if ready, otherwise queue
    ///
    /// # Errors
    ///
    /// Propagates a delivery failure from the sink
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        match self.state {
            RelayState::Ready => self.sink.deliver(command),
            RelayState::NotReady => {
                log::info!("Capture surface not ready, queueing {} command", command.kind());
                self.pending.push_back(command);
                Ok(())
            }
        }
    }

    /// Switch to ready and flush the queue in FIFO order.
    ///
    /// Returns the number of commands delivered. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates the first delivery failure; commands behind it are dropped
    pub fn mark_ready(&mut self) -> Result<usize> {
        if self.state == RelayState::Ready {
            return Ok(0);
        }
        self.state = RelayState::Ready;

        let queued = std::mem::take(&mut self.pending);
        let count = queued.len();
        for command in queued {
            log::info!("Delivering deferred {} command", command.kind());
            self.sink.deliver(command)?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_then_drain_in_order() {
        let mut relay = CommandRelay::new(Vec::new());
        relay.dispatch(Command::Stop).unwrap();
        relay
            .dispatch(Command::Start {
                settings: crate::config::TrackingSettings::default(),
            })
            .unwrap();
        assert_eq!(relay.pending(), 2);
        assert!(relay.sink().is_empty());

        assert_eq!(relay.mark_ready().unwrap(), 2);
        let kinds: Vec<&str> = relay.sink().iter().map(Command::kind).collect();
        assert_eq!(kinds, vec!["stop", "start"]);
        assert_eq!(relay.pending(), 0);
    }

    #[test]
    fn test_ready_is_one_way() {
        let mut relay = CommandRelay::new(Vec::new());
        relay.mark_ready().unwrap();
        assert_eq!(relay.mark_ready().unwrap(), 0);
        relay.dispatch(Command::Stop).unwrap();
        assert_eq!(relay.state(), RelayState::Ready);
        assert_eq!(relay.sink().len(), 1);
    }

    #[test]
    fn test_closed_channel_reports_error() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut relay = CommandRelay::new(tx);
        relay.dispatch(Command::Stop).unwrap();
        assert!(matches!(relay.mark_ready(), Err(Error::ChannelClosed(_))));
    }
}
