//! The enforcement notifier.
//!
//! When a limit trips, a block directive goes out to every registered
//! observer (each open page of the tracked site, in extension terms).
//! Delivery is best-effort and fire-and-forget per recipient: a failed
//! sink gets a warning on stderr and the fan-out continues.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outbound directive broadcast to tracked-site pages, e.g.
/// `{"type": "BLOCK_PLAYBACK"}` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockDirective {
    /// Stop playback and show the limit overlay.
    BlockPlayback,
}

/// A single delivery failure; never aborts the broadcast.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct DeliveryError(pub String);

/// One registered recipient of block directives.
pub trait BlockSink: Send {
    /// Human-readable name used in delivery warnings.
    fn label(&self) -> &str;

    fn deliver(&self, directive: &BlockDirective) -> Result<(), DeliveryError>;
}

/// Fans a directive out to every registered sink.
#[derive(Default)]
pub struct Broadcaster {
    sinks: Vec<Box<dyn BlockSink>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, sink: Box<dyn BlockSink>) {
        self.sinks.push(sink);
    }

    /// Deliver `directive` to every sink. Returns how many deliveries
    /// succeeded.
    pub fn broadcast(&self, directive: &BlockDirective) -> usize {
        let mut delivered = 0;
        for sink in &self.sinks {
            match sink.deliver(directive) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    eprintln!(
                        "Warning: failed to deliver block directive to {}: {e}",
                        sink.label()
                    );
                }
            }
        }
        delivered
    }
}
