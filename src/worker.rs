//! Engine hosted on its own thread
//!
//! Inbound messages are handled strictly in arrival order, one at a time.
//! The engine is never shared; the channel is the only way in.

use flume::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::message::{Inbound, Outbound};
use crate::stats::DetectionStats;
use crate::wake::WakeWordEngine;

/// Handle to a running worker
pub struct Worker {
    pub tx: Sender<Inbound>,
    pub rx: Receiver<Outbound>,
    handle: JoinHandle<DetectionStats>,
}

impl Worker {
    /// Wait for the worker to stop and collect its stats
    ///
    /// The worker stops after a `Shutdown` message or once every inbound
    /// sender has been dropped.
    pub fn join(self) -> DetectionStats {
        let Worker { tx, rx, handle } = self;
        drop(tx);
        drop(rx);
        handle.join().unwrap_or_else(|_| {
            tracing::error!("wake word worker panicked");
            DetectionStats::default()
        })
    }
}

/// Move `engine` onto a new thread and return its channels
pub fn spawn(engine: WakeWordEngine) -> Worker {
    let (tx, inbound_rx) = flume::unbounded::<Inbound>();
    let (outbound_tx, rx) = flume::unbounded::<Outbound>();
    let handle = thread::spawn(move || run(engine, inbound_rx, outbound_tx));
    Worker { tx, rx, handle }
}

/// Session time for checks, in milliseconds
///
/// Caller timestamps are used as given and re-anchor the clock. A check
/// without one gets the last caller timestamp plus the monotonic time since
/// it arrived, so both kinds of check share one timeline. Before any caller
/// timestamp the anchor is 0 at spawn.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    anchor_ms: u64,
    anchored_at: Instant,
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            anchor_ms: 0,
            anchored_at: Instant::now(),
        }
    }

    pub fn now(&mut self, caller_ms: Option<u64>) -> u64 {
        match caller_ms {
            Some(ms) => {
                self.anchor_ms = ms;
                self.anchored_at = Instant::now();
                ms
            }
            None => self
                .anchor_ms
                .saturating_add(self.anchored_at.elapsed().as_millis() as u64),
        }
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Process messages until shutdown, returning final stats
pub fn run(mut engine: WakeWordEngine, rx: Receiver<Inbound>, tx: Sender<Outbound>) -> DetectionStats {
    let mut clock = SessionClock::new();

    while let Ok(msg) = rx.recv() {
        let reply = match msg {
            Inbound::Configure { phrase, max_distance } => engine
                .configure(&phrase, max_distance)
                .err()
                .map(|e| Outbound::Rejected { reason: e.to_string() }),
            Inbound::Check { text, now_ms } => {
                engine.check(&text, clock.now(now_ms)).map(Outbound::from)
            }
            Inbound::Shutdown => break,
        };

        if let Some(reply) = reply {
            if tx.send(reply).is_err() {
                tracing::debug!("outbound receiver dropped, stopping worker");
                break;
            }
        }
    }

    let stats = engine.stats();
    tracing::debug!(%stats, "wake word worker stopped");
    stats
}
