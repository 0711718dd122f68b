//! Transport seam: shared intent backlog and fire-and-forget publication
//!
//! The simulation owns its world exclusively; the only shared mutable
//! resource crossing a concurrency boundary is the intent backlog.
//! Publication hands plain data to detached tasks and never blocks the
//! next tick; a slow or failed publish is simply superseded by the next
//! one.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::warn;

use crate::game::intent::RawIntent;
use crate::game::snapshot::OutboundMsg;

/// Intent backlog. Producers (the transport) append; the control loop
/// drains the whole backlog atomically once per iteration.
#[derive(Default)]
pub struct IntentQueue {
    backlog: Mutex<Vec<RawIntent>>,
}

impl IntentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, intent: RawIntent) {
        self.backlog.lock().push(intent);
    }

    /// Drain-and-clear: intents arriving after a drain wait for the
    /// next iteration.
    pub fn drain(&self) -> Vec<RawIntent> {
        std::mem::take(&mut *self.backlog.lock())
    }
}

/// Outbound collaborator injected into the run loop. Implementations
/// must not block and must not touch world state.
pub trait Publisher: Send + Sync {
    fn publish_dynamic(&self, msg: OutboundMsg);
    fn publish_static(&self, msg: OutboundMsg);
    fn publish_event(&self, msg: OutboundMsg);
}

/// Default publisher: serializes each message and fans it out over a
/// tokio broadcast channel from a detached task. With no subscriber
/// attached the send is dropped, which is fine; snapshots are
/// self-contained and the next iteration issues a fresh one.
pub struct BroadcastPublisher {
    tx: broadcast::Sender<String>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<String>) {
        let (tx, rx) = broadcast::channel(capacity);
        (Self { tx }, rx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    fn send(&self, msg: OutboundMsg) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    let _ = tx.send(json);
                }
                Err(e) => warn!(error = %e, "failed to serialize outbound message"),
            }
        });
    }
}

impl Publisher for BroadcastPublisher {
    fn publish_dynamic(&self, msg: OutboundMsg) {
        self.send(msg);
    }

    fn publish_static(&self, msg: OutboundMsg) {
        self.send(msg);
    }

    fn publish_event(&self, msg: OutboundMsg) {
        self.send(msg);
    }
}

/// Convenience for handing the same publisher to several collaborators
pub type SharedPublisher = Arc<dyn Publisher>;
