//! Event publication for coin selection
//!
//! Selection runs inside a wallet that wants to observe what the solver did
//! without coupling UI code to solver internals. This module provides a
//! small domain bus: subscribers register for a named event kind (or for
//! everything) and receive cloned events over an mpsc channel. Publishing
//! never blocks on a dead subscriber; closed channels are skipped.

use bitcoin::OutPoint;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Serializable representation of a Bitcoin OutPoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutPointInfo {
    /// Transaction ID as a string
    pub txid: String,
    /// Output index
    pub vout: u32,
}

impl From<&OutPoint> for OutPointInfo {
    fn from(outpoint: &OutPoint) -> Self {
        Self {
            txid: outpoint.txid.to_string(),
            vout: outpoint.vout,
        }
    }
}

/// Domain events emitted by the selection entry points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// A solver produced a result that was chosen for the transaction
    Completed {
        /// The inputs that were selected
        inputs: Vec<OutPointInfo>,
        /// Name of the winning algorithm
        algorithm: String,
        /// The target the selection solved for, in satoshis
        target: u64,
        /// Waste of the chosen result, in satoshis
        waste: i64,
        /// Change amount after fees, zero when no change is made
        change: u64,
    },
    /// No solver produced a usable result
    Failed {
        /// Why the selection failed
        reason: String,
        /// The target the selection solved for, in satoshis
        target: u64,
        /// Total value of the pool that was searched, in satoshis
        available: u64,
    },
}

impl SelectionEvent {
    fn kind(&self) -> &'static str {
        match self {
            SelectionEvent::Completed { .. } => "completed",
            SelectionEvent::Failed { .. } => "failed",
        }
    }
}

/// Message bus for selection events
pub struct SelectionEventBus {
    subscribers: Arc<Mutex<HashMap<String, Vec<Sender<SelectionEvent>>>>>,
}

impl SelectionEventBus {
    /// Create a new selection event bus
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Subscribe to all selection events
    pub fn subscribe_all(&self) -> Receiver<SelectionEvent> {
        self.subscribe("all")
    }

    /// Subscribe to a specific kind of selection event
    ///
    /// # Arguments
    /// * `kind` - `"completed"`, `"failed"`, or `"all"` for everything
    pub fn subscribe(&self, kind: &str) -> Receiver<SelectionEvent> {
        let (sender, receiver) = channel();
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers
            .entry(kind.to_lowercase())
            .or_insert_with(Vec::new)
            .push(sender);
        receiver
    }

    /// Publish a selection event to matching subscribers
    pub fn publish(&self, event: SelectionEvent) {
        let subscribers = self.subscribers.lock().unwrap();
        if let Some(listeners) = subscribers.get(event.kind()) {
            for listener in listeners {
                let _ = listener.send(event.clone());
            }
        }
        if let Some(listeners) = subscribers.get("all") {
            for listener in listeners {
                let _ = listener.send(event.clone());
            }
        }
    }

    /// Get the number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        let subscribers = self.subscribers.lock().unwrap();
        subscribers.values().map(|v| v.len()).sum()
    }
}

impl Default for SelectionEventBus {
    fn default() -> Self {
        Self::new()
    }
}
