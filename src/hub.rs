//! Hub actor implementation
//!
//! The central actor that owns the registry and serializes every
//! membership change and broadcast into one total order.
//! Uses the Actor pattern with mpsc channels for message passing:
//! many adapter tasks produce events, only the hub consumes them, so the
//! registry needs no locks.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::HubError;
use crate::peer::Peer;
use crate::registry::Registry;
use crate::types::PeerId;

/// Events sent from adapter tasks to the hub actor
#[derive(Debug)]
pub enum HubEvent {
    /// New peer connected
    Register { peer: Peer },
    /// Peer disconnected
    Unregister { peer_id: PeerId },
    /// Fan a payload out to every registered peer
    ///
    /// `from` identifies the originating peer for tracing only; the
    /// sender is not excluded from delivery.
    Broadcast { from: PeerId, payload: Bytes },
}

/// Read-only counters exposed by the hub
///
/// Updated only by the hub's own task; everyone else just reads.
#[derive(Debug, Default)]
pub struct HubMetrics {
    peers: AtomicUsize,
    events: AtomicU64,
}

impl HubMetrics {
    /// Number of currently registered peers
    pub fn peer_count(&self) -> usize {
        self.peers.load(Ordering::Relaxed)
    }

    /// Total events the hub has processed since start
    pub fn events_processed(&self) -> u64 {
        self.events.load(Ordering::Relaxed)
    }
}

/// Cloneable producer side of the hub's mailbox
///
/// Handed to every adapter task. The mailbox is bounded; when it is full
/// these methods wait, backpressuring the adapter rather than dropping
/// events. All methods fail with [`HubError::HubClosed`] once the hub
/// has shut down.
#[derive(Debug, Clone)]
pub struct HubHandle {
    sender: mpsc::Sender<HubEvent>,
    metrics: Arc<HubMetrics>,
}

impl HubHandle {
    /// Hand a newly accepted peer to the hub
    pub async fn register(&self, peer: Peer) -> Result<(), HubError> {
        self.send(HubEvent::Register { peer }).await
    }

    /// Report a peer as disconnected
    pub async fn unregister(&self, peer_id: PeerId) -> Result<(), HubError> {
        self.send(HubEvent::Unregister { peer_id }).await
    }

    /// Ask the hub to fan a payload out to all registered peers
    pub async fn broadcast(&self, from: PeerId, payload: Bytes) -> Result<(), HubError> {
        self.send(HubEvent::Broadcast { from, payload }).await
    }

    /// Metrics shared with the hub, readable after shutdown too
    pub fn metrics(&self) -> Arc<HubMetrics> {
        Arc::clone(&self.metrics)
    }

    async fn send(&self, event: HubEvent) -> Result<(), HubError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| HubError::HubClosed)
    }
}

/// The hub actor
///
/// Sole owner and sole writer of the [`Registry`]. Consumes events from
/// its mailbox one at a time; each event is handled to completion before
/// the next is dequeued.
pub struct Hub {
    /// Live membership set, touched only from `run`
    registry: Registry,
    /// Mailbox receiver
    receiver: mpsc::Receiver<HubEvent>,
    /// Internally generated events (peers found dead during fan-out),
    /// drained before the next mailbox receive
    pending: VecDeque<HubEvent>,
    metrics: Arc<HubMetrics>,
}

impl Hub {
    /// Create a hub with a mailbox of the given capacity
    ///
    /// Returns the hub itself (to be driven via [`Hub::run`], typically
    /// on its own task) and a [`HubHandle`] for producers. The hub shuts
    /// down when every handle has been dropped.
    pub fn new(mailbox_capacity: usize) -> (Self, HubHandle) {
        let (sender, receiver) = mpsc::channel(mailbox_capacity);
        let metrics = Arc::new(HubMetrics::default());
        let hub = Self {
            registry: Registry::new(),
            receiver,
            pending: VecDeque::new(),
            metrics: Arc::clone(&metrics),
        };
        (hub, HubHandle { sender, metrics })
    }

    /// Run the hub event loop
    ///
    /// Continuously receives and processes events until all handles are
    /// dropped and the mailbox is drained. Dropping the hub afterwards
    /// closes every remaining peer's outbound channel.
    pub async fn run(mut self) {
        info!("Hub started");

        while let Some(event) = self.next_event().await {
            self.handle_event(event);
        }

        info!(
            "Hub shutting down with {} peers still registered",
            self.registry.len()
        );
    }

    /// Dequeue the next event, preferring internally queued ones
    async fn next_event(&mut self) -> Option<HubEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        self.receiver.recv().await
    }

    /// Process a single event
    fn handle_event(&mut self, event: HubEvent) {
        self.metrics.events.fetch_add(1, Ordering::Relaxed);

        match event {
            HubEvent::Register { peer } => self.handle_register(peer),
            HubEvent::Unregister { peer_id } => self.handle_unregister(peer_id),
            HubEvent::Broadcast { from, payload } => self.handle_broadcast(from, payload),
        }
    }

    /// Handle new peer registration
    fn handle_register(&mut self, peer: Peer) {
        let id = peer.id;
        self.registry.add(peer);
        self.metrics
            .peers
            .store(self.registry.len(), Ordering::Relaxed);
        info!("Peer {} connected. Total peers: {}", id, self.registry.len());
    }

    /// Handle peer disconnection
    ///
    /// Idempotent: a peer may be unregistered both by its adapter and by
    /// a failed broadcast send. Only an actual removal closes the peer
    /// (by dropping it) and updates the count.
    fn handle_unregister(&mut self, peer_id: PeerId) {
        if self.registry.remove(peer_id).is_none() {
            debug!("Peer {} already unregistered", peer_id);
            return;
        }
        self.metrics
            .peers
            .store(self.registry.len(), Ordering::Relaxed);
        info!(
            "Peer {} disconnected. Total peers: {}",
            peer_id,
            self.registry.len()
        );
    }

    /// Handle a broadcast: fan the payload out to a registry snapshot
    ///
    /// Each peer's delivery is independent; a failed send marks that peer
    /// dead and queues a synthetic unregister instead of mutating the
    /// registry mid-iteration. The sender receives its own payload too.
    fn handle_broadcast(&mut self, from: PeerId, payload: Bytes) {
        let snapshot = self.registry.snapshot();
        debug!(
            "Broadcasting {} bytes from {} to {} peers",
            payload.len(),
            from,
            snapshot.len()
        );

        for peer_id in snapshot {
            let Some(peer) = self.registry.get(peer_id) else {
                continue;
            };
            if let Err(e) = peer.send(payload.clone()) {
                warn!("Send to peer {} failed ({}), dropping it", peer_id, e);
                self.pending.push_back(HubEvent::Unregister { peer_id });
            }
        }
    }

    #[cfg(test)]
    fn peer_count(&self) -> usize {
        self.registry.len()
    }

    #[cfg(test)]
    fn drain_pending(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            self.handle_event(event);
        }
    }
}
