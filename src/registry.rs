//! Registry struct definition
//!
//! The authoritative membership set: every peer currently eligible for
//! broadcast, keyed by identity. Only the hub's coordinator task ever
//! touches it, so no method here takes a lock.

use std::collections::HashMap;

use tracing::error;

use crate::peer::Peer;
use crate::types::PeerId;

/// Live membership set of peers
///
/// A peer appears here if and only if it is live and may legally receive
/// broadcasts. Mutated only by the coordinator; iteration order is
/// irrelevant because fan-out is unordered.
#[derive(Debug, Default)]
pub struct Registry {
    peers: HashMap<PeerId, Peer>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            peers: HashMap::new(),
        }
    }

    /// Insert a peer keyed by its identity
    ///
    /// Each physical connection registers at most once, so a collision is
    /// an internal-consistency fault. It is logged and the stale entry is
    /// overwritten; the displaced peer drops, closing its channel.
    pub fn add(&mut self, peer: Peer) {
        let id = peer.id;
        if self.peers.insert(id, peer).is_some() {
            error!("Peer {} registered twice; replacing stale entry", id);
        }
    }

    /// Remove a peer by identity, returning it if it was present
    ///
    /// Removing an absent peer is a no-op: a peer may legitimately be
    /// unregistered twice under concurrent shutdown (once by broadcast
    /// send failure, once by its adapter).
    pub fn remove(&mut self, id: PeerId) -> Option<Peer> {
        self.peers.remove(&id)
    }

    /// Look up a peer by identity
    pub fn get(&self, id: PeerId) -> Option<&Peer> {
        self.peers.get(&id)
    }

    /// Point-in-time enumeration of all registered peer ids
    ///
    /// Broadcast iterates this snapshot rather than the map itself so
    /// that iteration and mutation never interleave within one event.
    pub fn snapshot(&self) -> Vec<PeerId> {
        self.peers.keys().copied().collect()
    }

    /// Number of registered peers
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Registry operations never send, so dropping the receiver is fine.
    fn peer() -> Peer {
        let (peer, _rx) = Peer::channel(PeerId::new(), 4);
        peer
    }

    #[test]
    fn test_add_then_remove() {
        let mut registry = Registry::new();
        let p = peer();
        let id = p.id;

        registry.add(p);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(id).is_some());

        assert!(registry.remove(id).is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = Registry::new();
        let p = peer();
        let id = p.id;

        registry.add(p);
        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
        assert!(registry.remove(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut registry = Registry::new();
        assert!(registry.remove(PeerId::new()).is_none());
    }

    #[test]
    fn test_snapshot_contains_all_peers() {
        let mut registry = Registry::new();
        let ids: Vec<PeerId> = (0..3)
            .map(|_| {
                let p = peer();
                let id = p.id;
                registry.add(p);
                id
            })
            .collect();

        let mut snap = registry.snapshot();
        snap.sort_by_key(|id| id.0);
        let mut want = ids.clone();
        want.sort_by_key(|id| id.0);

        assert_eq!(snap, want);
    }

    #[test]
    fn test_double_registration_overwrites() {
        let mut registry = Registry::new();
        let (first, _rx1) = Peer::channel(PeerId::new(), 4);
        let id = first.id;
        let (tx, _rx2) = tokio::sync::mpsc::channel(4);
        let second = Peer::new(id, tx);

        registry.add(first);
        registry.add(second);

        assert_eq!(registry.len(), 1);
    }
}
