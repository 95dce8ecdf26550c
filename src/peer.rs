//! Peer struct definition
//!
//! Represents one connected client as seen by the hub: an identity plus
//! the sending half of its outbound channel. The hub owns the `Peer`
//! exclusively from registration until removal; the transport's write
//! side holds only the receiving half.

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::error::SendError;
use crate::types::PeerId;

/// Default outbound buffer per peer
///
/// Small on purpose: a peer that cannot drain this many payloads is
/// treated as dead rather than allowed to stall a broadcast.
pub const PEER_BUFFER_SIZE: usize = 32;

/// Connected peer handle
///
/// Membership in the registry is the liveness flag; there is no explicit
/// open/closed state. Dropping the `Peer` closes the outbound channel,
/// which is how the transport learns the connection is done. Because
/// ownership moves into the registry exactly once and out exactly once,
/// double-close cannot happen.
#[derive(Debug)]
pub struct Peer {
    /// Unique identifier for this peer
    pub id: PeerId,
    /// Hub → transport payload channel
    outbound: mpsc::Sender<Bytes>,
}

impl Peer {
    /// Create a peer from an existing outbound sender
    pub fn new(id: PeerId, outbound: mpsc::Sender<Bytes>) -> Self {
        Self { id, outbound }
    }

    /// Create a peer together with the receiving half of its outbound
    /// channel, for the transport's write task to drain.
    pub fn channel(id: PeerId, capacity: usize) -> (Self, mpsc::Receiver<Bytes>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(id, tx), rx)
    }

    /// Send a payload to this peer without blocking
    ///
    /// A full buffer or a closed channel is reported as a send failure;
    /// the caller treats either as peer death. This must never block the
    /// coordinator's fan-out loop.
    pub fn send(&self, payload: Bytes) -> Result<(), SendError> {
        self.outbound.try_send(payload).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SendError::BufferFull,
            mpsc::error::TrySendError::Closed(_) => SendError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_delivers_payload() {
        let (peer, mut rx) = Peer::channel(PeerId::new(), 4);

        peer.send(Bytes::from_static(b"hello")).unwrap();

        let got = rx.try_recv().unwrap();
        assert_eq!(&got[..], b"hello");
    }

    #[test]
    fn test_send_full_buffer_fails() {
        let (peer, _rx) = Peer::channel(PeerId::new(), 1);

        peer.send(Bytes::from_static(b"one")).unwrap();
        let err = peer.send(Bytes::from_static(b"two")).unwrap_err();

        assert_eq!(err, SendError::BufferFull);
    }

    #[test]
    fn test_send_after_receiver_dropped_fails() {
        let (peer, rx) = Peer::channel(PeerId::new(), 4);
        drop(rx);

        let err = peer.send(Bytes::from_static(b"gone")).unwrap_err();
        assert_eq!(err, SendError::Closed);
    }

    #[tokio::test]
    async fn test_drop_closes_outbound_channel() {
        let (peer, mut rx) = Peer::channel(PeerId::new(), 4);
        drop(peer);

        assert!(rx.recv().await.is_none());
    }
}
