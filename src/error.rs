//! Error types for the broadcast hub
//!
//! Defines connection-level errors and per-peer send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Hub and connection-level errors
///
/// Covers transport failures in the ingress adapter and the terminal
/// case of the hub's mailbox being closed.
#[derive(Debug, Error)]
pub enum HubError {
    /// WebSocket protocol error (fatal for the connection)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// IO error (fatal for the connection)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The hub's mailbox is closed (coordinator shut down)
    #[error("Hub closed")]
    HubClosed,
}

/// Per-peer send errors
///
/// A broadcast attempts a non-blocking send to each peer; either failure
/// variant marks the peer dead and triggers its unregistration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// The peer's outbound buffer is full (slow or stalled consumer)
    #[error("Peer outbound buffer full")]
    BufferFull,

    /// The peer's outbound channel is closed (transport gone)
    #[error("Peer channel closed")]
    Closed,
}
