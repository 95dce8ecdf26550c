//! Broadcast Hub WebSocket Server Library
//!
//! A learning-oriented broadcast server built with tokio-tungstenite
//! using the Actor pattern for state management: every message a peer
//! sends is fanned out to all connected peers, including the sender.
//!
//! # Features
//! - WebSocket connection handling
//! - Central registry of connected peers
//! - Fan-out broadcast of opaque payloads
//! - Disconnection handling with no leaked connections
//! - Read-only peer-count and event-count metrics
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `Hub` is the central actor owning the peer registry
//! - Each connection has a `handler` task feeding events to the hub
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use broadcast_hub::{handle_connection, Hub};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let (hub, handle) = Hub::new(256);
//!
//!     tokio::spawn(hub.run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let handle = handle.clone();
//!         tokio::spawn(handle_connection(stream, handle));
//!     }
//! }
//! ```

pub mod error;
pub mod handler;
pub mod hub;
pub mod peer;
pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use error::{HubError, SendError};
pub use handler::handle_connection;
pub use hub::{Hub, HubEvent, HubHandle, HubMetrics};
pub use peer::Peer;
pub use registry::Registry;
pub use types::PeerId;
