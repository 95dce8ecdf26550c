//! WebSocket ingress adapter
//!
//! Handles one client connection: WebSocket handshake, registration with
//! the hub, a read loop turning inbound frames into broadcast events,
//! and a write task draining the peer's outbound channel back onto the
//! socket. The adapter never touches the registry; everything goes
//! through the hub's mailbox.

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info};

use crate::error::HubError;
use crate::hub::HubHandle;
use crate::peer::{Peer, PEER_BUFFER_SIZE};
use crate::types::PeerId;

/// Handle a new TCP connection
///
/// Performs the WebSocket handshake, registers a peer with the hub, and
/// runs the connection until either side goes away. On any exit path the
/// hub receives exactly one unregister for this peer.
pub async fn handle_connection(stream: TcpStream, hub: HubHandle) -> Result<(), HubError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Mint an identity and hand the peer to the hub
    let peer_id = PeerId::new();
    info!("Peer {} connected from {}", peer_id, peer_addr);

    let (peer, mut payload_rx) = Peer::channel(peer_id, PEER_BUFFER_SIZE);
    hub.register(peer).await?;

    // Spawn write task (hub payloads -> WebSocket)
    let write_task = tokio::spawn(async move {
        while let Some(payload) = payload_rx.recv().await {
            if ws_sender
                .send(Message::Binary(payload.to_vec()))
                .await
                .is_err()
            {
                debug!("WebSocket send failed, ending write task");
                break;
            }
        }
        debug!("Write task ended for peer");

        // The hub dropped the peer or the socket broke; either way,
        // send a close frame and release the socket.
        let _ = ws_sender.close().await;
    });

    // Spawn read task (WebSocket frames -> broadcast events)
    let hub_read = hub.clone();
    let read_task = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            let payload = match msg_result {
                Ok(Message::Text(text)) => Bytes::from(text.into_bytes()),
                Ok(Message::Binary(data)) => Bytes::from(data),
                Ok(Message::Close(_)) => {
                    debug!("Peer {} sent close frame", peer_id);
                    break;
                }
                Ok(Message::Ping(_)) => {
                    debug!("Ping from {}", peer_id);
                    // Pong is handled automatically by tungstenite
                    continue;
                }
                Ok(Message::Pong(_)) => {
                    debug!("Pong from {}", peer_id);
                    continue;
                }
                Ok(_) => {
                    // Raw frames - ignore
                    continue;
                }
                Err(e) => {
                    error!("WebSocket error for {}: {}", peer_id, e);
                    break;
                }
            };

            if hub_read.broadcast(peer_id, payload).await.is_err() {
                debug!("Hub closed, ending read task for {}", peer_id);
                break;
            }
        }
        debug!("Read task ended for {}", peer_id);
    });

    // Wait for either task to complete
    tokio::select! {
        _ = read_task => {
            debug!("Read task completed for {}", peer_id);
        }
        _ = write_task => {
            debug!("Write task completed for {}", peer_id);
        }
    }

    // Exactly one unregister per connection; a best-effort send because
    // during shutdown the hub may already be gone.
    let _ = hub.unregister(peer_id).await;

    info!("Peer {} disconnected", peer_id);

    Ok(())
}
