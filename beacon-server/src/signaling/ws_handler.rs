use crate::lobby::RegistryHandle;
use crate::signaling::{Connection, Outbound, PeerSink, UserIdPool};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures::{SinkExt, StreamExt};
use tracing::{error, info};

/// Shared state behind the WebSocket route.
#[derive(Clone)]
pub struct AppState {
    pub registry: RegistryHandle,
    pub ids: UserIdPool,
}

/// Router exposing the signaling socket at `/socket/websocket`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/socket/websocket", get(ws_handler))
        .with_state(state)
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let peer = state.ids.acquire();
    info!(%peer, "peer connected");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (sink, mut outbound_rx) = PeerSink::new(peer);

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            match frame {
                Outbound::Frame(envelope) => {
                    let json = match serde_json::to_string(&envelope) {
                        Ok(json) => json,
                        Err(err) => {
                            error!(%peer, %err, "failed to serialize outbound frame");
                            continue;
                        }
                    };
                    if ws_tx.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Outbound::Close => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let registry = state.registry.clone();
        let sink = sink.clone();
        async move {
            let mut connection = Connection::new(peer, sink, registry);
            while let Some(Ok(frame)) = ws_rx.next().await {
                match frame {
                    Message::Text(text) => connection.on_frame(&text).await,
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    }

    // However the tasks ended, membership cleanup runs exactly once through
    // the registry; the peer_disconnect broadcast happens there. A peer that
    // already left (or whose lobby was destroyed) is absorbed.
    if let Some(name) = state.registry.lobby_of(peer).await {
        let _ = state.registry.leave(&name, peer).await;
    }
    state.ids.release(peer);
    info!(%peer, "peer disconnected");
}
