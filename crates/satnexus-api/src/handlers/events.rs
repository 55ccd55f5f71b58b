//! WebSocket notification feed
//!
//! Every connection receives the global feed. A client can additionally join
//! the room of one analysis by sending
//! `{"action": "join-analysis", "analysisId": "<id>"}`.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use satnexus_core::models::AnalysisId;
use satnexus_core::ports::Notification;
use satnexus_engine::NotificationHub;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::dto::ClientMessage;
use crate::state::AppState;

/// Notifications buffered per connection before forwarders wait
const OUTBOUND_BUFFER: usize = 64;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    let hub = state.hub.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

async fn handle_socket(socket: WebSocket, hub: NotificationHub) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Notification>(OUTBOUND_BUFFER);
    let mut forwarders = vec![forward(hub.subscribe(), tx.clone())];

    tracing::info!(subscribers = hub.subscriber_count(), "WebSocket client connected");

    let writer = tokio::spawn(async move {
        while let Some(notification) = rx.recv().await {
            let text = match serde_json::to_string(&notification) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to encode notification");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(ClientMessage::JoinAnalysis { analysis_id }) => {
                    match AnalysisId::parse(&analysis_id)
                        .and_then(|id| hub.subscribe_room(id).map(|room| (id, room)))
                    {
                        Ok((id, room)) => {
                            tracing::debug!(analysis_id = %id, "Client joined analysis room");
                            forwarders.push(forward(room, tx.clone()));
                        }
                        Err(e) => tracing::debug!(error = %e, "Ignoring invalid join request"),
                    }
                }
                Err(e) => tracing::debug!(error = %e, "Ignoring unrecognized client message"),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    for forwarder in &forwarders {
        forwarder.abort();
    }
    writer.abort();
    hub.prune_rooms();

    tracing::info!("WebSocket client disconnected");
}

/// Pump one broadcast subscription into the connection's outbound queue
fn forward(
    mut source: broadcast::Receiver<Notification>,
    outbound: mpsc::Sender<Notification>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match source.recv().await {
                Ok(notification) => {
                    if outbound.send(notification).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "WebSocket client lagging, dropped notifications");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
