use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use presence_events::{BroadcastHub, HubFrame};

use crate::state::AppState;

/// GET /ws
///
/// Upgrades to a WebSocket that receives every `STATUS_UPDATE` and
/// `ATTENDANCE_UPDATE` event. No authentication.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Subscribes to the hub.
///   2. Spawns a sender task that forwards hub frames to the sink.
///   3. Drains inbound messages on the current task until the peer leaves.
///   4. Unsubscribes on disconnect.
async fn handle_socket(socket: WebSocket, hub: Arc<BroadcastHub>) {
    let subscription = hub.subscribe().await;
    let conn_id = subscription.id;
    let mut rx = subscription.receiver;
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let closing = frame == HubFrame::Close;
            if sink.send(to_message(frame)).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    // Clients only listen; inbound frames other than Close are ignored.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    hub.unsubscribe(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

fn to_message(frame: HubFrame) -> Message {
    match frame {
        HubFrame::Payload(text) => Message::Text(text.as_ref().into()),
        HubFrame::Ping => Message::Ping(Default::default()),
        HubFrame::Close => Message::Close(None),
    }
}
