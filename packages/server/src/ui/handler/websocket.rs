//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{
    sync::mpsc,
    time::{Instant, MissedTickBehavior},
};

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, RoomId, Shape, SignalKind},
    infrastructure::dto::websocket::{ClientMessage, ServerMessage, ShapeDto},
    ui::state::AppState,
    usecase::{Departure, MutationOutcome},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that pushes queued messages to the WebSocket sender and
/// pings the client every `heartbeat_interval`.
///
/// # Arguments
///
/// * `rx` - Channel receiver for messages addressed to this client
/// * `sender` - WebSocket sink to send messages to this client
/// * `heartbeat_interval` - Interval between pings
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    heartbeat_interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut heartbeat =
            tokio::time::interval_at(Instant::now() + heartbeat_interval, heartbeat_interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    if sender.send(Message::Text(msg.into())).await.is_err() {
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionIdFactory::generate();

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    if let Err(e) = state
        .connect_participant_usecase
        .execute(connection_id.clone(), tx)
        .await
    {
        tracing::warn!("Rejecting connection '{}': {}", connection_id, e);
        return;
    }
    tracing::info!("'{}' connected", connection_id);

    let connected = ServerMessage::Connected {
        connection_id: connection_id.to_string(),
    };
    if let Some(json) = render(&connected)
        && let Err(e) = state
            .connect_participant_usecase
            .send_connected(&connection_id, &json)
            .await
    {
        tracing::warn!("Failed to send connected to '{}': {}", connection_id, e);
    }

    let (sender, mut receiver) = socket.split();

    let mut send_task = pusher_loop(rx, sender, state.heartbeat.interval);

    let recv_state = state.clone();
    let recv_connection_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        let client_timeout = recv_state.heartbeat.client_timeout;
        loop {
            let msg = match tokio::time::timeout(client_timeout, receiver.next()).await {
                Ok(Some(Ok(msg))) => msg,
                Ok(Some(Err(e))) => {
                    tracing::warn!("WebSocket error on '{}': {}", recv_connection_id, e);
                    break;
                }
                Ok(None) => break,
                Err(_) => {
                    tracing::info!(
                        "'{}' silent for {:?}, dropping connection",
                        recv_connection_id,
                        client_timeout
                    );
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(message) => {
                            handle_client_message(&recv_state, &recv_connection_id, message).await
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Ignoring malformed frame from '{}': {}",
                                recv_connection_id,
                                e
                            );
                        }
                    }
                }
                Message::Close(_) => {
                    tracing::info!("'{}' requested close", recv_connection_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    let recv_finished = tokio::select! {
        _ = &mut recv_task => true,
        _ = &mut send_task => false,
    };
    if recv_finished {
        send_task.abort();
    } else {
        recv_task.abort();
        // a frame handler must not touch the rooms after the disconnect pass
        let _ = recv_task.await;
    }

    match state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await
    {
        Ok(Some(departure)) => notify_host_disconnected(&state, &departure).await,
        Ok(None) => {}
        Err(e) => tracing::debug!("Skipping disconnect: {}", e),
    }
}

async fn handle_client_message(
    state: &AppState,
    connection_id: &ConnectionId,
    message: ClientMessage,
) {
    match message {
        ClientMessage::JoinRoom { room_id } => {
            join_room(state, connection_id, RoomId::new(room_id)).await
        }
        ClientMessage::LeaveRoom => {
            if let Some(departure) = state.leave_room_usecase.execute(connection_id).await {
                notify_host_disconnected(state, &departure).await;
            }
        }
        ClientMessage::SyncRequest { room_id } => {
            let shapes = state
                .sync_shapes_usecase
                .execute(&RoomId::new(room_id))
                .await;
            let reply = ServerMessage::Sync {
                shapes: shapes.iter().map(ShapeDto::from).collect(),
            };
            if let Some(json) = render(&reply)
                && let Err(e) = state.sync_shapes_usecase.reply(connection_id, &json).await
            {
                tracing::warn!("Failed to send sync to '{}': {}", connection_id, e);
            }
        }
        ClientMessage::Draw { room_id, shape } => {
            let domain_shape = match Shape::try_from(shape.clone()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("Dropping invalid shape from '{}': {}", connection_id, e);
                    return;
                }
            };
            let Some(json) = render(&ServerMessage::Draw { shape }) else {
                return;
            };
            let result = state
                .draw_shape_usecase
                .execute(connection_id, &RoomId::new(room_id), domain_shape, &json)
                .await;
            log_mutation("draw", connection_id, result);
        }
        ClientMessage::Clear { room_id } => {
            let Some(json) = render(&ServerMessage::Clear) else {
                return;
            };
            let result = state
                .clear_shapes_usecase
                .execute(connection_id, &RoomId::new(room_id), &json)
                .await;
            log_mutation("clear", connection_id, result);
        }
        ClientMessage::Offer { room_id, payload } => {
            relay(state, connection_id, room_id, SignalKind::Offer, payload).await
        }
        ClientMessage::Answer { room_id, payload } => {
            relay(state, connection_id, room_id, SignalKind::Answer, payload).await
        }
        ClientMessage::IceCandidate { room_id, payload } => {
            relay(state, connection_id, room_id, SignalKind::IceCandidate, payload).await
        }
    }
}

async fn join_room(state: &AppState, connection_id: &ConnectionId, room_id: RoomId) {
    let outcome = match state
        .join_room_usecase
        .execute(connection_id, room_id.clone())
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!("Join failed: {}", e);
            return;
        }
    };

    if let Some(previous) = &outcome.previous {
        notify_host_disconnected(state, previous).await;
    }

    let joined = ServerMessage::RoomJoined {
        room_id: room_id.to_string(),
        role: outcome.role.into(),
    };
    if let Some(json) = render(&joined)
        && let Err(e) = state
            .join_room_usecase
            .reply_joined(connection_id, &json)
            .await
    {
        tracing::warn!("Failed to send room-joined to '{}': {}", connection_id, e);
    }

    if let Some(json) = render(&ServerMessage::UserConnected)
        && let Err(e) = state
            .join_room_usecase
            .broadcast_user_connected(&room_id, connection_id, &json)
            .await
    {
        tracing::warn!("Failed to broadcast user-connected: {}", e);
    }
}

async fn relay(
    state: &AppState,
    connection_id: &ConnectionId,
    room_id: String,
    kind: SignalKind,
    payload: serde_json::Value,
) {
    let Some(json) = render(&ServerMessage::signal(kind, payload)) else {
        return;
    };
    if let Err(e) = state
        .relay_signal_usecase
        .execute(connection_id, &RoomId::new(room_id), kind, &json)
        .await
    {
        tracing::warn!("Failed to relay {}: {}", kind.as_str(), e);
    }
}

async fn notify_host_disconnected(state: &AppState, departure: &Departure) {
    if departure.host_disconnected_targets().is_empty() {
        return;
    }
    let Some(json) = render(&ServerMessage::HostDisconnected) else {
        return;
    };
    if let Err(e) = state
        .leave_room_usecase
        .broadcast_host_disconnected(departure, &json)
        .await
    {
        tracing::warn!("Failed to broadcast host-disconnected: {}", e);
    }
}

fn log_mutation<E: std::fmt::Display>(
    kind: &str,
    connection_id: &ConnectionId,
    result: Result<MutationOutcome, E>,
) {
    match result {
        Ok(MutationOutcome::Accepted { recipients }) => tracing::debug!(
            "Broadcast {} from '{}' to {} viewer(s)",
            kind,
            connection_id,
            recipients.len()
        ),
        Ok(MutationOutcome::Rejected) => {}
        Err(e) => tracing::warn!("Failed to broadcast {}: {}", kind, e),
    }
}

fn render(message: &ServerMessage) -> Option<String> {
    match message.to_json() {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize server message: {}", e);
            None
        }
    }
}
