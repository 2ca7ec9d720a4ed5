//! WebSocket message DTOs.
//!
//! Every frame is a JSON object with a kebab-case `type` discriminator and
//! camelCase fields, e.g. `{"type":"join-room","roomId":"abc123"}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::SignalKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKindDto {
    Rectangle,
    Circle,
    Line,
    Freehand,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointDto {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDto {
    pub id: String,
    pub r#type: ShapeKindDto,
    pub points: Vec<PointDto>,
    pub color: String,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleDto {
    Host,
    Viewer,
}

/// Client -> server messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    JoinRoom { room_id: String },
    LeaveRoom,
    SyncRequest { room_id: String },
    Draw { room_id: String, shape: ShapeDto },
    Clear { room_id: String },
    Offer { room_id: String, payload: Value },
    Answer { room_id: String, payload: Value },
    IceCandidate { room_id: String, payload: Value },
}

/// Server -> client messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Connected { connection_id: String },
    RoomJoined { room_id: String, role: RoleDto },
    UserConnected,
    Sync { shapes: Vec<ShapeDto> },
    Draw { shape: ShapeDto },
    Clear,
    Offer { payload: Value },
    Answer { payload: Value },
    IceCandidate { payload: Value },
    HostDisconnected,
}

impl ServerMessage {
    /// Forwarded signaling message; the payload is passed through untouched.
    pub fn signal(kind: SignalKind, payload: Value) -> Self {
        match kind {
            SignalKind::Offer => ServerMessage::Offer { payload },
            SignalKind::Answer => ServerMessage::Answer { payload },
            SignalKind::IceCandidate => ServerMessage::IceCandidate { payload },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
