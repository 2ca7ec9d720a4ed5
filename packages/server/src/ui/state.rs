//! Shared application state and dependency wiring.

use std::{sync::Arc, time::Duration};

use easel_shared::time::Clock;

use crate::{
    domain::{ConnectionRepository, IceSettings, MessagePusher, RoomRepository},
    usecase::{
        ClearShapesUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        DrawShapeUseCase, GetIceServersUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, RelaySignalUseCase, SyncShapesUseCase,
    },
};

/// Keepalive timing for WebSocket connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatSettings {
    /// Interval between server pings
    pub interval: Duration,
    /// Silence after which a client counts as disconnected
    pub client_timeout: Duration,
}

/// Shared application state
pub struct AppState {
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub sync_shapes_usecase: Arc<SyncShapesUseCase>,
    pub draw_shape_usecase: Arc<DrawShapeUseCase>,
    pub clear_shapes_usecase: Arc<ClearShapesUseCase>,
    pub relay_signal_usecase: Arc<RelaySignalUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    pub get_ice_servers_usecase: Arc<GetIceServersUseCase>,
    pub heartbeat: HeartbeatSettings,
}

impl AppState {
    /// Build every use case on top of the given infrastructure.
    ///
    /// # Arguments
    ///
    /// * `rooms` - Room Store
    /// * `connections` - Connection Registry
    /// * `message_pusher` - Outbound delivery to connected clients
    /// * `ice_settings` - STUN/TURN configuration
    /// * `clock` - Time source for TURN credential expiry
    /// * `heartbeat` - Keepalive timing
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        connections: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        ice_settings: IceSettings,
        clock: Arc<dyn Clock>,
        heartbeat: HeartbeatSettings,
    ) -> Self {
        let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
            rooms.clone(),
            connections.clone(),
            message_pusher.clone(),
        ));

        Self {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                connections.clone(),
                message_pusher.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                connections.clone(),
                message_pusher.clone(),
                leave_room_usecase.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                rooms.clone(),
                connections,
                message_pusher.clone(),
                leave_room_usecase.clone(),
            )),
            leave_room_usecase,
            sync_shapes_usecase: Arc::new(SyncShapesUseCase::new(
                rooms.clone(),
                message_pusher.clone(),
            )),
            draw_shape_usecase: Arc::new(DrawShapeUseCase::new(
                rooms.clone(),
                message_pusher.clone(),
            )),
            clear_shapes_usecase: Arc::new(ClearShapesUseCase::new(
                rooms.clone(),
                message_pusher.clone(),
            )),
            relay_signal_usecase: Arc::new(RelaySignalUseCase::new(
                rooms.clone(),
                message_pusher,
            )),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(rooms.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(rooms)),
            get_ice_servers_usecase: Arc::new(GetIceServersUseCase::new(ice_settings, clock)),
            heartbeat,
        }
    }
}
