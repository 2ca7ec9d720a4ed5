//! UseCase 層
//!
//! 1 つの操作につき 1 つのユースケース。依存は `Arc<dyn Trait>` で受け取る。

mod clear_shapes;
mod connect_participant;
mod disconnect_participant;
mod draw_shape;
mod error;
mod get_ice_servers;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod leave_room;
mod relay_signal;
mod sync_shapes;

pub use clear_shapes::ClearShapesUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use draw_shape::DrawShapeUseCase;
pub use error::{
    ConnectError, DisconnectError, GetRoomDetailError, JoinRoomError, MutationError, RelayError,
};
pub use get_ice_servers::GetIceServersUseCase;
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use leave_room::{Departure, LeaveRoomUseCase};
pub use relay_signal::RelaySignalUseCase;
pub use sync_shapes::SyncShapesUseCase;

use crate::domain::ConnectionId;

/// 描画・クリア操作の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// 受理され、`recipients` にブロードキャストされた
    Accepted { recipients: Vec<ConnectionId> },
    /// host 以外からの操作（エラーではなく何もしない）
    Rejected,
}

#[cfg(test)]
mod test_support;
