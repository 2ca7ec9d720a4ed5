//! UseCase: 参加者切断処理
//!
//! トランスポート切断時に一度だけ実行される。
//!
//! 1. Registry から接続を削除（二度目以降はここで止まる）
//! 2. MessagePusher から登録解除
//! 3. 参加中のルームがあれば退出処理（Lifecycle Manager）

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository, MessagePusher};

use super::{
    error::DisconnectError,
    leave_room::{Departure, LeaveRoomUseCase},
};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Connection Registry
    connections: Arc<dyn ConnectionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    leave_room: Arc<LeaveRoomUseCase>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        leave_room: Arc<LeaveRoomUseCase>,
    ) -> Self {
        Self {
            connections,
            message_pusher,
            leave_room,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Departure))` - ルームから退出した（host なら通知が必要）
    /// * `Ok(None)` - どのルームにも参加していなかった
    /// * `Err(DisconnectError)` - 既に切断済み
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<Departure>, DisconnectError> {
        // 1. Registry から削除
        let connection = self
            .connections
            .unregister(connection_id)
            .await
            .ok_or_else(|| DisconnectError::NotConnected(connection_id.to_string()))?;

        // 2. MessagePusher から登録解除
        self.message_pusher.unregister_client(connection_id).await;

        // 3. 参加中のルームから退出
        let departure = match connection.current_room {
            Some(membership) => Some(self.leave_room.depart(connection_id, membership).await),
            None => None,
        };

        tracing::info!("'{}' disconnected", connection_id);

        Ok(departure)
    }
}
