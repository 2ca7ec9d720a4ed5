//! UseCase: ルーム参加処理
//!
//! 未知のルームなら作成して host に、既存のルームなら viewer として参加する。
//! 別のルームに参加中の場合は、先にそのルームから退出する。

use std::sync::Arc;

use easel_shared::time::get_timestamp;

use crate::domain::{
    ConnectionId, ConnectionRepository, MessagePushError, MessagePusher, Role, RoomId,
    RoomRepository, Timestamp, broadcast_targets,
};

use super::{
    error::JoinRoomError,
    leave_room::{Departure, LeaveRoomUseCase},
};

/// 参加の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub role: Role,
    /// 移動前のルームからの退出
    pub previous: Option<Departure>,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Room Store
    repository: Arc<dyn RoomRepository>,
    /// Connection Registry
    connections: Arc<dyn ConnectionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    leave_room: Arc<LeaveRoomUseCase>,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        connections: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        leave_room: Arc<LeaveRoomUseCase>,
    ) -> Self {
        Self {
            repository,
            connections,
            message_pusher,
            leave_room,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(JoinOutcome)` - 参加成功（役割と、移動前ルームからの退出結果）
    /// * `Err(JoinRoomError)` - 接続が登録されていない
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<JoinOutcome, JoinRoomError> {
        // 1. 別のルームに参加中なら先に退出
        let previous = match self.connections.current_room(connection_id).await {
            Some(current) if current.room_id != room_id => {
                self.leave_room.execute(connection_id).await
            }
            _ => None,
        };

        // 2. Room Store に参加（ルームの世代が決まる）
        let membership = self
            .repository
            .join_room(
                connection_id.clone(),
                room_id.clone(),
                Timestamp::new(get_timestamp()),
            )
            .await;

        // 3. Registry に参加中のルームを記録
        if self
            .connections
            .set_current_room(connection_id, membership.clone())
            .await
            .is_err()
        {
            // 切断済みの接続をルームに残さない
            let departure = self.leave_room.depart(connection_id, membership).await;
            tracing::debug!(
                "Rolled back join of '{}' to room '{}'",
                connection_id,
                departure.room_id
            );
            return Err(JoinRoomError::ConnectionNotFound(connection_id.to_string()));
        }

        // 記録する前にルームが閉じられていたら、参照解除はこちらで行う
        let alive = self
            .repository
            .get_room(&room_id)
            .await
            .is_some_and(|room| room.generation == membership.generation);
        if !alive {
            self.connections
                .release_room(connection_id, &membership)
                .await;
        }

        tracing::info!(
            "'{}' joined room '{}' as {:?}",
            connection_id,
            room_id,
            membership.role
        );

        Ok(JoinOutcome {
            role: membership.role,
            previous,
        })
    }

    /// 参加した本人に役割を通知
    pub async fn reply_joined(
        &self,
        connection_id: &ConnectionId,
        message: &str,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(connection_id, message).await
    }

    /// 新しい参加者がいることを既存の参加者にブロードキャスト
    ///
    /// host はこれを受けて WebRTC の offer を作成する。
    pub async fn broadcast_user_connected(
        &self,
        room_id: &RoomId,
        new_connection_id: &ConnectionId,
        message: &str,
    ) -> Result<Vec<ConnectionId>, MessagePushError> {
        let members = self.repository.get_members(room_id).await;
        let targets = broadcast_targets(&members, new_connection_id);

        self.message_pusher
            .broadcast(targets.clone(), message)
            .await?;

        Ok(targets)
    }
}
