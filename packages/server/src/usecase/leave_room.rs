//! UseCase: ルーム退出処理（Lifecycle Manager）
//!
//! 明示的な退出、別ルームへの移動、切断のすべてがこの処理を通る。
//!
//! 1. 接続の参加中ルームを取り出す（なければ何もしない）
//! 2. Room Store から退出
//! 3. host の退出ならルームは削除済み。残りの viewer の参照を解除し、
//!    `host-disconnected` の通知対象として返す
//! 4. 空になったルームも削除済み（通知対象なし）
//!
//! 参加中ルームの取り出しは一度しか成功しないため、同じ接続に対して
//! 複数回呼ばれても退出処理は一度だけ実行される。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRepository, LeaveOutcome, MessagePushError, MessagePusher, RoomId,
    RoomMembership, RoomRepository,
};

/// 退出の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub connection_id: ConnectionId,
    pub room_id: RoomId,
    pub outcome: LeaveOutcome,
}

impl Departure {
    /// `host-disconnected` を受け取る接続（host の退出時のみ）
    pub fn host_disconnected_targets(&self) -> &[ConnectionId] {
        if self.outcome.host_left {
            &self.outcome.remaining
        } else {
            &[]
        }
    }
}

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// Room Store
    repository: Arc<dyn RoomRepository>,
    /// Connection Registry
    connections: Arc<dyn ConnectionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        connections: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            connections,
            message_pusher,
        }
    }

    /// 参加中のルームから退出
    ///
    /// # Returns
    ///
    /// * `Some(Departure)` - 退出した
    /// * `None` - どのルームにも参加していない
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Departure> {
        let membership = self.connections.take_current_room(connection_id).await?;
        Some(self.depart(connection_id, membership).await)
    }

    /// 指定したルームから退出（Registry の参照は呼び出し側で解除済み）
    pub async fn depart(
        &self,
        connection_id: &ConnectionId,
        membership: RoomMembership,
    ) -> Departure {
        let outcome = self.repository.leave(connection_id, &membership).await;

        if outcome.room_deleted {
            // 削除されたルームへの参照を残さない
            for member in &outcome.remaining {
                self.connections.release_room(member, &membership).await;
            }
        }

        let room_id = membership.room_id;

        if outcome.host_left {
            tracing::info!(
                "Host '{}' left room '{}'; room closed with {} viewer(s)",
                connection_id,
                room_id,
                outcome.remaining.len()
            );
        } else if outcome.room_deleted {
            tracing::info!("Room '{}' is empty, cleaned up", room_id);
        } else if outcome.departed {
            tracing::info!("'{}' left room '{}'", connection_id, room_id);
        } else {
            tracing::debug!(
                "'{}' was no longer a member of room '{}'",
                connection_id,
                room_id
            );
        }

        Departure {
            connection_id: connection_id.clone(),
            room_id,
            outcome,
        }
    }

    /// host の退出を残りの viewer に通知
    pub async fn broadcast_host_disconnected(
        &self,
        departure: &Departure,
        message: &str,
    ) -> Result<(), MessagePushError> {
        let targets = departure.host_disconnected_targets().to_vec();
        if targets.is_empty() {
            return Ok(());
        }
        self.message_pusher.broadcast(targets, message).await
    }
}
