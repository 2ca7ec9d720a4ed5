//! UseCase: WebRTC シグナリングの中継
//!
//! ペイロードは解釈も保存もせず、送信者以外のルームメンバーへそのまま転送する。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, RoomId, RoomRepository, SignalKind, broadcast_targets,
};

use super::error::RelayError;

/// シグナリング中継のユースケース
pub struct RelaySignalUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelaySignalUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 中継を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 転送先（未知のルームなら空）
    pub async fn execute(
        &self,
        sender: &ConnectionId,
        room_id: &RoomId,
        kind: SignalKind,
        message: &str,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        let members = self.repository.get_members(room_id).await;
        let targets = broadcast_targets(&members, sender);

        if targets.is_empty() {
            tracing::debug!(
                "No peers for {} from '{}' in room '{}'",
                kind.as_str(),
                sender,
                room_id
            );
            return Ok(targets);
        }

        self.message_pusher
            .broadcast(targets.clone(), message)
            .await
            .map_err(|e| RelayError::BroadcastFailed(e.to_string()))?;

        tracing::debug!(
            "Relayed {} from '{}' to {} peer(s)",
            kind.as_str(),
            sender,
            targets.len()
        );

        Ok(targets)
    }
}
