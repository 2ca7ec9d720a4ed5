//! UseCase: 描画クリア処理
//!
//! host からのクリアだけを受理する。既に空でもブロードキャストは行う。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomId, RoomRepository, broadcast_targets};

use super::{MutationOutcome, error::MutationError};

/// 描画クリアのユースケース
pub struct ClearShapesUseCase {
    /// Room Store
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ClearShapesUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// クリアを実行
    pub async fn execute(
        &self,
        sender: &ConnectionId,
        room_id: &RoomId,
        message: &str,
    ) -> Result<MutationOutcome, MutationError> {
        if !self.repository.clear_shapes(sender, room_id).await {
            tracing::debug!("Rejected clear from '{}' in room '{}'", sender, room_id);
            return Ok(MutationOutcome::Rejected);
        }

        let members = self.repository.get_members(room_id).await;
        let recipients = broadcast_targets(&members, sender);

        self.message_pusher
            .broadcast(recipients.clone(), message)
            .await
            .map_err(|e| MutationError::BroadcastFailed(e.to_string()))?;

        Ok(MutationOutcome::Accepted { recipients })
    }
}
