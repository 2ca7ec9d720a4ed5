//! UseCase: 描画処理
//!
//! host からの描画だけを受理し、ルームの他のメンバーへブロードキャストする。
//! host 以外からの描画はエラーにせず黙って捨てる。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, RoomId, RoomRepository, Shape, broadcast_targets,
};

use super::{MutationOutcome, error::MutationError};

/// 描画のユースケース
pub struct DrawShapeUseCase {
    /// Room Store
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DrawShapeUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 描画を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 描画したクライアントの ID
    /// * `room_id` - 描画先のルーム
    /// * `shape` - 追加する図形
    /// * `message` - ブロードキャストする JSON（受理された場合のみ送信）
    pub async fn execute(
        &self,
        sender: &ConnectionId,
        room_id: &RoomId,
        shape: Shape,
        message: &str,
    ) -> Result<MutationOutcome, MutationError> {
        // 1. 認可チェックと追加（ルーム単位でアトミック）
        if !self.repository.append_shape(sender, room_id, shape).await {
            tracing::debug!("Rejected draw from '{}' in room '{}'", sender, room_id);
            return Ok(MutationOutcome::Rejected);
        }

        // 2. 送信者以外のメンバーへブロードキャスト
        let members = self.repository.get_members(room_id).await;
        let recipients = broadcast_targets(&members, sender);

        self.message_pusher
            .broadcast(recipients.clone(), message)
            .await
            .map_err(|e| MutationError::BroadcastFailed(e.to_string()))?;

        Ok(MutationOutcome::Accepted { recipients })
    }
}
