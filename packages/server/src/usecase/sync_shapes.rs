//! UseCase: 描画状態の同期（途中参加者への再生）

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, RoomId, RoomRepository, Shape};

/// 描画状態同期のユースケース
pub struct SyncShapesUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SyncShapesUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ルームの描画ログを追加順で取得（未知のルームなら空）
    pub async fn execute(&self, room_id: &RoomId) -> Vec<Shape> {
        self.repository.get_snapshot(room_id).await
    }

    /// 要求した本人にだけスナップショットを返す
    pub async fn reply(
        &self,
        connection_id: &ConnectionId,
        message: &str,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(connection_id, message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Timestamp,
        usecase::test_support::{Fixture, drain, id, shape},
    };

    #[tokio::test]
    async fn test_sync_replays_shapes_in_order() {
        // テスト項目: スナップショットは追加順で返る
        // given (前提条件):
        let fixture = Fixture::new();
        let room_id = RoomId::new("abc123");
        fixture
            .rooms
            .join_room(id("a"), room_id.clone(), Timestamp::new(0))
            .await;
        for shape_id in ["s1", "s2", "s3"] {
            fixture
                .rooms
                .append_shape(&id("a"), &room_id, shape(shape_id))
                .await;
        }
        let usecase = SyncShapesUseCase::new(fixture.rooms.clone(), fixture.pusher.clone());

        // when (操作):
        let shapes = usecase.execute(&room_id).await;

        // then (期待する結果):
        let ids: Vec<&str> = shapes.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["s1", "s2", "s3"]);
    }

    #[tokio::test]
    async fn test_sync_unknown_room_is_empty() {
        // テスト項目: 未知のルームのスナップショットは空
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = SyncShapesUseCase::new(fixture.rooms.clone(), fixture.pusher.clone());

        // when (操作):
        let shapes = usecase.execute(&RoomId::new("nowhere")).await;

        // then (期待する結果):
        assert!(shapes.is_empty());
    }

    #[tokio::test]
    async fn test_reply_is_unicast() {
        // テスト項目: 同期の応答は要求した本人にだけ届く
        // given (前提条件):
        let fixture = Fixture::new();
        let mut rx_a = fixture.connect("a").await;
        let mut rx_b = fixture.connect("b").await;
        let usecase = SyncShapesUseCase::new(fixture.rooms.clone(), fixture.pusher.clone());

        // when (操作):
        usecase.reply(&id("b"), "sync").await.unwrap();

        // then (期待する結果):
        assert_eq!(drain(&mut rx_b), vec!["sync".to_string()]);
        assert!(drain(&mut rx_a).is_empty());
    }
}
