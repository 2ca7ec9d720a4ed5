//! UseCase: ルーム一覧取得

use std::sync::Arc;

use crate::domain::{Room, RoomRepository};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 現在存在するルームを ID 順で取得
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.get_rooms().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RoomId, Timestamp},
        usecase::test_support::{Fixture, id},
    };

    #[tokio::test]
    async fn test_get_rooms_empty() {
        // テスト項目: ルームがなければ空の一覧が返る
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = GetRoomsUseCase::new(fixture.rooms.clone());

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert!(rooms.is_empty());
    }

    #[tokio::test]
    async fn test_get_rooms_sorted_by_id() {
        // テスト項目: 一覧はルーム ID 順に並ぶ
        // given (前提条件):
        let fixture = Fixture::new();
        for (name, room) in [("a", "zeta"), ("b", "alpha"), ("c", "mid")] {
            fixture
                .rooms
                .join_room(id(name), RoomId::new(room), Timestamp::new(0))
                .await;
        }
        let usecase = GetRoomsUseCase::new(fixture.rooms.clone());

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        let ids: Vec<String> = rooms.iter().map(|room| room.id.to_string()).collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
    }
}
