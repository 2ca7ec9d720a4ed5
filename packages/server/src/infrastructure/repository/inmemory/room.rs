//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! ルームごとのシャードロック（`DashMap`）でアトミック性を保証します。

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};

use crate::domain::{
    ConnectionId, LeaveOutcome, Role, Room, RoomId, RoomMembership, RoomRepository, Shape,
    Timestamp,
};

/// インメモリ Room Repository 実装
#[derive(Default)]
pub struct InMemoryRoomRepository {
    /// Key: room id, Value: Room ドメインモデル
    rooms: DashMap<RoomId, Room>,
    /// 最後に作成したルームの世代
    last_generation: AtomicU64,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join_room(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        joined_at: Timestamp,
    ) -> RoomMembership {
        match self.rooms.entry(room_id) {
            Entry::Vacant(entry) => {
                let generation = self.last_generation.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::debug!(
                    "Creating room '{}' (generation {}) with host '{}'",
                    entry.key(),
                    generation,
                    connection_id
                );
                let room = Room::new(entry.key().clone(), generation, connection_id, joined_at);
                let membership = RoomMembership {
                    room_id: room.id.clone(),
                    generation,
                    role: Role::Host,
                };
                entry.insert(room);
                membership
            }
            Entry::Occupied(mut entry) => {
                let room = entry.get_mut();
                let role = room.add_member(connection_id);
                tracing::debug!(
                    "Room '{}' now has {} connection(s)",
                    room.id,
                    room.connection_count
                );
                RoomMembership {
                    room_id: room.id.clone(),
                    generation: room.generation,
                    role,
                }
            }
        }
    }

    async fn append_shape(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
        shape: Shape,
    ) -> bool {
        self.rooms
            .get_mut(room_id)
            .is_some_and(|mut room| room.append_shape(connection_id, shape))
    }

    async fn clear_shapes(&self, connection_id: &ConnectionId, room_id: &RoomId) -> bool {
        self.rooms
            .get_mut(room_id)
            .is_some_and(|mut room| room.clear_shapes(connection_id))
    }

    async fn get_snapshot(&self, room_id: &RoomId) -> Vec<Shape> {
        self.rooms
            .get(room_id)
            .map(|room| room.shapes.clone())
            .unwrap_or_default()
    }

    async fn leave(
        &self,
        connection_id: &ConnectionId,
        membership: &RoomMembership,
    ) -> LeaveOutcome {
        let room_id = &membership.room_id;

        // 既に削除済みのルームからの退出は何もしない（冪等）
        let Entry::Occupied(mut entry) = self.rooms.entry(room_id.clone()) else {
            return LeaveOutcome::default();
        };

        // 同じ ID で作り直された別のルームには触れない
        if entry.get().generation != membership.generation {
            tracing::debug!(
                "Room '{}' was recreated (generation {} -> {}), ignoring leave of '{}'",
                room_id,
                membership.generation,
                entry.get().generation,
                connection_id
            );
            return LeaveOutcome::default();
        }

        match entry.get_mut().remove_member(connection_id) {
            Ok(outcome) => {
                if outcome.room_deleted {
                    entry.remove();
                    tracing::debug!("Room '{}' deleted", room_id);
                }
                outcome
            }
            Err(e) => {
                // 不整合なルームは残さずに削除する
                tracing::error!("{}; deleting room '{}'", e, room_id);
                let room = entry.remove();
                LeaveOutcome {
                    departed: true,
                    host_left: false,
                    room_deleted: true,
                    remaining: room
                        .members()
                        .into_iter()
                        .filter(|id| id != connection_id)
                        .collect(),
                }
            }
        }
    }

    async fn get_members(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|room| room.members())
            .unwrap_or_default()
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        self.rooms.get(room_id).map(|room| room.clone())
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let mut rooms: Vec<Room> = self.rooms.iter().map(|room| room.value().clone()).collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{Point, ShapeKind};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRoomRepository の参加・描画・クリア・退出
    // - 最初の参加者だけが host になること（並行参加を含む）
    // - host の退出でルームが即座に削除されること
    //
    // 【なぜこのテストが必要か】
    // - Room Store はルーム状態を唯一所有するコンポーネント
    // - 認可チェックと変更のアトミック性を保証する必要がある
    // ========================================

    fn id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    fn shape(shape_id: &str) -> Shape {
        Shape::new(
            shape_id.to_string(),
            ShapeKind::Freehand,
            vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)],
            "#000000".to_string(),
            2.0,
        )
        .unwrap()
    }

    fn room_id() -> RoomId {
        RoomId::new("abc123")
    }

    async fn join(repo: &InMemoryRoomRepository, name: &str) -> RoomMembership {
        repo.join_room(id(name), room_id(), Timestamp::new(0)).await
    }

    #[tokio::test]
    async fn test_first_joiner_becomes_host() {
        // テスト項目: 最初の参加者だけが host になり、以降は viewer になる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let first = repo.join_room(id("alice"), room_id(), Timestamp::new(0)).await;
        let second = repo.join_room(id("bob"), room_id(), Timestamp::new(1)).await;
        let third = repo.join_room(id("carol"), room_id(), Timestamp::new(2)).await;

        // then (期待する結果):
        assert_eq!(first.role, Role::Host);
        assert_eq!(second.role, Role::Viewer);
        assert_eq!(third.role, Role::Viewer);
        assert_eq!(first.generation, second.generation);
        let room = repo.get_room(&room_id()).await.unwrap();
        assert_eq!(room.host, id("alice"));
        assert_eq!(room.connection_count, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_joins_produce_single_host() {
        // テスト項目: 未知のルームへの並行参加でも host は 1 人だけ
        // given (前提条件):
        let repo = Arc::new(InMemoryRoomRepository::new());

        // when (操作):
        let handles: Vec<_> = (0..32)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.join_room(id(&format!("conn-{i}")), RoomId::new("room1"), Timestamp::new(i))
                        .await
                })
            })
            .collect();
        let mut roles = Vec::new();
        for handle in handles {
            roles.push(handle.await.unwrap().role);
        }

        // then (期待する結果):
        assert_eq!(roles.iter().filter(|r| **r == Role::Host).count(), 1);
        let room = repo.get_room(&RoomId::new("room1")).await.unwrap();
        assert_eq!(room.connection_count, 32);
        assert_eq!(room.viewers.len(), 31);
    }

    #[tokio::test]
    async fn test_append_shape_only_by_host() {
        // テスト項目: host の描画は受理され、viewer の描画は無視される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        repo.join_room(id("alice"), room_id(), Timestamp::new(0)).await;
        repo.join_room(id("bob"), room_id(), Timestamp::new(1)).await;

        // when (操作):
        let by_host = repo.append_shape(&id("alice"), &room_id(), shape("s1")).await;
        let by_viewer = repo.append_shape(&id("bob"), &room_id(), shape("s2")).await;

        // then (期待する結果):
        assert!(by_host);
        assert!(!by_viewer);
        let snapshot = repo.get_snapshot(&room_id()).await;
        assert_eq!(snapshot, vec![shape("s1")]);
    }

    #[tokio::test]
    async fn test_append_shape_to_unknown_room_is_rejected() {
        // テスト項目: 存在しないルームへの描画は拒否される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let accepted = repo.append_shape(&id("alice"), &room_id(), shape("s1")).await;

        // then (期待する結果):
        assert!(!accepted);
        assert!(repo.get_room(&room_id()).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_shapes_only_by_host() {
        // テスト項目: host のクリアはログを空にし、viewer のクリアは無視される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        repo.join_room(id("alice"), room_id(), Timestamp::new(0)).await;
        repo.join_room(id("bob"), room_id(), Timestamp::new(1)).await;
        repo.append_shape(&id("alice"), &room_id(), shape("s1")).await;

        // when (操作):
        let by_viewer = repo.clear_shapes(&id("bob"), &room_id()).await;
        let snapshot_after_viewer = repo.get_snapshot(&room_id()).await;
        let by_host = repo.clear_shapes(&id("alice"), &room_id()).await;

        // then (期待する結果):
        assert!(!by_viewer);
        assert_eq!(snapshot_after_viewer.len(), 1);
        assert!(by_host);
        assert!(repo.get_snapshot(&room_id()).await.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_of_unknown_room_is_empty() {
        // テスト項目: 存在しないルームのスナップショットは空
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let snapshot = repo.get_snapshot(&RoomId::new("missing")).await;

        // then (期待する結果):
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_host_leave_deletes_room() {
        // テスト項目: host が退出するとルームが削除され、次の参加者が新しい host になる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let alice = join(&repo, "alice").await;
        join(&repo, "bob").await;
        join(&repo, "carol").await;
        repo.append_shape(&id("alice"), &room_id(), shape("s1")).await;

        // when (操作):
        let outcome = repo.leave(&id("alice"), &alice).await;

        // then (期待する結果):
        assert!(outcome.host_left);
        assert!(outcome.room_deleted);
        assert_eq!(outcome.remaining, vec![id("bob"), id("carol")]);
        assert!(repo.get_room(&room_id()).await.is_none());
        assert!(repo.get_snapshot(&room_id()).await.is_empty());

        let dave = repo.join_room(id("dave"), room_id(), Timestamp::new(3)).await;
        assert_eq!(dave.role, Role::Host);
        assert!(dave.generation > alice.generation);
    }

    #[tokio::test]
    async fn test_viewer_leave_keeps_room() {
        // テスト項目: viewer の退出ではルームは残る
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        join(&repo, "alice").await;
        let bob = join(&repo, "bob").await;

        // when (操作):
        let outcome = repo.leave(&id("bob"), &bob).await;

        // then (期待する結果):
        assert!(outcome.departed);
        assert!(!outcome.room_deleted);
        assert_eq!(repo.get_members(&room_id()).await, vec![id("alice")]);
    }

    #[tokio::test]
    async fn test_leave_is_idempotent() {
        // テスト項目: 同じ退出を繰り返しても 2 回目以降は何もしない
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let alice = join(&repo, "alice").await;
        repo.leave(&id("alice"), &alice).await;

        // when (操作):
        let second = repo.leave(&id("alice"), &alice).await;

        // then (期待する結果):
        assert_eq!(second, LeaveOutcome::default());
    }

    #[tokio::test]
    async fn test_leave_of_previous_generation_is_ignored() {
        // テスト項目: 削除済みルームへの退出は、同じ ID で作り直されたルームに影響しない
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let alice = join(&repo, "alice").await;
        let stale_bob = join(&repo, "bob").await;
        repo.leave(&id("alice"), &alice).await;
        let bob = join(&repo, "bob").await;

        // when (操作):
        let outcome = repo.leave(&id("bob"), &stale_bob).await;

        // then (期待する結果):
        assert_eq!(outcome, LeaveOutcome::default());
        assert_eq!(bob.role, Role::Host);
        let room = repo.get_room(&room_id()).await.unwrap();
        assert_eq!(room.host, id("bob"));
        assert_eq!(room.generation, bob.generation);
    }

    #[tokio::test]
    async fn test_get_rooms_sorted_by_id() {
        // テスト項目: ルーム一覧が ID 順に返される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        repo.join_room(id("x"), RoomId::new("zeta"), Timestamp::new(0)).await;
        repo.join_room(id("y"), RoomId::new("alpha"), Timestamp::new(0)).await;

        // when (操作):
        let rooms = repo.get_rooms().await;

        // then (期待する結果):
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }
}
