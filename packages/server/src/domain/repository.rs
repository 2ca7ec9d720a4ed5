//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    Connection, ConnectionId, ConnectionState, LeaveOutcome, RepositoryError, Room, RoomId,
    RoomMembership, Shape, Timestamp,
};

/// Room Store
///
/// ルーム ID からルーム状態へのマッピング。
/// 同じルームに対する操作は直列化され（認可チェックと変更はアトミック）、
/// 異なるルームに対する操作は互いにブロックしない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルームに参加する。未知のルームなら新しい世代で作成して host になる
    async fn join_room(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        joined_at: Timestamp,
    ) -> RoomMembership;

    /// host であれば Shape をログに追加する（受理されたかを返す）
    async fn append_shape(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
        shape: Shape,
    ) -> bool;

    /// host であれば Shape ログを空にする（受理されたかを返す）
    async fn clear_shapes(&self, connection_id: &ConnectionId, room_id: &RoomId) -> bool;

    /// 現在の Shape ログを取得（ルームが存在しなければ空）
    async fn get_snapshot(&self, room_id: &RoomId) -> Vec<Shape>;

    /// ルームから退出する。世代の異なるルームには何もしない
    async fn leave(
        &self,
        connection_id: &ConnectionId,
        membership: &RoomMembership,
    ) -> LeaveOutcome;

    /// ルームに参加中の接続（host が先頭）
    async fn get_members(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    /// ルームのスナップショットを取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 全ルームのスナップショットを取得
    async fn get_rooms(&self) -> Vec<Room>;
}

/// Connection Registry
///
/// 接続ごとの識別子と参加中ルームへの参照（Room は所有しない）を管理する。
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// 接続を登録
    async fn register(&self, connection: Connection);

    /// 接続の登録を解除。最初の呼び出しだけが `Some` を返す
    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// 参加中のルームを取得
    async fn current_room(&self, connection_id: &ConnectionId) -> Option<RoomMembership>;

    /// 参加中のルームを設定し、以前のルームを返す
    async fn set_current_room(
        &self,
        connection_id: &ConnectionId,
        membership: RoomMembership,
    ) -> Result<Option<RoomMembership>, RepositoryError>;

    /// 参加中のルームを取り出す（以後は未参加扱い）
    async fn take_current_room(&self, connection_id: &ConnectionId) -> Option<RoomMembership>;

    /// 参加中のルームが `room` と同じ世代のルームであれば解除する
    async fn release_room(&self, connection_id: &ConnectionId, room: &RoomMembership) -> bool;

    /// 接続のライフサイクル状態
    async fn state(&self, connection_id: &ConnectionId) -> ConnectionState;
}
