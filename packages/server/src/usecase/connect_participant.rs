//! UseCase: 接続処理
//!
//! トランスポート接続時に Connection Registry と MessagePusher へ登録する。

use std::sync::Arc;

use easel_shared::time::get_timestamp;

use crate::domain::{
    Connection, ConnectionId, ConnectionRepository, ConnectionState, MessagePushError,
    MessagePusher, PusherChannel, Timestamp,
};

use super::error::ConnectError;

/// 接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Connection Registry
    connections: Arc<dyn ConnectionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            connections,
            message_pusher,
        }
    }

    /// 接続を登録
    ///
    /// # Returns
    ///
    /// * `Ok(Timestamp)` - 接続成功（接続時刻を返す）
    /// * `Err(ConnectError)` - 同じ ID の接続が既に存在する
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<Timestamp, ConnectError> {
        // 1. 重複チェック
        if self.connections.state(&connection_id).await != ConnectionState::Disconnected {
            return Err(ConnectError::DuplicateConnectionId(
                connection_id.into_string(),
            ));
        }

        // 2. Registry に登録
        let connected_at = Timestamp::new(get_timestamp());
        self.connections
            .register(Connection::new(connection_id.clone(), connected_at))
            .await;

        // 3. MessagePusher に登録
        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        Ok(connected_at)
    }

    /// 接続した本人に接続 ID を通知
    pub async fn send_connected(
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
    use crate::usecase::test_support::{Fixture, id};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_connect_registers_connection() {
        // テスト項目: 接続すると Registry と MessagePusher に登録される
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase =
            ConnectParticipantUseCase::new(fixture.connections.clone(), fixture.pusher.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase.execute(id("alice"), tx).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            fixture.connections.state(&id("alice")).await,
            ConnectionState::Connecting
        );
        usecase.send_connected(&id("alice"), "hello").await.unwrap();
        assert_eq!(rx.recv().await, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn test_connect_duplicate_error() {
        // テスト項目: 同じ ID での二重登録はエラーになる
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase =
            ConnectParticipantUseCase::new(fixture.connections.clone(), fixture.pusher.clone());
        let (tx1, _rx1) = mpsc::unbounded_channel();
        usecase.execute(id("alice"), tx1).await.unwrap();

        // when (操作):
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let result = usecase.execute(id("alice"), tx2).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConnectError::DuplicateConnectionId("alice".to_string()))
        );
        assert_eq!(fixture.pusher.client_count(), 1);
    }
}
