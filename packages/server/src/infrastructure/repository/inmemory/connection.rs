//! InMemory Connection Repository 実装
//!
//! 接続ごとの識別子と参加中ルームへの参照を保持します。Room 自体は所有しません。

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{
    Connection, ConnectionId, ConnectionRepository, ConnectionState, RepositoryError,
    RoomMembership,
};

/// インメモリ Connection Registry 実装
#[derive(Default)]
pub struct InMemoryConnectionRepository {
    connections: DashMap<ConnectionId, Connection>,
}

impl InMemoryConnectionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn register(&self, connection: Connection) {
        self.connections.insert(connection.id.clone(), connection);
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Connection> {
        self.connections
            .remove(connection_id)
            .map(|(_, connection)| connection)
    }

    async fn current_room(&self, connection_id: &ConnectionId) -> Option<RoomMembership> {
        self.connections
            .get(connection_id)
            .and_then(|connection| connection.current_room.clone())
    }

    async fn set_current_room(
        &self,
        connection_id: &ConnectionId,
        membership: RoomMembership,
    ) -> Result<Option<RoomMembership>, RepositoryError> {
        let mut connection = self
            .connections
            .get_mut(connection_id)
            .ok_or_else(|| RepositoryError::ConnectionNotFound(connection_id.to_string()))?;
        Ok(connection.current_room.replace(membership))
    }

    async fn take_current_room(&self, connection_id: &ConnectionId) -> Option<RoomMembership> {
        self.connections
            .get_mut(connection_id)
            .and_then(|mut connection| connection.current_room.take())
    }

    async fn release_room(&self, connection_id: &ConnectionId, room: &RoomMembership) -> bool {
        let Some(mut connection) = self.connections.get_mut(connection_id) else {
            return false;
        };
        // 同じ ID で作り直されたルームへの参照は残す
        if !connection
            .current_room
            .as_ref()
            .is_some_and(|current| current.is_same_room(room))
        {
            return false;
        }
        connection.current_room = None;
        true
    }

    async fn state(&self, connection_id: &ConnectionId) -> ConnectionState {
        self.connections
            .get(connection_id)
            .map(|connection| connection.state())
            .unwrap_or(ConnectionState::Disconnected)
    }
}
