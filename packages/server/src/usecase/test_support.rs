//! UseCase テスト用の共通ヘルパー

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    domain::{
        Connection, ConnectionId, ConnectionRepository, MessagePusher, Point, Shape, ShapeKind,
        Timestamp,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryConnectionRepository, InMemoryRoomRepository},
    },
};

pub fn id(value: &str) -> ConnectionId {
    ConnectionId::new(value.to_string()).unwrap()
}

pub fn shape(shape_id: &str) -> Shape {
    Shape::new(
        shape_id.to_string(),
        ShapeKind::Freehand,
        vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)],
        "#000000".to_string(),
        2.0,
    )
    .unwrap()
}

/// インメモリ実装一式
pub struct Fixture {
    pub rooms: Arc<InMemoryRoomRepository>,
    pub connections: Arc<InMemoryConnectionRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(InMemoryRoomRepository::new()),
            connections: Arc::new(InMemoryConnectionRepository::new()),
            pusher: Arc::new(WebSocketMessagePusher::new()),
        }
    }

    /// 接続を Registry と MessagePusher に登録し、受信側を返す
    pub async fn connect(&self, name: &str) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections
            .register(Connection::new(id(name), Timestamp::new(0)))
            .await;
        self.pusher.register_client(id(name), tx).await;
        rx
    }
}

/// 受信済みのメッセージをすべて取り出す
pub fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}
