//! Domain layer: value objects, entities, and the interfaces other layers implement.

pub mod entity;
pub mod error;
pub mod ice;
pub mod message_pusher;
pub mod relay;
pub mod repository;
pub mod value_object;

pub use entity::{
    Connection, ConnectionState, LeaveOutcome, Point, Role, Room, RoomMembership, Shape, ShapeKind,
};
pub use error::{MessagePushError, RepositoryError, RoomInvariantError, ValueObjectError};
pub use ice::{IceServer, IceServerSet, IceSettings};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use relay::{SignalKind, broadcast_targets};
pub use repository::{ConnectionRepository, RoomRepository};
pub use value_object::{ConnectionId, ConnectionIdFactory, RoomId, Timestamp};
