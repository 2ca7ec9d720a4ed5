//! In-memory repositories.
//!
//! State lives only as long as the process. Both maps are `DashMap`s: each key
//! hashes to one shard lock, so operations on one room (or one connection)
//! are serialized while unrelated keys proceed in parallel. No `.await`
//! happens while a shard guard is held.

pub mod connection;
pub mod room;

pub use connection::InMemoryConnectionRepository;
pub use room::InMemoryRoomRepository;
