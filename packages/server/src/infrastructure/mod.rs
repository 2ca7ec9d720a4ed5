//! Infrastructure layer: concrete repositories, message pushers and wire DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;
