//! Room relay server for Easel.
//!
//! A host broadcasts freehand drawing operations and a WebRTC video stream to
//! viewers inside a named room. The server tracks room membership, authorizes
//! drawing mutations, replays the shape log to late joiners, relays WebRTC
//! signaling and tears rooms down when participants leave.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
