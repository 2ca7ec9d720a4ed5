//! Utilities shared by the Easel packages: logging setup and time handling.

pub mod logger;
pub mod time;
