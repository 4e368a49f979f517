//! Musical-chairs party game: a spinning wheel of seated participants that
//! stops with the music and picks whoever sits nearest the pointer.

pub mod config;
pub mod http;
pub mod party;
pub mod store;
pub mod telemetry;
pub mod util;
pub mod wheel;
