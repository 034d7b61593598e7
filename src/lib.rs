//! Realtime WebSocket monitor for a clipboard synchronization server

pub mod cli;
pub mod monitor;
pub mod protocol;
