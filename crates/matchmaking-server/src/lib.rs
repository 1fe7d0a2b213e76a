//! matchmaking-server
//!
//! Multi-client async TCP server for the matchmaking queue.

pub mod config;
pub mod logger;
pub mod server;
pub mod types;

// these are internal modules, not re-exported
mod client;
mod engine_task;
