//! Shared types for the matchmaking TCP server.
//!
//! This module defines:
//! - `ClientId`: a lightweight handle for connected clients
//! - channel aliases between clients and the engine loop
//! - `EngineRequest`: messages flowing from clients to the engine
//! - `QueueDepthGauge`: the engine's queue-depth observer

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use matchmaking_core::{QueueObserver, Request, Response};
use tokio::sync::mpsc;
use tokio::sync::RwLock;

/// Identifier for a connected client.
///
/// Opaque; unique over the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub u64);

/// Outbound responses from the engine to a given client.
pub type OutboundTx = mpsc::UnboundedSender<Response>;
pub type OutboundRx = mpsc::UnboundedReceiver<Response>;

/// Registry of connected clients and their outbound channels.
pub type ClientRegistry = Arc<RwLock<HashMap<ClientId, OutboundTx>>>;

/// Message flowing from a client task into the central engine task.
#[derive(Debug)]
pub struct EngineRequest {
    pub client_id: ClientId,
    pub request: Request,
}

/// Channel from clients → engine task.
pub type EngineTx = mpsc::UnboundedSender<EngineRequest>;
pub type EngineRx = mpsc::UnboundedReceiver<EngineRequest>;

/// Latest pending-queue depth, written by the engine, readable anywhere.
#[derive(Debug, Default, Clone)]
pub struct QueueDepthGauge(Arc<AtomicUsize>);

impl QueueDepthGauge {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

impl QueueObserver for QueueDepthGauge {
    fn queue_size_changed(&self, depth: usize) {
        self.0.store(depth, Ordering::Relaxed);
        tracing::debug!(depth, "matchmaking queue size changed");
    }
}
