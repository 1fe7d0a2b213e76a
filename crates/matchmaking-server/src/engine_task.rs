//! Central engine loop.
//!
//! This task owns the `MatchmakingQueue` instance and processes all
//! `EngineRequest`s coming from clients, one at a time. That makes it the
//! single writer the queue requires; no lock guards the queue itself.
//!
//! Routing policy:
//! - Every response goes **only** to the originating client.
//! - When an enqueue pairs two players, the opponent's most recent
//!   connection also receives a `matched` status push.

use std::collections::HashMap;

use matchmaking_core::{MatchmakingQueue, PlayerId, PlayerStatus, QueueConfig, Request, Response};
use tracing::{debug, info};

use crate::types::{ClientId, ClientRegistry, EngineRequest, EngineRx, OutboundTx, QueueDepthGauge};

/// Run the central engine processing loop.
///
/// - `engine_rx`: receives requests from all client tasks.
/// - `clients`: registry of connected clients and their outbound channels.
/// - `gauge`: updated with the pending-queue depth on every change.
pub async fn run_engine_loop(
    mut engine_rx: EngineRx,
    clients: ClientRegistry,
    queue_config: QueueConfig,
    gauge: QueueDepthGauge,
) {
    let mut queue = MatchmakingQueue::new(queue_config).with_observer(gauge);
    let mut routes = PlayerRoutes::default();

    while let Some(req) = engine_rx.recv().await {
        let EngineRequest { client_id, request } = req;
        debug!(
            client = client_id.0,
            kind = request.kind(),
            player_id = request.player_id(),
            "engine request"
        );

        let was_matched = queue.has_active_match(request.player_id());
        let is_enqueue = matches!(request, Request::Enqueue { .. });

        let response = queue.process_request(request);
        routes.record(client_id, &response);

        // Snapshot of current clients to minimize lock hold time.
        let current_clients = {
            let guard = clients.read().await;
            guard.clone()
        };
        routes.prune(&queue, &current_clients);

        let push = if is_enqueue && !was_matched {
            routes.opponent_push(&response)
        } else {
            None
        };

        send_to(&current_clients, client_id, response);
        if let Some((opponent_client, notice)) = push {
            if opponent_client != client_id {
                info!(
                    client = opponent_client.0,
                    player_id = notice.player_id(),
                    "pushing match to opponent"
                );
                send_to(&current_clients, opponent_client, notice);
            }
        }
    }

    info!("engine loop shutting down (engine_rx closed)");
}

/// Last connection each live player spoke on, for opponent pushes.
///
/// Only players the queue still knows (pending or holding a match) on a
/// still-registered connection are kept.
#[derive(Debug, Default)]
struct PlayerRoutes {
    routes: HashMap<PlayerId, ClientId>,
}

impl PlayerRoutes {
    /// Remember the connection behind a queued or matched status reply.
    fn record(&mut self, client_id: ClientId, response: &Response) {
        if let Response::Status {
            player_id,
            status: PlayerStatus::Queued { .. } | PlayerStatus::Matched(_),
        } = response
        {
            self.routes.insert(player_id.clone(), client_id);
        }
    }

    /// Forget players that left the queue by any path (cancel, ack, TTL
    /// eviction during someone else's call) and connections that closed.
    fn prune(&mut self, queue: &MatchmakingQueue, clients: &HashMap<ClientId, OutboundTx>) {
        self.routes.retain(|player_id, client| {
            clients.contains_key(&*client) && queue.is_known(player_id)
        });
    }

    /// For a fresh pairing, build the `matched` notice for the other player.
    fn opponent_push(&self, response: &Response) -> Option<(ClientId, Response)> {
        let Response::Status {
            player_id,
            status: PlayerStatus::Matched(game),
        } = response
        else {
            return None;
        };

        let opponent = game.opponent_of(player_id)?;
        let opponent_client = *self.routes.get(opponent)?;
        Some((
            opponent_client,
            Response::status(opponent.clone(), PlayerStatus::Matched(game.clone())),
        ))
    }

    #[cfg(test)]
    fn client_of(&self, player_id: &str) -> Option<ClientId> {
        self.routes.get(player_id).copied()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.routes.len()
    }
}

fn send_to(clients: &HashMap<ClientId, OutboundTx>, client_id: ClientId, response: Response) {
    if let Some(tx) = clients.get(&client_id) {
        let _ = tx.send(response);
    }
}
