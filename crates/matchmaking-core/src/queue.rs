//! The matchmaking queue engine.
//!
//! Owns all mutable matchmaking state:
//! - `pending`: players waiting for an opponent, oldest first.
//! - `matches`: matches not yet retired by acknowledgment.
//! - `player_index`: player -> outstanding match.
//!
//! Every public operation runs to completion against `&mut self`, so a
//! single owner (the server's engine task, or a test) serializes all
//! state transitions. Pairing touches all three collections and is never
//! observable half-applied.
//!
//! Expiry is lazy: entries older than the TTL are evicted at the start of
//! the next call, never by a background timer. An entry can therefore look
//! queued past its TTL until something touches the engine.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{AckPolicy, QueueConfig};
use crate::entry::{PlayerId, QueueEntry, Timestamp};
use crate::error::MatchmakingError;
use crate::game::{Match, MatchId};
use crate::ids::{MatchIdGenerator, UuidMatchIds};
use crate::messages::{Request, Response};
use crate::observer::{NoopObserver, QueueObserver};
use crate::status::PlayerStatus;

/// Seconds one pairing is assumed to take when estimating waits.
const SECONDS_PER_PAIRING: u64 = 10;

/// A match that has not been retired yet, plus who has acknowledged it.
#[derive(Debug)]
struct ActiveMatch {
    game: Arc<Match>,
    acknowledged: HashSet<PlayerId>,
}

pub struct MatchmakingQueue {
    config: QueueConfig,

    pending: VecDeque<QueueEntry>,

    /// Match id -> match awaiting acknowledgment.
    matches: HashMap<MatchId, ActiveMatch>,

    /// Player -> their outstanding match. Holds the match itself (not the
    /// id) so a player keeps seeing it after the record was retired.
    player_index: HashMap<PlayerId, Arc<Match>>,

    clock: Box<dyn Clock>,
    ids: Box<dyn MatchIdGenerator>,
    observer: Box<dyn QueueObserver>,
}

impl std::fmt::Debug for MatchmakingQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchmakingQueue")
            .field("config", &self.config)
            .field("pending", &self.pending)
            .field("matches", &self.matches.len())
            .field("player_index", &self.player_index.len())
            .finish()
    }
}

impl Default for MatchmakingQueue {
    fn default() -> Self {
        MatchmakingQueue::new(QueueConfig::default())
    }
}

impl MatchmakingQueue {
    /// Create an empty queue on the system clock with uuid match ids.
    pub fn new(config: QueueConfig) -> Self {
        MatchmakingQueue {
            config,
            pending: VecDeque::new(),
            matches: HashMap::new(),
            player_index: HashMap::new(),
            clock: Box::new(SystemClock),
            ids: Box::new(UuidMatchIds),
            observer: Box::new(NoopObserver),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_id_generator(mut self, ids: impl MatchIdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_observer(mut self, observer: impl QueueObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Dispatch a transport-level request to the matching operation.
    pub fn process_request(&mut self, request: Request) -> Response {
        if request.player_id().is_empty() {
            return Response::rejected("", MatchmakingError::EmptyPlayerId);
        }

        match request {
            Request::Enqueue { player_id, pet_id } => {
                let status = self.enqueue(&player_id, pet_id);
                Response::status(player_id, status)
            }
            Request::Cancel { player_id } => {
                if self.cancel(&player_id) {
                    Response::Cancelled { player_id }
                } else {
                    let error = MatchmakingError::NotQueued(player_id.clone());
                    Response::rejected(player_id, error)
                }
            }
            Request::Status { player_id } => {
                let status = self.get_status(&player_id);
                Response::status(player_id, status)
            }
            Request::Acknowledge { player_id } => match self.acknowledge_match(&player_id) {
                Some(game) => Response::Acknowledged { player_id, game },
                None => {
                    let error = MatchmakingError::NoActiveMatch(player_id.clone());
                    Response::rejected(player_id, error)
                }
            },
        }
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Put a player in the queue, pairing immediately if an opponent waits.
    ///
    /// Idempotent: a matched player gets their match back untouched, and a
    /// queued player keeps their original `enqueued_at`.
    pub fn enqueue(&mut self, player_id: &str, pet_id: Option<String>) -> PlayerStatus {
        let now = self.clock.now_ms();
        self.evict_expired(now);

        if let Some(game) = self.player_index.get(player_id) {
            return PlayerStatus::Matched(Arc::clone(game));
        }

        if let Some(entry) = self.find_pending(player_id) {
            return PlayerStatus::Queued {
                enqueued_at: entry.enqueued_at,
                estimated_wait_seconds: self.estimated_wait_seconds(),
            };
        }

        self.pending.push_back(QueueEntry::new(player_id, pet_id, now));
        info!(player_id, depth = self.pending.len(), "player enqueued for matchmaking");
        self.notify_depth();

        self.pair_waiting_players(now);

        self.current_status(player_id)
    }

    /// Remove a waiting player. Returns `false` if they are not pending,
    /// which includes players that have already been paired.
    pub fn cancel(&mut self, player_id: &str) -> bool {
        let now = self.clock.now_ms();
        self.evict_expired(now);

        let Some(pos) = self.pending.iter().position(|e| e.player_id == player_id) else {
            debug!(player_id, "cancel for player not in queue");
            return false;
        };

        self.pending.remove(pos);
        info!(player_id, "player removed from matchmaking queue");
        self.notify_depth();
        true
    }

    /// Current state of a player. Only mutation is eviction.
    pub fn get_status(&mut self, player_id: &str) -> PlayerStatus {
        let now = self.clock.now_ms();
        self.evict_expired(now);
        self.current_status(player_id)
    }

    /// Confirm a player has seen their match and clear their index entry.
    ///
    /// Returns `None` if the player has no outstanding match. When the
    /// match record itself is retired depends on [`AckPolicy`].
    pub fn acknowledge_match(&mut self, player_id: &str) -> Option<Arc<Match>> {
        let game = self.player_index.remove(player_id)?;
        let match_id = &game.match_id;

        match self.config.ack_policy {
            AckPolicy::FirstPlayer => {
                self.matches.remove(match_id);
            }
            AckPolicy::AllPlayers => {
                let retire = match self.matches.get_mut(match_id) {
                    Some(active) => {
                        active.acknowledged.insert(player_id.to_string());
                        game.players
                            .iter()
                            .all(|p| active.acknowledged.contains(&p.player_id))
                    }
                    None => false,
                };
                if retire {
                    self.matches.remove(match_id);
                }
            }
        }

        info!(
            player_id,
            match_id = %game.match_id,
            retired = !self.matches.contains_key(match_id),
            "match acknowledged by player"
        );

        Some(game)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// `ceil(pending / 2 * 10)` seconds, or `None` with fewer than two waiting.
    pub fn estimated_wait_seconds(&self) -> Option<u64> {
        let waiting = self.pending.len() as u64;
        if waiting < 2 {
            return None;
        }
        Some((waiting * SECONDS_PER_PAIRING).div_ceil(2))
    }

    /// True while the player holds an unacknowledged match. Does not evict.
    pub fn has_active_match(&self, player_id: &str) -> bool {
        self.player_index.contains_key(player_id)
    }

    /// True while the player is pending or holds an unacknowledged match.
    /// Does not evict, so an expired head still counts until the next call.
    pub fn is_known(&self, player_id: &str) -> bool {
        self.has_active_match(player_id) || self.find_pending(player_id).is_some()
    }

    /// Number of players waiting. Does not evict.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Matches not yet retired by acknowledgment.
    pub fn active_match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn get_match(&self, match_id: &MatchId) -> Option<Arc<Match>> {
        self.matches.get(match_id).map(|m| Arc::clone(&m.game))
    }

    /// Waiting entries, oldest first.
    pub fn pending_entries(&self) -> impl Iterator<Item = &QueueEntry> {
        self.pending.iter()
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn find_pending(&self, player_id: &str) -> Option<&QueueEntry> {
        self.pending.iter().find(|e| e.player_id == player_id)
    }

    fn current_status(&self, player_id: &str) -> PlayerStatus {
        if let Some(game) = self.player_index.get(player_id) {
            return PlayerStatus::Matched(Arc::clone(game));
        }

        match self.find_pending(player_id) {
            Some(entry) => PlayerStatus::Queued {
                enqueued_at: entry.enqueued_at,
                estimated_wait_seconds: self.estimated_wait_seconds(),
            },
            None => PlayerStatus::Idle,
        }
    }

    /// Pair the two oldest entries while at least two are waiting.
    fn pair_waiting_players(&mut self, now: Timestamp) {
        while self.pending.len() >= 2 {
            let (Some(first), Some(second)) = (self.pending.pop_front(), self.pending.pop_front())
            else {
                break;
            };

            let game = Arc::new(Match {
                match_id: self.ids.next_id(),
                players: [first, second],
                created_at: now,
            });

            for player in &game.players {
                self.player_index
                    .insert(player.player_id.clone(), Arc::clone(&game));
            }
            self.matches.insert(
                game.match_id.clone(),
                ActiveMatch {
                    game: Arc::clone(&game),
                    acknowledged: HashSet::new(),
                },
            );

            let [a, b] = game.player_ids();
            info!(
                match_id = %game.match_id,
                player_a = a,
                player_b = b,
                "matchmaking pair created"
            );
            self.notify_depth();
        }
    }

    /// Drop expired entries from the head of the queue.
    ///
    /// `pending` is in enqueue order, so the first live head ends the scan.
    /// Matched players are never evicted.
    fn evict_expired(&mut self, now: Timestamp) {
        let ttl_ms = self.config.ttl_ms();
        let mut evicted = 0usize;

        while self
            .pending
            .front()
            .is_some_and(|head| head.is_expired(now, ttl_ms))
        {
            if let Some(expired) = self.pending.pop_front() {
                warn!(
                    player_id = %expired.player_id,
                    waited_ms = now.saturating_sub(expired.enqueued_at),
                    "evicted expired matchmaking entry"
                );
                evicted += 1;
            }
        }

        if evicted > 0 {
            self.notify_depth();
        }
    }

    fn notify_depth(&self) {
        self.observer.queue_size_changed(self.pending.len());
    }
}
