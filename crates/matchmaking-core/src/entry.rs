//! A single player waiting in the pending queue.

/// Opaque player identifier (a wallet address in practice).
pub type PlayerId = String;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// One player waiting for an opponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub player_id: PlayerId,

    /// Asset the player is fielding, if any.
    pub pet_id: Option<String>,

    pub enqueued_at: Timestamp,
}

impl QueueEntry {
    pub fn new(
        player_id: impl Into<PlayerId>,
        pet_id: Option<String>,
        enqueued_at: Timestamp,
    ) -> Self {
        QueueEntry {
            player_id: player_id.into(),
            pet_id,
            enqueued_at,
        }
    }

    /// True once the entry has waited at least `ttl_ms`.
    pub fn is_expired(&self, now_ms: Timestamp, ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.enqueued_at) >= ttl_ms
    }
}
