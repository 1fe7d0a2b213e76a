//! What a player currently looks like to the engine.

use std::sync::Arc;

use crate::entry::Timestamp;
use crate::game::Match;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerStatus {
    /// Waiting in the pending queue.
    Queued {
        enqueued_at: Timestamp,

        /// `None` when fewer than two players are waiting.
        estimated_wait_seconds: Option<u64>,
    },

    /// Paired and not yet acknowledged by this player.
    Matched(Arc<Match>),

    /// Not known to the engine.
    Idle,
}

impl PlayerStatus {
    /// Lower-case state name used on the wire.
    pub fn state_name(&self) -> &'static str {
        match self {
            PlayerStatus::Queued { .. } => "queued",
            PlayerStatus::Matched(_) => "matched",
            PlayerStatus::Idle => "none",
        }
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, PlayerStatus::Queued { .. })
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, PlayerStatus::Matched(_))
    }

    pub fn matched(&self) -> Option<&Arc<Match>> {
        match self {
            PlayerStatus::Matched(m) => Some(m),
            _ => None,
        }
    }
}
