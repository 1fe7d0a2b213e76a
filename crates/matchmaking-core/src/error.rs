//! Error types for the matchmaking core.
//!
//! None of these are fatal: they describe a request that found no
//! matching state, and transports map them to "not found" replies.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchmakingError {
    /// Cancel on a player who is not waiting in the pending queue
    /// (including players that were already paired).
    #[error("player {0} not found in queue")]
    NotQueued(String),

    /// Acknowledge on a player without an outstanding match.
    #[error("no match found for player {0}")]
    NoActiveMatch(String),

    #[error("player id must not be empty")]
    EmptyPlayerId,
}
