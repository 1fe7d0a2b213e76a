//! A paired set of two players.

use std::fmt;

use crate::entry::{PlayerId, QueueEntry, Timestamp};

/// Unique match identifier. Never reused within a process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        MatchId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MatchId {
    fn from(s: &str) -> Self {
        MatchId(s.to_string())
    }
}

/// An immutable pairing of two queue entries.
///
/// `players` keeps pairing order (older entry first); the order has no
/// meaning once the match exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub match_id: MatchId,
    pub players: [QueueEntry; 2],
    pub created_at: Timestamp,
}

impl Match {
    pub fn player_ids(&self) -> [&str; 2] {
        [
            self.players[0].player_id.as_str(),
            self.players[1].player_id.as_str(),
        ]
    }

    pub fn includes(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.player_id == player_id)
    }

    /// The other participant, if `player_id` is one of the two.
    pub fn opponent_of(&self, player_id: &str) -> Option<&PlayerId> {
        match self.player_ids() {
            [a, _] if a == player_id => Some(&self.players[1].player_id),
            [_, b] if b == player_id => Some(&self.players[0].player_id),
            _ => None,
        }
    }
}
