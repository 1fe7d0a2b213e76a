//! Engine configuration.

use std::time::Duration;

/// Default time a pending entry may wait before eviction.
pub const DEFAULT_ENTRY_TTL: Duration = Duration::from_secs(60);

/// When a match record is retired from the active-match table.
///
/// Either way, the acknowledging player's own index entry is cleared
/// and they stop seeing the match in their status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AckPolicy {
    /// Keep the record until every participant has acknowledged.
    #[default]
    AllPlayers,

    /// Drop the record on the first acknowledgment. The other player
    /// still sees `Matched` until they acknowledge themselves.
    FirstPlayer,
}

impl AckPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            AckPolicy::AllPlayers => "all",
            AckPolicy::FirstPlayer => "first",
        }
    }

    /// Parse `"all"` / `"first"` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(AckPolicy::AllPlayers),
            "first" => Some(AckPolicy::FirstPlayer),
            _ => None,
        }
    }
}

/// Configuration consumed by [`crate::MatchmakingQueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Maximum time a pending entry may remain unpaired.
    pub entry_ttl: Duration,

    pub ack_policy: AckPolicy,
}

impl QueueConfig {
    pub fn with_ttl(entry_ttl: Duration) -> Self {
        QueueConfig {
            entry_ttl,
            ..QueueConfig::default()
        }
    }

    pub fn ttl_ms(&self) -> u64 {
        u64::try_from(self.entry_ttl.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            entry_ttl: DEFAULT_ENTRY_TTL,
            ack_policy: AckPolicy::default(),
        }
    }
}
