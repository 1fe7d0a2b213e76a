//! Match id generation.

use crate::game::MatchId;

/// Produces unique match ids.
pub trait MatchIdGenerator: Send {
    fn next_id(&mut self) -> MatchId;
}

/// `match_<uuid v4>` ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidMatchIds;

impl MatchIdGenerator for UuidMatchIds {
    fn next_id(&mut self) -> MatchId {
        MatchId::new(format!("match_{}", uuid::Uuid::new_v4().simple()))
    }
}

/// `match_1`, `match_2`, ... Deterministic, for tests and replays.
#[derive(Debug, Default, Clone)]
pub struct SequentialMatchIds {
    next: u64,
}

impl MatchIdGenerator for SequentialMatchIds {
    fn next_id(&mut self) -> MatchId {
        self.next += 1;
        MatchId::new(format!("match_{}", self.next))
    }
}
