//! Message types used by the matchmaking core.
//!
//! These are **transport-agnostic** logical messages:
//! - [`Request`]: what the engine consumes.
//! - [`Response`]: what the engine produces.
//!
//! Every response carries the `player_id` it answers so the server can
//! route and log it without extra context. CSV / JSON encoders live in
//! the `matchmaking-protocol` crate.

use std::sync::Arc;

use crate::entry::PlayerId;
use crate::error::MatchmakingError;
use crate::game::Match;
use crate::status::PlayerStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Enqueue {
        player_id: PlayerId,
        pet_id: Option<String>,
    },
    Cancel {
        player_id: PlayerId,
    },
    Status {
        player_id: PlayerId,
    },
    Acknowledge {
        player_id: PlayerId,
    },
}

impl Request {
    pub fn player_id(&self) -> &str {
        match self {
            Request::Enqueue { player_id, .. }
            | Request::Cancel { player_id }
            | Request::Status { player_id }
            | Request::Acknowledge { player_id } => player_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Request::Enqueue { .. } => "enqueue",
            Request::Cancel { .. } => "cancel",
            Request::Status { .. } => "status",
            Request::Acknowledge { .. } => "acknowledge",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Result of `enqueue` or `status`.
    Status {
        player_id: PlayerId,
        status: PlayerStatus,
    },

    /// The player was removed from the pending queue.
    Cancelled { player_id: PlayerId },

    /// The player acknowledged their match.
    Acknowledged { player_id: PlayerId, game: Arc<Match> },

    /// No matching state for the request.
    Rejected {
        player_id: PlayerId,
        error: MatchmakingError,
    },
}

impl Response {
    pub fn player_id(&self) -> &str {
        match self {
            Response::Status { player_id, .. }
            | Response::Cancelled { player_id }
            | Response::Acknowledged { player_id, .. }
            | Response::Rejected { player_id, .. } => player_id,
        }
    }

    pub fn status(player_id: impl Into<PlayerId>, status: PlayerStatus) -> Self {
        Response::Status {
            player_id: player_id.into(),
            status,
        }
    }

    pub fn rejected(player_id: impl Into<PlayerId>, error: MatchmakingError) -> Self {
        Response::Rejected {
            player_id: player_id.into(),
            error,
        }
    }

    /// The match this response reports, if any.
    pub fn game(&self) -> Option<&Arc<Match>> {
        match self {
            Response::Status { status, .. } => status.matched(),
            Response::Acknowledged { game, .. } => Some(game),
            _ => None,
        }
    }
}
