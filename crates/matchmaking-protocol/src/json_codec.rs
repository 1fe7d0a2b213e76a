//! JSON line encoding/decoding for matchmaking messages.
//!
//! One JSON object per line. Requests decode into
//! `matchmaking_core::Request`; responses encode from
//! `matchmaking_core::Response` via [`WireResponse`].
//!
//! Responses decode only as far as [`WireResponse`]: clients see player
//! ids, not the full queue entries the engine keeps.

use serde::Deserialize;
use thiserror::Error;

use matchmaking_core::{PlayerStatus, Request, Response};

use crate::wire_types::{WireMatch, WireOp, WireRequest, WireResponse, WireStatus};

/// Errors that can arise when encoding/decoding a JSON line.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Not valid JSON, or the wrong shape (missing `op`, bad field types).
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown op: {0}")]
    UnknownOp(String),

    #[error("playerId is required")]
    MissingPlayerId,
}

/// Request as read off the wire, before `op` is checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequest {
    op: String,
    #[serde(default)]
    player_id: String,
    #[serde(default)]
    pet_id: Option<String>,
}

/// Decode one JSON request line.
pub fn decode_request(line: &str) -> Result<Request, ProtocolError> {
    let raw: RawRequest = serde_json::from_str(line.trim())?;

    let op = WireOp::parse(&raw.op).ok_or(ProtocolError::UnknownOp(raw.op))?;

    let player_id = raw.player_id.trim().to_string();
    if player_id.is_empty() {
        return Err(ProtocolError::MissingPlayerId);
    }

    Ok(match op {
        WireOp::Enqueue => Request::Enqueue {
            player_id,
            pet_id: raw.pet_id.filter(|p| !p.trim().is_empty()),
        },
        WireOp::Cancel => Request::Cancel { player_id },
        WireOp::Status => Request::Status { player_id },
        WireOp::Acknowledge => Request::Acknowledge { player_id },
    })
}

/// Encode a request as a single JSON line (no trailing newline).
pub fn encode_request(request: &Request) -> Result<String, ProtocolError> {
    let (op, pet_id) = match request {
        Request::Enqueue { pet_id, .. } => (WireOp::Enqueue, pet_id.clone()),
        Request::Cancel { .. } => (WireOp::Cancel, None),
        Request::Status { .. } => (WireOp::Status, None),
        Request::Acknowledge { .. } => (WireOp::Acknowledge, None),
    };

    let wire = WireRequest {
        op,
        player_id: request.player_id().to_string(),
        pet_id,
    };
    Ok(serde_json::to_string(&wire)?)
}

/// Convert an engine response into its wire shape.
pub fn to_wire_response(response: &Response) -> WireResponse {
    let mut wire = WireResponse {
        player_id: response.player_id().to_string(),
        status: WireStatus::None,
        enqueued_at: None,
        estimated_wait_seconds: None,
        game: None,
        error: None,
    };

    match response {
        Response::Status { status, .. } => match status {
            PlayerStatus::Queued {
                enqueued_at,
                estimated_wait_seconds,
            } => {
                wire.status = WireStatus::Queued;
                wire.enqueued_at = Some(*enqueued_at);
                wire.estimated_wait_seconds = Some(*estimated_wait_seconds);
            }
            PlayerStatus::Matched(game) => {
                wire.status = WireStatus::Matched;
                wire.game = Some(WireMatch::from(game.as_ref()));
            }
            PlayerStatus::Idle => wire.status = WireStatus::None,
        },
        Response::Cancelled { .. } => wire.status = WireStatus::Cancelled,
        Response::Acknowledged { game, .. } => {
            wire.status = WireStatus::Acknowledged;
            wire.game = Some(WireMatch::from(game.as_ref()));
        }
        Response::Rejected { error, .. } => {
            wire.status = WireStatus::Rejected;
            wire.error = Some(error.to_string());
        }
    }

    wire
}

/// Encode a response as a single JSON line (no trailing newline).
pub fn encode_response(response: &Response) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(&to_wire_response(response))?)
}

/// Decode one JSON response line.
pub fn decode_response(line: &str) -> Result<WireResponse, ProtocolError> {
    Ok(serde_json::from_str(line.trim())?)
}
