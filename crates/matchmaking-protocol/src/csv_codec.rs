// crates/matchmaking-protocol/src/csv_codec.rs

//! CSV line codec.
//!
//! Meant for netcat sessions, shell scripts and replay files.
//!
//! Input format (lines → `Request`):
//!
//! - Enqueue:
//!   `E, playerId[, petId]`
//!
//! - Cancel:
//!   `X, playerId`
//!
//! - Status:
//!   `S, playerId`
//!
//! - Acknowledge:
//!   `K, playerId`
//!
//! Output format (`Response` → line):
//!
//! - Queued:
//!   `Q, playerId, enqueuedAt, estimatedWaitSeconds` (`-` when unknown)
//!
//! - Matched:
//!   `M, playerId, matchId, playerA, playerB, createdAt`
//!
//! - No state:
//!   `N, playerId`
//!
//! - Cancelled:
//!   `X, playerId`
//!
//! - Acknowledged:
//!   `K, playerId, matchId, playerA, playerB, createdAt`
//!
//! - Rejected:
//!   `R, playerId, reason`
//!
//! Player ids must not contain commas.

use matchmaking_core::{Match, PlayerStatus, Request, Response};

/// Parse a single CSV line into a `Request`.
///
/// Returns `None` for blank lines, comments (starting with `#`) and
/// anything malformed, including an empty player id.
pub fn parse_input_line(line: &str) -> Option<Request> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let tokens = split_and_trim(trimmed, ',');
    let msg_type = tokens.first()?.chars().next()?;

    match msg_type {
        'E' => parse_enqueue(&tokens),
        'X' => parse_single_player(&tokens).map(|player_id| Request::Cancel { player_id }),
        'S' => parse_single_player(&tokens).map(|player_id| Request::Status { player_id }),
        'K' => parse_single_player(&tokens).map(|player_id| Request::Acknowledge { player_id }),
        _ => None,
    }
}

fn parse_enqueue(tokens: &[String]) -> Option<Request> {
    // E, player[, pet]
    if !(2..=3).contains(&tokens.len()) {
        return None;
    }

    let player_id = non_empty(&tokens[1])?;
    let pet_id = tokens.get(2).and_then(|p| non_empty(p));

    Some(Request::Enqueue { player_id, pet_id })
}

fn parse_single_player(tokens: &[String]) -> Option<String> {
    // X|S|K, player
    if tokens.len() != 2 {
        return None;
    }

    non_empty(&tokens[1])
}

/// Format a `Request` as a CSV line (inverse of [`parse_input_line`]).
pub fn format_input_csv(request: &Request) -> String {
    match request {
        Request::Enqueue {
            player_id,
            pet_id: Some(pet),
        } => format!("E, {}, {}", player_id, pet),
        Request::Enqueue { player_id, .. } => format!("E, {}", player_id),
        Request::Cancel { player_id } => format!("X, {}", player_id),
        Request::Status { player_id } => format!("S, {}", player_id),
        Request::Acknowledge { player_id } => format!("K, {}", player_id),
    }
}

/// Format a `Response` as a CSV line.
pub fn format_output_csv(response: &Response) -> String {
    match response {
        Response::Status { player_id, status } => match status {
            PlayerStatus::Queued {
                enqueued_at,
                estimated_wait_seconds,
            } => {
                let wait = estimated_wait_seconds
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string());
                format!("Q, {}, {}, {}", player_id, enqueued_at, wait)
            }
            PlayerStatus::Matched(game) => format!("M, {}, {}", player_id, match_fields(game)),
            PlayerStatus::Idle => format!("N, {}", player_id),
        },
        Response::Cancelled { player_id } => format!("X, {}", player_id),
        Response::Acknowledged { player_id, game } => {
            format!("K, {}, {}", player_id, match_fields(game))
        }
        Response::Rejected { player_id, error } => format!("R, {}, {}", player_id, error),
    }
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn match_fields(game: &Match) -> String {
    let [a, b] = game.player_ids();
    format!("{}, {}, {}, {}", game.match_id, a, b, game.created_at)
}

fn split_and_trim(s: &str, delimiter: char) -> Vec<String> {
    s.split(delimiter)
        .map(|tok| tok.trim().to_string())
        .collect()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
