// crates/matchmaking-client/src/render.rs

use chrono::{DateTime, Utc};
use matchmaking_protocol::wire_types::{WireMatch, WireStatus};
use matchmaking_protocol::WireResponse;

/// One human-readable line per server response.
pub fn describe(response: &WireResponse) -> String {
    let player = &response.player_id;
    match response.status {
        WireStatus::Queued => {
            let since = response
                .enqueued_at
                .map(format_timestamp)
                .unwrap_or_else(|| "?".to_string());
            let wait = match response.estimated_wait_seconds.flatten() {
                Some(secs) => format!("~{}s", secs),
                None => "unknown".to_string(),
            };
            format!("{} queued since {} (estimated wait {})", player, since, wait)
        }
        WireStatus::Matched => {
            format!("{} matched: {}", player, describe_match(response.game.as_ref()))
        }
        WireStatus::Acknowledged => {
            format!("{} acknowledged {}", player, describe_match(response.game.as_ref()))
        }
        WireStatus::Cancelled => format!("{} left the queue", player),
        WireStatus::None => format!("{} is not queued", player),
        WireStatus::Rejected => format!(
            "{}: {}",
            player,
            response.error.as_deref().unwrap_or("request rejected")
        ),
    }
}

fn describe_match(game: Option<&WireMatch>) -> String {
    match game {
        Some(m) => format!(
            "{} [{} vs {}] at {}",
            m.match_id,
            m.players[0],
            m.players[1],
            format_timestamp(m.created_at)
        ),
        None => "<no match>".to_string(),
    }
}

fn format_timestamp(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: WireStatus) -> WireResponse {
        WireResponse {
            player_id: "alice".to_string(),
            status,
            enqueued_at: None,
            estimated_wait_seconds: None,
            game: None,
            error: None,
        }
    }

    #[test]
    fn queued_without_estimate() {
        let mut r = response(WireStatus::Queued);
        r.enqueued_at = Some(0);
        r.estimated_wait_seconds = Some(None);
        assert_eq!(
            describe(&r),
            "alice queued since 1970-01-01 00:00:00.000 UTC (estimated wait unknown)"
        );
    }

    #[test]
    fn matched_lists_both_players() {
        let mut r = response(WireStatus::Matched);
        r.game = Some(WireMatch {
            match_id: "match_1".to_string(),
            players: ["alice".to_string(), "bob".to_string()],
            created_at: 1_000,
        });
        assert_eq!(
            describe(&r),
            "alice matched: match_1 [alice vs bob] at 1970-01-01 00:00:01.000 UTC"
        );
    }

    #[test]
    fn rejection_shows_error() {
        let mut r = response(WireStatus::Rejected);
        r.error = Some("no match found for player alice".to_string());
        assert_eq!(describe(&r), "alice: no match found for player alice");
    }
}
