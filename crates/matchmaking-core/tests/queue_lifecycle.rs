// crates/matchmaking-core/tests/queue_lifecycle.rs
use std::sync::{Arc, Mutex};
use std::time::Duration;

use matchmaking_core::{
    ManualClock, MatchId, MatchmakingError, MatchmakingQueue, PlayerStatus, QueueConfig, Request,
    Response, SequentialMatchIds,
};

const START_MS: u64 = 1_700_000_000_000;

fn queue_with_clock(ttl_secs: u64) -> (MatchmakingQueue, ManualClock) {
    let clock = ManualClock::new(START_MS);
    let queue = MatchmakingQueue::new(QueueConfig::with_ttl(Duration::from_secs(ttl_secs)))
        .with_clock(clock.clone())
        .with_id_generator(SequentialMatchIds::default());
    (queue, clock)
}

#[test]
fn concrete_scenario_from_enqueue_to_acknowledge() {
    let (mut queue, clock) = queue_with_clock(60);

    let a = queue.enqueue("A", None);
    assert_eq!(
        a,
        PlayerStatus::Queued {
            enqueued_at: START_MS,
            estimated_wait_seconds: None,
        }
    );

    clock.advance_secs(1);
    let b = queue.enqueue("B", None);
    let game = b.matched().expect("B should be matched").clone();
    assert_eq!(game.player_ids(), ["A", "B"]);
    assert_eq!(game.created_at, START_MS + 1_000);

    let a_status = queue.get_status("A");
    assert_eq!(a_status.matched().map(|m| m.match_id.clone()), Some(game.match_id.clone()));

    let acked = queue.acknowledge_match("A").expect("A has a match");
    assert_eq!(acked.match_id, game.match_id);
    assert_eq!(queue.get_status("A"), PlayerStatus::Idle);

    assert!(!queue.cancel("C"));
}

#[test]
fn pairs_strictly_in_fifo_order() {
    let (mut queue, clock) = queue_with_clock(60);

    let mut games = Vec::new();
    for player in ["A", "B", "C", "D"] {
        clock.advance_ms(10);
        if let PlayerStatus::Matched(game) = queue.enqueue(player, None) {
            games.push(game);
        }
    }

    assert_eq!(games.len(), 2);
    assert_eq!(games[0].player_ids(), ["A", "B"]);
    assert_eq!(games[1].player_ids(), ["C", "D"]);
    assert_eq!(games[0].match_id, MatchId::from("match_1"));
    assert_eq!(games[1].match_id, MatchId::from("match_2"));
}

#[test]
fn re_enqueue_keeps_original_entry() {
    let (mut queue, clock) = queue_with_clock(60);

    let first = queue.enqueue("P", Some("pet-1".to_string()));
    clock.advance_secs(5);
    let second = queue.enqueue("P", Some("pet-2".to_string()));

    assert_eq!(first, second);
    assert_eq!(queue.pending_len(), 1);
    let entry = queue.pending_entries().next().expect("P is pending");
    assert_eq!(entry.pet_id.as_deref(), Some("pet-1"));
}

#[test]
fn enqueue_after_match_returns_same_match() {
    let (mut queue, _clock) = queue_with_clock(60);

    queue.enqueue("A", None);
    let game = queue.enqueue("B", None).matched().cloned().expect("matched");

    let again = queue.enqueue("A", None);
    assert_eq!(again.matched().map(|m| m.match_id.clone()), Some(game.match_id.clone()));
    assert_eq!(queue.pending_len(), 0);
    assert_eq!(queue.active_match_count(), 1);
}

#[test]
fn no_player_is_in_two_matches() {
    let (mut queue, _clock) = queue_with_clock(60);

    for player in ["A", "B", "A", "B", "C", "A", "D", "C"] {
        queue.enqueue(player, None);
    }

    assert_eq!(queue.active_match_count(), 2);
    let a = queue.get_status("A").matched().cloned().expect("A matched");
    let c = queue.get_status("C").matched().cloned().expect("C matched");
    assert_ne!(a.match_id, c.match_id);
    assert!(a.includes("B"));
    assert!(c.includes("D"));
}

#[test]
fn pet_id_is_carried_into_the_match() {
    let (mut queue, _clock) = queue_with_clock(60);

    queue.enqueue("A", Some("mint-a".to_string()));
    let game = queue.enqueue("B", None).matched().cloned().expect("matched");

    assert_eq!(game.players[0].pet_id.as_deref(), Some("mint-a"));
    assert_eq!(game.players[1].pet_id, None);
    assert_eq!(game.opponent_of("A").map(String::as_str), Some("B"));
    assert_eq!(game.opponent_of("Z"), None);
}

#[test]
fn entry_expires_exactly_at_ttl() {
    let (mut queue, clock) = queue_with_clock(60);

    queue.enqueue("A", None);
    clock.advance_ms(59_999);
    assert!(queue.get_status("A").is_queued());

    clock.advance_ms(1);
    assert_eq!(queue.get_status("A"), PlayerStatus::Idle);
    assert_eq!(queue.pending_len(), 0);
}

#[test]
fn expired_entry_is_not_paired() {
    let (mut queue, clock) = queue_with_clock(60);

    queue.enqueue("A", None);
    clock.advance_secs(61);

    let b = queue.enqueue("B", None);
    assert!(b.is_queued());
    assert_eq!(queue.get_status("A"), PlayerStatus::Idle);
    assert_eq!(queue.active_match_count(), 0);
}

#[test]
fn matched_players_are_never_evicted() {
    let (mut queue, clock) = queue_with_clock(60);

    queue.enqueue("A", None);
    queue.enqueue("B", None);
    clock.advance_secs(3_600);

    assert!(queue.get_status("A").is_matched());
    assert!(queue.get_status("B").is_matched());
}

#[test]
fn cancel_only_applies_to_pending_players() {
    let (mut queue, _clock) = queue_with_clock(60);

    queue.enqueue("A", None);
    assert!(queue.cancel("A"));
    assert!(!queue.cancel("A"));
    assert_eq!(queue.get_status("A"), PlayerStatus::Idle);

    queue.enqueue("B", None);
    queue.enqueue("C", None);
    assert!(!queue.cancel("B"));
    assert!(queue.get_status("B").is_matched());
}

#[test]
fn cancelled_player_can_re_enqueue() {
    let (mut queue, clock) = queue_with_clock(60);

    queue.enqueue("A", None);
    queue.cancel("A");
    clock.advance_secs(2);

    let status = queue.enqueue("A", None);
    assert_eq!(
        status,
        PlayerStatus::Queued {
            enqueued_at: START_MS + 2_000,
            estimated_wait_seconds: None,
        }
    );
}

#[test]
fn wait_estimate_is_null_for_the_odd_player_out() {
    let (mut queue, _clock) = queue_with_clock(60);

    queue.enqueue("A", None);
    assert!(queue.enqueue("B", None).is_matched());

    let third = queue.enqueue("C", None);
    assert!(matches!(
        third,
        PlayerStatus::Queued {
            estimated_wait_seconds: None,
            ..
        }
    ));
    assert_eq!(queue.estimated_wait_seconds(), None);

    assert!(queue.enqueue("D", None).is_matched());
    assert_eq!(queue.pending_len(), 0);
}

#[test]
fn observer_sees_every_depth_change() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let clock = ManualClock::new(START_MS);
    let mut queue = MatchmakingQueue::new(QueueConfig::with_ttl(Duration::from_secs(60)))
        .with_clock(clock.clone())
        .with_observer(move |depth: usize| sink.lock().unwrap().push(depth));

    queue.enqueue("A", None);
    queue.enqueue("B", None);
    queue.enqueue("C", None);
    queue.cancel("C");
    queue.enqueue("D", None);
    clock.advance_secs(60);
    queue.get_status("D");

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 0, 1, 0, 1, 0]);
}

#[test]
fn process_request_maps_not_found_to_rejections() {
    let (mut queue, _clock) = queue_with_clock(60);

    let cancel = queue.process_request(Request::Cancel {
        player_id: "ghost".to_string(),
    });
    assert_eq!(
        cancel,
        Response::rejected("ghost", MatchmakingError::NotQueued("ghost".to_string()))
    );

    let ack = queue.process_request(Request::Acknowledge {
        player_id: "ghost".to_string(),
    });
    assert_eq!(
        ack,
        Response::rejected("ghost", MatchmakingError::NoActiveMatch("ghost".to_string()))
    );

    let empty = queue.process_request(Request::Status {
        player_id: String::new(),
    });
    assert_eq!(empty, Response::rejected("", MatchmakingError::EmptyPlayerId));
}

#[test]
fn process_request_enqueue_and_cancel() {
    let (mut queue, _clock) = queue_with_clock(60);

    let enqueued = queue.process_request(Request::Enqueue {
        player_id: "A".to_string(),
        pet_id: None,
    });
    assert!(matches!(
        enqueued,
        Response::Status {
            status: PlayerStatus::Queued { .. },
            ..
        }
    ));

    let cancelled = queue.process_request(Request::Cancel {
        player_id: "A".to_string(),
    });
    assert_eq!(
        cancelled,
        Response::Cancelled {
            player_id: "A".to_string()
        }
    );
}

#[test]
fn is_known_tracks_pending_and_matched_players_only() {
    let (mut queue, clock) = queue_with_clock(60);

    queue.enqueue("A", None);
    assert!(queue.is_known("A"));
    assert!(!queue.is_known("B"));

    queue.enqueue("B", None);
    assert!(queue.is_known("A"));
    assert!(queue.is_known("B"));

    queue.acknowledge_match("A");
    assert!(!queue.is_known("A"));

    queue.enqueue("C", None);
    clock.advance_secs(60);
    queue.get_status("B");
    assert!(!queue.is_known("C"));
}
