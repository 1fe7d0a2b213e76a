//! Serde wire types for the JSON line protocol.
//!
//! Field names are camelCase to match the payloads existing HTTP
//! clients already understand:
//!
//! ```text
//! request : {"op":"enqueue","playerId":"A","petId":"mint"}
//! response: {"playerId":"A","status":"matched",
//!            "match":{"matchId":"match_1","players":["A","B"],"createdAt":1700000000000}}
//! ```

use serde::{Deserialize, Serialize};

use matchmaking_core::Match;

/// Request operations (client → server).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireOp {
    Enqueue,
    Cancel,
    Status,
    Acknowledge,
}

impl WireOp {
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            "enqueue" => Some(WireOp::Enqueue),
            "cancel" => Some(WireOp::Cancel),
            "status" => Some(WireOp::Status),
            "acknowledge" => Some(WireOp::Acknowledge),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRequest {
    pub op: WireOp,

    #[serde(default)]
    pub player_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<String>,
}

/// Response states (server → client).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireStatus {
    Queued,
    Matched,
    None,
    Cancelled,
    Acknowledged,
    Rejected,
}

/// A match as seen by clients: player ids only, in pairing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMatch {
    pub match_id: String,
    pub players: [String; 2],
    pub created_at: u64,
}

impl From<&Match> for WireMatch {
    fn from(game: &Match) -> Self {
        let [a, b] = game.player_ids();
        WireMatch {
            match_id: game.match_id.to_string(),
            players: [a.to_string(), b.to_string()],
            created_at: game.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireResponse {
    pub player_id: String,

    pub status: WireStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enqueued_at: Option<u64>,

    /// Only present for `queued`; `null` when no estimate is possible.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "nullable"
    )]
    pub estimated_wait_seconds: Option<Option<u64>>,

    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub game: Option<WireMatch>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
mod nullable {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<Option<u64>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<u64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<u64>::deserialize(deserializer).map(Some)
    }
}
