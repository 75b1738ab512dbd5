use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::models::matches::{
    CreateMatchRequest, MatchStatus, UpdateLineupRequest, UpdateMatchRequest,
};
use crate::models::scoring::{CricketBallRequest, StandardScoreRequest};

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

/// Raw text forwarded to the client socket, either a broadcast relayed from
/// a room subscription or a locally built ack.
#[derive(actix::Message)]
#[rtype(result = "()")]
pub struct OutboundText(pub String);

/// Client frame: a command plus an optional correlation id echoed in the ack.
#[derive(Debug, Deserialize)]
pub struct ClientEnvelope {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(flatten)]
    pub command: ClientCommand,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    JoinMatch { match_id: Uuid },
    LeaveMatch { match_id: Uuid },
    JoinOverview,
    LeaveOverview,

    SubmitCricketBall { match_id: Uuid, ball: CricketBallRequest },
    SubmitStandardScore { match_id: Uuid, score: StandardScoreRequest },
    UndoLastEvent { match_id: Uuid },

    UpdateMatchStatus {
        match_id: Uuid,
        status: MatchStatus,
        winner_team_id: Option<Uuid>,
    },
    UpdateMatchState { match_id: Uuid, patch: Value },
    UpdateLineup {
        match_id: Uuid,
        #[serde(flatten)]
        lineup: UpdateLineupRequest,
    },

    CreateMatch {
        #[serde(flatten)]
        details: CreateMatchRequest,
    },
    UpdateMatch {
        match_id: Uuid,
        #[serde(flatten)]
        details: UpdateMatchRequest,
    },
    DeleteMatch { match_id: Uuid },

    Ping,
}

pub fn ack_ok(request_id: &Option<String>) -> String {
    serde_json::json!({
        "type": "ack",
        "request_id": request_id,
        "status": "ok"
    })
    .to_string()
}

pub fn ack_error(request_id: &Option<String>, error: &str) -> String {
    serde_json::json!({
        "type": "ack",
        "request_id": request_id,
        "status": "error",
        "error": error
    })
    .to_string()
}
