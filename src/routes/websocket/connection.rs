use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::{Actor, ActorContext, AsyncContext, Handler, StreamHandler};
use actix_web::web;
use actix_web_actors::ws;
use chrono::Utc;
use futures::StreamExt;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::user::UserRole;
use crate::routes::websocket::messages::{
    ack_error, ack_ok, ClientCommand, ClientEnvelope, OutboundText,
};
use crate::services::{broadcast, MatchService, ScoringService};

// How often heartbeat pings are sent
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
// How long before lack of client response causes a timeout
const CLIENT_TIMEOUT: Duration = Duration::from_secs(120);

/// One client socket. Viewers join rooms and receive broadcasts; scorers
/// additionally drive the same scoring services the HTTP handlers use.
pub struct ScoringConnection {
    heartbeat: Instant,
    user_id: Uuid,
    username: String,
    role: UserRole,
    session_id: Uuid,
    redis: Option<web::Data<Arc<redis::Client>>>,
    scoring: web::Data<ScoringService>,
    matches: web::Data<MatchService>,
    // channel name -> subscription forwarder task
    rooms: HashMap<String, JoinHandle<()>>,
}

impl Actor for ScoringConnection {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!(
            "ScoringConnection started for user {} ({}) session {}",
            self.user_id,
            self.username,
            self.session_id
        );
        self.heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        for (channel, task) in self.rooms.drain() {
            tracing::debug!("Dropping room subscription {} on disconnect", channel);
            task.abort();
        }
        tracing::info!(
            "ScoringConnection stopped for user {} ({}) session {}",
            self.user_id,
            self.username,
            self.session_id
        );
    }
}

impl ScoringConnection {
    pub fn new(
        user_id: Uuid,
        username: String,
        role: UserRole,
        redis: Option<web::Data<Arc<redis::Client>>>,
        scoring: web::Data<ScoringService>,
        matches: web::Data<MatchService>,
    ) -> Self {
        Self {
            heartbeat: Instant::now(),
            user_id,
            username,
            role,
            session_id: Uuid::new_v4(),
            redis,
            scoring,
            matches,
            rooms: HashMap::new(),
        }
    }

    fn heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.heartbeat) > CLIENT_TIMEOUT {
                tracing::warn!(
                    "Client heartbeat missed, disconnecting user {} session {}",
                    act.user_id,
                    act.session_id
                );
                ctx.stop();
                return;
            }
            ctx.ping(b"ping");
        });
    }

    /// Subscribe this socket to a pub/sub channel and forward every payload
    /// as-is. The forwarder task lives until leave or disconnect.
    fn join_room(&mut self, channel: String, ctx: &mut ws::WebsocketContext<Self>) {
        if self.rooms.contains_key(&channel) {
            return;
        }
        let Some(redis_client) = self.redis.clone() else {
            tracing::warn!(
                "No redis client available, room {} unavailable for user {}",
                channel,
                self.user_id
            );
            return;
        };

        let addr = ctx.address();
        let subscribe_channel = channel.clone();
        let user_id = self.user_id;
        let task = tokio::spawn(async move {
            let conn = match redis_client.get_async_connection().await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to redis for room {}: {}",
                        subscribe_channel,
                        e
                    );
                    return;
                }
            };
            let mut pubsub = conn.into_pubsub();
            if let Err(e) = pubsub.subscribe(&subscribe_channel).await {
                tracing::error!("Failed to subscribe to {}: {}", subscribe_channel, e);
                return;
            }
            tracing::debug!("User {} joined room {}", user_id, subscribe_channel);

            let mut stream = pubsub.on_message();
            while let Some(msg) = stream.next().await {
                match msg.get_payload::<String>() {
                    Ok(payload) => addr.do_send(OutboundText(payload)),
                    Err(e) => {
                        tracing::error!(
                            "Failed to read payload on {}: {}",
                            subscribe_channel,
                            e
                        );
                    }
                }
            }
            tracing::debug!("Room stream {} ended", subscribe_channel);
        });

        self.rooms.insert(channel, task);
    }

    fn leave_room(&mut self, channel: &str) {
        if let Some(task) = self.rooms.remove(channel) {
            task.abort();
            tracing::debug!("User {} left room {}", self.user_id, channel);
        }
    }

    fn handle_frame(&mut self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let envelope: ClientEnvelope = match serde_json::from_str(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(
                    "Unparseable frame from user {} session {}: {}",
                    self.user_id,
                    self.session_id,
                    e
                );
                ctx.text(ack_error(&None, "unrecognized command"));
                return;
            }
        };
        let request_id = envelope.request_id;

        match envelope.command {
            ClientCommand::Ping => {
                let pong = serde_json::json!({
                    "type": "pong",
                    "request_id": request_id,
                    "timestamp": Utc::now().to_rfc3339(),
                    "session_id": self.session_id
                });
                ctx.text(pong.to_string());
            }

            ClientCommand::JoinMatch { match_id } => {
                self.join_room(broadcast::match_channel(match_id), ctx);
                ctx.text(ack_ok(&request_id));
            }
            ClientCommand::LeaveMatch { match_id } => {
                self.leave_room(&broadcast::match_channel(match_id));
                ctx.text(ack_ok(&request_id));
            }
            ClientCommand::JoinOverview => {
                self.join_room(broadcast::OVERVIEW_CHANNEL.to_string(), ctx);
                ctx.text(ack_ok(&request_id));
            }
            ClientCommand::LeaveOverview => {
                self.leave_room(broadcast::OVERVIEW_CHANNEL);
                ctx.text(ack_ok(&request_id));
            }

            command => self.handle_scoring_command(command, request_id, ctx),
        }
    }

    /// Commands that mutate state. Role-checked here, then dispatched to the
    /// same services the HTTP handlers call.
    fn handle_scoring_command(
        &mut self,
        command: ClientCommand,
        request_id: Option<String>,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        if !self.role.can_score() {
            tracing::warn!(
                "User {} ({:?}) attempted a scoring command over WebSocket",
                self.username,
                self.role
            );
            ctx.text(ack_error(
                &request_id,
                "scoring requires a scorer or admin role",
            ));
            return;
        }

        let addr = ctx.address();
        let scoring = self.scoring.clone();
        let matches = self.matches.clone();

        tokio::spawn(async move {
            let result: Result<(), ApiError> = match command {
                ClientCommand::SubmitCricketBall { match_id, ball } => {
                    scoring.submit_cricket_ball(match_id, ball).await.map(|_| ())
                }
                ClientCommand::SubmitStandardScore { match_id, score } => scoring
                    .submit_standard_score(match_id, score)
                    .await
                    .map(|_| ()),
                ClientCommand::UndoLastEvent { match_id } => {
                    scoring.undo_last_event(match_id).await.map(|_| ())
                }
                ClientCommand::UpdateMatchStatus {
                    match_id,
                    status,
                    winner_team_id,
                } => matches
                    .update_status(match_id, status, winner_team_id)
                    .await
                    .map(|_| ()),
                ClientCommand::UpdateMatchState { match_id, patch } => matches
                    .update_live_match_state(match_id, patch)
                    .await
                    .map(|_| ()),
                ClientCommand::UpdateLineup { match_id, lineup } => {
                    matches.update_lineup(match_id, lineup).await.map(|_| ())
                }
                ClientCommand::CreateMatch { details } => {
                    matches.create_match(details).await.map(|_| ())
                }
                ClientCommand::UpdateMatch { match_id, details } => {
                    matches.update_match(match_id, details).await.map(|_| ())
                }
                ClientCommand::DeleteMatch { match_id } => matches.delete_match(match_id).await,
                // Room and ping commands are handled before dispatch.
                _ => Ok(()),
            };

            match result {
                Ok(()) => addr.do_send(OutboundText(ack_ok(&request_id))),
                Err(e) => {
                    tracing::warn!("WebSocket command failed: {}", e);
                    addr.do_send(OutboundText(ack_error(&request_id, &client_message(&e))));
                }
            }
        });
    }
}

/// Error text safe to echo to a client. Database and internal details stay
/// in the logs.
fn client_message(e: &ApiError) -> String {
    match e {
        ApiError::Database(_) | ApiError::Internal(_) => "internal error".to_string(),
        other => other.to_string(),
    }
}

impl Handler<OutboundText> for ScoringConnection {
    type Result = ();

    fn handle(&mut self, msg: OutboundText, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ScoringConnection {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.heartbeat = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.heartbeat = Instant::now();
                self.handle_frame(&text, ctx);
            }
            Ok(ws::Message::Binary(_)) => {
                tracing::warn!(
                    "Unexpected binary message from user {} session {}",
                    self.user_id,
                    self.session_id
                );
            }
            Ok(ws::Message::Close(reason)) => {
                tracing::info!(
                    "WebSocket closing for user {} session {}: {:?}",
                    self.user_id,
                    self.session_id,
                    reason
                );
                ctx.close(reason);
                ctx.stop();
            }
            _ => ctx.stop(),
        }
    }
}
