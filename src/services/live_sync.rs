use std::sync::Arc;

use redis::AsyncCommands;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::matches::MatchWithNames;

const LIVE_STATE_MAX_RETRIES: usize = 5;

pub fn match_mirror_key(match_id: Uuid) -> String {
    format!("sports:matches:{}", match_id)
}

pub fn match_history_key(match_id: Uuid) -> String {
    format!("sports:matches:{}:history", match_id)
}

/// Mirror work enqueued after a relational commit.
#[derive(Debug, Clone)]
pub enum SyncJob {
    /// Merge the full denormalized match payload into the mirror node.
    FullMatch { match_id: Uuid, payload: Value },
    /// Merge a subset of fields (lineup-only changes and the like).
    PartialUpdate { match_id: Uuid, payload: Value },
    /// Single-field status merge; deletion is soft from the mirror's view.
    Status { match_id: Uuid, status: String },
    /// Push-append to the commentary history list, never merged over.
    HistoryAppend { match_id: Uuid, entry: Value },
}

/// Outbox to the live document mirror. Jobs are enqueued after the relational
/// transaction commits and drained by a background worker; enqueueing never
/// blocks the caller and worker failures are logged, never surfaced. The
/// relational store stays the durability boundary.
#[derive(Clone)]
pub struct LiveSyncService {
    jobs: mpsc::UnboundedSender<SyncJob>,
    client: Option<Arc<redis::Client>>,
}

impl LiveSyncService {
    pub fn new(client: Option<Arc<redis::Client>>) -> Self {
        let (jobs, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(rx, client.clone()));
        Self { jobs, client }
    }

    pub fn enqueue(&self, job: SyncJob) {
        if let Err(e) = self.jobs.send(job) {
            tracing::error!("Live sync worker is gone, dropping job: {}", e);
        }
    }

    /// Read-through accessor for the mirrored match document.
    pub async fn get_live_state(&self, match_id: Uuid) -> Result<Option<Value>, ApiError> {
        let Some(client) = &self.client else {
            return Ok(None);
        };
        let mut conn = client
            .get_async_connection()
            .await
            .map_err(|e| ApiError::Internal(format!("redis connection failed: {}", e)))?;
        let raw: Option<String> = conn
            .get(match_mirror_key(match_id))
            .await
            .map_err(|e| ApiError::Internal(format!("redis read failed: {}", e)))?;
        Ok(raw.and_then(|s| serde_json::from_str(&s).ok()))
    }

    /// Atomic read-modify-write against the mirror itself, for call sites
    /// where concurrent scorers may race on the same subtree. Optimistic:
    /// WATCH the node, retry when a conflicting writer gets in first.
    pub async fn update_live_state<F>(&self, match_id: Uuid, update: F) -> Result<Value, ApiError>
    where
        F: Fn(Value) -> Value,
    {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ApiError::Internal("live store is not configured".to_string()))?;
        let mut conn = client
            .get_async_connection()
            .await
            .map_err(|e| ApiError::Internal(format!("redis connection failed: {}", e)))?;
        let key = match_mirror_key(match_id);

        for _ in 0..LIVE_STATE_MAX_RETRIES {
            redis::cmd("WATCH")
                .arg(&key)
                .query_async::<_, ()>(&mut conn)
                .await
                .map_err(|e| ApiError::Internal(format!("redis WATCH failed: {}", e)))?;

            let raw: Option<String> = conn
                .get(&key)
                .await
                .map_err(|e| ApiError::Internal(format!("redis read failed: {}", e)))?;
            let current = raw
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_else(|| Value::Object(Map::new()));

            let next = update(current);

            let mut pipe = redis::pipe();
            pipe.atomic().set(&key, next.to_string()).ignore();
            let committed: Option<()> = pipe
                .query_async(&mut conn)
                .await
                .map_err(|e| ApiError::Internal(format!("redis EXEC failed: {}", e)))?;

            if committed.is_some() {
                return Ok(next);
            }
            // Another writer touched the node between WATCH and EXEC.
        }

        Err(ApiError::Internal(format!(
            "live state update for match {} kept conflicting after {} attempts",
            match_id, LIVE_STATE_MAX_RETRIES
        )))
    }
}

async fn run_worker(mut rx: mpsc::UnboundedReceiver<SyncJob>, client: Option<Arc<redis::Client>>) {
    let Some(client) = client else {
        tracing::warn!("No redis client configured, live mirror sync disabled");
        while rx.recv().await.is_some() {}
        return;
    };

    while let Some(job) = rx.recv().await {
        if let Err(e) = apply_job(&client, &job).await {
            // Best-effort by contract: the mirror may transiently lag.
            tracing::error!("Live sync job failed: {} ({:?})", e, job);
        }
    }
    tracing::info!("Live sync worker shutting down");
}

async fn apply_job(client: &redis::Client, job: &SyncJob) -> Result<(), redis::RedisError> {
    let mut conn = client.get_async_connection().await?;

    match job {
        SyncJob::FullMatch { match_id, payload } | SyncJob::PartialUpdate { match_id, payload } => {
            merge_into_node(&mut conn, *match_id, payload).await
        }
        SyncJob::Status { match_id, status } => {
            let payload = serde_json::json!({ "status": status });
            merge_into_node(&mut conn, *match_id, &payload).await
        }
        SyncJob::HistoryAppend { match_id, entry } => {
            let _: i64 = conn
                .rpush(match_history_key(*match_id), entry.to_string())
                .await?;
            Ok(())
        }
    }
}

/// Non-destructive partial update: fields present in `payload` overwrite,
/// everything else in the node is preserved.
async fn merge_into_node(
    conn: &mut redis::aio::Connection,
    match_id: Uuid,
    payload: &Value,
) -> Result<(), redis::RedisError> {
    let key = match_mirror_key(match_id);
    let existing: Option<String> = conn.get(&key).await?;
    let mut node = existing
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_else(|| Value::Object(Map::new()));

    deep_merge(&mut node, payload);

    conn.set(&key, node.to_string()).await
}

pub(crate) fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match target_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

/// The denormalized document mirrored for realtime display. Event history
/// lives in its own push-append list, not here.
pub fn mirror_payload(details: &MatchWithNames) -> Value {
    let m = &details.match_row;
    serde_json::json!({
        "match_id": m.id,
        "sport_id": m.sport_id,
        "sport_name": details.sport_name,
        "scoring_type": details.scoring_type,
        "team_a_id": m.team_a_id,
        "team_a_name": details.team_a_name,
        "team_b_id": m.team_b_id,
        "team_b_name": details.team_b_name,
        "status": m.status,
        "start_time": m.start_time,
        "end_time": m.end_time,
        "winner_team_id": m.winner_team_id,
        "venue": m.venue,
        "referee": m.referee,
        "score_details": m.score_details.0,
        "match_state": m.match_state.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_merge_preserves_unrelated_fields() {
        let mut node = serde_json::json!({
            "status": "live",
            "score_details": {"a": {"score": 3}},
            "match_state": {"current_innings": 1}
        });
        let patch = serde_json::json!({
            "score_details": {"b": {"score": 1}}
        });

        deep_merge(&mut node, &patch);

        assert_eq!(node["status"], "live");
        assert_eq!(node["score_details"]["a"]["score"], 3);
        assert_eq!(node["score_details"]["b"]["score"], 1);
        assert_eq!(node["match_state"]["current_innings"], 1);
    }

    #[test]
    fn deep_merge_overwrites_scalars() {
        let mut node = serde_json::json!({"status": "scheduled"});
        deep_merge(&mut node, &serde_json::json!({"status": "deleted"}));
        assert_eq!(node["status"], "deleted");
    }
}
