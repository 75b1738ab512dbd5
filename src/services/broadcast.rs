use std::sync::Arc;

use redis::AsyncCommands;
use uuid::Uuid;

use crate::models::live_events::LiveEvent;

/// All clients watching the live overview share one channel.
pub const OVERVIEW_CHANNEL: &str = "match:events:overview";

/// Per-match room channel.
pub fn match_channel(match_id: Uuid) -> String {
    format!("match:events:{}", match_id)
}

/// Publish a broadcast event. Best-effort: failures are logged, never
/// returned, so a dropped broadcast cannot fail a committed scoring call.
pub async fn publish(client: Option<&Arc<redis::Client>>, channel: &str, event: &LiveEvent) {
    let Some(client) = client else {
        tracing::debug!("No redis client configured, skipping broadcast to {}", channel);
        return;
    };

    let message = match serde_json::to_string(event) {
        Ok(message) => message,
        Err(e) => {
            tracing::error!("Failed to serialize broadcast event: {}", e);
            return;
        }
    };

    match client.get_async_connection().await {
        Ok(mut conn) => {
            let result: Result<i32, redis::RedisError> = conn.publish(channel, message).await;
            match result {
                Ok(receivers) => {
                    tracing::debug!("Broadcast to {} reached {} subscribers", channel, receivers);
                }
                Err(e) => {
                    tracing::error!("Failed to publish to {}: {}", channel, e);
                }
            }
        }
        Err(e) => {
            tracing::error!("Failed to connect to redis for broadcast: {}", e);
        }
    }
}
